// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Rewrites operation documentation from endpoint contracts.
//!
//! Enrichment appends text, so it must run exactly once per operation per
//! document build.

use axum::http::Method;
use serde_json::Value;
use utoipa::openapi::OpenApi;

use super::operation::{HeaderType, OperationDocument};
use crate::contract::{EndpointContract, EndpointId, EndpointMetadata, RateLimitDescriptor};

/// Extension key carrying `yes` or `no`.
pub const PUBLIC_EXTENSION: &str = "x-public";

const OK_STATUS: &str = "200";
const OK_DESCRIPTION: &str = "Successful operation";

const RATE_LIMIT_HEADERS: [(&str, &str); 3] = [
    (
        "x-ratelimit-limit",
        "The number of allowed requests in the current period",
    ),
    (
        "x-ratelimit-remaining",
        "The number of remaining requests in the current period",
    ),
    (
        "x-ratelimit-reset",
        "The timestamp of the start of the next period",
    ),
];

/// Apply an endpoint contract to its operation document.
///
/// Steps run in a fixed order: rate limit, public marker, permissions,
/// configuration gate, then trailing-period normalization.
pub fn enrich<D>(doc: &mut D, contract: &EndpointContract)
where
    D: OperationDocument + ?Sized,
{
    if let Some(limit) = &contract.rate_limit {
        doc.ensure_response(OK_STATUS, OK_DESCRIPTION);
        for (name, description) in RATE_LIMIT_HEADERS {
            doc.add_response_header(OK_STATUS, name, HeaderType::Integer, description);
        }
        append_paragraph(doc, &rate_limit_sentence(limit));
    }

    if contract.is_public() {
        doc.add_extension(PUBLIC_EXTENSION, Value::from("yes"));
        doc.clear_security_requirements();
    } else {
        doc.add_extension(PUBLIC_EXTENSION, Value::from("no"));
    }

    if let Some(permissions) = &contract.permissions {
        if !permissions.is_empty() {
            append_paragraph(
                doc,
                &format!(
                    "**Required permissions:** {}",
                    permissions.permissions().join(", ")
                ),
            );
        }
    }

    if let Some(configuration) = &contract.configuration {
        if !configuration.path().trim().is_empty() {
            append_paragraph(
                doc,
                &format!(
                    "**Required configuration:** This operation can only be called if the \
                     configuration for `{}` is `true`.",
                    configuration.path()
                ),
            );
        }
    }

    if let Some(description) = doc.description() {
        let normalized = normalize_description(description);
        if normalized != description {
            doc.set_description(normalized);
        }
    }
}

/// Enrich every operation of a generated document.
///
/// Operations without a registered contract are still tagged
/// `x-public = no`. Returns the number of operations visited.
pub fn enrich_openapi<M>(openapi: &mut OpenApi, metadata: &M) -> usize
where
    M: EndpointMetadata + ?Sized,
{
    let fallback = EndpointContract::default();
    let mut visited = 0;

    for (path, item) in openapi.paths.paths.iter_mut() {
        let operations = [
            (Method::GET, &mut item.get),
            (Method::PUT, &mut item.put),
            (Method::POST, &mut item.post),
            (Method::DELETE, &mut item.delete),
            (Method::OPTIONS, &mut item.options),
            (Method::HEAD, &mut item.head),
            (Method::PATCH, &mut item.patch),
            (Method::TRACE, &mut item.trace),
        ];
        for (method, slot) in operations {
            let Some(operation) = slot.as_mut() else {
                continue;
            };
            let endpoint = EndpointId::new(method, path.as_str());
            let contract = metadata.contract(&endpoint);
            if contract.is_none() {
                tracing::debug!(%endpoint, "No contract registered, documenting as private");
            }
            enrich(operation, contract.unwrap_or(&fallback));
            visited += 1;
        }
    }

    tracing::info!(operations = visited, "Enriched API documentation");
    visited
}

fn rate_limit_sentence(limit: &RateLimitDescriptor) -> String {
    let mut sentence = format!(
        "**Rate limit:** This operation can be called up to {} times every {} for regular users",
        limit.max_requests,
        human_duration(limit.window_seconds)
    );
    if limit.has_api_key_limit() {
        sentence.push_str(&format!(
            " and up to {} times every {} with API Keys",
            limit.api_key_max_requests,
            human_duration(limit.api_key_window_seconds)
        ));
    }
    sentence.push('.');
    sentence
}

/// Append `paragraph` to the description, separated by a blank line.
fn append_paragraph<D>(doc: &mut D, paragraph: &str)
where
    D: OperationDocument + ?Sized,
{
    let current = doc.description().unwrap_or_default().trim_end();
    let description = if current.is_empty() {
        paragraph.to_string()
    } else {
        format!("{current}\n\n{paragraph}")
    };
    doc.set_description(description);
}

/// Render a window length the way humans say it.
///
/// `45` -> `45 seconds`, `90` -> `1 minute`, `5400` -> `1 hour 30 minutes`.
/// Sub-unit remainders below the last shown unit are dropped.
pub fn human_duration(seconds: u64) -> String {
    fn unit(value: u64, name: &str) -> String {
        if value == 1 {
            format!("{value} {name}")
        } else {
            format!("{value} {name}s")
        }
    }

    if seconds < 60 {
        unit(seconds, "second")
    } else if seconds < 3600 {
        unit(seconds / 60, "minute")
    } else {
        let hours = unit(seconds / 3600, "hour");
        let minutes = (seconds % 3600) / 60;
        if minutes > 0 {
            format!("{hours} {}", unit(minutes, "minute"))
        } else {
            hours
        }
    }
}

/// End a non-empty description with exactly one period.
///
/// Trailing whitespace is ignored when checking and dropped when a period
/// is added. Applying this twice is the same as applying it once.
pub fn normalize_description(description: &str) -> String {
    let trimmed = description.trim_end();
    if trimmed.is_empty() || trimmed.ends_with('.') {
        description.to_string()
    } else {
        format!("{trimmed}.")
    }
}
