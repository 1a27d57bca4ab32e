// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Side table of endpoint contracts, keyed by method and route template.

use std::collections::HashMap;

use axum::http::Method;
use thiserror::Error;

use super::facets::{ContractViolation, EndpointContract};

/// Identity of an endpoint: HTTP method plus route template
/// (e.g. `GET /v1/users/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointId {
    pub method: Method,
    pub path: String,
}

impl EndpointId {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }
}

impl std::fmt::Display for EndpointId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Contract registration errors.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("invalid contract for {endpoint}: {violation}")]
    Invalid {
        endpoint: EndpointId,
        #[source]
        violation: ContractViolation,
    },
    #[error("a contract is already registered for {0}")]
    Duplicate(EndpointId),
}

/// Reports the declared contract of an endpoint.
pub trait EndpointMetadata {
    fn contract(&self, endpoint: &EndpointId) -> Option<&EndpointContract>;
}

/// Registry of endpoint contracts.
///
/// Populated once at startup and read-only afterwards. Iteration follows
/// registration order.
#[derive(Debug, Clone, Default)]
pub struct ContractRegistry {
    entries: Vec<(EndpointId, EndpointContract)>,
    index: HashMap<EndpointId, usize>,
}

impl ContractRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a contract to an endpoint.
    ///
    /// Fails on the first facet violation or if the endpoint already has a
    /// contract.
    pub fn register(
        &mut self,
        endpoint: EndpointId,
        contract: EndpointContract,
    ) -> Result<(), ContractError> {
        if let Some(violation) = contract.violations().into_iter().next() {
            return Err(ContractError::Invalid {
                endpoint,
                violation,
            });
        }
        if self.index.contains_key(&endpoint) {
            return Err(ContractError::Duplicate(endpoint));
        }
        self.index.insert(endpoint.clone(), self.entries.len());
        self.entries.push((endpoint, contract));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EndpointId, &EndpointContract)> {
        self.entries.iter().map(|(id, contract)| (id, contract))
    }

    /// Methods registered for any template matching `path`, in registration order.
    pub fn methods_for(&self, path: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = Vec::new();
        for (id, _) in &self.entries {
            if template_matches(&id.path, path) && !methods.contains(&id.method) {
                methods.push(id.method.clone());
            }
        }
        methods
    }
}

impl EndpointMetadata for ContractRegistry {
    fn contract(&self, endpoint: &EndpointId) -> Option<&EndpointContract> {
        self.index
            .get(endpoint)
            .and_then(|&position| self.entries.get(position))
            .map(|(_, contract)| contract)
    }
}

/// Whether a concrete request path matches a route template.
///
/// Template segments wrapped in braces (`{id}`) match any single non-empty
/// segment. A trailing slash is significant, as it is for the router.
pub fn template_matches(template: &str, path: &str) -> bool {
    let mut template_segments = template.split('/');
    let mut path_segments = path.split('/');
    loop {
        match (template_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(t), Some(p)) => {
                let wildcard = t.starts_with('{') && t.ends_with('}') && !p.is_empty();
                if !wildcard && t != p {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
