// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Document-level OpenAPI settings: info, servers, tags and security schemes.

use serde_json::{json, Value};
use utoipa::openapi::{
    extensions::Extensions,
    security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme},
    Components, Contact, License, OpenApi, Server, Tag,
};
use utoipa::Modify;

use crate::config::{AppConfig, Profile};

pub const BEARER_AUTH: &str = "BearerAuth";
pub const API_KEY_AUTH: &str = "ApiKeyAuth";

const AUTH_NOTE: &str = "**Authentication:**
Authentication is performed using the Authorization HTTP header in the format:

`Authorization: Bearer YOUR_JWT_TOKEN`

For API key authentication:

`Authorization: ApiKey YOUR_API_KEY`

**Rate Limiting:**
There is a rate limit of `30 requests per minute` across all endpoints, with some
endpoints having stricter limits.
Rate limit information is provided in response headers:
- `x-ratelimit-limit`: Maximum requests allowed in the current period
- `x-ratelimit-remaining`: Remaining requests in the current period
- `x-ratelimit-reset`: Timestamp when the limit resets
";

/// Registers the bearer-token and API-key security schemes.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);

        components.add_security_scheme(
            BEARER_AUTH,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "JWT Bearer token authentication. Use for user-specific operations.",
                    ))
                    .build(),
            ),
        );
        components.add_security_scheme(
            API_KEY_AUTH,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "API Key authentication (`Authorization: ApiKey <key>`). Provides access to \
                 certain API endpoints with different rate limits.",
            ))),
        );
    }
}

struct TagSpec {
    name: &'static str,
    display_name: &'static str,
    description: &'static str,
    public: bool,
}

const TAGS: [TagSpec; 3] = [
    TagSpec {
        name: "Health",
        display_name: "Health",
        description: "Liveness probes.",
        public: true,
    },
    TagSpec {
        name: "Meta",
        display_name: "API Metadata",
        description: "Error taxonomy published for client developers.",
        public: true,
    },
    TagSpec {
        name: "Contracts",
        display_name: "Endpoint Contracts",
        description: "Declared endpoint contracts. Require the DOCS_READ permission.",
        public: false,
    },
];

const DEVELOPMENT_TAG: TagSpec = TagSpec {
    name: "Development",
    display_name: "Development",
    description: "Development-only endpoints. Not available in production.",
    public: false,
};

/// Apply the configured identity, servers and tags to a generated document.
pub fn apply_settings(openapi: &mut OpenApi, config: &AppConfig) {
    let app = &config.app;
    let info = &mut openapi.info;
    info.title = app.name.clone();
    info.version = app.version.clone();
    info.description = Some(format!(
        "Documentation for the endpoints provided by the {} API server.\n\n{AUTH_NOTE}",
        app.name
    ));

    let mut contact = Contact::new();
    contact.name = Some(app.name.clone());
    contact.email = app.support_email.clone();
    info.contact = Some(contact);

    let mut license = License::new(app.license_name.clone());
    license.url = app.license_url.clone();
    info.license = Some(license);

    if let Some(logo) = &app.logo_url {
        info.extensions
            .get_or_insert_with(Extensions::default)
            .insert("x-logo".to_string(), json!({ "url": logo }));
    }

    let environment = match config.profile {
        Profile::Development => "Development Environment",
        Profile::Production => "Production Environment",
    };
    let servers = config
        .active_servers()
        .iter()
        .map(|url| {
            let mut server = Server::new(url.as_str());
            server.description = Some(environment.to_string());
            server
        })
        .collect::<Vec<_>>();
    openapi.servers = (!servers.is_empty()).then_some(servers);

    let mut tags: Vec<Tag> = TAGS.iter().map(tag).collect();
    if !config.profile.is_production() {
        tags.push(tag(&DEVELOPMENT_TAG));
    }
    openapi.tags = Some(tags);
}

fn tag(entry: &TagSpec) -> Tag {
    let mut tag = Tag::new(entry.name);
    tag.description = Some(entry.description.to_string());
    let extensions = tag.extensions.get_or_insert_with(Extensions::default);
    extensions.insert("x-displayName".to_string(), Value::from(entry.display_name));
    extensions.insert(
        "x-public".to_string(),
        Value::from(if entry.public { "yes" } else { "no" }),
    );
    tag
}
