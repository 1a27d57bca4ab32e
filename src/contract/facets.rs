// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Declarative endpoint facets.
//!
//! None of these facets enforce anything. They describe the contract of an
//! endpoint so that documentation (and any external enforcement layer) can
//! read it from one place.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Marks an endpoint as callable without credentials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PublicMarker;

/// How often an endpoint may be called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitDescriptor {
    /// Requests allowed per window for regular users.
    pub max_requests: u32,
    /// Window length in seconds for regular users.
    pub window_seconds: u64,
    /// Requests allowed per window with an API key. `0` inherits the user limit.
    pub api_key_max_requests: u32,
    /// Window length in seconds with an API key.
    pub api_key_window_seconds: u64,
}

impl Default for RateLimitDescriptor {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window_seconds: 60,
            api_key_max_requests: 0,
            api_key_window_seconds: 60,
        }
    }
}

impl RateLimitDescriptor {
    pub fn new(max_requests: u32, window_seconds: u64) -> Self {
        Self {
            max_requests,
            window_seconds,
            ..Self::default()
        }
    }

    pub fn with_api_key_limit(mut self, max_requests: u32, window_seconds: u64) -> Self {
        self.api_key_max_requests = max_requests;
        self.api_key_window_seconds = window_seconds;
        self
    }

    /// Whether API-key callers get their own limit.
    pub fn has_api_key_limit(&self) -> bool {
        self.api_key_max_requests > 0
    }
}

/// Permission identifiers a caller must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PermissionRequirement(Vec<String>);

impl PermissionRequirement {
    /// Build from identifiers, dropping duplicates but keeping first-seen order.
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for permission in permissions {
            let permission = permission.into();
            if !unique.contains(&permission) {
                unique.push(permission);
            }
        }
        Self(unique)
    }

    pub fn permissions(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Dotted configuration path that must be `true` for the endpoint to be reachable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigurationRequirement(String);

impl ConfigurationRequirement {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }
}

/// The full declared contract of one endpoint. Any subset of facets may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointContract {
    pub public: Option<PublicMarker>,
    pub rate_limit: Option<RateLimitDescriptor>,
    pub permissions: Option<PermissionRequirement>,
    pub configuration: Option<ConfigurationRequirement>,
}

impl EndpointContract {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public(mut self) -> Self {
        self.public = Some(PublicMarker);
        self
    }

    pub fn rate_limited(mut self, limit: RateLimitDescriptor) -> Self {
        self.rate_limit = Some(limit);
        self
    }

    pub fn require_permissions<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions = Some(PermissionRequirement::new(permissions));
        self
    }

    pub fn require_configuration(mut self, path: impl Into<String>) -> Self {
        self.configuration = Some(ConfigurationRequirement::new(path));
        self
    }

    pub fn is_public(&self) -> bool {
        self.public.is_some()
    }

    /// Check the facets for configuration mistakes.
    ///
    /// Returns every violation found, in facet order.
    pub fn violations(&self) -> Vec<ContractViolation> {
        let mut found = Vec::new();
        if let Some(limit) = &self.rate_limit {
            if limit.max_requests == 0 {
                found.push(ContractViolation::ZeroMaxRequests);
            }
            if limit.window_seconds == 0 {
                found.push(ContractViolation::ZeroWindow("windowSeconds"));
            }
            if limit.has_api_key_limit() && limit.api_key_window_seconds == 0 {
                found.push(ContractViolation::ZeroWindow("apiKeyWindowSeconds"));
            }
        }
        if let Some(permissions) = &self.permissions {
            if permissions.is_empty() {
                found.push(ContractViolation::EmptyPermissions);
            }
            if permissions.permissions().iter().any(|p| p.trim().is_empty()) {
                found.push(ContractViolation::BlankPermission);
            }
        }
        if let Some(configuration) = &self.configuration {
            if configuration.path().trim().is_empty() {
                found.push(ContractViolation::EmptyConfigurationPath);
            }
        }
        found
    }
}

/// A facet value that cannot describe a real contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("rate limit must allow at least one request")]
    ZeroMaxRequests,
    #[error("rate limit window `{0}` must be at least one second")]
    ZeroWindow(&'static str),
    #[error("permission requirement must name at least one permission")]
    EmptyPermissions,
    #[error("permission identifiers must not be blank")]
    BlankPermission,
    #[error("configuration requirement must name a configuration path")]
    EmptyConfigurationPath,
}

impl ContractViolation {
    /// Wire name of the offending facet field.
    pub fn field(&self) -> &'static str {
        match self {
            ContractViolation::ZeroMaxRequests => "rateLimit.maxRequests",
            ContractViolation::ZeroWindow("apiKeyWindowSeconds") => "rateLimit.apiKeyWindowSeconds",
            ContractViolation::ZeroWindow(_) => "rateLimit.windowSeconds",
            ContractViolation::EmptyPermissions | ContractViolation::BlankPermission => {
                "permissions"
            }
            ContractViolation::EmptyConfigurationPath => "configuration",
        }
    }

    /// Machine-readable constraint code.
    pub fn code(&self) -> &'static str {
        match self {
            ContractViolation::ZeroMaxRequests | ContractViolation::ZeroWindow(_) => "Positive",
            ContractViolation::EmptyPermissions => "NotEmpty",
            ContractViolation::BlankPermission | ContractViolation::EmptyConfigurationPath => {
                "NotBlank"
            }
        }
    }
}
