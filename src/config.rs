// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values and the
//! [`AppConfig`] loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `APP_PROFILE` | `dev` or `prod` (selects documented servers) | `dev` |
//! | `APP_NAME` | API name shown in the documentation | `WalletIQ` |
//! | `APP_VERSION` | API version shown in the documentation | crate version |
//! | `APP_LOGO_URL` | Logo for the documentation (`x-logo`) | Optional |
//! | `APP_SUPPORT_EMAIL` | Contact e-mail | Optional |
//! | `APP_LICENSE_NAME` | License name | `AGPL-3.0-or-later` |
//! | `APP_LICENSE_URL` | License URL | Optional |
//! | `API_SERVERS_DEV` | Comma-separated development server URLs | `http://localhost:8080` |
//! | `API_SERVERS_PROD` | Comma-separated production server URLs | empty |
//! | `FEATURE_CONTRACT_LOOKUP` | Enables `GET /v1/meta/endpoint` | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const PROFILE_ENV: &str = "APP_PROFILE";
pub const APP_NAME_ENV: &str = "APP_NAME";
pub const APP_VERSION_ENV: &str = "APP_VERSION";
pub const APP_LOGO_URL_ENV: &str = "APP_LOGO_URL";
pub const APP_SUPPORT_EMAIL_ENV: &str = "APP_SUPPORT_EMAIL";
pub const APP_LICENSE_NAME_ENV: &str = "APP_LICENSE_NAME";
pub const APP_LICENSE_URL_ENV: &str = "APP_LICENSE_URL";
pub const API_SERVERS_DEV_ENV: &str = "API_SERVERS_DEV";
pub const API_SERVERS_PROD_ENV: &str = "API_SERVERS_PROD";

/// Feature flag gating the single-contract lookup endpoint.
///
/// Documented on the endpoint as the configuration path
/// [`CONTRACT_LOOKUP_CONFIG_PATH`].
pub const FEATURE_CONTRACT_LOOKUP_ENV: &str = "FEATURE_CONTRACT_LOOKUP";
pub const CONTRACT_LOOKUP_CONFIG_PATH: &str = "features.contract-lookup";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_APP_NAME: &str = "WalletIQ";
const DEFAULT_LICENSE: &str = "AGPL-3.0-or-later";
const DEFAULT_DEV_SERVER: &str = "http://localhost:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("invalid server URL {url:?} in {name}: {source}")]
    InvalidServerUrl {
        name: &'static str,
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Deployment profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    #[default]
    Development,
    Production,
}

impl Profile {
    pub fn is_production(self) -> bool {
        self == Profile::Production
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Identity of the API as shown in the generated documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
    pub logo_url: Option<String>,
    pub support_email: Option<String>,
    pub license_name: String,
    pub license_url: Option<String>,
}

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: DEFAULT_APP_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            logo_url: None,
            support_email: None,
            license_name: DEFAULT_LICENSE.to_string(),
            license_url: None,
        }
    }
}

/// Server URLs advertised in the documentation, per profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiServers {
    pub dev: Vec<Url>,
    pub prod: Vec<Url>,
}

impl Default for ApiServers {
    fn default() -> Self {
        Self {
            dev: DEFAULT_DEV_SERVER.parse::<Url>().into_iter().collect(),
            prod: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub profile: Profile,
    pub app: AppInfo,
    pub servers: ApiServers,
    pub contract_lookup_enabled: bool,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            profile: Profile::default(),
            app: AppInfo::default(),
            servers: ApiServers::default(),
            contract_lookup_enabled: false,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let port = match var(PORT_ENV) {
            Some(value) => match value.trim().parse::<u16>() {
                Ok(port) => port,
                Err(_) => {
                    return Err(ConfigError::InvalidValue {
                        name: PORT_ENV,
                        value,
                    })
                }
            },
            None => defaults.port,
        };

        let profile = match var(PROFILE_ENV).as_deref().map(str::trim) {
            None | Some("dev") | Some("development") => Profile::Development,
            Some("prod") | Some("production") => Profile::Production,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: PROFILE_ENV,
                    value: other.to_string(),
                })
            }
        };

        let log_format = match var(LOG_FORMAT_ENV).as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let servers = ApiServers {
            dev: match var(API_SERVERS_DEV_ENV) {
                Some(list) => parse_servers(API_SERVERS_DEV_ENV, &list)?,
                None => defaults.servers.dev,
            },
            prod: match var(API_SERVERS_PROD_ENV) {
                Some(list) => parse_servers(API_SERVERS_PROD_ENV, &list)?,
                None => defaults.servers.prod,
            },
        };

        let app = AppInfo {
            name: var(APP_NAME_ENV).unwrap_or(defaults.app.name),
            version: var(APP_VERSION_ENV).unwrap_or(defaults.app.version),
            logo_url: var(APP_LOGO_URL_ENV),
            support_email: var(APP_SUPPORT_EMAIL_ENV),
            license_name: var(APP_LICENSE_NAME_ENV).unwrap_or(defaults.app.license_name),
            license_url: var(APP_LICENSE_URL_ENV),
        };

        let contract_lookup_enabled = match var(FEATURE_CONTRACT_LOOKUP_ENV) {
            Some(value) => parse_flag(FEATURE_CONTRACT_LOOKUP_ENV, &value)?,
            None => false,
        };

        Ok(Self {
            host: var(HOST_ENV).unwrap_or(defaults.host),
            port,
            profile,
            app,
            servers,
            contract_lookup_enabled,
            log_format,
        })
    }

    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        address.parse().map_err(|_| ConfigError::InvalidValue {
            name: HOST_ENV,
            value: address,
        })
    }

    /// Servers advertised for the active profile.
    pub fn active_servers(&self) -> &[Url] {
        match self.profile {
            Profile::Development => &self.servers.dev,
            Profile::Production => &self.servers.prod,
        }
    }
}

fn parse_servers(name: &'static str, list: &str) -> Result<Vec<Url>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(|url| {
            Url::parse(url).map_err(|source| ConfigError::InvalidServerUrl {
                name,
                url: url.to_string(),
                source,
            })
        })
        .collect()
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
        }),
    }
}
