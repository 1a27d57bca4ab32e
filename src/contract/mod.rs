// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Endpoint Contracts
//!
//! Declarative, non-enforcing metadata attached to endpoints at startup:
//!
//! - [`PublicMarker`] - callable without credentials
//! - [`RateLimitDescriptor`] - allowed request rate (users and API keys)
//! - [`PermissionRequirement`] - permissions the caller must hold
//! - [`ConfigurationRequirement`] - configuration flag that gates the endpoint
//!
//! Contracts live in a [`ContractRegistry`] keyed by [`EndpointId`] and are
//! read by the documentation enricher. Enforcement happens elsewhere.

pub mod facets;
pub mod registry;

pub use facets::{
    ConfigurationRequirement, ContractViolation, EndpointContract, PermissionRequirement,
    PublicMarker, RateLimitDescriptor,
};
pub use registry::{ContractError, ContractRegistry, EndpointId, EndpointMetadata};
