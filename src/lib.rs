// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! WalletIQ Server - Endpoint Contracts & Response Envelopes
//!
//! Shared API plumbing for the WalletIQ HTTP server: every response is one of
//! two envelopes, every error belongs to a closed taxonomy, and every endpoint
//! declares a contract that is rendered into its OpenAPI operation.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `config` - Environment-driven configuration
//! - `contract` - Endpoint contract facets and their registry
//! - `docs` - OpenAPI settings and contract enrichment (utoipa)
//! - `error` - Handler error type rendered as an error envelope
//! - `request_context` - Request path and correlation id extractor
//! - `response` - Error taxonomy, envelopes and response builders

pub mod api;
pub mod config;
pub mod contract;
pub mod docs;
pub mod error;
pub mod request_context;
pub mod response;
pub mod state;
