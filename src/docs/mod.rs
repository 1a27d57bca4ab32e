// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Documentation
//!
//! Generated OpenAPI documents are post-processed in two passes:
//!
//! 1. [`openapi::apply_settings`] fills the document-level info, servers and
//!    tags from [`AppConfig`](crate::config::AppConfig).
//! 2. [`enricher::enrich_openapi`] rewrites every operation from the contract
//!    registered for it (rate-limit headers, `x-public`, contract clauses).
//!
//! The enricher only talks to operations through [`OperationDocument`].

pub mod enricher;
pub mod openapi;
pub mod operation;

pub use enricher::{enrich, enrich_openapi, human_duration, normalize_description};
pub use operation::{HeaderType, OperationDocument};
