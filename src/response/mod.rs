// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Response Envelopes
//!
//! Every response leaving the API is wrapped in one of two envelopes:
//!
//! - [`SuccessEnvelope`] - `{success: true, status, message, data?, timestamp}`
//! - [`ErrorEnvelope`] - `{success: false, error: {type, code, title, ...}}`
//!
//! Error envelopes are always classified by an [`ErrorKind`], which fixes the
//! HTTP status and title. The [`builder`] module produces the envelopes,
//! including paginated, batch and async variants.

pub mod builder;
pub mod envelope;
pub mod kind;
pub mod page;

pub use builder::ErrorContext;
pub use envelope::{ErrorDetail, ErrorEnvelope, FieldError, SuccessEnvelope};
pub use kind::ErrorKind;
pub use page::{PageInfo, PageSource, SlicePage};
