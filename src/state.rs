// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{config::AppConfig, contract::ContractRegistry};

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub contracts: Arc<ContractRegistry>,
}

impl AppState {
    pub fn new(config: AppConfig, contracts: ContractRegistry) -> Self {
        Self {
            config: Arc::new(config),
            contracts: Arc::new(contracts),
        }
    }
}
