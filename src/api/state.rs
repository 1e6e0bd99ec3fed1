//! Application state for the Payroll Calculation Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::ConfigLoader;

/// Shared application state.
///
/// Holds the loaded payroll policies, shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The loaded payroll policies.
    policies: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(policies: ConfigLoader) -> Self {
        Self {
            policies: Arc::new(policies),
        }
    }

    /// Returns a shared handle to the payroll policies.
    pub fn policies(&self) -> Arc<ConfigLoader> {
        Arc::clone(&self.policies)
    }
}
