// ABOUTME: Authenticated administrator principal supplied by the external auth layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Planner App Contributors

use serde::{Deserialize, Serialize};

use super::user::UserRole;

/// The authenticated principal behind an administrative call
///
/// Produced by the (external) authentication middleware and passed to every
/// facade operation that needs attribution. Authorization itself happens
/// upstream; this core only records who acted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminContext {
    /// Identifier of the acting administrator
    pub admin_id: String,
    /// Role the middleware resolved for the principal
    pub role: UserRole,
}

impl AdminContext {
    #[must_use]
    pub fn new(admin_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            admin_id: admin_id.into(),
            role,
        }
    }
}
