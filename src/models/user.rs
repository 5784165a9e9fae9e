// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and reports.

use serde::{Deserialize, Serialize};

/// One user directory of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Directory name, e.g. "010"
    pub id: String,
    /// Whether ground-truth labels were supplied for this user
    pub has_labels: bool,
}

impl User {
    pub fn new(id: impl Into<String>, has_labels: bool) -> Self {
        Self {
            id: id.into(),
            has_labels,
        }
    }
}
