//! Shared types used across the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Requests the client issues against the cars collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Login,
    Select,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Mutations are followed by a full resync on success
    pub fn is_mutation(self) -> bool {
        matches!(self, Operation::Create | Operation::Update | Operation::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::Select => "select",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
