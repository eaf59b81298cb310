//! Roles - Planner, Manager and Worker
//!
//! Roles hold no state of their own. Each is a function over a [`Gateway`],
//! the prompt set and (for Manager and Worker) the blob store.
//!
//! [`Gateway`]: crate::gateway::Gateway

mod language;
mod manager;
mod planner;
mod worker;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use language::Language;
pub use manager::manage;
pub use planner::plan;
pub use worker::{WorkReport, Worker};

/// The three kinds of model-backed participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Planner,
    Manager,
    Worker,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Planner => write!(f, "planner"),
            Role::Manager => write!(f, "manager"),
            Role::Worker => write!(f, "worker"),
        }
    }
}

/// Label of a worker slot in the pool, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker #{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(Role::Planner.to_string(), "planner");
        assert_eq!(Role::Manager.to_string(), "manager");
        assert_eq!(Role::Worker.to_string(), "worker");
    }

    #[test]
    fn test_worker_id_display() {
        assert_eq!(WorkerId(2).to_string(), "worker #2");
    }
}
