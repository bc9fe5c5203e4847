//! Leasehold Core Library
//!
//! This crate provides the core functionality for Leasehold, including:
//! - Storage (SQLite connection pool + schema migrations)
//! - Lock store (atomic create/update/delete primitives over lock records)
//! - Lock manager (acquire, renew, release, interrupt)
//! - Expiry sweeper (background reclamation of stale leases)
//! - Configuration with file persistence

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::lease::{
        CreateOutcome, ExpirySweeper, LockManager, LockRecord, LockRepository, LockStatus,
        SweeperConfig, SweeperHandle,
    };
    pub use crate::error::{Error, Result};
    pub use crate::storage::{Database, DatabaseConfig};
}
