//! Lease-based mutual exclusion over the lock store
//!
//! Callers request exclusive ownership of a named resource, renew it while
//! doing work, and release it when done. Ownership that is not renewed within
//! the TTL window is reclaimed by the background sweeper.
//!
//! # Architecture
//!
//! - **Lock Store**: `LockRepository`, atomic create/update/delete
//!   primitives over lock records
//! - **Lock Manager**: `LockManager`, acquire/renew/release/interrupt
//! - **Expiry Sweeper**: `ExpirySweeper`, periodic reclamation of stale
//!   leases with an explicit start/stop lifecycle
//!
//! All mutual exclusion is delegated to the store's transactional guarantees;
//! the manager holds no in-process mutable state and is safe to invoke
//! concurrently from any number of independent callers.
//!
//! # Example
//!
//! ```ignore
//! use leasehold_core::domain::lease::{LockManager, LockRepository};
//! use leasehold_core::storage::Database;
//!
//! let db = Database::default().await?;
//! let manager = LockManager::new(LockRepository::new(db.pool().clone()));
//!
//! if let Some(status) = manager.acquire("reindex", "worker-7").await? {
//!     // We hold the lock; keep calling acquire to renew while working.
//!     manager.release("reindex", "worker-7").await?;
//! }
//! ```

pub mod manager;
pub mod repository;
pub mod sweeper;
pub mod types;

// Re-export main types
pub use manager::LockManager;
pub use repository::LockRepository;
pub use sweeper::{ExpirySweeper, SweeperConfig, SweeperHandle};
pub use types::{CreateOutcome, LockRecord, LockStatus};
