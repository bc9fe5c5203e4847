//! Lock manager for coordinating named leases
//!
//! The manager is a stateless façade over the lock store: every call issues
//! one or two atomic store operations and returns immediately. It holds no
//! in-process mutable state and takes no application-level locks. Mutual
//! exclusion comes entirely from the store's unique index and conditional
//! mutations, which also covers callers in other processes or on other
//! machines sharing the same store.
//!
//! Acquisition is a single non-blocking attempt. There is no queueing or
//! wake-up for waiters; retry cadence is the caller's policy.

use super::repository::LockRepository;
use super::types::{CreateOutcome, LockStatus};
use crate::error::Result;
use chrono::Utc;
use tracing::debug;

/// Lock manager for coordinating named leases
#[derive(Debug, Clone)]
pub struct LockManager {
    repo: LockRepository,
}

impl LockManager {
    /// Create a new lock manager over the given store
    pub fn new(repo: LockRepository) -> Self {
        Self { repo }
    }

    /// Get the underlying lock store
    pub fn repository(&self) -> &LockRepository {
        &self.repo
    }

    /// Attempt to acquire or renew the lock `name` for `requester`
    ///
    /// Returns `Some(status)` when the requester holds the lock afterwards:
    /// `Some(Owned)` for a fresh acquisition, `Some(current status)` for a
    /// renewal (renewal never changes status, so an interrupted lease stays
    /// interrupted). Returns `None` when the lock is held by someone else or
    /// the creation race was lost; nothing is mutated in either case and the
    /// caller decides whether and when to retry.
    pub async fn acquire(&self, name: &str, requester: &str) -> Result<Option<LockStatus>> {
        match self.repo.find_by_name(name).await? {
            None => {
                debug!(
                    name = %name,
                    requester = %requester,
                    "no one owns this lock, applying for it"
                );
                match self.repo.try_create(name, requester, Utc::now()).await? {
                    CreateOutcome::Created => {
                        debug!(name = %name, requester = %requester, "lock acquired");
                        Ok(Some(LockStatus::Owned))
                    }
                    CreateOutcome::Conflict => {
                        // A concurrent requester won the race between the
                        // lookup and the insert
                        debug!(name = %name, requester = %requester, "lost creation race");
                        Ok(None)
                    }
                }
            }
            Some(record) if record.owner == requester => {
                // Heartbeat: refresh the lease, leave status untouched
                debug!(name = %name, requester = %requester, "renewing held lock");
                self.repo.touch(record.id, Utc::now()).await?;
                Ok(Some(record.status))
            }
            Some(record) => {
                debug!(
                    name = %name,
                    requester = %requester,
                    owner = %record.owner,
                    "lock is held by another owner"
                );
                Ok(None)
            }
        }
    }

    /// Release the lock `name` if and only if `owner` holds it
    ///
    /// Returns true iff one record was removed. A release attempt by a
    /// non-owner, or for a name with no record, returns false without
    /// touching anything; that is routine control flow, not a fault. Status
    /// is irrelevant: an interrupted lock releases exactly like an owned one.
    pub async fn release(&self, name: &str, owner: &str) -> Result<bool> {
        let removed = self.repo.delete_by_name_and_owner(name, owner).await?;
        if removed == 0 {
            debug!(name = %name, owner = %owner, "release refused, not the holder");
            Ok(false)
        } else {
            debug!(name = %name, owner = %owner, "lock released");
            Ok(true)
        }
    }

    /// Flag the lock `name` as interrupted
    ///
    /// A cooperative-cancellation signal: any caller may interrupt any lock
    /// by name. It does not remove ownership or stop the holder from
    /// renewing or releasing. Returns true iff a record existed to update;
    /// interrupting an already-interrupted lock is a no-op that still
    /// returns true.
    pub async fn interrupt(&self, name: &str) -> Result<bool> {
        let affected = self.repo.set_status(name, LockStatus::Interrupted).await?;
        if affected == 0 {
            debug!(name = %name, "cannot interrupt, lock does not exist");
            Ok(false)
        } else {
            debug!(name = %name, "lock interrupted");
            Ok(true)
        }
    }
}
