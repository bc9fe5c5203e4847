//! Lock record and status types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a held lock
///
/// A closed two-variant set. The only defined transition is
/// `Owned -> Interrupted`; nothing moves a record back to `Owned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStatus {
    /// Lock is held by its owner
    Owned,
    /// Someone has asked the holder to yield voluntarily
    Interrupted,
}

impl LockStatus {
    /// Integer tag as persisted in the store (0 = owned, 1 = interrupted)
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Owned => 0,
            Self::Interrupted => 1,
        }
    }

    /// Decode the persisted integer tag
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Owned),
            1 => Some(Self::Interrupted),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owned => "owned",
            Self::Interrupted => "interrupted",
        }
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted lock record
///
/// At most one record exists per `name` at any instant; the store's unique
/// index enforces that. `owner` never changes while the record exists;
/// ownership transfer requires deletion followed by a new creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    /// Store-assigned row id
    pub id: i64,

    /// Name of the protected resource, unique across live records
    pub name: String,

    /// Identity of the current holder
    pub owner: String,

    /// Timestamp of creation or last successful renewal
    pub last_renewed: DateTime<Utc>,

    /// Current status
    pub status: LockStatus,
}

/// Outcome of an insert attempt against the lock store
///
/// `Conflict` means the creation lost a race to another concurrent creation
/// for the same name. It is expected contention, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new record was inserted; the caller is now the owner
    Created,
    /// A record for this name already exists
    Conflict,
}
