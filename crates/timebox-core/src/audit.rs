//! Audit trail of activity changes.
//!
//! Every committed create, update and delete is recorded with the JSON
//! snapshot before and after, tagged with whether the user or the reasoning
//! service initiated it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::error::{CoreError, Result};

/// Entries returned by [`AuditSink::recent`] when no limit is given
pub const DEFAULT_AUDIT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

/// Who initiated a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditSource {
    Ai,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub owner: String,
    /// `None` only when the activity no longer exists
    pub activity_id: Option<String>,
    pub action: AuditAction,
    pub source: AuditSource,
    pub payload_before: Option<serde_json::Value>,
    pub payload_after: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    fn new(
        owner: &str,
        activity_id: &str,
        action: AuditAction,
        source: AuditSource,
        payload_before: Option<serde_json::Value>,
        payload_after: Option<serde_json::Value>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            activity_id: Some(activity_id.to_string()),
            action,
            source,
            payload_before,
            payload_after,
            created_at: Utc::now(),
        }
    }

    pub fn created<T: Serialize>(
        owner: &str,
        activity_id: &str,
        source: AuditSource,
        after: &T,
    ) -> Result<Self> {
        Ok(Self::new(
            owner,
            activity_id,
            AuditAction::Create,
            source,
            None,
            Some(serde_json::to_value(after)?),
        ))
    }

    pub fn updated<T: Serialize>(
        owner: &str,
        activity_id: &str,
        source: AuditSource,
        before: &T,
        after: &T,
    ) -> Result<Self> {
        Ok(Self::new(
            owner,
            activity_id,
            AuditAction::Update,
            source,
            Some(serde_json::to_value(before)?),
            Some(serde_json::to_value(after)?),
        ))
    }

    pub fn deleted<T: Serialize>(
        owner: &str,
        activity_id: &str,
        source: AuditSource,
        before: &T,
    ) -> Result<Self> {
        Ok(Self::new(
            owner,
            activity_id,
            AuditAction::Delete,
            source,
            Some(serde_json::to_value(before)?),
            None,
        ))
    }
}

/// Destination for audit entries.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<()>;

    /// Newest entries first, at most `limit`.
    fn recent(&self, owner: &str, limit: usize) -> Result<Vec<AuditEntry>>;
}

/// Append-only in-memory audit log.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&self, entry: AuditEntry) -> Result<()> {
        self.entries
            .lock()
            .map_err(|_| CoreError::Audit("audit log poisoned".into()))?
            .push(entry);
        Ok(())
    }

    fn recent(&self, owner: &str, limit: usize) -> Result<Vec<AuditEntry>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::Audit("audit log poisoned".into()))?;
        // Insertion order is chronological, so walking backwards is newest first.
        Ok(entries
            .iter()
            .rev()
            .filter(|e| e.owner == owner)
            .take(limit)
            .cloned()
            .collect())
    }
}
