//! In-memory activity store.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{ActivityPatch, ActivityStore, NewActivity, StoredActivity};
use crate::day::DayWindow;
use crate::error::{Result, StoreError};

/// Mutex-guarded map of owner to activities.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<StoredActivity>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<StoredActivity>>>> {
        self.records.lock().map_err(|_| StoreError::Locked.into())
    }

    /// Number of activities held for `owner`.
    pub fn count(&self, owner: &str) -> Result<usize> {
        Ok(self.lock()?.get(owner).map_or(0, Vec::len))
    }
}

impl ActivityStore for MemoryStore {
    fn activities_on(&self, owner: &str, day: &DayWindow) -> Result<Vec<StoredActivity>> {
        let records = self.lock()?;
        let mut found: Vec<StoredActivity> = records
            .get(owner)
            .into_iter()
            .flatten()
            .filter(|a| day.overlaps(a.slot.start_time, a.slot.end_time))
            .cloned()
            .collect();
        found.sort_by_key(|a| a.slot.start_time);
        Ok(found)
    }

    fn get(&self, owner: &str, id: &str) -> Result<Option<StoredActivity>> {
        let records = self.lock()?;
        Ok(records
            .get(owner)
            .and_then(|list| list.iter().find(|a| a.id == id))
            .cloned())
    }

    fn insert(&self, owner: &str, activity: NewActivity) -> Result<StoredActivity> {
        let now = Utc::now();
        let stored = StoredActivity {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.to_string(),
            slot: activity.slot,
            status: activity.status,
            ai_reasoning: activity.ai_reasoning,
            created_at: now,
            updated_at: now,
        };
        self.lock()?
            .entry(owner.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    fn update(
        &self,
        owner: &str,
        id: &str,
        patch: &ActivityPatch,
    ) -> Result<Option<StoredActivity>> {
        let mut records = self.lock()?;
        let Some(record) = records
            .get_mut(owner)
            .and_then(|list| list.iter_mut().find(|a| a.id == id))
        else {
            return Ok(None);
        };
        record.slot = patch.apply_to(&record.slot)?;
        if let Some(status) = patch.status {
            record.status = status;
        }
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    fn delete(&self, owner: &str, id: &str) -> Result<bool> {
        let mut records = self.lock()?;
        let Some(list) = records.get_mut(owner) else {
            return Ok(false);
        };
        let before = list.len();
        list.retain(|a| a.id != id);
        Ok(list.len() != before)
    }
}
