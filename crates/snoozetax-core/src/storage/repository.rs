//! Typed persistence over any key-value store.
//!
//! Each piece of state lives under its own key as JSON. `load_*` surfaces
//! corrupt data as [`StorageError::Corrupt`]; the `*_or_default` variants
//! log it and fall back to the empty state. A missing key is simply the
//! empty state.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::alarm::{Alarm, TriggerState};
use crate::error::StorageError;
use crate::ledger::DebtRecord;

const ALARM_KEY: &str = "saved_alarm";
const TRIGGER_KEY: &str = "alarm_trigger";
const DEBTS_KEY: &str = "debt_records";
const PARTNER_KEY: &str = "partner_username";

pub trait KvStore: Send {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn kv_delete(&self, key: &str) -> Result<(), StorageError>;

    /// Write several keys as one unit. Stores that can do so atomically
    /// should override this.
    fn kv_set_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.kv_set(key, value)?;
        }
        Ok(())
    }
}

/// Process-local store for tests and ephemeral hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .values
            .lock()
            .map_err(|_| StorageError::Locked)?
            .get(key)
            .cloned())
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .map_err(|_| StorageError::Locked)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn kv_delete(&self, key: &str) -> Result<(), StorageError> {
        self.values
            .lock()
            .map_err(|_| StorageError::Locked)?
            .remove(key);
        Ok(())
    }

    fn kv_set_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::Locked)?;
        for (key, value) in entries {
            values.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

pub struct StateRepository<S> {
    store: S,
}

impl<S: KvStore> StateRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // ── Alarm slot ───────────────────────────────────────────────────

    pub fn load_alarm(&self) -> Result<Option<Alarm>, StorageError> {
        self.load_json(ALARM_KEY)
    }

    /// `None` clears the slot.
    pub fn save_alarm(&self, alarm: Option<&Alarm>) -> Result<(), StorageError> {
        match alarm {
            Some(alarm) => self.save_json(ALARM_KEY, alarm),
            None => self.store.kv_delete(ALARM_KEY),
        }
    }

    pub fn load_alarm_or_default(&self) -> Option<Alarm> {
        or_default(ALARM_KEY, self.load_alarm()).flatten()
    }

    // ── Trigger bookkeeping ──────────────────────────────────────────

    pub fn load_trigger(&self) -> Result<TriggerState, StorageError> {
        Ok(self.load_json(TRIGGER_KEY)?.unwrap_or_default())
    }

    pub fn save_trigger(&self, trigger: &TriggerState) -> Result<(), StorageError> {
        self.save_json(TRIGGER_KEY, trigger)
    }

    pub fn load_trigger_or_default(&self) -> TriggerState {
        or_default(TRIGGER_KEY, self.load_trigger()).unwrap_or_default()
    }

    // ── Debt ledger ──────────────────────────────────────────────────

    pub fn load_records(&self) -> Result<Vec<DebtRecord>, StorageError> {
        Ok(self.load_json(DEBTS_KEY)?.unwrap_or_default())
    }

    pub fn save_records(&self, records: &[DebtRecord]) -> Result<(), StorageError> {
        self.save_json(DEBTS_KEY, records)
    }

    pub fn load_records_or_default(&self) -> Vec<DebtRecord> {
        or_default(DEBTS_KEY, self.load_records()).unwrap_or_default()
    }

    /// Persist a charged snooze: the alarm, its trigger state and the ledger
    /// land together or not at all.
    pub fn save_snooze(
        &self,
        alarm: &Alarm,
        trigger: &TriggerState,
        records: &[DebtRecord],
    ) -> Result<(), StorageError> {
        let entries = [
            (ALARM_KEY, encode(ALARM_KEY, alarm)?),
            (TRIGGER_KEY, encode(TRIGGER_KEY, trigger)?),
            (DEBTS_KEY, encode(DEBTS_KEY, records)?),
        ];
        self.store.kv_set_all(&entries)
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn load_partner(&self) -> Result<Option<String>, StorageError> {
        self.load_json(PARTNER_KEY)
    }

    /// Blank or `None` unsets the partner.
    pub fn save_partner(&self, username: Option<&str>) -> Result<(), StorageError> {
        match username.map(str::trim).filter(|u| !u.is_empty()) {
            Some(username) => self.save_json(PARTNER_KEY, &username),
            None => self.store.kv_delete(PARTNER_KEY),
        }
    }

    pub fn load_partner_or_default(&self) -> Option<String> {
        or_default(PARTNER_KEY, self.load_partner()).flatten()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.kv_get(key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StorageError::Corrupt {
                key: key.to_string(),
                source,
            })
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.store.kv_set(key, &encode(key, value)?)
    }
}

fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_string(),
        source,
    })
}

fn or_default<T>(key: &str, loaded: Result<T, StorageError>) -> Option<T> {
    match loaded {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring unreadable stored state");
            None
        }
    }
}
