//! Best-time records and preferences
//!
//! One JSON record in a key-value store, camelCase to stay compatible with
//! payloads written by earlier builds. Loads never fail: a missing or
//! malformed record degrades to defaults, and individual missing fields
//! fall back one by one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::platform::StorageBackend;

/// Storage key for the single persisted record
pub const STORAGE_KEY: &str = "chromaShift_data";

/// The persisted record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    /// Best finishing time per level id (seconds, lower is better)
    pub best_times: BTreeMap<u8, f64>,
    /// Earlier builds persisted this as `currentLevel`
    #[serde(alias = "currentLevel")]
    pub selected_level: u8,
    pub sound_enabled: bool,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            best_times: BTreeMap::new(),
            selected_level: 1,
            sound_enabled: true,
        }
    }
}

/// Store for the persisted record
pub struct Records {
    backend: Box<dyn StorageBackend>,
}

impl Records {
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Read the record, falling back to defaults on anything unexpected
    pub fn load(&self) -> SaveData {
        let Some(raw) = self.backend.read(STORAGE_KEY) else {
            return SaveData::default();
        };
        match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(err) => {
                log::warn!("Discarding malformed save data: {err}");
                SaveData::default()
            }
        }
    }

    /// Persist the record, dropping write failures
    pub fn save(&self, data: &SaveData) {
        if let Ok(json) = serde_json::to_string(data) {
            self.backend.write(STORAGE_KEY, &json);
        }
    }

    /// Best time for a level, if one has been recorded
    pub fn best_time(&self, level_id: u8) -> Option<f64> {
        self.load().best_times.get(&level_id).copied()
    }

    /// Record a finishing time. Returns true when it strictly improves on
    /// the stored best (or none existed). The record is re-persisted either
    /// way so pending preference changes get flushed.
    pub fn record_best_time(&self, level_id: u8, time: f64) -> bool {
        let mut data = self.load();
        let improved = data
            .best_times
            .get(&level_id)
            .is_none_or(|&best| time < best);
        if improved {
            data.best_times.insert(level_id, time);
        }
        self.save(&data);
        improved
    }

    /// Overwrite the preference fields and persist
    pub fn set_preferences(&self, selected_level: u8, sound_enabled: bool) {
        let mut data = self.load();
        data.selected_level = selected_level;
        data.sound_enabled = sound_enabled;
        self.save(&data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStorage;

    fn records() -> Records {
        Records::new(Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_load_missing_yields_defaults() {
        let records = records();
        assert_eq!(records.load(), SaveData::default());
    }

    #[test]
    fn test_load_malformed_yields_defaults() {
        let storage = MemoryStorage::new();
        storage.write(STORAGE_KEY, "not json {{{");
        let records = Records::new(Box::new(storage));
        assert_eq!(records.load(), SaveData::default());
    }

    #[test]
    fn test_missing_fields_fall_back_individually() {
        let storage = MemoryStorage::new();
        storage.write(STORAGE_KEY, r#"{"bestTimes":{"2":14.5}}"#);
        let records = Records::new(Box::new(storage));
        let data = records.load();
        assert_eq!(data.best_times.get(&2), Some(&14.5));
        assert_eq!(data.selected_level, 1);
        assert!(data.sound_enabled);
    }

    #[test]
    fn test_reads_legacy_current_level_field() {
        let storage = MemoryStorage::new();
        storage.write(
            STORAGE_KEY,
            r#"{"bestTimes":{"1":13.2},"currentLevel":4,"soundEnabled":false}"#,
        );
        let records = Records::new(Box::new(storage));
        let data = records.load();
        assert_eq!(data.selected_level, 4);
        assert_eq!(data.best_times.get(&1), Some(&13.2));
        assert!(!data.sound_enabled);
    }

    #[test]
    fn test_record_best_time_strict_improvement() {
        let records = records();
        assert!(records.record_best_time(1, 20.0)); // absent counts as improved
        assert!(records.record_best_time(1, 15.0));
        assert!(!records.record_best_time(1, 15.0)); // equal is not better
        assert!(!records.record_best_time(1, 18.0));
        assert_eq!(records.best_time(1), Some(15.0));
    }

    #[test]
    fn test_non_improving_write_still_flushes_preferences() {
        let records = records();
        records.record_best_time(3, 16.0);
        records.set_preferences(3, false);
        assert!(!records.record_best_time(3, 19.0));

        let data = records.load();
        assert_eq!(data.best_times.get(&3), Some(&16.0));
        assert_eq!(data.selected_level, 3);
        assert!(!data.sound_enabled);
    }

    #[test]
    fn test_best_times_are_per_level() {
        let records = records();
        records.record_best_time(1, 12.0);
        records.record_best_time(4, 35.0);
        assert_eq!(records.best_time(1), Some(12.0));
        assert_eq!(records.best_time(4), Some(35.0));
        assert_eq!(records.best_time(2), None);
    }
}
