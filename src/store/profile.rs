use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ConfigOverrides;

const SCHEMA_VERSION: u32 = 1;

/// Session history entries kept per profile.
const HISTORY_LIMIT: usize = 100;

/// Persisted learner progress. The session engine never touches storage
/// directly; the app layer hands it the loaded values and writes back the
/// updates at session end.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    pub lesson_index: usize,
    pub wpm_record: u32,
    pub total_drills: u32,
    #[serde(default)]
    pub overrides: ConfigOverrides,
    #[serde(default)]
    pub history: Vec<SessionRecord>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            lesson_index: 0,
            wpm_record: 0,
            total_drills: 0,
            overrides: ConfigOverrides::default(),
            history: Vec::new(),
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Record a finished session, trimming history to its cap.
    pub fn push_record(&mut self, record: SessionRecord) {
        self.history.push(record);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Utc>,
    pub mode: String,
    pub wpm: u32,
    pub accuracy: u32,
    pub errors: u32,
    pub passed: Option<bool>,
}

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typedrill");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    #[allow(dead_code)] // Used by integration tests
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn profile_path(&self) -> PathBuf {
        self.base_dir.join("profile.json")
    }

    /// Load the profile, falling back to defaults when the file is missing,
    /// unparseable, or carries a stale schema version.
    pub fn load_profile(&self) -> ProfileData {
        let path = self.profile_path();
        if !path.exists() {
            return ProfileData::default();
        }
        let loaded = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<ProfileData>(&content).ok());
        match loaded {
            Some(profile) if !profile.needs_reset() => profile,
            Some(_) => {
                log::warn!("profile schema mismatch, resetting progress");
                ProfileData::default()
            }
            None => {
                log::warn!("unreadable profile file, resetting progress");
                ProfileData::default()
            }
        }
    }

    /// Atomic save: write a temp file, sync, rename over the old one.
    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        let path = self.profile_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}
