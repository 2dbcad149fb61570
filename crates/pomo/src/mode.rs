//! Timing modes and the JSON-backed mode registry
//!
//! A mode is a named timing profile: work/break/long-break lengths in minutes
//! and how often a long break replaces a regular one. Modes live in
//! `modes.json` as a `name -> profile` object.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::PomoError;

/// Name of the mode seeded into a fresh registry
pub const DEFAULT_MODE: &str = "default";

/// All modes, keyed by name
pub type ModeMap = BTreeMap<String, Mode>;

/// A named timing profile (all durations in minutes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mode {
    pub work_time: u32,
    pub break_time: u32,
    pub long_break_time: u32,
    /// Every Nth break is a long one
    pub long_break_freq: u32,
}

impl Default for Mode {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Mode {
    /// 20/5/15, long break every 4th
    pub const DEFAULT: Mode = Mode::new(20, 5, 15, 4);

    pub const fn new(
        work_time: u32,
        break_time: u32,
        long_break_time: u32,
        long_break_freq: u32,
    ) -> Self {
        Self {
            work_time,
            break_time,
            long_break_time,
            long_break_freq,
        }
    }

    /// Reject zero durations and a zero long-break frequency
    pub fn validate(&self) -> Result<(), PomoError> {
        let fields = [
            ("work_time", self.work_time),
            ("break_time", self.break_time),
            ("long_break_time", self.long_break_time),
            ("long_break_freq", self.long_break_freq),
        ];

        for (name, value) in fields {
            if value == 0 {
                return Err(PomoError::InvalidModeConfig(format!(
                    "{} must be a positive integer",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Fields as (name, value) pairs for listing
    pub fn fields(&self) -> [(&'static str, u32); 4] {
        [
            ("work_time", self.work_time),
            ("break_time", self.break_time),
            ("long_break_time", self.long_break_time),
            ("long_break_freq", self.long_break_freq),
        ]
    }
}

/// Partial update applied by `edit`
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeUpdate {
    pub work_time: Option<u32>,
    pub break_time: Option<u32>,
    pub long_break_time: Option<u32>,
    pub long_break_freq: Option<u32>,
}

impl ModeUpdate {
    pub fn is_empty(&self) -> bool {
        self.work_time.is_none()
            && self.break_time.is_none()
            && self.long_break_time.is_none()
            && self.long_break_freq.is_none()
    }

    fn apply(&self, mode: &Mode) -> Mode {
        Mode {
            work_time: self.work_time.unwrap_or(mode.work_time),
            break_time: self.break_time.unwrap_or(mode.break_time),
            long_break_time: self.long_break_time.unwrap_or(mode.long_break_time),
            long_break_freq: self.long_break_freq.unwrap_or(mode.long_break_freq),
        }
    }
}

/// Modes written into a fresh registry
pub fn seed_modes() -> ModeMap {
    [
        (DEFAULT_MODE, Mode::DEFAULT),
        ("52/17", Mode::new(52, 17, 30, 4)),
        ("90/30", Mode::new(90, 30, 45, 4)),
    ]
    .into_iter()
    .map(|(name, mode)| (name.to_string(), mode))
    .collect()
}

/// Look a mode up by name
pub fn lookup(modes: &ModeMap, name: &str) -> Result<Mode, PomoError> {
    modes
        .get(name)
        .copied()
        .ok_or_else(|| PomoError::ModeNotFound(name.to_string()))
}

/// Mode registry backed by a JSON file
pub struct ModeRegistry {
    path: PathBuf,
}

impl ModeRegistry {
    /// Open the registry, seeding it with [`seed_modes`] if the file is absent
    pub fn open(path: &Path) -> Result<Self> {
        let registry = Self {
            path: path.to_path_buf(),
        };

        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create mode directory: {}", parent.display())
                })?;
            }
            debug!("Seeding mode registry at {}", path.display());
            registry.save(&seed_modes())?;
        }

        Ok(registry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate every mode
    pub fn load(&self) -> Result<ModeMap> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read modes: {}", self.path.display()))?;

        let modes: ModeMap = serde_json::from_str(&content)
            .map_err(|e| PomoError::InvalidModeConfig(e.to_string()))?;

        for (name, mode) in &modes {
            mode.validate().map_err(|e| match e {
                PomoError::InvalidModeConfig(reason) => {
                    PomoError::InvalidModeConfig(format!("mode \"{}\": {}", name, reason))
                }
                other => other,
            })?;
        }

        Ok(modes)
    }

    /// Replace the whole registry file
    pub fn save(&self, modes: &ModeMap) -> Result<()> {
        let content = serde_json::to_string_pretty(modes).context("Failed to serialize modes")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write modes: {}", self.path.display()))
    }

    /// Resolve a mode by name
    pub fn get(&self, name: &str) -> Result<Mode> {
        let modes = self.load()?;
        Ok(lookup(&modes, name)?)
    }

    pub fn add(&self, name: &str, mode: Mode) -> Result<()> {
        mode.validate()?;
        let mut modes = self.load()?;
        if modes.contains_key(name) {
            return Err(PomoError::ModeExists(name.to_string()).into());
        }
        modes.insert(name.to_string(), mode);
        self.save(&modes)
    }

    pub fn delete(&self, name: &str) -> Result<Mode> {
        let mut modes = self.load()?;
        let removed = modes
            .remove(name)
            .ok_or_else(|| PomoError::ModeNotFound(name.to_string()))?;
        self.save(&modes)?;
        Ok(removed)
    }

    /// Apply a partial update and return the new profile
    pub fn edit(&self, name: &str, update: ModeUpdate) -> Result<Mode> {
        let mut modes = self.load()?;
        let current = lookup(&modes, name)?;
        let updated = update.apply(&current);
        updated.validate()?;
        modes.insert(name.to_string(), updated);
        self.save(&modes)?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_registry() -> (ModeRegistry, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let registry = ModeRegistry::open(&dir.path().join("modes.json")).unwrap();
        (registry, dir)
    }

    fn pomo_err(err: &anyhow::Error) -> &PomoError {
        err.downcast_ref::<PomoError>().expect("expected a PomoError")
    }

    #[test]
    fn test_open_seeds_modes() {
        let (registry, _dir) = temp_registry();
        let modes = registry.load().unwrap();
        assert_eq!(modes.len(), 3);
        assert_eq!(modes[DEFAULT_MODE], Mode::new(20, 5, 15, 4));
        assert_eq!(modes["52/17"], Mode::new(52, 17, 30, 4));
        assert_eq!(modes["90/30"], Mode::new(90, 30, 45, 4));
        assert_eq!(Mode::default(), modes[DEFAULT_MODE]);
    }

    #[test]
    fn test_open_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modes.json");
        fs::write(
            &path,
            r#"{"quick": {"work_time": 15, "break_time": 3, "long_break_time": 10, "long_break_freq": 2}}"#,
        )
        .unwrap();

        let registry = ModeRegistry::open(&path).unwrap();
        let modes = registry.load().unwrap();
        assert!(modes.contains_key("quick"));
        assert!(!modes.contains_key(DEFAULT_MODE));
    }

    #[test]
    fn test_get_unknown_mode() {
        let (registry, _dir) = temp_registry();
        let err = registry.get("deep").unwrap_err();
        assert_eq!(pomo_err(&err), &PomoError::ModeNotFound("deep".into()));
    }

    #[test]
    fn test_add_and_get() {
        let (registry, _dir) = temp_registry();
        let deep = Mode {
            work_time: 90,
            break_time: 20,
            long_break_time: 30,
            long_break_freq: 2,
        };
        registry.add("deep", deep).unwrap();
        assert_eq!(registry.get("deep").unwrap(), deep);

        let err = registry.add("deep", deep).unwrap_err();
        assert_eq!(pomo_err(&err), &PomoError::ModeExists("deep".into()));
    }

    #[test]
    fn test_add_rejects_zero_freq() {
        let (registry, _dir) = temp_registry();
        let bad = Mode {
            long_break_freq: 0,
            ..Mode::default()
        };
        let err = registry.add("bad", bad).unwrap_err();
        assert!(matches!(pomo_err(&err), PomoError::InvalidModeConfig(_)));
        assert!(registry.get("bad").is_err());
    }

    #[test]
    fn test_delete() {
        let (registry, _dir) = temp_registry();
        let removed = registry.delete("90/30").unwrap();
        assert_eq!(removed, Mode::new(90, 30, 45, 4));
        let modes = registry.load().unwrap();
        assert_eq!(modes.len(), 2);
        assert!(!modes.contains_key("90/30"));

        registry.delete("52/17").unwrap();
        registry.delete(DEFAULT_MODE).unwrap();
        assert!(registry.load().unwrap().is_empty());

        let err = registry.delete(DEFAULT_MODE).unwrap_err();
        assert!(matches!(pomo_err(&err), PomoError::ModeNotFound(_)));
    }

    #[test]
    fn test_edit_partial() {
        let (registry, _dir) = temp_registry();
        let update = ModeUpdate {
            work_time: Some(50),
            ..Default::default()
        };
        let updated = registry.edit(DEFAULT_MODE, update).unwrap();
        assert_eq!(updated.work_time, 50);
        assert_eq!(updated.break_time, 5);
        assert_eq!(registry.get(DEFAULT_MODE).unwrap(), updated);
    }

    #[test]
    fn test_edit_rejects_invalid_result() {
        let (registry, _dir) = temp_registry();
        let update = ModeUpdate {
            break_time: Some(0),
            ..Default::default()
        };
        assert!(registry.edit(DEFAULT_MODE, update).is_err());
        assert_eq!(registry.get(DEFAULT_MODE).unwrap(), Mode::default());
    }

    #[test]
    fn test_load_rejects_malformed_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modes.json");
        let registry = ModeRegistry::open(&path).unwrap();

        for content in [
            r#"{"x": {"work_time": 25, "break_time": 5, "long_break_time": 15}}"#,
            r#"{"x": {"work_time": -1, "break_time": 5, "long_break_time": 15, "long_break_freq": 4}}"#,
            r#"{"x": {"work_time": "25", "break_time": 5, "long_break_time": 15, "long_break_freq": 4}}"#,
            r#"{"x": {"work_time": 25, "break_time": 5, "long_break_time": 15, "long_break_freq": 0}}"#,
        ] {
            fs::write(&path, content).unwrap();
            let err = registry.load().unwrap_err();
            assert!(
                matches!(pomo_err(&err), PomoError::InvalidModeConfig(_)),
                "content: {}",
                content
            );
        }
    }
}
