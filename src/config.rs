//! Placeholder texts and labels used when the store creates new items.
//!
//! Read from `config.json` in the platform config directory. Every field is
//! optional in the file; missing ones keep their built-in value.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Segment;

const APP_NAME: &str = "gymtrack";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Prefix for new workout titles, numbered per segment ("Workout 2").
    pub workout_title: String,
    /// Prefix for new exercise names, numbered per workout ("Exercise 3").
    pub exercise_name: String,
    /// Repetitions written into every new set.
    pub repetitions: String,
    /// Weight written into every new set.
    pub weight: String,
    pub segment_labels: SegmentLabels,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            workout_title: "Workout".to_string(),
            exercise_name: "Exercise".to_string(),
            repetitions: "10".to_string(),
            weight: "75 kg".to_string(),
            segment_labels: SegmentLabels::default(),
        }
    }
}

/// Display names for the fixed segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentLabels {
    pub back: String,
    pub chest: String,
    pub legs: String,
}

impl Default for SegmentLabels {
    fn default() -> Self {
        Self {
            back: "Back".to_string(),
            chest: "Chest".to_string(),
            legs: "Legs".to_string(),
        }
    }
}

impl SegmentLabels {
    pub fn label(&self, segment: Segment) -> &str {
        match segment {
            Segment::Back => &self.back,
            Segment::Chest => &self.chest,
            Segment::Legs => &self.legs,
        }
    }
}

impl Defaults {
    /// Load defaults from the user's config directory.
    /// Falls back to built-in values if the file is missing or unreadable.
    pub fn load() -> Self {
        match get_config_path().and_then(|path| Self::load_from(&path)) {
            Ok(defaults) => defaults,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let defaults = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(defaults)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub(crate) fn workout_title(&self, n: usize) -> String {
        format!("{} {}", self.workout_title, n)
    }

    pub(crate) fn exercise_name(&self, n: usize) -> String {
        format!("{} {}", self.exercise_name, n)
    }
}

pub fn get_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}
