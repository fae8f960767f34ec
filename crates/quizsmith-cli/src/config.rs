//! CLI configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizsmith_core::import::ImportDefaults;
use quizsmith_core::model::Difficulty;

/// Defaults applied to bulk-imported questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_points")]
    pub default_points: u32,
    #[serde(default)]
    pub default_difficulty: Option<Difficulty>,
    #[serde(default)]
    pub default_category: Option<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            default_points: default_points(),
            default_difficulty: None,
            default_category: None,
        }
    }
}

/// Defaults applied when a quiz is assembled without explicit passing marks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradingConfig {
    /// Share of total marks needed to pass, in percent.
    #[serde(default = "default_passing_percentage")]
    pub passing_percentage: f64,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            passing_percentage: default_passing_percentage(),
        }
    }
}

/// Top-level quizsmith configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizsmithConfig {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub grading: GradingConfig,
    /// Output directory for attempts and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for QuizsmithConfig {
    fn default() -> Self {
        Self {
            import: ImportConfig::default(),
            grading: GradingConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_points() -> u32 {
    1
}
fn default_passing_percentage() -> f64 {
    50.0
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizsmith-results")
}

impl QuizsmithConfig {
    pub fn import_defaults(&self) -> ImportDefaults {
        ImportDefaults {
            points: Some(self.import.default_points),
            category: self.import.default_category.clone(),
            difficulty: self.import.default_difficulty,
        }
    }

    /// Passing marks for `total_marks` under the configured percentage, rounded up.
    pub fn passing_marks_for(&self, total_marks: u32) -> u32 {
        let pct = self.grading.passing_percentage.clamp(0.0, 100.0);
        (total_marks as f64 * pct / 100.0).ceil() as u32
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizsmith.toml` in the current directory
/// 2. `~/.config/quizsmith/config.toml`
///
/// Environment variable override: `QUIZSMITH_DEFAULT_POINTS`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizsmithConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizsmith.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizsmithConfig::default(),
    };

    if let Ok(points) = std::env::var("QUIZSMITH_DEFAULT_POINTS") {
        config.import.default_points = points
            .trim()
            .parse()
            .with_context(|| format!("invalid QUIZSMITH_DEFAULT_POINTS: {points}"))?;
    }

    Ok(config)
}

fn parse_config(content: &str) -> Result<QuizsmithConfig> {
    Ok(toml::from_str(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizsmith"))
}
