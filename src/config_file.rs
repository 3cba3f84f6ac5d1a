use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cli::{check_colors, parse_resize};
use crate::image_processing::Dimensions;

/// JSON configuration file.
///
/// Every key is optional; values given on the command line take precedence.
///
/// ```json
/// { "duration": 80, "loop": 0, "colors": 128, "resize": "640x480", "optimize": true }
/// ```
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub duration: Option<u32>,
    #[serde(rename = "loop")]
    pub loop_count: Option<u16>,
    pub colors: Option<i64>,
    pub resize: Option<String>,
    pub optimize: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    pub fn duration(&self) -> Result<Option<u32>> {
        match self.duration {
            Some(0) => Err(anyhow::anyhow!("Config 'duration' must be at least 1ms")),
            other => Ok(other),
        }
    }

    pub fn colors(&self) -> Result<Option<u16>> {
        self.colors
            .map(|colors| {
                check_colors(colors).map_err(|e| anyhow::anyhow!("Config 'colors': {}", e))
            })
            .transpose()
    }

    pub fn resize(&self) -> Result<Option<Dimensions>> {
        self.resize
            .as_deref()
            .map(|value| {
                parse_resize(value).map_err(|e| anyhow::anyhow!("Config 'resize': {}", e))
            })
            .transpose()
    }
}
