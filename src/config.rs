// Copyright (c) 2023 Jean-Daniel Michaud
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::env;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use serde::Deserialize;

use crate::error::DicomError;
use crate::viewport::ZoomSettings;

pub const DEFAULT_CONFIG: &str = include_str!("../config.yaml");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigProvenance {
  Default,
  XdgPath(String),
  CustomPath(String),
}

pub struct ConfigAccess {
  pub content: String,
  pub provenance: ConfigProvenance,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct ViewportSize {
  pub width: u32,
  pub height: u32,
}

impl Default for ViewportSize {
  fn default() -> Self {
    ViewportSize { width: 1024, height: 768 }
  }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
  pub log_level: String,
  pub viewport: ViewportSize,
  pub zoom: ZoomSettings,
  pub background: u8,
}

impl Default for ViewerConfig {
  fn default() -> Self {
    ViewerConfig {
      log_level: "info".to_string(),
      viewport: ViewportSize::default(),
      zoom: ZoomSettings::default(),
      background: 0,
    }
  }
}

impl ViewerConfig {
  pub fn from_yaml(content: &str) -> Result<Self, DicomError> {
    // An empty document deserializes to nothing, keep the defaults then
    if content.trim().is_empty() {
      return Ok(ViewerConfig::default());
    }
    serde_yaml::from_str(content)
      .map_err(|e| DicomError::new(&format!("Invalid configuration: {}", e)))
  }

  pub fn level(&self) -> LevelFilter {
    self.log_level.parse().unwrap_or(LevelFilter::Info)
  }
}

fn is_file_not_empty<P: AsRef<Path>>(path: P) -> bool {
  match std::fs::metadata(path) {
    Ok(metadata) => metadata.is_file() && metadata.len() > 0,
    Err(..) => false,
  }
}

/// `$XDG_CONFIG_HOME/<crate>/config.yaml`, or under `$HOME/.config` when
/// XDG_CONFIG_HOME is not set.
pub fn xdg_config_path() -> Option<PathBuf> {
  let base = env::var_os("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
  Some(base.join(env!("CARGO_PKG_NAME")).join("config.yaml"))
}

// Get the config file from the command line option --config
// Otherwise get it from the XDG path
// Otherwise use the default.
pub fn get_config(
  config_path: &Option<PathBuf>,
  xdg_path: Option<PathBuf>,
  default_config: &str,
) -> Result<ConfigAccess, DicomError> {
  if let Some(config_file) = config_path {
    let content = std::fs::read_to_string(config_file)
      .map_err(|e| DicomError::new(&format!("error: {e}: {}", config_file.display())))?;
    return Ok(ConfigAccess {
      content,
      provenance: ConfigProvenance::CustomPath(config_file.to_string_lossy().to_string()),
    });
  }

  if let Some(xdg_file) = xdg_path.filter(|path| is_file_not_empty(path)) {
    let content = std::fs::read_to_string(&xdg_file)
      .map_err(|e| DicomError::new(&format!("error: {e}: {}", xdg_file.display())))?;
    return Ok(ConfigAccess {
      content,
      provenance: ConfigProvenance::XdgPath(xdg_file.to_string_lossy().to_string()),
    });
  }

  Ok(ConfigAccess {
    content: default_config.to_string(),
    provenance: ConfigProvenance::Default,
  })
}

/// Locate and parse the configuration.
pub fn load(config_path: &Option<PathBuf>) -> Result<(ViewerConfig, ConfigProvenance), DicomError> {
  let access = get_config(config_path, xdg_config_path(), DEFAULT_CONFIG)?;
  Ok((ViewerConfig::from_yaml(&access.content)?, access.provenance))
}
