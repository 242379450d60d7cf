// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Configuration loading and priority management.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::types::Config;
use super::utils::expand_tilde;

const CONFIG_FILE_NAME: &str = "sftpcheck.yaml";

impl Config {
    /// Parse a configuration from YAML text, then resolve and validate it.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(content).context(
            "Failed to parse YAML configuration.\nCommon issues:\n  - Incorrect indentation (use spaces, not tabs)\n  - Missing colons after keys\n  - Missing required sections 'server' or 'paths'",
        )?;
        config.resolve()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file.
    pub async fn load(path: &Path) -> Result<Self> {
        let expanded_path = expand_tilde(path);

        let content = fs::read_to_string(&expanded_path)
            .await
            .with_context(|| format!("Failed to read configuration file at {}. Please check the file exists and is readable.", expanded_path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Invalid configuration in {}", expanded_path.display()))
    }

    /// Load configuration with priority order:
    /// 1. Explicit --config path (must exist)
    /// 2. `sftpcheck.yaml` in the current directory
    /// 3. XDG config directory (`~/.config/sftpcheck/config.yaml`)
    pub async fn load_with_priority(cli_config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = cli_config_path {
            tracing::debug!("Using explicitly specified config file: {:?}", path);
            return Self::load(path).await;
        }

        let candidates = Self::default_locations();
        for candidate in &candidates {
            if candidate.exists() {
                tracing::debug!("Found config file at {:?}", candidate);
                return Self::load(candidate).await;
            }
        }

        anyhow::bail!(
            "No configuration file found. Looked in:\n{}\nCreate one or pass --config <FILE>.",
            candidates
                .iter()
                .map(|p| format!("  - {}", p.display()))
                .collect::<Vec<_>>()
                .join("\n")
        )
    }

    fn default_locations() -> Vec<PathBuf> {
        let mut locations = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dirs) = ProjectDirs::from("", "", "sftpcheck") {
            locations.push(dirs.config_dir().join("config.yaml"));
        }
        locations
    }
}
