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

use directories::BaseDirs;
use russh::keys::PublicKey;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::Error;
use crate::config::ConfigError;

/// Get the default known_hosts file path
pub fn get_default_known_hosts_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(".ssh").join("known_hosts"))
}

/// Mode for host key checking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum StrictHostKeyChecking {
    /// Always verify host keys (fail on unknown/changed)
    #[default]
    Yes,
    /// Never verify host keys (accept all)
    No,
    /// Verify known hosts, add new ones automatically (TOFU)
    AcceptNew,
}

impl FromStr for StrictHostKeyChecking {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "true" => Ok(Self::Yes),
            "no" | "false" => Ok(Self::No),
            "accept-new" | "tofu" => Ok(Self::AcceptNew),
            _ => Err(ConfigError::InvalidHostKeyChecking {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for StrictHostKeyChecking {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Checks server host keys against a known_hosts file according to a
/// [`StrictHostKeyChecking`] mode.
#[derive(Debug, Clone)]
pub struct HostKeyVerifier {
    mode: StrictHostKeyChecking,
    known_hosts_path: Option<PathBuf>,
}

impl HostKeyVerifier {
    /// Use `known_hosts_path`, or `~/.ssh/known_hosts` when it is `None`.
    pub fn new(mode: StrictHostKeyChecking, known_hosts_path: Option<PathBuf>) -> Self {
        Self {
            mode,
            known_hosts_path: known_hosts_path.or_else(get_default_known_hosts_path),
        }
    }

    pub fn mode(&self) -> StrictHostKeyChecking {
        self.mode
    }

    /// Verify `server_key` for `host:port`. Rejections are returned as
    /// errors so the caller sees why the handshake was aborted.
    pub fn verify(&self, host: &str, port: u16, server_key: &PublicKey) -> Result<bool, Error> {
        match self.mode {
            StrictHostKeyChecking::No => {
                tracing::warn!(
                    "Host key checking disabled, accepting any key for {}:{}",
                    host,
                    port
                );
                Ok(true)
            }
            StrictHostKeyChecking::Yes => {
                let path = self.known_hosts_path()?;
                if !path.exists() {
                    return Err(Error::ServerCheckFailed(format!(
                        "known_hosts file not found at {}",
                        path.display()
                    )));
                }
                tracing::debug!("Using known_hosts file: {:?} (strict mode)", path);
                if lookup(host, port, server_key, path)? {
                    Ok(true)
                } else {
                    Err(Error::HostKeyUnknown {
                        host: host.to_string(),
                        port,
                        known_hosts: path.display().to_string(),
                    })
                }
            }
            StrictHostKeyChecking::AcceptNew => {
                let path = self.known_hosts_path()?;
                ensure_known_hosts_file(path)?;
                tracing::debug!("Using known_hosts file: {:?} (accept-new mode)", path);
                if lookup(host, port, server_key, path)? {
                    return Ok(true);
                }
                russh::keys::known_hosts::learn_known_hosts_path(host, port, server_key, path)
                    .map_err(|e| Error::ServerCheckFailed(e.to_string()))?;
                tracing::warn!(
                    "Learned new host key for {}:{} into {}",
                    host,
                    port,
                    path.display()
                );
                Ok(true)
            }
        }
    }

    fn known_hosts_path(&self) -> Result<&Path, Error> {
        self.known_hosts_path.as_deref().ok_or_else(|| {
            Error::ServerCheckFailed("could not determine known_hosts file path".to_string())
        })
    }
}

/// `Ok(false)` when the host is not listed, an error when it is listed
/// with a different key.
fn lookup(host: &str, port: u16, server_key: &PublicKey, path: &Path) -> Result<bool, Error> {
    match russh::keys::check_known_hosts_path(host, port, server_key, path) {
        Ok(found) => Ok(found),
        Err(russh::keys::Error::KeyChanged { line }) => Err(Error::HostKeyChanged {
            host: host.to_string(),
            port,
            known_hosts: path.display().to_string(),
            line,
        }),
        Err(e) => Err(Error::ServerCheckFailed(e.to_string())),
    }
}

fn ensure_known_hosts_file(path: &Path) -> Result<(), Error> {
    if path.exists() {
        return Ok(());
    }
    if let Some(ssh_dir) = path.parent() {
        std::fs::create_dir_all(ssh_dir).map_err(|e| {
            Error::ServerCheckFailed(format!("cannot create {}: {e}", ssh_dir.display()))
        })?;
    }
    std::fs::File::create(path).map_err(|e| {
        Error::ServerCheckFailed(format!("cannot create {}: {e}", path.display()))
    })?;
    tracing::debug!("Created empty known_hosts file at {:?}", path);
    Ok(())
}
