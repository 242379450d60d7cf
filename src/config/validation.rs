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

//! Validation and normalisation of a parsed configuration.

use std::collections::HashSet;
use zeroize::Zeroizing;

use super::error::ConfigError;
use super::types::Config;
use super::utils::{expand_env_vars, expand_tilde};

/// Returns true for template values such as `ENTER KEX HERE` or
/// `IP ADDRESS HERE` that were never filled in.
pub fn is_placeholder(value: &str) -> bool {
    let upper = value.trim().to_ascii_uppercase();
    upper.starts_with("ENTER ") || upper.ends_with(" HERE") || upper.ends_with("_HERE")
}

fn require(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty {
            field: field.to_string(),
        });
    }
    if is_placeholder(value) {
        return Err(ConfigError::Placeholder {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}

impl Config {
    /// Expand `${VAR}` references and `~` in the fields where they make sense.
    pub fn resolve(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand_env_vars("server.host", &self.server.host)?;
        if let Some(known_hosts) = &self.server.known_hosts {
            self.server.known_hosts = Some(expand_tilde(known_hosts));
        }

        for (i, credential) in self.users.iter_mut().enumerate() {
            credential.user = expand_env_vars(&format!("users[{i}].user"), &credential.user)?;
            let password =
                expand_env_vars(&format!("users[{i}].password"), credential.password.as_str())?;
            credential.password = Zeroizing::new(password);
        }

        self.paths.remote_test_file =
            expand_env_vars("paths.remote_test_file", &self.paths.remote_test_file)?;
        self.paths.local_test_file = expand_tilde(&self.paths.local_test_file);
        self.paths.downloaded_test_file = expand_tilde(&self.paths.downloaded_test_file);

        Ok(())
    }

    /// Check that the configuration can drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("server.host", &self.server.host)?;
        if self.server.port == 0 {
            return Err(ConfigError::InvalidPort);
        }

        if self.users.is_empty() {
            return Err(ConfigError::NoUsers);
        }
        for (i, credential) in self.users.iter().enumerate() {
            require(&format!("users[{i}].user"), &credential.user)?;
            // Empty passwords are legal; placeholders are not.
            if is_placeholder(&credential.password) {
                return Err(ConfigError::Placeholder {
                    field: format!("users[{i}].password"),
                    value: "<redacted>".to_string(),
                });
            }
        }

        require("paths.remote_test_file", &self.paths.remote_test_file)?;
        require("paths.chroot_probe", &self.paths.chroot_probe)?;
        if self.paths.local_test_file == self.paths.downloaded_test_file {
            return Err(ConfigError::SameLocalPaths {
                path: self.paths.local_test_file.display().to_string(),
            });
        }

        if self.test_file_size == 0 {
            return Err(ConfigError::ZeroFileSize);
        }

        let mut seen = HashSet::new();
        for check in &self.checks {
            if !seen.insert(*check) {
                return Err(ConfigError::DuplicateCheck {
                    name: check.name().to_string(),
                });
            }
        }

        for (field, names) in [
            ("algorithms.kex", &self.algorithms.kex),
            ("algorithms.ciphers", &self.algorithms.ciphers),
            ("algorithms.macs", &self.algorithms.macs),
        ] {
            for name in names {
                require(field, name)?;
            }
        }
        crate::ssh::algorithms::build_preferred(&self.algorithms)?;

        Ok(())
    }

    /// Keep only the named users, in configuration order.
    pub fn retain_users(&mut self, names: &[String]) -> Result<(), ConfigError> {
        if names.is_empty() {
            return Ok(());
        }
        if let Some(unknown) = names
            .iter()
            .find(|name| !self.users.iter().any(|c| &c.user == *name))
        {
            return Err(ConfigError::UnknownUser {
                name: unknown.clone(),
            });
        }
        self.users.retain(|c| names.contains(&c.user));
        Ok(())
    }
}
