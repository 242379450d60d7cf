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

//! Configuration type definitions.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use zeroize::Zeroizing;

use crate::ssh::known_hosts::StrictHostKeyChecking;

/// 1 MiB, the size used when the config does not say otherwise.
pub const DEFAULT_TEST_FILE_SIZE: u64 = 1024 * 1024;

/// Used when `server.connect_timeout` is not set.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,

    #[serde(default)]
    pub algorithms: AlgorithmConfig,

    #[serde(default)]
    pub users: Vec<Credential>,

    pub paths: PathsConfig,

    #[serde(default = "default_test_file_size")]
    pub test_file_size: u64,

    /// Checks to run for every user, in this order.
    #[serde(default = "default_checks")]
    pub checks: Vec<CheckKind>,
}

/// Target server and transport settings.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Connect timeout in seconds.
    #[serde(default)]
    pub connect_timeout: Option<u64>,

    #[serde(default)]
    pub host_key_checking: StrictHostKeyChecking,

    /// known_hosts file to use instead of `~/.ssh/known_hosts`.
    #[serde(default)]
    pub known_hosts: Option<PathBuf>,
}

impl ServerConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connect_timeout
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Key exchange, cipher and MAC preferences.
///
/// An empty list keeps the russh default preference order for that slot.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AlgorithmConfig {
    #[serde(default)]
    pub kex: Vec<String>,

    #[serde(default)]
    pub ciphers: Vec<String>,

    #[serde(default)]
    pub macs: Vec<String>,
}

/// One username/password pair to test.
#[derive(Deserialize, Clone)]
pub struct Credential {
    pub user: String,
    pub password: Zeroizing<String>,
}

impl Credential {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: Zeroizing::new(password.into()),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Local and remote file locations used by the checks.
#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    /// Where the round-trip file is uploaded on the server.
    pub remote_test_file: String,

    #[serde(default = "default_local_test_file")]
    pub local_test_file: PathBuf,

    #[serde(default = "default_downloaded_test_file")]
    pub downloaded_test_file: PathBuf,

    /// File the chroot probe tries to create; relative to the login directory.
    #[serde(default = "default_chroot_probe")]
    pub chroot_probe: String,
}

impl PathsConfig {
    pub fn new(remote_test_file: impl Into<String>) -> Self {
        Self {
            remote_test_file: remote_test_file.into(),
            local_test_file: default_local_test_file(),
            downloaded_test_file: default_downloaded_test_file(),
            chroot_probe: default_chroot_probe(),
        }
    }
}

/// The checks that can be run against a session.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    SaveToChroot,
    UploadFile,
    DownloadFile,
    CompareFiles,
    RemoveFile,
}

impl CheckKind {
    /// Default check order. Upload must precede download, download must
    /// precede compare.
    pub const ALL: [CheckKind; 5] = [
        CheckKind::SaveToChroot,
        CheckKind::UploadFile,
        CheckKind::DownloadFile,
        CheckKind::CompareFiles,
        CheckKind::RemoveFile,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CheckKind::SaveToChroot => "save_to_chroot",
            CheckKind::UploadFile => "upload_file",
            CheckKind::DownloadFile => "download_file",
            CheckKind::CompareFiles => "compare_files",
            CheckKind::RemoveFile => "remove_file",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_port() -> u16 {
    22
}

fn default_test_file_size() -> u64 {
    DEFAULT_TEST_FILE_SIZE
}

fn default_checks() -> Vec<CheckKind> {
    CheckKind::ALL.to_vec()
}

fn default_local_test_file() -> PathBuf {
    PathBuf::from("local_test.bin")
}

fn default_downloaded_test_file() -> PathBuf {
    PathBuf::from("SERVER2LOCAL.bin")
}

fn default_chroot_probe() -> String {
    "test.bin".to_string()
}
