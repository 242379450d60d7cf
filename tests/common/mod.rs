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

//! Scratch-directory SFTP stand-ins shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use sftpcheck::config::{Config, Credential};
use sftpcheck::sftp::{Connector, RemoteError, RemoteFs};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// How the fake server behaves for every connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerBehavior {
    /// Allow writes into the login directory (a broken chroot).
    pub writable_root: bool,
    /// Flip a byte in every file served for download.
    pub corrupt_downloads: bool,
}

pub struct ScratchRemote {
    root: PathBuf,
    behavior: ServerBehavior,
}

impl ScratchRemote {
    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn is_login_root(path: &str) -> bool {
        !path.starts_with('/') && !path.contains('/')
    }
}

fn map_io(path: &str, e: io::Error) -> RemoteError {
    match e.kind() {
        io::ErrorKind::NotFound => RemoteError::NotFound(path.to_string()),
        io::ErrorKind::PermissionDenied => RemoteError::PermissionDenied(path.to_string()),
        _ => RemoteError::Io(e),
    }
}

#[async_trait]
impl RemoteFs for ScratchRemote {
    type File = tokio::fs::File;

    async fn create(&self, path: &str) -> Result<Self::File, RemoteError> {
        if Self::is_login_root(path) && !self.behavior.writable_root {
            return Err(RemoteError::PermissionDenied(path.to_string()));
        }
        tokio::fs::File::create(self.resolve(path))
            .await
            .map_err(|e| map_io(path, e))
    }

    async fn open(&self, path: &str) -> Result<Self::File, RemoteError> {
        let local = self.resolve(path);
        if self.behavior.corrupt_downloads {
            let mut data = tokio::fs::read(&local).await.map_err(|e| map_io(path, e))?;
            if let Some(first) = data.first_mut() {
                *first ^= 0xff;
            }
            let corrupted = local.with_extension("corrupted");
            tokio::fs::write(&corrupted, data).await?;
            return Ok(tokio::fs::File::open(corrupted).await?);
        }
        tokio::fs::File::open(local)
            .await
            .map_err(|e| map_io(path, e))
    }

    async fn remove_file(&self, path: &str) -> Result<(), RemoteError> {
        tokio::fs::remove_file(self.resolve(path))
            .await
            .map_err(|e| map_io(path, e))
    }

    async fn close(&self) -> Result<(), RemoteError> {
        Ok(())
    }
}

/// Accepts known username/password pairs; every session shares one
/// scratch directory as its filesystem.
pub struct ScratchConnector {
    root: TempDir,
    accounts: Vec<(String, String)>,
    behavior: ServerBehavior,
    pub attempts: Mutex<Vec<String>>,
}

impl ScratchConnector {
    pub fn new(accounts: &[(&str, &str)], behavior: ServerBehavior) -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("files")).unwrap();
        Self {
            root,
            accounts: accounts
                .iter()
                .map(|(u, p)| (u.to_string(), p.to_string()))
                .collect(),
            behavior,
            attempts: Mutex::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }
}

#[async_trait]
impl Connector for ScratchConnector {
    type Connection = ScratchRemote;

    async fn connect(&self, credential: &Credential) -> Result<ScratchRemote, sftpcheck::ssh::Error> {
        self.attempts.lock().unwrap().push(credential.user.clone());
        let known = self
            .accounts
            .iter()
            .any(|(u, p)| *u == credential.user && p.as_str() == credential.password.as_str());
        if !known {
            return Err(sftpcheck::ssh::Error::PasswordWrong);
        }
        Ok(ScratchRemote {
            root: self.root.path().to_path_buf(),
            behavior: self.behavior,
        })
    }
}

/// A validated config whose local files live in `local`.
pub fn config_for(local: &Path, users: &[(&str, &str)], size: u64) -> Config {
    let users_yaml: String = users
        .iter()
        .map(|(u, p)| format!("  - user: {u}\n    password: {p}\n"))
        .collect();
    let yaml = format!(
        r#"
server:
  host: sftp.example.com
users:
{users_yaml}paths:
  remote_test_file: /files/test.bin
  local_test_file: {}
  downloaded_test_file: {}
test_file_size: {size}
"#,
        local.join("local_test.bin").display(),
        local.join("SERVER2LOCAL.bin").display(),
    );
    Config::from_yaml(&yaml).unwrap()
}
