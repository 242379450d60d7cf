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

//! Directory-backed stand-in for an SFTP server, used by unit tests.

use async_trait::async_trait;
use russh_sftp::protocol::StatusCode;
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::sftp::{RemoteError, RemoteFs};

/// Remote paths map onto a temporary directory. Individual paths can be
/// made to refuse creation, to accept creation but fail writes, or to
/// refuse removal.
pub struct DirRemote {
    root: TempDir,
    deny_create: HashSet<String>,
    deny_write: HashSet<String>,
    deny_remove: HashSet<String>,
    fail_remove: HashSet<String>,
}

impl DirRemote {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("create temp dir"),
            deny_create: HashSet::new(),
            deny_write: HashSet::new(),
            deny_remove: HashSet::new(),
            fail_remove: HashSet::new(),
        }
    }

    pub fn deny_create(mut self, path: &str) -> Self {
        self.deny_create.insert(path.to_string());
        self
    }

    pub fn deny_write(mut self, path: &str) -> Self {
        self.deny_write.insert(path.to_string());
        self
    }

    pub fn deny_remove(mut self, path: &str) -> Self {
        self.deny_remove.insert(path.to_string());
        self
    }

    /// Removal of `path` fails with a generic SFTP failure status.
    pub fn fail_remove(mut self, path: &str) -> Self {
        self.fail_remove.insert(path.to_string());
        self
    }

    pub fn local_path(&self, path: &str) -> PathBuf {
        self.root.path().join(path.trim_start_matches('/'))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.local_path(path).exists()
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
impl RemoteFs for DirRemote {
    type File = tokio::fs::File;

    async fn create(&self, path: &str) -> Result<Self::File, RemoteError> {
        if self.deny_create.contains(path) {
            return Err(RemoteError::PermissionDenied(path.to_string()));
        }
        let local = self.local_path(path);
        let file = tokio::fs::File::create(&local)
            .await
            .map_err(|e| map_io(path, e))?;
        if self.deny_write.contains(path) {
            drop(file);
            // A read-only handle makes every write fail.
            return tokio::fs::OpenOptions::new()
                .read(true)
                .open(&local)
                .await
                .map_err(|e| map_io(path, e));
        }
        Ok(file)
    }

    async fn open(&self, path: &str) -> Result<Self::File, RemoteError> {
        tokio::fs::File::open(self.local_path(path))
            .await
            .map_err(|e| map_io(path, e))
    }

    async fn remove_file(&self, path: &str) -> Result<(), RemoteError> {
        if self.deny_remove.contains(path) {
            return Err(RemoteError::PermissionDenied(path.to_string()));
        }
        if self.fail_remove.contains(path) {
            return Err(RemoteError::Status {
                code: StatusCode::Failure,
                message: "Failure".to_string(),
            });
        }
        tokio::fs::remove_file(self.local_path(path))
            .await
            .map_err(|e| map_io(path, e))
    }

    async fn close(&self) -> Result<(), RemoteError> {
        Ok(())
    }
}
