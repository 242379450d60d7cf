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

//! The individual checks run against every user's session.
//!
//! Each check is a unit type implementing [`SftpCheck`]. The runner only
//! sees the list produced by [`build_checks`], so enabling, disabling or
//! reordering checks is a configuration change.
//!
//! Checks never return errors: every failure is folded into the
//! [`CheckResult`] message and the next check still runs.

mod chroot;
mod compare;
#[cfg(test)]
pub(crate) mod fake;
mod remove;
mod transfer;

use async_trait::async_trait;

use crate::config::{CheckKind, PathsConfig};
use crate::sftp::RemoteFs;

pub use chroot::{probe_sandbox, SandboxOutcome, SaveToChroot, PROBE_DATA};
pub use compare::CompareFiles;
pub use remove::RemoveFile;
pub use transfer::{DownloadFile, UploadFile};

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: &'static str,
    pub passed: bool,
    pub message: String,
}

impl CheckResult {
    pub fn pass(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            message: message.into(),
        }
    }
}

/// What a check gets to work with: the user's session and the file paths.
pub struct CheckContext<'a, R> {
    pub remote: &'a R,
    pub paths: &'a PathsConfig,
}

impl<'a, R> CheckContext<'a, R> {
    pub fn new(remote: &'a R, paths: &'a PathsConfig) -> Self {
        Self { remote, paths }
    }
}

/// A check that runs against an open session and reports a result.
#[async_trait]
pub trait SftpCheck<R: RemoteFs>: Send + Sync {
    fn kind(&self) -> CheckKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }

    async fn run(&self, ctx: &CheckContext<'_, R>) -> CheckResult;
}

/// Instantiate the checks for `kinds`, preserving order.
pub fn build_checks<R: RemoteFs>(kinds: &[CheckKind]) -> Vec<Box<dyn SftpCheck<R>>> {
    kinds
        .iter()
        .map(|kind| -> Box<dyn SftpCheck<R>> {
            match kind {
                CheckKind::SaveToChroot => Box::new(SaveToChroot),
                CheckKind::UploadFile => Box::new(UploadFile),
                CheckKind::DownloadFile => Box::new(DownloadFile),
                CheckKind::CompareFiles => Box::new(CompareFiles),
                CheckKind::RemoveFile => Box::new(RemoveFile),
            }
        })
        .collect()
}
