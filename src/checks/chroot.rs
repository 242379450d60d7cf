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

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{CheckContext, CheckResult, SftpCheck};
use crate::config::CheckKind;
use crate::sftp::{RemoteError, RemoteFs};

/// Content written by the probe.
pub const PROBE_DATA: &[u8] = b"test data";

/// Result of trying to write into the sandbox root.
///
/// A correctly configured server refuses the write, so a refusal is the
/// passing outcome here.
#[derive(Debug)]
pub enum SandboxOutcome {
    /// The server refused to create the file.
    SandboxEnforced(RemoteError),
    /// The file was created but writing to it failed.
    ProbeError(std::io::Error),
    /// The file was created and written.
    SandboxBreach,
}

impl SandboxOutcome {
    pub fn into_result(self, name: &'static str) -> CheckResult {
        match self {
            SandboxOutcome::SandboxEnforced(reason) => {
                CheckResult::pass(name, format!("result: {reason}. *This is expected outcome*"))
            }
            SandboxOutcome::ProbeError(e) => CheckResult::fail(name, format!("result: Failed: {e}")),
            SandboxOutcome::SandboxBreach => {
                CheckResult::fail(name, "*Warning* Saving to chroot enabled")
            }
        }
    }
}

async fn write_probe<W: AsyncWrite + Unpin>(file: &mut W) -> std::io::Result<()> {
    file.write_all(PROBE_DATA).await?;
    file.shutdown().await
}

/// Try to create and write `path`. Anything the probe managed to create is
/// removed again; a failed removal is only logged.
pub async fn probe_sandbox<R: RemoteFs>(remote: &R, path: &str) -> SandboxOutcome {
    let mut file = match remote.create(path).await {
        Ok(file) => file,
        Err(reason) => {
            tracing::debug!("Sandbox refused {}: {}", path, reason);
            return SandboxOutcome::SandboxEnforced(reason);
        }
    };

    let outcome = match write_probe(&mut file).await {
        Ok(()) => SandboxOutcome::SandboxBreach,
        Err(e) => SandboxOutcome::ProbeError(e),
    };
    drop(file);

    if let Err(e) = remote.remove_file(path).await {
        tracing::warn!("Failed to remove chroot probe file {}: {}", path, e);
    }

    outcome
}

/// Checks that the session cannot write into its chroot root.
pub struct SaveToChroot;

#[async_trait]
impl<R: RemoteFs> SftpCheck<R> for SaveToChroot {
    fn kind(&self) -> CheckKind {
        CheckKind::SaveToChroot
    }

    async fn run(&self, ctx: &CheckContext<'_, R>) -> CheckResult {
        probe_sandbox(ctx.remote, &ctx.paths.chroot_probe)
            .await
            .into_result(CheckKind::SaveToChroot.name())
    }
}
