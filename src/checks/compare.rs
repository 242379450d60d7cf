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

use super::{CheckContext, CheckResult, SftpCheck};
use crate::config::CheckKind;
use crate::sftp::RemoteFs;
use crate::testfile::sha256_file;

/// Compares the generated file with the downloaded copy by SHA-256 digest.
///
/// Only local files are read, so this runs even when upload or download
/// failed and may then compare against a download left over from an
/// earlier user.
pub struct CompareFiles;

#[async_trait]
impl<R: RemoteFs> SftpCheck<R> for CompareFiles {
    fn kind(&self) -> CheckKind {
        CheckKind::CompareFiles
    }

    async fn run(&self, ctx: &CheckContext<'_, R>) -> CheckResult {
        let name = CheckKind::CompareFiles.name();
        let paths = ctx.paths;

        let original = match sha256_file(&paths.local_test_file).await {
            Ok(digest) => digest,
            Err(e) => return CheckResult::fail(name, format!("Failed to read local file: {e}")),
        };
        let downloaded = match sha256_file(&paths.downloaded_test_file).await {
            Ok(digest) => digest,
            Err(e) => {
                return CheckResult::fail(name, format!("Failed to read downloaded file: {e}"))
            }
        };

        tracing::debug!("local      sha256 {}", hex::encode(original));
        tracing::debug!("downloaded sha256 {}", hex::encode(downloaded));

        if original == downloaded {
            CheckResult::pass(name, "Files are identical")
        } else {
            CheckResult::fail(name, "Files are not identical")
        }
    }
}
