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

/// Deletes the uploaded file from the server.
pub struct RemoveFile;

#[async_trait]
impl<R: RemoteFs> SftpCheck<R> for RemoveFile {
    fn kind(&self) -> CheckKind {
        CheckKind::RemoveFile
    }

    async fn run(&self, ctx: &CheckContext<'_, R>) -> CheckResult {
        let name = CheckKind::RemoveFile.name();

        match ctx.remote.remove_file(&ctx.paths.remote_test_file).await {
            Ok(()) => CheckResult::pass(name, "File removed"),
            Err(e) if e.is_not_found() => {
                CheckResult::fail(name, "Failed to remove: file doesn't exist")
            }
            Err(e) if e.is_permission_denied() => {
                CheckResult::fail(name, "Failed to remove: permission denied")
            }
            Err(e) => CheckResult::fail(name, format!("Failed to remove file: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fake::DirRemote;
    use super::*;
    use crate::config::PathsConfig;

    #[tokio::test]
    async fn test_remove_existing_file() {
        let remote = DirRemote::new();
        std::fs::write(remote.local_path("/test.bin"), b"data").unwrap();
        let paths = PathsConfig::new("/test.bin");

        let result = RemoveFile.run(&CheckContext::new(&remote, &paths)).await;
        assert!(result.passed);
        assert_eq!(result.message, "File removed");
        assert!(!remote.exists("/test.bin"));
    }

    #[tokio::test]
    async fn test_remove_missing_file() {
        let remote = DirRemote::new();
        let paths = PathsConfig::new("/test.bin");

        let result = RemoveFile.run(&CheckContext::new(&remote, &paths)).await;
        assert!(!result.passed);
        assert_eq!(result.message, "Failed to remove: file doesn't exist");
    }

    #[tokio::test]
    async fn test_remove_permission_denied() {
        let remote = DirRemote::new().deny_remove("/test.bin");
        std::fs::write(remote.local_path("/test.bin"), b"data").unwrap();
        let paths = PathsConfig::new("/test.bin");

        let result = RemoveFile.run(&CheckContext::new(&remote, &paths)).await;
        assert!(!result.passed);
        assert_eq!(result.message, "Failed to remove: permission denied");
        assert!(remote.exists("/test.bin"));
    }

    #[tokio::test]
    async fn test_remove_other_status_is_generic_failure() {
        let remote = DirRemote::new().fail_remove("/test.bin");
        std::fs::write(remote.local_path("/test.bin"), b"data").unwrap();
        let paths = PathsConfig::new("/test.bin");

        let result = RemoveFile.run(&CheckContext::new(&remote, &paths)).await;
        assert!(!result.passed);
        assert!(result.message.starts_with("Failed to remove file: "));
    }
}
