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

//! Upload and download of the test file.

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use super::{CheckContext, CheckResult, SftpCheck};
use crate::config::CheckKind;
use crate::sftp::RemoteFs;

/// Stream `src` into `dst` and close the writing side.
async fn copy_and_close<S, D>(src: &mut S, dst: &mut D) -> std::io::Result<u64>
where
    S: AsyncRead + Unpin,
    D: AsyncWrite + Unpin,
{
    let bytes = tokio::io::copy(src, dst).await?;
    dst.shutdown().await?;
    Ok(bytes)
}

/// Uploads the local test file to the remote test path.
pub struct UploadFile;

#[async_trait]
impl<R: RemoteFs> SftpCheck<R> for UploadFile {
    fn kind(&self) -> CheckKind {
        CheckKind::UploadFile
    }

    async fn run(&self, ctx: &CheckContext<'_, R>) -> CheckResult {
        let name = CheckKind::UploadFile.name();
        let paths = ctx.paths;

        let mut source = match tokio::fs::File::open(&paths.local_test_file).await {
            Ok(file) => file,
            Err(e) => return CheckResult::fail(name, format!("Failed to open source file: {e}")),
        };

        let mut destination = match ctx.remote.create(&paths.remote_test_file).await {
            Ok(file) => file,
            Err(e) => {
                return CheckResult::fail(name, format!("Failed to create destination file: {e}"))
            }
        };

        match copy_and_close(&mut source, &mut destination).await {
            Ok(bytes) => {
                tracing::debug!("Uploaded {} bytes to {}", bytes, paths.remote_test_file);
                CheckResult::pass(name, "File uploaded successfully")
            }
            Err(e) => CheckResult::fail(name, format!("Failed to copy file: {e}")),
        }
    }
}

/// Downloads the remote test path into the local download file.
pub struct DownloadFile;

#[async_trait]
impl<R: RemoteFs> SftpCheck<R> for DownloadFile {
    fn kind(&self) -> CheckKind {
        CheckKind::DownloadFile
    }

    async fn run(&self, ctx: &CheckContext<'_, R>) -> CheckResult {
        let name = CheckKind::DownloadFile.name();
        let paths = ctx.paths;

        let mut source = match ctx.remote.open(&paths.remote_test_file).await {
            Ok(file) => file,
            Err(e) => return CheckResult::fail(name, format!("Failed to open remote file: {e}")),
        };

        let mut destination = match tokio::fs::File::create(&paths.downloaded_test_file).await {
            Ok(file) => file,
            Err(e) => return CheckResult::fail(name, format!("Failed to create local file: {e}")),
        };

        match copy_and_close(&mut source, &mut destination).await {
            Ok(bytes) => {
                tracing::debug!(
                    "Downloaded {} bytes to {:?}",
                    bytes,
                    paths.downloaded_test_file
                );
                CheckResult::pass(name, "File downloaded successfully")
            }
            Err(e) => CheckResult::fail(name, format!("Failed to download file: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fake::DirRemote;
    use super::*;
    use crate::config::PathsConfig;
    use std::fs;
    use tempfile::TempDir;

    fn paths_in(dir: &TempDir) -> PathsConfig {
        let mut paths = PathsConfig::new("/test.bin");
        paths.local_test_file = dir.path().join("local_test.bin");
        paths.downloaded_test_file = dir.path().join("SERVER2LOCAL.bin");
        paths
    }

    #[tokio::test]
    async fn test_upload_then_download_round_trip() {
        let local = TempDir::new().unwrap();
        let remote = DirRemote::new();
        let paths = paths_in(&local);
        let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&paths.local_test_file, &content).unwrap();
        let ctx = CheckContext::new(&remote, &paths);

        let upload = UploadFile.run(&ctx).await;
        assert!(upload.passed, "{}", upload.message);
        assert_eq!(upload.message, "File uploaded successfully");
        assert_eq!(fs::read(remote.local_path("/test.bin")).unwrap(), content);

        let download = DownloadFile.run(&ctx).await;
        assert!(download.passed, "{}", download.message);
        assert_eq!(download.message, "File downloaded successfully");
        assert_eq!(fs::read(&paths.downloaded_test_file).unwrap(), content);
    }

    #[tokio::test]
    async fn test_upload_missing_source() {
        let local = TempDir::new().unwrap();
        let remote = DirRemote::new();
        let paths = paths_in(&local);
        let ctx = CheckContext::new(&remote, &paths);

        let result = UploadFile.run(&ctx).await;
        assert!(!result.passed);
        assert!(result.message.starts_with("Failed to open source file: "));
    }

    #[tokio::test]
    async fn test_upload_refused_by_server() {
        let local = TempDir::new().unwrap();
        let remote = DirRemote::new().deny_create("/test.bin");
        let paths = paths_in(&local);
        fs::write(&paths.local_test_file, b"data").unwrap();
        let ctx = CheckContext::new(&remote, &paths);

        let result = UploadFile.run(&ctx).await;
        assert!(!result.passed);
        assert!(result
            .message
            .starts_with("Failed to create destination file: "));
    }

    #[tokio::test]
    async fn test_upload_write_failure() {
        let local = TempDir::new().unwrap();
        let remote = DirRemote::new().deny_write("/test.bin");
        let paths = paths_in(&local);
        fs::write(&paths.local_test_file, b"data").unwrap();
        let ctx = CheckContext::new(&remote, &paths);

        let result = UploadFile.run(&ctx).await;
        assert!(!result.passed);
        assert!(result.message.starts_with("Failed to copy file: "));
    }

    #[tokio::test]
    async fn test_download_without_upload_fails() {
        let local = TempDir::new().unwrap();
        let remote = DirRemote::new();
        let paths = paths_in(&local);
        let ctx = CheckContext::new(&remote, &paths);

        let result = DownloadFile.run(&ctx).await;
        assert!(!result.passed);
        assert!(result.message.starts_with("Failed to open remote file: "));
        assert!(!paths.downloaded_test_file.exists());
    }

    #[tokio::test]
    async fn test_download_into_missing_directory() {
        let local = TempDir::new().unwrap();
        let remote = DirRemote::new();
        let mut paths = paths_in(&local);
        paths.downloaded_test_file = local.path().join("missing").join("out.bin");
        fs::write(remote.local_path("/test.bin"), b"data").unwrap();
        let ctx = CheckContext::new(&remote, &paths);

        let result = DownloadFile.run(&ctx).await;
        assert!(!result.passed);
        assert!(result.message.starts_with("Failed to create local file: "));
    }

    #[tokio::test]
    async fn test_download_truncates_stale_file() {
        let local = TempDir::new().unwrap();
        let remote = DirRemote::new();
        let paths = paths_in(&local);
        fs::write(&paths.downloaded_test_file, vec![7u8; 4096]).unwrap();
        fs::write(remote.local_path("/test.bin"), b"fresh").unwrap();
        let ctx = CheckContext::new(&remote, &paths);

        let result = DownloadFile.run(&ctx).await;
        assert!(result.passed);
        assert_eq!(fs::read(&paths.downloaded_test_file).unwrap(), b"fresh");
    }
}
