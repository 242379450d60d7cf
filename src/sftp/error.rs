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

use russh_sftp::protocol::StatusCode;
use std::io;
use thiserror::Error;

/// Error type for remote file operations.
///
/// Missing files and permission problems get their own variants because
/// the checks report them with dedicated messages.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The server answered `SSH_FX_NO_SUCH_FILE`
    #[error("no such file: {0}")]
    NotFound(String),

    /// The server answered `SSH_FX_PERMISSION_DENIED`
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other SFTP status code
    #[error("{code:?}: {message}")]
    Status { code: StatusCode, message: String },

    /// Transport or protocol failure below the status level
    #[error("SFTP error: {0}")]
    Sftp(russh_sftp::client::error::Error),

    /// IO error while streaming file contents
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound(_))
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, RemoteError::PermissionDenied(_))
    }
}

impl From<russh_sftp::client::error::Error> for RemoteError {
    fn from(e: russh_sftp::client::error::Error) -> Self {
        match e {
            russh_sftp::client::error::Error::Status(status) => match status.status_code {
                StatusCode::NoSuchFile => RemoteError::NotFound(status.error_message),
                StatusCode::PermissionDenied => {
                    RemoteError::PermissionDenied(status.error_message)
                }
                code => RemoteError::Status {
                    code,
                    message: status.error_message,
                },
            },
            other => RemoteError::Sftp(other),
        }
    }
}
