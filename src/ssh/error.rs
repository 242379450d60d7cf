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

//! Errors raised while establishing an SSH/SFTP session.

use std::io;
use thiserror::Error;

/// Connection setup failure. Any of these skips every check for the
/// affected user.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid address: {0}")]
    AddressInvalid(#[source] io::Error),

    #[error("Connection to {address} timed out after {seconds} seconds")]
    Timeout { address: String, seconds: u64 },

    #[error("Password authentication failed")]
    PasswordWrong,

    #[error("Host key for {host}:{port} is not present in {known_hosts}")]
    HostKeyUnknown {
        host: String,
        port: u16,
        known_hosts: String,
    },

    #[error("Host key for {host}:{port} does not match line {line} of {known_hosts}")]
    HostKeyChanged {
        host: String,
        port: u16,
        known_hosts: String,
        line: usize,
    },

    #[error("Host key verification failed: {0}")]
    ServerCheckFailed(String),

    #[error("Failed to start the SFTP subsystem: {0}")]
    SubsystemFailed(String),

    #[error("SSH error: {0}")]
    SshError(#[from] russh::Error),

    #[error("SFTP error: {0}")]
    SftpError(#[from] russh_sftp::client::error::Error),
}

impl Error {
    /// True when the SSH session was up but the SFTP session on top of it
    /// could not be started.
    pub fn is_sftp_setup(&self) -> bool {
        matches!(self, Error::SubsystemFailed(_) | Error::SftpError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sftp_setup_errors_are_told_apart() {
        assert!(Error::SubsystemFailed("channel closed".to_string()).is_sftp_setup());
        assert!(!Error::PasswordWrong.is_sftp_setup());
        assert!(!Error::Timeout {
            address: "sftp.example.com:22".to_string(),
            seconds: 30,
        }
        .is_sftp_setup());
    }
}
