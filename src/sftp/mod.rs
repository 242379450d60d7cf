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

//! SFTP session layer based on russh and russh-sftp
//!
//! The checks only see the small [`RemoteFs`] surface: create, open,
//! remove and close. [`SftpConnection`] implements it over a live
//! session; [`Connector`] is how the runner obtains one per user.

pub mod error;
pub mod session;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::Credential;

pub use error::RemoteError;
pub use session::{SftpConnection, SftpConnector};

/// Remote file operations used by the checks.
#[async_trait]
pub trait RemoteFs: Send + Sync {
    type File: AsyncRead + AsyncWrite + Unpin + Send;

    /// Create or truncate `path` for writing.
    async fn create(&self, path: &str) -> Result<Self::File, RemoteError>;

    /// Open an existing `path` for reading.
    async fn open(&self, path: &str) -> Result<Self::File, RemoteError>;

    async fn remove_file(&self, path: &str) -> Result<(), RemoteError>;

    /// End the session. Called once after the last check.
    async fn close(&self) -> Result<(), RemoteError>;
}

/// Opens one session per credential.
#[async_trait]
pub trait Connector: Send + Sync {
    type Connection: RemoteFs;

    async fn connect(&self, credential: &Credential)
        -> Result<Self::Connection, crate::ssh::Error>;
}
