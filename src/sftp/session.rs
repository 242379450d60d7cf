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
use russh::client::Handle;
use russh::Preferred;
use russh_sftp::client::fs::File;
use russh_sftp::{client::SftpSession, protocol::OpenFlags};
use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use super::{Connector, RemoteError, RemoteFs};
use crate::config::{Config, ConfigError, Credential, ServerConfig};
use crate::ssh::{self, ClientHandler};

/// An authenticated SSH connection with an SFTP session on top.
pub struct SftpConnection {
    sftp: SftpSession,
    handle: Handle<ClientHandler>,
    username: String,
    address: SocketAddr,
}

impl SftpConnection {
    /// Connect, authenticate and start the `sftp` subsystem.
    ///
    /// Some sshd_config does not enable sftp by default. A line like
    /// `Subsystem sftp internal-sftp` is needed on the server.
    pub async fn open(
        server: &ServerConfig,
        preferred: Preferred,
        credential: &Credential,
    ) -> Result<Self, ssh::Error> {
        let (address, handle) = ssh::connect(server, preferred, credential).await?;

        tracing::debug!("Initializing SFTP channel");
        let sftp = within(server.connect_timeout(), async {
            let channel = handle
                .channel_open_session()
                .await
                .map_err(|e| ssh::Error::SubsystemFailed(e.to_string()))?;
            channel
                .request_subsystem(true, "sftp")
                .await
                .map_err(|e| ssh::Error::SubsystemFailed(e.to_string()))?;
            let sftp = SftpSession::new(channel.into_stream()).await?;
            Ok::<_, ssh::Error>(sftp)
        })
        .await?;
        tracing::debug!("SFTP channel initialized successfully");

        Ok(Self {
            sftp,
            handle,
            username: credential.user.clone(),
            address,
        })
    }
}

/// Run SFTP session setup, failing with `SubsystemFailed` once `limit` passes.
async fn within<T, F>(limit: Duration, setup: F) -> Result<T, ssh::Error>
where
    F: Future<Output = Result<T, ssh::Error>>,
{
    match tokio::time::timeout(limit, setup).await {
        Ok(result) => result,
        Err(_) => Err(ssh::Error::SubsystemFailed(format!(
            "no response within {limit:?}"
        ))),
    }
}

impl fmt::Debug for SftpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SftpConnection")
            .field("username", &self.username)
            .field("address", &self.address)
            .field("handle", &"Handle<ClientHandler>")
            .finish()
    }
}

#[async_trait]
impl RemoteFs for SftpConnection {
    type File = File;

    async fn create(&self, path: &str) -> Result<File, RemoteError> {
        let file = self
            .sftp
            .open_with_flags(
                path,
                OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::WRITE,
            )
            .await?;
        Ok(file)
    }

    async fn open(&self, path: &str) -> Result<File, RemoteError> {
        let file = self.sftp.open_with_flags(path, OpenFlags::READ).await?;
        Ok(file)
    }

    async fn remove_file(&self, path: &str) -> Result<(), RemoteError> {
        self.sftp.remove_file(path).await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), RemoteError> {
        let closed = self.sftp.close().await;
        if let Err(e) = self
            .handle
            .disconnect(russh::Disconnect::ByApplication, "", "")
            .await
        {
            // The server may already have dropped the connection.
            tracing::debug!("SSH disconnect from {} failed: {}", self.address, e);
        }
        closed?;
        tracing::debug!("Closed SFTP session for {}@{}", self.username, self.address);
        Ok(())
    }
}

/// Opens a [`SftpConnection`] per credential against the configured server.
#[derive(Debug, Clone)]
pub struct SftpConnector {
    server: ServerConfig,
    preferred: Preferred,
}

impl SftpConnector {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            server: config.server.clone(),
            preferred: ssh::algorithms::build_preferred(&config.algorithms)?,
        })
    }
}

#[async_trait]
impl Connector for SftpConnector {
    type Connection = SftpConnection;

    async fn connect(&self, credential: &Credential) -> Result<SftpConnection, ssh::Error> {
        SftpConnection::open(&self.server, self.preferred.clone(), credential).await
    }
}
