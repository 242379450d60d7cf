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

//! SSH connection establishment and password authentication.
//!
//! This module handles address resolution, the transport handshake with
//! the configured algorithm preferences, host key verification and the
//! password login. The SFTP layer is built on top in [`crate::sftp`].

use russh::client::{Config, Handle, Handler};
use russh::Preferred;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use super::error::Error;
use super::known_hosts::HostKeyVerifier;
use crate::config::{Credential, ServerConfig};

// Sessions are short-lived; this only guards against a server that stops
// answering in the middle of a transfer.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(300);

/// SSH client handler for managing server key verification.
#[derive(Debug, Clone)]
pub struct ClientHandler {
    hostname: String,
    host: SocketAddr,
    verifier: HostKeyVerifier,
}

impl ClientHandler {
    pub fn new(hostname: String, host: SocketAddr, verifier: HostKeyVerifier) -> Self {
        Self {
            hostname,
            host,
            verifier,
        }
    }
}

impl Handler for ClientHandler {
    type Error = Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &russh::keys::PublicKey,
    ) -> Result<bool, Self::Error> {
        self.verifier
            .verify(&self.hostname, self.host.port(), server_public_key)
    }
}

/// Open an authenticated SSH connection for `credential`.
///
/// Every resolved address is tried in turn until one completes the
/// handshake; authentication is attempted only on that connection. The
/// whole sequence is bounded by the server's connect timeout.
pub async fn connect(
    server: &ServerConfig,
    preferred: Preferred,
    credential: &Credential,
) -> Result<(SocketAddr, Handle<ClientHandler>), Error> {
    let timeout = server.connect_timeout();

    match tokio::time::timeout(timeout, connect_inner(server, preferred, credential)).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout {
            address: server.address(),
            seconds: timeout.as_secs(),
        }),
    }
}

async fn connect_inner(
    server: &ServerConfig,
    preferred: Preferred,
    credential: &Credential,
) -> Result<(SocketAddr, Handle<ClientHandler>), Error> {
    let config = Arc::new(Config {
        inactivity_timeout: Some(INACTIVITY_TIMEOUT),
        preferred,
        ..Default::default()
    });
    let verifier = HostKeyVerifier::new(server.host_key_checking, server.known_hosts.clone());
    tracing::debug!("Host key checking mode: {:?}", verifier.mode());

    let socket_addrs: Vec<SocketAddr> = tokio::net::lookup_host((server.host.as_str(), server.port))
        .await
        .map_err(Error::AddressInvalid)?
        .collect();

    let mut connect_res = Err(Error::AddressInvalid(io::Error::new(
        io::ErrorKind::InvalidInput,
        "could not resolve to any addresses",
    )));
    for socket_addr in socket_addrs {
        tracing::debug!("Connecting to {} ({})", server.host, socket_addr);
        let handler = ClientHandler::new(server.host.clone(), socket_addr, verifier.clone());
        match russh::client::connect(config.clone(), socket_addr, handler).await {
            Ok(handle) => {
                connect_res = Ok((socket_addr, handle));
                break;
            }
            Err(e) => {
                tracing::debug!("Connection to {} failed: {}", socket_addr, e);
                connect_res = Err(e);
            }
        }
    }
    let (address, mut handle) = connect_res?;

    authenticate_password(&mut handle, credential).await?;
    tracing::debug!("Authenticated as {} on {}", credential.user, address);

    Ok((address, handle))
}

async fn authenticate_password<H: Handler>(
    handle: &mut Handle<H>,
    credential: &Credential,
) -> Result<(), Error> {
    let result = handle
        .authenticate_password(credential.user.as_str(), credential.password.as_str())
        .await?;
    if !result.success() {
        return Err(Error::PasswordWrong);
    }
    Ok(())
}
