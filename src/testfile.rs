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

//! Random test file generation and content digests.

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::io;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Chunk size for generating and hashing files.
/// - 64KB keeps memory flat regardless of the configured file size
/// - Large enough that syscall overhead is negligible for MiB-sized files
const CHUNK_SIZE: usize = 64 * 1024;

/// SHA-256 digest of a file's contents.
pub type FileDigest = [u8; 32];

/// Write `size` bytes from the operating system CSPRNG to `path`,
/// creating the file or truncating an existing one.
///
/// A failure part-way leaves whatever was written so far on disk.
pub async fn generate_random_file(path: &Path, size: u64) -> io::Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut remaining = size;

    while remaining > 0 {
        let len = remaining.min(CHUNK_SIZE as u64) as usize;
        let chunk = &mut buffer[..len];
        OsRng.try_fill_bytes(chunk).map_err(io::Error::other)?;
        file.write_all(chunk).await?;
        remaining -= len as u64;
    }

    file.flush().await?;
    tracing::debug!("Generated {} random bytes at {:?}", size, path);
    Ok(())
}

/// Stream `path` through SHA-256.
pub async fn sha256_file(path: &Path) -> io::Result<FileDigest> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize().into())
}
