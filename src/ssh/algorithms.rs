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

//! Translation of configured algorithm names into russh preferences.

use russh::{cipher, kex, mac, Preferred};
use std::borrow::Cow;

use crate::config::{AlgorithmConfig, ConfigError};

/// Build the russh algorithm preference list from the configuration.
///
/// Names are matched exactly against what russh implements. Empty lists
/// keep russh's defaults.
pub fn build_preferred(config: &AlgorithmConfig) -> Result<Preferred, ConfigError> {
    let mut preferred = Preferred::default();

    if !config.kex.is_empty() {
        let mut names = parse_names(&config.kex, "key exchange", |s| {
            kex::Name::try_from(s).ok()
        })?;
        // Keep the client extension markers (ext-info-c, strict kex) that
        // russh advertises through the kex list.
        let markers: Vec<kex::Name> = preferred
            .kex
            .iter()
            .copied()
            .filter(|name| is_kex_extension_marker(name.as_ref()))
            .filter(|marker| !names.contains(marker))
            .collect();
        names.extend(markers);
        preferred.kex = Cow::Owned(names);
    }

    if !config.ciphers.is_empty() {
        preferred.cipher = Cow::Owned(parse_names(&config.ciphers, "cipher", |s| {
            cipher::Name::try_from(s).ok()
        })?);
    }

    if !config.macs.is_empty() {
        preferred.mac = Cow::Owned(parse_names(&config.macs, "MAC", |s| {
            mac::Name::try_from(s).ok()
        })?);
    }

    Ok(preferred)
}

fn is_kex_extension_marker(name: &str) -> bool {
    name.starts_with("ext-info-") || name.starts_with("kex-strict-")
}

fn parse_names<N>(
    names: &[String],
    kind: &'static str,
    parse: impl Fn(&str) -> Option<N>,
) -> Result<Vec<N>, ConfigError> {
    names
        .iter()
        .map(|name| {
            parse(name.trim()).ok_or_else(|| ConfigError::UnsupportedAlgorithm {
                kind,
                name: name.clone(),
            })
        })
        .collect()
}
