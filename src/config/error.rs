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

//! Error types for configuration validation

use thiserror::Error;

/// Errors detected while validating a loaded configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required value is missing or empty
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// A value still holds the template placeholder text
    #[error("{field} still contains the placeholder '{value}', please fill in a real value")]
    Placeholder { field: String, value: String },

    /// Port 0 cannot be dialed
    #[error("server.port must be between 1 and 65535")]
    InvalidPort,

    /// The configured test file size is zero
    #[error("test_file_size must be greater than zero")]
    ZeroFileSize,

    /// No credentials to test
    #[error("at least one entry is required under 'users'")]
    NoUsers,

    /// The generated and the downloaded file would overwrite each other
    #[error("paths.local_test_file and paths.downloaded_test_file must differ (both are '{path}')")]
    SameLocalPaths { path: String },

    /// The same check appears twice in the check list
    #[error("check '{name}' is listed more than once")]
    DuplicateCheck { name: String },

    /// Algorithm name that russh does not implement
    #[error("unsupported {kind} algorithm '{name}'")]
    UnsupportedAlgorithm { kind: &'static str, name: String },

    /// `${VAR}` reference to an unset environment variable
    #[error("environment variable '{name}' referenced in {field} is not set")]
    MissingEnvVar { field: String, name: String },

    /// Host key checking mode that is not one of yes / no / accept-new
    #[error("invalid host_key_checking value '{value}' (expected yes, no or accept-new)")]
    InvalidHostKeyChecking { value: String },

    /// `--user` selected a name that is not configured
    #[error("user '{name}' is not present in the configuration")]
    UnknownUser { name: String },
}
