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

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "sftpcheck",
    version,
    about = "Validate an SFTP server against a list of user accounts",
    long_about = "sftpcheck connects to an SFTP server once per configured user and runs a fixed set of checks:\nit probes whether the user can write into the chroot root, uploads a random file, downloads it again,\ncompares both copies by SHA-256 and removes the uploaded file. Results are printed per user.\n\nExit codes: 0 (all users passed), 1 (any failure), 2 (configuration error)",
    after_help = "EXAMPLES:\n  Use ./sftpcheck.yaml:          sftpcheck\n  Explicit configuration file:   sftpcheck -F /etc/sftpcheck.yaml\n  Only test some users:          sftpcheck -u user1 -u user2\n  Smaller test file, verbose:    sftpcheck --size 65536 -vv"
)]
pub struct Cli {
    #[arg(
        short = 'F',
        long,
        help = "Configuration file path\nConfig loading priority:\n  1. This flag's value\n  2. Current directory (./sftpcheck.yaml)\n  3. User config (~/.config/sftpcheck/config.yaml)"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        short = 'u',
        long = "user",
        help = "Only test this user (repeatable); must be listed in the configuration"
    )]
    pub users: Vec<String>,

    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    #[arg(long, value_name = "BYTES", help = "Override test_file_size from the configuration")]
    pub size: Option<u64>,
}
