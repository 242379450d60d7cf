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

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use sftpcheck::{
    cli::Cli,
    config::Config,
    runner,
    sftp::SftpConnector,
    ui::Reporter,
    utils::init_logging,
};

/// Exit status for configuration problems; clap uses the same code for
/// argument errors.
const EXIT_CONFIG_ERROR: u8 = 2;

/// Load the configuration and apply command-line overrides.
async fn load_config(cli: &Cli) -> Result<(Config, SftpConnector)> {
    let mut config = Config::load_with_priority(cli.config.as_deref()).await?;

    config.retain_users(&cli.users)?;
    if let Some(size) = cli.size {
        config.test_file_size = size;
    }
    config
        .validate()
        .context("Invalid command-line overrides")?;

    let connector = SftpConnector::new(&config)?;
    Ok((config, connector))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (config, connector) = match load_config(&cli).await {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return Ok(ExitCode::from(EXIT_CONFIG_ERROR));
        }
    };
    tracing::info!(
        "Testing {} user(s) against {}",
        config.users.len(),
        config.server.address()
    );

    let mut reporter = Reporter::stdout();
    let report = runner::run(&config, &connector, &mut reporter).await?;
    reporter.run_finished(&report)?;

    if report.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
