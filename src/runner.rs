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

//! Drives the checks for every configured user, one after another.

use anyhow::Result;
use std::io::Write;

use crate::checks::{build_checks, CheckContext, CheckResult, SftpCheck};
use crate::config::{Config, Credential};
use crate::sftp::{Connector, RemoteFs};
use crate::testfile::generate_random_file;
use crate::ui::Reporter;

/// How far testing got for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserOutcome {
    /// Connection setup failed; no checks ran.
    ConnectFailed(String),
    /// The local test file could not be generated; no checks ran.
    SetupFailed(String),
    /// Every enabled check ran.
    Tested(Vec<CheckResult>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserReport {
    pub username: String,
    pub outcome: UserOutcome,
}

impl UserReport {
    /// True when the user connected and every check passed.
    pub fn passed(&self) -> bool {
        match &self.outcome {
            UserOutcome::Tested(results) => results.iter().all(|r| r.passed),
            _ => false,
        }
    }

    pub fn results(&self) -> &[CheckResult] {
        match &self.outcome {
            UserOutcome::Tested(results) => results,
            _ => &[],
        }
    }
}

/// Outcome of a whole run, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub users: Vec<UserReport>,
}

impl RunReport {
    pub fn passed_count(&self) -> usize {
        self.users.iter().filter(|u| u.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.users.len() - self.passed_count()
    }

    pub fn all_passed(&self) -> bool {
        self.users.iter().all(UserReport::passed)
    }
}

/// Test every user in `config` through `connector`, reporting as it goes.
///
/// Per-user failures end up in the returned report; only a failure to
/// write the report itself is returned as an error.
pub async fn run<C, W>(config: &Config, connector: &C, reporter: &mut Reporter<W>) -> Result<RunReport>
where
    C: Connector,
    W: Write,
{
    let checks = build_checks::<C::Connection>(&config.checks);
    let mut report = RunReport::default();

    for credential in &config.users {
        let outcome = test_user(config, connector, credential, &checks, reporter).await?;
        report.users.push(UserReport {
            username: credential.user.clone(),
            outcome,
        });
    }

    Ok(report)
}

async fn test_user<C, W>(
    config: &Config,
    connector: &C,
    credential: &Credential,
    checks: &[Box<dyn SftpCheck<C::Connection>>],
    reporter: &mut Reporter<W>,
) -> Result<UserOutcome>
where
    C: Connector,
    W: Write,
{
    reporter.user_started(&credential.user)?;
    tracing::info!("Testing user {}", credential.user);

    let connection = match connector.connect(credential).await {
        Ok(connection) => connection,
        Err(e) => {
            tracing::info!("Connection for {} failed: {}", credential.user, e);
            reporter.connect_failed(&e)?;
            return Ok(UserOutcome::ConnectFailed(e.to_string()));
        }
    };

    let outcome = run_checks(config, &connection, checks, reporter).await;

    if let Err(e) = connection.close().await {
        tracing::debug!("Closing session for {} failed: {}", credential.user, e);
    }

    outcome
}

async fn run_checks<R, W>(
    config: &Config,
    remote: &R,
    checks: &[Box<dyn SftpCheck<R>>],
    reporter: &mut Reporter<W>,
) -> Result<UserOutcome>
where
    R: RemoteFs,
    W: Write,
{
    let paths = &config.paths;

    if let Err(e) = generate_random_file(&paths.local_test_file, config.test_file_size).await {
        reporter.setup_failed(&e)?;
        return Ok(UserOutcome::SetupFailed(e.to_string()));
    }
    reporter.file_generated()?;

    reporter.checks_started()?;
    let ctx = CheckContext::new(remote, paths);
    let mut results = Vec::with_capacity(checks.len());
    for check in checks {
        tracing::debug!("Running check {}", check.name());
        let result = check.run(&ctx).await;
        reporter.check_finished(&result)?;
        results.push(result);
    }

    reporter.user_finished(&results)?;
    Ok(UserOutcome::Tested(results))
}
