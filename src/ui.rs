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

//! Console report written while the checks run.

use owo_colors::OwoColorize;
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

use crate::checks::CheckResult;
use crate::runner::RunReport;
use crate::ssh;

pub const DELIMITER: &str = "******************************";

/// Writes the per-user report. Status words are coloured only when
/// `color` is set.
pub struct Reporter<W: Write> {
    out: W,
    color: bool,
}

impl Reporter<io::Stdout> {
    /// Report to stdout, coloured when stdout is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Self::new(out, color)
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Uncoloured output, e.g. into a buffer.
    pub fn plain(out: W) -> Self {
        Self::new(out, false)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn user_started(&mut self, user: &str) -> io::Result<()> {
        writeln!(self.out, "{DELIMITER}")?;
        writeln!(self.out, "{user} - testing")
    }

    pub fn connect_failed(&mut self, error: &ssh::Error) -> io::Result<()> {
        if error.is_sftp_setup() {
            writeln!(self.out, "Error creating SFTP session: {error}")?;
        } else {
            writeln!(self.out, "Error connecting to the server: {error}")?;
        }
        self.test_failed()
    }

    pub fn setup_failed(&mut self, error: &dyn Display) -> io::Result<()> {
        writeln!(
            self.out,
            "Error generating test file, skipping remaining checks: {error}"
        )?;
        self.test_failed()
    }

    fn test_failed(&mut self) -> io::Result<()> {
        if self.color {
            writeln!(self.out, "{}", "TEST FAILED!".red().bold())
        } else {
            writeln!(self.out, "TEST FAILED!")
        }
    }

    pub fn file_generated(&mut self) -> io::Result<()> {
        writeln!(self.out, "Test file generated successfully")
    }

    pub fn checks_started(&mut self) -> io::Result<()> {
        writeln!(self.out, "Proceeding to testing:")
    }

    pub fn check_finished(&mut self, result: &CheckResult) -> io::Result<()> {
        let status = format_status(result.passed, self.color);
        writeln!(self.out, "{} {} - {}", result.name, status, result.message)
    }

    pub fn user_finished(&mut self, results: &[CheckResult]) -> io::Result<()> {
        let completed = results.iter().filter(|r| r.passed).count();
        writeln!(
            self.out,
            "Test finished {} / {} tests completed.",
            completed,
            results.len()
        )
    }

    pub fn run_finished(&mut self, report: &RunReport) -> io::Result<()> {
        writeln!(self.out, "{DELIMITER}")?;
        writeln!(
            self.out,
            "{}",
            format_summary(
                report.users.len(),
                report.passed_count(),
                report.failed_count(),
                self.color
            )
        )?;
        self.out.flush()
    }
}

/// `Completed` or `Failed`.
pub fn format_status(passed: bool, color: bool) -> String {
    match (passed, color) {
        (true, false) => "Completed".to_string(),
        (false, false) => "Failed".to_string(),
        (true, true) => "Completed".green().to_string(),
        (false, true) => "Failed".red().to_string(),
    }
}

/// One-line run summary, e.g. `3 users • 2 passed • 1 failed`.
pub fn format_summary(total: usize, passed: usize, failed: usize, color: bool) -> String {
    let parts = if color {
        [
            format!("{} users", total.to_string().bold()),
            format!("{} {}", passed.to_string().green().bold(), "passed".green()),
            format!("{} {}", failed.to_string().red().bold(), "failed".red()),
        ]
    } else {
        [
            format!("{total} users"),
            format!("{passed} passed"),
            format!("{failed} failed"),
        ]
    };
    parts.join(" • ")
}
