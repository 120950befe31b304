// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! External command run after an export has been written.

use std::path::Path;
use tokio::process::Command;

/// Command line run once per written export, with the export path appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportHook {
    program: String,
    args: Vec<String>,
}

/// Exit status and captured streams of a finished hook run
#[derive(Debug, Clone)]
pub struct HookOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl HookOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

impl ExportHook {
    /// Split a whitespace-separated command line. Returns `None` for a blank line.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Run the hook to completion and capture its output
    pub async fn run(&self, export_path: &Path) -> std::io::Result<HookOutput> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(export_path)
            .kill_on_drop(true)
            .output()
            .await?;

        Ok(HookOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
