// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use std::{error::Error, io};
use suite_tree::errors::{ConfigReadError, WriteReportError};
use suite_tree_metadata::{ReadResultsError, SuiteTreeExitCode};
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that suite-tree expects to encounter and reports to the user.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine the current directory")]
    CurrentDir {
        #[source]
        err: io::Error,
    },
    #[error("config read error")]
    ConfigRead {
        #[from]
        err: ConfigReadError,
    },
    #[error("results read error")]
    InputRead {
        #[from]
        err: ReadResultsError,
    },
    #[error("failed to create output file")]
    OutputFileCreate {
        path: Utf8PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("report write error")]
    WriteReport {
        #[from]
        err: WriteReportError,
    },
    #[error("test failures present")]
    FailuresPresent { failed_files: usize },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDir { .. } | Self::ConfigRead { .. } => SuiteTreeExitCode::SETUP_ERROR,
            Self::InputRead { .. } => SuiteTreeExitCode::INPUT_READ_FAILED,
            Self::OutputFileCreate { .. } | Self::WriteReport { .. } => {
                SuiteTreeExitCode::WRITE_OUTPUT_ERROR
            }
            Self::FailuresPresent { .. } => SuiteTreeExitCode::FAILURES_PRESENT,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::CurrentDir { err } => {
                error!("could not determine the current directory");
                Some(err as &dyn Error)
            }
            Self::ConfigRead { err } => {
                error!("{err}");
                err.source()
            }
            Self::InputRead { err } => {
                error!("{err}");
                err.source()
            }
            Self::OutputFileCreate { path, err } => {
                error!("failed to create output file `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::WriteReport { err } => {
                error!("{err}");
                err.source()
            }
            Self::FailuresPresent { failed_files } => {
                error!(
                    "{} {} had failing tests",
                    failed_files.style(styles.bold),
                    suite_tree::plural::files_str(*failed_files),
                );
                None
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
