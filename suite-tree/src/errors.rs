// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by suite-tree.

use camino::Utf8PathBuf;
use std::io;
use thiserror::Error;

/// An error that occurred while reading a config file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigReadError {
    /// The config file could not be read.
    #[error("failed to read config file at {path}")]
    Read {
        /// The path to the config file.
        path: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: io::Error,
    },

    /// The config file could not be parsed.
    #[error("failed to parse config file at {path}")]
    Parse {
        /// The path to the config file.
        path: Utf8PathBuf,

        /// The underlying TOML error.
        #[source]
        error: toml::de::Error,
    },
}

/// An error that occurred while writing a report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// An error occurred while writing to the provided output.
    #[error("error writing to output")]
    Io(#[source] io::Error),

    /// An error occurred while producing HTML.
    #[error("error writing HTML report")]
    Html(#[source] quick_xml::Error),

    /// An error occurred while producing JSON.
    #[error("error writing JSON report")]
    Json(#[source] serde_json::Error),
}

impl From<io::Error> for WriteReportError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}
