// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::Utf8PathBuf;
use thiserror::Error;

/// An error that occurs while reading an [`AggregatedResults`](crate::AggregatedResults)
/// document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadResultsError {
    /// The results file could not be read.
    #[error("error reading results from {}", path.as_deref().map_or("standard input", |p| p.as_str()))]
    Io {
        /// The path being read, or `None` for standard input.
        path: Option<Utf8PathBuf>,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The results document was not valid JSON, or did not match the expected shape.
    #[error("error parsing results at `{}`", error.path())]
    Parse {
        /// The path being read, or `None` for standard input.
        path: Option<Utf8PathBuf>,

        /// The underlying error, along with the path to the offending field.
        #[source]
        error: serde_path_to_error::Error<serde_json::Error>,
    },
}
