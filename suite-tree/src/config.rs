// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report configuration, read from `suite-tree.toml`.
//!
//! ```toml
//! group-status = "path"
//!
//! [leaf]
//! failure-messages = true
//!
//! [html]
//! title = "Test report"
//! ```

use crate::{GroupStatusKeying, errors::ConfigReadError};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{collections::BTreeSet, io};
use swrite::{SWrite, swrite};
use tracing::{debug, warn};

/// The config path used when none is specified, relative to the current directory.
pub const DEFAULT_CONFIG_PATH: &str = ".config/suite-tree.toml";

/// The HTML title used when none is configured.
pub const DEFAULT_HTML_TITLE: &str = "Test report";

/// Specifies where to load configuration from.
#[derive(Clone, Copy, Debug)]
pub enum ReportConfigLocation<'a> {
    /// Look for [`DEFAULT_CONFIG_PATH`] under the given directory. A missing file is not an
    /// error.
    Default(&'a Utf8Path),

    /// Load config from an explicit path.
    ///
    /// Returns an error if the file does not exist.
    Explicit(&'a Utf8Path),
}

/// Resolved report configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    /// How group statuses are keyed.
    pub group_status: GroupStatusKeying,

    /// Leaf rendering options.
    pub leaf: LeafConfig,

    /// HTML output options.
    pub html: HtmlConfig,
}

/// Leaf rendering options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafConfig {
    /// Whether failure messages are included in leaves.
    pub failure_messages: bool,
}

/// HTML output options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlConfig {
    /// The document title and page heading.
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            group_status: GroupStatusKeying::default(),
            leaf: LeafConfig {
                failure_messages: true,
            },
            html: HtmlConfig {
                title: DEFAULT_HTML_TITLE.to_owned(),
            },
        }
    }
}

impl ReportConfig {
    /// Loads config from the given location, falling back to defaults.
    pub fn from_location(location: ReportConfigLocation<'_>) -> Result<Self, ConfigReadError> {
        Self::from_location_with_warnings(location, &mut DefaultConfigWarnings)
    }

    /// Loads config from an explicit path. The file must exist.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigReadError> {
        Self::from_location(ReportConfigLocation::Explicit(path))
    }

    /// Parses config from a TOML string. `path` is used for error reporting.
    pub fn from_str(contents: &str, path: &Utf8Path) -> Result<Self, ConfigReadError> {
        Self::from_str_with_warnings(contents, path, &mut DefaultConfigWarnings)
    }

    fn from_location_with_warnings(
        location: ReportConfigLocation<'_>,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigReadError> {
        let (path, required) = match location {
            ReportConfigLocation::Default(dir) => (default_config_path(dir), false),
            ReportConfigLocation::Explicit(path) => (path.to_owned(), true),
        };

        debug!("config: attempting to load from {path}");
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound && !required => {
                debug!("config: file does not exist at {path}, using defaults");
                return Ok(Self::default());
            }
            Err(error) => return Err(ConfigReadError::Read { path, error }),
        };

        Self::from_str_with_warnings(&contents, &path, warnings)
    }

    fn from_str_with_warnings(
        contents: &str,
        path: &Utf8Path,
        warnings: &mut impl ConfigWarnings,
    ) -> Result<Self, ConfigReadError> {
        let (config, unknown) =
            DeserializedConfig::deserialize_toml(contents).map_err(|error| {
                ConfigReadError::Parse {
                    path: path.to_owned(),
                    error,
                }
            })?;
        if !unknown.is_empty() {
            warnings.unknown_config_keys(path, &unknown);
        }
        debug!("config: loaded from {path}");
        Ok(config.resolve())
    }
}

/// Receives warnings produced while reading config.
trait ConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>);
}

/// Logs warnings through `tracing`.
struct DefaultConfigWarnings;

impl ConfigWarnings for DefaultConfigWarnings {
    fn unknown_config_keys(&mut self, config_file: &Utf8Path, unknown: &BTreeSet<String>) {
        let mut unknown_str = String::new();
        if unknown.len() == 1 {
            // Print this on the same line.
            unknown_str.push_str("key: ");
            unknown_str.extend(unknown.iter().map(String::as_str));
        } else {
            unknown_str.push_str("keys:\n");
            for ignored_key in unknown {
                swrite!(unknown_str, "\n  - {ignored_key}");
            }
        }

        warn!("in config file {config_file}, ignoring unknown configuration {unknown_str}");
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedConfig {
    #[serde(default)]
    group_status: Option<GroupStatusKeying>,
    #[serde(default)]
    leaf: DeserializedLeafConfig,
    #[serde(default)]
    html: DeserializedHtmlConfig,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedLeafConfig {
    #[serde(default)]
    failure_messages: Option<bool>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeserializedHtmlConfig {
    #[serde(default)]
    title: Option<String>,
}

impl DeserializedConfig {
    fn deserialize_toml(contents: &str) -> Result<(Self, BTreeSet<String>), toml::de::Error> {
        let deserializer = toml::Deserializer::parse(contents)?;
        let mut unknown = BTreeSet::new();
        let config: DeserializedConfig = serde_ignored::deserialize(deserializer, |path| {
            unknown.insert(path.to_string());
        })?;
        Ok((config, unknown))
    }

    fn resolve(self) -> ReportConfig {
        let default = ReportConfig::default();
        ReportConfig {
            group_status: self.group_status.unwrap_or(default.group_status),
            leaf: LeafConfig {
                failure_messages: self
                    .leaf
                    .failure_messages
                    .unwrap_or(default.leaf.failure_messages),
            },
            html: HtmlConfig {
                title: self.html.title.unwrap_or(default.html.title),
            },
        }
    }
}

/// Returns the config path relative to `dir` that [`ReportConfigLocation::Default`] reads.
pub fn default_config_path(dir: &Utf8Path) -> Utf8PathBuf {
    dir.join(DEFAULT_CONFIG_PATH)
}
