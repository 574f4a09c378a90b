// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writing report trees in any of the supported output formats.

use crate::{HtmlWriter, ReportNode, TreeDisplay, errors::WriteReportError};
use std::{fmt, io};

/// Output formats for reports.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum ReportFormat {
    /// A tree for terminals.
    #[default]
    Text,

    /// A standalone HTML document.
    Html,

    /// Prettified JSON.
    Json,
}

impl ReportFormat {
    /// Returns the name of this format as used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Writes report trees in a chosen format.
#[derive(Clone, Debug)]
pub struct ReportWriter {
    format: ReportFormat,
    html: HtmlWriter,
    colorize: bool,
    use_unicode: bool,
}

impl ReportWriter {
    /// Creates a writer for `format`, with default HTML settings, no colors and ASCII characters.
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            html: HtmlWriter::new(),
            colorize: false,
            use_unicode: false,
        }
    }

    /// Returns the output format.
    pub fn format(&self) -> ReportFormat {
        self.format
    }

    /// Sets the HTML writer used for [`ReportFormat::Html`].
    pub fn set_html_writer(&mut self, html: HtmlWriter) -> &mut Self {
        self.html = html;
        self
    }

    /// Colorizes text output.
    pub fn colorize(&mut self) -> &mut Self {
        self.colorize = true;
        self
    }

    /// Uses Unicode characters in text output.
    pub fn use_unicode(&mut self) -> &mut Self {
        self.use_unicode = true;
        self
    }

    /// Writes `nodes` to `writer`.
    pub fn write(
        &self,
        nodes: &[ReportNode],
        mut writer: impl io::Write,
    ) -> Result<(), WriteReportError> {
        match self.format {
            ReportFormat::Text => {
                let mut display = TreeDisplay::new(nodes);
                if self.colorize {
                    display.colorize();
                }
                if self.use_unicode {
                    display.use_unicode();
                }
                write!(writer, "{display}")?;
            }
            ReportFormat::Html => self.html.write(nodes, &mut writer)?,
            ReportFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, nodes).map_err(WriteReportError::Json)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportTreeBuilder;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;
    use suite_tree_metadata::{FileResult, TestOutcome, TestStatus};

    fn nodes() -> Vec<ReportNode> {
        let mut file = FileResult::new("a.test.js");
        let mut passes = TestOutcome::new("passes", TestStatus::Passed);
        passes
            .set_ancestor_titles(["suite"])
            .set_duration(Duration::from_millis(7));
        let mut fails = TestOutcome::new("fails", TestStatus::Failed);
        fails
            .set_ancestor_titles(["suite"])
            .add_failure_message("boom");
        file.add_test_results([passes, fails]);
        ReportTreeBuilder::new().build(&[file])
    }

    fn write(format: ReportFormat) -> String {
        let mut buf = Vec::new();
        ReportWriter::new(format)
            .write(&nodes(), &mut buf)
            .expect("writing to a buffer succeeds");
        String::from_utf8(buf).expect("output is UTF-8")
    }

    #[test]
    fn json_output() {
        let value: serde_json::Value =
            serde_json::from_str(&write(ReportFormat::Json)).expect("output is valid JSON");
        assert_eq!(
            value,
            json!([{
                "kind": "file",
                "status": "mixed",
                "header": "a.test.js",
                "children": [{
                    "kind": "group",
                    "status": "mixed",
                    "header": "suite",
                    "children": [
                        {
                            "kind": "leaf",
                            "style": "passed",
                            "title": "passes",
                            "full_name": "suite passes",
                            "duration": 7,
                        },
                        {
                            "kind": "leaf",
                            "style": "failed",
                            "title": "fails",
                            "full_name": "suite fails",
                            "duration": null,
                            "failure_messages": ["boom"],
                        },
                    ],
                }],
            }])
        );
    }

    #[test]
    fn text_and_html_outputs() {
        let text = write(ReportFormat::Text);
        assert!(text.starts_with("MIXED a.test.js\n"), "text: {text}");

        let html = write(ReportFormat::Html);
        assert!(html.starts_with("<!DOCTYPE html>"), "html: {html}");
    }
}
