// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError, OutputWriter,
    errors::Result,
    output::{OutputContext, OutputOpts, clap_styles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, ValueEnum};
use std::{
    fs::File,
    io::{self, BufWriter},
};
use suite_tree::{
    GroupStatusKeying, HtmlWriter, ReportConfig, ReportConfigLocation, ReportFormat,
    ReportSummary, ReportTreeBuilder, ReportWriter,
};
use suite_tree_metadata::{AggregatedResults, SuiteTreeExitCode};
use tracing::{debug, info};

/// Turn flat test runner results into hierarchical pass/fail reports.
///
/// Reads the aggregated results JSON produced by a test runner (for example Jest's results
/// processor input or `jest --json`) and writes one section per test file, one nested group per
/// `describe` block, and one entry per test.
#[derive(Debug, Parser)]
#[command(version, name = "suite-tree", styles = clap_styles::style())]
pub struct SuiteTreeApp {
    /// Results JSON to read [default: standard input]
    ///
    /// Pass `-` to read from standard input explicitly.
    #[arg(value_name = "INPUT")]
    input: Option<Utf8PathBuf>,

    #[command(flatten)]
    report_opts: ReportOpts,

    #[command(flatten)]
    config_opts: ConfigOpts,

    #[command(flatten)]
    output: OutputOpts,
}

impl SuiteTreeApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code on success.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let config = self.config_opts.make_config(&self.report_opts)?;
        debug!(
            "group statuses keyed by {}, failure messages {}",
            config.group_status,
            if config.leaf.failure_messages {
                "included"
            } else {
                "omitted"
            },
        );

        let results = read_results(self.input.as_deref())?;
        let nodes = ReportTreeBuilder::from_config(&config).build(&results.test_results);
        let summary = ReportSummary::new(&nodes);
        debug!(
            "built {} file nodes with {} tests",
            summary.total_files(),
            summary.total_tests(),
        );

        let mut writer = ReportWriter::new(self.report_opts.format.into());
        writer.set_html_writer(HtmlWriter::from_config(&config.html));

        match &self.report_opts.output {
            Some(path) => {
                // Files get plain output unless colors are explicitly requested.
                if output.color == crate::output::Color::Always {
                    writer.colorize();
                }
                writer.use_unicode();

                let file = File::create(path).map_err(|err| ExpectedError::OutputFileCreate {
                    path: path.clone(),
                    err,
                })?;
                writer.write(&nodes, BufWriter::new(file))?;
                info!("wrote {} report to {path}", writer.format());
            }
            None => {
                if output_writer.is_process_stdout() {
                    if output.color.should_colorize(supports_color::Stream::Stdout) {
                        writer.colorize();
                    }
                    if supports_unicode::on(supports_unicode::Stream::Stdout) {
                        writer.use_unicode();
                    }
                }
                writer.write(&nodes, output_writer.stdout_writer())?;
            }
        }

        if self.report_opts.fail_on_failures && summary.has_failures() {
            return Err(ExpectedError::FailuresPresent {
                failed_files: summary.failed_files + summary.mixed_files,
            });
        }

        Ok(SuiteTreeExitCode::OK)
    }
}

fn read_results(input: Option<&Utf8Path>) -> Result<AggregatedResults> {
    let results = match input {
        Some(path) if path.as_str() != "-" => {
            debug!("reading results from {path}");
            AggregatedResults::from_path(path)?
        }
        _ => {
            debug!("reading results from standard input");
            AggregatedResults::from_reader(io::stdin().lock(), None)?
        }
    };
    Ok(results)
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Report options")]
struct ReportOpts {
    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t, value_name = "FORMAT")]
    format: FormatOpt,

    /// Write the report to this file instead of standard output
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<Utf8PathBuf>,

    /// How group statuses are keyed [default: from config, or path]
    ///
    /// `path` gives each group the status of exactly the tests beneath it. `title` shares one
    /// status between all groups in a file with the same title.
    #[arg(long, value_enum, value_name = "MODE")]
    group_status: Option<GroupStatusOpt>,

    /// Title of the HTML report [default: from config, or "Test report"]
    #[arg(long, value_name = "TITLE")]
    title: Option<String>,

    /// Omit per-test failure messages
    #[arg(long)]
    no_failure_messages: bool,

    /// Exit with a non-zero code if any file has failing tests
    #[arg(long)]
    fail_on_failures: bool,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Config options")]
struct ConfigOpts {
    /// Config file [default: .config/suite-tree.toml if present]
    #[arg(long, value_name = "PATH", env = "SUITE_TREE_CONFIG")]
    config_file: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    /// Loads config and applies command-line overrides on top of it.
    fn make_config(&self, report_opts: &ReportOpts) -> Result<ReportConfig> {
        let mut config = match &self.config_file {
            Some(path) => ReportConfig::from_location(ReportConfigLocation::Explicit(path))?,
            None => {
                let current_dir = current_dir()?;
                ReportConfig::from_location(ReportConfigLocation::Default(&current_dir))?
            }
        };

        if let Some(group_status) = report_opts.group_status {
            config.group_status = group_status.into();
        }
        if let Some(title) = &report_opts.title {
            config.html.title.clone_from(title);
        }
        if report_opts.no_failure_messages {
            config.leaf.failure_messages = false;
        }
        Ok(config)
    }
}

fn current_dir() -> Result<Utf8PathBuf> {
    let current_dir =
        std::env::current_dir().map_err(|err| ExpectedError::CurrentDir { err })?;
    Utf8PathBuf::try_from(current_dir).map_err(|err| ExpectedError::CurrentDir {
        err: err.into_io_error(),
    })
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum FormatOpt {
    /// A tree for terminals
    #[default]
    Text,
    /// A standalone HTML document
    Html,
    /// JSON
    Json,
}

impl From<FormatOpt> for ReportFormat {
    fn from(format: FormatOpt) -> Self {
        match format {
            FormatOpt::Text => ReportFormat::Text,
            FormatOpt::Html => ReportFormat::Html,
            FormatOpt::Json => ReportFormat::Json,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum GroupStatusOpt {
    /// Key by the full ancestor path
    Path,
    /// Key by the bare group title
    Title,
}

impl From<GroupStatusOpt> for GroupStatusKeying {
    fn from(opt: GroupStatusOpt) -> Self {
        match opt {
            GroupStatusOpt::Path => GroupStatusKeying::Path,
            GroupStatusOpt::Title => GroupStatusKeying::Title,
        }
    }
}
