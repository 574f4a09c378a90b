// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable tree output for terminals.

use crate::{
    LeafNode, LeafStyle, ReportNode, ReportSummary, SectionNode, StatusClass,
    helpers::{FormattedDuration, ThemeCharacters, plural},
};
use owo_colors::{OwoColorize, Style};
use std::fmt;

/// Displays report trees with branch characters, status tags and a summary line.
#[derive(Clone, Debug)]
pub struct TreeDisplay<'a> {
    nodes: &'a [ReportNode],
    styles: Styles,
    theme_characters: ThemeCharacters,
    show_durations: bool,
}

impl<'a> TreeDisplay<'a> {
    /// Creates a new display over the given root nodes, with ASCII characters and no colors.
    pub fn new(nodes: &'a [ReportNode]) -> Self {
        Self {
            nodes,
            styles: Styles::default(),
            theme_characters: ThemeCharacters::default(),
            show_durations: true,
        }
    }

    /// Colorizes output.
    pub fn colorize(&mut self) -> &mut Self {
        self.styles.colorize();
        self
    }

    /// Uses Unicode characters for branches and leaf marks.
    pub fn use_unicode(&mut self) -> &mut Self {
        self.theme_characters.use_unicode();
        self
    }

    /// Sets whether test durations are shown.
    pub fn set_show_durations(&mut self, show_durations: bool) -> &mut Self {
        self.show_durations = show_durations;
        self
    }

    fn fmt_file(&self, section: &SectionNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {}",
            self.status_tag(section.status()),
            section.header().style(self.styles.header),
        )?;
        if let Some(message) = section.failure_message() {
            for line in message.lines() {
                write_message_line("    ", line, f)?;
            }
        }

        let mut indent = String::from("  ");
        self.fmt_children(section.children(), &mut indent, f)
    }

    fn fmt_children(
        &self,
        children: &[ReportNode],
        indent: &mut String,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for (index, child) in children.iter().enumerate() {
            let is_last = index + 1 == children.len();
            let branch = if is_last {
                self.theme_characters.tree_last()
            } else {
                self.theme_characters.tree_branch()
            };
            write!(f, "{indent}{branch} ")?;

            let len = indent.len();
            indent.push_str(if is_last {
                self.theme_characters.tree_space()
            } else {
                self.theme_characters.tree_continuation()
            });

            match child {
                ReportNode::File(section) | ReportNode::Group(section) => {
                    writeln!(
                        f,
                        "{} {}",
                        self.status_tag(section.status()),
                        section.header()
                    )?;
                    self.fmt_children(section.children(), indent, f)?;
                }
                ReportNode::Leaf(leaf) => self.fmt_leaf(leaf, indent, f)?,
            }

            indent.truncate(len);
        }
        Ok(())
    }

    fn fmt_leaf(&self, leaf: &LeafNode, indent: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let style = self.styles.leaf(leaf.style);
        write!(
            f,
            "{} {}",
            self.theme_characters.leaf_mark(leaf.style).style(style),
            leaf.title,
        )?;
        if self.show_durations
            && let Some(duration) = leaf.duration
        {
            let duration = format!("({})", FormattedDuration(duration));
            write!(f, " {}", self.styles.duration.style(duration))?;
        }
        writeln!(f)?;

        for message in &leaf.failure_messages {
            for line in message.lines() {
                write_message_line(indent, line, f)?;
            }
        }
        Ok(())
    }

    fn status_tag(&self, status: StatusClass) -> impl fmt::Display + use<> {
        // Pad before styling so escape codes don't count towards the width.
        self.styles
            .status(status)
            .style(format!("{:<5}", status.as_str()))
    }

    fn fmt_summary(&self, summary: &ReportSummary, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_files = summary.total_files();
        let total_tests = summary.total_tests();
        writeln!(
            f,
            "{} {} ({} {}): {} passed, {} failed, {} mixed",
            total_files.style(self.styles.count),
            plural::files_str(total_files),
            total_tests.style(self.styles.count),
            plural::tests_str(total_tests),
            summary.passed_files.style(self.styles.pass),
            summary.failed_files.style(self.styles.fail),
            summary.mixed_files.style(self.styles.mixed),
        )
    }
}

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.nodes {
            match node {
                ReportNode::File(section) => self.fmt_file(section, f)?,
                // Groups and leaves are never roots when built by ReportTreeBuilder, but display
                // them sensibly anyway.
                other => {
                    let mut indent = String::new();
                    self.fmt_children(std::slice::from_ref(other), &mut indent, f)?;
                }
            }
        }

        if !self.nodes.is_empty() {
            writeln!(f)?;
        }
        self.fmt_summary(&ReportSummary::new(self.nodes), f)
    }
}

fn write_message_line(indent: &str, line: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if line.trim().is_empty() {
        // Keep continuation lines, but no trailing spaces.
        writeln!(f, "{}", indent.trim_end())
    } else {
        writeln!(f, "{indent}  {line}")
    }
}

#[derive(Clone, Debug, Default)]
struct Styles {
    header: Style,
    count: Style,
    pass: Style,
    fail: Style,
    mixed: Style,
    pending: Style,
    duration: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.header = Style::new().bold();
        self.count = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.mixed = Style::new().yellow().bold();
        self.pending = Style::new().yellow();
        self.duration = Style::new().dimmed();
    }

    fn status(&self, status: StatusClass) -> Style {
        match status {
            StatusClass::Pass => self.pass,
            StatusClass::Fail => self.fail,
            StatusClass::Mixed => self.mixed,
        }
    }

    fn leaf(&self, style: LeafStyle) -> Style {
        match style {
            LeafStyle::Passed => self.pass,
            LeafStyle::Failed => self.fail,
            LeafStyle::Pending | LeafStyle::Other => self.pending,
        }
    }
}
