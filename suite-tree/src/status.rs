// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate pass/fail classification for files and the groups nested in them.
//!
//! Only [`TestStatus::Passed`] and [`TestStatus::Failed`] take part in aggregation. Every other
//! status (pending, skipped, todo and so on) is neutral: it never flips a class.

use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};
use suite_tree_metadata::{FileResult, TestStatus};
use tracing::debug;

/// The aggregate status of a file or group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusClass {
    /// Every aggregated test beneath the node passed.
    Pass,
    /// Every aggregated test beneath the node failed.
    Fail,
    /// The node contains both passing and failing tests.
    Mixed,
}

impl StatusClass {
    /// Combines two classes.
    ///
    /// This is commutative and associative, and `Mixed` is absorbing.
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Pass, Self::Pass) => Self::Pass,
            (Self::Fail, Self::Fail) => Self::Fail,
            _ => Self::Mixed,
        }
    }

    /// Returns the class a single test contributes, or `None` if its status is neutral.
    pub fn from_test_status(status: TestStatus) -> Option<Self> {
        match status {
            TestStatus::Passed => Some(Self::Pass),
            TestStatus::Failed => Some(Self::Fail),
            TestStatus::Skipped
            | TestStatus::Pending
            | TestStatus::Todo
            | TestStatus::Disabled
            | TestStatus::Focused
            | TestStatus::Unknown => None,
        }
    }

    /// Returns the tag used in text output: `PASS`, `FAIL` or `MIXED`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Mixed => "MIXED",
        }
    }

    /// Returns the style class used in HTML output.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Pass => "status-pass",
            Self::Fail => "status-fail",
            Self::Mixed => "status-mixed",
        }
    }

    /// Returns true if this class includes at least one failing test.
    pub fn has_failures(self) -> bool {
        matches!(self, Self::Fail | Self::Mixed)
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A running aggregate for one node.
///
/// Starts out empty, so the first aggregated test decides the class on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusAccumulator {
    current: Option<StatusClass>,
}

impl StatusAccumulator {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a class into the aggregate.
    pub fn add(&mut self, class: StatusClass) -> &mut Self {
        self.current = Some(match self.current {
            Some(current) => current.combine(class),
            None => class,
        });
        self
    }

    /// Folds a test status into the aggregate, ignoring neutral statuses.
    pub fn add_test_status(&mut self, status: TestStatus) -> &mut Self {
        if let Some(class) = StatusClass::from_test_status(status) {
            self.add(class);
        }
        self
    }

    /// Returns the aggregate so far, or `None` if nothing has been folded in.
    pub fn get(&self) -> Option<StatusClass> {
        self.current
    }

    /// Returns the aggregate, defaulting to `Pass` if nothing has been folded in.
    pub fn finish(&self) -> StatusClass {
        self.current.unwrap_or(StatusClass::Pass)
    }
}

impl FromIterator<StatusClass> for StatusAccumulator {
    fn from_iter<I: IntoIterator<Item = StatusClass>>(iter: I) -> Self {
        let mut acc = Self::new();
        for class in iter {
            acc.add(class);
        }
        acc
    }
}

/// How group statuses are keyed while classifying a file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupStatusKeying {
    /// Key by the full ancestor path, so that each group node gets the status of exactly the
    /// tests beneath it.
    #[default]
    Path,

    /// Key by the bare group title.
    ///
    /// Groups at different paths that share a title share one status. This matches the output
    /// of older HTML reporters.
    Title,
}

impl GroupStatusKeying {
    /// Returns the name used in config files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for GroupStatusKeying {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identity of a group node within one file: a non-empty prefix of an outcome's ancestor
/// titles, outermost first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey<'a> {
    titles: &'a [String],
}

impl<'a> GroupKey<'a> {
    /// Creates a key from a prefix of ancestor titles. Returns `None` if `titles` is empty.
    pub fn new(titles: &'a [String]) -> Option<Self> {
        (!titles.is_empty()).then_some(Self { titles })
    }

    /// Returns the key for the group at `depth` (0-based) along `ancestor_titles`.
    ///
    /// # Panics
    ///
    /// Panics if `depth` is out of bounds.
    pub fn at_depth(ancestor_titles: &'a [String], depth: usize) -> Self {
        Self {
            titles: &ancestor_titles[..=depth],
        }
    }

    /// Returns the title of this group.
    pub fn title(&self) -> &'a str {
        // The slice is never empty.
        &self.titles[self.titles.len() - 1]
    }

    /// Returns all titles along the path, outermost first.
    pub fn titles(&self) -> &'a [String] {
        self.titles
    }

    /// Returns the 0-based depth of this group.
    pub fn depth(&self) -> usize {
        self.titles.len() - 1
    }

    /// Returns the key of the enclosing group, or `None` for a top-level group.
    pub fn parent(&self) -> Option<Self> {
        Self::new(&self.titles[..self.titles.len() - 1])
    }
}

impl fmt::Display for GroupKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, title) in self.titles.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(title)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum StatusKey<'a> {
    Title(&'a str),
    Path(GroupKey<'a>),
}

impl<'a> StatusKey<'a> {
    fn new(keying: GroupStatusKeying, key: GroupKey<'a>) -> Self {
        match keying {
            GroupStatusKeying::Path => Self::Path(key),
            GroupStatusKeying::Title => Self::Title(key.title()),
        }
    }
}

/// The statuses computed for one file, ready to be consulted while its tree is assembled.
#[derive(Clone, Debug)]
pub struct FileClassification<'a> {
    file_status: StatusClass,
    keying: GroupStatusKeying,
    groups: HashMap<StatusKey<'a>, StatusAccumulator>,
}

impl<'a> FileClassification<'a> {
    /// Returns the aggregate status of the file as a whole.
    pub fn file_status(&self) -> StatusClass {
        self.file_status
    }

    /// Returns the keying used for group statuses.
    pub fn keying(&self) -> GroupStatusKeying {
        self.keying
    }

    /// Returns the aggregate status of the group identified by `key`.
    ///
    /// Groups with no aggregated tests beneath them (for example, groups containing only
    /// pending tests) are `Pass`.
    pub fn group_status(&self, key: GroupKey<'a>) -> StatusClass {
        self.groups
            .get(&StatusKey::new(self.keying, key))
            .map_or(StatusClass::Pass, StatusAccumulator::finish)
    }

    /// Returns the number of distinct status entries recorded for groups.
    pub fn group_entry_count(&self) -> usize {
        self.groups.len()
    }
}

/// Classifies every outcome of `file`, computing the file status and one status per group.
pub fn classify_file(file: &FileResult, keying: GroupStatusKeying) -> FileClassification<'_> {
    let mut file_status = StatusAccumulator::new();
    let mut groups: HashMap<StatusKey<'_>, StatusAccumulator> = HashMap::new();

    for outcome in &file.test_results {
        let Some(class) = StatusClass::from_test_status(outcome.status) else {
            continue;
        };
        file_status.add(class);
        for depth in 0..outcome.ancestor_titles.len() {
            let key = GroupKey::at_depth(&outcome.ancestor_titles, depth);
            groups
                .entry(StatusKey::new(keying, key))
                .or_default()
                .add(class);
        }
    }

    // A file that failed to run at all has no outcomes, but is not a pass.
    if file.test_results.is_empty() && file.failure_message.is_some() {
        file_status.add(StatusClass::Fail);
    }

    let file_status = file_status.finish();
    debug!(
        "classified {}: {file_status} ({} group entries, keyed by {keying})",
        file.test_file_path,
        groups.len(),
    );

    FileClassification {
        file_status,
        keying,
        groups,
    }
}
