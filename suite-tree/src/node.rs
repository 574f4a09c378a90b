// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Presentation nodes produced by [`ReportTreeBuilder`](crate::ReportTreeBuilder).

use crate::StatusClass;
use serde::{Serialize, Serializer};
use std::time::Duration;
use suite_tree_metadata::TestStatus;

/// A node in a report tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ReportNode {
    /// One node per test file. Always a root.
    File(SectionNode),

    /// One node per distinct ancestor path within a file.
    Group(SectionNode),

    /// One node per test outcome.
    Leaf(LeafNode),
}

impl ReportNode {
    /// Returns the section for file and group nodes.
    pub fn as_section(&self) -> Option<&SectionNode> {
        match self {
            Self::File(section) | Self::Group(section) => Some(section),
            Self::Leaf(_) => None,
        }
    }

    /// Returns the leaf for leaf nodes.
    pub fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::File(_) | Self::Group(_) => None,
        }
    }

    /// Returns the aggregate status for file and group nodes.
    pub fn status(&self) -> Option<StatusClass> {
        self.as_section().map(SectionNode::status)
    }

    /// Returns the header for file and group nodes.
    pub fn header(&self) -> Option<&str> {
        self.as_section().map(SectionNode::header)
    }

    /// Returns the children of this node. Leaves have none.
    pub fn children(&self) -> &[ReportNode] {
        match self {
            Self::File(section) | Self::Group(section) => section.children(),
            Self::Leaf(_) => &[],
        }
    }

    /// Returns the style class used in HTML output.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::File(section) | Self::Group(section) => section.status().css_class(),
            Self::Leaf(leaf) => leaf.style.css_class(),
        }
    }

    /// Returns the number of leaves in this subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::File(section) | Self::Group(section) => {
                section.children().iter().map(ReportNode::leaf_count).sum()
            }
            Self::Leaf(_) => 1,
        }
    }

    /// Returns the number of group nodes in this subtree.
    pub fn group_count(&self) -> usize {
        let own = usize::from(matches!(self, Self::Group(_)));
        own + self
            .children()
            .iter()
            .map(ReportNode::group_count)
            .sum::<usize>()
    }

    /// Calls `f` for every leaf in this subtree, in display order.
    pub fn for_each_leaf<'a>(&'a self, f: &mut impl FnMut(&'a LeafNode)) {
        match self {
            Self::File(section) | Self::Group(section) => {
                for child in section.children() {
                    child.for_each_leaf(f);
                }
            }
            Self::Leaf(leaf) => f(leaf),
        }
    }
}

/// A file or group node: a status, a header, and ordered children.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SectionNode {
    status: StatusClass,
    header: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_message: Option<String>,
    children: Vec<ReportNode>,
}

impl SectionNode {
    pub(crate) fn new(
        status: StatusClass,
        header: String,
        failure_message: Option<String>,
        children: Vec<ReportNode>,
    ) -> Self {
        Self {
            status,
            header,
            failure_message,
            children,
        }
    }

    /// The aggregate status of everything beneath this node.
    pub fn status(&self) -> StatusClass {
        self.status
    }

    /// The file path for file nodes, or the group title for group nodes.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// A failure that applies to the whole file, such as a syntax error. Only set on file nodes.
    pub fn failure_message(&self) -> Option<&str> {
        self.failure_message.as_deref()
    }

    /// Child groups and leaves, in input order.
    pub fn children(&self) -> &[ReportNode] {
        &self.children
    }
}

/// The rendered form of one test outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LeafNode {
    /// How the leaf should be styled.
    pub style: LeafStyle,

    /// The test's own title.
    pub title: String,

    /// The ancestor titles and the title, joined by spaces.
    pub full_name: String,

    /// The time the test took, if known.
    #[serde(serialize_with = "serialize_duration_ms")]
    pub duration: Option<Duration>,

    /// Failure messages with terminal escape codes removed.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failure_messages: Vec<String>,
}

/// The style of a leaf, derived from the test's own status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LeafStyle {
    /// The test passed.
    Passed,
    /// The test failed.
    Failed,
    /// The test was pending, skipped, disabled or a todo.
    Pending,
    /// Any other status.
    Other,
}

impl LeafStyle {
    /// Returns the style class used in HTML output.
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Passed => "status-pass",
            Self::Failed => "status-fail",
            Self::Pending => "status-pending",
            Self::Other => "status-other",
        }
    }
}

impl From<TestStatus> for LeafStyle {
    fn from(status: TestStatus) -> Self {
        match status {
            TestStatus::Passed => Self::Passed,
            TestStatus::Failed => Self::Failed,
            TestStatus::Pending | TestStatus::Skipped | TestStatus::Todo | TestStatus::Disabled => {
                Self::Pending
            }
            TestStatus::Focused | TestStatus::Unknown => Self::Other,
        }
    }
}

#[allow(clippy::ref_option)]
fn serialize_duration_ms<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match duration {
        Some(duration) => {
            serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
        }
        None => serializer.serialize_none(),
    }
}

/// Counts of nodes in a report, by status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// File nodes whose status is `Pass`.
    pub passed_files: usize,
    /// File nodes whose status is `Fail`.
    pub failed_files: usize,
    /// File nodes whose status is `Mixed`.
    pub mixed_files: usize,
    /// Leaves styled as passed.
    pub passed_tests: usize,
    /// Leaves styled as failed.
    pub failed_tests: usize,
    /// Leaves styled as pending or other.
    pub other_tests: usize,
}

impl ReportSummary {
    /// Computes the summary of the given root nodes.
    pub fn new(nodes: &[ReportNode]) -> Self {
        let mut summary = Self::default();
        for node in nodes {
            match node.status() {
                Some(StatusClass::Pass) => summary.passed_files += 1,
                Some(StatusClass::Fail) => summary.failed_files += 1,
                Some(StatusClass::Mixed) => summary.mixed_files += 1,
                None => {}
            }
            node.for_each_leaf(&mut |leaf| match leaf.style {
                LeafStyle::Passed => summary.passed_tests += 1,
                LeafStyle::Failed => summary.failed_tests += 1,
                LeafStyle::Pending | LeafStyle::Other => summary.other_tests += 1,
            });
        }
        summary
    }

    /// The total number of file nodes.
    pub fn total_files(&self) -> usize {
        self.passed_files + self.failed_files + self.mixed_files
    }

    /// The total number of leaves.
    pub fn total_tests(&self) -> usize {
        self.passed_tests + self.failed_tests + self.other_tests
    }

    /// Returns true if any file contains a failing test.
    pub fn has_failures(&self) -> bool {
        self.failed_files + self.mixed_files > 0
    }
}
