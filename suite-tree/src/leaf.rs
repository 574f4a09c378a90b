// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering individual test outcomes into leaf nodes.

use crate::{LeafNode, LeafStyle};
use suite_tree_metadata::{TestOutcome, TestStatus};
use tracing::warn;

/// Converts one test outcome into one leaf node.
///
/// [`ReportTreeBuilder`](crate::ReportTreeBuilder) calls this once per outcome, in input order,
/// and treats it as a pure function.
pub trait LeafRenderer {
    /// Renders `outcome` into a leaf.
    fn render_leaf(&self, outcome: &TestOutcome) -> LeafNode;
}

impl<R: LeafRenderer + ?Sized> LeafRenderer for &R {
    fn render_leaf(&self, outcome: &TestOutcome) -> LeafNode {
        (**self).render_leaf(outcome)
    }
}

/// The leaf renderer used when none is specified.
#[derive(Clone, Debug)]
pub struct DefaultLeafRenderer {
    failure_messages: bool,
}

impl Default for DefaultLeafRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultLeafRenderer {
    /// Creates a renderer that includes failure messages.
    pub fn new() -> Self {
        Self {
            failure_messages: true,
        }
    }

    /// Sets whether failure messages are included in leaves.
    pub fn set_failure_messages(&mut self, failure_messages: bool) -> &mut Self {
        self.failure_messages = failure_messages;
        self
    }
}

impl LeafRenderer for DefaultLeafRenderer {
    fn render_leaf(&self, outcome: &TestOutcome) -> LeafNode {
        if outcome.status == TestStatus::Unknown {
            warn!(
                "test `{}` has an unrecognized status, rendering it as neutral",
                outcome.full_name
            );
        }

        let failure_messages = if self.failure_messages {
            outcome
                .failure_messages
                .iter()
                .map(strip_ansi_escapes::strip_str)
                .collect()
        } else {
            Vec::new()
        };

        LeafNode {
            style: LeafStyle::from(outcome.status),
            title: outcome.title.clone(),
            full_name: outcome.full_name.clone(),
            duration: outcome.duration,
            failure_messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use test_case::test_case;

    #[test_case(TestStatus::Passed, LeafStyle::Passed ; "passed")]
    #[test_case(TestStatus::Failed, LeafStyle::Failed ; "failed")]
    #[test_case(TestStatus::Pending, LeafStyle::Pending ; "pending")]
    #[test_case(TestStatus::Skipped, LeafStyle::Pending ; "skipped")]
    #[test_case(TestStatus::Todo, LeafStyle::Pending ; "todo")]
    #[test_case(TestStatus::Disabled, LeafStyle::Pending ; "disabled")]
    #[test_case(TestStatus::Focused, LeafStyle::Other ; "focused")]
    #[test_case(TestStatus::Unknown, LeafStyle::Other ; "unknown")]
    fn leaf_style(status: TestStatus, expected: LeafStyle) {
        let leaf = DefaultLeafRenderer::new().render_leaf(&TestOutcome::new("t", status));
        assert_eq!(leaf.style, expected);
    }

    #[test]
    fn render_failed_outcome() {
        let mut outcome = TestOutcome::new("divides", TestStatus::Failed);
        outcome
            .set_ancestor_titles(["math"])
            .set_duration(Duration::from_millis(12))
            .add_failure_message("\u{1b}[31mExpected\u{1b}[39m: 1\nReceived: 2");

        let leaf = DefaultLeafRenderer::new().render_leaf(&outcome);
        assert_eq!(
            leaf,
            LeafNode {
                style: LeafStyle::Failed,
                title: "divides".to_owned(),
                full_name: "math divides".to_owned(),
                duration: Some(Duration::from_millis(12)),
                failure_messages: vec!["Expected: 1\nReceived: 2".to_owned()],
            }
        );

        let mut renderer = DefaultLeafRenderer::new();
        renderer.set_failure_messages(false);
        assert!(renderer.render_leaf(&outcome).failure_messages.is_empty());
    }
}
