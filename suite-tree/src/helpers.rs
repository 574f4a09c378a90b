// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for suite-tree.

use crate::LeafStyle;
use std::{fmt, time::Duration};

/// Utilities for pluralizing various words based on count or plurality.
pub mod plural {
    /// Returns "file" if `count` is 1, otherwise "files".
    pub fn files_str(count: usize) -> &'static str {
        if count == 1 { "file" } else { "files" }
    }

    /// Returns "test" if `count` is 1, otherwise "tests".
    pub fn tests_str(count: usize) -> &'static str {
        if count == 1 { "test" } else { "tests" }
    }
}

/// Characters used for tree output.
///
/// Provides both ASCII and Unicode variants for tree branches and leaf marks.
#[derive(Clone, Debug, Default)]
pub struct ThemeCharacters {
    use_unicode: bool,
}

impl ThemeCharacters {
    /// Switches to Unicode characters for richer terminal output.
    pub fn use_unicode(&mut self) {
        self.use_unicode = true;
    }

    /// Returns the tree branch character for non-last children: `├─` or `|-`.
    pub fn tree_branch(&self) -> &'static str {
        if self.use_unicode { "├─" } else { "|-" }
    }

    /// Returns the tree branch character for the last child: `└─` or `\-`.
    pub fn tree_last(&self) -> &'static str {
        if self.use_unicode { "└─" } else { "\\-" }
    }

    /// Returns the tree continuation line: `│ ` or `| `.
    pub fn tree_continuation(&self) -> &'static str {
        if self.use_unicode { "│ " } else { "| " }
    }

    /// Returns the tree space (no continuation): `  `.
    pub fn tree_space(&self) -> &'static str {
        "  "
    }

    /// Returns the mark printed before a leaf's title.
    pub fn leaf_mark(&self, style: LeafStyle) -> &'static str {
        match (style, self.use_unicode) {
            (LeafStyle::Passed, true) => "✓",
            (LeafStyle::Passed, false) => "+",
            (LeafStyle::Failed, true) => "✗",
            (LeafStyle::Failed, false) => "x",
            (LeafStyle::Pending, true) => "○",
            (LeafStyle::Pending, false) => "o",
            (LeafStyle::Other, _) => "?",
        }
    }
}

/// A test duration, formatted for humans.
#[derive(Debug)]
pub(crate) struct FormattedDuration(pub(crate) Duration);

impl fmt::Display for FormattedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let duration = self.0.as_secs_f64();
        if duration >= 60.0 {
            write!(f, "{}m {:.2}s", duration as u32 / 60, duration % 60.0)
        } else if duration >= 1.0 {
            write!(f, "{duration:.2}s")
        } else {
            write!(f, "{}ms", self.0.as_millis())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(Duration::ZERO, "0ms" ; "zero")]
    #[test_case(Duration::from_millis(12), "12ms" ; "millis")]
    #[test_case(Duration::from_millis(1500), "1.50s" ; "seconds")]
    #[test_case(Duration::from_millis(61_250), "1m 1.25s" ; "minutes")]
    fn formatted_duration(duration: Duration, expected: &str) {
        assert_eq!(FormattedDuration(duration).to_string(), expected);
    }

    #[test]
    fn theme_characters() {
        let mut theme = ThemeCharacters::default();
        assert_eq!(theme.tree_branch(), "|-");
        assert_eq!(theme.leaf_mark(LeafStyle::Failed), "x");
        theme.use_unicode();
        assert_eq!(theme.tree_last(), "└─");
        assert_eq!(theme.leaf_mark(LeafStyle::Passed), "✓");
        assert_eq!(theme.leaf_mark(LeafStyle::Other), "?");
    }
}
