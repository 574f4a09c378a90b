// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Hierarchical pass/fail reports for flat test results.
//!
//! Test runners such as Jest report each executed test with the list of `describe` titles
//! enclosing it. [`ReportTreeBuilder`] reconstructs the nesting from those lists: one file node
//! per test file, one group node per distinct ancestor path, and one leaf per test, with every
//! file and group classified as [`StatusClass::Pass`], [`StatusClass::Fail`] or
//! [`StatusClass::Mixed`].
//!
//! The resulting [`ReportNode`] trees can be written out with [`ReportWriter`] as a terminal tree,
//! a standalone HTML document or JSON.
//!
//! ```
//! use suite_tree::{ReportTreeBuilder, StatusClass};
//! use suite_tree_metadata::{FileResult, TestOutcome, TestStatus};
//!
//! let mut file = FileResult::new("math.test.js");
//! let mut adds = TestOutcome::new("adds", TestStatus::Passed);
//! adds.set_ancestor_titles(["math"]);
//! let mut divides = TestOutcome::new("divides", TestStatus::Failed);
//! divides.set_ancestor_titles(["math"]);
//! file.add_test_results([adds, divides]);
//!
//! let nodes = ReportTreeBuilder::new().build(&[file]);
//! assert_eq!(nodes[0].status(), Some(StatusClass::Mixed));
//! assert_eq!(nodes[0].children()[0].header(), Some("math"));
//! ```

mod builder;
pub mod config;
pub mod display;
pub mod errors;
pub mod format;
mod helpers;
pub mod html;
mod leaf;
mod node;
mod status;

pub use builder::*;
pub use config::{HtmlConfig, LeafConfig, ReportConfig, ReportConfigLocation};
pub use display::TreeDisplay;
pub use format::{ReportFormat, ReportWriter};
pub use helpers::plural;
pub use html::HtmlWriter;
pub use leaf::*;
pub use node::*;
pub use status::*;
