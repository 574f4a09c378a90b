// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `suite-tree` failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum SuiteTreeExitCode {}

impl SuiteTreeExitCode {
    /// No errors occurred and the report was written.
    pub const OK: i32 = 0;

    /// `--fail-on-failures` was passed and at least one file contains failing tests.
    pub const FAILURES_PRESENT: i32 = 100;

    /// Reading or parsing the results document produced an error.
    pub const INPUT_READ_FAILED: i32 = 102;

    /// A user issue happened while setting up the invocation, e.g. a bad config file.
    pub const SETUP_ERROR: i32 = 96;

    /// Writing the report to stdout or to the output file produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
