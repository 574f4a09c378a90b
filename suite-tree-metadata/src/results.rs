// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::ReadResultsError;
use camino::Utf8Path;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, fs::File, io, time::Duration};

/// The root document handed over by the test runner: every file that was run, in order.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResults {
    /// The total number of tests across all files.
    #[serde(default)]
    pub num_total_tests: usize,

    /// The number of tests that passed.
    #[serde(default)]
    pub num_passed_tests: usize,

    /// The number of tests that failed.
    #[serde(default)]
    pub num_failed_tests: usize,

    /// The number of tests that were pending, skipped or disabled.
    #[serde(default)]
    pub num_pending_tests: usize,

    /// The number of tests marked as todo.
    #[serde(default)]
    pub num_todo_tests: usize,

    /// The number of test files that were run.
    #[serde(default)]
    pub num_total_test_suites: usize,

    /// Whether the runner considered the run successful.
    #[serde(default)]
    pub success: bool,

    /// Milliseconds since the Unix epoch at which the run started.
    #[serde(default)]
    pub start_time: Option<f64>,

    /// Per-file results, in the order the runner reported them.
    #[serde(default)]
    pub test_results: Vec<FileResult>,
}

impl AggregatedResults {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a results document from a JSON string.
    pub fn parse_json(json: impl AsRef<str>) -> Result<Self, ReadResultsError> {
        let mut deserializer = serde_json::Deserializer::from_str(json.as_ref());
        serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|error| ReadResultsError::Parse { path: None, error })
    }

    /// Reads a results document from the given reader.
    ///
    /// `path` is only used for error reporting; pass `None` for standard input.
    pub fn from_reader(
        reader: impl io::Read,
        path: Option<&Utf8Path>,
    ) -> Result<Self, ReadResultsError> {
        let mut deserializer = serde_json::Deserializer::from_reader(io::BufReader::new(reader));
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            ReadResultsError::Parse {
                path: path.map(|p| p.to_owned()),
                error,
            }
        })
    }

    /// Reads a results document from a file on disk.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ReadResultsError> {
        let file = File::open(path).map_err(|error| ReadResultsError::Io {
            path: Some(path.to_owned()),
            error,
        })?;
        Self::from_reader(file, Some(path))
    }

    /// Adds a file result and updates the totals.
    ///
    /// When generating a new document, use of this method is recommended over adding to
    /// `self.test_results` directly.
    pub fn add_file_result(&mut self, file_result: FileResult) -> &mut Self {
        self.num_total_tests += file_result.test_results.len();
        self.num_passed_tests += file_result.num_passing_tests;
        self.num_failed_tests += file_result.num_failing_tests;
        self.num_pending_tests += file_result.num_pending_tests;
        self.num_todo_tests += file_result.num_todo_tests;
        self.num_total_test_suites += 1;
        self.success = self.num_failed_tests == 0;
        self.test_results.push(file_result);
        self
    }
}

/// The results for a single test file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    /// The path of the test file, as reported by the runner.
    #[serde(alias = "name")]
    pub test_file_path: String,

    /// The outcomes of the individual tests in this file, in execution order.
    #[serde(default, alias = "assertionResults")]
    pub test_results: Vec<TestOutcome>,

    /// The number of tests in this file that passed.
    #[serde(default)]
    pub num_passing_tests: usize,

    /// The number of tests in this file that failed.
    #[serde(default)]
    pub num_failing_tests: usize,

    /// The number of tests in this file that were pending, skipped or disabled.
    #[serde(default)]
    pub num_pending_tests: usize,

    /// The number of tests in this file marked as todo.
    #[serde(default)]
    pub num_todo_tests: usize,

    /// A failure that applies to the file as a whole, e.g. a syntax error that prevented any test
    /// from running.
    #[serde(default, alias = "message", deserialize_with = "deserialize_non_empty")]
    pub failure_message: Option<String>,

    /// Timing information for the file.
    #[serde(default)]
    pub perf_stats: Option<PerfStats>,
}

impl FileResult {
    /// Creates a new `FileResult` with no outcomes.
    pub fn new(test_file_path: impl Into<String>) -> Self {
        Self {
            test_file_path: test_file_path.into(),
            ..Default::default()
        }
    }

    /// Sets a file-level failure message.
    pub fn set_failure_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.failure_message = Some(message.into());
        self
    }

    /// Adds an outcome to this file and updates the counts.
    pub fn add_test_result(&mut self, outcome: TestOutcome) -> &mut Self {
        match outcome.status {
            TestStatus::Passed => self.num_passing_tests += 1,
            TestStatus::Failed => self.num_failing_tests += 1,
            TestStatus::Pending | TestStatus::Skipped | TestStatus::Disabled => {
                self.num_pending_tests += 1
            }
            TestStatus::Todo => self.num_todo_tests += 1,
            TestStatus::Focused | TestStatus::Unknown => {}
        }
        self.test_results.push(outcome);
        self
    }

    /// Adds several outcomes to this file and updates the counts.
    pub fn add_test_results(&mut self, outcomes: impl IntoIterator<Item = TestOutcome>) -> &mut Self {
        for outcome in outcomes {
            self.add_test_result(outcome);
        }
        self
    }

    /// Returns the wall-clock time the runner spent on this file, if known.
    pub fn elapsed(&self) -> Option<Duration> {
        self.perf_stats.as_ref().and_then(PerfStats::elapsed)
    }
}

/// Timing information for a single test file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct PerfStats {
    /// Milliseconds since the Unix epoch at which the file started.
    pub start: f64,

    /// Milliseconds since the Unix epoch at which the file finished.
    pub end: f64,
}

impl PerfStats {
    /// Returns `end - start`, or `None` if the timestamps are out of order.
    pub fn elapsed(&self) -> Option<Duration> {
        millis_to_duration(self.end - self.start)
    }
}

/// The outcome of one executed test case.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcome {
    /// The names of the groups this test is nested in, outermost first.
    #[serde(default)]
    pub ancestor_titles: Vec<String>,

    /// The name of the test itself.
    #[serde(default)]
    pub title: String,

    /// The ancestor titles and the title, joined by spaces.
    #[serde(default)]
    pub full_name: String,

    /// The status of this test.
    pub status: TestStatus,

    /// The time taken by this test.
    #[serde(default, with = "duration_millis")]
    pub duration: Option<Duration>,

    /// Failure messages, which may contain ANSI color codes.
    #[serde(default)]
    pub failure_messages: Vec<String>,

    /// The number of assertions that passed.
    #[serde(default)]
    pub num_passing_asserts: usize,
}

impl TestOutcome {
    /// Creates a new top-level outcome with the given title and status.
    pub fn new(title: impl Into<String>, status: TestStatus) -> Self {
        let title = title.into();
        Self {
            ancestor_titles: Vec::new(),
            full_name: title.clone(),
            title,
            status,
            duration: None,
            failure_messages: Vec::new(),
            num_passing_asserts: 0,
        }
    }

    /// Sets the ancestor titles, outermost first, and updates the full name.
    pub fn set_ancestor_titles(
        &mut self,
        titles: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        self.ancestor_titles = titles.into_iter().map(Into::into).collect();
        self.full_name = self
            .ancestor_titles
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.title.as_str()))
            .collect::<Vec<_>>()
            .join(" ");
        self
    }

    /// Sets the time taken by this test.
    pub fn set_duration(&mut self, duration: Duration) -> &mut Self {
        self.duration = Some(duration);
        self
    }

    /// Adds a failure message.
    pub fn add_failure_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.failure_messages.push(message.into());
        self
    }
}

/// The status of a single test, as reported by the runner.
///
/// Only [`Passed`](Self::Passed) and [`Failed`](Self::Failed) take part in status aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    /// The test passed.
    Passed,
    /// The test failed.
    Failed,
    /// The test was skipped.
    Skipped,
    /// The test is pending.
    Pending,
    /// The test is a placeholder.
    Todo,
    /// The test is disabled.
    Disabled,
    /// The test was focused.
    Focused,
    /// A status this crate does not know about.
    #[serde(other)]
    Unknown,
}

impl TestStatus {
    /// Returns the runner's name for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Pending => "pending",
            Self::Todo => "todo",
            Self::Disabled => "disabled",
            Self::Focused => "focused",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn millis_to_duration(millis: f64) -> Option<Duration> {
    (millis.is_finite() && millis >= 0.0)
        .then(|| Duration::from_nanos((millis * 1_000_000.0).round() as u64))
}

fn deserialize_non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.is_empty()))
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::ref_option)]
    pub(super) fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => serializer.serialize_f64(duration.as_secs_f64() * 1000.0),
            None => serializer.serialize_none(),
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Negative or non-finite durations are dropped rather than rejected.
        Ok(Option::<f64>::deserialize(deserializer)?.and_then(super::millis_to_duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    static PROCESSOR_INPUT: &str = indoc! {r#"
        {
            "numTotalTests": 3,
            "numPassedTests": 1,
            "numFailedTests": 1,
            "numPendingTests": 1,
            "numTotalTestSuites": 1,
            "success": false,
            "startTime": 1700000000000,
            "testResults": [
                {
                    "testFilePath": "/repo/src/math.test.js",
                    "numPassingTests": 1,
                    "numFailingTests": 1,
                    "numPendingTests": 1,
                    "failureMessage": null,
                    "perfStats": { "start": 1700000000100, "end": 1700000001600 },
                    "testResults": [
                        {
                            "ancestorTitles": ["math", "add"],
                            "title": "adds numbers",
                            "fullName": "math add adds numbers",
                            "status": "passed",
                            "duration": 4,
                            "failureMessages": [],
                            "numPassingAsserts": 1
                        },
                        {
                            "ancestorTitles": ["math"],
                            "title": "divides by zero",
                            "fullName": "math divides by zero",
                            "status": "failed",
                            "duration": null,
                            "failureMessages": ["\u001b[31mexpected\u001b[39m Infinity"]
                        },
                        {
                            "ancestorTitles": [],
                            "title": "later",
                            "status": "todo"
                        }
                    ]
                }
            ]
        }
    "#};

    #[test]
    fn parse_processor_input() {
        let results = AggregatedResults::parse_json(PROCESSOR_INPUT).expect("valid document");
        assert_eq!(results.num_total_tests, 3);
        assert!(!results.success);
        assert_eq!(results.test_results.len(), 1);

        let file = &results.test_results[0];
        assert_eq!(file.test_file_path, "/repo/src/math.test.js");
        assert_eq!(file.failure_message, None);
        assert_eq!(file.elapsed(), Some(Duration::from_millis(1500)));

        let statuses: Vec<_> = file.test_results.iter().map(|t| t.status).collect();
        assert_eq!(
            statuses,
            [TestStatus::Passed, TestStatus::Failed, TestStatus::Todo]
        );
        assert_eq!(file.test_results[0].ancestor_titles, ["math", "add"]);
        assert_eq!(
            file.test_results[0].duration,
            Some(Duration::from_millis(4))
        );
        assert_eq!(file.test_results[1].duration, None);
        assert!(file.test_results[2].ancestor_titles.is_empty());
    }

    #[test]
    fn parse_json_reporter_output() {
        // `jest --json` names files and outcomes differently.
        let json = indoc! {r#"
            {
                "testResults": [
                    {
                        "name": "/repo/a.test.js",
                        "message": "",
                        "assertionResults": [
                            { "ancestorTitles": ["a"], "title": "t", "status": "passed" }
                        ]
                    },
                    {
                        "name": "/repo/b.test.js",
                        "message": "Test suite failed to run",
                        "assertionResults": []
                    }
                ]
            }
        "#};
        let results = AggregatedResults::parse_json(json).expect("valid document");
        assert_eq!(results.test_results[0].test_file_path, "/repo/a.test.js");
        assert_eq!(results.test_results[0].test_results.len(), 1);
        assert_eq!(results.test_results[0].failure_message, None);
        assert_eq!(
            results.test_results[1].failure_message.as_deref(),
            Some("Test suite failed to run")
        );
    }

    #[test_case("passed", TestStatus::Passed ; "passed")]
    #[test_case("failed", TestStatus::Failed ; "failed")]
    #[test_case("skipped", TestStatus::Skipped ; "skipped")]
    #[test_case("pending", TestStatus::Pending ; "pending")]
    #[test_case("todo", TestStatus::Todo ; "todo")]
    #[test_case("disabled", TestStatus::Disabled ; "disabled")]
    #[test_case("focused", TestStatus::Focused ; "focused")]
    #[test_case("exploded", TestStatus::Unknown ; "unrecognized")]
    fn parse_status(input: &str, expected: TestStatus) {
        let status: TestStatus =
            serde_json::from_str(&format!("\"{input}\"")).expect("status parses");
        assert_eq!(status, expected);
    }

    #[test]
    fn parse_error_reports_field_path() {
        let json = r#"{ "testResults": [ { "testFilePath": "a.js", "testResults": [ { "title": 1, "status": "passed" } ] } ] }"#;
        let error = AggregatedResults::parse_json(json).expect_err("title must be a string");
        match error {
            ReadResultsError::Parse { path, error } => {
                assert_eq!(path, None);
                assert_eq!(error.path().to_string(), "testResults[0].testResults[0].title");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn add_test_result_updates_counts() {
        let mut file = FileResult::new("a.test.js");
        file.add_test_results([
            TestOutcome::new("one", TestStatus::Passed),
            TestOutcome::new("two", TestStatus::Failed),
            TestOutcome::new("three", TestStatus::Skipped),
            TestOutcome::new("four", TestStatus::Todo),
        ]);
        assert_eq!(
            (
                file.num_passing_tests,
                file.num_failing_tests,
                file.num_pending_tests,
                file.num_todo_tests
            ),
            (1, 1, 1, 1)
        );

        let mut results = AggregatedResults::new();
        results.add_file_result(file);
        assert_eq!(results.num_total_tests, 4);
        assert_eq!(results.num_total_test_suites, 1);
        assert!(!results.success);
    }

    #[test]
    fn set_ancestor_titles_updates_full_name() {
        let mut outcome = TestOutcome::new("works", TestStatus::Passed);
        outcome.set_ancestor_titles(["outer", "inner"]);
        assert_eq!(outcome.full_name, "outer inner works");
    }
}
