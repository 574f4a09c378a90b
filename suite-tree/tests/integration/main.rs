// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: results JSON on disk, through config and the builder, to every output
//! format.

use camino_tempfile::Utf8TempDir;
use indoc::indoc;
use pretty_assertions::assert_eq;
use suite_tree::{
    GroupStatusKeying, HtmlWriter, ReportConfig, ReportConfigLocation, ReportFormat,
    ReportSummary, ReportTreeBuilder, ReportWriter, StatusClass,
};
use suite_tree_metadata::AggregatedResults;

static RESULTS_JSON: &str = r#"{
  "numTotalTests": 6,
  "numPassedTests": 3,
  "numFailedTests": 2,
  "numPendingTests": 1,
  "numTotalTestSuites": 3,
  "success": false,
  "startTime": 1700000000000,
  "testResults": [
    {
      "testFilePath": "/repo/src/cart.test.js",
      "failureMessage": null,
      "perfStats": { "start": 1700000000100, "end": 1700000000350 },
      "testResults": [
        {
          "ancestorTitles": ["Cart", "add"],
          "title": "adds an item",
          "fullName": "Cart add adds an item",
          "status": "passed",
          "duration": 4,
          "failureMessages": []
        },
        {
          "ancestorTitles": ["Cart", "remove"],
          "title": "removes an item",
          "fullName": "Cart remove removes an item",
          "status": "failed",
          "duration": 9,
          "failureMessages": ["Error: expected 0 items\n    at cart.test.js:12:5"]
        },
        {
          "ancestorTitles": ["Cart", "add"],
          "title": "rejects negative quantities",
          "fullName": "Cart add rejects negative quantities",
          "status": "pending",
          "duration": null,
          "failureMessages": []
        }
      ]
    },
    {
      "testFilePath": "/repo/src/user.test.js",
      "testResults": [
        {
          "ancestorTitles": [],
          "title": "creates a user",
          "fullName": "creates a user",
          "status": "passed",
          "duration": 2,
          "failureMessages": []
        },
        {
          "ancestorTitles": ["User", "add"],
          "title": "adds a role",
          "fullName": "User add adds a role",
          "status": "passed",
          "duration": 1,
          "failureMessages": []
        }
      ]
    },
    {
      "testFilePath": "/repo/src/broken.test.js",
      "failureMessage": "  ● Test suite failed to run\n\n    SyntaxError: Unexpected token",
      "testResults": []
    }
  ]
}"#;

fn write_fixture(dir: &Utf8TempDir, name: &str, contents: &str) -> camino::Utf8PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("wrote fixture");
    path
}

#[test]
fn results_to_text_report() {
    let dir = Utf8TempDir::new().expect("created temp dir");
    let results_path = write_fixture(&dir, "results.json", RESULTS_JSON);

    let results = AggregatedResults::from_path(&results_path).expect("results parse");
    let config = ReportConfig::from_location(ReportConfigLocation::Default(dir.path()))
        .expect("missing default config is fine");
    let nodes = ReportTreeBuilder::from_config(&config).build(&results.test_results);

    let summary = ReportSummary::new(&nodes);
    assert_eq!(
        (summary.passed_files, summary.failed_files, summary.mixed_files),
        (1, 1, 1)
    );
    assert!(summary.has_failures());

    let mut buf = Vec::new();
    ReportWriter::new(ReportFormat::Text)
        .write(&nodes, &mut buf)
        .expect("wrote report");
    assert_eq!(
        String::from_utf8(buf).expect("output is UTF-8"),
        indoc! {r"
            MIXED /repo/src/cart.test.js
              \- MIXED Cart
                |- PASS  add
                | |- + adds an item (4ms)
                | \- o rejects negative quantities
                \- FAIL  remove
                  \- x removes an item (9ms)
                      Error: expected 0 items
                          at cart.test.js:12:5
            PASS  /repo/src/user.test.js
              |- + creates a user (2ms)
              \- PASS  User
                \- PASS  add
                  \- + adds a role (1ms)
            FAIL  /repo/src/broken.test.js
                    ● Test suite failed to run

                      SyntaxError: Unexpected token

            3 files (5 tests): 1 passed, 1 failed, 1 mixed
        "}
    );
}

#[test]
fn config_file_drives_html_and_keying() {
    let dir = Utf8TempDir::new().expect("created temp dir");
    let config_path = write_fixture(
        &dir,
        "suite-tree.toml",
        indoc! {r#"
            group-status = "title"

            [leaf]
            failure-messages = false

            [html]
            title = "Cart service"
        "#},
    );
    let config = ReportConfig::from_path(&config_path).expect("config parses");
    assert_eq!(config.group_status, GroupStatusKeying::Title);

    let results = AggregatedResults::parse_json(RESULTS_JSON).expect("results parse");
    let nodes = ReportTreeBuilder::from_config(&config).build(&results.test_results);

    // Title keying is per file: `Cart add` is not affected by `User add` elsewhere.
    let cart_add = nodes[0].children()[0].children()[0].status();
    assert_eq!(cart_add, Some(StatusClass::Pass));
    assert_eq!(nodes[1].status(), Some(StatusClass::Pass));

    let mut writer = ReportWriter::new(ReportFormat::Html);
    writer.set_html_writer(HtmlWriter::from_config(&config.html));
    let mut buf = Vec::new();
    writer.write(&nodes, &mut buf).expect("wrote report");
    let html = String::from_utf8(buf).expect("output is UTF-8");

    assert!(html.contains("<title>Cart service</title>"), "html: {html}");
    assert!(
        html.contains(r#"<section class="file status-mixed">"#),
        "html: {html}"
    );
    assert!(html.contains("<h5>/repo/src/user.test.js</h5>"), "html: {html}");
    // Leaf failure messages are disabled; the file-level one is kept.
    assert!(!html.contains("expected 0 items"), "html: {html}");
    assert!(html.contains("Test suite failed to run"), "html: {html}");
}

#[test]
fn title_keying_collides_within_a_file() {
    let json = indoc! {r#"
        {
          "testResults": [
            {
              "testFilePath": "shared.test.js",
              "testResults": [
                { "ancestorTitles": ["X", "setup"], "title": "a", "status": "passed" },
                { "ancestorTitles": ["Y", "setup"], "title": "b", "status": "failed" }
              ]
            }
          ]
        }
    "#};
    let results = AggregatedResults::parse_json(json).expect("results parse");

    let setup_statuses = |keying| {
        let mut builder = ReportTreeBuilder::new();
        builder.set_group_status_keying(keying);
        let nodes = builder.build(&results.test_results);
        nodes[0]
            .children()
            .iter()
            .map(|group| group.children()[0].status())
            .collect::<Vec<_>>()
    };

    assert_eq!(
        setup_statuses(GroupStatusKeying::Path),
        [Some(StatusClass::Pass), Some(StatusClass::Fail)]
    );
    assert_eq!(
        setup_statuses(GroupStatusKeying::Title),
        [Some(StatusClass::Mixed), Some(StatusClass::Mixed)]
    );
}
