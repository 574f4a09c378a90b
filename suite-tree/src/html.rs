// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize report trees into a standalone HTML document.
//!
//! File nodes become `<section>` elements headed by `<h5>`, group nodes become list items headed
//! by `<h6>`, and leaves become list items. Every node carries its status class (for example
//! `status-mixed`) so that the embedded stylesheet can tint it.

use crate::{
    HtmlConfig, LeafNode, ReportNode, ReportSummary, SectionNode,
    config::DEFAULT_HTML_TITLE,
    errors::WriteReportError,
    helpers::{FormattedDuration, plural},
};
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io;

static HTML_TAG: &str = "html";
static HEAD_TAG: &str = "head";
static BODY_TAG: &str = "body";
static TITLE_TAG: &str = "title";
static STYLE_TAG: &str = "style";
static SECTION_TAG: &str = "section";
static FILE_HEADER_TAG: &str = "h5";
static GROUP_HEADER_TAG: &str = "h6";
static LIST_TAG: &str = "ul";
static ITEM_TAG: &str = "li";
static SPAN_TAG: &str = "span";
static PRE_TAG: &str = "pre";

static STYLESHEET: &str = "
body { font-family: sans-serif; margin: 2em; }
section { border-left: 4px solid #999; margin: 1em 0; padding: 0 1em; }
h5, h6 { margin: 0.4em 0; }
ul { list-style: none; padding-left: 1.5em; margin: 0; }
pre { background: #f6f6f6; padding: 0.5em; overflow-x: auto; }
.duration { color: #777; margin-left: 0.5em; }
section.status-pass, li.status-pass { border-left: 4px solid #2e7d32; }
section.status-fail, li.status-fail { border-left: 4px solid #c62828; }
section.status-mixed, li.status-mixed { border-left: 4px solid #f9a825; }
li.status-pending, li.status-other { border-left: 4px solid #bbb; color: #777; }
li { padding-left: 0.5em; margin: 0.2em 0; }
";

/// Writes report trees as HTML.
#[derive(Clone, Debug)]
pub struct HtmlWriter {
    title: String,
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlWriter {
    /// Creates a writer with the default title.
    pub fn new() -> Self {
        Self {
            title: DEFAULT_HTML_TITLE.to_owned(),
        }
    }

    /// Creates a writer configured from `config`.
    pub fn from_config(config: &HtmlConfig) -> Self {
        let mut writer = Self::new();
        writer.set_title(config.title.clone());
        writer
    }

    /// Sets the document title and page heading.
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    /// Writes a complete HTML document for `nodes` to `writer`.
    pub fn write(
        &self,
        nodes: &[ReportNode],
        writer: impl io::Write,
    ) -> Result<(), WriteReportError> {
        self.write_impl(nodes, writer).map_err(WriteReportError::Html)
    }

    /// Returns the HTML document for `nodes` as a string.
    pub fn write_to_string(&self, nodes: &[ReportNode]) -> Result<String, WriteReportError> {
        let mut buf = Vec::new();
        self.write(nodes, &mut buf)?;
        String::from_utf8(buf).map_err(|error| {
            WriteReportError::Io(io::Error::new(io::ErrorKind::InvalidData, error))
        })
    }

    fn write_impl(&self, nodes: &[ReportNode], writer: impl io::Write) -> quick_xml::Result<()> {
        let mut writer = Writer::new_with_indent(writer, b' ', 2);

        writer.write_event(Event::DocType(BytesText::from_escaped(HTML_TAG)))?;
        writer.write_event(Event::Start(BytesStart::new(HTML_TAG)))?;

        writer.write_event(Event::Start(BytesStart::new(HEAD_TAG)))?;
        let mut meta = BytesStart::new("meta");
        meta.push_attribute(("charset", "utf-8"));
        writer.write_event(Event::Empty(meta))?;
        serialize_text_element(TITLE_TAG, None, &self.title, &mut writer)?;
        writer.write_event(Event::Start(BytesStart::new(STYLE_TAG)))?;
        // The stylesheet contains no markup characters.
        writer.write_event(Event::Text(BytesText::from_escaped(STYLESHEET)))?;
        serialize_end_tag(STYLE_TAG, &mut writer)?;
        serialize_end_tag(HEAD_TAG, &mut writer)?;

        writer.write_event(Event::Start(BytesStart::new(BODY_TAG)))?;
        serialize_text_element("h1", None, &self.title, &mut writer)?;
        serialize_summary(&ReportSummary::new(nodes), &mut writer)?;
        for node in nodes {
            self.serialize_node(node, &mut writer)?;
        }
        serialize_end_tag(BODY_TAG, &mut writer)?;

        serialize_end_tag(HTML_TAG, &mut writer)?;

        // Add a trailing newline.
        writer.write_indent()
    }

    fn serialize_node(
        &self,
        node: &ReportNode,
        writer: &mut Writer<impl io::Write>,
    ) -> quick_xml::Result<()> {
        match node {
            ReportNode::File(section) => self.serialize_file(section, writer),
            ReportNode::Group(section) => self.serialize_group(section, writer),
            ReportNode::Leaf(leaf) => self.serialize_leaf(leaf, writer),
        }
    }

    fn serialize_file(
        &self,
        section: &SectionNode,
        writer: &mut Writer<impl io::Write>,
    ) -> quick_xml::Result<()> {
        let mut tag = BytesStart::new(SECTION_TAG);
        tag.push_attribute((
            "class",
            format!("file {}", section.status().css_class()).as_str(),
        ));
        writer.write_event(Event::Start(tag))?;

        serialize_text_element(FILE_HEADER_TAG, None, section.header(), writer)?;
        if let Some(message) = section.failure_message() {
            serialize_text_element(PRE_TAG, Some("failure-message"), message, writer)?;
        }
        self.serialize_children(section.children(), writer)?;

        serialize_end_tag(SECTION_TAG, writer)
    }

    fn serialize_group(
        &self,
        section: &SectionNode,
        writer: &mut Writer<impl io::Write>,
    ) -> quick_xml::Result<()> {
        let mut tag = BytesStart::new(ITEM_TAG);
        tag.push_attribute((
            "class",
            format!("group {}", section.status().css_class()).as_str(),
        ));
        writer.write_event(Event::Start(tag))?;

        serialize_text_element(GROUP_HEADER_TAG, None, section.header(), writer)?;
        self.serialize_children(section.children(), writer)?;

        serialize_end_tag(ITEM_TAG, writer)
    }

    fn serialize_children(
        &self,
        children: &[ReportNode],
        writer: &mut Writer<impl io::Write>,
    ) -> quick_xml::Result<()> {
        if children.is_empty() {
            return Ok(());
        }
        writer.write_event(Event::Start(BytesStart::new(LIST_TAG)))?;
        for child in children {
            self.serialize_node(child, writer)?;
        }
        serialize_end_tag(LIST_TAG, writer)
    }

    fn serialize_leaf(
        &self,
        leaf: &LeafNode,
        writer: &mut Writer<impl io::Write>,
    ) -> quick_xml::Result<()> {
        // Use the destructuring syntax to ensure that all fields are handled.
        let LeafNode {
            style,
            title,
            full_name,
            duration,
            failure_messages,
        } = leaf;

        let mut tag = BytesStart::new(ITEM_TAG);
        tag.push_attribute(("class", format!("test {}", style.css_class()).as_str()));
        tag.push_attribute(("title", full_name.as_str()));
        writer.write_event(Event::Start(tag))?;

        serialize_text_element(SPAN_TAG, Some("title"), title, writer)?;
        if let Some(duration) = duration {
            let duration = FormattedDuration(*duration).to_string();
            serialize_text_element(SPAN_TAG, Some("duration"), &duration, writer)?;
        }
        for message in failure_messages {
            serialize_text_element(PRE_TAG, Some("failure-message"), message, writer)?;
        }

        serialize_end_tag(ITEM_TAG, writer)
    }
}

fn serialize_summary(
    summary: &ReportSummary,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let total_files = summary.total_files();
    let total_tests = summary.total_tests();
    let text = format!(
        "{total_files} {} ({total_tests} {}): {} passed, {} failed, {} mixed",
        plural::files_str(total_files),
        plural::tests_str(total_tests),
        summary.passed_files,
        summary.failed_files,
        summary.mixed_files,
    );
    serialize_text_element("p", Some("summary"), &text, writer)
}

fn serialize_text_element(
    tag_name: &'static str,
    class: Option<&str>,
    text: &str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut tag = BytesStart::new(tag_name);
    if let Some(class) = class {
        tag.push_attribute(("class", class));
    }
    writer.write_event(Event::Start(tag))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    serialize_end_tag(tag_name, writer)
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportTreeBuilder;
    use std::time::Duration;
    use suite_tree_metadata::{FileResult, TestOutcome, TestStatus};

    fn render(files: &[FileResult]) -> String {
        let nodes = ReportTreeBuilder::new().build(files);
        HtmlWriter::new()
            .write_to_string(&nodes)
            .expect("writing to a buffer succeeds")
    }

    #[test]
    fn document_skeleton() {
        let html = render(&[]);
        assert!(html.starts_with("<!DOCTYPE html>"), "html: {html}");
        assert!(html.contains(r#"<meta charset="utf-8"/>"#), "html: {html}");
        assert!(html.contains("<title>Test report</title>"), "html: {html}");
        assert!(html.contains("<h1>Test report</h1>"), "html: {html}");
        assert!(
            html.contains(
                r#"<p class="summary">0 files (0 tests): 0 passed, 0 failed, 0 mixed</p>"#
            ),
            "html: {html}"
        );
        assert!(html.trim_end().ends_with("</html>"), "html: {html}");
        assert!(html.ends_with('\n'));
    }

    #[test]
    fn sections_groups_and_leaves() {
        let mut file = FileResult::new("math.test.js");
        let mut adds = TestOutcome::new("adds", TestStatus::Passed);
        adds.set_ancestor_titles(["math"])
            .set_duration(Duration::from_millis(3));
        let mut divides = TestOutcome::new("divides", TestStatus::Failed);
        divides
            .set_ancestor_titles(["math"])
            .add_failure_message("Expected: 1\nReceived: 2");
        file.add_test_results([adds, divides]);

        let html = render(&[file]);
        for fragment in [
            r#"<section class="file status-mixed">"#,
            "<h5>math.test.js</h5>",
            r#"<li class="group status-mixed">"#,
            "<h6>math</h6>",
            r#"<li class="test status-pass" title="math adds">"#,
            r#"<span class="title">adds</span>"#,
            r#"<span class="duration">3ms</span>"#,
            r#"<li class="test status-fail" title="math divides">"#,
            "<pre class=\"failure-message\">Expected: 1\nReceived: 2</pre>",
        ] {
            assert!(html.contains(fragment), "missing {fragment:?} in: {html}");
        }

        // The group comes before both of its leaves.
        let group = html.find("<h6>math</h6>").expect("group header present");
        let adds = html.find(">adds<").expect("adds present");
        let divides = html.find(">divides<").expect("divides present");
        assert!(group < adds && adds < divides);
    }

    #[test]
    fn text_is_escaped() {
        let mut file = FileResult::new("<script>.test.js");
        file.add_test_result(TestOutcome::new("a < b & c", TestStatus::Passed));

        let nodes = ReportTreeBuilder::new().build(&[file]);
        let mut writer = HtmlWriter::new();
        writer.set_title("\"quoted\" & <b>bold</b>");
        let html = writer.write_to_string(&nodes).expect("writing succeeds");

        assert!(html.contains("<h5>&lt;script&gt;.test.js</h5>"), "html: {html}");
        assert!(html.contains("a &lt; b &amp; c"), "html: {html}");
        assert!(
            html.contains("<title>&quot;quoted&quot; &amp; &lt;b&gt;bold&lt;/b&gt;</title>"),
            "html: {html}"
        );
        assert!(!html.contains("<script>"), "html: {html}");
    }

    #[test]
    fn file_failure_message() {
        let mut file = FileResult::new("broken.test.js");
        file.set_failure_message("SyntaxError: Unexpected token");
        let html = render(&[file]);
        assert!(html.contains(r#"<section class="file status-fail">"#), "html: {html}");
        assert!(
            html.contains(r#"<pre class="failure-message">SyntaxError: Unexpected token</pre>"#),
            "html: {html}"
        );
        assert!(!html.contains("<ul>"), "html: {html}");
    }
}
