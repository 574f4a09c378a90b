// Copyright (c) The suite-tree Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reconstructs the group hierarchy of each test file from flat ancestor-title lists.
//!
//! Each file is handled in two passes. The first ([`classify_file`]) computes the status of the
//! file and of every group. The second assembles the tree: for each outcome, in order, the group
//! node for every prefix of its ancestor titles is looked up in a per-file cache and created on
//! first encounter (already carrying its final status), and the outcome's leaf is appended to
//! the deepest group.
//!
//! Nodes are assembled in an arena and converted into an owned tree once the file is done.

use crate::{
    DefaultLeafRenderer, FileClassification, GroupKey, GroupStatusKeying, LeafNode, LeafRenderer,
    ReportConfig, ReportNode, SectionNode, StatusClass, classify_file,
};
use indexmap::{IndexMap, map::Entry};
use suite_tree_metadata::FileResult;
use tracing::{debug, trace};

/// Builds report trees from test results.
#[derive(Clone, Debug)]
pub struct ReportTreeBuilder<R = DefaultLeafRenderer> {
    renderer: R,
    keying: GroupStatusKeying,
}

impl ReportTreeBuilder {
    /// Creates a builder that uses [`DefaultLeafRenderer`] and path-keyed group statuses.
    pub fn new() -> Self {
        Self::with_renderer(DefaultLeafRenderer::new())
    }

    /// Creates a builder configured from `config`.
    pub fn from_config(config: &ReportConfig) -> Self {
        let mut renderer = DefaultLeafRenderer::new();
        renderer.set_failure_messages(config.leaf.failure_messages);
        let mut builder = Self::with_renderer(renderer);
        builder.set_group_status_keying(config.group_status);
        builder
    }
}

impl Default for ReportTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: LeafRenderer> ReportTreeBuilder<R> {
    /// Creates a builder that renders leaves with `renderer`.
    pub fn with_renderer(renderer: R) -> Self {
        Self {
            renderer,
            keying: GroupStatusKeying::default(),
        }
    }

    /// Sets how group statuses are keyed.
    pub fn set_group_status_keying(&mut self, keying: GroupStatusKeying) -> &mut Self {
        self.keying = keying;
        self
    }

    /// Builds one file node per input file, in input order.
    pub fn build(&self, files: &[FileResult]) -> Vec<ReportNode> {
        files.iter().map(|file| self.build_file(file)).collect()
    }

    /// Builds the file node for a single file.
    pub fn build_file(&self, file: &FileResult) -> ReportNode {
        let classification = classify_file(file, self.keying);
        assemble_file(file, &classification, &self.renderer)
    }
}

fn assemble_file<'a>(
    file: &'a FileResult,
    classification: &FileClassification<'a>,
    renderer: &impl LeafRenderer,
) -> ReportNode {
    let mut arena = SectionArena::new(file.test_file_path.clone(), classification.file_status());
    let mut groups: IndexMap<GroupKey<'a>, usize> = IndexMap::new();

    for outcome in &file.test_results {
        let leaf = renderer.render_leaf(outcome);

        // Walk outermost-first, so a group's parent always exists by the time the group is
        // created.
        let mut parent = SectionArena::FILE;
        for depth in 0..outcome.ancestor_titles.len() {
            let key = GroupKey::at_depth(&outcome.ancestor_titles, depth);
            parent = match groups.entry(key) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    let index = arena.push_section(
                        parent,
                        key.title().to_owned(),
                        classification.group_status(key),
                    );
                    *entry.insert(index)
                }
            };
        }
        arena.push_leaf(parent, leaf);
    }

    for (key, index) in &groups {
        trace!("{}: group `{key}` at arena index {index}", file.test_file_path);
    }
    debug!(
        "built {}: {} ({} groups, {} tests)",
        file.test_file_path,
        classification.file_status(),
        groups.len(),
        file.test_results.len(),
    );

    ReportNode::File(arena.finish(file.failure_message.clone()))
}

/// Sections under construction. Index 0 is the file; every other section's parent has a lower
/// index than the section itself.
#[derive(Debug)]
struct SectionArena {
    sections: Vec<ArenaSection>,
}

#[derive(Debug)]
struct ArenaSection {
    status: StatusClass,
    header: String,
    children: Vec<ArenaChild>,
}

#[derive(Debug)]
enum ArenaChild {
    Section(usize),
    Leaf(LeafNode),
}

impl SectionArena {
    const FILE: usize = 0;

    fn new(header: String, status: StatusClass) -> Self {
        Self {
            sections: vec![ArenaSection {
                status,
                header,
                children: Vec::new(),
            }],
        }
    }

    fn push_section(&mut self, parent: usize, header: String, status: StatusClass) -> usize {
        let index = self.sections.len();
        self.sections.push(ArenaSection {
            status,
            header,
            children: Vec::new(),
        });
        self.sections[parent]
            .children
            .push(ArenaChild::Section(index));
        index
    }

    fn push_leaf(&mut self, parent: usize, leaf: LeafNode) {
        self.sections[parent].children.push(ArenaChild::Leaf(leaf));
    }

    fn finish(self, failure_message: Option<String>) -> SectionNode {
        // Children always have higher indexes than their parents, so building back to front
        // means every child section is complete before its parent needs it.
        let mut built: Vec<Option<SectionNode>> = Vec::with_capacity(self.sections.len());
        built.resize_with(self.sections.len(), || None);

        for (index, section) in self.sections.into_iter().enumerate().rev() {
            let children = section
                .children
                .into_iter()
                .map(|child| match child {
                    ArenaChild::Section(child) => ReportNode::Group(
                        built[child]
                            .take()
                            .expect("child sections are built before their parents"),
                    ),
                    ArenaChild::Leaf(leaf) => ReportNode::Leaf(leaf),
                })
                .collect();
            let failure_message = if index == Self::FILE {
                failure_message.clone()
            } else {
                None
            };
            built[index] = Some(SectionNode::new(
                section.status,
                section.header,
                failure_message,
                children,
            ));
        }

        built[Self::FILE]
            .take()
            .expect("the file section is always present")
    }
}
