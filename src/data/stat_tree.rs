//! Hierarchical statistics tree built from flat, dot-delimited metric names.
//!
//! The appliance reports its statistics as a flat list such as
//! `net.eth0.rx_packets`, `net.eth0.tx_packets`, `mem.heap.used`. This module
//! turns one such list into a tree suitable for a collapsible tree view:
//!
//! ```text
//! net
//! └── eth0
//!     ├── rx_packets = 1200
//!     └── tx_packets = 800
//! mem
//! └── heap
//!     └── used = 4096
//! ```
//!
//! [`StatTree::build`] is a pure function of its input. Every poll produces a
//! brand new tree, so metrics that disappear between polls never leave stale
//! branches behind.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Separator between the segments of a metric path.
pub const PATH_SEPARATOR: char = '.';

/// Value reported for a single statistic.
///
/// The appliance emits integer counters, floating point gauges and the
/// occasional string, so the JSON value is kept in whichever shape it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Integer(v) => Some(*v as f64),
            MetricValue::Float(v) => Some(*v),
            MetricValue::Text(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Integer(v) => write!(f, "{}", v),
            MetricValue::Float(v) => write!(f, "{:.2}", v),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Integer(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}

impl From<&str> for MetricValue {
    fn from(v: &str) -> Self {
        MetricValue::Text(v.to_string())
    }
}

/// One entry of the flat `statman` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Dot-delimited path, e.g. `net.tcp.connections.active`.
    pub name: String,
    pub value: MetricValue,
}

impl MetricSample {
    pub fn new(name: impl Into<String>, value: impl Into<MetricValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Errors raised while building a [`StatTree`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatTreeError {
    /// The path has an empty segment (leading, trailing or doubled separator).
    #[error("malformed metric path `{path}`: segment {segment} is empty")]
    MalformedPath { path: String, segment: usize },

    /// A path is a strict prefix of another, so one node would have to be
    /// both a leaf and an interior node.
    #[error("metric path `{path}` conflicts with `{existing}`")]
    Conflict { path: String, existing: String },
}

/// A node of the statistics tree.
///
/// A node is either a leaf (it carries a value and has no children) or an
/// interior node (it has children and no value). [`StatTree::build`] is the
/// only constructor, which keeps that invariant intact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    label: String,
    full_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<MetricValue>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<TreeNode>,
}

impl TreeNode {
    fn branch(label: &str, full_path: &str) -> Self {
        Self {
            label: label.to_string(),
            full_path: full_path.to_string(),
            value: None,
            children: Vec::new(),
        }
    }

    fn leaf(label: &str, full_path: &str, value: MetricValue) -> Self {
        Self {
            label: label.to_string(),
            full_path: full_path.to_string(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    /// The last segment of this node's path.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The dot-delimited path from the root down to this node.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// The metric value, present only on leaves.
    pub fn value(&self) -> Option<&MetricValue> {
        self.value.as_ref()
    }

    /// Children in first-seen order. Empty for leaves.
    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.value.is_some()
    }

    /// Number of leaves in this subtree (1 for a leaf).
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(TreeNode::leaf_count).sum()
        }
    }

    /// Full path of the first leaf below this node.
    fn first_leaf_path(&self) -> &str {
        match self.children.first() {
            Some(child) if !self.is_leaf() => child.first_leaf_path(),
            _ => &self.full_path,
        }
    }

    fn matches_filter(&self, needle: &str) -> bool {
        if self.is_leaf() {
            self.full_path.to_lowercase().contains(needle)
        } else {
            self.children.iter().any(|c| c.matches_filter(needle))
        }
    }
}

/// A row of the flattened tree, as shown by the tree view.
#[derive(Debug, Clone, Copy)]
pub struct TreeRow<'a> {
    /// Nesting level, 0 for top-level nodes.
    pub depth: usize,
    pub node: &'a TreeNode,
    /// Whether the node's children are currently shown.
    pub expanded: bool,
}

/// The statistics tree. Acts as the synthetic root: it has no label or value
/// of its own and holds the top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatTree {
    nodes: Vec<TreeNode>,
}

impl StatTree {
    /// Build a fresh tree from one snapshot of metric samples.
    ///
    /// Duplicate paths are last-write-wins. An empty snapshot yields an empty
    /// tree.
    pub fn build<'a, I>(samples: I) -> Result<Self, StatTreeError>
    where
        I: IntoIterator<Item = &'a MetricSample>,
    {
        let mut tree = StatTree::default();
        for sample in samples {
            tree.insert(sample)?;
        }
        Ok(tree)
    }

    fn insert(&mut self, sample: &MetricSample) -> Result<(), StatTreeError> {
        let segments = split_path(&sample.name)?;
        let Some((leaf_label, parents)) = segments.split_last() else {
            return Err(StatTreeError::MalformedPath {
                path: sample.name.clone(),
                segment: 0,
            });
        };

        let mut children = &mut self.nodes;
        let mut prefix_len = 0;

        for segment in parents {
            prefix_len += if prefix_len == 0 { segment.len() } else { segment.len() + 1 };
            let prefix = &sample.name[..prefix_len];

            let index = match children.iter().position(|n| n.label == *segment) {
                Some(index) => index,
                None => {
                    children.push(TreeNode::branch(segment, prefix));
                    children.len() - 1
                }
            };

            let node = &mut children[index];
            if node.is_leaf() {
                return Err(StatTreeError::Conflict {
                    path: sample.name.clone(),
                    existing: node.full_path.clone(),
                });
            }
            children = &mut node.children;
        }

        match children.iter_mut().find(|n| n.label == *leaf_label) {
            Some(node) if node.is_leaf() => {
                node.value = Some(sample.value.clone());
            }
            Some(node) => {
                return Err(StatTreeError::Conflict {
                    path: sample.name.clone(),
                    existing: node.first_leaf_path().to_string(),
                });
            }
            None => {
                children.push(TreeNode::leaf(leaf_label, &sample.name, sample.value.clone()));
            }
        }

        Ok(())
    }

    /// Top-level nodes in first-seen order.
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().map(TreeNode::leaf_count).sum()
    }

    /// Look up a node by its full path.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let mut children = &self.nodes;
        let mut found = None;
        for segment in path.split(PATH_SEPARATOR) {
            let node = children.iter().find(|n| n.label == segment)?;
            children = &node.children;
            found = Some(node);
        }
        found
    }

    /// Full paths of every leaf, depth-first in display order.
    pub fn leaf_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        let mut stack: Vec<&TreeNode> = self.nodes.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                paths.push(node.full_path.as_str());
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        paths
    }

    /// Full paths of every interior node. Used to expand the whole tree.
    pub fn branch_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        let mut stack: Vec<&TreeNode> = self.nodes.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if !node.is_leaf() {
                paths.push(node.full_path.as_str());
                stack.extend(node.children.iter().rev());
            }
        }
        paths
    }

    /// Flatten the tree into display rows.
    ///
    /// Children of an interior node are included only when its full path is in
    /// `expanded`. With a non-empty `filter`, expansion is ignored and every
    /// node on the way to a leaf whose path contains the filter
    /// (case-insensitive) is shown.
    pub fn visible_rows<'a>(&'a self, expanded: &HashSet<String>, filter: &str) -> Vec<TreeRow<'a>> {
        let needle = filter.to_lowercase();
        let mut rows = Vec::new();
        for node in &self.nodes {
            collect_rows(node, 0, expanded, &needle, &mut rows);
        }
        rows
    }
}

fn collect_rows<'a>(
    node: &'a TreeNode,
    depth: usize,
    expanded: &HashSet<String>,
    needle: &str,
    rows: &mut Vec<TreeRow<'a>>,
) {
    let filtering = !needle.is_empty();
    if filtering && !node.matches_filter(needle) {
        return;
    }

    let is_open = !node.is_leaf() && (filtering || expanded.contains(&node.full_path));
    rows.push(TreeRow {
        depth,
        node,
        expanded: is_open,
    });

    if is_open {
        for child in &node.children {
            collect_rows(child, depth + 1, expanded, needle, rows);
        }
    }
}

/// Split a metric path into its segments, rejecting empty ones.
fn split_path(path: &str) -> Result<Vec<&str>, StatTreeError> {
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    if let Some(segment) = segments.iter().position(|s| s.is_empty()) {
        return Err(StatTreeError::MalformedPath {
            path: path.to_string(),
            segment,
        });
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str, value: i64) -> MetricSample {
        MetricSample::new(name, value)
    }

    #[test]
    fn empty_snapshot_builds_empty_tree() {
        let tree = StatTree::build(&Vec::<MetricSample>::new()).unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.leaf_count(), 0);
    }

    #[test]
    fn sibling_leaves_share_parent() {
        let samples = vec![sample("net.recv", 10), sample("net.sent", 20)];
        let tree = StatTree::build(&samples).unwrap();

        assert_eq!(tree.nodes().len(), 1);
        let net = &tree.nodes()[0];
        assert_eq!(net.label(), "net");
        assert_eq!(net.full_path(), "net");
        assert!(!net.is_leaf());
        assert!(net.value().is_none());

        let labels: Vec<&str> = net.children().iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["recv", "sent"]);
        assert_eq!(net.children()[0].value(), Some(&MetricValue::Integer(10)));
        assert_eq!(net.children()[1].value(), Some(&MetricValue::Integer(20)));
        assert_eq!(net.children()[1].full_path(), "net.sent");
    }

    #[test]
    fn leaf_paths_match_input_paths() {
        let samples = vec![
            sample("net.tcp.connections.active", 3),
            sample("net.tcp.connections.total", 40),
            sample("net.udp.packets", 7),
            sample("cpu0.halt", 9),
            sample("uptime", 1000),
        ];
        let tree = StatTree::build(&samples).unwrap();

        let mut paths = tree.leaf_paths();
        paths.sort();
        let mut expected: Vec<&str> = samples.iter().map(|s| s.name.as_str()).collect();
        expected.sort();
        assert_eq!(paths, expected);

        for s in &samples {
            let node = tree.find(&s.name).unwrap();
            assert!(node.is_leaf());
            assert_eq!(node.value(), Some(&s.value));
        }
    }

    #[test]
    fn insertion_order_is_preserved() {
        let samples = vec![sample("z.b", 1), sample("a.c", 2), sample("z.a", 3)];
        let tree = StatTree::build(&samples).unwrap();

        let top: Vec<&str> = tree.nodes().iter().map(|n| n.label()).collect();
        assert_eq!(top, vec!["z", "a"]);
        let z: Vec<&str> = tree.nodes()[0].children().iter().map(|n| n.label()).collect();
        assert_eq!(z, vec!["b", "a"]);
    }

    #[test]
    fn duplicate_path_is_last_write_wins() {
        let samples = vec![sample("a.b", 1), sample("a.c", 5), sample("a.b", 2)];
        let tree = StatTree::build(&samples).unwrap();

        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.find("a.b").unwrap().value(), Some(&MetricValue::Integer(2)));
        // The updated leaf keeps its original position
        let labels: Vec<&str> = tree.nodes()[0].children().iter().map(|n| n.label()).collect();
        assert_eq!(labels, vec!["b", "c"]);
    }

    #[test]
    fn prefix_then_longer_path_conflicts() {
        let samples = vec![sample("a.b", 1), sample("a.b.c", 2)];
        let err = StatTree::build(&samples).unwrap_err();
        assert_eq!(
            err,
            StatTreeError::Conflict {
                path: "a.b.c".to_string(),
                existing: "a.b".to_string(),
            }
        );
    }

    #[test]
    fn longer_path_then_prefix_conflicts() {
        let samples = vec![sample("a.b.c", 2), sample("a.b", 1)];
        let err = StatTree::build(&samples).unwrap_err();
        assert_eq!(
            err,
            StatTreeError::Conflict {
                path: "a.b".to_string(),
                existing: "a.b.c".to_string(),
            }
        );
        assert!(err.to_string().contains("a.b.c"));
    }

    #[test]
    fn empty_segments_are_malformed() {
        for (path, segment) in [("", 0), (".a", 0), ("a.", 1), ("a..b", 1)] {
            let err = StatTree::build(&[sample(path, 1)]).unwrap_err();
            assert_eq!(
                err,
                StatTreeError::MalformedPath {
                    path: path.to_string(),
                    segment,
                },
                "path {:?}",
                path
            );
        }
    }

    #[test]
    fn build_is_deterministic() {
        let samples = vec![sample("a.x", 1), sample("b.y.z", 2), sample("a.w", 3)];
        let first = StatTree::build(&samples).unwrap();
        let second = StatTree::build(&samples).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn consecutive_builds_share_no_state() {
        let a = vec![sample("old.metric", 1), sample("shared.x", 2)];
        let b = vec![sample("shared.x", 3)];

        let _ = StatTree::build(&a).unwrap();
        let tree = StatTree::build(&b).unwrap();

        assert!(tree.find("old").is_none());
        assert_eq!(tree.leaf_paths(), vec!["shared.x"]);
        assert_eq!(tree.find("shared.x").unwrap().value(), Some(&MetricValue::Integer(3)));
    }

    #[test]
    fn mixed_value_types_deserialize() {
        let json = r#"[
            {"name": "a.count", "value": 12},
            {"name": "a.ratio", "value": 0.5},
            {"name": "a.state", "value": "up"}
        ]"#;
        let samples: Vec<MetricSample> = serde_json::from_str(json).unwrap();
        let tree = StatTree::build(&samples).unwrap();

        assert_eq!(tree.find("a.count").unwrap().value(), Some(&MetricValue::Integer(12)));
        assert_eq!(tree.find("a.ratio").unwrap().value(), Some(&MetricValue::Float(0.5)));
        assert_eq!(tree.find("a.state").unwrap().value(), Some(&MetricValue::Text("up".into())));
    }

    #[test]
    fn visible_rows_follow_expansion() {
        let samples = vec![sample("net.eth0.rx", 1), sample("net.eth0.tx", 2), sample("mem", 3)];
        let tree = StatTree::build(&samples).unwrap();

        let collapsed = tree.visible_rows(&HashSet::new(), "");
        let labels: Vec<&str> = collapsed.iter().map(|r| r.node.label()).collect();
        assert_eq!(labels, vec!["net", "mem"]);

        let expanded: HashSet<String> = ["net".to_string(), "net.eth0".to_string()].into();
        let rows = tree.visible_rows(&expanded, "");
        let shown: Vec<(usize, &str)> = rows.iter().map(|r| (r.depth, r.node.label())).collect();
        assert_eq!(shown, vec![(0, "net"), (1, "eth0"), (2, "rx"), (2, "tx"), (0, "mem")]);
        assert!(rows[0].expanded);
        assert!(!rows[2].expanded);
    }

    #[test]
    fn visible_rows_filter_reveals_matching_branches() {
        let samples = vec![sample("net.eth0.rx", 1), sample("net.eth0.tx", 2), sample("mem.heap", 3)];
        let tree = StatTree::build(&samples).unwrap();

        let rows = tree.visible_rows(&HashSet::new(), "TX");
        let paths: Vec<&str> = rows.iter().map(|r| r.node.full_path()).collect();
        assert_eq!(paths, vec!["net", "net.eth0", "net.eth0.tx"]);
    }

    #[test]
    fn branch_paths_lists_interior_nodes() {
        let samples = vec![sample("a.b.c", 1), sample("a.d", 2), sample("e", 3)];
        let tree = StatTree::build(&samples).unwrap();
        assert_eq!(tree.branch_paths(), vec!["a", "a.b"]);
    }
}
