//! Single-rooted tree built from flat label/parent rows.
//!
//! Nodes live in an arena and refer to each other by [`NodeIdx`], so parent
//! back-references never form an owning cycle.

mod builder;
mod id;

use std::collections::{HashMap, VecDeque};

pub use builder::HierarchyBuilder;
pub use id::IdValue;

/// Stable key used for the hierarchy root across rebuilds.
pub const ROOT_KEY: &str = "";

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(pub usize);

/// Where a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeOrigin {
    /// An input row, by index.
    Row(usize),
    /// A parent id that was referenced but never defined.
    ImpliedRoot,
    /// Invisible parent of several top-level rows.
    RootOfRoots,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    /// Empty for the root.
    pub parent_id: String,
    pub label: Option<String>,
    /// Explicit input value, if any.
    pub input_value: Option<f64>,
    /// Aggregated value, filled by [`crate::aggregate`].
    pub value: f64,
    pub text: Option<String>,
    pub hidden: bool,
    pub origin: NodeOrigin,
    pub depth: usize,
    pub parent: Option<NodeIdx>,
    pub children: Vec<NodeIdx>,
}

impl Node {
    pub fn is_synthetic(&self) -> bool {
        self.origin == NodeOrigin::RootOfRoots
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The input row this node was built from.
    pub fn row(&self) -> Option<usize> {
        match self.origin {
            NodeOrigin::Row(i) => Some(i),
            _ => None,
        }
    }
}

/// Rooted, acyclic, connected tree owning all of its nodes.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeIdx,
    by_id: HashMap<String, NodeIdx>,
}

impl Tree {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeIdx) -> Self {
        let by_id = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), NodeIdx(i)))
            .collect();
        Self { nodes, root, by_id }
    }

    pub fn root(&self) -> NodeIdx {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.0]
    }

    /// False for an index taken from another (larger) tree.
    pub fn contains(&self, idx: NodeIdx) -> bool {
        idx.0 < self.nodes.len()
    }

    pub(crate) fn get_mut(&mut self, idx: NodeIdx) -> &mut Node {
        &mut self.nodes[idx.0]
    }

    /// Look a node up by its canonical id.
    pub fn find(&self, id: &str) -> Option<NodeIdx> {
        self.by_id.get(id).copied()
    }

    /// Resolve a stable key back to a node; [`ROOT_KEY`] is the root.
    pub fn find_key(&self, key: &str) -> Option<NodeIdx> {
        if key == ROOT_KEY {
            Some(self.root)
        } else {
            self.find(key)
        }
    }

    pub fn parent(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.get(idx).parent
    }

    pub fn children(&self, idx: NodeIdx) -> &[NodeIdx] {
        &self.get(idx).children
    }

    pub fn is_leaf(&self, idx: NodeIdx) -> bool {
        self.get(idx).is_leaf()
    }

    pub fn is_root(&self, idx: NodeIdx) -> bool {
        idx == self.root
    }

    /// True when the tree root is the invisible root of roots.
    pub fn has_multiple_roots(&self) -> bool {
        self.get(self.root).is_synthetic()
    }

    pub fn value(&self, idx: NodeIdx) -> f64 {
        self.get(idx).value
    }

    /// Stable key for transitions: the root always maps to [`ROOT_KEY`].
    pub fn key(&self, idx: NodeIdx) -> &str {
        if idx == self.root {
            ROOT_KEY
        } else {
            &self.get(idx).id
        }
    }

    /// Id reported when `idx` becomes the entry. The root of roots has a
    /// random id that changes on every build, so it reports [`ROOT_KEY`].
    pub fn entry_id(&self, idx: NodeIdx) -> &str {
        let node = self.get(idx);
        if node.is_synthetic() {
            ROOT_KEY
        } else {
            &node.id
        }
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, idx: NodeIdx) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(idx),
        }
    }

    /// True if `ancestor` is a strict ancestor of `idx`.
    pub fn is_ancestor(&self, ancestor: NodeIdx, idx: NodeIdx) -> bool {
        self.ancestors(idx).any(|a| a == ancestor)
    }

    /// True if `idx` is `root` or lies below it.
    pub fn is_within(&self, root: NodeIdx, idx: NodeIdx) -> bool {
        idx == root || self.is_ancestor(root, idx)
    }

    /// Breadth-first walk starting at (and including) `from`.
    pub fn descendants(&self, from: NodeIdx) -> Vec<NodeIdx> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([from]);
        while let Some(idx) = queue.pop_front() {
            out.push(idx);
            queue.extend(self.children(idx).iter().copied());
        }
        out
    }

    /// Every node, breadth-first from the root.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &Node)> {
        self.descendants(self.root)
            .into_iter()
            .map(move |idx| (idx, self.get(idx)))
    }

    /// Label shown for a node, falling back to its id.
    pub fn display_label(&self, idx: NodeIdx) -> &str {
        let node = self.get(idx);
        match &node.label {
            Some(label) => label,
            None if node.is_synthetic() => "",
            None => &node.id,
        }
    }

    /// Materialized ancestor path, e.g. `"Eve/Seth/"`; the root gets `"/"`.
    pub fn label_path(&self, idx: NodeIdx) -> String {
        let mut labels: Vec<&str> = self
            .ancestors(idx)
            .filter(|a| !self.get(*a).is_synthetic())
            .map(|a| self.display_label(a))
            .collect();
        if labels.is_empty() {
            return "/".to_string();
        }
        labels.reverse();
        let mut path = labels.join("/");
        path.push('/');
        path
    }
}

pub struct Ancestors<'a> {
    tree: &'a Tree,
    next: Option<NodeIdx>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIdx;

    fn next(&mut self) -> Option<NodeIdx> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
