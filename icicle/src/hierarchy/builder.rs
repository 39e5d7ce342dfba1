use std::collections::{HashMap, HashSet, VecDeque};

use super::{IdValue, Node, NodeIdx, NodeOrigin, Tree};
use crate::error::HierarchyError;

/// Builds a [`Tree`] from flat label/parent columns.
///
/// ```
/// use icicle::HierarchyBuilder;
///
/// let tree = HierarchyBuilder::new(["Root", "A", "B", "b"], ["", "Root", "Root", "B"])
///     .build()
///     .unwrap();
/// assert_eq!(tree.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder {
    labels: Vec<String>,
    parents: Vec<IdValue>,
    ids: Option<Vec<IdValue>>,
    values: Vec<Option<f64>>,
    hidden: Vec<bool>,
    text: Vec<Option<String>>,
    root_id: Option<String>,
}

impl HierarchyBuilder {
    pub fn new<L, P>(labels: L, parents: P) -> Self
    where
        L: IntoIterator,
        L::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<IdValue>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            parents: parents.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Explicit ids. Without them, labels double as ids.
    pub fn ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<IdValue>,
    {
        self.ids = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Per-row values. Negative or NaN values count as missing.
    pub fn values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Rows that should be laid out with zero area.
    pub fn hidden(mut self, hidden: impl IntoIterator<Item = bool>) -> Self {
        self.hidden = hidden.into_iter().collect();
        self
    }

    /// Free-form per-row text carried through to the renderer.
    pub fn text<I>(mut self, text: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Option<String>>,
    {
        self.text = text.into_iter().map(Into::into).collect();
        self
    }

    /// Pin the id of a synthesized root of roots instead of a random one.
    pub fn root_id(mut self, id: impl Into<String>) -> Self {
        self.root_id = Some(id.into());
        self
    }

    pub fn build(self) -> Result<Tree, HierarchyError> {
        let len = self.labels.len().min(self.parents.len());
        if len == 0 {
            return Err(HierarchyError::EmptyInput);
        }
        if let Some(ids) = &self.ids {
            if ids.len() < len {
                return Err(HierarchyError::LengthMismatch {
                    column: "ids",
                    expected: len,
                    found: ids.len(),
                });
            }
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(len + 2);
        let mut seen: HashSet<String> = HashSet::with_capacity(len);

        for row in 0..len {
            let id = match &self.ids {
                Some(ids) => ids[row].canonical(),
                None => self.labels[row].clone(),
            };
            if id.is_empty() {
                log::debug!("[hierarchy] skipping row {} without an id", row);
                continue;
            }
            if !seen.insert(id.clone()) {
                return Err(HierarchyError::AmbiguousHierarchy(id));
            }
            let input_value = self
                .values
                .get(row)
                .copied()
                .flatten()
                .filter(|v| v.is_finite() && *v >= 0.0);

            nodes.push(Node {
                id,
                parent_id: self.parents[row].canonical(),
                label: Some(self.labels[row].clone()),
                input_value,
                value: 0.0,
                text: self.text.get(row).cloned().flatten(),
                hidden: self.hidden.get(row).copied().unwrap_or(false),
                origin: NodeOrigin::Row(row),
                depth: 0,
                parent: None,
                children: Vec::new(),
            });
        }

        if nodes.is_empty() {
            return Err(HierarchyError::EmptyInput);
        }

        // Parents referenced but never defined, in first-seen order.
        let mut missing: Vec<String> = Vec::new();
        for node in &nodes {
            if !node.parent_id.is_empty()
                && !seen.contains(&node.parent_id)
                && !missing.contains(&node.parent_id)
            {
                missing.push(node.parent_id.clone());
            }
        }

        match missing.len() {
            0 => {}
            1 => {
                let id = missing.remove(0);
                log::debug!("[hierarchy] implied root '{}'", id);
                seen.insert(id.clone());
                nodes.insert(0, synthetic_node(id.clone(), Some(id), NodeOrigin::ImpliedRoot));
            }
            _ => return Err(HierarchyError::MultipleImpliedRoots(missing)),
        }

        let top_level = nodes.iter().filter(|n| n.parent_id.is_empty()).count();
        if top_level == 0 {
            return Err(HierarchyError::Cycle(nodes[0].id.clone()));
        }
        if top_level > 1 {
            let root_id = self.root_id.unwrap_or_else(|| random_root_id(&seen));
            log::debug!(
                "[hierarchy] {} top-level nodes, adding root of roots '{}'",
                top_level,
                root_id
            );
            for node in nodes.iter_mut().filter(|n| n.parent_id.is_empty()) {
                node.parent_id = root_id.clone();
            }
            nodes.insert(0, synthetic_node(root_id, None, NodeOrigin::RootOfRoots));
        }

        link(nodes)
    }
}

fn synthetic_node(id: String, label: Option<String>, origin: NodeOrigin) -> Node {
    Node {
        id,
        parent_id: String::new(),
        label,
        input_value: None,
        value: 0.0,
        text: None,
        hidden: false,
        origin,
        depth: 0,
        parent: None,
        children: Vec::new(),
    }
}

fn random_root_id(taken: &HashSet<String>) -> String {
    loop {
        let id = format!("{:016x}", rand::random::<u64>());
        if !taken.contains(&id) {
            return id;
        }
    }
}

/// Resolve parent ids to indices and assign depths from the single root.
fn link(mut nodes: Vec<Node>) -> Result<Tree, HierarchyError> {
    let index: HashMap<String, NodeIdx> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.clone(), NodeIdx(i)))
        .collect();

    let mut root = None;
    for i in 0..nodes.len() {
        if nodes[i].parent_id.is_empty() {
            root = Some(NodeIdx(i));
            continue;
        }
        // Every parent id was verified to exist above.
        let Some(&parent) = index.get(&nodes[i].parent_id) else {
            return Err(HierarchyError::Cycle(nodes[i].id.clone()));
        };
        if parent.0 == i {
            return Err(HierarchyError::Cycle(nodes[i].id.clone()));
        }
        nodes[i].parent = Some(parent);
        nodes[parent.0].children.push(NodeIdx(i));
    }

    let Some(root) = root else {
        return Err(HierarchyError::Cycle(nodes[0].id.clone()));
    };

    let mut reached = vec![false; nodes.len()];
    let mut queue = VecDeque::from([(root, 0usize)]);
    while let Some((idx, depth)) = queue.pop_front() {
        reached[idx.0] = true;
        nodes[idx.0].depth = depth;
        for &child in &nodes[idx.0].children {
            queue.push_back((child, depth + 1));
        }
    }

    if let Some(orphan) = reached.iter().position(|r| !r) {
        return Err(HierarchyError::Cycle(nodes[orphan].id.clone()));
    }

    Ok(Tree::from_parts(nodes, root))
}
