//! Search tree with arena allocation.
//!
//! Nodes are stored in a contiguous Vec and referenced by NodeId indices, so
//! parent links are plain indices rather than owning pointers. Promoting a
//! child to root compacts the arena and drops every sibling subtree.

use crate::node::{NodeId, SearchNode};

/// Lower bound applied to the temperature in [`SearchTree::move_probs`].
const MIN_TEMPERATURE: f32 = 1e-6;

/// Guards `ln(0)` for unvisited children.
const VISIT_EPSILON: f32 = 1e-10;

/// Search tree with arena-based node storage.
#[derive(Debug)]
pub struct SearchTree {
    /// Arena storing all reachable nodes
    nodes: Vec<SearchNode>,

    /// Root node index (always 0 after construction or compaction)
    root: NodeId,
}

impl SearchTree {
    /// Create a tree holding a single fresh root.
    pub fn new() -> Self {
        Self {
            nodes: vec![SearchNode::new_root()],
            root: NodeId(0),
        }
    }

    /// Discard the whole tree and start again from a single root.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(SearchNode::new_root());
        self.root = NodeId(0);
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.index()]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child of `node_id` reached by `action`, if expanded.
    pub fn child(&self, node_id: NodeId, action: usize) -> Option<NodeId> {
        self.get(node_id)
            .children
            .iter()
            .find(|(a, _)| *a == action)
            .map(|(_, id)| *id)
    }

    /// Root children as (action, node) in expansion order.
    pub fn root_children(&self) -> impl Iterator<Item = (usize, &SearchNode)> + '_ {
        self.get(self.root)
            .children
            .iter()
            .map(move |(action, id)| (*action, self.get(*id)))
    }

    /// Select the child of `node_id` with the highest PUCT score.
    ///
    /// Returns `None` for a leaf. Ties go to the earliest child.
    pub fn select_child(&self, node_id: NodeId, c_puct: f32) -> Option<(usize, NodeId)> {
        let node = self.get(node_id);
        // Pre-compute sqrt once instead of per-child comparison
        let parent_visits_sqrt = (node.visit_count as f32).sqrt();

        let mut best: Option<(usize, NodeId, f32)> = None;
        for &(action, id) in &node.children {
            let score = self.get(id).ucb_score(parent_visits_sqrt, c_puct);
            match best {
                Some((_, _, best_score)) if score <= best_score => {}
                _ => best = Some((action, id, score)),
            }
        }

        best.map(|(action, id, _)| (action, id))
    }

    /// Add a child for every `(action, prior)` not already present.
    ///
    /// Existing children keep their statistics, so expanding twice with the
    /// same priors is a no-op.
    pub fn expand(&mut self, node_id: NodeId, priors: &[(usize, f32)]) {
        for &(action, prior) in priors {
            if self.child(node_id, action).is_some() {
                continue;
            }
            let child_id = NodeId(self.nodes.len() as u32);
            self.nodes.push(SearchNode::new_child(node_id, action, prior));
            self.get_mut(node_id).children.push((action, child_id));
        }
    }

    /// Back up `value` from `leaf_id` to the root.
    ///
    /// `value` is from the perspective of the player to move at the leaf and
    /// is negated at each level up (zero-sum alternation).
    pub fn backup(&mut self, leaf_id: NodeId, value: f32) {
        let mut current_id = leaf_id;
        let mut current_value = value;

        while current_id.is_some() {
            let node = self.get_mut(current_id);
            node.update(current_value);
            current_value = -current_value;
            current_id = node.parent;
        }
    }

    /// Most visited root child. Ties go to the earliest child.
    pub fn best_action(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (action, node) in self.root_children() {
            match best {
                Some((_, visits)) if node.visit_count <= visits => {}
                _ => best = Some((action, node.visit_count)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Visit distribution over root children:
    /// `softmax(ln(N + eps) / temperature)`, stabilised by subtracting the max.
    ///
    /// Returns parallel (actions, probabilities) in child order; both empty if
    /// the root has not been expanded.
    pub fn move_probs(&self, temperature: f32) -> (Vec<usize>, Vec<f32>) {
        let inv_temp = 1.0 / temperature.max(MIN_TEMPERATURE);

        let (actions, logits): (Vec<usize>, Vec<f32>) = self
            .root_children()
            .map(|(action, node)| {
                let logit = inv_temp * (node.visit_count as f32 + VISIT_EPSILON).ln();
                (action, logit)
            })
            .unzip();

        if actions.is_empty() {
            return (actions, Vec::new());
        }

        let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f32 = exps.iter().sum();
        let probs = exps.into_iter().map(|e| e / total).collect();

        (actions, probs)
    }

    /// Make the root child for `action` the new root.
    ///
    /// Sibling subtrees are dropped and the arena is compacted so that the
    /// new root sits at index 0 with no parent. Returns `false` (tree
    /// unchanged) if the root has no such child.
    pub fn promote(&mut self, action: usize) -> bool {
        let Some(new_root) = self.child(self.root, action) else {
            return false;
        };

        // Breadth-first order of the surviving subtree
        let mut order = vec![new_root];
        let mut next = 0;
        while next < order.len() {
            let id = order[next];
            order.extend(self.get(id).children.iter().map(|(_, child)| *child));
            next += 1;
        }

        let mut remap = vec![NodeId::NONE; self.nodes.len()];
        for (new_index, old_id) in order.iter().enumerate() {
            remap[old_id.index()] = NodeId(new_index as u32);
        }

        let mut old_nodes = std::mem::take(&mut self.nodes);
        self.nodes = order
            .iter()
            .map(|old_id| {
                let mut node = std::mem::take(&mut old_nodes[old_id.index()]);
                node.parent = if *old_id == new_root {
                    NodeId::NONE
                } else {
                    remap[node.parent.index()]
                };
                for (_, child) in &mut node.children {
                    *child = remap[child.index()];
                }
                node
            })
            .collect();
        self.root = NodeId(0);

        true
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.mean_value,
            max_depth: self.compute_max_depth(self.root, 0),
        }
    }

    fn compute_max_depth(&self, node_id: NodeId, current_depth: u32) -> u32 {
        let node = self.get(node_id);
        if node.children.is_empty() {
            return current_depth;
        }

        node.children
            .iter()
            .map(|(_, id)| self.compute_max_depth(*id, current_depth + 1))
            .max()
            .unwrap_or(current_depth)
    }
}

impl Default for SearchTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about a search tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}
