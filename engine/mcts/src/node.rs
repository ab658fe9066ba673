//! MCTS tree node representation.
//!
//! Each node represents the position reached by playing `action` from the
//! parent. Nodes store the visit statistics used for PUCT selection and for
//! the final visit distribution.

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    pub fn is_some(self) -> bool {
        !self.is_none()
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Parent node index (NONE for root). Non-owning; the arena owns every node.
    pub parent: NodeId,

    /// Cell index that led to this node from its parent
    pub action: usize,

    /// Number of times this node has been visited
    pub visit_count: u32,

    /// Running mean of backed-up values, from the perspective of the player
    /// to move at this node.
    pub mean_value: f32,

    /// Prior probability P(s,a) assigned when the parent was expanded.
    pub prior: f32,

    /// Children as (action, NodeId) pairs in expansion order.
    /// Order matters: ties in selection go to the earliest child.
    pub children: Vec<(usize, NodeId)>,
}

impl SearchNode {
    /// Create a new root node.
    pub fn new_root() -> Self {
        Self {
            parent: NodeId::NONE,
            action: 0,
            visit_count: 0,
            mean_value: 0.0,
            prior: 1.0, // Root has prior 1.0
            children: Vec::new(),
        }
    }

    /// Create a new child node.
    pub fn new_child(parent: NodeId, action: usize, prior: f32) -> Self {
        Self {
            parent,
            action,
            visit_count: 0,
            mean_value: 0.0,
            prior,
            children: Vec::new(),
        }
    }

    /// Record one visit with `value` (from this node's mover's perspective).
    #[inline]
    pub fn update(&mut self, value: f32) {
        self.visit_count += 1;
        self.mean_value += (value - self.mean_value) / self.visit_count as f32;
    }

    /// PUCT score of this node as seen from its parent:
    /// `Q + c_puct * P * sqrt(N_parent) / (1 + N)`.
    ///
    /// `mean_value` is stored from the perspective of the player to move at
    /// this node, which is the parent's opponent, so Q is its negation.
    ///
    /// Takes pre-computed sqrt(parent_visits) to avoid redundant sqrt calls
    /// when comparing multiple children.
    #[inline]
    pub fn ucb_score(&self, parent_visits_sqrt: f32, c_puct: f32) -> f32 {
        let q = -self.mean_value;
        let u = c_puct * self.prior * parent_visits_sqrt / (1.0 + self.visit_count as f32);
        q + u
    }

    /// A node with no children yet.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A node with no parent.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl Default for SearchNode {
    fn default() -> Self {
        Self::new_root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_none() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::NONE.is_some());
        assert!(!NodeId(0).is_none());
        assert!(NodeId(0).is_some());
    }

    #[test]
    fn test_new_root() {
        let node = SearchNode::new_root();

        assert!(node.is_root());
        assert!(node.is_leaf());
        assert_eq!(node.visit_count, 0);
        assert!((node.prior - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_running_mean() {
        let mut node = SearchNode::new_child(NodeId(0), 3, 0.5);
        assert!(!node.is_root());

        node.update(1.0);
        assert!((node.mean_value - 1.0).abs() < 1e-6);
        node.update(-1.0);
        assert!(node.mean_value.abs() < 1e-6);
        node.update(1.0);
        node.update(1.0);
        assert_eq!(node.visit_count, 4);
        assert!((node.mean_value - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ucb_score() {
        let mut node = SearchNode::new_child(NodeId(0), 0, 0.5);
        node.visit_count = 10;
        node.mean_value = 0.5; // good for the player to move at the child

        // UCB = -0.5 + 1.0 * 0.5 * 10 / 11 = -0.0455
        let ucb = node.ucb_score(10.0, 1.0);
        assert!((ucb - (-0.0455)).abs() < 0.01);
    }

    #[test]
    fn test_unvisited_ucb_is_prior_driven() {
        let low = SearchNode::new_child(NodeId(0), 0, 0.2);
        let high = SearchNode::new_child(NodeId(0), 1, 0.8);
        assert!(high.ucb_score(2.0, 5.0) > low.ucb_score(2.0, 5.0));
    }
}
