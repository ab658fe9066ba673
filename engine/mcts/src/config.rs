//! MCTS configuration parameters.

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Number of playouts to run per move decision.
    pub num_playouts: u32,

    /// Exploration constant for the PUCT formula.
    /// Higher values encourage exploration, lower values favor exploitation.
    pub c_puct: f32,

    /// Maximum number of random moves in a single rollout. A rollout that
    /// hits the cap is scored as a draw.
    pub rollout_limit: u32,

    /// Dirichlet noise alpha for self-play exploration at the root.
    pub dirichlet_alpha: f32,

    /// Fraction of the move distribution that comes from Dirichlet noise in
    /// self-play. 0.25 means 75% search + 25% noise; 0.0 disables noise.
    pub dirichlet_weight: f32,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            num_playouts: 2000,
            c_puct: 5.0,
            rollout_limit: 1000,
            dirichlet_alpha: 0.3,
            dirichlet_weight: 0.25,
        }
    }
}

impl MctsConfig {
    /// Config for evaluation matches: no noise, near-greedy selection.
    pub fn for_evaluation() -> Self {
        Self {
            dirichlet_weight: 0.0,
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_playouts: 50,
            rollout_limit: 200,
            dirichlet_weight: 0.0,
            ..Self::default()
        }
    }

    /// Builder pattern: set number of playouts.
    pub fn with_playouts(mut self, n: u32) -> Self {
        self.num_playouts = n;
        self
    }

    /// Builder pattern: set c_puct exploration constant.
    pub fn with_c_puct(mut self, c: f32) -> Self {
        self.c_puct = c;
        self
    }

    /// Builder pattern: set rollout move cap.
    pub fn with_rollout_limit(mut self, limit: u32) -> Self {
        self.rollout_limit = limit;
        self
    }

    /// Builder pattern: set Dirichlet noise parameters.
    pub fn with_dirichlet(mut self, alpha: f32, weight: f32) -> Self {
        self.dirichlet_alpha = alpha;
        self.dirichlet_weight = weight;
        self
    }
}
