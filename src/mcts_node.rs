use crate::uct::uct;

/// Represents a single node in the Monte Carlo search tree.
///
/// Each node owns the game state it represents and the statistics of every
/// simulation whose path passed through it.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsNode<S, M> {
    /// The move that led to this node's state from its parent. `None` for the root node.
    pub prev_move: Option<M>,
    /// The game state that this node represents.
    pub state: S,
    /// The number of simulations that have passed through this node.
    pub num_rollouts: u32,
    /// Sum of simulation results, each +1, 0 or -1 from the point of view of
    /// the player who made `prev_move`. Always `|score| <= num_rollouts`.
    pub score: i64,
}

impl<S, M> MctsNode<S, M> {
    /// Creates a root node for `state` with no statistics.
    pub fn root(state: S) -> Self {
        MctsNode {
            prev_move: None,
            state,
            num_rollouts: 0,
            score: 0,
        }
    }

    /// Creates an unvisited node reached by playing `mv`.
    pub fn child(mv: M, state: S) -> Self {
        MctsNode {
            prev_move: Some(mv),
            state,
            num_rollouts: 0,
            score: 0,
        }
    }

    /// Sets the statistics of this node.
    pub fn with_stats(mut self, num_rollouts: u32, score: i64) -> Self {
        self.num_rollouts = num_rollouts;
        self.score = score;
        self
    }

    /// Average simulation result in `[-1, 1]`, or 0 for an unvisited node.
    pub fn average_score(&self) -> f64 {
        if self.num_rollouts == 0 {
            0.0
        } else {
            self.score as f64 / f64::from(self.num_rollouts)
        }
    }

    /// UCT value of this node under a parent that has been visited
    /// `parent_rollouts` times.
    pub fn uct(&self, exploration: f64, parent_rollouts: f64) -> f64 {
        uct(exploration, parent_rollouts, self.num_rollouts, self.score)
    }
}
