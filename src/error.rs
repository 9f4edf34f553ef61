use thiserror::Error;

/// Errors surfaced by the search engine.
///
/// The engine performs no recovery of its own: any error aborts the search it
/// occurred in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MctsError {
    /// A move on a path has no matching child in the tree.
    #[error("invalid path: no child matches the move at depth {depth}")]
    InvalidPath {
        /// Zero-based index of the first unmatched move in the path.
        depth: usize,
    },

    /// The game rules disagree with themselves about whether a state is terminal.
    #[error(
        "rules violation: state reported terminal={terminal} but has {legal_moves} legal moves"
    )]
    RulesViolation {
        /// What `is_terminal` reported.
        terminal: bool,
        /// How many moves `legal_moves` returned.
        legal_moves: usize,
    },

    /// A fully expanded node whose children cannot be ranked, e.g. a parent
    /// with no rollouts above visited children.
    #[error("inconsistent statistics at depth {depth}: children cannot be ranked by UCT")]
    InconsistentStatistics {
        /// Number of moves from the root to the offending node.
        depth: usize,
    },

    /// A node id that does not belong to the tree it was used with.
    #[error("unknown node id")]
    UnknownNode,

    /// The root has no explored children to pick a move from.
    #[error("no move available: the root has no explored children")]
    NoMoveAvailable,

    /// An agent answered with a move that is not legal in the position it was given.
    #[error("illegal move {0}")]
    IllegalMove(String),

    /// A configuration value or game setup that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
