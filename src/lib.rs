//! A game-agnostic Monte Carlo tree search engine.
//!
//! Given the rules of a turn-based game and a position, the engine grows a
//! search tree with repeated select, expand, simulate and backpropagate
//! iterations, then plays the move that was visited most. Selection ranks
//! children with UCT, simulations are uniformly random playouts, and every
//! random choice flows through a single [`RandomSource`](random::RandomSource)
//! so a search can be replayed exactly.
//!
//! # Example
//!
//! ```rust
//! use mcts_engine::boards::tic_tac_toe::{TicTacToe, TicTacToeBoard};
//! use mcts_engine::mcts::MonteCarloTreeSearch;
//! use mcts_engine::random::LcgRandomSource;
//!
//! // O holds cells 0 and 1 and can complete the bottom row on 2.
//! let board = TicTacToeBoard::default()
//!     .with_move(0)
//!     .with_move(3)
//!     .with_move(1)
//!     .with_move(4);
//!
//! let mut mcts = MonteCarloTreeSearch::builder(TicTacToe)
//!     .with_random_source(LcgRandomSource::default())
//!     .with_budget(1000)
//!     .build()
//!     .unwrap();
//!
//! let best_move = mcts.search(&board).unwrap();
//! assert_eq!(best_move, 2);
//! ```

/// Contains the `GameRules` and `TurnBased` traits that define the interface for a game.
pub mod board;
/// Contains pre-made implementations of the `GameRules` trait for common games.
pub mod boards;
/// Contains `MctsConfig`, the tunable parameters of a search.
pub mod config;
/// Contains the `MctsError` type returned by fallible operations.
pub mod error;
/// The core module of the library, containing the `MonteCarloTreeSearch` implementation.
pub mod mcts;
/// Contains the `MctsNode` struct, which represents a node in the search tree.
pub mod mcts_node;
/// Helpers for playing whole games between agents.
pub mod play;
/// Contains traits and implementations for random number generation.
pub mod random;
/// Contains `SearchTree`, the arena that holds the search nodes.
pub mod tree;
/// The UCT formula and the best-child helper built on it.
pub mod uct;

pub use board::{GameRules, PlayerId, TurnBased};
pub use config::MctsConfig;
pub use error::MctsError;
pub use mcts::{MonteCarloTreeSearch, make_agent};
pub use tree::SearchTree;
