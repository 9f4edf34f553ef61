//! Ready-made [`GameRules`](crate::board::GameRules) implementations.

/// Tic-tac-toe on two bitboards.
pub mod tic_tac_toe;
