use crate::error::MctsError;
use std::fmt::{self, Debug, Display};

/// Identifies a side in a turn-based game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub usize);

impl Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// A game position that knows whose turn it is.
///
/// This is the only assumption the engine makes about a state's contents: it
/// is read during backpropagation to attribute each result to the player who
/// made the move into a node.
pub trait TurnBased {
    /// Returns the player who is to move in this position.
    fn player_to_move(&self) -> PlayerId;
}

/// The rules of a game, supplied by the caller.
///
/// All methods are expected to be pure functions of their inputs. The engine
/// never mutates a state in place; new positions are always produced through
/// [`GameRules::apply_move`].
pub trait GameRules {
    /// A game position.
    type State: TurnBased + Clone;

    /// An action that leads from one position to another.
    type Move: Clone + PartialEq + Debug;

    /// Returns every legal move from `state`. Must be empty exactly when
    /// [`GameRules::is_terminal`] is true.
    fn legal_moves(&self, state: &Self::State) -> Vec<Self::Move>;

    /// Returns whether the game is over at `state`.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Returns the position reached by playing `mv` from `state`.
    fn apply_move(&self, state: &Self::State, mv: &Self::Move) -> Self::State;

    /// Returns the winner at `state`, or `None` for a draw or unfinished game.
    fn check_win(&self, state: &Self::State) -> Option<PlayerId>;

    /// Returns the legal moves of `state` after checking them against
    /// [`GameRules::is_terminal`].
    ///
    /// The result is empty iff the state is terminal. A disagreement between
    /// the two is reported as [`MctsError::RulesViolation`].
    fn checked_moves(&self, state: &Self::State) -> Result<Vec<Self::Move>, MctsError> {
        let terminal = self.is_terminal(state);
        let moves = self.legal_moves(state);

        if terminal == moves.is_empty() {
            return Ok(moves);
        }

        Err(MctsError::RulesViolation {
            terminal,
            legal_moves: moves.len(),
        })
    }
}
