//! Helpers for playing whole games between agents.

use crate::board::{GameRules, PlayerId, TurnBased};
use crate::error::MctsError;
use crate::random::RandomSource;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A decision function: given a position, returns the move to play.
pub type Agent<'a, R> = Box<
    dyn FnMut(&<R as GameRules>::State) -> Result<<R as GameRules>::Move, MctsError> + 'a,
>;

/// Everything that happened in one game.
#[derive(Debug, Clone)]
pub struct GameRecord<S, M> {
    /// Every position, from the initial one to the final one.
    pub states: Vec<S>,
    /// The moves played, one fewer than the positions.
    pub moves: Vec<M>,
    pub winner: Option<PlayerId>,
}

/// Win counts per player and the number of draws over several games.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameTally {
    pub wins: BTreeMap<PlayerId, u32>,
    pub draws: u32,
}

impl GameTally {
    pub fn record(&mut self, winner: Option<PlayerId>) {
        match winner {
            Some(player) => *self.wins.entry(player).or_default() += 1,
            None => self.draws += 1,
        }
    }

    /// Games won by `player`.
    pub fn wins_of(&self, player: PlayerId) -> u32 {
        self.wins.get(&player).copied().unwrap_or(0)
    }

    pub fn games(&self) -> u32 {
        self.wins.values().sum::<u32>() + self.draws
    }
}

/// An agent that plays a uniformly random legal move.
pub fn random_agent<'a, R: GameRules + 'a>(
    rules: R,
    mut random: impl RandomSource + 'a,
) -> Agent<'a, R> {
    Box::new(move |state: &R::State| {
        let moves = rules.checked_moves(state)?;
        random
            .choose(&moves)
            .cloned()
            .ok_or(MctsError::NoMoveAvailable)
    })
}

/// Plays one game from `initial` until it ends.
///
/// The agent at index `player_to_move % agents.len()` moves in each position.
/// A move outside the legal moves of the position ends the game with
/// [`MctsError::IllegalMove`].
pub fn play_game<R: GameRules>(
    rules: &R,
    agents: &mut [Agent<'_, R>],
    initial: R::State,
) -> Result<GameRecord<R::State, R::Move>, MctsError> {
    if agents.is_empty() {
        return Err(MctsError::InvalidConfig("a game needs at least one agent".to_string()));
    }

    let mut states = vec![initial];
    let mut moves = Vec::new();
    loop {
        let Some(state) = states.last() else {
            return Err(MctsError::NoMoveAvailable);
        };
        let legal = rules.checked_moves(state)?;
        if legal.is_empty() {
            let winner = rules.check_win(state);
            debug!(turns = moves.len(), winner = ?winner, "game over");
            return Ok(GameRecord {
                states,
                moves,
                winner,
            });
        }

        let player = state.player_to_move();
        let seat = player.0 % agents.len();
        let mv = (agents[seat])(state)?;
        if !legal.contains(&mv) {
            return Err(MctsError::IllegalMove(format!("{mv:?}")));
        }
        debug!(turn = moves.len() + 1, %player, mv = ?mv, "move played");

        let next = rules.apply_move(state, &mv);
        moves.push(mv);
        states.push(next);
    }
}

/// Plays `games` games from `initial` and counts the results.
pub fn play_n_games<R: GameRules>(
    rules: &R,
    agents: &mut [Agent<'_, R>],
    initial: &R::State,
    games: u32,
) -> Result<GameTally, MctsError> {
    let mut tally = GameTally::default();
    for _ in 0..games {
        let record = play_game(rules, agents, initial.clone())?;
        tally.record(record.winner);
    }
    info!(games, draws = tally.draws, wins = ?tally.wins, "games finished");
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boards::tic_tac_toe::{TicTacToe, TicTacToeBoard};
    use crate::random::{LcgRandomSource, ScriptedRandomSource};

    fn first_empty_cell<'a>() -> Agent<'a, TicTacToe> {
        Box::new(|state: &TicTacToeBoard| {
            TicTacToe
                .legal_moves(state)
                .first()
                .copied()
                .ok_or(MctsError::NoMoveAvailable)
        })
    }

    #[test]
    fn play_game_alternates_agents() {
        // arrange
        let mut agents = vec![first_empty_cell(), first_empty_cell()];

        // act
        let record = play_game(&TicTacToe, &mut agents, TicTacToeBoard::default()).unwrap();

        // assert
        // O takes 0, 2, 4, 6 and completes the 2-4-6 diagonal.
        assert_eq!(record.moves, vec![0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(record.winner, Some(PlayerId(0)));
        assert_eq!(record.states.len(), record.moves.len() + 1);
        assert_eq!(record.states.last().unwrap().cells_string(), "OXOXOXO--");
    }

    #[test]
    fn play_game_rejects_illegal_moves() {
        let stubborn: Agent<'_, TicTacToe> = Box::new(|_: &TicTacToeBoard| Ok(0));
        let mut agents = vec![stubborn];
        let result = play_game(&TicTacToe, &mut agents, TicTacToeBoard::default());
        assert_eq!(result.unwrap_err(), MctsError::IllegalMove("0".to_string()));
    }

    #[test]
    fn play_game_needs_agents() {
        let result = play_game(&TicTacToe, &mut [], TicTacToeBoard::default());
        assert!(matches!(result, Err(MctsError::InvalidConfig(_))));
    }

    #[test]
    fn random_agent_picks_by_modulo() {
        let mut agent = random_agent(TicTacToe, ScriptedRandomSource::constant(10));
        assert_eq!(agent(&TicTacToeBoard::default()), Ok(1));
    }

    #[test]
    fn tally_counts_every_game() {
        let mut agents = vec![
            random_agent(TicTacToe, LcgRandomSource::new(1)),
            random_agent(TicTacToe, LcgRandomSource::new(2)),
        ];
        let tally = play_n_games(&TicTacToe, &mut agents, &TicTacToeBoard::default(), 40).unwrap();
        assert_eq!(tally.games(), 40);
        assert_eq!(
            tally.wins_of(PlayerId(0)) + tally.wins_of(PlayerId(1)) + tally.draws,
            40
        );
    }

    #[test]
    fn tally_records_draws_and_wins() {
        let mut tally = GameTally::default();
        tally.record(None);
        tally.record(Some(PlayerId(1)));
        tally.record(Some(PlayerId(1)));
        assert_eq!(tally.draws, 1);
        assert_eq!(tally.wins_of(PlayerId(1)), 2);
        assert_eq!(tally.wins_of(PlayerId(0)), 0);
    }
}
