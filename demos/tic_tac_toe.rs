extern crate mcts_engine;

use mcts_engine::boards::tic_tac_toe::{TicTacToe, TicTacToeBoard};
use mcts_engine::play::{Agent, play_game, play_n_games, random_agent};
use mcts_engine::random::StandardRandomSource;
use mcts_engine::{MctsError, PlayerId, make_agent};
use tracing_subscriber::EnvFilter;

const EXPLORATION_CONSTANT: f64 = 1.2;

fn main() -> Result<(), MctsError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("-------------------------------- Demo one game ---------------------------------");
    let mut agents: Vec<Agent<'_, TicTacToe>> = vec![
        Box::new(make_agent(EXPLORATION_CONSTANT, TicTacToe, PlayerId(0), 1000)?),
        random_agent(TicTacToe, StandardRandomSource::default()),
    ];
    let record = play_game(&TicTacToe, &mut agents, TicTacToeBoard::default())?;
    for (turn, (mv, state)) in record.moves.iter().zip(&record.states[1..]).enumerate() {
        println!("Turn {}: cell {mv}", turn + 1);
        println!("{state}");
    }
    match record.winner {
        Some(player) => println!("{player} wins!"),
        None => println!("Draw."),
    }

    let games = 100;
    println!("------------------------------ Playing {games} games ------------------------------");
    let mut agents: Vec<Agent<'_, TicTacToe>> = vec![
        random_agent(TicTacToe, StandardRandomSource::default()),
        Box::new(make_agent(EXPLORATION_CONSTANT, TicTacToe, PlayerId(1), 100)?),
    ];
    let tally = play_n_games(&TicTacToe, &mut agents, &TicTacToeBoard::default(), games)?;
    println!(
        "random (player 0) wins: {}, mcts (player 1) wins: {}, draws: {}",
        tally.wins_of(PlayerId(0)),
        tally.wins_of(PlayerId(1)),
        tally.draws
    );

    Ok(())
}
