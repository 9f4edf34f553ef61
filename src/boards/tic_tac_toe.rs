use crate::board::{GameRules, PlayerId, TurnBased};
use std::fmt;

/// Number of cells on the board.
pub const BOARD_SIZE: u8 = 9;
/// Number of columns.
pub const WIDTH: u8 = 3;

const BOARD_AREA: u16 = (1 << BOARD_SIZE) - 1;
const THREE_IN_A_ROW: [u16; 8] = [
    0b001001001,
    0b010010010,
    0b100100100,
    0b000000111,
    0b000111000,
    0b111000000,
    0b100010001,
    0b001010100,
];
const PLAYER_PIECE_SYMBOLS: [char; 2] = ['O', 'X'];
const PLAYERS: usize = PLAYER_PIECE_SYMBOLS.len();

/// A tic-tac-toe position: one bitboard per player and the side to move.
///
/// Cell `i` is bit `i`. Cells are laid out like a chess board, with row 0 at
/// the bottom:
///
/// ```text
///  6 | 7 | 8
/// ---+---+---
///  3 | 4 | 5
/// ---+---+---
///  0 | 1 | 2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TicTacToeBoard {
    bitboards: [u16; PLAYERS],
    player_to_move: PlayerId,
}

impl Default for TicTacToeBoard {
    /// An empty board with player 0 (`O`) to move.
    fn default() -> Self {
        TicTacToeBoard::from_bitboards([0, 0], PlayerId(0))
    }
}

impl TicTacToeBoard {
    pub const fn from_bitboards(bitboards: [u16; PLAYERS], player_to_move: PlayerId) -> Self {
        Self {
            bitboards,
            player_to_move,
        }
    }

    pub fn bitboards(&self) -> [u16; PLAYERS] {
        self.bitboards
    }

    /// Bitmask of the empty cells.
    pub fn empty_cells(&self) -> u16 {
        BOARD_AREA & !self.occupied()
    }

    fn occupied(&self) -> u16 {
        self.bitboards.iter().fold(0, |acc, board| acc | board)
    }

    pub fn is_full(&self) -> bool {
        self.empty_cells() == 0
    }

    /// The player owning `cell`. If several bitboards claim it, the first wins.
    pub fn owner(&self, cell: u8) -> Option<PlayerId> {
        if cell >= BOARD_SIZE {
            return None;
        }
        self.bitboards
            .iter()
            .position(|board| *board & (1u16 << cell) != 0)
            .map(PlayerId)
    }

    /// The player with three in a row. Should both have one, the last player wins.
    pub fn winner(&self) -> Option<PlayerId> {
        self.bitboards
            .iter()
            .enumerate()
            .filter(|(_, board)| THREE_IN_A_ROW.iter().any(|line| *board & line == *line))
            .map(|(player, _)| PlayerId(player))
            .last()
    }

    /// Places the current player's piece on `cell` and passes the turn.
    ///
    /// A move onto an occupied or out-of-range cell leaves the pieces as they
    /// are, but the turn still passes.
    pub fn with_move(&self, cell: u8) -> Self {
        let mut bitboards = self.bitboards;
        let player = self.player_to_move.0 % PLAYERS;
        if cell < BOARD_SIZE && self.empty_cells() & (1u16 << cell) != 0 {
            bitboards[player] |= 1u16 << cell;
        }

        Self {
            bitboards,
            player_to_move: PlayerId((player + 1) % PLAYERS),
        }
    }

    /// The cells read left to right from cell 0, `-` for empty.
    pub fn cells_string(&self) -> String {
        (0..BOARD_SIZE)
            .map(|cell| match self.owner(cell) {
                Some(player) => PLAYER_PIECE_SYMBOLS[player.0],
                None => '-',
            })
            .collect()
    }
}

impl TurnBased for TicTacToeBoard {
    fn player_to_move(&self) -> PlayerId {
        self.player_to_move
    }
}

impl fmt::Display for TicTacToeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<char> = self.cells_string().chars().collect();
        let rows = BOARD_SIZE / WIDTH;
        for row in (0..rows).rev() {
            let start = usize::from(row * WIDTH);
            let line: Vec<String> = cells[start..start + usize::from(WIDTH)]
                .iter()
                .map(|cell| format!(" {cell} "))
                .collect();
            writeln!(f, "{}", line.join("|").trim_end())?;
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
        }
        Ok(())
    }
}

/// The rules of tic-tac-toe. Moves are cell indices `0..9`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl GameRules for TicTacToe {
    type State = TicTacToeBoard;
    type Move = u8;

    /// Empty cells in ascending order; nothing once the game is over.
    fn legal_moves(&self, state: &TicTacToeBoard) -> Vec<u8> {
        if self.is_terminal(state) {
            return Vec::new();
        }

        let empty = state.empty_cells();
        (0..BOARD_SIZE)
            .filter(|cell| empty & (1u16 << cell) != 0)
            .collect()
    }

    fn is_terminal(&self, state: &TicTacToeBoard) -> bool {
        state.is_full() || state.winner().is_some()
    }

    fn apply_move(&self, state: &TicTacToeBoard, mv: &u8) -> TicTacToeBoard {
        state.with_move(*mv)
    }

    fn check_win(&self, state: &TicTacToeBoard) -> Option<PlayerId> {
        state.winner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(o: u16, x: u16, player: usize) -> TicTacToeBoard {
        TicTacToeBoard::from_bitboards([o, x], PlayerId(player))
    }

    #[test]
    fn empty_cells_mask() {
        assert_eq!(board(0b000011111, 0b111100000, 0).empty_cells(), 0);
        assert_eq!(board(0b000111100, 0b111000000, 0).empty_cells(), 0b000000011);
    }

    #[test]
    fn move_places_piece_and_passes_turn() {
        let next = board(0b100010010, 0b011000100, 1).with_move(0);
        assert_eq!(next, board(0b100010010, 0b011000101, 0));

        let next = next.with_move(3);
        assert_eq!(next, board(0b100011010, 0b011000101, 1));
    }

    #[test]
    fn move_onto_occupied_or_missing_cell_keeps_pieces() {
        assert_eq!(board(0, 0b1, 0).with_move(0), board(0, 0b1, 1));
        assert_eq!(board(0, 0, 1).with_move(9), board(0, 0, 0));
    }

    #[test]
    fn is_full() {
        assert!(!board(0b001001001, 0, 0).is_full());
        assert!(board(0b001001001, 0b110110110, 0).is_full());
    }

    #[test]
    fn winner() {
        assert_eq!(board(0b001001001, 0, 1).winner(), Some(PlayerId(0)));
        assert_eq!(board(0, 0b111000000, 0).winner(), Some(PlayerId(1)));
        assert_eq!(board(0b000001001, 0b000000110, 0).winner(), None);
        assert_eq!(board(0b000000111, 0b111000000, 0).winner(), Some(PlayerId(1)));
    }

    #[test]
    fn terminal_when_won_or_full() {
        let rules = TicTacToe;
        assert!(rules.is_terminal(&board(0b001001001, 0b000010010, 1)));
        assert!(rules.is_terminal(&board(0b011100101, 0b100011010, 1)));
        assert!(!rules.is_terminal(&board(0b000001001, 0b000000110, 0)));
    }

    #[test]
    fn legal_moves_in_ascending_order() {
        let rules = TicTacToe;
        assert_eq!(
            rules.legal_moves(&board(0b000001001, 0b000000110, 0)),
            vec![4, 5, 6, 7, 8]
        );
        assert!(rules.legal_moves(&board(0b001001001, 0b000010010, 1)).is_empty());
        assert_eq!(rules.legal_moves(&TicTacToeBoard::default()).len(), 9);
    }

    #[test]
    fn rules_are_consistent_with_themselves() {
        let rules = TicTacToe;
        assert!(rules.checked_moves(&board(0b001001001, 0b000010010, 1)).is_ok());
        assert!(rules.checked_moves(&TicTacToeBoard::default()).is_ok());
    }

    #[test]
    fn owner_prefers_first_player() {
        let state = board(0b000000101, 0b000000110, 0);
        assert_eq!(state.owner(0), Some(PlayerId(0)));
        assert_eq!(state.owner(1), Some(PlayerId(1)));
        assert_eq!(state.owner(2), Some(PlayerId(0)));
        assert_eq!(state.owner(3), None);
    }

    #[test]
    fn cells_string_reads_from_cell_zero() {
        assert_eq!(board(0b110001010, 0b001010101, 0).cells_string(), "XOXOX-XOO");
    }

    #[test]
    fn display_puts_row_zero_at_the_bottom() {
        let rendered = board(0b110001010, 0b001010101, 0).to_string();
        let expected = " X | O | O\n---+---+---\n O | X | -\n---+---+---\n X | O | X\n";
        assert_eq!(rendered, expected);
    }
}
