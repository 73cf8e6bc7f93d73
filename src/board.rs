use std::fmt;

use crate::types::{CastleRights, Color, Move, Piece, PieceType, Square};

pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// The 8x8 grid. Row 0 is black's back rank, row 7 white's; this is a pure
/// internal indexing choice, algebraic ranks/files only exist at the
/// notation boundary in `Square`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

impl Board {
    pub fn empty() -> Board {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    pub fn starting_position() -> Board {
        Board::from_fen_placement("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR")
    }

    /// Build a board from the piece-placement field of a FEN string
    /// (the part before the first space).
    pub fn from_fen_placement(placement: &str) -> Board {
        let mut board = Board::empty();
        let mut row: u8 = 0;
        let mut col: u8 = 0;
        for c in placement.chars() {
            if c.is_alphabetic() {
                if row > 7 || col > 7 {
                    panic!("Piece placement runs off the board at char {c}.");
                }
                board.squares[row as usize][col as usize] = Some(Piece::from_char(c));
                col += 1;
            } else if c.is_numeric() {
                col += c as u8 - b'0';
            } else if c == '/' {
                row += 1;
                col = 0;
            } else {
                panic!("Unexpected char {c} in piece placement string.");
            }
        }
        board
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.row as usize][sq.col as usize]
    }

    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        self.squares[sq.row as usize][sq.col as usize] = piece;
    }

    pub fn draw_board(&self) -> String {
        let mut string = String::new();
        for row in 0..8 {
            for col in 0..8 {
                string = format!(
                    "{} {}",
                    string,
                    match self.squares[row][col] {
                        Some(p) => p.to_symbol(),
                        None => ".",
                    }
                );
            }
            string = format!("{}\n", string);
        }
        string
    }

    pub fn draw_to_terminal(&self) {
        println!("{}", self.draw_board());
    }
}

/// `make_move` was handed a move whose start square no longer holds the
/// piece the move claims to move. The state is left untouched; this is
/// caller misuse (a stale move), not a game rule.
#[derive(Debug, PartialEq, Eq)]
pub struct StaleMoveError {
    pub at: Square,
    pub claimed: Piece,
    pub found: Option<Piece>,
}

impl fmt::Display for StaleMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.found {
            Some(p) => write!(
                f,
                "stale move: expected {} {} on {}, found {} {}",
                self.claimed.color.to_human(),
                self.claimed.kind.to_human(),
                self.at,
                p.color.to_human(),
                p.kind.to_human()
            ),
            None => write!(
                f,
                "stale move: expected {} {} on {}, square is empty",
                self.claimed.color.to_human(),
                self.claimed.kind.to_human(),
                self.at
            ),
        }
    }
}

impl std::error::Error for StaleMoveError {}

/// The single mutable aggregate: board, turn, move log, cached king
/// squares, terminal flags, en-passant target and castling rights with
/// their history. Exactly one king of each color is on the board at the
/// cached square at all times.
#[derive(Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub(crate) side_to_move: Color,
    pub(crate) move_log: Vec<Move>,
    pub(crate) white_king: Square,
    pub(crate) black_king: Square,
    pub(crate) checkmate: bool,
    pub(crate) stalemate: bool,
    pub(crate) en_passant_target: Option<Square>,
    pub(crate) castling_rights: CastleRights,
    pub(crate) castle_rights_log: Vec<CastleRights>,
}

impl GameState {
    /// Standard starting position, white to move, full castling rights.
    pub fn new() -> GameState {
        GameState::from_fen(STARTING_POSITION_FEN)
    }

    /// Build a state from a FEN string. The placement, active color,
    /// castling and en-passant fields are honored; the halfmove and
    /// fullmove clocks may be present but are ignored (no fifty-move rule
    /// here).
    pub fn from_fen(fen: &str) -> GameState {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            panic!("Fen string must have at least 4 fields, space delimited.");
        }

        let board = Board::from_fen_placement(parts[0]);
        let side_to_move = Color::from_char(parts[1].chars().next().unwrap());

        let castling = parts[2];
        let castling_rights = CastleRights {
            white_kingside: castling.contains('K'),
            white_queenside: castling.contains('Q'),
            black_kingside: castling.contains('k'),
            black_queenside: castling.contains('q'),
        };

        let en_passant_target = if parts[3] == "-" {
            None
        } else {
            Some(Square::from_algebraic(parts[3]))
        };

        let white_king = find_king(&board, Color::White);
        let black_king = find_king(&board, Color::Black);

        GameState {
            board,
            side_to_move,
            move_log: Vec::new(),
            white_king,
            black_king,
            checkmate: false,
            stalemate: false,
            en_passant_target,
            castling_rights,
            castle_rights_log: vec![castling_rights],
        }
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn move_log(&self) -> &[Move] {
        &self.move_log
    }

    pub fn king_square(&self, color: Color) -> Square {
        match color {
            Color::White => self.white_king,
            Color::Black => self.black_king,
        }
    }

    pub fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    pub fn is_stalemate(&self) -> bool {
        self.stalemate
    }

    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    pub fn castling_rights(&self) -> CastleRights {
        self.castling_rights
    }

    pub fn castle_rights_log(&self) -> &[CastleRights] {
        &self.castle_rights_log
    }

    /// Apply a move produced by this engine's own generation. The move is
    /// not re-checked for legality, but a move that no longer matches the
    /// board (stale state) is rejected before anything is touched.
    pub fn make_move(&mut self, m: &Move) -> Result<(), StaleMoveError> {
        match self.board.get(m.from) {
            Some(p) if p == m.piece_moved => {}
            found => {
                return Err(StaleMoveError {
                    at: m.from,
                    claimed: m.piece_moved,
                    found,
                })
            }
        }

        self.board.set(m.from, None);
        self.board.set(m.to, Some(m.piece_moved));
        self.move_log.push(*m);
        self.side_to_move = self.side_to_move.other();

        if m.piece_moved.kind == PieceType::King {
            match m.piece_moved.color {
                Color::White => self.white_king = m.to,
                Color::Black => self.black_king = m.to,
            }
        }

        // promotion is always to a queen
        if m.is_pawn_promotion {
            self.board.set(
                m.to,
                Some(Piece {
                    color: m.piece_moved.color,
                    kind: PieceType::Queen,
                }),
            );
        }

        // the en-passant victim sits behind the destination: same column,
        // same row the capturing pawn started on
        if m.is_en_passant {
            self.board.set(
                Square {
                    row: m.from.row,
                    col: m.to.col,
                },
                None,
            );
        }

        // a double pawn push opens the square it skipped for one ply
        if m.piece_moved.kind == PieceType::Pawn && m.from.row.abs_diff(m.to.row) == 2 {
            self.en_passant_target = Some(Square {
                row: (m.from.row + m.to.row) / 2,
                col: m.from.col,
            });
        } else {
            self.en_passant_target = None;
        }

        if m.is_castle {
            if m.to.col > m.from.col {
                // kingside: rook jumps from beyond the king to just inside
                let rook_from = Square {
                    row: m.to.row,
                    col: m.to.col + 1,
                };
                let rook_to = Square {
                    row: m.to.row,
                    col: m.to.col - 1,
                };
                self.board.set(rook_to, self.board.get(rook_from));
                self.board.set(rook_from, None);
            } else {
                let rook_from = Square {
                    row: m.to.row,
                    col: m.to.col - 2,
                };
                let rook_to = Square {
                    row: m.to.row,
                    col: m.to.col + 1,
                };
                self.board.set(rook_to, self.board.get(rook_from));
                self.board.set(rook_from, None);
            }
        }

        self.revoke_castling_rights(m);
        self.castle_rights_log.push(self.castling_rights);

        Ok(())
    }

    /// Moving a king drops both of that color's rights; moving a rook off
    /// its home square drops the matching one. Rights only ever go from
    /// true to false here.
    fn revoke_castling_rights(&mut self, m: &Move) {
        let color = m.piece_moved.color;
        match m.piece_moved.kind {
            PieceType::King => match color {
                Color::White => {
                    self.castling_rights.white_kingside = false;
                    self.castling_rights.white_queenside = false;
                }
                Color::Black => {
                    self.castling_rights.black_kingside = false;
                    self.castling_rights.black_queenside = false;
                }
            },
            PieceType::Rook => {
                if m.from.row == color.back_row() {
                    if m.from.col == 0 {
                        match color {
                            Color::White => self.castling_rights.white_queenside = false,
                            Color::Black => self.castling_rights.black_queenside = false,
                        }
                    } else if m.from.col == 7 {
                        match color {
                            Color::White => self.castling_rights.white_kingside = false,
                            Color::Black => self.castling_rights.black_kingside = false,
                        }
                    }
                }
            }
            _ => {}
        }
    }

    pub fn draw_to_terminal(&self) {
        self.board.draw_to_terminal();
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

fn find_king(board: &Board, color: Color) -> Square {
    for row in 0..8 {
        for col in 0..8 {
            let sq = Square { row, col };
            if board.get(sq)
                == Some(Piece {
                    color,
                    kind: PieceType::King,
                })
            {
                return sq;
            }
        }
    }
    panic!("No {} king in position.", color.to_human());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn build_starting_state() {
        let state = GameState::new();

        assert_eq!(state.side_to_move(), Color::White);
        assert_eq!(state.move_log().len(), 0);
        assert_eq!(state.castling_rights(), CastleRights::all());
        assert_eq!(state.castle_rights_log().len(), 1);
        assert_eq!(state.en_passant_target(), None);
        assert_eq!(state.king_square(Color::White), Square::from_algebraic("e1"));
        assert_eq!(state.king_square(Color::Black), Square::from_algebraic("e8"));

        let mut piece_count = 0;
        for row in 0..8 {
            for col in 0..8 {
                if state.board.get(Square { row, col }).is_some() {
                    piece_count += 1;
                }
            }
        }
        assert_eq!(piece_count, 32);
    }

    #[test]
    fn test_make_move_basics() {
        let mut state = GameState::new();
        let m = Move::from_notation("e2e4", &state.board).unwrap();
        state.make_move(&m).unwrap();

        assert_eq!(state.board.get(Square::from_algebraic("e2")), None);
        assert_eq!(
            state.board.get(Square::from_algebraic("e4")),
            Some(Piece {
                color: Color::White,
                kind: PieceType::Pawn
            })
        );
        assert_eq!(state.side_to_move(), Color::Black);
        assert_eq!(state.move_log().len(), 1);
        assert_eq!(state.castle_rights_log().len(), 2);
        // double push opened e3 for one ply
        assert_eq!(
            state.en_passant_target(),
            Some(Square::from_algebraic("e3"))
        );
    }

    #[test]
    fn test_single_push_clears_en_passant_target() {
        let mut state = GameState::new();
        let m = Move::from_notation("e2e4", &state.board).unwrap();
        state.make_move(&m).unwrap();
        let m = Move::from_notation("g8f6", &state.board).unwrap();
        state.make_move(&m).unwrap();
        assert_eq!(state.en_passant_target(), None);
    }

    #[test]
    fn test_stale_move_rejected() {
        let mut state = GameState::new();
        let m = Move::from_notation("e2e4", &state.board).unwrap();
        state.make_move(&m).unwrap();

        // the pawn is gone from e2, replaying the same move must fail
        let err = state.make_move(&m).unwrap_err();
        assert_eq!(err.at, Square::from_algebraic("e2"));
        assert_eq!(err.found, None);
        // and nothing changed
        assert_eq!(state.move_log().len(), 1);
        assert_eq!(state.side_to_move(), Color::Black);
    }

    #[test]
    fn test_promotion_always_queens() {
        let mut state = GameState::from_fen("8/2P5/8/8/8/8/8/k3K3 w - - 0 1");
        let m = Move::from_notation("c7c8", &state.board).unwrap();
        assert!(m.is_pawn_promotion);
        state.make_move(&m).unwrap();
        assert_eq!(
            state.board.get(Square::from_algebraic("c8")),
            Some(Piece {
                color: Color::White,
                kind: PieceType::Queen
            })
        );
    }

    #[test]
    fn test_en_passant_removes_victim() {
        // black d-pawn just double-pushed past the white e5 pawn
        let mut state = GameState::from_fen("k7/8/8/3pP3/8/8/8/K7 w - d6 0 1");
        let m = Move::from_notation("e5d6", &state.board).unwrap();
        assert!(m.is_en_passant);
        state.make_move(&m).unwrap();

        assert_eq!(state.board.get(Square::from_algebraic("d5")), None);
        assert_eq!(
            state.board.get(Square::from_algebraic("d6")),
            Some(Piece {
                color: Color::White,
                kind: PieceType::Pawn
            })
        );
    }

    #[test]
    fn test_kingside_castle_relocates_rook() {
        let mut state = GameState::from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let m = Move::from_notation("e1g1", &state.board).unwrap();
        assert!(m.is_castle);
        state.make_move(&m).unwrap();

        assert_eq!(
            state.board.get(Square::from_algebraic("g1")),
            Some(Piece {
                color: Color::White,
                kind: PieceType::King
            })
        );
        assert_eq!(
            state.board.get(Square::from_algebraic("f1")),
            Some(Piece {
                color: Color::White,
                kind: PieceType::Rook
            })
        );
        assert_eq!(state.board.get(Square::from_algebraic("h1")), None);
        assert_eq!(state.king_square(Color::White), Square::from_algebraic("g1"));
        assert!(!state.castling_rights().white_kingside);
        assert!(!state.castling_rights().white_queenside);
    }

    #[test]
    fn test_queenside_castle_relocates_rook() {
        let mut state = GameState::from_fen("4k3/8/8/8/8/8/8/R3K3 w Q - 0 1");
        let m = Move::from_notation("e1c1", &state.board).unwrap();
        assert!(m.is_castle);
        state.make_move(&m).unwrap();

        assert_eq!(
            state.board.get(Square::from_algebraic("c1")),
            Some(Piece {
                color: Color::White,
                kind: PieceType::King
            })
        );
        assert_eq!(
            state.board.get(Square::from_algebraic("d1")),
            Some(Piece {
                color: Color::White,
                kind: PieceType::Rook
            })
        );
        assert_eq!(state.board.get(Square::from_algebraic("a1")), None);
    }

    #[test]
    fn test_rook_move_revokes_single_right() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let m = Move::from_notation("h1h2", &state.board).unwrap();
        state.make_move(&m).unwrap();

        assert!(!state.castling_rights().white_kingside);
        assert!(state.castling_rights().white_queenside);
        assert!(state.castling_rights().black_kingside);
        assert!(state.castling_rights().black_queenside);

        let m = Move::from_notation("a8a7", &state.board).unwrap();
        state.make_move(&m).unwrap();
        assert!(!state.castling_rights().black_queenside);
        assert!(state.castling_rights().black_kingside);
    }

    #[test]
    fn test_king_move_revokes_both_rights() {
        let mut state = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let m = Move::from_notation("e1e2", &state.board).unwrap();
        state.make_move(&m).unwrap();

        assert!(!state.castling_rights().white_kingside);
        assert!(!state.castling_rights().white_queenside);
        assert_eq!(state.king_square(Color::White), Square::from_algebraic("e2"));
        // rights history grew alongside the move log
        assert_eq!(
            state.castle_rights_log().len(),
            state.move_log().len() + 1
        );
    }

    #[test]
    #[should_panic]
    fn test_from_fen_missing_king_panics() {
        GameState::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1");
    }
}
