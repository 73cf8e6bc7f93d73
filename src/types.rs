use std::fmt;

use crate::board::Board;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn from_char(c: char) -> Color {
        if c == 'w' {
            Color::White
        } else if c == 'b' {
            Color::Black
        } else {
            panic!("Color string must be either `b` or `w`.")
        }
    }

    pub fn from_case(c: char) -> Color {
        if c.is_uppercase() {
            Color::White
        } else if c.is_lowercase() {
            Color::Black
        } else {
            panic!("Color char must be either upper or lowercase.")
        }
    }

    pub fn other(&self) -> Color {
        if *self == Color::White {
            Color::Black
        } else {
            Color::White
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }

    /// Row a pawn of this color starts on. Row 0 is black's back rank.
    pub fn pawn_start_row(&self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// Row step a pawn of this color advances by.
    pub fn pawn_direction(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// Farthest row for a pawn of this color; reaching it promotes.
    pub fn promotion_row(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// Row this color's pieces start on (rook home squares live here).
    pub fn back_row(&self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PieceType {
    Pawn,
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
}

impl PieceType {
    pub fn from_char(c: char) -> PieceType {
        match c.to_lowercase().next().unwrap() {
            'p' => PieceType::Pawn,
            'r' => PieceType::Rook,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            other => panic!("Unrecognized piece type {other}."),
        }
    }

    pub fn to_human(&self) -> &str {
        match self {
            Self::Pawn => "pawn",
            Self::Rook => "rook",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Rook => 'R',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceType,
}

impl Piece {
    pub fn from_char(c: char) -> Piece {
        Piece {
            color: Color::from_case(c),
            kind: PieceType::from_char(c),
        }
    }

    pub fn to_char(&self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    pub fn to_symbol(&self) -> &'static str {
        let is_white = self.color == Color::White;
        match self.kind {
            PieceType::Pawn => {
                if is_white {
                    "♙"
                } else {
                    "♟︎"
                }
            }
            PieceType::Rook => {
                if is_white {
                    "♖"
                } else {
                    "♜"
                }
            }
            PieceType::Knight => {
                if is_white {
                    "♘"
                } else {
                    "♞"
                }
            }
            PieceType::Bishop => {
                if is_white {
                    "♗"
                } else {
                    "♝"
                }
            }
            PieceType::Queen => {
                if is_white {
                    "♕"
                } else {
                    "♛"
                }
            }
            PieceType::King => {
                if is_white {
                    "♔"
                } else {
                    "♚"
                }
            }
        }
    }
}

/// A board square. Row 0 is black's back rank (rank 8), row 7 is white's
/// back rank (rank 1). Columns run a to h, left to right.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub fn from_algebraic(s: &str) -> Square {
        if s.len() != 2 {
            panic!("Algebraic notation must be of length 2.")
        }

        let mut char_iter = s.chars();
        let file_char = char_iter.next().unwrap();
        let rank_char = char_iter.next().unwrap();

        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            panic!("Square {s} is not on the board.")
        }

        let col = file_char as u8 - b'a';
        let row = 7 - (rank_char as u8 - b'1');

        Square { row, col }
    }

    pub fn to_algebraic(&self) -> String {
        format!(
            "{}{}",
            (self.col + b'a') as char,
            (7 - self.row + b'1') as char
        )
    }

    /// The square offset by (dr, dc), or None if that falls off the board.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..8).contains(&row) && (0..8).contains(&col) {
            Some(Square {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    pub(crate) fn index(&self) -> usize {
        self.row as usize * 8 + self.col as usize
    }

    fn try_from_algebraic(s: &str) -> Option<Square> {
        let mut char_iter = s.chars();
        let file_char = char_iter.next()?;
        let rank_char = char_iter.next()?;
        if char_iter.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
            return None;
        }
        Some(Square {
            row: 7 - (rank_char as u8 - b'1'),
            col: file_char as u8 - b'a',
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// The four independent castling permissions. Revocable only; nothing in
/// the engine ever turns one back on.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct CastleRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastleRights {
    pub fn all() -> CastleRights {
        CastleRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> CastleRights {
        CastleRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn kingside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_kingside,
            Color::Black => self.black_kingside,
        }
    }

    pub fn queenside(&self, color: Color) -> bool {
        match color {
            Color::White => self.white_queenside,
            Color::Black => self.black_queenside,
        }
    }
}

/// One ply, immutable once built. The moved and captured pieces are read
/// off the board at construction time; the en-passant and castle flags
/// have to be supplied by the generator because in both cases the
/// destination square is empty and the board alone cannot tell.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece_moved: Piece,
    pub piece_captured: Option<Piece>,
    pub is_pawn_promotion: bool,
    pub is_en_passant: bool,
    pub is_castle: bool,
}

/// Two moves are the same move iff they share start and end squares. The
/// derived pieces and flags are a function of (start, end, board), so
/// comparing them again would only let mismatched snapshots disagree.
impl PartialEq for Move {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from && self.to == other.to
    }
}

impl Eq for Move {}

impl Move {
    pub fn new(from: Square, to: Square, board: &Board) -> Move {
        let piece_moved = match board.get(from) {
            Some(p) => p,
            None => panic!("No piece on start square {from}."),
        };
        let is_pawn_promotion = piece_moved.kind == PieceType::Pawn
            && to.row == piece_moved.color.promotion_row();
        Move {
            from,
            to,
            piece_moved,
            piece_captured: board.get(to),
            is_pawn_promotion,
            is_en_passant: false,
            is_castle: false,
        }
    }

    /// An en-passant capture. The victim pawn sits behind the destination
    /// square, so the captured piece is overridden here rather than read
    /// off the (empty) destination.
    pub fn en_passant(from: Square, to: Square, board: &Board) -> Move {
        let mut m = Move::new(from, to, board);
        m.is_en_passant = true;
        m.piece_captured = Some(Piece {
            color: m.piece_moved.color.other(),
            kind: PieceType::Pawn,
        });
        m
    }

    pub fn castle(from: Square, to: Square, board: &Board) -> Move {
        let mut m = Move::new(from, to, board);
        m.is_castle = true;
        m
    }

    /// 4-character coordinate notation, e.g. "e2e4". Not SAN: no piece
    /// letters, no capture or check annotations, no disambiguation.
    pub fn to_notation(&self) -> String {
        format!("{}{}", self.from.to_algebraic(), self.to.to_algebraic())
    }

    /// Parse coordinate notation against a board snapshot, recovering the
    /// same flags the generator would have set for that (start, end) pair.
    pub fn from_notation(s: &str, board: &Board) -> Result<Move, ParseMoveError> {
        let chars: Vec<char> = s.chars().collect();
        if chars.len() != 4 {
            return Err(ParseMoveError::Length(chars.len()));
        }
        let from_str: String = chars[..2].iter().collect();
        let to_str: String = chars[2..].iter().collect();
        let from = Square::try_from_algebraic(&from_str)
            .ok_or_else(|| ParseMoveError::Square(from_str.clone()))?;
        let to = Square::try_from_algebraic(&to_str)
            .ok_or_else(|| ParseMoveError::Square(to_str.clone()))?;

        let piece = board.get(from).ok_or(ParseMoveError::NoPiece(from))?;

        if piece.kind == PieceType::King && from.col.abs_diff(to.col) == 2 {
            return Ok(Move::castle(from, to, board));
        }
        if piece.kind == PieceType::Pawn && from.col != to.col && board.get(to).is_none() {
            return Ok(Move::en_passant(from, to, board));
        }
        Ok(Move::new(from, to, board))
    }

    pub fn to_human(&self) -> String {
        let maybe_capture_str = match self.piece_captured {
            Some(p) => format!(" capturing {} {}", p.color.to_human(), p.kind.to_human()),
            None => "".to_string(),
        };
        format!(
            "{} moves {} from {} to {}{}",
            self.piece_moved.color.to_human(),
            self.piece_moved.kind.to_human(),
            self.from.to_algebraic(),
            self.to.to_algebraic(),
            maybe_capture_str
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParseMoveError {
    /// Coordinate notation is always 4 characters.
    Length(usize),
    /// A square was not in a1..h8.
    Square(String),
    /// The start square is empty on the given board.
    NoPiece(Square),
}

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(n) => write!(f, "move notation must be 4 characters, got {n}"),
            Self::Square(s) => write!(f, "`{s}` is not a board square"),
            Self::NoPiece(sq) => write!(f, "no piece on start square {sq}"),
        }
    }
}

impl std::error::Error for ParseMoveError {}
