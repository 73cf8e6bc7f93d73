use itertools::iproduct;
use once_cell::sync::Lazy;

use crate::board::GameState;
use crate::types::{Color, Move, PieceType, Square};

/// Step directions, orthogonals first. Sliders index into this: rooks use
/// the first four, bishops the last four, queens all eight.
const DIRECTIONS: [(i8, i8); 8] = [
    (-1, 0),
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

const ROOK_DIRS: std::ops::Range<usize> = 0..4;
const BISHOP_DIRS: std::ops::Range<usize> = 4..8;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

static RAYS: Lazy<RayTable> = Lazy::new(RayTable::new);

/// For every square, the run of squares to the board edge in each of the
/// eight directions. Sliders walk these instead of re-deriving bounds on
/// every step.
struct RayTable {
    rays: Vec<[Vec<Square>; 8]>,
}

impl RayTable {
    fn new() -> RayTable {
        let mut rays = Vec::with_capacity(64);
        for (row, col) in iproduct!(0..8u8, 0..8u8) {
            let from = Square { row, col };
            let mut per_dir: [Vec<Square>; 8] = Default::default();
            for (dir, &(dr, dc)) in DIRECTIONS.iter().enumerate() {
                let mut current = from;
                while let Some(next) = current.offset(dr, dc) {
                    per_dir[dir].push(next);
                    current = next;
                }
            }
            rays.push(per_dir);
        }
        RayTable { rays }
    }

    fn get(&self, from: Square, dir: usize) -> &[Square] {
        &self.rays[from.index()][dir]
    }
}

/// Accumulates the pseudo-legal moves of one side: every move that follows
/// the piece movement patterns, with no attention paid to checks. Castles
/// are not generated here; they are appended separately after the check
/// filter, which also keeps attack probing from recursing.
pub struct MoveGenerator<'a> {
    state: &'a GameState,
    color: Color,
    moves: Vec<Move>,
}

impl<'a> MoveGenerator<'a> {
    pub fn new(state: &'a GameState, color: Color) -> Self {
        Self {
            state,
            color,
            moves: Vec::with_capacity(64),
        }
    }

    pub fn pseudo_legal(mut self) -> Vec<Move> {
        for (row, col) in iproduct!(0..8u8, 0..8u8) {
            let from = Square { row, col };
            let piece = match self.state.board.get(from) {
                Some(p) if p.color == self.color => p,
                _ => continue,
            };
            match piece.kind {
                PieceType::Pawn => self.pawn_moves(from),
                PieceType::Rook => self.slider_moves(from, ROOK_DIRS),
                PieceType::Knight => self.leaper_moves(from, &KNIGHT_OFFSETS),
                PieceType::Bishop => self.slider_moves(from, BISHOP_DIRS),
                PieceType::Queen => {
                    self.slider_moves(from, ROOK_DIRS);
                    self.slider_moves(from, BISHOP_DIRS);
                }
                PieceType::King => self.leaper_moves(from, &KING_OFFSETS),
            }
        }
        self.moves
    }

    fn pawn_moves(&mut self, from: Square) {
        let board = &self.state.board;
        let dir = self.color.pawn_direction();

        if let Some(one) = from.offset(dir, 0) {
            if board.get(one).is_none() {
                self.moves.push(Move::new(from, one, board));
                if from.row == self.color.pawn_start_row() {
                    if let Some(two) = one.offset(dir, 0) {
                        if board.get(two).is_none() {
                            self.moves.push(Move::new(from, two, board));
                        }
                    }
                }
            }
        }

        for dc in [-1, 1] {
            if let Some(diag) = from.offset(dir, dc) {
                match board.get(diag) {
                    Some(p) if p.color != self.color => {
                        self.moves.push(Move::new(from, diag, board));
                    }
                    None if Some(diag) == self.state.en_passant_target() => {
                        self.moves.push(Move::en_passant(from, diag, board));
                    }
                    _ => {}
                }
            }
        }
    }

    /// Knight and king pattern: single fixed offsets, land anywhere not
    /// held by an allied piece.
    fn leaper_moves(&mut self, from: Square, offsets: &[(i8, i8); 8]) {
        let board = &self.state.board;
        for &(dr, dc) in offsets {
            if let Some(to) = from.offset(dr, dc) {
                match board.get(to) {
                    Some(p) if p.color == self.color => {}
                    _ => self.moves.push(Move::new(from, to, board)),
                }
            }
        }
    }

    /// Walk each ray outward, stop at the edge, stop after taking the
    /// first enemy piece, stop before any allied piece.
    fn slider_moves(&mut self, from: Square, dirs: std::ops::Range<usize>) {
        let board = &self.state.board;
        for dir in dirs {
            for &to in RAYS.get(from, dir) {
                match board.get(to) {
                    None => self.moves.push(Move::new(from, to, board)),
                    Some(p) if p.color != self.color => {
                        self.moves.push(Move::new(from, to, board));
                        break;
                    }
                    Some(_) => break,
                }
            }
        }
    }
}

impl GameState {
    /// All legal moves for the side to move, in generation order.
    ///
    /// This is a read-mostly query: the board, move log, rights and
    /// en-passant target are untouched (legality probing runs on clones).
    /// Its one documented side effect is recomputing the checkmate and
    /// stalemate flags, which are set iff the side to move has no legal
    /// move, checkmate when in check and stalemate when not.
    pub fn legal_moves(&mut self) -> Vec<Move> {
        let color = self.side_to_move;
        self.checkmate = false;
        self.stalemate = false;

        let mut moves = MoveGenerator::new(self, color).pseudo_legal();

        // copy-on-probe: play each candidate out on a clone and ask
        // whether the mover's own king is attacked afterwards
        moves.retain(|m| {
            let mut probe = self.clone();
            probe
                .make_move(m)
                .expect("generated move must match the board it came from");
            !probe.square_attacked_by(probe.king_square(color), color.other())
        });

        if moves.is_empty() {
            if self.in_check() {
                self.checkmate = true;
            } else {
                self.stalemate = true;
            }
        }

        // castles go last; their generation proves the king is safe on
        // every square it touches, so they need no probe
        self.castle_moves(&mut moves);

        moves
    }

    /// Is the side to move's king currently attacked?
    pub fn in_check(&self) -> bool {
        let color = self.side_to_move;
        self.square_attacked_by(self.king_square(color), color.other())
    }

    /// True iff any of `attacker`'s pseudo-legal moves lands on `square`.
    /// Pseudo-legal reach is all that attack detection needs; recursing
    /// into full legality here would loop back into `legal_moves`.
    pub fn square_attacked_by(&self, square: Square, attacker: Color) -> bool {
        MoveGenerator::new(self, attacker)
            .pseudo_legal()
            .iter()
            .any(|m| m.to == square)
    }

    fn castle_moves(&self, moves: &mut Vec<Move>) {
        let color = self.side_to_move;
        let rights = self.castling_rights();
        if !rights.kingside(color) && !rights.queenside(color) {
            return;
        }

        let king = self.king_square(color);
        let enemy = color.other();
        if self.square_attacked_by(king, enemy) {
            return;
        }
        if rights.kingside(color) {
            self.kingside_castle(king, enemy, moves);
        }
        if rights.queenside(color) {
            self.queenside_castle(king, enemy, moves);
        }
    }

    /// Both squares between king and rook must be empty and unattacked;
    /// the king transits one and lands on the other.
    fn kingside_castle(&self, king: Square, enemy: Color, moves: &mut Vec<Move>) {
        let (one, two) = match (king.offset(0, 1), king.offset(0, 2)) {
            (Some(one), Some(two)) => (one, two),
            _ => return,
        };
        if self.board.get(one).is_none()
            && self.board.get(two).is_none()
            && !self.square_attacked_by(one, enemy)
            && !self.square_attacked_by(two, enemy)
        {
            moves.push(Move::castle(king, two, &self.board));
        }
    }

    /// The king transits the two adjacent squares, which must be empty and
    /// unattacked. The far square next to the rook must only be empty: the
    /// king never touches it, but the rook passes through.
    fn queenside_castle(&self, king: Square, enemy: Color, moves: &mut Vec<Move>) {
        let (one, two, rook_path) =
            match (king.offset(0, -1), king.offset(0, -2), king.offset(0, -3)) {
                (Some(one), Some(two), Some(three)) => (one, two, three),
                _ => return,
            };
        if self.board.get(one).is_none()
            && self.board.get(two).is_none()
            && self.board.get(rook_path).is_none()
            && !self.square_attacked_by(one, enemy)
            && !self.square_attacked_by(two, enemy)
        {
            moves.push(Move::castle(king, two, &self.board));
        }
    }
}
