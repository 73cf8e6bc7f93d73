use chrono::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::board::GameState;
use crate::types::Color;

/// Drives one game of random legal moves against itself. There is no
/// search here; this exists to exercise the rules engine end to end and
/// to produce a transcript.
pub struct Game {
    state: GameState,
    rng: StdRng,
    game_start_time: DateTime<Local>,
    silent: bool,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self {
            state: GameState::new(),
            rng: StdRng::seed_from_u64(seed),
            game_start_time: Local::now(),
            silent: false,
        }
    }

    pub fn new_silent(seed: u64) -> Self {
        Self {
            silent: true,
            ..Game::new(seed)
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Play random legal moves until a terminal position or the ply limit.
    /// Returns the number of plies actually played.
    pub fn play_random(&mut self, max_plies: u32) -> u32 {
        for ply in 0..max_plies {
            let moves = self.state.legal_moves();
            let selected = match moves.choose(&mut self.rng) {
                Some(m) => *m,
                None => {
                    if !self.silent {
                        if self.state.is_checkmate() {
                            println!(
                                "checkmate, {} wins",
                                self.state.side_to_move().other().to_human()
                            );
                        } else {
                            println!("stalemate");
                        }
                    }
                    return ply;
                }
            };
            if !self.silent {
                println!(
                    "move {}: {} ({})",
                    ply / 2 + 1,
                    selected.to_human(),
                    selected.to_notation()
                );
            }
            self.state
                .make_move(&selected)
                .expect("chosen move came from legal_moves on this state");
            if !self.silent {
                self.state.draw_to_terminal();
                println!();
            }
        }
        max_plies
    }

    /// Dated transcript of the game so far, one numbered move pair per
    /// line, in coordinate notation.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "[Date \"{}\"]\n\n",
            self.game_start_time.format("%Y.%m.%d")
        ));
        for (i, m) in self.state.move_log().iter().enumerate() {
            if i % 2 == 0 {
                out.push_str(&format!("{}. ", i / 2 + 1));
            }
            out.push_str(&m.to_notation());
            out.push(' ');
        }
        if self.state.is_checkmate() {
            out.push_str(match self.state.side_to_move() {
                Color::White => "0-1",
                Color::Black => "1-0",
            });
        } else if self.state.is_stalemate() {
            out.push_str("1/2-1/2");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceType, Square};

    #[test]
    fn test_random_game_runs() {
        let mut game = Game::new_silent(7);
        let plies = game.play_random(40);
        assert!(plies > 0);
        assert_eq!(game.state().move_log().len() as u32, plies);
        assert!(!game.transcript().is_empty());
    }

    #[test]
    fn test_kings_survive_random_play() {
        let mut game = Game::new_silent(42);
        game.play_random(120);

        let state = game.state();
        for color in [Color::White, Color::Black] {
            let cached = state.king_square(color);
            assert_eq!(
                state.board.get(cached),
                Some(Piece {
                    color,
                    kind: PieceType::King
                })
            );
            let king_count = (0..8u8)
                .flat_map(|row| (0..8u8).map(move |col| Square { row, col }))
                .filter(|&sq| {
                    state.board.get(sq)
                        == Some(Piece {
                            color,
                            kind: PieceType::King,
                        })
                })
                .count();
            assert_eq!(king_count, 1);
        }
    }
}
