use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use rand::RngCore;

use chess_rules::board::GameState;
use chess_rules::game::Game;
use chess_rules::perft::perft;

#[derive(Parser)]
#[command(about = "Chess rules engine demo: self-play, perft, legal move listing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a game of random legal moves against itself
    Play {
        /// Maximum number of plies to play
        #[arg(long, default_value_t = 80)]
        plies: u32,
        /// RNG seed; random when omitted
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Count legal move tree leaves from a position
    Perft {
        #[arg(long, default_value_t = 3)]
        depth: u8,
        /// Position to start from; standard start when omitted
        #[arg(long)]
        fen: Option<String>,
    },
    /// List the legal moves for the side to move in a position
    Legal {
        fen: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Play { plies, seed } => {
            let seed = seed.unwrap_or_else(|| rand::thread_rng().next_u64());
            println!("seed: {seed}");
            let mut game = Game::new(seed);
            game.play_random(plies);
            println!("{}", game.transcript());
        }
        Command::Perft { depth, fen } => {
            let state = match fen {
                Some(fen) => GameState::from_fen(&fen),
                None => GameState::new(),
            };
            for d in 0..=depth {
                println!("perft({d}) = {}", perft(&state, d));
            }
        }
        Command::Legal { fen } => {
            let mut state = GameState::from_fen(&fen);
            state.draw_to_terminal();
            let moves = state.legal_moves();
            for m in &moves {
                println!("{} ({})", m.to_notation(), m.to_human());
            }
            println!("{} legal moves", moves.len());
            if state.is_checkmate() {
                println!("checkmate");
            } else if state.is_stalemate() {
                println!("stalemate");
            }
        }
    }
    Ok(())
}
