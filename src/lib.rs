pub mod board;
pub mod game;
pub mod movegen;
pub mod perft;
pub mod types;
