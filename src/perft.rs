use crate::board::GameState;

/// Count leaf nodes of the legal move tree to the given depth. The
/// standard correctness harness for a move generator: one wrong edge case
/// anywhere and the counts drift from the published tables.
pub fn perft(state: &GameState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let mut state = state.clone();
    let moves = state.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    let mut nodes = 0;
    for m in &moves {
        let mut next = state.clone();
        next.make_move(m)
            .expect("legal move must apply to the state it came from");
        nodes += perft(&next, depth - 1);
    }
    nodes
}

/// Reference counts from https://www.chessprogramming.org/Perft_Results.
/// Only depths where neither auto-queen promotion nor castling attack
/// probes on empty squares can show up are usable here; deeper rows of the
/// published table assume underpromotions this engine does not generate.
fn expected_start_nodes(depth: u8) -> u64 {
    match depth {
        0 => 1,
        1 => 20,
        2 => 400,
        3 => 8_902,
        4 => 197_281,
        _ => panic!("No usable expected node count for depth {}", depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX_DEPTH: u8 = 3;

    #[test]
    fn perft_start() {
        let state = GameState::new();
        for depth in 0..=MAX_DEPTH {
            println!("Depth {}", depth);
            assert_eq!(perft(&state, depth), expected_start_nodes(depth));
        }
    }

    // slow under the default profile; run with --ignored when touching
    // the generator
    #[test]
    #[ignore]
    fn perft_start_depth_4() {
        let state = GameState::new();
        assert_eq!(perft(&state, 4), expected_start_nodes(4));
    }

    /// "Kiwipete", the castling/pin/en-passant stress position from
    /// https://www.chessprogramming.org/Perft_Results.
    ///
    /// Depth | Nodes
    /// ----- | -----
    /// 1     | 48
    /// 2     | 2,039
    #[test]
    fn perft_kiwipete() {
        let state = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        );
        assert_eq!(perft(&state, 1), 48);
        assert_eq!(perft(&state, 2), 2_039);
    }
}
