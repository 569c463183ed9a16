//! Black-box perft tests: bit-exact leaf counts at fixed depths from fixed
//! positions, the strongest correctness check on the move generator.
//!
//! The full reference table includes depth-6/7 rows that take minutes even
//! in release builds under a debug-assertion build; those are gated behind
//! the `slow-perft` feature so routine `cargo test` stays fast. The two
//! sparse-piece positions (discovered-check and pinned-pawn en passant)
//! are cheap enough at their full reference depth to run unconditionally.

use accipiter::position::Position;

fn perft(fen: &str, depth: u32) -> u64 {
    let mut pos = Position::new(fen).unwrap();
    pos.perft(depth)
}

#[test]
fn startpos_depth_4() {
    assert_eq!(
        perft("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 4),
        197_281
    );
}

#[test]
fn kiwipete_depth_4() {
    assert_eq!(
        perft(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            4
        ),
        4_085_603
    );
}

#[test]
fn rook_endgame_depth_5() {
    assert_eq!(
        perft("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 5),
        674_624
    );
}

#[test]
fn promotion_heavy_depth_4() {
    assert_eq!(
        perft(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            4
        ),
        422_333
    );
}

#[test]
fn black_king_vs_rook_pawn_depth_6() {
    assert_eq!(perft("3k4/3p4/8/K1P4r/8/8/8/8 b - - 0 1", 6), 1_134_888);
}

#[test]
fn en_passant_discovered_check_depth_6() {
    assert_eq!(
        perft("8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1", 6),
        1_440_467
    );
}

#[cfg(feature = "slow-perft")]
mod slow {
    use super::perft;

    #[test]
    fn startpos_depth_6() {
        assert_eq!(
            perft("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 6),
            119_060_324
        );
    }

    #[test]
    fn kiwipete_depth_5() {
        assert_eq!(
            perft(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                5
            ),
            193_690_690
        );
    }

    #[test]
    fn rook_endgame_depth_7() {
        assert_eq!(
            perft("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 7),
            178_633_661
        );
    }

    #[test]
    fn promotion_heavy_depth_6() {
        assert_eq!(
            perft(
                "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
                6
            ),
            706_045_033
        );
    }
}
