use board::{
    square_center, BoardConfig, BoardController, BoundingBox, InputOutcome, MoveOutcome,
    Orientation, PromotionRequest, RejectReason,
};
use chess::{parse_square, LegalMove, PieceColor, PieceKind, Square, STARTING_FEN};
use proptest::prelude::*;

fn sq(s: &str) -> Square {
    parse_square(s).unwrap()
}

fn screen() -> BoundingBox {
    BoundingBox::new(20.0, 40.0, 640.0, 640.0)
}

/// Pick a legal move on the live position by index, wrapping around.
fn pick(board: &BoardController, choice: usize) -> Option<LegalMove> {
    let moves = board.live_position().all_legal_moves();
    if moves.is_empty() {
        None
    } else {
        Some(moves[choice % moves.len()])
    }
}

fn play_choices(board: &mut BoardController, choices: &[usize]) {
    for &choice in choices {
        let Some(m) = pick(board, choice) else { break };
        assert!(board.execute_move(m.from, m.to, m.promotion).is_committed());
    }
}

fn finish_promotion(board: &mut BoardController, outcome: InputOutcome, piece: Option<PieceKind>) {
    if let InputOutcome::Move(MoveOutcome::Suspended(_)) = outcome {
        let outcome = board.choose_promotion(piece.unwrap_or(PieceKind::Queen));
        assert!(matches!(outcome, Some(MoveOutcome::Committed(_))));
    } else {
        assert!(
            matches!(outcome, InputOutcome::Move(MoveOutcome::Committed(_))),
            "{outcome:?}"
        );
    }
}

/// Concrete walkthroughs.
mod scenario_tests {
    use super::*;

    #[test]
    fn first_move_then_move_from_history_is_refused() {
        let mut board = BoardController::default();

        let MoveOutcome::Committed(ply) = board.execute_move(sq("e2"), sq("e4"), None) else {
            panic!("e2e4 should commit");
        };
        assert_eq!(board.len(), 1);
        assert_eq!(ply.side, PieceColor::White);
        assert_eq!(ply.move_number, 1);
        assert_eq!(board.cursor(), 0);

        board.jump_to_position(-1);
        assert_eq!(board.cursor(), -1);
        assert_eq!(
            board.execute_move(sq("e7"), sq("e5"), None),
            MoveOutcome::Rejected(RejectReason::NotLiveView)
        );
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn pawn_reaching_last_rank_waits_for_a_piece() {
        let mut board = BoardController::new(
            BoardConfig::default().with_start_fen("k7/4P3/8/8/8/8/8/4K3 w - - 0 1"),
        );

        assert_eq!(
            board.execute_move(sq("e7"), sq("e8"), None),
            MoveOutcome::Suspended(PromotionRequest {
                from: sq("e7"),
                to: sq("e8")
            })
        );
        assert_eq!(board.len(), 0);

        let MoveOutcome::Committed(ply) =
            board.execute_move(sq("e7"), sq("e8"), Some(PieceKind::Queen))
        else {
            panic!("retry with a queen should commit");
        };
        assert!(ply.san.trim_end_matches(['+', '#']).ends_with("=Q"));
        assert_eq!(board.len(), 1);
        assert_eq!(board.pending_promotion(), None);
    }

    #[test]
    fn reset_after_ten_plies() {
        let mut board = BoardController::default();
        let moves = [
            ("e2", "e4"),
            ("e7", "e5"),
            ("g1", "f3"),
            ("b8", "c6"),
            ("f1", "b5"),
            ("a7", "a6"),
            ("b5", "a4"),
            ("g8", "f6"),
            ("e1", "g1"),
            ("f8", "e7"),
        ];
        for (from, to) in moves {
            assert!(board.execute_move(sq(from), sq(to), None).is_committed());
        }
        assert_eq!(board.len(), 10);
        assert_eq!(board.ply(8).unwrap().san, "O-O");

        board.reset();
        assert_eq!(board.len(), 0);
        assert_eq!(board.cursor(), -1);
        assert_eq!(board.live_position().to_fen(), STARTING_FEN);
    }

    #[test]
    fn view_only_board_ignores_gestures() {
        let mut board = BoardController::new(BoardConfig::default().with_allow_moves(false));
        assert_eq!(board.click(sq("e2")), InputOutcome::Ignored);
        let from = square_center(sq("e2"), &screen(), board.orientation());
        assert_eq!(board.pointer_down(from, &screen()), InputOutcome::Ignored);
        assert!(board.is_empty());
    }

    #[test]
    fn analysis_request_carries_viewed_moves() {
        let mut board = BoardController::default();
        play_choices(&mut board, &[0, 0, 0, 0]);
        board.jump_to_position(1);

        let req = board.analysis_request(None).unwrap();
        assert_eq!(req.pgn, board.viewing_pgn());
        assert!(req.pgn.ends_with('*'));
        assert_eq!(req.user_id, None);
    }
}

mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn stored_positions_match_replay(choices in prop::collection::vec(any::<usize>(), 0..40)) {
            let mut board = BoardController::default();
            play_choices(&mut board, &choices);

            for index in -1..board.len() as isize {
                let replayed = board.replay_position(index).unwrap();
                board.jump_to_position(index);
                prop_assert_eq!(replayed.to_fen(), board.viewing_position().to_fen());
            }
        }

        #[test]
        fn moves_from_history_never_grow_the_game(
            choices in prop::collection::vec(any::<usize>(), 1..20),
            back in 1usize..20,
            from in 0usize..64,
            to in 0usize..64,
        ) {
            let mut board = BoardController::default();
            play_choices(&mut board, &choices);
            let len = board.len();
            let target = len as isize - 1 - (back % len.max(1)) as isize;
            prop_assume!(target >= -1 && target < len as isize - 1);

            board.jump_to_position(target);
            let outcome = board.execute_move(Square::index(from), Square::index(to), Some(PieceKind::Queen));
            prop_assert_eq!(outcome, MoveOutcome::Rejected(RejectReason::NotLiveView));
            prop_assert_eq!(board.len(), len);
            prop_assert_eq!(board.cursor(), target);
        }

        #[test]
        fn out_of_range_jumps_change_nothing(
            choices in prop::collection::vec(any::<usize>(), 0..15),
            view in any::<usize>(),
            jump in -100isize..100,
        ) {
            let mut board = BoardController::default();
            play_choices(&mut board, &choices);
            board.jump_to_position((view % (board.len() + 1)) as isize - 1);

            let len = board.len();
            let cursor = board.cursor();
            prop_assume!(jump < -1 || jump >= len as isize);

            board.jump_to_position(jump);
            prop_assert_eq!(board.cursor(), cursor);
            prop_assert_eq!(board.len(), len);
        }

        #[test]
        fn orientation_does_not_change_legality(
            choices in prop::collection::vec(any::<usize>(), 0..20),
            from in 0usize..64,
            to in 0usize..64,
        ) {
            let mut white = BoardController::default();
            let mut black = BoardController::new(BoardConfig::default().with_player_color(PieceColor::Black));
            play_choices(&mut white, &choices);
            play_choices(&mut black, &choices);
            prop_assert_eq!(black.orientation(), Orientation::Black);

            let (from, to) = (Square::index(from), Square::index(to));
            prop_assert_eq!(
                white.current_selectable_moves(from),
                black.current_selectable_moves(from)
            );
            let a = white.execute_move(from, to, None);
            let b = black.execute_move(from, to, None);
            prop_assert_eq!(a, b);
            prop_assert_eq!(white.pgn(), black.pgn());
        }

        #[test]
        fn clicks_and_drags_build_the_same_game(
            choices in prop::collection::vec(any::<usize>(), 0..25),
            flipped in any::<bool>(),
        ) {
            let mut clicked = BoardController::default();
            let mut dragged = BoardController::default();
            if flipped {
                dragged.flip_orientation();
            }

            for choice in choices {
                let Some(m) = pick(&clicked, choice) else { break };

                clicked.click(m.from);
                let outcome = clicked.click(m.to);
                finish_promotion(&mut clicked, outcome, m.promotion);

                let down = square_center(m.from, &screen(), dragged.orientation());
                let up = square_center(m.to, &screen(), dragged.orientation());
                dragged.pointer_down(down, &screen());
                let outcome = dragged.pointer_up(up, &screen());
                finish_promotion(&mut dragged, outcome, m.promotion);
            }

            prop_assert_eq!(clicked.plies(), dragged.plies());
        }
    }
}
