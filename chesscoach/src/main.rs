//! chesscoach: a line-oriented terminal front end for the coaching board.
//!
//! Reads commands from stdin, drives one [`BoardController`] and prints the
//! board to stdout. Logs go to stderr (`RUST_LOG` controls the filter) so they
//! never interleave with the board display.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use board::{
    square_center, BoardConfig, BoardController, BoardEvent, BoundingBox, InputOutcome,
    MoveOutcome, Point,
};
use chess::{format_square, PieceColor};
use clap::Parser;

mod command;
mod render;

use command::{parse_command, Command, HELP};

/// Virtual screen used to turn `drag` commands into pointer events.
const SCREEN: BoundingBox = BoundingBox {
    left: 0.0,
    top: 0.0,
    width: 800.0,
    height: 800.0,
};

#[derive(Parser)]
#[command(name = "chesscoach", about = "Interactive chessboard with move history and replay")]
struct Cli {
    /// Starting position as FEN (overrides CHESSCOACH_START_FEN)
    #[arg(long)]
    fen: Option<String>,

    /// Your colour: white or black (overrides CHESSCOACH_PLAYER_COLOR)
    #[arg(long, value_parser = parse_color)]
    color: Option<PieceColor>,

    /// Only allow viewing and navigation
    #[arg(long)]
    view_only: bool,

    /// Plies played by `random` (overrides CHESSCOACH_RANDOM_PLIES)
    #[arg(long)]
    random_plies: Option<usize>,

    /// Load this PGN file before starting
    #[arg(long)]
    pgn: Option<std::path::PathBuf>,
}

fn parse_color(s: &str) -> Result<PieceColor, String> {
    PieceColor::parse(s).ok_or_else(|| format!("expected white or black, got {:?}", s))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = BoardConfig::from_env().context("reading CHESSCOACH_* environment")?;
    if let Some(fen) = cli.fen {
        config = config.with_start_fen(fen);
    }
    if let Some(color) = cli.color {
        config = config.with_player_color(color);
    }
    if let Some(plies) = cli.random_plies {
        config.random_plies = plies;
    }
    config = config.with_allow_moves(!cli.view_only);

    let mut board = BoardController::new(config);
    if let Some(path) = cli.pgn {
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        board
            .load_pgn(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
    }

    tracing::info!("Game {} started", board.game_id());
    run(&mut board, io::stdin().lock(), io::stdout().lock())
}

fn run(board: &mut BoardController, input: impl BufRead, mut out: impl Write) -> anyhow::Result<()> {
    let mut events = board.subscribe();
    writeln!(out, "{}", render::render_board(board))?;

    for line in input.lines() {
        let line = line?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        let redraw = execute(board, command, &mut out)?;

        while let Ok(event) = events.try_recv() {
            if let Some(text) = describe_event(&event) {
                writeln!(out, "{}", text)?;
            }
        }
        if redraw {
            writeln!(out, "{}", render::render_board(board))?;
        }
    }
    Ok(())
}

/// Run one command. Returns whether the board should be redrawn.
fn execute(board: &mut BoardController, command: Command, out: &mut impl Write) -> anyhow::Result<bool> {
    match command {
        Command::Click(square) => {
            let outcome = board.click(square);
            report_input(&outcome, out)?;
        }
        Command::Move {
            from,
            to,
            promotion,
        } => {
            let outcome = board.execute_move(from, to, promotion);
            report_move(&outcome, out)?;
        }
        Command::Drag { from, to } => {
            let down = square_center(from, &SCREEN, board.orientation());
            let up = match to {
                Some(to) => square_center(to, &SCREEN, board.orientation()),
                None => Point::new(-1.0, -1.0),
            };
            let started = board.pointer_down(down, &SCREEN);
            if started == InputOutcome::Ignored {
                writeln!(out, "nothing to drag on {}", format_square(from))?;
                return Ok(false);
            }
            board.pointer_move(up);
            let outcome = board.pointer_up(up, &SCREEN);
            report_input(&outcome, out)?;
        }
        Command::Promote(piece) => match board.choose_promotion(piece) {
            Some(outcome) => report_move(&outcome, out)?,
            None => writeln!(out, "no promotion pending")?,
        },
        Command::Cancel => {
            if !board.cancel_promotion() {
                writeln!(out, "no promotion pending")?;
            }
        }
        Command::Key(key) => {
            board.handle_key(key);
        }
        Command::Jump(index) => {
            let before = board.cursor();
            board.jump_to_position(index);
            if board.cursor() == before && index != before {
                writeln!(out, "no ply {} (game has {})", index, board.len())?;
            }
        }
        Command::Flip => {
            board.flip_orientation();
        }
        Command::Reset => board.reset(),
        Command::Random(plies) => {
            let mut rng = rand::rng();
            let played = match plies {
                Some(n) => board.play_random_game(&mut rng, n),
                None => board.play_random_default(&mut rng),
            };
            writeln!(out, "played {} random plies", played)?;
        }
        Command::Pgn => {
            writeln!(out, "{}", board.pgn())?;
            return Ok(false);
        }
        Command::Load(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path));
            match text.map(|t| board.load_pgn(&t)) {
                Ok(Ok(plies)) => writeln!(out, "loaded {} plies", plies)?,
                Ok(Err(e)) => writeln!(out, "invalid PGN: {}", e)?,
                Err(e) => writeln!(out, "{:#}", e)?,
            }
        }
        Command::Fen => {
            writeln!(out, "{}", board.viewing_position().to_fen())?;
            return Ok(false);
        }
        Command::History => {
            writeln!(
                out,
                "{}",
                render::render_history(&board.history_rows(), board.cursor())
            )?;
            return Ok(false);
        }
        Command::Analysis(user) => {
            match board.analysis_request(user.as_deref()) {
                Some(request) => writeln!(out, "{}", serde_json::to_string_pretty(&request)?)?,
                None => writeln!(out, "make your first move to begin analysis")?,
            }
            return Ok(false);
        }
        Command::Show => {}
        Command::Help => {
            writeln!(out, "{}", HELP)?;
            return Ok(false);
        }
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn report_input(outcome: &InputOutcome, out: &mut impl Write) -> io::Result<()> {
    match outcome {
        InputOutcome::Selected { square, targets } => {
            let targets: Vec<String> = targets.iter().map(|s| format_square(*s)).collect();
            writeln!(out, "selected {}: {}", format_square(*square), targets.join(" "))
        }
        InputOutcome::Move(outcome) => report_move(outcome, out),
        InputOutcome::DragAbandoned => writeln!(out, "dropped off the board"),
        InputOutcome::Ignored => writeln!(out, "ignored"),
        _ => Ok(()),
    }
}

fn report_move(outcome: &MoveOutcome, out: &mut impl Write) -> io::Result<()> {
    match outcome {
        // Committed moves are reported through the event stream.
        MoveOutcome::Committed(_) | MoveOutcome::Suspended(_) => Ok(()),
        MoveOutcome::Rejected(reason) => writeln!(out, "rejected: {}", reason),
    }
}

fn describe_event(event: &BoardEvent) -> Option<String> {
    match event {
        BoardEvent::MoveCommitted(ply) => {
            let dots = match ply.side {
                PieceColor::White => ".",
                PieceColor::Black => "...",
            };
            Some(format!("{}{} {}", ply.move_number, dots, ply.san))
        }
        BoardEvent::PromotionRequested(req) => Some(format!(
            "promote {}{} to q/r/b/n (or cancel)",
            format_square(req.from),
            format_square(req.to)
        )),
        BoardEvent::PromotionCancelled => Some("promotion cancelled".to_string()),
        BoardEvent::Reset => Some("new game".to_string()),
        BoardEvent::PositionViewed { .. } | BoardEvent::OrientationFlipped(_) => None,
    }
}
