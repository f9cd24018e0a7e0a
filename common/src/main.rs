use std::thread;
use std::time::Duration;

use clap::Parser;
use minesweeper_ai::{Board, Dimensions, Game, GameState, RandomSelector, Step};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Autonomous Minesweeper bot: plays deduced safe cells first and guesses
/// only when nothing can be deduced.
#[derive(Debug, Parser)]
#[command(name = "bot", version)]
struct Args {
    /// Board height
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
    height: u16,

    /// Board width
    #[arg(long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
    width: u16,

    /// Number of mines
    #[arg(long, default_value_t = 8)]
    mines: usize,

    /// Seed for the board layout and the guesses
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between moves, in milliseconds
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let dimensions = Dimensions::new(args.height.into(), args.width.into());
    let board = Board::new(dimensions, args.mines, &mut rng)?;
    let mut selector = RandomSelector::new(rng);
    let mut game = Game::new(board);

    info!(
        height = args.height,
        width = args.width,
        mines = args.mines,
        "strategy: play logically safe cells, guess otherwise"
    );

    while game.state() == GameState::Playing {
        let (cell, outcome) = match game.step(&mut selector)? {
            Step::Safe(cell) => (cell, "played a known safe cell"),
            Step::Guess(cell) => (cell, "no safe cell known, guessed"),
            Step::Exploded(cell) => (cell, "guessed a mine"),
            Step::Stuck => {
                info!(moves = game.moves(), "no moves left");
                break;
            }
        };
        info!(moves = game.moves(), %cell, "{outcome}");
        if args.delay_ms > 0 {
            thread::sleep(Duration::from_millis(args.delay_ms));
        }
    }

    let agent = game.agent();
    info!(
        moves = agent.moves_made().len(),
        safes = agent.safes().len(),
        mines = agent.mines().len(),
        sentences = agent.knowledge().len(),
        "final knowledge"
    );

    match game.state() {
        GameState::Won => info!("result: the bot won"),
        GameState::Lost => info!("result: the bot hit a mine and lost"),
        GameState::Playing => info!("result: the game ended unexpectedly"),
    }

    Ok(())
}
