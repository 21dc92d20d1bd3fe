//! Duel - unified CLI.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use duel_server::{ServerConfig, http};
use duel_tictactoe::{Board, Difficulty, Player, analyze_move, select_move};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,duel_server=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Move {
            board,
            difficulty,
            ai,
            seed,
        } => run_move(board, Difficulty::new(difficulty), ai, seed),
        Command::Analyze {
            board,
            position,
            player,
        } => run_analyze(board, position, player),
    }
}

/// Run the HTTP and WebSocket server
#[instrument(skip_all)]
async fn run_server(
    config: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = ServerConfig::load(config.as_deref())?;
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }

    info!(address = %config.bind_address(), "Starting duel server");
    http::serve(config).await?;
    Ok(())
}

/// Print the engine's move for a board
fn run_move(board: Board, difficulty: Difficulty, ai: Player, seed: Option<u64>) -> Result<()> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    match select_move(&board, difficulty, ai, ai.opponent(), &mut rng) {
        Some(cell) => {
            println!("{}", board.with_mark(cell, ai)?.display());
            println!("{} plays {}", ai, cell);
            Ok(())
        }
        None => anyhow::bail!("No valid moves available"),
    }
}

/// Print the grade of a move
fn run_analyze(board: Board, position: usize, player: Player) -> Result<()> {
    if !board.is_empty(position) {
        anyhow::bail!("Invalid move");
    }
    let analysis = analyze_move(&board, position, player, player.opponent());
    println!("{}", analysis.evaluation);
    match analysis.optimal_move {
        Some(best) if !analysis.is_optimal => println!("Best was {}", best),
        _ => {}
    }
    Ok(())
}
