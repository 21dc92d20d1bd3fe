//! Command-line interface for duel.

use clap::{Parser, Subcommand};
use duel_tictactoe::{Board, Player, Position};
use std::path::PathBuf;

/// Duel - multiplayer tic-tac-toe server with a tunable AI opponent
#[derive(Parser, Debug)]
#[command(name = "duel")]
#[command(about = "Multiplayer tic-tac-toe server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP and WebSocket server
    Serve {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to, overriding the config file
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to, overriding the config file
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask the engine for a move, e.g. `duel move "XX.|OO.|..."`
    Move {
        /// Board in compact notation, rows separated by `|`
        board: Board,

        /// Engine strength, 0-100
        #[arg(short, long, default_value = "60")]
        difficulty: u8,

        /// Mark the engine plays
        #[arg(long, default_value = "O", value_parser = parse_player)]
        ai: Player,

        /// RNG seed for reproducible choices
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Grade a move against perfect play
    Analyze {
        /// Board before the move, in compact notation
        board: Board,

        /// Cell played: 0-8 or a name such as `center` or `north-east`
        #[arg(value_parser = parse_cell)]
        position: usize,

        /// Mark that played it
        #[arg(long, default_value = "X", value_parser = parse_player)]
        player: Player,
    },
}

fn parse_player(s: &str) -> Result<Player, String> {
    match s.trim() {
        "X" | "x" => Ok(Player::X),
        "O" | "o" => Ok(Player::O),
        other => Err(format!("expected X or O, got '{}'", other)),
    }
}

fn parse_cell(s: &str) -> Result<usize, String> {
    Position::parse(s)
        .map(Position::index)
        .ok_or_else(|| format!("expected a cell 0-8 or a name like 'center', got '{}'", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_command() {
        let cli =
            Cli::try_parse_from(["duel", "move", "XX.|OO.|...", "--difficulty", "100"]).unwrap();
        match cli.command {
            Command::Move { board, difficulty, ai, seed } => {
                assert_eq!(board, "XX.|OO.|...".parse::<Board>().unwrap());
                assert_eq!(difficulty, 100);
                assert_eq!(ai, Player::O);
                assert_eq!(seed, None);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_analyze_accepts_cell_names() {
        let cli = Cli::try_parse_from(["duel", "analyze", "XX.|OO.|...", "north-east"]).unwrap();
        match cli.command {
            Command::Analyze { position, player, .. } => {
                assert_eq!(position, 2);
                assert_eq!(player, Player::X);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_player() {
        let args = ["duel", "analyze", ".........", "4", "--player", "Z"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
