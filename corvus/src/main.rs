use chess::board::Board;
use clap::{Parser, Subcommand};

mod uci;

#[derive(Parser)]
#[command(name = "corvus", about = "A UCI chess engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Count leaf nodes reachable from a position, for move generator
    /// correctness testing.
    Perft {
        /// FEN of the position to search from.
        #[arg(short, long, default_value = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")]
        fen: String,

        /// Maximum depth, in plies.
        #[arg(short, long, default_value_t = 5)]
        depth: usize,

        /// Break the depth-1 node count down by the first move played.
        #[arg(long)]
        divide: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Perft { fen, depth, divide }) => run_perft(&fen, depth, divide),
        None => uci::UciListener::new().run(),
    }
}

fn run_perft(fen: &str, depth: usize, divide: bool) -> anyhow::Result<()> {
    let board: Board = fen.parse()?;

    if divide {
        let results = board.perft_divide(depth.max(1));
        let total: u64 = results.iter().map(|(_, nodes)| nodes).sum();

        for (mv, nodes) in results {
            println!("{mv}: {nodes}");
        }

        println!("\n{total}");
    } else {
        for d in 0..=depth {
            println!("depth {d}: {}", board.perft(d));
        }
    }

    Ok(())
}
