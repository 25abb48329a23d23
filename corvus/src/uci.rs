//! Reads UCI commands from stdin and drives the search facade on a
//! dedicated worker thread, so a `stop` (or any other input) can
//! interrupt a search in flight per the facade's concurrency contract:
//! the only cross-thread state is the stop flag, everything else about
//! the search stays single-threaded.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;

use chess::board::Board;
use colored::Colorize;

use engine::facade::{Config, Engine, DEFAULT_HASH_MB, MAX_HASH_MB, MIN_HASH_MB};
use engine::position::Position;
use uci::client::UciClientMessage;
use uci::engine::{IdType, UciEngineMessage};
use uci::options::{OptionType, UciOption};
use uci::search_info::SearchInfo;
use uci::time_control::TimeControl;

const NAME: &str = "corvus";
const VERSION: &str = env!("CARGO_PKG_VERSION");
const AUTHOR: &str = "corvus contributors";

const UCI_OPTIONS: [UciOption; 2] = [
    UciOption {
        name: "Hash",
        option_type: OptionType::Spin {
            min: MIN_HASH_MB as i32,
            max: MAX_HASH_MB as i32,
            default: DEFAULT_HASH_MB as i32,
        },
    },
    UciOption {
        name: "Threads",
        option_type: OptionType::Spin { min: 1, max: 1, default: 1 },
    },
];

/// Work handed off to the search thread. Everything else (identification,
/// `isready`, position setup) is answered synchronously on the reader
/// thread, since none of it touches the engine's mutable state.
enum WorkerCommand {
    Search(Position, TimeControl),
    NewGame,
    ResizeHash(usize),
}

pub struct UciListener {
    position: Position,
    worker: Sender<WorkerCommand>,
    stop: engine::facade::StopHandle,
}

impl UciListener {
    pub fn new() -> Self {
        let mut engine = Engine::new(Config::default());
        let stop = engine.stop_handle();
        let (tx, rx) = mpsc::channel::<WorkerCommand>();

        thread::spawn(move || {
            for command in rx {
                match command {
                    WorkerCommand::Search(position, tc) => {
                        let side = position.side_to_move();

                        let report = engine.find_best_move(&position, tc, side, &mut |report| {
                            println!("{}", UciEngineMessage::Info(SearchInfo::from(report)));
                            let _ = io::stdout().flush();
                        });

                        match report.pv.first() {
                            Some(&mv) => println!("{}", UciEngineMessage::BestMove(mv)),
                            None => println!("bestmove 0000"),
                        }

                        let _ = io::stdout().flush();
                    }

                    WorkerCommand::NewGame => engine.new_game(),
                    WorkerCommand::ResizeHash(mb) => engine.resize_tt(mb),
                }
            }
        });

        Self { position: Position::new(Board::default()), worker: tx, stop }
    }

    pub fn run(mut self) -> anyhow::Result<()> {
        eprintln!("{} {}", NAME.bright_blue(), VERSION.bright_blue());

        let stdin = io::stdin().lock();

        for line in stdin.lines() {
            let line = line?;

            match line.trim().parse::<UciClientMessage>() {
                Ok(UciClientMessage::Quit) => break,
                Ok(command) => self.handle(command),
                Err(err) => eprintln!("{}: {line} ({err})", "error".red()),
            }

            io::stdout().flush()?;
        }

        Ok(())
    }

    fn handle(&mut self, command: UciClientMessage) {
        match command {
            UciClientMessage::Uci => {
                println!("{}", UciEngineMessage::Id(IdType::Name(format!("{NAME} {VERSION}"))));
                println!("{}", UciEngineMessage::Id(IdType::Author(AUTHOR.to_string())));

                for option in UCI_OPTIONS {
                    println!("{}", UciEngineMessage::UciOption(option));
                }

                println!("{}", UciEngineMessage::UciOk);
            }

            UciClientMessage::IsReady => println!("{}", UciEngineMessage::ReadyOk),

            UciClientMessage::Debug(_) => {}

            UciClientMessage::UciNewGame => {
                self.position = Position::new(Board::default());
                let _ = self.worker.send(WorkerCommand::NewGame);
            }

            UciClientMessage::Position(board, moves) => {
                let mut position = Position::new(board);

                for bare in moves {
                    match position.board.find_move(bare) {
                        Some(mv) => position = position.play_move(mv),
                        None => {
                            eprintln!("{}: illegal move {bare} in position command", "error".red());
                            break;
                        }
                    }
                }

                self.position = position;
            }

            UciClientMessage::Go(tc) => {
                let _ = self.worker.send(WorkerCommand::Search(self.position.clone(), tc));
            }

            UciClientMessage::Stop => self.stop.stop(),

            UciClientMessage::SetOption(name, value) => match name.as_str() {
                "Hash" => {
                    if let Ok(mb) = value.parse() {
                        let _ = self.worker.send(WorkerCommand::ResizeHash(mb));
                    }
                }
                "Threads" => {}
                _ => eprintln!("{}: unknown option {name}", "error".red()),
            },

            UciClientMessage::Quit => {}
        }
    }
}

impl Default for UciListener {
    fn default() -> Self {
        Self::new()
    }
}
