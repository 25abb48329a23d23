//! Move-ordering tables that don't come from the transposition table:
//! killer moves, the quiet-move history table and the triangular PV table.

pub mod history;
pub mod killers;
pub mod pv;

pub use history::HistoryTable;
pub use killers::Killers;
pub use pv::PVTable;
