//! Vote merging and counting

pub mod merge;
pub mod tally;

pub use merge::merge;
pub use tally::{best_slot, tally, SlotTally};
