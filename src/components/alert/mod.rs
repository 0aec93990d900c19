mod reducer;

pub use reducer::{reduce, AlertSignal, AlertState};
