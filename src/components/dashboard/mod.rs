mod reducer;

pub use reducer::{reduce, DashboardSignal, DashboardState};
