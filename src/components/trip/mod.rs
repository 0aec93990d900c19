//! Trips, their days and their events.
//!
//! [`TripActions`] talks to the server and emits [`TripSignal`]s,
//! [`reduce`] folds them into the [`TripState`].

mod actions;
mod reducer;
pub mod signal;
mod state;

pub use actions::TripActions;
pub use reducer::reduce;
pub use signal::{Phase, TripSignal};
pub use state::TripState;
