use im::Vector;
use serde::Serialize;

use crate::environment::types::Trip;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TripState {
    pub is_loading: bool,
    /// Summaries, their `trip_day` is empty
    pub trip_list: Vector<Trip>,
    /// The fully loaded trip. Starts out as the empty trip with id 0.
    pub trip_detail: Trip,
}
