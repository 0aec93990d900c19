use serde::Serialize;

use crate::environment::types::{MenuSelection, TripDayId};
use crate::store::Signal;

/// The part of the dashboard the trip actions read from
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct DashboardState {
    pub current_menu: MenuSelection,
    /// `TripDayId::NONE` until a trip detail was loaded
    pub selected_trip_day_id: TripDayId,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DashboardSignal {
    UpdateCurrentMenu(MenuSelection),
    UpdateSelectedTripDayId(TripDayId),
}

pub fn reduce(state: &DashboardState, signal: &Signal) -> DashboardState {
    let Signal::Dashboard(signal) = signal else {
        return state.clone();
    };
    match signal {
        DashboardSignal::UpdateCurrentMenu(menu) => DashboardState {
            current_menu: *menu,
            ..state.clone()
        },
        DashboardSignal::UpdateSelectedTripDayId(id) => DashboardState {
            selected_trip_day_id: *id,
            ..state.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::trip::TripSignal;

    #[test]
    fn selection_and_menu() {
        let state = DashboardState::default();
        assert!(state.selected_trip_day_id.is_none());

        let state = reduce(
            &state,
            &Signal::Dashboard(DashboardSignal::UpdateSelectedTripDayId(TripDayId(4))),
        );
        let state = reduce(
            &state,
            &Signal::Dashboard(DashboardSignal::UpdateCurrentMenu(MenuSelection::Past)),
        );
        assert_eq!(state.selected_trip_day_id, TripDayId(4));
        assert_eq!(state.current_menu, MenuSelection::Past);
    }

    #[test]
    fn other_signals_pass_through() {
        let state = DashboardState {
            current_menu: MenuSelection::Upcoming,
            selected_trip_day_id: TripDayId(2),
        };
        let next = reduce(&state, &Signal::Trip(TripSignal::FetchingTripList));
        assert_eq!(next, state);
    }
}
