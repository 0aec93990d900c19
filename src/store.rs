use flume::Receiver;
use serde::Serialize;

use crate::components::alert::{self, AlertSignal, AlertState};
use crate::components::dashboard::{self, DashboardSignal, DashboardState};
use crate::components::trip::{self, TripSignal, TripState};
use crate::environment::timezones::TimezoneTable;
use crate::publisher::{Listeners, RefPublisher};

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct AppState {
    pub trip: TripState,
    pub dashboard: DashboardState,
    pub alert: AlertState,
}

#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Signal {
    Trip(TripSignal),
    Dashboard(DashboardSignal),
    Alert(AlertSignal),
}

impl From<TripSignal> for Signal {
    fn from(value: TripSignal) -> Self {
        Signal::Trip(value)
    }
}

impl From<DashboardSignal> for Signal {
    fn from(value: DashboardSignal) -> Self {
        Signal::Dashboard(value)
    }
}

impl From<AlertSignal> for Signal {
    fn from(value: AlertSignal) -> Self {
        Signal::Alert(value)
    }
}

/// Every concern sees every signal and ignores the ones it doesn't own
pub fn reduce(state: &AppState, signal: &Signal, timezones: &TimezoneTable) -> AppState {
    AppState {
        trip: trip::reduce(&state.trip, signal, timezones),
        dashboard: dashboard::reduce(&state.dashboard, signal),
        alert: alert::reduce(&state.alert, signal),
    }
}

/// Where the trip actions send their signals to and read their inputs from
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, signal: Signal);
    fn state(&self) -> AppState;
}

/// The one state container. Cloning it gives another handle to the same state.
#[derive(Clone)]
pub struct Store {
    state: RefPublisher<AppState>,
    signals: Listeners<Signal>,
    timezones: TimezoneTable,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state())
            .finish()
    }
}

impl Store {
    pub fn new(timezones: TimezoneTable) -> Self {
        Self::with_state(AppState::default(), timezones)
    }

    pub fn with_state(state: AppState, timezones: TimezoneTable) -> Self {
        Self {
            state: RefPublisher::new(state),
            signals: Listeners::default(),
            timezones,
        }
    }

    /// Every applied signal, in the order it was applied
    pub fn subscribe(&self) -> Receiver<Signal> {
        self.signals.add()
    }

    /// Every new state, in order
    pub fn watch(&self) -> Receiver<AppState> {
        self.state.subscribe()
    }
}

impl Dispatch for Store {
    fn dispatch(&self, signal: Signal) {
        log::trace!("{signal:?}");
        if let Signal::Trip(trip) = &signal {
            if let Some(message) = trip.failure_message() {
                log::error!("Trip operation failed: {message}");
            }
        }
        self.state.with_mutation(|state| {
            *state = reduce(state, &signal, &self.timezones);
            self.signals.publish(&signal);
        });
    }

    fn state(&self) -> AppState {
        self.state.with(AppState::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::types::{Alert, TripDayId};

    #[test]
    fn dispatch_reaches_every_concern() {
        let store = Store::new(TimezoneTable::default());
        let signals = store.subscribe();
        let states = store.watch();

        store.dispatch(TripSignal::FetchingTripList.into());
        store.dispatch(DashboardSignal::UpdateSelectedTripDayId(TripDayId(3)).into());
        store.dispatch(AlertSignal::CreateAlert(Alert::error("boom")).into());

        let state = store.state();
        assert!(state.trip.is_loading);
        assert_eq!(state.dashboard.selected_trip_day_id, TripDayId(3));
        assert_eq!(state.alert.alert, Some(Alert::error("boom")));

        assert_eq!(signals.try_iter().count(), 3);
        let last = states.try_iter().last().unwrap();
        assert_eq!(last, state);
    }

    #[test]
    fn clones_share_the_state() {
        let store = Store::new(TimezoneTable::default());
        let handle = store.clone();
        handle.dispatch(TripSignal::CreatingTrip.into());
        assert!(store.state().trip.is_loading);
    }

    #[test]
    fn snapshots_are_not_affected_by_later_signals() {
        let store = Store::new(TimezoneTable::default());
        let before = store.state();
        store.dispatch(TripSignal::FetchingTripDetail.into());
        assert!(!before.trip.is_loading);
    }
}
