use std::sync::Arc;

use im::Vector;

use crate::components::alert::AlertSignal;
use crate::components::dashboard::DashboardSignal;
use crate::environment::error::GatewayError;
use crate::environment::types::{
    Alert, Envelope, Event, MenuSelection, Trip, TripDay, TripDayId, TripFilter, TripId,
    FALLBACK_ERROR_MESSAGE,
};
use crate::environment::Environment;
use crate::helper::{normalize_trip_detail, normalize_trip_summary};
use crate::store::{Dispatch, Signal};

use super::TripSignal;

/// Sequences every trip operation: pending signal, one gateway call, then
/// success or failure signal, then whatever follow-up fetch the operation needs.
///
/// Failures are never returned without having been dispatched (and alerted)
/// first, callers may ignore the `Err` side.
#[derive(Clone)]
pub struct TripActions {
    environment: Environment,
    store: Arc<dyn Dispatch>,
}

impl std::fmt::Debug for TripActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripActions").finish()
    }
}

impl TripActions {
    pub fn new(environment: Environment, store: Arc<dyn Dispatch>) -> Self {
        Self { environment, store }
    }

    pub async fn get_trip_list(&self) -> Result<Vector<Trip>, String> {
        self.dispatch(AlertSignal::ClearAlert);
        self.dispatch(TripSignal::FetchingTripList);

        let menu = self.store.state().dashboard.current_menu;
        let filter = TripFilter::for_menu(menu, self.environment.today());
        log::debug!("Listing {menu} trips");

        match settle(self.environment.model.trip_list(&filter).await) {
            Ok(trips) => {
                let trips: Vector<Trip> = trips
                    .unwrap_or_default()
                    .into_iter()
                    .map(normalize_trip_summary)
                    .collect();
                self.dispatch(TripSignal::FetchingTripListSuccess(trips.clone()));
                Ok(trips)
            }
            Err(message) => Err(self.fail(TripSignal::FetchingTripListFailure, message)),
        }
    }

    pub async fn get_trip_detail(&self, trip_id: TripId) -> Result<Trip, String> {
        self.dispatch(AlertSignal::ClearAlert);
        self.dispatch(TripSignal::FetchingTripDetail);

        let trip = match settle(self.environment.model.trip_detail(trip_id).await) {
            Ok(Some(trip)) => normalize_trip_detail(trip),
            Ok(None) => {
                return Err(self.fail(
                    TripSignal::FetchingTripDetailFailure,
                    FALLBACK_ERROR_MESSAGE.to_string(),
                ))
            }
            Err(message) => return Err(self.fail(TripSignal::FetchingTripDetailFailure, message)),
        };

        // Server order, the store sorts the days only afterwards
        if self.store.state().dashboard.selected_trip_day_id.is_none() {
            if let Some(first) = trip.trip_day.front() {
                log::debug!("Selecting trip day {}", first.id);
                self.dispatch(DashboardSignal::UpdateSelectedTripDayId(first.id));
            }
        }
        self.dispatch(TripSignal::FetchingTripDetailSuccess(trip.clone()));
        Ok(trip)
    }

    pub async fn create_trip(&self, payload: Trip) -> Result<Trip, String> {
        self.dispatch(TripSignal::CreatingTrip);
        match settle(self.environment.model.create_trip(&payload).await) {
            Ok(created) => {
                let trip = created.unwrap_or(payload);
                self.dispatch(TripSignal::CreatingTripSuccess(trip.clone()));
                log::debug!("Trip created, reloading the list");
                if let Err(e) = self.get_trip_list().await {
                    log::debug!("Reload after creating the trip failed: {e}");
                }
                Ok(trip)
            }
            Err(message) => Err(self.fail(TripSignal::CreatingTripFailure, message)),
        }
    }

    pub async fn create_trip_day(&self, payload: TripDay) -> Result<TripDay, String> {
        self.dispatch(TripSignal::CreatingTripDay);
        match settle(self.environment.model.create_trip_day(&payload).await) {
            Ok(created) => {
                let trip_id = payload.trip_id;
                let day = created.unwrap_or(payload);
                self.dispatch(TripSignal::CreatingTripDaySuccess(day.clone()));
                log::debug!("Trip day created, reloading trip {trip_id}");
                if let Err(e) = self.get_trip_detail(trip_id).await {
                    log::debug!("Reload after creating the trip day failed: {e}");
                }
                Ok(day)
            }
            Err(message) => Err(self.fail(TripSignal::CreatingTripDayFailure, message)),
        }
    }

    /// Events always go to the trip that is currently loaded
    pub async fn create_trip_event(&self, payload: Event) -> Result<Event, String> {
        self.dispatch(TripSignal::CreatingTripEvent);
        let trip_id = self.current_trip_id();
        match settle(
            self.environment
                .model
                .create_trip_event(trip_id, &payload)
                .await,
        ) {
            Ok(created) => {
                let event = created.unwrap_or(payload);
                self.dispatch(TripSignal::CreatingTripEventSuccess(event.clone()));
                if let Err(e) = self.get_trip_detail(self.current_trip_id()).await {
                    log::debug!("Reload after creating the event failed: {e}");
                }
                Ok(event)
            }
            Err(message) => Err(self.fail(TripSignal::CreatingTripEventFailure, message)),
        }
    }

    pub async fn update_trip(&self, payload: Trip) -> Result<Trip, String> {
        self.dispatch(TripSignal::UpdatingTrip);
        match settle(self.environment.model.update_trip(&payload).await) {
            Ok(updated) => {
                let trip_id = payload.id;
                let trip = updated.unwrap_or(payload);
                self.dispatch(TripSignal::UpdatingTripSuccess(trip.clone()));
                if let Err(e) = self.get_trip_detail(trip_id).await {
                    log::debug!("Reload after updating the trip failed: {e}");
                }
                Ok(trip)
            }
            Err(message) => Err(self.fail(TripSignal::UpdatingTripFailure, message)),
        }
    }

    pub async fn update_trip_day(&self, payload: TripDay) -> Result<TripDay, String> {
        self.dispatch(TripSignal::UpdatingTripDay);
        match settle(self.environment.model.update_trip_day(&payload).await) {
            Ok(updated) => {
                let trip_id = payload.trip_id;
                let day = updated.unwrap_or(payload);
                self.dispatch(TripSignal::UpdatingTripDaySuccess(day.clone()));
                if let Err(e) = self.get_trip_detail(trip_id).await {
                    log::debug!("Reload after updating the trip day failed: {e}");
                }
                Ok(day)
            }
            Err(message) => Err(self.fail(TripSignal::UpdatingTripDayFailure, message)),
        }
    }

    /// Removed locally once the server confirms, nothing is reloaded
    pub async fn delete_trip_day(&self, id: TripDayId) -> Result<(), String> {
        self.dispatch(TripSignal::DeletingTripDay);
        match settle(self.environment.model.delete_trip_day(id).await) {
            Ok(_) => {
                self.dispatch(TripSignal::DeletingTripDaySuccess(id));
                Ok(())
            }
            Err(message) => Err(self.fail(TripSignal::DeletingTripDayFailure, message)),
        }
    }

    pub async fn delete_trip_event(&self, event: Event) -> Result<(), String> {
        self.dispatch(TripSignal::DeletingTripEvent);
        let trip_id = self.current_trip_id();
        match settle(
            self.environment
                .model
                .delete_trip_event(trip_id, event.id)
                .await,
        ) {
            Ok(_) => {
                self.dispatch(TripSignal::DeletingTripEventSuccess(event));
                Ok(())
            }
            Err(message) => Err(self.fail(TripSignal::DeletingTripEventFailure, message)),
        }
    }

    pub fn update_selected_trip_day_id(&self, id: TripDayId) {
        self.dispatch(DashboardSignal::UpdateSelectedTripDayId(id));
    }

    pub fn update_current_menu(&self, menu: MenuSelection) {
        self.dispatch(DashboardSignal::UpdateCurrentMenu(menu));
    }

    fn current_trip_id(&self) -> TripId {
        self.store.state().trip.trip_detail.id
    }

    fn dispatch(&self, signal: impl Into<Signal>) {
        self.store.dispatch(signal.into());
    }

    /// Dispatch the failure signal, raise the alert, hand the message back
    fn fail(&self, signal: fn(String) -> TripSignal, message: String) -> String {
        self.dispatch(signal(message.clone()));
        self.dispatch(AlertSignal::CreateAlert(Alert::error(message.clone())));
        message
    }
}

/// Rejections, failed envelopes and empty envelopes all end up as one message
fn settle<T>(response: Result<Envelope<T>, GatewayError>) -> Result<Option<T>, String> {
    response
        .map_err(|e| e.message())
        .and_then(Envelope::into_outcome)
}
