#![recursion_limit = "256"]

mod app;
pub mod components;
pub mod environment;
pub mod helper;
pub mod publisher;
pub mod store;

pub use app::run;
pub use components::trip::{TripActions, TripSignal, TripState};
pub use environment::types::{
    Alert, AlertKind, Envelope, Event, EventId, MenuSelection, Trip, TripDay, TripDayId,
    TripFilter, TripId,
};
pub use environment::{Environment, GatewayError, Model, Repository};
pub use store::{AppState, Dispatch, Signal, Store};
