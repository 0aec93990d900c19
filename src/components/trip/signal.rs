use im::Vector;

use crate::environment::types::{Event, Trip, TripDay, TripDayId};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    Pending,
    Success,
    Failure,
}

/// Lifecycle signals of the trip operations. Every operation dispatches its
/// pending signal first and exactly one of its success / failure signals after.
#[allow(clippy::large_enum_variant)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TripSignal {
    FetchingTripList,
    FetchingTripListFailure(String),
    FetchingTripListSuccess(Vector<Trip>),

    FetchingTripDetail,
    FetchingTripDetailFailure(String),
    FetchingTripDetailSuccess(Trip),

    CreatingTrip,
    CreatingTripFailure(String),
    CreatingTripSuccess(Trip),

    CreatingTripDay,
    CreatingTripDayFailure(String),
    CreatingTripDaySuccess(TripDay),

    CreatingTripEvent,
    CreatingTripEventFailure(String),
    /// Carries the event with its raw UTC times
    CreatingTripEventSuccess(Event),

    UpdatingTrip,
    UpdatingTripFailure(String),
    UpdatingTripSuccess(Trip),

    UpdatingTripDay,
    UpdatingTripDayFailure(String),
    UpdatingTripDaySuccess(TripDay),

    DeletingTripDay,
    DeletingTripDayFailure(String),
    DeletingTripDaySuccess(TripDayId),

    DeletingTripEvent,
    DeletingTripEventFailure(String),
    DeletingTripEventSuccess(Event),
}

impl TripSignal {
    pub fn phase(&self) -> Phase {
        use TripSignal::*;
        match self {
            FetchingTripList | FetchingTripDetail | CreatingTrip | CreatingTripDay
            | CreatingTripEvent | UpdatingTrip | UpdatingTripDay | DeletingTripDay
            | DeletingTripEvent => Phase::Pending,
            FetchingTripListFailure(_)
            | FetchingTripDetailFailure(_)
            | CreatingTripFailure(_)
            | CreatingTripDayFailure(_)
            | CreatingTripEventFailure(_)
            | UpdatingTripFailure(_)
            | UpdatingTripDayFailure(_)
            | DeletingTripDayFailure(_)
            | DeletingTripEventFailure(_) => Phase::Failure,
            FetchingTripListSuccess(_)
            | FetchingTripDetailSuccess(_)
            | CreatingTripSuccess(_)
            | CreatingTripDaySuccess(_)
            | CreatingTripEventSuccess(_)
            | UpdatingTripSuccess(_)
            | UpdatingTripDaySuccess(_)
            | DeletingTripDaySuccess(_)
            | DeletingTripEventSuccess(_) => Phase::Success,
        }
    }

    pub fn failure_message(&self) -> Option<&str> {
        use TripSignal::*;
        match self {
            FetchingTripListFailure(m)
            | FetchingTripDetailFailure(m)
            | CreatingTripFailure(m)
            | CreatingTripDayFailure(m)
            | CreatingTripEventFailure(m)
            | UpdatingTripFailure(m)
            | UpdatingTripDayFailure(m)
            | DeletingTripDayFailure(m)
            | DeletingTripEventFailure(m) => Some(m),
            _ => None,
        }
    }
}
