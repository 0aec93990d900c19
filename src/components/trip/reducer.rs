use im::Vector;
use itertools::Itertools;

use crate::environment::timezones::TimezoneTable;
use crate::environment::types::{Event, Trip, TripDay};
use crate::helper::parse_to_local_time;
use crate::store::Signal;

use super::signal::{Phase, TripSignal};
use super::state::TripState;

/// Pure transition. `state` is never touched, the result shares whatever
/// it didn't change with it.
pub fn reduce(state: &TripState, signal: &Signal, timezones: &TimezoneTable) -> TripState {
    let Signal::Trip(signal) = signal else {
        return state.clone();
    };
    match signal.phase() {
        Phase::Pending => TripState {
            is_loading: true,
            ..state.clone()
        },
        Phase::Failure => TripState {
            is_loading: false,
            ..state.clone()
        },
        Phase::Success => TripState {
            is_loading: false,
            ..apply_success(state, signal, timezones)
        },
    }
}

fn apply_success(state: &TripState, signal: &TripSignal, timezones: &TimezoneTable) -> TripState {
    let mut next = state.clone();
    match signal {
        TripSignal::FetchingTripListSuccess(trips) => {
            next.trip_list = trips.clone();
        }
        TripSignal::FetchingTripDetailSuccess(trip) => {
            next.trip_detail = sorted_trip(trip);
        }
        TripSignal::CreatingTripSuccess(trip) => {
            let mut trip_list = state.trip_list.clone();
            trip_list.push_back(Trip {
                trip_day: Vector::new(),
                ..trip.clone()
            });
            next.trip_list = sorted_by(trip_list, |t| t.start_date.clone());
        }
        TripSignal::CreatingTripDaySuccess(day) => {
            let mut days = state.trip_detail.trip_day.clone();
            days.push_back(TripDay {
                events: Vector::new(),
                ..day.clone()
            });
            next.trip_detail.trip_day = sorted_by(days, |d| d.trip_date.clone());
        }
        TripSignal::CreatingTripEventSuccess(event) => {
            let event = parse_to_local_time(event, state.trip_detail.timezone_id, timezones);
            next.trip_detail.trip_day = update_day(&state.trip_detail.trip_day, &event, |day| {
                let mut events = day.events.clone();
                events.push_back(event.clone());
                sorted_by(events, |e| e.start_time.clone())
            });
        }
        TripSignal::DeletingTripDaySuccess(id) => {
            let mut days = state.trip_detail.trip_day.clone();
            days.retain(|day| day.id != *id);
            next.trip_detail.trip_day = days;
        }
        TripSignal::DeletingTripEventSuccess(event) => {
            next.trip_detail.trip_day = update_day(&state.trip_detail.trip_day, event, |day| {
                let mut events = day.events.clone();
                events.retain(|e| e.id != event.id);
                events
            });
        }
        // The chained detail fetch brings the updated data
        TripSignal::UpdatingTripSuccess(_) | TripSignal::UpdatingTripDaySuccess(_) => {}
        _ => {}
    }
    next
}

/// Replace the events of the day(s) the event belongs to
fn update_day(
    days: &Vector<TripDay>,
    event: &Event,
    events: impl Fn(&TripDay) -> Vector<Event>,
) -> Vector<TripDay> {
    days.iter()
        .map(|day| {
            if day.id == event.trip_day_id {
                TripDay {
                    events: events(day),
                    ..day.clone()
                }
            } else {
                day.clone()
            }
        })
        .collect()
}

fn sorted_trip(trip: &Trip) -> Trip {
    let days = trip.trip_day.iter().map(|day| TripDay {
        events: sorted_by(day.events.clone(), |e| e.start_time.clone()),
        ..day.clone()
    });
    Trip {
        trip_day: sorted_by(days.collect(), |d| d.trip_date.clone()),
        ..trip.clone()
    }
}

/// Stable, equal keys keep their insertion order
fn sorted_by<T: Clone, K: Ord>(items: Vector<T>, key: impl FnMut(&T) -> K) -> Vector<T> {
    items.into_iter().sorted_by_key(key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::alert::AlertSignal;
    use crate::components::dashboard::DashboardSignal;
    use crate::environment::types::{EventId, TripDayId, TripId};
    use im::vector;

    fn trip_signal(signal: TripSignal) -> Signal {
        Signal::Trip(signal)
    }

    fn apply(state: &TripState, signal: TripSignal) -> TripState {
        reduce(state, &trip_signal(signal), &TimezoneTable::default())
    }

    fn day(id: u64, date: &str) -> TripDay {
        TripDay {
            id: TripDayId(id),
            trip_id: TripId(1),
            trip_date: date.to_string(),
            events: Vector::new(),
        }
    }

    fn event(id: u64, day: u64, start: &str) -> Event {
        Event {
            id: EventId(id),
            trip_day_id: TripDayId(day),
            start_time: start.to_string(),
            end_time: String::new(),
            details: Default::default(),
        }
    }

    fn with_days(days: Vector<TripDay>) -> TripState {
        TripState {
            trip_detail: Trip {
                id: TripId(1),
                timezone_id: 0,
                trip_day: days,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn is_sorted<T: Clone, K: Ord>(items: &Vector<T>, key: impl Fn(&T) -> K) -> bool {
        items.iter().tuple_windows().all(|(a, b)| key(a) <= key(b))
    }

    #[test]
    fn pending_and_failure_only_flip_loading() {
        let state = with_days(vector![day(1, "2024-01-01")]);

        let pending = apply(&state, TripSignal::CreatingTripDay);
        assert!(pending.is_loading);
        assert_eq!(pending.trip_detail, state.trip_detail);

        let failed = apply(&pending, TripSignal::CreatingTripDayFailure("nope".into()));
        assert!(!failed.is_loading);
        assert_eq!(failed.trip_detail, state.trip_detail);
        assert_eq!(failed.trip_list, state.trip_list);
    }

    #[test]
    fn failed_list_fetch_keeps_the_list() {
        let state = TripState {
            is_loading: true,
            trip_list: vector![Trip {
                id: TripId(3),
                ..Default::default()
            }],
            ..Default::default()
        };
        let next = apply(&state, TripSignal::FetchingTripListFailure("boom".into()));
        assert!(!next.is_loading);
        assert_eq!(next.trip_list, state.trip_list);
    }

    #[test]
    fn list_and_detail_are_replaced() {
        let trips = vector![Trip {
            id: TripId(8),
            ..Default::default()
        }];
        let state = apply(&TripState::default(), TripSignal::FetchingTripList);
        let state = apply(&state, TripSignal::FetchingTripListSuccess(trips.clone()));
        assert!(!state.is_loading);
        assert_eq!(state.trip_list, trips);

        let detail = Trip {
            id: TripId(8),
            trip_day: vector![day(2, "2024-01-03"), day(1, "2024-01-01")],
            ..Default::default()
        };
        let state = apply(&state, TripSignal::FetchingTripDetailSuccess(detail));
        let ids: Vec<_> = state.trip_detail.trip_day.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn created_trip_is_inserted_in_date_order() {
        let state = TripState {
            trip_list: vector![
                Trip {
                    id: TripId(1),
                    start_date: "2024-01-01".into(),
                    ..Default::default()
                },
                Trip {
                    id: TripId(2),
                    start_date: "2024-05-01".into(),
                    ..Default::default()
                }
            ],
            ..Default::default()
        };
        let created = Trip {
            id: TripId(3),
            start_date: "2024-03-01".into(),
            trip_day: vector![day(1, "2024-03-01")],
            ..Default::default()
        };

        let next = apply(&state, TripSignal::CreatingTripSuccess(created));
        let ids: Vec<_> = next.trip_list.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 3, 2]);
        assert!(next.trip_list[1].trip_day.is_empty());
        assert_eq!(state.trip_list.len(), 2);
    }

    #[test]
    fn trip_days_stay_sorted() {
        let dates = [
            "2024-01-05", "2024-01-01", "2024-01-09", "2024-01-03", "2024-01-03", "2024-01-02",
            "2024-01-08",
        ];
        let mut state = with_days(Vector::new());
        for (index, date) in dates.iter().enumerate() {
            let mut new_day = day(index as u64 + 1, date);
            new_day.events = vector![event(99, index as u64 + 1, "2024-01-01 10:00")];

            state = apply(&state, TripSignal::CreatingTripDaySuccess(new_day));
            assert!(is_sorted(&state.trip_detail.trip_day, |d| d.trip_date.clone()));
            assert_eq!(state.trip_detail.trip_day.len(), index + 1);
        }
        assert!(state.trip_detail.trip_day.iter().all(|d| d.events.is_empty()));
        // Equal dates keep the order they arrived in
        let same: Vec<_> = state
            .trip_detail
            .trip_day
            .iter()
            .filter(|d| d.trip_date == "2024-01-03")
            .map(|d| d.id.0)
            .collect();
        assert_eq!(same, vec![4, 5]);
    }

    #[test]
    fn events_stay_sorted_and_others_untouched() {
        let mut state = with_days(vector![day(1, "2024-01-01"), day(2, "2024-01-02")]);
        let untouched = state.trip_detail.trip_day[1].clone();
        let times = [
            "2024-01-01T15:00:00Z",
            "2024-01-01T08:00:00Z",
            "2024-01-01T22:30:00Z",
            "2024-01-01T08:00:00Z",
            "2024-01-01T12:15:00Z",
        ];
        for (index, time) in times.iter().enumerate() {
            state = apply(
                &state,
                TripSignal::CreatingTripEventSuccess(event(index as u64, 1, time)),
            );
            let events = &state.trip_detail.trip_day[0].events;
            assert_eq!(events.len(), index + 1);
            assert!(is_sorted(events, |e| e.start_time.clone()));
            assert_eq!(state.trip_detail.trip_day[1], untouched);
        }
        assert_eq!(
            state.trip_detail.trip_day[0].events[0].start_time,
            "2024-01-01 08:00"
        );
    }

    #[test]
    fn created_event_is_shifted_into_the_trip_timezone() {
        let mut state = with_days(vector![day(10, "2024-01-01")]);
        state.trip_detail.timezone_id = 2;
        let raw = Event {
            id: EventId(5),
            trip_day_id: TripDayId(10),
            start_time: "2024-01-01T10:00:00Z".into(),
            end_time: "2024-01-01T11:00:00Z".into(),
            details: Default::default(),
        };

        let next = apply(&state, TripSignal::CreatingTripEventSuccess(raw));
        let events = &next.trip_detail.trip_day[0].events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, EventId(5));
        assert_eq!(events[0].start_time, "2024-01-01 05:00");
        assert_eq!(events[0].end_time, "2024-01-01 06:00");
        assert!(state.trip_detail.trip_day[0].events.is_empty());
    }

    #[test]
    fn event_for_unknown_day_changes_nothing() {
        let state = with_days(vector![day(1, "2024-01-01")]);
        let next = apply(
            &state,
            TripSignal::CreatingTripEventSuccess(event(1, 42, "2024-01-01T10:00:00Z")),
        );
        assert_eq!(next.trip_detail, state.trip_detail);
    }

    #[test]
    fn deleting_a_day() {
        let state = with_days(vector![
            day(1, "2024-01-01"),
            day(2, "2024-01-02"),
            day(3, "2024-01-03")
        ]);

        let next = apply(&state, TripSignal::DeletingTripDaySuccess(TripDayId(2)));
        let ids: Vec<_> = next.trip_detail.trip_day.iter().map(|d| d.id.0).collect();
        assert_eq!(ids, vec![1, 3]);

        let again = apply(&next, TripSignal::DeletingTripDaySuccess(TripDayId(2)));
        assert_eq!(again.trip_detail, next.trip_detail);
        assert_eq!(state.trip_detail.trip_day.len(), 3);
    }

    #[test]
    fn deleting_an_event() {
        let mut first = day(1, "2024-01-01");
        first.events = vector![
            event(1, 1, "2024-01-01 08:00"),
            event(2, 1, "2024-01-01 09:00")
        ];
        let mut second = day(2, "2024-01-02");
        second.events = vector![event(2, 2, "2024-01-02 09:00")];
        let state = with_days(vector![first, second]);

        let next = apply(
            &state,
            TripSignal::DeletingTripEventSuccess(event(2, 1, "")),
        );
        let ids: Vec<_> = next.trip_detail.trip_day[0]
            .events
            .iter()
            .map(|e| e.id.0)
            .collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(next.trip_detail.trip_day[1].events.len(), 1);
    }

    #[test]
    fn other_concerns_are_ignored() {
        let state = with_days(vector![day(1, "2024-01-01")]);
        let timezones = TimezoneTable::default();
        let signals = [
            Signal::Alert(AlertSignal::ClearAlert),
            Signal::Dashboard(DashboardSignal::UpdateSelectedTripDayId(TripDayId(1))),
        ];
        for signal in signals {
            assert_eq!(reduce(&state, &signal, &timezones), state);
        }
    }
}
