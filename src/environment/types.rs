use chrono::NaiveDate;
use im::Vector;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::helper::{deserialize_flag, deserialize_message, deserialize_nullable_string};

/// Shown whenever the server gives us nothing to work with
pub const FALLBACK_ERROR_MESSAGE: &str = "Ooooops, there is something wrong, please try again.";

pub type TimezoneId = u32;

// Identifiers

#[derive(Default, Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripId(pub u64);

#[derive(Default, Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripDayId(pub u64);

impl TripDayId {
    /// The "nothing selected yet" marker
    pub const NONE: TripDayId = TripDayId(0);

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

#[derive(Default, Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl std::fmt::Display for TripId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for TripDayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Trip Types

#[derive(Default, Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Trip {
    #[serde(default)]
    pub id: TripId,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub destination: String,
    /// Calendar date, `YYYY-MM-DD` once normalized
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub start_date: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub end_date: String,
    #[serde(default)]
    pub timezone_id: TimezoneId,
    /// The server stores this as a `0` / `1` column
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub archived: bool,
    /// Always sorted by `trip_date` while held in the store
    #[serde(default)]
    pub trip_day: Vector<TripDay>,
}

#[derive(Default, Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct TripDay {
    #[serde(default)]
    pub id: TripDayId,
    /// Back-reference to the owning trip
    #[serde(default)]
    pub trip_id: TripId,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub trip_date: String,
    /// Always sorted by `start_time` while held in the store
    #[serde(default)]
    pub events: Vector<Event>,
}

#[derive(Default, Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Event {
    #[serde(default)]
    pub id: EventId,
    #[serde(default)]
    pub trip_day_id: TripDayId,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub start_time: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub end_time: String,
    /// Title, location, notes... whatever the server sends along.
    #[serde(flatten)]
    pub details: serde_json::Map<String, Value>,
}

// Envelope

/// The `{success, result, error}` wrapper around every server response
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub result: Option<T>,
    #[serde(default, deserialize_with = "deserialize_message")]
    pub error: Option<String>,
}

impl<T> Default for Envelope<T> {
    fn default() -> Self {
        Self {
            success: false,
            result: None,
            error: None,
        }
    }
}

impl<T> Envelope<T> {
    /// The result on success, otherwise the server message (or the fallback)
    pub fn into_outcome(self) -> Result<Option<T>, String> {
        if self.success {
            return Ok(self.result);
        }
        match self.error {
            Some(error) if !error.is_empty() => Err(error),
            _ => Err(FALLBACK_ERROR_MESSAGE.to_string()),
        }
    }
}

impl Envelope<Value> {
    /// `null`, `{}` and an empty body all count as the empty envelope
    pub fn from_body(body: Value) -> Result<Self, serde_json::Error> {
        match body {
            Value::Null => Ok(Self::default()),
            Value::Object(ref map) if map.is_empty() => Ok(Self::default()),
            other => serde_json::from_value(other),
        }
    }

    pub fn decode<T: DeserializeOwned>(self) -> Result<Envelope<T>, serde_json::Error> {
        let result = match (self.success, self.result) {
            (true, Some(value)) if !value.is_null() => Some(serde_json::from_value(value)?),
            _ => None,
        };
        Ok(Envelope {
            success: self.success,
            result,
            error: self.error,
        })
    }

    /// Like `decode`, but a result of an unexpected shape is dropped instead of failing.
    /// Mutation endpoints sometimes answer with an id or a row count.
    pub fn decode_lenient<T: DeserializeOwned>(self) -> Envelope<T> {
        let result = match (self.success, self.result) {
            (true, Some(value)) => serde_json::from_value(value)
                .map_err(|e| log::debug!("Ignoring result of unexpected shape: {e}"))
                .ok(),
            _ => None,
        };
        Envelope {
            success: self.success,
            result,
            error: self.error,
        }
    }
}

// Menu

use strum_macros::Display;
use strum_macros::EnumIter;
use strum_macros::EnumString;
use strum_macros::IntoStaticStr;

/// The dashboard menu entry deciding which trips are listed
#[derive(
    IntoStaticStr,
    EnumIter,
    EnumString,
    Display,
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MenuSelection {
    Archived,
    Current,
    Upcoming,
    Past,
    #[default]
    All,
}

impl MenuSelection {
    /// Anything we don't know lists all active trips
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

/// Request body of the trip list call
#[derive(Clone, Debug, Default, Serialize, Eq, PartialEq)]
pub struct TripFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub archived: bool,
}

impl TripFilter {
    pub fn for_menu(menu: MenuSelection, today: NaiveDate) -> Self {
        match menu {
            MenuSelection::Archived => Self {
                archived: true,
                ..Default::default()
            },
            // TODO: the server only matches exact dates here, trips spanning today need a range query
            MenuSelection::Current => Self {
                start_date: Some(today),
                end_date: Some(today),
                archived: false,
            },
            MenuSelection::Upcoming => Self {
                start_date: Some(today),
                ..Default::default()
            },
            MenuSelection::Past => Self {
                end_date: Some(today),
                ..Default::default()
            },
            MenuSelection::All => Self::default(),
        }
    }
}

// Alerts

#[derive(Copy, Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertKind {
    Error,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }
}
