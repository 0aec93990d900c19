use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use super::types::TimezoneId;

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Timezone {
    pub id: TimezoneId,
    pub name: String,
    /// Standard offset, daylight saving is not modelled
    pub utc_offset_minutes: i32,
}

impl Timezone {
    fn new(id: TimezoneId, name: &str, utc_offset_minutes: i32) -> Self {
        Self {
            id,
            name: name.to_string(),
            utc_offset_minutes,
        }
    }
}

/// Maps the `timezone_id` a trip carries to an UTC offset
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Timezone>", into = "Vec<Timezone>")]
pub struct TimezoneTable(im::OrdMap<TimezoneId, Timezone>);

impl Default for TimezoneTable {
    fn default() -> Self {
        vec![
            Timezone::new(0, "UTC", 0),
            Timezone::new(1, "America/Los_Angeles", -8 * 60),
            Timezone::new(2, "America/New_York", -5 * 60),
            Timezone::new(3, "Europe/London", 0),
            Timezone::new(4, "Europe/Berlin", 60),
            Timezone::new(5, "Asia/Ho_Chi_Minh", 7 * 60),
            Timezone::new(6, "Asia/Tokyo", 9 * 60),
            Timezone::new(7, "Australia/Sydney", 10 * 60),
        ]
        .into()
    }
}

impl From<Vec<Timezone>> for TimezoneTable {
    fn from(value: Vec<Timezone>) -> Self {
        TimezoneTable(value.into_iter().map(|zone| (zone.id, zone)).collect())
    }
}

impl From<TimezoneTable> for Vec<Timezone> {
    fn from(value: TimezoneTable) -> Self {
        value.0.into_iter().map(|(_, zone)| zone).collect()
    }
}

impl TimezoneTable {
    pub fn get(&self, id: TimezoneId) -> Option<&Timezone> {
        self.0.get(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unknown ids (and out of range offsets) don't shift at all
    pub fn offset(&self, id: TimezoneId) -> FixedOffset {
        let utc = Utc.fix();
        let Some(zone) = self.get(id) else {
            log::warn!("Unknown timezone id {id}, keeping UTC");
            return utc;
        };
        FixedOffset::east_opt(zone.utc_offset_minutes * 60).unwrap_or_else(|| {
            log::warn!("Offset of {} is out of range, keeping UTC", zone.name);
            utc
        })
    }
}
