//! Traveler state: where the simulated traveler is, when, and in what weather.

use std::fmt;

use jiff::{Span, Zoned, civil::DateTime};
use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinate};
use crate::landmarks::SEOUL_CITY_HALL;

use super::notification::Notification;

/// Default walking speed, km/h.
pub const WALKING_SPEED_KMH: f64 = 5.0;

/// The simulated traveler: position, clock, weather, and phone inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerState {
    pub location: Place,

    /// Simulated local clock.
    pub datetime: DateTime,

    pub weather: Weather,

    /// Append-only, oldest first.
    #[serde(default)]
    pub notifications: Vec<Notification>,

    pub walking_speed_kmh: f64,
}

/// A named position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    /// Free text, compared exactly by weather triggers.
    pub condition: String,
    /// Degrees Celsius.
    pub temperature: i32,
}

impl Default for TravelerState {
    /// Standing at Seoul City Hall, now, on a sunny 15°C day.
    fn default() -> Self {
        Self {
            location: Place {
                coordinate: SEOUL_CITY_HALL.coordinate,
                name: SEOUL_CITY_HALL.name.to_string(),
            },
            datetime: Zoned::now().datetime(),
            weather: Weather {
                condition: "Sunny".to_string(),
                temperature: 15,
            },
            notifications: Vec::new(),
            walking_speed_kmh: WALKING_SPEED_KMH,
        }
    }
}

impl TravelerState {
    pub fn update_location(&mut self, coordinate: Coordinate, name: impl Into<String>) {
        self.location = Place {
            coordinate,
            name: name.into(),
        };
    }

    pub fn update_datetime(&mut self, datetime: DateTime) {
        self.datetime = datetime;
    }

    pub fn update_weather(&mut self, condition: impl Into<String>, temperature: i32) {
        self.weather = Weather {
            condition: condition.into(),
            temperature,
        };
    }

    pub fn add_notification(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Marks the notification at `index` read. Out of range is a no-op.
    pub fn mark_read(&mut self, index: usize) -> bool {
        match self.notifications.get_mut(index) {
            Some(n) => {
                n.read = true;
                true
            }
            None => false,
        }
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    /// Unread notifications with their inbox index, oldest first.
    pub fn unread(&self) -> impl Iterator<Item = (usize, &Notification)> {
        self.notifications
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.read)
    }

    /// The clock as "HH:MM", the form time triggers compare against.
    pub fn clock(&self) -> String {
        self.datetime.strftime("%H:%M").to_string()
    }

    /// Path from the current location to `target`, `steps + 1` points.
    ///
    /// Doesn't move the traveler; the caller walks the path.
    pub fn simulate_movement(&self, target: Coordinate, steps: u32) -> Vec<Coordinate> {
        geo::interpolate(self.location.coordinate, target, steps)
    }

    /// Minutes to walk from here to `target` at the traveler's speed.
    pub fn walking_minutes_to(&self, target: Coordinate) -> i64 {
        geo::walking_minutes(self.location.coordinate, target, self.walking_speed_kmh)
    }

    pub fn advance_time(&mut self, minutes: i64) -> Result<(), jiff::Error> {
        self.datetime = self.datetime.checked_add(Span::new().try_minutes(minutes)?)?;
        Ok(())
    }

    pub fn time_info(&self) -> TimeInfo {
        let hour = self.datetime.hour();
        TimeInfo {
            hour,
            minute: self.datetime.minute(),
            time_of_day: TimeOfDay::from_hour(hour),
            date: self.datetime.date().to_string(),
            weekday: self.datetime.strftime("%A").to_string(),
        }
    }
}

/// Broken-down view of the simulated clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInfo {
    pub hour: i8,
    pub minute: i8,
    pub time_of_day: TimeOfDay,
    /// "YYYY-MM-DD".
    pub date: String,
    pub weekday: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub fn from_hour(hour: i8) -> Self {
        match hour {
            5..=11 => Self::Morning,
            12..=16 => Self::Afternoon,
            17..=20 => Self::Evening,
            _ => Self::Night,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::civil::date;

    use crate::model::Trigger;

    fn state_at(hour: i8, minute: i8) -> TravelerState {
        TravelerState {
            datetime: date(2026, 10, 19).at(hour, minute, 0, 0),
            ..TravelerState::default()
        }
    }

    fn notification() -> Notification {
        let activity = serde_json::from_value(serde_json::json!({ "name": "Tea" })).unwrap();
        let trigger = Trigger::Weather {
            condition: "Rainy".into(),
            message: "Go inside".into(),
        };
        Notification::new("plan_1", &activity, 0, &trigger, "10:00".into())
    }

    #[test]
    fn default_starts_at_city_hall() {
        let s = TravelerState::default();
        assert_eq!(s.location.coordinate, Coordinate::new(37.5665, 126.9780));
        assert_eq!(s.weather.condition, "Sunny");
        assert!(s.notifications.is_empty());
    }

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(state_at(9, 5).clock(), "09:05");
    }

    #[test]
    fn advance_time_crosses_midnight() {
        let mut s = state_at(23, 50);
        s.advance_time(15).unwrap();
        assert_eq!(s.datetime, date(2026, 10, 20).at(0, 5, 0, 0));
    }

    #[test]
    fn advance_time_out_of_range_is_an_error() {
        let mut s = state_at(9, 0);
        assert!(s.advance_time(20_000_000_000).is_err());
        assert!(s.advance_time(i64::MIN).is_err());
        assert_eq!(s.datetime, date(2026, 10, 19).at(9, 0, 0, 0));
    }

    #[test]
    fn time_of_day_buckets() {
        assert_eq!(state_at(5, 0).time_info().time_of_day, TimeOfDay::Morning);
        assert_eq!(state_at(11, 59).time_info().time_of_day, TimeOfDay::Morning);
        assert_eq!(state_at(12, 0).time_info().time_of_day, TimeOfDay::Afternoon);
        assert_eq!(state_at(17, 0).time_info().time_of_day, TimeOfDay::Evening);
        assert_eq!(state_at(21, 0).time_info().time_of_day, TimeOfDay::Night);
        assert_eq!(state_at(4, 59).time_info().time_of_day, TimeOfDay::Night);
    }

    #[test]
    fn time_info_reports_date_and_weekday() {
        let info = state_at(9, 30).time_info();
        assert_eq!(info.date, "2026-10-19");
        assert_eq!(info.weekday, "Monday");
        assert_eq!((info.hour, info.minute), (9, 30));
    }

    #[test]
    fn mark_read_in_and_out_of_range() {
        let mut s = state_at(10, 0);
        s.add_notification(notification());
        s.add_notification(notification());

        assert!(s.mark_read(1));
        assert!(!s.mark_read(2));

        let unread: Vec<usize> = s.unread().map(|(i, _)| i).collect();
        assert_eq!(unread, vec![0]);
    }

    #[test]
    fn movement_starts_from_current_location() {
        let s = state_at(10, 0);
        let target = Coordinate::new(37.5796, 126.9770);
        let path = s.simulate_movement(target, 4);
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], s.location.coordinate);
    }

    #[test]
    fn serializes_datetime_as_iso() {
        let value = serde_json::to_value(state_at(9, 0)).unwrap();
        assert_eq!(value["datetime"], "2026-10-19T09:00:00");
        assert_eq!(value["location"]["latitude"], 37.5665);
        assert_eq!(value["location"]["name"], "Seoul City Hall");
    }
}
