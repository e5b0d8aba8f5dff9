//! Plan types: itineraries and the activities they're made of.

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::geo::Coordinate;

use super::{lenient, trigger::Trigger};

/// Free-form preferences attached to a plan (interests, pace, budget...).
pub type Preferences = serde_json::Map<String, serde_json::Value>;

/// A full itinerary: destination, dates, ordered activities, preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// `plan_YYYYMMDD_HHMMSS`, from the creation time.
    pub id: String,
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    /// Itinerary order.
    pub activities: Vec<Activity>,
    #[serde(default)]
    pub preferences: Preferences,
    pub created_at: Timestamp,
    pub modified_at: Timestamp,
}

impl Plan {
    /// Builds a plan from a draft. The id and timestamps are the store's call.
    pub fn from_draft(id: String, draft: PlanDraft, now: Timestamp) -> Self {
        Self {
            id,
            destination: draft.destination,
            start_date: draft.start_date,
            end_date: draft.end_date,
            activities: draft.activities,
            preferences: draft.preferences,
            created_at: now,
            modified_at: now,
        }
    }

    /// Overwrites every field present in the patch.
    pub fn apply(&mut self, patch: PlanPatch) {
        if let Some(destination) = patch.destination {
            self.destination = destination;
        }
        if let Some(start_date) = patch.start_date {
            self.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            self.end_date = end_date;
        }
        if let Some(activities) = patch.activities {
            self.activities = activities;
        }
        if let Some(preferences) = patch.preferences {
            self.preferences = preferences;
        }
    }
}

/// One stop on the itinerary.
///
/// Inbound JSON from the planner is loose, so every field defaults and
/// optional fields of the wrong type read as absent. The id is minted on
/// first parse and kept from then on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    #[serde(default)]
    pub name: String,

    /// Name of the place, e.g. "Gyeongbokgung Palace".
    #[serde(default)]
    pub location: String,

    #[serde(default, deserialize_with = "lenient")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient")]
    pub longitude: Option<f64>,

    /// Scheduled start, "HH:MM".
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Whole minutes. Fractional values round to the nearest minute.
    #[serde(default, deserialize_with = "lenient_minutes")]
    pub duration_minutes: Option<u32>,

    #[serde(default)]
    pub triggers: Vec<Trigger>,
}

impl Activity {
    /// The activity's coordinate, when both halves are known.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude?, self.longitude?))
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lenient_minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let minutes: Option<f64> = lenient(deserializer)?;
    Ok(minutes
        .filter(|m| (0.0..=f64::from(u32::MAX)).contains(m))
        .map(|m| m.round() as u32))
}

/// Inbound shape of a new plan, before the store assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanDraft {
    #[serde(default)]
    pub destination: String,

    #[serde(default)]
    pub start_date: String,

    #[serde(default)]
    pub end_date: String,

    #[serde(default)]
    pub activities: Vec<Activity>,

    #[serde(default)]
    pub preferences: Preferences,
}

/// Partial update to a plan: present fields replace, absent fields stay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanPatch {
    #[serde(default)]
    pub destination: Option<String>,

    #[serde(default)]
    pub start_date: Option<String>,

    #[serde(default)]
    pub end_date: Option<String>,

    #[serde(default)]
    pub activities: Option<Vec<Activity>>,

    #[serde(default)]
    pub preferences: Option<Preferences>,
}
