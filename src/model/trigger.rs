//! Trigger types: conditions attached to an activity.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

use super::lenient;

/// Radius used by location triggers that don't specify one, in kilometers.
pub const DEFAULT_RADIUS_KM: f64 = 0.5;

/// A condition that, once satisfied, should notify the traveler.
///
/// Parsed from the flat wire shape in [`TriggerSpec`]. Anything that
/// doesn't form a complete known trigger becomes [`Trigger::Inert`],
/// which keeps the raw fields and never fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "TriggerSpec")]
pub enum Trigger {
    /// Fires within `radius_km` of `target`, boundary included.
    Location {
        target: Coordinate,
        radius_km: f64,
        message: String,
    },

    /// Fires once the clock reads `at` ("HH:MM") or later.
    Time { at: String, message: String },

    /// Fires while the weather condition equals `condition` exactly.
    Weather { condition: String, message: String },

    /// Unknown kind, or a known kind missing required fields.
    Inert(TriggerSpec),
}

impl Trigger {
    /// The wire kind: `location`, `time`, `weather`, or whatever an inert
    /// trigger was tagged with (`general` when untagged).
    pub fn kind(&self) -> &str {
        match self {
            Self::Location { .. } => "location",
            Self::Time { .. } => "time",
            Self::Weather { .. } => "weather",
            Self::Inert(spec) => spec.kind.as_deref().unwrap_or("general"),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Location { message, .. }
            | Self::Time { message, .. }
            | Self::Weather { message, .. } => message,
            Self::Inert(spec) => spec.message.as_deref().unwrap_or_default(),
        }
    }
}

/// Flat wire shape of a trigger, as the planner emits it.
///
/// Fields of the wrong type read as absent, so a garbled trigger ends up
/// [`Trigger::Inert`] instead of failing its plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,

    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Anything that isn't a trigger object at all is an untagged inert trigger.
impl From<serde_json::Value> for Trigger {
    fn from(value: serde_json::Value) -> Self {
        serde_json::from_value::<TriggerSpec>(value)
            .unwrap_or_default()
            .into()
    }
}

impl From<TriggerSpec> for Trigger {
    fn from(spec: TriggerSpec) -> Self {
        let message = spec.message.clone().unwrap_or_default();
        let kind = spec.kind.clone();
        match kind.as_deref() {
            Some("location") => match (spec.latitude, spec.longitude) {
                (Some(latitude), Some(longitude)) => Self::Location {
                    target: Coordinate::new(latitude, longitude),
                    radius_km: spec.radius.unwrap_or(DEFAULT_RADIUS_KM),
                    message,
                },
                _ => Self::Inert(spec),
            },
            Some("time") => match spec.time.clone() {
                Some(at) => Self::Time { at, message },
                None => Self::Inert(spec),
            },
            Some("weather") => match spec.condition.clone() {
                Some(condition) => Self::Weather { condition, message },
                None => Self::Inert(spec),
            },
            _ => Self::Inert(spec),
        }
    }
}

impl From<Trigger> for TriggerSpec {
    fn from(trigger: Trigger) -> Self {
        match trigger {
            Trigger::Location {
                target,
                radius_km,
                message,
            } => Self {
                kind: Some("location".into()),
                latitude: Some(target.latitude),
                longitude: Some(target.longitude),
                radius: Some(radius_km),
                message: Some(message),
                ..Self::default()
            },
            Trigger::Time { at, message } => Self {
                kind: Some("time".into()),
                time: Some(at),
                message: Some(message),
                ..Self::default()
            },
            Trigger::Weather { condition, message } => Self {
                kind: Some("weather".into()),
                condition: Some(condition),
                message: Some(message),
                ..Self::default()
            },
            Trigger::Inert(spec) => spec,
        }
    }
}
