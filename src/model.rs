//! Core data model for itinera.
//!
//! Plans made of activities, triggers attached to activities, the simulated
//! traveler, and the notifications that land in the traveler's inbox.

mod notification;
mod plan;
mod traveler;
mod trigger;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};

pub use notification::Notification;
pub use plan::{Activity, Plan, PlanDraft, PlanPatch};
pub use traveler::TravelerState;
pub use trigger::Trigger;

#[cfg(test)]
pub use trigger::{DEFAULT_RADIUS_KM, TriggerSpec};

/// Reads an optional field, treating a value of the wrong type as absent.
///
/// Planner output is loose; one bad field shouldn't sink the whole plan.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}
