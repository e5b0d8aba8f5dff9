//! Notification: what the traveler's phone shows when a trigger fires.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{plan::Activity, trigger::Trigger};

/// A fired trigger, delivered to the traveler's inbox.
///
/// Carries snapshots of the activity and trigger that produced it.
/// Only `read` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Trigger kind: `location`, `time`, `weather`...
    #[serde(rename = "type")]
    pub kind: String,

    pub title: String,

    pub message: String,

    pub activity: Activity,

    pub trigger: Trigger,

    /// Position of `trigger` within `activity.triggers`.
    pub trigger_index: usize,

    /// The plan that was current when the trigger fired.
    pub plan_id: String,

    /// Simulated clock at firing, "HH:MM".
    pub time: String,

    pub created_at: Timestamp,

    #[serde(default)]
    pub read: bool,
}

impl Notification {
    /// An unread notification for a fired trigger.
    pub fn new(
        plan_id: &str,
        activity: &Activity,
        trigger_index: usize,
        trigger: &Trigger,
        time: String,
    ) -> Self {
        let title = if activity.name.is_empty() {
            "Notification".to_string()
        } else {
            activity.name.clone()
        };
        let message = if trigger.message().is_empty() {
            "Activity reminder".to_string()
        } else {
            trigger.message().to_string()
        };
        Self {
            kind: trigger.kind().to_string(),
            title,
            message,
            activity: activity.clone(),
            trigger: trigger.clone(),
            trigger_index,
            plan_id: plan_id.to_string(),
            time,
            created_at: Timestamp::now(),
            read: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::geo::Coordinate;

    fn activity(name: &str) -> Activity {
        serde_json::from_value(serde_json::json!({ "name": name })).unwrap()
    }

    #[test]
    fn takes_title_and_message_from_sources() {
        let trigger = Trigger::Location {
            target: Coordinate::new(37.5665, 126.9780),
            radius_km: 0.5,
            message: "You arrived".into(),
        };
        let n = Notification::new("plan_1", &activity("City Hall"), 0, &trigger, "09:00".into());
        assert_eq!(n.kind, "location");
        assert_eq!(n.title, "City Hall");
        assert_eq!(n.message, "You arrived");
        assert!(!n.read);
    }

    #[test]
    fn falls_back_when_empty() {
        let trigger = Trigger::Time {
            at: "09:00".into(),
            message: String::new(),
        };
        let n = Notification::new("plan_1", &activity(""), 0, &trigger, "09:00".into());
        assert_eq!(n.title, "Notification");
        assert_eq!(n.message, "Activity reminder");
    }

    #[test]
    fn serializes_with_type_tag() {
        let trigger = Trigger::Weather {
            condition: "Rainy".into(),
            message: "Bring an umbrella".into(),
        };
        let n = Notification::new("plan_1", &activity("Walk"), 2, &trigger, "14:30".into());
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "weather");
        assert_eq!(value["triggerIndex"], 2);
        assert_eq!(value["planId"], "plan_1");
        assert_eq!(value["read"], false);
    }
}
