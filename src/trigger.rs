//! Trigger evaluation: the domain logic for deciding what fires.
//!
//! Evaluation is pure. [`check_triggers`] reports every trigger whose
//! condition holds right now, every time it's asked. Turning that into
//! "notify once" is [`FiredSet`]'s job, owned by the caller.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::{self, Coordinate};
use crate::model::{Activity, Plan, Trigger};

/// Whether `trigger` holds for the given location, clock ("HH:MM"), and weather.
pub fn evaluate(trigger: &Trigger, location: Coordinate, time: &str, weather: &str) -> bool {
    match trigger {
        Trigger::Location {
            target, radius_km, ..
        } => geo::distance_km(location, *target) <= *radius_km,
        // Zero-padded "HH:MM" orders the same as the clock it names.
        Trigger::Time { at, .. } => time >= at.as_str(),
        Trigger::Weather { condition, .. } => weather == condition,
        Trigger::Inert(_) => false,
    }
}

/// A trigger that holds, with the activity it belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiredTrigger<'a> {
    pub activity: &'a Activity,
    pub trigger_index: usize,
    pub trigger: &'a Trigger,
}

impl FiredTrigger<'_> {
    pub fn key(&self) -> FiredKey {
        (self.activity.id, self.trigger_index)
    }
}

/// Identifies a trigger across checks: (activity id, index within the activity).
pub type FiredKey = (Uuid, usize);

/// Every trigger in `plan` that holds right now.
///
/// Activities in itinerary order, triggers in per-activity order.
/// No plan means nothing fires.
pub fn check_triggers<'a>(
    plan: Option<&'a Plan>,
    location: Coordinate,
    time: &str,
    weather: &str,
) -> Vec<FiredTrigger<'a>> {
    let Some(plan) = plan else {
        return Vec::new();
    };
    plan.activities
        .iter()
        .flat_map(|activity| {
            activity
                .triggers
                .iter()
                .enumerate()
                .map(move |(trigger_index, trigger)| FiredTrigger {
                    activity,
                    trigger_index,
                    trigger,
                })
        })
        .filter(|f| evaluate(f.trigger, location, time, weather))
        .collect()
}

/// Triggers that already notified and haven't re-armed.
///
/// A key leaves the set as soon as a check of its plan finds its condition
/// false, so the next time the condition holds it notifies again. Checks of
/// other plans leave it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FiredSet(BTreeSet<FiredKey>);

impl FiredSet {
    /// Folds in the result of checking `plan` and returns only what's newly fired.
    ///
    /// `fired` must be the complete result of one check of `plan`: any key
    /// of this plan's activities that is absent from `fired` is treated as
    /// no longer holding.
    pub fn reconcile<'a>(
        &mut self,
        plan: &Plan,
        fired: Vec<FiredTrigger<'a>>,
    ) -> Vec<FiredTrigger<'a>> {
        let holding: BTreeSet<FiredKey> = fired.iter().map(FiredTrigger::key).collect();
        let checked: BTreeSet<Uuid> = plan.activities.iter().map(|a| a.id).collect();
        self.0
            .retain(|key| holding.contains(key) || !checked.contains(&key.0));

        fired
            .into_iter()
            .filter(|f| self.0.insert(f.key()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::model::{DEFAULT_RADIUS_KM, PlanDraft, TriggerSpec};

    const CITY_HALL: Coordinate = Coordinate::new(37.5665, 126.9780);
    const GANGNAM: Coordinate = Coordinate::new(37.4979, 127.0276);

    fn location(target: Coordinate, radius_km: f64, message: &str) -> Trigger {
        Trigger::Location {
            target,
            radius_km,
            message: message.into(),
        }
    }

    fn time(at: &str) -> Trigger {
        Trigger::Time {
            at: at.into(),
            message: String::new(),
        }
    }

    fn weather(condition: &str) -> Trigger {
        Trigger::Weather {
            condition: condition.into(),
            message: String::new(),
        }
    }

    fn activity(name: &str, triggers: Vec<Trigger>) -> Activity {
        Activity {
            id: Uuid::new_v4(),
            name: name.into(),
            location: String::new(),
            latitude: None,
            longitude: None,
            time: None,
            description: String::new(),
            duration_minutes: None,
            triggers,
        }
    }

    fn plan(activities: Vec<Activity>) -> Plan {
        Plan::from_draft(
            "plan_test".into(),
            PlanDraft {
                activities,
                ..PlanDraft::default()
            },
            Timestamp::now(),
        )
    }

    #[test]
    fn location_boundary_is_inclusive() {
        let here = Coordinate::new(37.5665, 126.9780);
        let there = Coordinate::new(37.5700, 126.9800);
        let d = geo::distance_km(here, there);

        assert!(evaluate(&location(there, d, ""), here, "00:00", ""));
        assert!(!evaluate(&location(there, d - 1e-9, ""), here, "00:00", ""));
    }

    #[test]
    fn location_default_radius_is_half_a_km() {
        let t: Trigger = TriggerSpec {
            kind: Some("location".into()),
            latitude: Some(CITY_HALL.latitude),
            longitude: Some(CITY_HALL.longitude),
            ..TriggerSpec::default()
        }
        .into();
        assert!(matches!(t, Trigger::Location { radius_km, .. } if radius_km == DEFAULT_RADIUS_KM));

        // ~0.44 km north of City Hall: inside. ~0.56 km: outside.
        assert!(evaluate(&t, Coordinate::new(37.5705, 126.9780), "", ""));
        assert!(!evaluate(&t, Coordinate::new(37.5715, 126.9780), "", ""));
    }

    #[test]
    fn time_fires_from_target_onwards() {
        let t = time("09:00");
        assert!(!evaluate(&t, CITY_HALL, "08:59", ""));
        assert!(evaluate(&t, CITY_HALL, "09:00", ""));
        assert!(evaluate(&t, CITY_HALL, "09:01", ""));
        assert!(evaluate(&t, CITY_HALL, "23:59", ""));
    }

    #[test]
    fn weather_matches_exactly() {
        let t = weather("Rainy");
        assert!(evaluate(&t, CITY_HALL, "", "Rainy"));
        assert!(!evaluate(&t, CITY_HALL, "", "rainy"));
        assert!(!evaluate(&weather("비"), CITY_HALL, "", "Rainy"));
    }

    #[test]
    fn inert_never_fires() {
        let t = Trigger::Inert(TriggerSpec {
            kind: Some("crowd".into()),
            ..TriggerSpec::default()
        });
        assert!(!evaluate(&t, CITY_HALL, "23:59", "Sunny"));
    }

    #[test]
    fn no_plan_fires_nothing() {
        assert!(check_triggers(None, CITY_HALL, "12:00", "Sunny").is_empty());
    }

    #[test]
    fn only_the_activity_in_range_fires() {
        let p = plan(vec![
            activity("Near", vec![location(CITY_HALL, 0.5, "near")]),
            activity("Far", vec![location(GANGNAM, 0.5, "far")]),
        ]);

        let fired = check_triggers(Some(&p), CITY_HALL, "12:00", "Sunny");
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].activity.name, "Near");
        assert_eq!(fired[0].trigger_index, 0);
    }

    #[test]
    fn arrival_scenario() {
        let p = plan(vec![activity(
            "City Hall",
            vec![location(CITY_HALL, 0.5, "You arrived")],
        )]);

        let fired = check_triggers(Some(&p), CITY_HALL, "10:00", "Sunny");
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].trigger.message(), "You arrived");
    }

    #[test]
    fn results_follow_plan_then_trigger_order() {
        let p = plan(vec![
            activity("First", vec![weather("Sunny"), time("08:00")]),
            activity("Second", vec![time("07:00")]),
        ]);

        let fired = check_triggers(Some(&p), CITY_HALL, "09:00", "Sunny");
        let order: Vec<(&str, usize)> = fired
            .iter()
            .map(|f| (f.activity.name.as_str(), f.trigger_index))
            .collect();
        assert_eq!(order, vec![("First", 0), ("First", 1), ("Second", 0)]);
    }

    #[test]
    fn unchanged_state_fires_once() {
        let p = plan(vec![activity("Lunch", vec![time("12:00")])]);
        let mut seen = FiredSet::default();

        let first = seen.reconcile(&p, check_triggers(Some(&p), CITY_HALL, "12:00", ""));
        let second = seen.reconcile(&p, check_triggers(Some(&p), CITY_HALL, "12:30", ""));

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(seen.len(), 1);
    }

    #[test]
    fn rearms_after_condition_turns_false() {
        let p = plan(vec![activity("Museum", vec![weather("Rainy")])]);
        let mut seen = FiredSet::default();

        assert_eq!(seen.reconcile(&p, check_triggers(Some(&p), CITY_HALL, "", "Rainy")).len(), 1);
        assert!(seen.reconcile(&p, check_triggers(Some(&p), CITY_HALL, "", "Sunny")).is_empty());
        assert!(seen.is_empty());
        assert_eq!(seen.reconcile(&p, check_triggers(Some(&p), CITY_HALL, "", "Rainy")).len(), 1);
    }

    #[test]
    fn other_plans_keep_their_keys() {
        let a = plan(vec![activity("Lunch", vec![time("12:00")])]);
        let b = plan(vec![activity("Museum", vec![weather("Rainy")])]);
        let mut seen = FiredSet::default();

        assert_eq!(seen.reconcile(&a, check_triggers(Some(&a), CITY_HALL, "12:00", "")).len(), 1);
        assert!(seen.reconcile(&b, check_triggers(Some(&b), CITY_HALL, "12:30", "")).is_empty());
        assert_eq!(seen.len(), 1);
        assert!(seen.reconcile(&a, check_triggers(Some(&a), CITY_HALL, "13:00", "")).is_empty());
    }

    #[test]
    fn fired_set_round_trips_as_pairs() {
        let p = plan(vec![activity("Lunch", vec![time("12:00")])]);
        let mut seen = FiredSet::default();
        seen.reconcile(&p, check_triggers(Some(&p), CITY_HALL, "12:00", ""));

        let json = serde_json::to_string(&seen).unwrap();
        let back: FiredSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seen);
        assert!(json.contains(&p.activities[0].id.to_string()));
    }
}
