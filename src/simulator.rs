//! Simulation driver: walks the traveler through the current plan.
//!
//! A [`Simulation`] is the session: one traveler, the triggers that
//! already notified, and a cursor into the itinerary. It never owns the
//! plan; callers pass the current plan in on every call.

use jiff::civil::Time;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::geo::Coordinate;
use crate::landmarks::SEOUL_CITY_HALL;
use crate::model::{Notification, Plan, TravelerState};
use crate::trigger::{self, FiredSet};

/// Points per leg when walking to the next activity.
pub const MOVEMENT_STEPS: u32 = 10;

/// One traveler's session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub traveler: TravelerState,

    #[serde(default)]
    pub fired: FiredSet,

    /// Index of the activity the traveler heads to next.
    #[serde(default)]
    pub next_activity: usize,
}

/// What happened on [`Simulation::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// No current plan, or a plan with no activities.
    NothingToDo,

    /// Walked to an activity and checked triggers on arrival.
    Arrived {
        /// Position of the activity in the itinerary.
        index: usize,
        name: String,
        /// Every point walked through, start and end included.
        path: Vec<Coordinate>,
        notifications: Vec<Notification>,
    },

    /// Past the last activity. The cursor is back at the start.
    Completed,
}

impl Simulation {
    /// Evaluates the current plan against the traveler's state.
    ///
    /// Each trigger that newly holds lands in the inbox once. The new
    /// notifications are also returned.
    pub fn check(&mut self, plan: Option<&Plan>) -> Vec<Notification> {
        let Some(plan) = plan else {
            return Vec::new();
        };
        let time = self.traveler.clock();
        let fired = trigger::check_triggers(
            Some(plan),
            self.traveler.location.coordinate,
            &time,
            &self.traveler.weather.condition,
        );
        let holding = fired.len();
        let fresh = self.fired.reconcile(plan, fired);
        debug!(holding, fresh = fresh.len(), %time, "checked triggers");

        let notifications: Vec<Notification> = fresh
            .iter()
            .map(|f| Notification::new(&plan.id, f.activity, f.trigger_index, f.trigger, time.clone()))
            .collect();
        for n in &notifications {
            info!(kind = %n.kind, title = %n.title, "notification");
            self.traveler.add_notification(n.clone());
        }
        notifications
    }

    /// Moves to the next activity in the itinerary and checks triggers there.
    ///
    /// The traveler walks a straight line to the activity (Seoul City Hall
    /// when it has no coordinate) and the clock jumps to its scheduled time
    /// on the same day, if it has one.
    pub fn advance(&mut self, plan: Option<&Plan>) -> Advance {
        let Some(plan) = plan.filter(|p| !p.activities.is_empty()) else {
            return Advance::NothingToDo;
        };

        let index = self.next_activity;
        let Some(activity) = plan.activities.get(index) else {
            info!(plan_id = %plan.id, "itinerary complete");
            self.next_activity = 0;
            return Advance::Completed;
        };

        let target = activity
            .coordinate()
            .unwrap_or(SEOUL_CITY_HALL.coordinate);
        let path = self.traveler.simulate_movement(target, MOVEMENT_STEPS);

        let place = if activity.location.is_empty() {
            "Destination"
        } else {
            activity.location.as_str()
        };
        self.traveler.update_location(target, place);

        if let Some(at) = activity.time.as_deref() {
            match parse_clock(at) {
                Some(time) => {
                    let datetime = self.traveler.datetime.date().to_datetime(time);
                    self.traveler.update_datetime(datetime);
                }
                None => warn!(time = at, activity = %activity.name, "ignoring malformed activity time"),
            }
        }

        let name = activity.name.clone();
        self.next_activity = index + 1;
        let notifications = self.check(Some(plan));

        Advance::Arrived {
            index,
            name,
            path,
            notifications,
        }
    }

    /// Back to the first activity, with every trigger re-armed.
    ///
    /// The traveler and the inbox are left as they are.
    pub fn reset(&mut self) {
        self.next_activity = 0;
        self.fired.clear();
    }
}

/// Parses "HH:MM" (24-hour) into a clock time.
pub fn parse_clock(s: &str) -> Option<Time> {
    let (hour, minute) = s.trim().split_once(':')?;
    Time::new(hour.parse().ok()?, minute.parse().ok()?, 0, 0).ok()
}
