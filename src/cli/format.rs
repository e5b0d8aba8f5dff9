//! Output formatting for CLI display.

use std::fmt::Write;

use crate::model::{Notification, Plan, Trigger};
use crate::simulator::{Advance, Simulation};

/// One line per plan for `plan list`.
pub(super) fn format_plan_line(plan: &Plan, current: bool) -> String {
    let marker = if current { "*" } else { " " };
    let destination = if plan.destination.is_empty() {
        "(no destination)"
    } else {
        plan.destination.as_str()
    };
    format!(
        "{marker} {}  {destination}  {}..{}  [{} activities]",
        plan.id,
        plan.start_date,
        plan.end_date,
        plan.activities.len()
    )
}

/// Full itinerary for `plan show`.
pub(super) fn format_plan(plan: &Plan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}  {}", plan.id, plan.destination);
    let _ = writeln!(out, "{} to {}", plan.start_date, plan.end_date);

    for (i, activity) in plan.activities.iter().enumerate() {
        let time = activity.time.as_deref().unwrap_or("--:--");
        let _ = write!(out, "\n{:>2}. {time}  {}", i + 1, activity.name);
        if !activity.location.is_empty() {
            let _ = write!(out, " @ {}", activity.location);
        }
        if let Some(minutes) = activity.duration_minutes {
            let _ = write!(out, " ({minutes} min)");
        }
        out.push('\n');
        if !activity.description.is_empty() {
            let _ = writeln!(out, "    {}", activity.description);
        }
        for trigger in &activity.triggers {
            let _ = writeln!(out, "    ↳ {}", describe_trigger(trigger));
        }
    }
    out
}

/// Short human-readable description of when a trigger fires.
pub(super) fn describe_trigger(trigger: &Trigger) -> String {
    let condition = match trigger {
        Trigger::Location {
            target, radius_km, ..
        } => format!(
            "within {radius_km} km of {:.4}, {:.4}",
            target.latitude, target.longitude
        ),
        Trigger::Time { at, .. } => format!("from {at}"),
        Trigger::Weather { condition, .. } => format!("when weather is {condition}"),
        Trigger::Inert(_) => format!("{} (never fires)", trigger.kind()),
    };
    if trigger.message().is_empty() {
        condition
    } else {
        format!("{condition}: \"{}\"", trigger.message())
    }
}

/// One inbox row for `sim inbox`.
pub(super) fn format_notification(index: usize, n: &Notification) -> String {
    let marker = if n.read { " " } else { "●" };
    format!(
        "{marker} [{index}] {}  {} ({}): {}",
        n.time, n.title, n.kind, n.message
    )
}

/// The traveler's situation for `sim status`.
pub(super) fn format_status(sim: &Simulation, plan: Option<&Plan>) -> String {
    let traveler = &sim.traveler;
    let info = traveler.time_info();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Location: {} ({:.4}, {:.4})",
        traveler.location.name,
        traveler.location.coordinate.latitude,
        traveler.location.coordinate.longitude
    );
    let _ = writeln!(
        out,
        "Time:     {} {} {:02}:{:02} ({})",
        info.weekday, info.date, info.hour, info.minute, info.time_of_day
    );
    let _ = writeln!(
        out,
        "Weather:  {}, {}°C",
        traveler.weather.condition, traveler.weather.temperature
    );
    let _ = writeln!(
        out,
        "Inbox:    {} unread / {} total",
        traveler.unread().count(),
        traveler.notifications.len()
    );
    if sim.fired.is_empty() {
        let _ = writeln!(out, "Fired:    none");
    } else {
        let _ = writeln!(out, "Fired:    {} trigger(s) holding", sim.fired.len());
    }

    match plan {
        Some(plan) => {
            let next = plan
                .activities
                .get(sim.next_activity)
                .map_or("(itinerary complete)", |a| a.name.as_str());
            let _ = writeln!(out, "Plan:     {} ({})", plan.id, plan.destination);
            let _ = writeln!(out, "Next:     {next}");
        }
        None => {
            let _ = writeln!(out, "Plan:     (none)");
        }
    }
    out
}

/// What `sim next` did.
pub(super) fn format_advance(advance: &Advance) -> String {
    match advance {
        Advance::NothingToDo => "No activities to visit; generate or import a plan first.\n".into(),
        Advance::Completed => "All activities done. Starting over from the first one.\n".into(),
        Advance::Arrived {
            index,
            name,
            path,
            notifications,
        } => {
            let mut out = format!(
                "Arrived at #{}: {name} ({} point(s) walked)\n",
                index + 1,
                path.len()
            );
            for n in notifications {
                let _ = writeln!(out, "🔔 [{}] {}: {}", n.kind, n.title, n.message);
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use jiff::Timestamp;

    use crate::geo::Coordinate;
    use crate::model::{PlanDraft, TriggerSpec};

    fn plan() -> Plan {
        let draft: PlanDraft = serde_json::from_value(serde_json::json!({
            "destination": "Seoul",
            "start_date": "2026-10-20",
            "end_date": "2026-10-21",
            "activities": [{
                "name": "Palace tour",
                "location": "Gyeongbokgung Palace",
                "time": "09:00",
                "duration_minutes": 120,
                "triggers": [{"type": "time", "time": "09:00", "message": "Go"}]
            }]
        }))
        .unwrap();
        Plan::from_draft("plan_20261019_080000".into(), draft, Timestamp::now())
    }

    #[test]
    fn plan_line_marks_current() {
        let line = format_plan_line(&plan(), true);
        assert_eq!(
            line,
            "* plan_20261019_080000  Seoul  2026-10-20..2026-10-21  [1 activities]"
        );
        assert!(format_plan_line(&plan(), false).starts_with("  plan_"));
    }

    #[test]
    fn plan_lists_activities_and_triggers() {
        let text = format_plan(&plan());
        assert!(text.contains(" 1. 09:00  Palace tour @ Gyeongbokgung Palace (120 min)"));
        assert!(text.contains("↳ from 09:00: \"Go\""));
    }

    #[test]
    fn describe_each_trigger_kind() {
        let cases = [
            (
                Trigger::Location {
                    target: Coordinate::new(37.5665, 126.978),
                    radius_km: 0.5,
                    message: String::new(),
                },
                "within 0.5 km of 37.5665, 126.9780",
            ),
            (
                Trigger::Weather {
                    condition: "Rainy".into(),
                    message: String::new(),
                },
                "when weather is Rainy",
            ),
            (
                Trigger::Inert(TriggerSpec {
                    kind: Some("crowd".into()),
                    ..TriggerSpec::default()
                }),
                "crowd (never fires)",
            ),
        ];
        for (trigger, expected) in cases {
            assert_eq!(describe_trigger(&trigger), expected);
        }
    }

    #[test]
    fn notification_row_shows_index_and_read_state() {
        let plan = plan();
        let activity = &plan.activities[0];
        let mut n = Notification::new(&plan.id, activity, 0, &activity.triggers[0], "09:00".into());

        assert_eq!(
            format_notification(3, &n),
            "● [3] 09:00  Palace tour (time): Go"
        );
        n.read = true;
        assert!(format_notification(3, &n).starts_with("  [3]"));
    }

    #[test]
    fn advance_outcomes() {
        assert!(format_advance(&Advance::NothingToDo).starts_with("No activities"));
        assert!(format_advance(&Advance::Completed).starts_with("All activities done"));

        let arrived = Advance::Arrived {
            index: 0,
            name: "Palace tour".into(),
            path: vec![Coordinate::new(0.0, 0.0); 11],
            notifications: vec![],
        };
        assert_eq!(
            format_advance(&arrived),
            "Arrived at #1: Palace tour (11 point(s) walked)\n"
        );
    }

    #[test]
    fn status_without_plan() {
        let text = format_status(&Simulation::default(), None);
        assert!(text.contains("Location: Seoul City Hall (37.5665, 126.9780)"));
        assert!(text.contains("Plan:     (none)"));
        assert!(text.contains("Fired:    none"));
    }
}
