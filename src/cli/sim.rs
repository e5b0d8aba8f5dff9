//! Simulation commands: move the traveler, set the clock and weather, read the inbox.
//!
//! Every command loads the saved session, applies one change, re-checks
//! the current plan's triggers where the change could fire them, and
//! saves the session back.

use clap::Subcommand;

use crate::geo::Coordinate;
use crate::landmarks;
use crate::model::Notification;
use crate::simulator::{MOVEMENT_STEPS, Simulation, parse_clock};
use crate::storage::{PlanStore, Storage};

use super::format::{format_advance, format_notification, format_status};

#[derive(Debug, Subcommand)]
pub enum SimCommand {
    /// Show where and when the traveler is.
    Status,

    /// Move the traveler, then check triggers on arrival.
    Move {
        /// Landmark name (see `itinera landmarks`).
        #[arg(long, conflicts_with_all = ["lat", "lon"], required_unless_present = "lat")]
        to: Option<String>,

        /// Latitude in decimal degrees.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude in decimal degrees.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Name for a raw coordinate.
        #[arg(long, default_value = "Current location")]
        name: String,

        /// Points along the way.
        #[arg(long, default_value_t = MOVEMENT_STEPS)]
        steps: u32,

        /// Advance the clock by the walking time.
        #[arg(long)]
        walk: bool,
    },

    /// Set or advance the clock, then check triggers.
    Time {
        /// New time of day, "HH:MM". The date is kept.
        #[arg(long, conflicts_with = "advance", required_unless_present = "advance")]
        set: Option<String>,

        /// Minutes to move the clock forward.
        #[arg(long)]
        advance: Option<i64>,
    },

    /// Set the weather, then check triggers.
    Weather {
        /// Condition, matched exactly by weather triggers (e.g. "Rainy").
        condition: String,

        /// Temperature in °C. Defaults to the current one.
        #[arg(long, allow_hyphen_values = true)]
        temp: Option<i32>,
    },

    /// Check the current plan's triggers against the traveler's state.
    Check,

    /// Walk to the next activity in the current plan.
    Next,

    /// Show notifications, newest last.
    Inbox {
        /// Only unread ones.
        #[arg(long, conflicts_with = "clear")]
        unread: bool,

        /// Empty the inbox instead.
        #[arg(long)]
        clear: bool,
    },

    /// Mark a notification read.
    Read {
        /// Inbox index, as shown by `sim inbox`.
        index: usize,
    },

    /// Rewind to the first activity and re-arm every trigger.
    Reset {
        /// Also forget the traveler: position, clock, weather, and inbox.
        #[arg(long)]
        all: bool,
    },
}

pub(super) fn run(storage: &Storage, command: SimCommand) -> Result<(), String> {
    if let SimCommand::Reset { all: true } = command {
        storage
            .clear_session()
            .map_err(|e| format!("failed to clear session: {e}"))?;
        eprintln!("Session cleared");
        return Ok(());
    }

    let store = storage
        .plans()
        .map_err(|e| format!("failed to open plans: {e}"))?;
    let mut sim = storage
        .load_session()
        .map_err(|e| format!("failed to load session: {e}"))?;

    match command {
        SimCommand::Status => {
            print!("{}", format_status(&sim, store.current_plan()));
            return Ok(());
        }
        SimCommand::Inbox { clear: true, .. } => {
            let count = sim.traveler.notifications.len();
            sim.traveler.clear_notifications();
            eprintln!("Removed {count} notification(s)");
        }
        SimCommand::Inbox { unread, .. } => {
            cmd_inbox(&sim, unread);
            return Ok(());
        }
        SimCommand::Move {
            to,
            lat,
            lon,
            name,
            steps,
            walk,
        } => cmd_move(&mut sim, &store, to.as_deref(), lat.zip(lon), name, steps, walk)?,
        SimCommand::Time { set, advance } => {
            cmd_time(&mut sim, &store, set.as_deref(), advance)?;
        }
        SimCommand::Weather { condition, temp } => {
            let temperature = temp.unwrap_or(sim.traveler.weather.temperature);
            sim.traveler.update_weather(condition, temperature);
            eprintln!(
                "Weather: {}, {temperature}°C",
                sim.traveler.weather.condition
            );
            print_new(&sim.check(store.current_plan()));
        }
        SimCommand::Check => {
            let fresh = sim.check(store.current_plan());
            if fresh.is_empty() {
                eprintln!("Nothing new");
            }
            print_new(&fresh);
        }
        SimCommand::Next => {
            let advance = sim.advance(store.current_plan());
            print!("{}", format_advance(&advance));
        }
        SimCommand::Read { index } => {
            if !sim.traveler.mark_read(index) {
                return Err(format!("no notification at index {index}"));
            }
        }
        SimCommand::Reset { .. } => {
            sim.reset();
            eprintln!("Itinerary rewound; triggers re-armed");
        }
    }

    storage
        .save_session(&sim)
        .map_err(|e| format!("failed to save session: {e}"))
}

fn cmd_move(
    sim: &mut Simulation,
    store: &PlanStore,
    to: Option<&str>,
    coordinate: Option<(f64, f64)>,
    name: String,
    steps: u32,
    walk: bool,
) -> Result<(), String> {
    let (target, name) = match (to, coordinate) {
        (Some(to), _) => {
            let landmark = landmarks::find(to)
                .ok_or_else(|| format!("unknown landmark '{to}'; see `itinera landmarks`"))?;
            (landmark.coordinate, landmark.name.to_string())
        }
        (None, Some((lat, lon))) => (Coordinate::new(lat, lon), name),
        (None, None) => return Err("specify --to or --lat/--lon".to_string()),
    };

    let path = sim.traveler.simulate_movement(target, steps);
    let minutes = sim.traveler.walking_minutes_to(target);
    sim.traveler.update_location(target, name);
    if walk {
        sim.traveler
            .advance_time(minutes)
            .map_err(|e| format!("failed to advance clock: {e}"))?;
    }

    eprintln!(
        "Moved to {} via {} point(s){}",
        sim.traveler.location.name,
        path.len(),
        if walk {
            format!(", {minutes} min on foot")
        } else {
            String::new()
        }
    );
    print_new(&sim.check(store.current_plan()));
    Ok(())
}

fn cmd_time(
    sim: &mut Simulation,
    store: &PlanStore,
    set: Option<&str>,
    advance: Option<i64>,
) -> Result<(), String> {
    if let Some(set) = set {
        let time = parse_clock(set).ok_or_else(|| format!("'{set}' is not a valid HH:MM time"))?;
        let datetime = sim.traveler.datetime.date().to_datetime(time);
        sim.traveler.update_datetime(datetime);
    }
    if let Some(minutes) = advance {
        sim.traveler
            .advance_time(minutes)
            .map_err(|e| format!("failed to advance clock: {e}"))?;
    }
    eprintln!("Clock: {}", sim.traveler.datetime);
    print_new(&sim.check(store.current_plan()));
    Ok(())
}

fn cmd_inbox(sim: &Simulation, unread_only: bool) {
    let notifications = &sim.traveler.notifications;
    let unread = sim.traveler.unread().count();
    println!("Notifications ({unread} unread / {} total)", notifications.len());

    for (index, n) in notifications.iter().enumerate() {
        if unread_only && n.read {
            continue;
        }
        println!("{}", format_notification(index, n));
    }
}

fn print_new(notifications: &[Notification]) {
    for n in notifications {
        println!("🔔 [{}] {}: {}", n.kind, n.title, n.message);
    }
}
