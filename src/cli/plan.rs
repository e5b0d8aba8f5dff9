//! Plan commands: generate, modify, import, list, show, use, add-activity, clear.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::Config;
use crate::model::{Activity, PlanDraft};
use crate::planner::{HttpLlm, PlanGenerator, PlannerError};
use crate::storage::{PlanStore, Storage};

use super::format::{format_plan, format_plan_line};

#[derive(Debug, Subcommand)]
pub enum PlanCommand {
    /// Ask the model for a new plan. It becomes the current plan.
    Generate {
        /// Free-text travel request.
        request: String,
    },

    /// Ask the model to revise the current plan.
    Modify {
        /// What to change.
        request: String,
    },

    /// Store a plan from a JSON file. It becomes the current plan.
    Import {
        /// JSON file in the planner's plan shape.
        file: PathBuf,
    },

    /// List all plans. The current one is marked with `*`.
    List,

    /// Show a plan's itinerary. Defaults to the current plan.
    Show {
        /// Plan id.
        id: Option<String>,

        /// Print the stored JSON instead.
        #[arg(long)]
        json: bool,
    },

    /// Make a plan current.
    Use {
        /// Plan id.
        id: String,
    },

    /// Append an activity, read from a JSON file, to a plan's itinerary.
    AddActivity {
        /// JSON file with one activity.
        file: PathBuf,

        /// Plan id. Defaults to the current plan.
        #[arg(long)]
        plan: Option<String>,
    },

    /// Delete every plan.
    Clear,
}

pub(super) fn run(storage: &Storage, command: PlanCommand) -> Result<(), String> {
    let mut store = storage
        .plans()
        .map_err(|e| format!("failed to open plans: {e}"))?;

    match command {
        PlanCommand::Generate { request } => cmd_generate(&mut store, &request),
        PlanCommand::Modify { request } => cmd_modify(&mut store, &request),
        PlanCommand::Import { file } => cmd_import(&mut store, &file),
        PlanCommand::List => {
            cmd_list(&store);
            Ok(())
        }
        PlanCommand::Show { id, json } => cmd_show(&store, id.as_deref(), json),
        PlanCommand::Use { id } => cmd_use(&mut store, &id),
        PlanCommand::AddActivity { file, plan } => {
            cmd_add_activity(&mut store, &file, plan.as_deref())
        }
        PlanCommand::Clear => cmd_clear(&mut store),
    }
}

fn generator() -> Result<PlanGenerator<HttpLlm>, String> {
    let config = Config::load().map_err(|e| e.to_string())?;
    let client = HttpLlm::from_config(&config).map_err(|e| e.to_string())?;
    Ok(PlanGenerator::new(client))
}

/// Renders a planner error, showing the raw reply when the model went off-script.
fn describe_planner_error(e: &PlannerError) -> String {
    match e {
        PlannerError::MalformedResponse { raw, .. } => format!("{e}\n\nModel reply:\n{raw}"),
        _ => e.to_string(),
    }
}

fn cmd_generate(store: &mut PlanStore, request: &str) -> Result<(), String> {
    let id = generator()?
        .generate(store, request)
        .map_err(|e| describe_planner_error(&e))?;
    println!("{id}");
    Ok(())
}

fn cmd_modify(store: &mut PlanStore, request: &str) -> Result<(), String> {
    let id = generator()?
        .modify(store, request)
        .map_err(|e| describe_planner_error(&e))?;
    eprintln!("Plan {id} updated");
    Ok(())
}

fn cmd_import(store: &mut PlanStore, file: &Path) -> Result<(), String> {
    let draft: PlanDraft = read_json_file(file)?;
    let id = store
        .create_plan(draft)
        .map_err(|e| format!("failed to store plan: {e}"))?;
    println!("{id}");
    Ok(())
}

fn cmd_list(store: &PlanStore) {
    if store.plans().is_empty() {
        println!("No plans");
        return;
    }
    let current = store.current_plan_id();
    for plan in store.plans() {
        println!("{}", format_plan_line(plan, current == Some(plan.id.as_str())));
    }
}

fn cmd_show(store: &PlanStore, id: Option<&str>, json: bool) -> Result<(), String> {
    let plan = match id {
        Some(id) => store
            .get_plan(id)
            .ok_or_else(|| format!("no plan with id '{id}'"))?,
        None => store
            .current_plan()
            .ok_or("no current plan; generate or import one first")?,
    };

    if json {
        let json = serde_json::to_string_pretty(plan)
            .map_err(|e| format!("failed to serialize plan: {e}"))?;
        println!("{json}");
    } else {
        print!("{}", format_plan(plan));
    }
    Ok(())
}

fn cmd_use(store: &mut PlanStore, id: &str) -> Result<(), String> {
    let found = store
        .set_current_plan(id)
        .map_err(|e| format!("failed to save plans: {e}"))?;
    if !found {
        return Err(format!("no plan with id '{id}'"));
    }
    eprintln!("Current plan: {id}");
    Ok(())
}

fn cmd_add_activity(store: &mut PlanStore, file: &Path, plan: Option<&str>) -> Result<(), String> {
    let activity: Activity = read_json_file(file)?;
    let id = match plan {
        Some(id) => id.to_string(),
        None => store
            .current_plan_id()
            .ok_or("no current plan; pass --plan <id>")?
            .to_string(),
    };

    let name = activity.name.clone();
    let added = store
        .add_activity(&id, activity)
        .map_err(|e| format!("failed to save plans: {e}"))?;
    if !added {
        return Err(format!("no plan with id '{id}'"));
    }
    eprintln!("Added '{name}' to {id}");
    Ok(())
}

fn cmd_clear(store: &mut PlanStore) -> Result<(), String> {
    let count = store.plans().len();
    store
        .clear()
        .map_err(|e| format!("failed to clear plans: {e}"))?;
    eprintln!("Removed {count} plan(s)");
    Ok(())
}

fn read_json_file<T: serde::de::DeserializeOwned>(file: &Path) -> Result<T, String> {
    let json = fs::read_to_string(file)
        .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
    serde_json::from_str(&json).map_err(|e| format!("invalid JSON in {}: {e}", file.display()))
}
