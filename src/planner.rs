//! Plan generation: free text in, structured plan out.
//!
//! The model is asked for a JSON plan shaped like [`PlanDraft`], grounded
//! in the landmark table so activities come with usable coordinates.
//! Whatever it returns is parsed once, here; the plan store only ever sees
//! well-formed drafts and patches.

mod extract;
mod llm;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::landmarks;
use crate::model::{PlanDraft, PlanPatch};
use crate::storage::{PlanStore, StorageError};

pub use extract::extract_json;
pub use llm::{HttpLlm, LlmClient};

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model returned no text")]
    EmptyReply,

    /// The reply wasn't a plan. `raw` is the full reply, for the user to see.
    #[error("model reply is not a valid plan: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("failed to encode current plan: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("no current plan to modify")]
    NoCurrentPlan,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = core::result::Result<T, PlannerError>;

const PLAN_SHAPE: &str = r#"{
  "destination": "Seoul",
  "start_date": "YYYY-MM-DD",
  "end_date": "YYYY-MM-DD",
  "activities": [
    {
      "name": "Activity name",
      "location": "Place name",
      "latitude": 37.5665,
      "longitude": 126.9780,
      "time": "HH:MM",
      "description": "What happens here",
      "duration_minutes": 60,
      "triggers": [
        {"type": "location", "latitude": 37.5665, "longitude": 126.9780, "radius": 0.5, "message": "You are near the place"},
        {"type": "time", "time": "09:00", "message": "Time to start"},
        {"type": "weather", "condition": "Rainy", "message": "Rain expected, consider an indoor option"}
      ]
    }
  ],
  "preferences": {"interests": ["culture", "food"], "pace": "relaxed"}
}"#;

fn generation_prompt() -> String {
    format!(
        "You are a travel planning expert. Turn the traveler's request into a \
         structured itinerary.\n\n\
         Every activity needs a place, a start time, coordinates, and a description, \
         plus triggers (location, time, or weather) that should notify the traveler.\n\n\
         Known Seoul landmarks and their coordinates:\n{}\n\n\
         Reply with JSON only, in exactly this shape:\n{PLAN_SHAPE}",
        landmarks::to_prompt_json()
    )
}

const MODIFICATION_PROMPT: &str = "You are a travel planning expert. You will be given \
    the traveler's current plan as JSON and a change they want. Reply with the revised \
    plan as JSON only, in the same shape. Fields you leave out stay as they are.";

/// Drafts and revises plans with a model, storing the results.
pub struct PlanGenerator<C> {
    client: C,
}

impl<C: LlmClient> PlanGenerator<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Asks the model for a plan, stores it as the current plan, and returns its id.
    pub fn generate(&self, store: &mut PlanStore, request: &str) -> Result<String> {
        let user = format!(
            "Turn this travel request into a structured plan:\n\n{request}\n\nReply with JSON only."
        );
        let reply = self.client.complete(&generation_prompt(), &user)?;
        let draft = parse_draft(reply)?;

        let id = store.create_plan(draft)?;
        info!(plan_id = %id, "generated plan");
        Ok(id)
    }

    /// Asks the model to revise the current plan and writes the revision back.
    pub fn modify(&self, store: &mut PlanStore, request: &str) -> Result<String> {
        let plan = store.current_plan().ok_or(PlannerError::NoCurrentPlan)?;
        let id = plan.id.clone();
        let current = serde_json::to_string_pretty(plan).map_err(PlannerError::Encode)?;

        let user = format!("Current plan:\n\n{current}\n\nRequested change: {request}");
        let reply = self.client.complete(MODIFICATION_PROMPT, &user)?;
        let patch = parse_patch(reply)?;

        if !store.update_plan(&id, patch)? {
            warn!(plan_id = %id, "plan vanished during modification");
            return Err(PlannerError::NoCurrentPlan);
        }
        info!(plan_id = %id, "modified plan");
        Ok(id)
    }
}

/// Parses a model reply into a new plan, keeping the reply around on failure.
pub fn parse_draft(reply: String) -> Result<PlanDraft> {
    parse_reply(reply)
}

/// Parses a model reply into a revision. Fields the reply leaves out are
/// left alone on the plan.
pub fn parse_patch(reply: String) -> Result<PlanPatch> {
    parse_reply(reply)
}

fn parse_reply<T: DeserializeOwned>(reply: String) -> Result<T> {
    serde_json::from_str(extract_json(&reply))
        .map_err(|source| PlannerError::MalformedResponse { source, raw: reply })
}
