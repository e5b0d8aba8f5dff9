//! Plan storage: every plan in one JSON document, plus the current-plan pointer.

use std::path::PathBuf;

use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{Activity, Plan, PlanDraft, PlanPatch};

use super::{Result, read_json, write_json};

/// On-disk layout of `travel_plans.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct PlanDocument {
    plans: Vec<Plan>,
    current_plan_id: Option<String>,
}

/// All plans, held in memory and written back whole on every change.
///
/// Unknown plan ids are not errors: mutations report `false` and leave
/// the store untouched.
pub struct PlanStore {
    path: PathBuf,
    document: PlanDocument,
}

impl PlanStore {
    /// Loads the store from `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let document = read_json(&path)?.unwrap_or_default();
        debug!(path = %path.display(), "opened plan store");
        Ok(Self { path, document })
    }

    /// Stores a new plan and makes it current. Returns its id.
    pub fn create_plan(&mut self, draft: PlanDraft) -> Result<String> {
        let id = self.next_id(&Zoned::now());
        let plan = Plan::from_draft(id.clone(), draft, Timestamp::now());
        info!(plan_id = %id, activities = plan.activities.len(), "created plan");

        self.document.plans.push(plan);
        self.document.current_plan_id = Some(id.clone());
        self.save()?;
        Ok(id)
    }

    /// The current plan, if the pointer is set and still resolves.
    pub fn current_plan(&self) -> Option<&Plan> {
        self.get_plan(self.document.current_plan_id.as_deref()?)
    }

    pub fn current_plan_id(&self) -> Option<&str> {
        self.document.current_plan_id.as_deref()
    }

    pub fn get_plan(&self, id: &str) -> Option<&Plan> {
        self.document.plans.iter().find(|p| p.id == id)
    }

    /// All plans in creation order.
    pub fn plans(&self) -> &[Plan] {
        &self.document.plans
    }

    /// Applies a partial update to the plan with `id`.
    pub fn update_plan(&mut self, id: &str, patch: PlanPatch) -> Result<bool> {
        let Some(plan) = self.plan_mut(id) else {
            debug!(plan_id = id, "update skipped: no such plan");
            return Ok(false);
        };
        plan.apply(patch);
        plan.modified_at = Timestamp::now();
        self.save()?;
        Ok(true)
    }

    /// Appends an activity to the end of the plan's itinerary.
    pub fn add_activity(&mut self, id: &str, activity: Activity) -> Result<bool> {
        let Some(plan) = self.plan_mut(id) else {
            debug!(plan_id = id, "add activity skipped: no such plan");
            return Ok(false);
        };
        plan.activities.push(activity);
        plan.modified_at = Timestamp::now();
        self.save()?;
        Ok(true)
    }

    /// Points the current-plan pointer at `id`, if such a plan exists.
    pub fn set_current_plan(&mut self, id: &str) -> Result<bool> {
        if self.get_plan(id).is_none() {
            return Ok(false);
        }
        self.document.current_plan_id = Some(id.to_string());
        self.save()?;
        Ok(true)
    }

    /// Drops every plan and the current-plan pointer.
    pub fn clear(&mut self) -> Result<()> {
        info!(plans = self.document.plans.len(), "clearing plan store");
        self.document = PlanDocument::default();
        self.save()
    }

    fn plan_mut(&mut self, id: &str) -> Option<&mut Plan> {
        self.document.plans.iter_mut().find(|p| p.id == id)
    }

    /// `plan_YYYYMMDD_HHMMSS`, with `_N` appended if that second is taken.
    fn next_id(&self, now: &Zoned) -> String {
        let base = now.strftime("plan_%Y%m%d_%H%M%S").to_string();
        if self.get_plan(&base).is_none() {
            return base;
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if self.get_plan(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    fn save(&self) -> Result<()> {
        write_json(&self.path, &self.document)
    }
}
