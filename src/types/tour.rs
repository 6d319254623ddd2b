//! Tour definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single step of a tour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position in the tour
    pub order: u32,
    pub title: String,
    pub description: String,
}

/// A guided tour as stored in the catalog
///
/// Steps are kept sorted by `order`, and the orders always form the
/// contiguous range `1..=steps.len()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourDefinition {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<Step>,
    pub created_at: DateTime<Utc>,
}

impl TourDefinition {
    /// Number of steps in the tour
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Whether `order` names one of this tour's steps
    pub fn has_step(&self, order: u32) -> bool {
        order >= 1 && (order as usize) <= self.steps.len()
    }
}

/// Step payload of a create-tour request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewStep {
    #[serde(default)]
    pub order: Option<u32>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /api/tours`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTour {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<NewStep>,
}

impl NewTour {
    /// Build a request with `count` numbered steps, mostly for tests and seeding
    pub fn with_steps(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            description: None,
            steps: (1..=count)
                .map(|order| NewStep {
                    order: Some(order),
                    title: format!("Step {}", order),
                    description: format!("Description for step {}", order),
                })
                .collect(),
        }
    }
}
