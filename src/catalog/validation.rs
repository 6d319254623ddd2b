//! Field rules for tours submitted by the authoring form

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::{NewTour, Step, MIN_TOUR_STEPS};

/// A create-tour request that passed validation
#[derive(Debug, Clone)]
pub struct ValidTour {
    pub name: String,
    pub description: Option<String>,
    /// Sorted by order, orders are `1..=len`
    pub steps: Vec<Step>,
}

/// Check a create-tour request and normalize its steps
///
/// Steps without an explicit order take their 1-based position. Every
/// problem found is reported, joined into a single message.
pub fn validate_new_tour(request: NewTour) -> AnalyticsResult<ValidTour> {
    let mut problems = Vec::new();

    let name = request.name.trim().to_string();
    if name.is_empty() {
        problems.push("Tour name is required".to_string());
    }

    if request.steps.len() < MIN_TOUR_STEPS {
        problems.push(format!("A tour must have at least {} steps", MIN_TOUR_STEPS));
    }

    let mut steps = Vec::with_capacity(request.steps.len());
    for (index, step) in request.steps.into_iter().enumerate() {
        let position = index + 1;
        let order = step.order.unwrap_or(position as u32);

        if order < 1 {
            problems.push(format!("Step {}: order must be at least 1", position));
        }
        if step.title.trim().is_empty() {
            problems.push(format!("Step {}: step title is required", position));
        }
        if step.description.trim().is_empty() {
            problems.push(format!("Step {}: step description is required", position));
        }

        steps.push(Step {
            order,
            title: step.title.trim().to_string(),
            description: step.description.trim().to_string(),
        });
    }

    steps.sort_by_key(|s| s.order);
    let contiguous = steps
        .iter()
        .enumerate()
        .all(|(i, s)| s.order as usize == i + 1);
    if !contiguous && !steps.is_empty() {
        problems.push("Step orders must be unique and run from 1 without gaps".to_string());
    }

    if !problems.is_empty() {
        return Err(AnalyticsError::Validation(problems.join("; ")));
    }

    let description = request
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(ValidTour {
        name,
        description,
        steps,
    })
}
