use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::axis::{status::AxisStatus, Axis};

/// An axis paired with the position it should be driven to.
#[derive(Clone)]
pub struct AxisMove {
    pub axis: Arc<dyn Axis>,
    pub target: f64,
}

impl std::fmt::Debug for AxisMove {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisMove")
            .field("axis", &self.axis.name())
            .field("target", &self.target)
            .finish()
    }
}

impl AxisMove {
    pub fn new(axis: Arc<dyn Axis>, target: f64) -> Self {
        Self { axis, target }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunOutcome {
    Completed,
    Aborted,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub outcome: RunOutcome,
    /// Seconds on the runner's clock.
    pub elapsed: f64,
    pub final_statuses: Vec<AxisStatus>,
}

impl RunReport {
    pub fn is_aborted(&self) -> bool {
        self.outcome == RunOutcome::Aborted
    }

    pub fn position_of(&self, axis: &str) -> Option<f64> {
        self.final_statuses
            .iter()
            .find(|s| s.name == axis)
            .map(|s| s.position)
    }
}
