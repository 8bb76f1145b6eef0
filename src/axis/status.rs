use serde::{Deserialize, Serialize};

use super::motion::Motion;
use super::state::AxisState;

/// Position, state and motion observed under one resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisStatus {
    pub name: String,
    pub state: AxisState,
    pub position: f64,
    pub motion: Option<Motion>,
}

impl AxisStatus {
    pub fn new(name: String, position: f64, motion: Option<Motion>) -> Self {
        let state = if motion.is_some() {
            AxisState::Moving
        } else {
            AxisState::Ready
        };
        Self {
            name,
            state,
            position,
            motion,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.state == AxisState::Moving
    }

    pub fn is_ready(&self) -> bool {
        self.state == AxisState::Ready
    }
}
