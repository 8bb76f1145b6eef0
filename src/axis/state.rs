use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisState {
    Ready,
    Moving,
}

impl AxisState {
    pub fn is_moving(&self) -> bool {
        matches!(self, AxisState::Moving)
    }
}

impl std::fmt::Display for AxisState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisState::Ready => write!(f, "Ready"),
            AxisState::Moving => write!(f, "Moving"),
        }
    }
}
