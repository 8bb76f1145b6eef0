#[derive(Debug, Clone, PartialEq)]
pub enum AxisError {
    InvalidState { axis: String, message: String },
    DegenerateMotion { axis: String, speed: f64, distance: f64 },
    NonFiniteTarget { axis: String, target: f64 },
    NonFinitePosition { axis: String, position: f64 },
}

impl AxisError {
    pub fn invalid_state(axis: &str, message: &str) -> Self {
        AxisError::InvalidState {
            axis: axis.to_string(),
            message: message.to_string(),
        }
    }

    pub fn axis(&self) -> &str {
        match self {
            AxisError::InvalidState { axis, .. } => axis,
            AxisError::DegenerateMotion { axis, .. } => axis,
            AxisError::NonFiniteTarget { axis, .. } => axis,
            AxisError::NonFinitePosition { axis, .. } => axis,
        }
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, AxisError::InvalidState { .. })
    }

    pub fn is_degenerate_motion(&self) -> bool {
        matches!(self, AxisError::DegenerateMotion { .. })
    }
}

impl std::fmt::Display for AxisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisError::InvalidState { axis, message } => {
                write!(f, "Invalid state on axis {}: {}", axis, message)
            }
            AxisError::DegenerateMotion {
                axis,
                speed,
                distance,
            } => write!(
                f,
                "Degenerate motion on axis {}: cannot travel {} at speed {}",
                axis, distance, speed
            ),
            AxisError::NonFiniteTarget { axis, target } => {
                write!(f, "Non-finite target for axis {}: {}", axis, target)
            }
            AxisError::NonFinitePosition { axis, position } => {
                write!(f, "Non-finite position for axis {}: {}", axis, position)
            }
        }
    }
}

impl std::error::Error for AxisError {}
