pub mod config;
pub mod error;
pub mod motion;
pub mod simulated;
pub mod state;
pub mod status;

use config::AxisConfig;
use error::AxisError;
use motion::Motion;
use state::AxisState;
use status::AxisStatus;

/// One degree of freedom that can be driven to a target position.
///
/// Reads resolve any in-flight motion against the current time before
/// answering, so a finished motion is observed by whichever call comes
/// first.
#[async_trait::async_trait]
pub trait Axis: Send + Sync {
    fn name(&self) -> &str;
    fn config(&self) -> &AxisConfig;

    fn unit(&self) -> &str {
        &self.config().unit
    }

    /// Starts a motion towards `target`. `start_time` defaults to now.
    async fn start_move(&self, target: f64, start_time: Option<f64>) -> Result<(), AxisError>;

    /// Halts at the current position. Always leaves the axis ready.
    async fn stop(&self) -> Result<(), AxisError>;

    async fn status(&self) -> AxisStatus;

    async fn set_position(&self, position: f64) -> Result<(), AxisError>;

    async fn speed(&self) -> f64;
    async fn set_speed(&self, speed: f64);

    async fn position(&self) -> f64 {
        self.status().await.position
    }

    async fn state(&self) -> AxisState {
        self.status().await.state
    }

    async fn motion(&self) -> Option<Motion> {
        self.status().await.motion
    }
}
