pub mod display;
pub mod terminal;

use std::sync::Arc;

use tracing::debug;

use crate::{
    axis::{state::AxisState, Axis},
    clock::Clock,
};
use display::{ProgressDisplay, ProgressFrame};

/// Progress of one axis towards one target, pushed to a display.
///
/// The view owns no axis state. Start position and total displacement are
/// captured when the view is opened and are not rescaled afterwards.
pub struct ProgressView {
    axis: Arc<dyn Axis>,
    clock: Arc<dyn Clock>,
    display: Box<dyn ProgressDisplay>,
    label: String,
    unit: String,
    initial_position: f64,
    target_position: f64,
    total_displacement: f64,
    opened_at: f64,
    last_sample: Option<(f64, f64)>,
    finished: bool,
    closed: bool,
}

impl ProgressView {
    pub async fn new(
        axis: Arc<dyn Axis>,
        target: f64,
        display: Box<dyn ProgressDisplay>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let initial_position = axis.position().await;
        let opened_at = clock.now();
        Self {
            label: axis.name().to_string(),
            unit: axis.unit().to_string(),
            axis,
            clock,
            display,
            initial_position,
            target_position: target,
            total_displacement: (target - initial_position).abs(),
            opened_at,
            last_sample: None,
            finished: false,
            closed: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn axis(&self) -> &Arc<dyn Axis> {
        &self.axis
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn initial_position(&self) -> f64 {
        self.initial_position
    }

    pub fn total_displacement(&self) -> f64 {
        self.total_displacement
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub async fn update(&mut self) -> AxisState {
        self.update_with(None).await
    }

    /// Renders one frame from the axis, or from `position` when given.
    ///
    /// The first update that sees the axis ready is rendered and then marks
    /// the view finished; later calls draw nothing and report `Ready`.
    pub async fn update_with(&mut self, position: Option<f64>) -> AxisState {
        if self.finished {
            return AxisState::Ready;
        }

        let status = self.axis.status().await;
        let position = position.unwrap_or(status.position);
        let now = self.clock.now();
        let frame = self.frame(position, status.state, now);
        self.last_sample = Some((now, frame.displacement));
        self.display.render(&frame);

        if !status.state.is_moving() {
            debug!(
                "View {} finished at {} (target {}) after {:.3}s",
                self.label,
                frame.description,
                self.position_format(self.target_position),
                frame.elapsed
            );
            self.finished = true;
        }
        status.state
    }

    pub fn position_format(&self, position: f64) -> String {
        format!("{:.3}{}", position, self.unit)
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.display.close();
            self.closed = true;
        }
    }

    fn frame(&self, position: f64, state: AxisState, now: f64) -> ProgressFrame {
        let displacement = (position - self.initial_position).abs();
        let fraction = if self.total_displacement > 0.0 {
            (displacement / self.total_displacement).min(1.0)
        } else {
            1.0
        };
        let elapsed = (now - self.opened_at).max(0.0);

        // Rate over the last poll interval, falling back to the average.
        let rate = match self.last_sample {
            Some((then, previous)) if now > then => Some((displacement - previous).abs() / (now - then)),
            _ if elapsed > 0.0 => Some(displacement / elapsed),
            _ => None,
        };
        let remaining = (self.total_displacement - displacement).max(0.0);
        let eta = match rate {
            _ if remaining == 0.0 => Some(0.0),
            Some(rate) if rate > 0.0 => Some(remaining / rate),
            _ => None,
        };

        ProgressFrame {
            description: format!("{}={}", self.label, self.position_format(position)),
            unit: self.unit.clone(),
            position,
            displacement,
            total: self.total_displacement,
            fraction,
            elapsed,
            rate,
            eta,
            state,
        }
    }
}

impl Drop for ProgressView {
    fn drop(&mut self) {
        self.close();
    }
}
