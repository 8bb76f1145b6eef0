use tracing::{debug, info};

use crate::axis::state::AxisState;

/// Everything a display needs to draw one axis at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressFrame {
    pub description: String,
    pub unit: String,
    pub position: f64,
    pub displacement: f64,
    pub total: f64,
    /// In `[0, 1]`.
    pub fraction: f64,
    /// Seconds since the view was opened.
    pub elapsed: f64,
    /// Units per second.
    pub rate: Option<f64>,
    /// Seconds left at the current rate.
    pub eta: Option<f64>,
    pub state: AxisState,
}

impl ProgressFrame {
    pub fn percentage(&self) -> f64 {
        self.fraction * 100.0
    }

    /// `Δp=20.00/45.00deg Δt=00:02 ETA:00:02, v:10.00deg/s`
    pub fn summary(&self) -> String {
        let rate = match self.rate {
            Some(rate) => format!("{:.2}{}/s", rate, self.unit),
            None => format!("?{}/s", self.unit),
        };
        format!(
            "\u{394}p={:.2}/{:.2}{} \u{394}t={} ETA:{}, v:{}",
            self.displacement,
            self.total,
            self.unit,
            format_interval(Some(self.elapsed)),
            format_interval(self.eta),
            rate
        )
    }
}

/// `MM:SS`, or `H:MM:SS` past the hour. `?` when unknown.
pub fn format_interval(seconds: Option<f64>) -> String {
    let seconds = match seconds {
        Some(s) if s.is_finite() && s >= 0.0 => s as u64,
        _ => return "?".to_string(),
    };
    let (hours, rest) = (seconds / 3600, seconds % 3600);
    let (minutes, secs) = (rest / 60, rest % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Output side of a progress view.
pub trait ProgressDisplay: Send {
    fn render(&mut self, frame: &ProgressFrame);
    fn close(&mut self);
}

/// Creates one display per axis taking part in a run.
pub trait ProgressRenderer: Send + Sync {
    fn create(&self, label: &str, index: usize) -> Box<dyn ProgressDisplay>;
}

/// Renders frames as log lines. Intended for non-interactive output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRenderer;

impl ProgressRenderer for LogRenderer {
    fn create(&self, label: &str, index: usize) -> Box<dyn ProgressDisplay> {
        Box::new(LogDisplay {
            label: label.to_string(),
            index,
            last: None,
        })
    }
}

pub struct LogDisplay {
    label: String,
    index: usize,
    last: Option<ProgressFrame>,
}

impl ProgressDisplay for LogDisplay {
    fn render(&mut self, frame: &ProgressFrame) {
        debug!(
            "[{}] {} {:>3.0}% {}",
            self.index,
            frame.description,
            frame.percentage(),
            frame.summary()
        );
        self.last = Some(frame.clone());
    }

    fn close(&mut self) {
        match self.last.take() {
            Some(frame) => info!(
                "[{}] {} finished at {} ({}): {}",
                self.index,
                self.label,
                frame.description,
                frame.state,
                frame.summary()
            ),
            None => info!("[{}] {} closed without progress", self.index, self.label),
        }
    }
}
