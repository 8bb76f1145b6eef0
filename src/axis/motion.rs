use serde::{Deserialize, Serialize};

/// Snapshot of one motion, fixed when the motion starts.
///
/// Position during the motion is a pure function of time over this record;
/// nothing in it changes until the motion ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    pub start_position: f64,
    pub end_position: f64,
    pub start_time: f64,
    pub end_time: f64,
}

impl Motion {
    /// Plans a constant-speed motion. `speed` must be strictly positive
    /// unless `start_position == end_position`.
    pub(crate) fn plan(start_position: f64, end_position: f64, start_time: f64, speed: f64) -> Self {
        let distance = (end_position - start_position).abs();
        let duration = if distance == 0.0 { 0.0 } else { distance / speed };
        Self {
            start_position,
            end_position,
            start_time,
            end_time: start_time + duration,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn is_complete_at(&self, now: f64) -> bool {
        now >= self.end_time
    }

    /// Extrapolated position at `now`, clamped to the segment.
    pub fn position_at(&self, now: f64) -> f64 {
        if self.is_complete_at(now) {
            return self.end_position;
        }
        let duration = self.duration();
        if duration <= 0.0 {
            return self.end_position;
        }
        let fraction = ((now - self.start_time) / duration).clamp(0.0, 1.0);
        self.start_position + (self.end_position - self.start_position) * fraction
    }
}
