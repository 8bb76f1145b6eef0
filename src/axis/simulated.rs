use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{
    config::AxisConfig, error::AxisError, motion::Motion, status::AxisStatus, Axis,
};
use crate::clock::Clock;

/// An in-memory axis moving at constant speed.
///
/// No task drives it: the position of an active motion is extrapolated from
/// the clock whenever the axis is queried.
pub struct SimulatedAxis {
    name: String,
    config: AxisConfig,
    clock: Arc<dyn Clock>,
    inner: Mutex<AxisInner>,
}

struct AxisInner {
    position: f64,
    speed: f64,
    motion: Option<Motion>,
}

impl AxisInner {
    /// Current position at `now`. A motion that has reached its end time is
    /// collapsed into the stored position here, and only here.
    fn resolve(&mut self, now: f64) -> f64 {
        match self.motion {
            Some(motion) if motion.is_complete_at(now) => {
                self.position = motion.end_position;
                self.motion = None;
                self.position
            }
            Some(motion) => motion.position_at(now),
            None => self.position,
        }
    }
}

impl SimulatedAxis {
    /// Fails with `NonFinitePosition` unless `position` is finite.
    pub fn new(
        name: impl Into<String>,
        config: AxisConfig,
        position: f64,
        speed: f64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AxisError> {
        let name = name.into();
        if !position.is_finite() {
            return Err(AxisError::NonFinitePosition {
                axis: name,
                position,
            });
        }
        Ok(Self {
            name,
            config,
            clock,
            inner: Mutex::new(AxisInner {
                position,
                speed,
                motion: None,
            }),
        })
    }
}

#[async_trait::async_trait]
impl Axis for SimulatedAxis {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &AxisConfig {
        &self.config
    }

    async fn start_move(&self, target: f64, start_time: Option<f64>) -> Result<(), AxisError> {
        let mut inner = self.inner.lock().await;
        let now = self.clock.now();
        let current = inner.resolve(now);

        if inner.motion.is_some() {
            return Err(AxisError::invalid_state(
                &self.name,
                "cannot start motion while moving",
            ));
        }
        if !target.is_finite() {
            return Err(AxisError::NonFiniteTarget {
                axis: self.name.clone(),
                target,
            });
        }

        let distance = (target - current).abs();
        let degenerate = AxisError::DegenerateMotion {
            axis: self.name.clone(),
            speed: inner.speed,
            distance,
        };
        if !current.is_finite() {
            return Err(degenerate);
        }
        if distance > 0.0 && (inner.speed.is_nan() || inner.speed <= 0.0) {
            return Err(degenerate);
        }

        let motion = Motion::plan(current, target, start_time.unwrap_or(now), inner.speed);
        // NaN start time, or a duration that overflows.
        if !motion.end_time.is_finite() {
            return Err(degenerate);
        }

        info!(
            "Moving axis {} from {} to {} at speed {} ({:.3}s)",
            self.name,
            current,
            target,
            inner.speed,
            motion.duration()
        );
        inner.motion = Some(motion);
        Ok(())
    }

    async fn stop(&self) -> Result<(), AxisError> {
        let mut inner = self.inner.lock().await;
        let was_moving = inner.motion.is_some();
        let position = inner.resolve(self.clock.now());
        inner.position = position;
        inner.motion = None;
        if was_moving {
            info!("Stopped axis {} at {}", self.name, position);
        } else {
            debug!("Stop on idle axis {} at {}", self.name, position);
        }
        Ok(())
    }

    async fn status(&self) -> AxisStatus {
        let mut inner = self.inner.lock().await;
        let position = inner.resolve(self.clock.now());
        AxisStatus::new(self.name.clone(), position, inner.motion)
    }

    async fn set_position(&self, position: f64) -> Result<(), AxisError> {
        let mut inner = self.inner.lock().await;
        inner.resolve(self.clock.now());
        if inner.motion.is_some() {
            return Err(AxisError::invalid_state(
                &self.name,
                "cannot set position while moving",
            ));
        }
        if !position.is_finite() {
            return Err(AxisError::NonFinitePosition {
                axis: self.name.clone(),
                position,
            });
        }
        inner.position = position;
        inner.motion = None;
        Ok(())
    }

    async fn speed(&self) -> f64 {
        self.inner.lock().await.speed
    }

    async fn set_speed(&self, speed: f64) {
        self.inner.lock().await.speed = speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::state::AxisState;
    use crate::clock::ManualClock;
    use approx::assert_abs_diff_eq;

    fn axis_at(position: f64, speed: f64) -> (SimulatedAxis, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0.0));
        let axis = SimulatedAxis::new(
            "th",
            AxisConfig::new("deg"),
            position,
            speed,
            clock.clone(),
        )
        .unwrap();
        (axis, clock)
    }

    #[tokio::test]
    async fn test_move_extrapolates_then_arrives() {
        let (axis, clock) = axis_at(5.0, 10.0);
        axis.start_move(50.0, None).await.unwrap();

        let motion = axis.motion().await.unwrap();
        assert_abs_diff_eq!(motion.end_time, 4.5, epsilon = 1e-12);

        clock.set(2.0);
        assert_abs_diff_eq!(axis.position().await, 25.0, epsilon = 1e-9);
        assert_eq!(axis.state().await, AxisState::Moving);

        clock.set(5.0);
        assert_eq!(axis.position().await, 50.0);
        assert_eq!(axis.state().await, AxisState::Ready);
        assert!(axis.motion().await.is_none());
    }

    #[tokio::test]
    async fn test_completion_collapses_once() {
        let (axis, clock) = axis_at(0.0, 1.0);
        axis.start_move(2.0, None).await.unwrap();

        clock.set(3.0);
        assert_eq!(axis.position().await, 2.0);

        // Once collapsed, the motion no longer feeds the position.
        clock.set(1.0);
        assert_eq!(axis.position().await, 2.0);
        assert_eq!(axis.state().await, AxisState::Ready);
    }

    #[tokio::test]
    async fn test_second_start_is_rejected_and_keeps_motion() {
        let (axis, clock) = axis_at(0.0, 2.0);
        axis.start_move(10.0, None).await.unwrap();
        let before = axis.motion().await.unwrap();

        clock.set(1.0);
        let err = axis.start_move(-4.0, None).await.unwrap_err();
        assert!(err.is_invalid_state());
        assert_eq!(axis.motion().await, Some(before));
        assert_abs_diff_eq!(before.end_time, 5.0, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_zero_speed_is_degenerate() {
        let (axis, _clock) = axis_at(1.0, 0.0);
        let err = axis.start_move(3.0, None).await.unwrap_err();
        assert!(err.is_degenerate_motion());
        assert!(axis.motion().await.is_none());
        assert_eq!(axis.state().await, AxisState::Ready);
    }

    #[tokio::test]
    async fn test_negative_and_nan_speed_are_degenerate() {
        for speed in [-1.0, f64::NAN] {
            let (axis, _clock) = axis_at(1.0, speed);
            let err = axis.start_move(3.0, None).await.unwrap_err();
            assert!(err.is_degenerate_motion(), "speed {}", speed);
            assert!(axis.motion().await.is_none());
            assert_eq!(axis.state().await, AxisState::Ready);
        }
    }

    #[tokio::test]
    async fn test_non_finite_position_is_rejected() {
        let clock = Arc::new(ManualClock::new(0.0));
        for position in [f64::NAN, f64::INFINITY] {
            let result = SimulatedAxis::new("th", AxisConfig::default(), position, 1.0, clock.clone());
            assert!(matches!(result, Err(AxisError::NonFinitePosition { .. })));
        }

        let (axis, _clock) = axis_at(2.0, 1.0);
        let err = axis.set_position(f64::NAN).await.unwrap_err();
        assert!(matches!(err, AxisError::NonFinitePosition { .. }));
        assert_eq!(axis.position().await, 2.0);
        axis.start_move(3.0, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_unending_motion_is_degenerate() {
        let (axis, clock) = axis_at(0.0, 1e-300);
        let err = axis.start_move(1e10, None).await.unwrap_err();
        assert!(err.is_degenerate_motion());
        assert!(axis.motion().await.is_none());

        axis.set_speed(1.0).await;
        let err = axis.start_move(1.0, Some(f64::NAN)).await.unwrap_err();
        assert!(err.is_degenerate_motion());
        clock.set(f64::MAX);
        assert_eq!(axis.state().await, AxisState::Ready);
        assert_eq!(axis.position().await, 0.0);
    }

    #[tokio::test]
    async fn test_zero_speed_without_displacement_is_instant() {
        let (axis, _clock) = axis_at(1.0, 0.0);
        axis.start_move(1.0, None).await.unwrap();
        assert_eq!(axis.state().await, AxisState::Ready);
        assert_eq!(axis.position().await, 1.0);
    }

    #[tokio::test]
    async fn test_non_finite_target_is_rejected() {
        let (axis, _clock) = axis_at(0.0, 1.0);
        let err = axis.start_move(f64::NAN, None).await.unwrap_err();
        assert!(matches!(err, AxisError::NonFiniteTarget { .. }));
        assert!(axis.motion().await.is_none());
    }

    #[tokio::test]
    async fn test_stop_freezes_position() {
        let (axis, clock) = axis_at(0.0, 4.0);
        axis.start_move(-100.0, None).await.unwrap();

        clock.set(2.5);
        axis.stop().await.unwrap();
        assert_eq!(axis.state().await, AxisState::Ready);

        let first = axis.position().await;
        clock.set(10.0);
        let second = axis.position().await;
        assert_abs_diff_eq!(first, -10.0, epsilon = 1e-9);
        assert_eq!(first, second);

        // Stopping an idle axis changes nothing.
        axis.stop().await.unwrap();
        assert_eq!(axis.position().await, first);
    }

    #[tokio::test]
    async fn test_position_is_monotonic_towards_target() {
        let (axis, clock) = axis_at(24.0, 5.0);
        axis.start_move(30.0, None).await.unwrap();

        let mut last = axis.position().await;
        for step in 1..=20 {
            clock.set(step as f64 * 0.1);
            let position = axis.position().await;
            assert!(position >= last);
            assert!(position <= 30.0);
            last = position;
        }
        assert_eq!(last, 30.0);
    }

    #[tokio::test]
    async fn test_set_position_while_moving_fails() {
        let (axis, clock) = axis_at(0.0, 1.0);
        axis.start_move(5.0, None).await.unwrap();

        clock.set(1.0);
        let err = axis.set_position(100.0).await.unwrap_err();
        assert!(err.is_invalid_state());
        assert_abs_diff_eq!(axis.position().await, 1.0, epsilon = 1e-9);

        clock.set(6.0);
        axis.set_position(100.0).await.unwrap();
        assert_eq!(axis.position().await, 100.0);
    }

    #[tokio::test]
    async fn test_speed_change_does_not_replan_active_motion() {
        let (axis, clock) = axis_at(0.0, 1.0);
        axis.start_move(10.0, None).await.unwrap();

        axis.set_speed(100.0).await;
        clock.set(5.0);
        assert_abs_diff_eq!(axis.position().await, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(axis.motion().await.unwrap().end_time, 10.0, epsilon = 1e-12);

        clock.set(10.0);
        assert_eq!(axis.state().await, AxisState::Ready);
        axis.start_move(0.0, None).await.unwrap();
        assert_abs_diff_eq!(axis.motion().await.unwrap().duration(), 0.1, epsilon = 1e-12);
    }

    #[tokio::test]
    async fn test_future_start_time_holds_start_position() {
        let (axis, clock) = axis_at(0.0, 1.0);
        axis.start_move(4.0, Some(2.0)).await.unwrap();

        clock.set(1.0);
        assert_eq!(axis.position().await, 0.0);
        assert_eq!(axis.state().await, AxisState::Moving);

        clock.set(3.0);
        assert_abs_diff_eq!(axis.position().await, 1.0, epsilon = 1e-9);

        clock.set(6.0);
        assert_eq!(axis.position().await, 4.0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_starts_admit_one_motion() {
        let clock = Arc::new(ManualClock::new(0.0));
        let axis = Arc::new(SimulatedAxis::new(
            "mu",
            AxisConfig::default(),
            0.0,
            1.0,
            clock,
        )
        .unwrap());

        let mut handles = Vec::new();
        for i in 0..8 {
            let axis = axis.clone();
            handles.push(tokio::spawn(async move {
                axis.start_move(10.0 + i as f64, None).await
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => accepted += 1,
                Err(e) => assert!(e.is_invalid_state()),
            }
        }
        assert_eq!(accepted, 1);
        assert_eq!(axis.state().await, AxisState::Moving);
    }
}
