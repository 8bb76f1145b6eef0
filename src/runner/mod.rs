pub mod config;
pub mod outcome;

use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::{
    axis::{error::AxisError, Axis},
    clock::Clock,
    progress::{display::ProgressRenderer, ProgressView},
};
use config::RunnerConfig;
use outcome::{AxisMove, RunOutcome, RunReport};

/// Drives a batch of axis motions to completion while rendering progress.
///
/// Motions are submitted all-or-nothing. The runner then polls every axis at
/// `poll_interval` until none is moving, or until the cancellation token
/// fires, in which case every axis is stopped before `run` returns.
pub struct MotionRunner {
    config: RunnerConfig,
    clock: Arc<dyn Clock>,
    renderer: Arc<dyn ProgressRenderer>,
}

impl MotionRunner {
    pub fn new(
        config: RunnerConfig,
        clock: Arc<dyn Clock>,
        renderer: Arc<dyn ProgressRenderer>,
    ) -> Self {
        Self {
            config,
            clock,
            renderer,
        }
    }

    pub async fn move_one(
        &self,
        axis: Arc<dyn Axis>,
        target: f64,
        cancel: &CancellationToken,
    ) -> Result<RunReport> {
        self.run(&[AxisMove::new(axis, target)], cancel).await
    }

    pub async fn run(&self, moves: &[AxisMove], cancel: &CancellationToken) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started_at = self.clock.now();
        info!("Run {}: moving {} axis(es)", run_id, moves.len());

        let mut views = Vec::with_capacity(moves.len());
        for (index, mv) in moves.iter().enumerate() {
            let display = self.renderer.create(mv.axis.name(), index);
            views.push(ProgressView::new(mv.axis.clone(), mv.target, display, self.clock.clone()).await);
        }

        if let Err(e) = Self::start_all(run_id, moves).await {
            Self::close_all(&mut views);
            error!("Run {}: failed to start axis {}: {}", run_id, e.axis(), e);
            return Err(anyhow::Error::new(e)
                .context(format!("Run {} rejected before any motion started", run_id)));
        }

        let outcome = loop {
            if cancel.is_cancelled() {
                break RunOutcome::Aborted;
            }

            let mut moving = 0;
            for view in views.iter_mut() {
                if view.update().await.is_moving() {
                    moving += 1;
                }
            }
            if moving == 0 {
                break RunOutcome::Completed;
            }
            debug!("Run {}: {} axis(es) still moving", run_id, moving);

            tokio::select! {
                _ = cancel.cancelled() => break RunOutcome::Aborted,
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }
        };

        if outcome == RunOutcome::Aborted {
            Self::stop_all(run_id, moves).await;
            for view in views.iter_mut() {
                view.update().await;
            }
        }
        Self::close_all(&mut views);
        if outcome == RunOutcome::Aborted {
            warn!("Run {}: cancelled, all axes stopped", run_id);
        }

        let final_statuses = join_all(moves.iter().map(|mv| mv.axis.status())).await;
        let elapsed = self.clock.now() - started_at;
        info!("Run {}: {:?} after {:.3}s", run_id, outcome, elapsed);

        Ok(RunReport {
            run_id,
            outcome,
            elapsed,
            final_statuses,
        })
    }

    /// Starts every motion in order. On the first failure, the motions that
    /// already started are stopped and the failure is returned.
    ///
    /// Nothing above debug level is logged here since the progress displays
    /// are still live.
    async fn start_all(run_id: Uuid, moves: &[AxisMove]) -> Result<(), AxisError> {
        for (index, mv) in moves.iter().enumerate() {
            if let Err(e) = mv.axis.start_move(mv.target, None).await {
                if index > 0 {
                    debug!("Run {}: rolling back {} started axis(es)", run_id, index);
                    Self::stop_all(run_id, &moves[..index]).await;
                }
                return Err(e);
            }
        }
        Ok(())
    }

    async fn stop_all(run_id: Uuid, moves: &[AxisMove]) {
        let results = join_all(moves.iter().map(|mv| mv.axis.stop())).await;
        for (mv, result) in moves.iter().zip(results) {
            if let Err(e) = result {
                error!("Run {}: failed to stop axis {}: {}", run_id, mv.axis.name(), e);
            }
        }
    }

    fn close_all(views: &mut [ProgressView]) {
        for view in views.iter_mut() {
            view.close();
        }
    }
}
