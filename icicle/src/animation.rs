use std::time::{Duration, Instant};

use crate::transition::{FrameNode, TransitionConfig, TransitionPlan};

/// A layout transition in flight.
///
/// Progress comes from the caller's clock: the animation only remembers when
/// it started.
#[derive(Debug, Clone)]
pub struct Animation {
    plan: TransitionPlan,
    config: TransitionConfig,
    start: Instant,
}

impl Animation {
    pub fn start(plan: TransitionPlan, config: TransitionConfig, now: Instant) -> Self {
        Self {
            plan,
            config,
            start: now,
        }
    }

    pub fn plan(&self) -> &TransitionPlan {
        &self.plan
    }

    pub fn config(&self) -> TransitionConfig {
        self.config
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.start)
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        self.config.progress(self.elapsed(now))
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Frame at `now`, with easing applied.
    pub fn frame(&self, now: Instant) -> Vec<FrameNode> {
        self.plan.frame(self.config.easing.apply(self.progress(now)))
    }

    /// Frame at a caller-chosen linear progress.
    pub fn frame_at(&self, progress: f64) -> Vec<FrameNode> {
        self.plan.frame(self.config.easing.apply(progress))
    }
}
