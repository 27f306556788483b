//! Display debounce layered over any detector.
//!
//! [`Stabilized`] keeps its own trailing average of the wrapped detector's
//! representative metric and a streak counter over the "active" flag. Until
//! the flag has repeated for `consecutive` frames, the user-facing feedback
//! and score are held at their last stable values. Rep counts and hold
//! seconds are never delayed.

use formcheck_core::{Error, PoseFrame, Result};
use serde::{Deserialize, Serialize};

use crate::detector::{Detector, Reading};
use crate::smoothing::MovingAverage;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Trailing window over the representative metric
    pub smooth_window: usize,
    /// Frames the active flag must repeat before the display follows it
    pub consecutive: u32,
    /// Averaged metric below which a detector without its own active flag
    /// counts as active
    pub metric_active_below: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            smooth_window: 5,
            consecutive: 4,
            metric_active_below: 100.0,
        }
    }
}

impl StabilityConfig {
    pub fn validate(&self) -> Result<()> {
        if self.smooth_window == 0 {
            return Err(Error::Config("stability.smooth_window must be at least 1".into()));
        }
        if self.consecutive == 0 {
            return Err(Error::Config("stability.consecutive must be at least 1".into()));
        }
        if !self.metric_active_below.is_finite() {
            return Err(Error::Config("stability.metric_active_below must be finite".into()));
        }
        Ok(())
    }
}

/// Wrapped detector result plus the wrapper's own view of it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StabilizedOutput<O> {
    #[serde(flatten)]
    pub output: O,
    pub smoothed_metric: f64,
    pub stable: bool,
}

#[derive(Debug, Clone)]
pub struct Stabilized<D> {
    inner: D,
    config: StabilityConfig,
    window: MovingAverage,
    last_active: Option<bool>,
    streak: u32,
    /// Feedback and score currently on display
    shown: Option<(String, Option<u8>)>,
}

impl<D: Detector> Stabilized<D> {
    pub fn new(inner: D, config: StabilityConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            window: MovingAverage::new(config.smooth_window),
            inner,
            config,
            last_active: None,
            streak: 0,
            shown: None,
        })
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn config(&self) -> &StabilityConfig {
        &self.config
    }

    pub fn update(&mut self, frame: &PoseFrame) -> StabilizedOutput<D::Output> {
        let mut output = self.inner.update(frame);

        let smoothed_metric = self.window.push(output.metric().unwrap_or(0.0));
        let active = output
            .active()
            .unwrap_or(smoothed_metric < self.config.metric_active_below);

        if self.last_active == Some(active) {
            self.streak = self.streak.saturating_add(1);
        } else {
            self.streak = 1;
            self.last_active = Some(active);
        }
        let stable = self.streak >= self.config.consecutive;

        if self.streak == self.config.consecutive {
            tracing::trace!("display settled on active={}", active);
        }

        let held = if stable { None } else { self.shown.clone() };
        match held {
            Some((feedback, score)) => output.show(feedback, score),
            None => self.shown = Some((output.feedback().to_string(), output.score())),
        }

        StabilizedOutput {
            output,
            smoothed_metric,
            stable,
        }
    }

    pub fn reset(&mut self) {
        self.window.reset();
        self.last_active = None;
        self.streak = 0;
        self.shown = None;
        self.inner.reset();
    }
}
