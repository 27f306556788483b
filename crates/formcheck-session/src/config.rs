//! Workout configuration.

use formcheck_core::{Error, ExerciseKind, Result};
use formcheck_detect::{Profile, StabilityConfig};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides, e.g. `FORMCHECK_EXERCISE=squat` or
/// `FORMCHECK_STABILITY__CONSECUTIVE=3`
pub const ENV_PREFIX: &str = "FORMCHECK";

/// Everything a workout needs besides the frames themselves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutConfig {
    /// Exercise to track; accepts UI identifiers such as `bicep` or `tree`
    pub exercise: ExerciseKind,

    /// Process every Nth delivered frame
    #[serde(default = "default_frame_stride")]
    pub frame_stride: u32,

    /// Override of the detector's trailing smoothing window
    #[serde(default)]
    pub smoothing_window: Option<usize>,

    /// Display debounce
    #[serde(default)]
    pub stability: StabilityConfig,
}

fn default_frame_stride() -> u32 {
    1
}

impl WorkoutConfig {
    pub fn new(exercise: ExerciseKind) -> Self {
        Self {
            exercise,
            frame_stride: default_frame_stride(),
            smoothing_window: None,
            stability: StabilityConfig::default(),
        }
    }

    /// Load configuration from file, with environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        Self::load(Some(path), ENV_PREFIX)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(None, ENV_PREFIX)
    }

    fn load(path: Option<&str>, prefix: &str) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?;

        let config: Self = settings.try_deserialize().map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let problem = if self.frame_stride == 0 {
            Some("frame_stride must be at least 1".to_string())
        } else if self.smoothing_window == Some(0) {
            Some("smoothing_window must be at least 1".to_string())
        } else {
            self.stability.validate().err().map(|e| e.to_string())
        };

        match problem {
            Some(reason) => {
                tracing::warn!("Rejected workout configuration: {}", reason);
                Err(Error::Config(reason))
            }
            None => Ok(()),
        }
    }

    /// Detector profile with the configured overrides applied
    pub fn profile(&self) -> Profile {
        let profile = Profile::for_exercise(self.exercise);
        match self.smoothing_window {
            Some(window) => profile.with_smoothing_window(window),
            None => profile,
        }
    }
}

fn config_error(e: config::ConfigError) -> Error {
    Error::Config(e.to_string())
}
