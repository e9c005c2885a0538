use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Alignment parameters suitable for config files and CLI presets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignParams {
    /// Side of the final square output in pixels
    pub output_size: usize,
    /// Side of the intermediate square the quad is sampled into
    pub transform_size: usize,
    /// Mirror-pad and vignette the source when the crop runs off the image
    pub enable_padding: bool,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            output_size: 1024,
            transform_size: 4096,
            enable_padding: true,
        }
    }
}

impl AlignParams {
    pub fn validate(&self) -> Result<()> {
        if self.output_size == 0 {
            return Err(Error::ZeroSize {
                size: self.output_size,
            });
        }
        if self.transform_size == 0 {
            return Err(Error::ZeroSize {
                size: self.transform_size,
            });
        }
        Ok(())
    }
}

/// Download retry parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FetchParams {
    /// Number of GET attempts per URL
    pub retries: u32,
    /// Lower bound of the random pause before each attempt, in seconds
    pub min_delay: f64,
    /// Upper bound of the random pause before each attempt, in seconds
    pub max_delay: f64,
}

impl Default for FetchParams {
    fn default() -> Self {
        Self {
            retries: 4,
            min_delay: 0.0,
            max_delay: 2.0,
        }
    }
}

impl FetchParams {
    pub fn validate(&self) -> Result<()> {
        if Duration::try_from_secs_f64(self.min_delay).is_err() {
            return Err(Error::InvalidArgument {
                arg: "min_delay",
                value: self.min_delay.to_string(),
            });
        }
        if Duration::try_from_secs_f64(self.max_delay).is_err() || self.max_delay < self.min_delay {
            return Err(Error::InvalidArgument {
                arg: "max_delay",
                value: self.max_delay.to_string(),
            });
        }
        Ok(())
    }

    /// Delay bounds as durations. Values a `Duration` cannot hold saturate;
    /// `validate` rejects them up front.
    pub fn delay_bounds(&self) -> (Duration, Duration) {
        let secs = |v: f64| {
            Duration::try_from_secs_f64(v).unwrap_or(if v > 0.0 { Duration::MAX } else { Duration::ZERO })
        };
        (secs(self.min_delay), secs(self.max_delay))
    }
}
