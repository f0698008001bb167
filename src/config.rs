use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};

/// Parameters threaded through the whole pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Half-width of the sampled square `[-size, size]^2`.
    pub size: f64,
    /// Samples per axis.
    pub resolution: usize,
    /// Contour level boundaries per panel.
    pub n_levels: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            size: 1.0,
            resolution: 2000,
            n_levels: 100,
        }
    }
}

impl PlotConfig {
    pub fn new(size: f64, resolution: usize, n_levels: usize) -> Self {
        PlotConfig { size, resolution, n_levels }
    }

    pub fn from_json(json: &str) -> PlotResult<Self> {
        let config: PlotConfig = serde_json::from_str(json)
            .map_err(|e| PlotError::invalid(format!("config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(PlotError::invalid(format!("size must be positive and finite, got {}", self.size)));
        }
        if self.resolution < 1 {
            return Err(PlotError::invalid("resolution must be at least 1"));
        }
        if self.n_levels < 1 {
            return Err(PlotError::invalid("n_levels must be at least 1"));
        }
        Ok(())
    }
}
