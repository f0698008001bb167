use std::time::Instant;

use ndarray::Array1;
use tracing::info;

use crate::config::PlotConfig;
use crate::error::PlotResult;
use crate::field::{Schedule, evaluate_with};
use crate::grid::build_grid;
use crate::levels::{LevelSet, levels};
use crate::math::ComplexFunction;
use crate::polar::{PolarField, decompose};

/// Everything the renderer needs: axes, the two real fields and the level count.
#[derive(Clone, Debug)]
pub struct PhasePortrait {
    pub re_axis: Array1<f64>,
    pub im_axis: Array1<f64>,
    pub polar: PolarField,
    pub n_levels: usize,
}

impl PhasePortrait {
    pub fn argument_levels(&self) -> LevelSet {
        levels(&self.polar.argument, self.n_levels)
    }

    pub fn magnitude_levels(&self) -> LevelSet {
        levels(&self.polar.magnitude, self.n_levels)
    }
}

pub fn run<F>(config: &PlotConfig, func: &F) -> PlotResult<PhasePortrait>
where
    F: ComplexFunction + ?Sized,
{
    run_with(config, func, Schedule::default())
}

/// Grid, evaluate, decompose. Fails before anything is rendered.
pub fn run_with<F>(config: &PlotConfig, func: &F, schedule: Schedule) -> PlotResult<PhasePortrait>
where
    F: ComplexFunction + ?Sized,
{
    config.validate()?;
    let start = Instant::now();

    let grid = build_grid(config.size, config.resolution)?;
    let field = evaluate_with(func, &grid, schedule)?;
    let polar = decompose(&field);

    info!(
        size = config.size,
        resolution = config.resolution,
        n_levels = config.n_levels,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "phase portrait computed"
    );

    Ok(PhasePortrait {
        re_axis: grid.re_axis,
        im_axis: grid.im_axis,
        polar,
        n_levels: config.n_levels,
    })
}
