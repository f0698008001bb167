pub mod math;
pub mod error;
pub mod config;
pub mod grid;
pub mod field;
pub mod polar;
pub mod levels;
pub mod pipeline;
pub mod render;

pub use math::{C, ComplexFunction, Fallible, FnError, Polynomial, PrincipalPower, principal_arg, principal_pow};
pub use error::{PlotError, PlotResult};
pub use config::PlotConfig;
pub use grid::{SampleGrid, build_grid};
pub use field::{ComplexField, Schedule, evaluate, evaluate_with};
pub use polar::{PolarField, decompose};
pub use levels::{LevelSet, levels};
pub use pipeline::{PhasePortrait, run, run_with};
pub use render::{Frame, RenderAdapter, WindowRenderer, rasterize};
