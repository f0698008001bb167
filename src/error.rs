use thiserror::Error;

use crate::math::FnError;

pub type PlotResult<T> = Result<T, PlotError>;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The sampled function failed at `re + i im`.
    #[error("evaluation failed at z = {re} + {im}i: {source}")]
    Evaluation {
        re: f64,
        im: f64,
        #[source]
        source: FnError,
    },

    #[error("window error: {0}")]
    Window(#[from] minifb::Error),
}

impl PlotError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        PlotError::InvalidArgument(msg.into())
    }
}
