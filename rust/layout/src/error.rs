use thiserror::Error;

/// Result type for splitting operations
pub type SplitResult<T> = std::result::Result<T, SplitError>;

/// Result type for the placement entry points
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

/// Why a splitting operation produced no result.
///
/// Convergence trouble inside an operation is reported through these
/// variants; the orchestrator recovers from them with a fallback or a
/// best-effort allocation instead of aborting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    #[error("polygon is empty or has fewer than 3 usable vertices")]
    InvalidPolygon,

    #[error("polygon span {span:.3} is below the minimum {min:.3}")]
    BelowMinimumSpan { span: f64, min: f64 },

    #[error("edge {index} is {length:.3} long, below the minimum {min:.3}")]
    EdgeBelowMinimum {
        index: usize,
        length: f64,
        min: f64,
    },

    #[error("no edge can be offset inward by {depth:.3}")]
    NoOffsetableEdge { depth: f64 },

    #[error("retry budget of {0} attempts exhausted")]
    RetryBudgetExhausted(u32),
}

/// Errors raised by the placement entry points on unusable input.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("department list is empty")]
    NoDepartments,

    #[error("site boundary is empty or degenerate")]
    InvalidBoundary,

    #[error("split failed: {0}")]
    Split(#[from] SplitError),
}
