use thiserror::Error;

/// Indicator computation errors.
///
/// Missing values caused by a window shorter than an EMA period are not errors, they are
/// represented as `None` and short-circuit the compression detector instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComputationError {
    #[error("EMA period must be greater than zero")]
    ZeroPeriod,

    #[error("no EMA periods configured")]
    NoPeriods,
}
