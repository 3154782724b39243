use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required parameter in configuration: {0}")]
    MissingParameter(String),
    #[error("Unknown type of boundary condition configured: {0}")]
    UnknownBoundaryType(String),
    #[error("Unknown type of mirror boundary configured: {0}")]
    UnknownMirrorType(String),
    #[error("Unknown type of Riemann solver configured: {0}")]
    UnknownRiemannSolver(String),
    #[error("Unknown type of slope limiter configured: {0}")]
    UnknownSlopeLimiter(String),
    #[error("Unknown type of kernel configured: {0}")]
    UnknownKernel(String),
    #[error("Unknown type of equation of state configured: {0}")]
    UnknownEOS(String),
    #[error("Unknown type of initial conditions configured: {0}")]
    UnknownICs(String),
    #[error("Hydro dimensionality must be 1, 2 or 3, got {0}")]
    InvalidDimensionality(i64),
    #[error("Expected array but found: {0}")]
    InvalidArrayFormat(String),
    #[error("Expected array of length {0}, but found {1}")]
    InvalidArrayLength(usize, usize),
    #[error("Invalid boundary configuration: {0}")]
    InvalidBoundary(String),
    #[error("Invalid value for parameter {0}: {1}")]
    InvalidParameter(String, String),
}

/// Errors raised by the ghost particle manager.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoundaryError {
    #[error("Ghost particle manager used before initialize()")]
    Uninitialized,
    #[error("Kernel support radius must be finite and non-negative, got {0}")]
    InvalidSupportRadius(f64),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
