//! Error types for the visualizer core.

use core::fmt;
use thiserror::Error;

/// Which endpoint(s) a run request was missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Destination,
    Both,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Source => write!(f, "source"),
            Endpoint::Destination => write!(f, "destination"),
            Endpoint::Both => write!(f, "source and destination"),
        }
    }
}

/// Visualizer error type. Every variant is recoverable at the session level.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisualizerError {
    #[error("please set up the {0} cell before running a search")]
    MissingEndpoint(Endpoint),

    #[error("no cell at ({x}, {y})")]
    OutOfBounds { x: i32, y: i32 },

    #[error("a search run is still in flight")]
    Busy,

    #[error("wall rate {0} is outside [0, 1]")]
    InvalidRate(f64),

    #[error("invalid grid dimensions {width}x{height} with cell size {cell_size}")]
    InvalidDimensions {
        width: i32,
        height: i32,
        cell_size: i32,
    },

    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VisualizerError>;
