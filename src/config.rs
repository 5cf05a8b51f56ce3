//! Configuration for a visualizer session.

use crate::error::{Result, VisualizerError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Units of the destination term in the greedy best-first priority.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GreedyUnits {
    /// Accumulated distance plus the squared distance to the destination.
    #[default]
    Squared,
    /// Accumulated distance plus the plain distance to the destination.
    Linear,
}

/// Session configuration
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VisualizerConfig {
    /// Canvas width in pixels
    pub canvas_width: i32,

    /// Canvas height in pixels
    pub canvas_height: i32,

    /// Side of a cell in pixels; cells are laid out one pixel apart
    pub cell_size: i32,

    /// Delay between two consecutive animation steps, in milliseconds
    pub step_ms: u64,

    /// Probability of a cell becoming a wall when randomizing, updated by every explicit rate
    pub wall_rate: f64,

    /// Random draws attempted before an endpoint is forced onto a wall cell
    pub endpoint_retries: u32,

    pub greedy_units: GreedyUnits,

    /// Seed for obstacle and endpoint randomization. Entropy if None.
    pub seed: Option<u64>,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 480,
            cell_size: 15,
            step_ms: 10,
            wall_rate: 0.3,
            endpoint_retries: 64,
            greedy_units: GreedyUnits::Squared,
            seed: None,
        }
    }
}

impl VisualizerConfig {
    /// Configuration for a canvas holding exactly `columns` x `rows` cells.
    pub fn for_cells(columns: i32, rows: i32, cell_size: i32) -> Self {
        let pitch = cell_size + 1;
        Self {
            canvas_width: columns * pitch,
            canvas_height: rows * pitch,
            cell_size,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.canvas_width, self.canvas_height, self.cell_size)?;
        check_rate(self.wall_rate)?;
        if self.step_ms == 0 {
            return Err(VisualizerError::Config(
                "step_ms must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Largest number of cells a canvas may be split into.
pub const MAX_CELLS: usize = 1 << 24;

/// Validates a canvas and returns the number of columns and rows it holds. Partially visible
/// cells count, and every pixel coordinate of the grid has to fit in an `i32`.
pub(crate) fn check_dimensions(width: i32, height: i32, cell_size: i32) -> Result<(usize, usize)> {
    let invalid = VisualizerError::InvalidDimensions {
        width,
        height,
        cell_size,
    };
    if width <= 0 || height <= 0 || cell_size <= 0 {
        return Err(invalid);
    }
    let pitch = cell_size.checked_add(1).ok_or(invalid.clone())?;
    let fit = |extent: i32| {
        extent
            .checked_add(pitch - 1)
            .map(|rounded| rounded / pitch)
    };
    let (Some(columns), Some(rows)) = (fit(width), fit(height)) else {
        return Err(invalid);
    };
    let (columns, rows) = (columns as usize, rows as usize);
    match columns.checked_mul(rows) {
        Some(cells) if cells <= MAX_CELLS => Ok((columns, rows)),
        _ => Err(invalid),
    }
}

pub(crate) fn check_rate(rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(VisualizerError::InvalidRate(rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VisualizerConfig::default();
        assert_eq!(config.cell_size, 15);
        assert_eq!(config.step_ms, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_for_cells() {
        let config = VisualizerConfig::for_cells(3, 2, 15);
        assert_eq!(config.canvas_width, 48);
        assert_eq!(config.canvas_height, 32);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = VisualizerConfig {
            wall_rate: 1.5,
            ..VisualizerConfig::default()
        };
        assert_eq!(config.validate(), Err(VisualizerError::InvalidRate(1.5)));
        let config = VisualizerConfig {
            cell_size: 0,
            ..VisualizerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(VisualizerError::InvalidDimensions { .. })
        ));
        let config = VisualizerConfig {
            step_ms: 0,
            ..VisualizerConfig::default()
        };
        assert!(matches!(config.validate(), Err(VisualizerError::Config(_))));
    }

    #[test]
    fn test_dimensions_must_fit_pixel_coordinates() {
        assert_eq!(check_dimensions(40, 32, 15), Ok((3, 2)));
        assert_eq!(check_dimensions(4096 * 16, 4096 * 16, 15), Ok((4096, 4096)));
        for (width, height, cell_size) in [
            (i32::MAX, 16, 15),
            (16, i32::MAX - 3, 15),
            (800, 480, i32::MAX),
            (800, 480, -1),
            (1 << 20, 1 << 20, 1),
            (4097 * 16, 4096 * 16, 15),
        ] {
            assert_eq!(
                check_dimensions(width, height, cell_size),
                Err(VisualizerError::InvalidDimensions {
                    width,
                    height,
                    cell_size
                })
            );
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json_uses_defaults() {
        let config: VisualizerConfig =
            serde_json::from_str(r#"{"cell_size": 9, "greedy_units": "linear"}"#).unwrap();
        assert_eq!(config.cell_size, 9);
        assert_eq!(config.greedy_units, GreedyUnits::Linear);
        assert_eq!(config.step_ms, 10);
    }
}
