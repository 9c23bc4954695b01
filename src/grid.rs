//! Grid inference and the mapping between grid space and pixel space.
//!
//! No shell API reports the desktop's grid metrics, so [`calibrate`] infers
//! them from where the icons currently sit.  The operator is asked to
//! arrange four anchor icons beforehand:
//!
//! * one at the visual top-left (the *origin*),
//! * one directly to its right,
//! * one directly below it,
//! * one further down the same column (the lower-left *boundary*).
//!
//! The horizontal and vertical neighbours give the cell size, the boundary
//! gives the number of rows, and the screen width gives the number of
//! columns.  The heuristic assumes an axis-aligned, evenly spaced layout; a
//! desktop that does not match fails with a [`CalibrationError`] before any
//! icon is moved.

use crate::command::Direction;
use crate::traits::IconHost;
use log::{debug, info};

/// On-screen location of an icon, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelPosition {
    pub x: i32,
    pub y: i32,
}

impl PixelPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A cell in game space.  `(0, 0)` is the top-left cell.
///
/// Coordinates are signed so that a step off the edge of the grid is still
/// representable and can be reported as a wall collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPosition {
    pub col: i32,
    pub row: i32,
}

impl GridPosition {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The neighbouring cell in `direction`.
    pub fn step(self, direction: Direction) -> Self {
        let (dc, dr) = direction.delta();
        Self::new(self.col + dc, self.row + dr)
    }
}

/// Grid metrics derived once by [`calibrate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridInfo {
    /// Horizontal distance between neighbouring cells.
    pub cell_width: i32,
    /// Vertical distance between neighbouring cells.
    pub cell_height: i32,
    /// Pixel position of cell `(0, 0)`.
    pub origin_x: i32,
    pub origin_y: i32,
    /// Usable columns, counted from the origin to the right screen edge.
    pub columns: i32,
    /// Usable rows, counted from the origin down to the boundary icon.
    pub rows: i32,
}

impl GridInfo {
    /// Pixel position of the cell at `pos`.
    pub fn to_pixel(&self, pos: GridPosition) -> PixelPosition {
        PixelPosition::new(
            self.origin_x + pos.col * self.cell_width,
            self.origin_y + pos.row * self.cell_height,
        )
    }

    /// Whether `pos` lies inside `[0, columns) × [0, rows)`.
    pub fn contains(&self, pos: GridPosition) -> bool {
        (0..self.columns).contains(&pos.col) && (0..self.rows).contains(&pos.row)
    }
}

/// Why [`calibrate`] could not infer a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalibrationError {
    #[error("only {found} icon position(s) could be read, at least 4 are needed")]
    InsufficientIcons { found: usize },
    #[error("no boundary icon found below the top-left icon")]
    MissingBoundary,
    #[error(
        "could not determine the grid size; place icons directly right of and below the top-left icon"
    )]
    AmbiguousGrid,
    #[error("calibrated grid is empty ({columns} columns x {rows} rows)")]
    DegenerateGrid { columns: i32, rows: i32 },
}

/// Infer [`GridInfo`] from the current icon layout.
///
/// Icons closer than `tolerance` pixels on an axis are considered to share
/// that row or column.  Only reads are issued.
pub fn calibrate<H: IconHost>(host: &H, tolerance: i32) -> Result<GridInfo, CalibrationError> {
    let positions: Vec<PixelPosition> = (0..host.icon_count())
        .filter_map(|i| host.icon_position(i))
        .collect();
    info!("scanned {} icon position(s) for calibration", positions.len());
    infer_grid(&positions, host.screen_width(), tolerance)
}

fn infer_grid(
    positions: &[PixelPosition],
    screen_width: i32,
    tolerance: i32,
) -> Result<GridInfo, CalibrationError> {
    if positions.len() < 4 {
        return Err(CalibrationError::InsufficientIcons {
            found: positions.len(),
        });
    }

    let origin = positions
        .iter()
        .copied()
        .min_by_key(|p| p.x + p.y)
        .ok_or(CalibrationError::InsufficientIcons { found: 0 })?;

    let boundary = positions
        .iter()
        .filter(|p| (p.x - origin.x).abs() < tolerance)
        .max_by_key(|p| p.y)
        .copied();
    let column_len = positions
        .iter()
        .filter(|p| (p.x - origin.x).abs() < tolerance)
        .count();
    let boundary = match boundary {
        Some(b) if column_len >= 2 => b,
        _ => return Err(CalibrationError::MissingBoundary),
    };

    let mut step_x: Option<i32> = None;
    let mut step_y: Option<i32> = None;
    for p in positions.iter().filter(|p| **p != origin) {
        let dx = p.x - origin.x;
        let dy = p.y - origin.y;
        if dy.abs() < tolerance && dx > 0 && step_x.map_or(true, |s| dx < s) {
            step_x = Some(dx);
        }
        if dx.abs() < tolerance && dy > 0 && step_y.map_or(true, |s| dy < s) {
            step_y = Some(dy);
        }
    }
    let (cell_width, cell_height) = match (step_x, step_y) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => return Err(CalibrationError::AmbiguousGrid),
    };
    debug!(
        "origin ({}, {}), boundary ({}, {}), step {}x{}",
        origin.x, origin.y, boundary.x, boundary.y, cell_width, cell_height
    );

    let columns = (screen_width - origin.x).div_euclid(cell_width);
    let rows = (boundary.y - origin.y).div_euclid(cell_height) + 1;
    if columns <= 0 || rows <= 0 {
        return Err(CalibrationError::DegenerateGrid { columns, rows });
    }

    let grid = GridInfo {
        cell_width,
        cell_height,
        origin_x: origin.x,
        origin_y: origin.y,
        columns,
        rows,
    };
    info!(
        "grid calibrated: cell {}x{} px, {} columns x {} rows, origin ({}, {})",
        grid.cell_width, grid.cell_height, grid.columns, grid.rows, grid.origin_x, grid.origin_y
    );
    Ok(grid)
}
