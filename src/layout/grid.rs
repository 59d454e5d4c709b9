use serde::Serialize;

use crate::config::{GenerationOptions, LayoutConfig};
use crate::error::{Error, Result};

/// Gap between the clock band and the first row of cells.
const CLOCK_PADDING: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellShape {
    Dot,
    Square,
}

/// One day or week. `x`/`y` is the top-left of the cell's bounding square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridCell {
    pub index: u32,
    pub row: u32,
    pub column: u32,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub elapsed: bool,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct GridArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct GridFrame {
    pub columns: u32,
    pub rows: u32,
    pub pitch: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl GridFrame {
    pub fn bottom(&self) -> f64 {
        self.origin_y + f64::from(self.rows) * self.pitch
    }
}

/// The part of the canvas below the clock band and above the caption footer.
pub(super) fn grid_area(options: &GenerationOptions, config: &LayoutConfig) -> Result<GridArea> {
    let width = f64::from(options.width);
    let height = f64::from(options.height);
    let side = width * config.side_margin;
    let top = height * (options.clock_height + CLOCK_PADDING);
    let bottom = height * (1.0 - config.footer_height);
    let area = GridArea {
        x: side,
        y: top,
        width: width - side * 2.0,
        height: bottom - top,
    };
    if !(area.width > 0.0 && area.height > 0.0) {
        return Err(Error::InvalidGeometry(format!(
            "no room for a grid on a {}x{} canvas with clock height {}",
            options.width, options.height, options.clock_height
        )));
    }
    Ok(area)
}

/// Chooses the column count giving the largest square pitch, unless one is
/// forced. Ties go to fewer columns.
pub(super) fn fit_grid(count: u32, area: &GridArea, columns: Option<u32>) -> GridFrame {
    let pitch_for = |columns: u32| {
        let rows = count.div_ceil(columns);
        let by_width = area.width / f64::from(columns);
        let by_height = if rows == 0 {
            by_width
        } else {
            area.height / f64::from(rows)
        };
        by_width.min(by_height)
    };

    let columns = match columns {
        Some(forced) => forced.clamp(1, count.max(1)),
        None => {
            let mut best = 1;
            let mut best_pitch = pitch_for(1);
            for candidate in 2..=count.max(1) {
                let pitch = pitch_for(candidate);
                if pitch > best_pitch {
                    best = candidate;
                    best_pitch = pitch;
                }
            }
            best
        }
    };

    let rows = count.div_ceil(columns);
    let pitch = pitch_for(columns);
    GridFrame {
        columns,
        rows,
        pitch,
        origin_x: area.x + (area.width - pitch * f64::from(columns)) / 2.0,
        origin_y: area.y,
    }
}

/// Row-major cells; the first `elapsed` are marked elapsed.
pub(super) fn build_cells(count: u32, elapsed: u32, frame: &GridFrame, gap: f64) -> Vec<GridCell> {
    let size = frame.pitch * (1.0 - gap.clamp(0.0, 0.9));
    let inset = (frame.pitch - size) / 2.0;
    (0..count)
        .map(|index| {
            let row = index / frame.columns;
            let column = index % frame.columns;
            GridCell {
                index,
                row,
                column,
                x: frame.origin_x + f64::from(column) * frame.pitch + inset,
                y: frame.origin_y + f64::from(row) * frame.pitch + inset,
                size,
                elapsed: index < elapsed,
            }
        })
        .collect()
}
