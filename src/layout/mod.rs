//! Pure geometry: turns options plus "today" into positioned cells, rings and
//! labels. Nothing here emits markup; see `render`.

mod goal;
mod grid;
mod life;
mod year;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::color::Color;
use crate::config::{GenerationOptions, LayoutConfig};
use crate::date::CalendarDate;
use crate::error::{Error, Result};
use crate::theme::Theme;

pub use goal::{
    decode_goal_name, GoalProgress, Motivation, DEFAULT_HORIZON_DAYS, PROGRESS_FLOOR_DAYS,
};
pub use grid::{CellShape, GridCell};
pub use life::{weeks_elapsed, WEEKS_PER_YEAR};

/// Which wallpaper to draw. Closed: unknown tags are an error, never a
/// silent fallback to the year calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum WallpaperKind {
    #[default]
    Year,
    Life,
    Goal,
}

impl WallpaperKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WallpaperKind::Year => "year",
            WallpaperKind::Life => "life",
            WallpaperKind::Goal => "goal",
        }
    }
}

impl FromStr for WallpaperKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "year" => Ok(WallpaperKind::Year),
            "life" => Ok(WallpaperKind::Life),
            "goal" => Ok(WallpaperKind::Goal),
            _ => Err(Error::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for WallpaperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Label {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub fill: Color,
    pub font_size: f64,
    pub font_weight: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub pitch: f64,
    pub shape: CellShape,
    pub elapsed: u32,
    pub total: u32,
    pub elapsed_color: Color,
    pub remaining_color: Color,
    pub cells: Vec<GridCell>,
    pub labels: Vec<Label>,
}

impl GridLayout {
    pub fn elapsed_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.elapsed).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalLayout {
    pub center: (f64, f64),
    pub radius: f64,
    pub stroke_width: f64,
    pub track_color: Color,
    pub arc_color: Color,
    pub target: CalendarDate,
    pub progress: GoalProgress,
    /// Arc end angle in degrees, clockwise from twelve o'clock.
    pub sweep_deg: f64,
    pub motivation: Motivation,
    pub labels: Vec<Label>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DiagramData {
    Grid(GridLayout),
    Goal(GoalLayout),
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub kind: WallpaperKind,
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub today: CalendarDate,
    pub diagram: DiagramData,
}

/// Lays out one wallpaper for `today` (already resolved in the request's
/// timezone).
pub fn compute_layout(
    kind: WallpaperKind,
    options: &GenerationOptions,
    config: &LayoutConfig,
    theme: &Theme,
    today: CalendarDate,
) -> Result<Layout> {
    debug!(
        kind = kind.as_str(),
        width = options.width,
        height = options.height,
        %today,
        "computing layout"
    );
    match kind {
        WallpaperKind::Year => year::compute_year_layout(options, config, theme, today),
        WallpaperKind::Life => life::compute_life_layout(options, config, theme, today),
        WallpaperKind::Goal => goal::compute_goal_layout(options, theme, today),
    }
}

pub(crate) fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        unit.to_string()
    } else {
        format!("{unit}s")
    }
}
