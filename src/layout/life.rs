use crate::color::{color_with_alpha, parse_color};
use crate::config::{GenerationOptions, LayoutConfig, MAX_LIFESPAN};
use crate::date::{days_between, CalendarDate};
use crate::error::{Error, Result};
use crate::theme::Theme;

use super::grid::{build_cells, fit_grid, grid_area, CellShape};
use super::{plural, DiagramData, GridLayout, Label, Layout, WallpaperKind};

pub const WEEKS_PER_YEAR: u32 = 52;

/// Whole weeks lived by `today`, floored, never negative.
pub fn weeks_elapsed(dob: CalendarDate, today: CalendarDate) -> u32 {
    let weeks = days_between(dob, today).div_euclid(7).max(0);
    u32::try_from(weeks).unwrap_or(u32::MAX)
}

pub(super) fn compute_life_layout(
    options: &GenerationOptions,
    config: &LayoutConfig,
    theme: &Theme,
    today: CalendarDate,
) -> Result<Layout> {
    let dob = options
        .dob
        .as_deref()
        .ok_or(Error::MissingRequiredField("dob"))?;
    let dob = CalendarDate::parse(dob)?;
    if !(1..=MAX_LIFESPAN).contains(&options.lifespan) {
        return Err(Error::InvalidGeometry(format!(
            "lifespan {} outside [1, {MAX_LIFESPAN}] years",
            options.lifespan
        )));
    }

    let background = parse_color(&options.bg_color)?;
    let accent = parse_color(&options.accent_color)?;
    let neutral = parse_color(&theme.text_color)?;
    let remaining_color = color_with_alpha(neutral, theme.remaining_alpha)?;

    let total = options.lifespan * WEEKS_PER_YEAR;
    let lived = weeks_elapsed(dob, today);
    let elapsed = lived.min(total);

    let area = grid_area(options, config)?;
    let frame = fit_grid(total, &area, config.life_columns);
    let cells = build_cells(total, elapsed, &frame, config.cell_gap);

    let width = f64::from(options.width);
    let height = f64::from(options.height);
    let percent = (f64::from(elapsed) / f64::from(total) * 100.0).floor();
    let caption_y = frame.bottom() + height * 0.05;
    let labels = vec![
        Label {
            x: width / 2.0,
            y: caption_y,
            text: format!("{lived} {} lived", plural(i64::from(lived), "week")),
            fill: accent,
            font_size: width * 0.04,
            font_weight: 600,
        },
        Label {
            x: width / 2.0,
            y: caption_y + height * 0.035,
            text: format!(
                "{percent}% of {} {}",
                options.lifespan,
                plural(i64::from(options.lifespan), "year")
            ),
            fill: color_with_alpha(neutral, theme.unit_label_alpha)?,
            font_size: width * 0.03,
            font_weight: 400,
        },
    ];

    Ok(Layout {
        kind: WallpaperKind::Life,
        width: options.width,
        height: options.height,
        background,
        today,
        diagram: DiagramData::Grid(GridLayout {
            columns: frame.columns,
            rows: frame.rows,
            pitch: frame.pitch,
            shape: CellShape::Square,
            elapsed,
            total,
            elapsed_color: accent,
            remaining_color,
            cells,
            labels,
        }),
    })
}
