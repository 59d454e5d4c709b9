use crate::color::{color_with_alpha, parse_color};
use crate::config::{GenerationOptions, Granularity, LayoutConfig};
use crate::date::CalendarDate;
use crate::error::Result;
use crate::theme::Theme;

use super::grid::{build_cells, fit_grid, grid_area, CellShape};
use super::{plural, DiagramData, GridLayout, Label, Layout, WallpaperKind};

pub(super) fn compute_year_layout(
    options: &GenerationOptions,
    config: &LayoutConfig,
    theme: &Theme,
    today: CalendarDate,
) -> Result<Layout> {
    let background = parse_color(&options.bg_color)?;
    let accent = parse_color(&options.accent_color)?;
    let neutral = parse_color(&theme.text_color)?;
    let remaining_color = color_with_alpha(neutral, theme.remaining_alpha)?;

    let day_of_year = today.day_of_year();
    let days_in_year = today.days_in_year();
    // Today's cell counts as elapsed, so the current week does too.
    let (total, elapsed, shape, unit) = match config.year_granularity {
        Granularity::Days => (days_in_year, day_of_year, CellShape::Dot, "day"),
        Granularity::Weeks => (
            days_in_year.div_ceil(7),
            day_of_year.div_ceil(7),
            CellShape::Square,
            "week",
        ),
    };

    let area = grid_area(options, config)?;
    let frame = fit_grid(total, &area, config.year_columns);
    let cells = build_cells(total, elapsed, &frame, config.cell_gap);

    let width = f64::from(options.width);
    let height = f64::from(options.height);
    let left = total - elapsed;
    let percent = (f64::from(day_of_year) / f64::from(days_in_year) * 100.0).floor();
    let caption_y = frame.bottom() + height * 0.05;
    let labels = vec![
        Label {
            x: width / 2.0,
            y: caption_y,
            text: format!("{left} {} left", plural(i64::from(left), unit)),
            fill: accent,
            font_size: width * 0.04,
            font_weight: 600,
        },
        Label {
            x: width / 2.0,
            y: caption_y + height * 0.035,
            text: format!("{percent}% of {}", today.year()),
            fill: color_with_alpha(neutral, theme.unit_label_alpha)?,
            font_size: width * 0.03,
            font_weight: 400,
        },
    ];

    Ok(Layout {
        kind: WallpaperKind::Year,
        width: options.width,
        height: options.height,
        background,
        today,
        diagram: DiagramData::Grid(GridLayout {
            columns: frame.columns,
            rows: frame.rows,
            pitch: frame.pitch,
            shape,
            elapsed,
            total,
            elapsed_color: accent,
            remaining_color,
            cells,
            labels,
        }),
    })
}
