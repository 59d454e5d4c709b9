#[cfg(feature = "cli")]
pub mod cli;
pub mod color;
pub mod config;
pub mod date;
pub mod devices;
pub mod error;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod svg;
pub mod text_metrics;
pub mod theme;
pub mod timezone;

#[cfg(feature = "cli")]
pub use cli::run;
pub use color::{color_with_alpha, parse_color, Color};
pub use config::{load_config, Config, GenerationOptions, Granularity, LayoutConfig, RenderConfig};
pub use date::{days_between, CalendarDate};
pub use error::{Error, Result};
pub use layout::{compute_layout, Layout, WallpaperKind};
#[cfg(feature = "png")]
pub use render::Rasterizer;
pub use render::{render_document, render_svg};
pub use svg::{create_svg, Document};
pub use theme::Theme;
pub use timezone::{date_in_timezone, timezone_for_country, Timezone};

use chrono::{DateTime, Utc};

/// Renders one wallpaper as SVG for the instant `now`, observed in the
/// options' timezone.
pub fn render_wallpaper(
    kind: WallpaperKind,
    options: &GenerationOptions,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<String> {
    let today = date_in_timezone(options.timezone, now);
    let layout = compute_layout(kind, options, &config.layout, &config.theme, today)?;
    render_svg(&layout, &config.theme)
}
