use crate::color::parse_color;
use crate::date::CalendarDate;
use crate::error::{Error, Result};
use crate::theme::Theme;
use crate::timezone::Timezone;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Share of the canvas height kept free at the top for the lock-screen clock.
pub const DEFAULT_CLOCK_HEIGHT: f64 = 0.25;
const MAX_CLOCK_HEIGHT: f64 = 0.8;
/// Longest lifespan, in years, a life calendar will lay out.
pub const MAX_LIFESPAN: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Granularity {
    #[default]
    Days,
    Weeks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub year_granularity: Granularity,
    /// Fixed column counts; `None` picks the count whose cells best fill the
    /// available area.
    pub year_columns: Option<u32>,
    pub life_columns: Option<u32>,
    /// Fraction of each grid pitch left empty between cells.
    pub cell_gap: f64,
    /// Horizontal margin as a fraction of the canvas width.
    pub side_margin: f64,
    /// Space under the grid reserved for the progress caption, as a fraction
    /// of the canvas height.
    pub footer_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            year_granularity: Granularity::Days,
            year_columns: None,
            life_columns: None,
            cell_gap: 0.3,
            side_margin: 0.08,
            footer_height: 0.14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "lowercase")]
pub enum FitTo {
    Original,
    Width(u32),
    Height(u32),
    Zoom(f32),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub fit_to: FitTo,
    pub load_system_fonts: bool,
    pub default_font_family: String,
    pub font_files: Vec<PathBuf>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fit_to: FitTo::Original,
            load_system_fonts: false,
            default_font_family: "Inter".to_string(),
            font_files: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

/// Everything one wallpaper needs, already defaulted. Generators only read it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    pub width: u32,
    pub height: u32,
    pub bg_color: String,
    pub accent_color: String,
    pub timezone: Timezone,
    pub clock_height: f64,
    pub dob: Option<String>,
    pub lifespan: u32,
    pub goal_date: Option<String>,
    /// Percent-encoded, as it arrives in a query string.
    pub goal_name: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            width: 1170,
            height: 2532,
            bg_color: "#000000".to_string(),
            accent_color: "#ffffff".to_string(),
            timezone: Timezone::Utc,
            clock_height: DEFAULT_CLOCK_HEIGHT,
            dob: None,
            lifespan: 80,
            goal_date: None,
            goal_name: None,
        }
    }
}

impl GenerationOptions {
    /// Up-front checks an orchestrator runs before picking a generator.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidGeometry(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.clock_height.is_finite() || !(0.0..=MAX_CLOCK_HEIGHT).contains(&self.clock_height)
        {
            return Err(Error::InvalidGeometry(format!(
                "clock height {} outside [0, {MAX_CLOCK_HEIGHT}]",
                self.clock_height
            )));
        }
        if !(1..=MAX_LIFESPAN).contains(&self.lifespan) {
            return Err(Error::InvalidGeometry(format!(
                "lifespan {} outside [1, {MAX_LIFESPAN}] years",
                self.lifespan
            )));
        }
        parse_color(&self.bg_color)?;
        parse_color(&self.accent_color)?;
        if let Some(dob) = &self.dob {
            CalendarDate::parse(dob)?;
        }
        if let Some(goal) = &self.goal_date {
            CalendarDate::parse(goal)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    text_color: Option<String>,
    remaining_alpha: Option<f64>,
    track_alpha: Option<f64>,
    unit_label_alpha: Option<f64>,
    date_label_alpha: Option<f64>,
    caption_alpha: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfig>,
    render: Option<RenderConfig>,
}

/// Loads a JSON (or JSON5) config file on top of the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("failed to parse {}: {err}", path.display()))?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::from_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme {theme_name:?}"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.text_color {
            parse_color(&v)?;
            config.theme.text_color = v;
        }
        if let Some(v) = vars.remaining_alpha {
            config.theme.remaining_alpha = v;
        }
        if let Some(v) = vars.track_alpha {
            config.theme.track_alpha = v;
        }
        if let Some(v) = vars.unit_label_alpha {
            config.theme.unit_label_alpha = v;
        }
        if let Some(v) = vars.date_label_alpha {
            config.theme.date_label_alpha = v;
        }
        if let Some(v) = vars.caption_alpha {
            config.theme.caption_alpha = v;
        }
    }

    if let Some(layout) = parsed.layout {
        config.layout = layout;
    }
    if let Some(render) = parsed.render {
        config.render = render;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("lifecal-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn missing_path_yields_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.theme.font_family, "Inter");
        assert_eq!(config.layout.year_granularity, Granularity::Days);
        assert_eq!(config.render.fit_to, FitTo::Original);
        assert!(!config.render.load_system_fonts);
    }

    #[test]
    fn json5_overrides_merge_onto_defaults() {
        let path = write_temp(
            "merge.json5",
            r#"{
                // comments are fine
                theme: "light",
                themeVariables: { captionAlpha: 0.5 },
                layout: { yearGranularity: "weeks", lifeColumns: 52 },
                render: { fitTo: { mode: "width", value: 540 } },
            }"#,
        );
        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.theme.text_color, "#000000");
        assert_eq!(config.theme.caption_alpha, 0.5);
        assert_eq!(config.layout.year_granularity, Granularity::Weeks);
        assert_eq!(config.layout.life_columns, Some(52));
        assert_eq!(config.layout.cell_gap, 0.3);
        assert_eq!(config.render.fit_to, FitTo::Width(540));
    }

    #[test]
    fn unknown_theme_is_an_error() {
        let path = write_temp("theme.json", r#"{"theme": "neon"}"#);
        let result = load_config(Some(&path));
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn options_deserialize_from_camel_case() {
        let options: GenerationOptions = serde_json::from_str(
            r##"{"width": 750, "height": 1334, "accentColor": "#ff6b35", "timezone": "Asia/Tokyo", "goalName": "Ship%20it"}"##,
        )
        .unwrap();
        assert_eq!(options.width, 750);
        assert_eq!(options.bg_color, "#000000");
        assert_eq!(options.timezone.to_string(), "Asia/Tokyo");
        assert_eq!(options.goal_name.as_deref(), Some("Ship%20it"));
        assert!(options.validate().is_ok());
    }

    #[test]
    fn validation_catches_bad_fields() {
        let bad_color = GenerationOptions {
            accent_color: "chartreuse-ish".to_string(),
            ..Default::default()
        };
        assert!(matches!(bad_color.validate(), Err(Error::InvalidColor(_))));

        let bad_dob = GenerationOptions {
            dob: Some("1990-02-30".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_dob.validate(), Err(Error::InvalidDate(_))));

        let bad_clock = GenerationOptions {
            clock_height: 0.95,
            ..Default::default()
        };
        assert!(matches!(bad_clock.validate(), Err(Error::InvalidGeometry(_))));

        for lifespan in [0, MAX_LIFESPAN + 1, u32::MAX] {
            let bad_lifespan = GenerationOptions {
                lifespan,
                ..Default::default()
            };
            assert!(
                matches!(bad_lifespan.validate(), Err(Error::InvalidGeometry(_))),
                "{lifespan}"
            );
        }
        let oldest = GenerationOptions {
            lifespan: MAX_LIFESPAN,
            ..Default::default()
        };
        assert!(oldest.validate().is_ok());
    }
}
