use crate::config::{load_config, Config, GenerationOptions, Granularity};
use crate::date::CalendarDate;
use crate::devices::{device, DEVICES};
use crate::layout::{compute_layout, WallpaperKind};
use crate::layout_dump::write_layout_dump;
use crate::render::{render_svg, write_output_svg};
use crate::timezone::{timezone_for_country, today_in, Timezone};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lifecal", version, about = "Calendar wallpaper renderer (year progress, life in weeks, goal countdown)")]
pub struct Args {
    /// Wallpaper type
    #[arg(short = 't', long = "type", value_enum, default_value = "year")]
    pub kind: WallpaperKind,

    /// Output file (svg/png). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON/JSON5 file (theme, layout and raster settings)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Device name from the built-in table, e.g. "Google Pixel 8"
    #[arg(short = 'd', long = "device")]
    pub device: Option<String>,

    /// Width (overrides --device)
    #[arg(short = 'w', long = "width", value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Height (overrides --device)
    #[arg(short = 'H', long = "height", value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Background color
    #[arg(long = "bg")]
    pub bg: Option<String>,

    /// Accent color
    #[arg(long = "accent")]
    pub accent: Option<String>,

    /// ISO country code used to pick a timezone
    #[arg(long = "country", conflicts_with = "timezone")]
    pub country: Option<String>,

    /// Timezone: UTC, an offset like +05:30, or an IANA name
    #[arg(long = "timezone")]
    pub timezone: Option<String>,

    /// Share of the canvas height reserved for the lock-screen clock
    #[arg(long = "clockHeight")]
    pub clock_height: Option<f64>,

    /// Date of birth (YYYY-MM-DD), required for life calendars
    #[arg(long = "dob")]
    pub dob: Option<String>,

    /// Expected lifespan in years
    #[arg(long = "lifespan")]
    pub lifespan: Option<u32>,

    /// Goal date (YYYY-MM-DD); defaults to 30 days from today
    #[arg(long = "goal")]
    pub goal: Option<String>,

    /// Goal name
    #[arg(long = "goalName")]
    pub goal_name: Option<String>,

    /// Year calendar cell granularity
    #[arg(long = "granularity", value_enum)]
    pub granularity: Option<Granularity>,

    /// Render as of this date (YYYY-MM-DD) instead of today
    #[arg(long = "today")]
    pub today: Option<String>,

    /// Write the computed layout as JSON
    #[arg(long = "dumpLayout")]
    pub dump_layout: Option<PathBuf>,

    /// Print the device table and exit
    #[arg(long = "listDevices")]
    pub list_devices: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    if args.list_devices {
        print_devices();
        return Ok(());
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(granularity) = args.granularity {
        config.layout.year_granularity = granularity;
    }

    let options = build_options(&args)?;
    options.validate()?;
    if args.kind == WallpaperKind::Life && options.dob.is_none() {
        return Err(anyhow::anyhow!("--dob is required for life calendars"));
    }

    let today = match args.today.as_deref() {
        Some(date) => CalendarDate::parse(date)?,
        None => today_in(options.timezone),
    };
    info!(kind = %args.kind, %today, timezone = %options.timezone, "rendering wallpaper");

    let layout = compute_layout(args.kind, &options, &config.layout, &config.theme, today)?;
    if let Some(path) = args.dump_layout.as_deref() {
        write_layout_dump(path, &layout)?;
    }
    let svg = render_svg(&layout, &config.theme)?;

    match args.output_format {
        OutputFormat::Svg => {
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            write_png(&svg, &output, &config)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_devices() {
    for entry in DEVICES.iter() {
        match entry.dimensions() {
            Some((w, h)) => println!("{:<32} {:>5}x{:<5} {}", entry.name, w, h, entry.category.as_str()),
            None => println!("{:<32} {:>11} {}", entry.name, "-", entry.category.as_str()),
        }
    }
}

/// Defaults, then the device size, then explicit flags.
fn build_options(args: &Args) -> Result<GenerationOptions> {
    let mut options = GenerationOptions::default();

    if let Some(name) = args.device.as_deref() {
        let found = device(name).ok_or_else(|| anyhow::anyhow!("unknown device {name:?}"))?;
        match found.dimensions() {
            Some((w, h)) => {
                options.width = w;
                options.height = h;
            }
            None if args.width.is_none() || args.height.is_none() => {
                return Err(anyhow::anyhow!(
                    "device {:?} needs explicit --width and --height",
                    found.name
                ));
            }
            None => {}
        }
    }
    if let Some(width) = args.width {
        options.width = width;
    }
    if let Some(height) = args.height {
        options.height = height;
    }
    if let Some(bg) = &args.bg {
        options.bg_color = bg.clone();
    }
    if let Some(accent) = &args.accent {
        options.accent_color = accent.clone();
    }

    options.timezone = match (&args.timezone, &args.country) {
        (Some(tz), _) => Timezone::parse(tz)?,
        (None, country) => timezone_for_country(country.as_deref()),
    };

    if let Some(clock_height) = args.clock_height {
        options.clock_height = clock_height;
    }
    options.dob = args.dob.clone();
    if let Some(lifespan) = args.lifespan {
        options.lifespan = lifespan;
    }
    options.goal_date = args.goal.clone();
    // Generators expect the query-string form.
    options.goal_name = args
        .goal_name
        .as_deref()
        .map(|name| utf8_percent_encode(name, NON_ALPHANUMERIC).to_string());

    Ok(options)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!(
        "Output path required for {} output",
        ext
    ))
}

#[cfg(feature = "png")]
fn write_png(svg: &str, output: &Path, config: &Config) -> Result<()> {
    let rasterizer = crate::render::Rasterizer::new(config.render.clone());
    crate::render::write_output_png(svg, output, &rasterizer)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _output: &Path, _config: &Config) -> Result<()> {
    Err(anyhow::anyhow!("built without PNG support (enable the `png` feature)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        let mut full = vec!["lifecal"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(Args::try_parse_from(["lifecal", "--type", "month"]).is_err());
        assert_eq!(parse(&[]).kind, WallpaperKind::Year);
    }

    #[test]
    fn explicit_size_overrides_device() {
        let options = build_options(&parse(&["--device", "Google Pixel 8"])).unwrap();
        assert_eq!((options.width, options.height), (1080, 2400));
        let options =
            build_options(&parse(&["--device", "Google Pixel 8", "--width", "900"])).unwrap();
        assert_eq!((options.width, options.height), (900, 2400));
    }

    #[test]
    fn custom_device_needs_a_size() {
        assert!(build_options(&parse(&["--device", "Custom"])).is_err());
        let options =
            build_options(&parse(&["--device", "Custom", "-w", "640", "-H", "480"])).unwrap();
        assert_eq!((options.width, options.height), (640, 480));
    }

    #[test]
    fn country_resolves_timezone() {
        let options = build_options(&parse(&["--country", "jp"])).unwrap();
        assert_eq!(options.timezone.to_string(), "Asia/Tokyo");
        let options = build_options(&parse(&["--timezone", "+05:30"])).unwrap();
        assert_eq!(options.timezone.to_string(), "+05:30");
        assert!(Args::try_parse_from(["lifecal", "--country", "jp", "--timezone", "UTC"]).is_err());
    }

    #[test]
    fn goal_name_is_encoded_for_the_generator() {
        let options = build_options(&parse(&["--type", "goal", "--goalName", "100% done"])).unwrap();
        let encoded = options.goal_name.unwrap();
        assert_eq!(encoded, "100%25%20done");
        assert_eq!(
            crate::layout::decode_goal_name(&encoded).unwrap(),
            "100% done"
        );
    }
}
