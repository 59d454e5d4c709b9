use chrono::Utc;
use lifecal_renderer::layout::compute_layout;
use lifecal_renderer::{
    CalendarDate, Config, GenerationOptions, Theme, WallpaperKind, date_in_timezone, render_svg,
    timezone_for_country,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Query-string shaped request. `today` pins the date; otherwise it is read
/// from the clock in the requested (or country-derived) timezone.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WallpaperRequest {
    #[serde(flatten)]
    options: GenerationOptions,
    country: Option<String>,
    theme: Option<String>,
    today: Option<String>,
}

fn render_request(kind: &str, request: WallpaperRequest) -> lifecal_renderer::Result<String> {
    let kind: WallpaperKind = kind.parse()?;
    let mut options = request.options;
    if request.country.is_some() {
        options.timezone = timezone_for_country(request.country.as_deref());
    }
    options.validate()?;

    let mut config = Config::default();
    if let Some(name) = request.theme.as_deref() {
        config.theme = Theme::from_name(name).unwrap_or_default();
    }
    let today = match request.today.as_deref() {
        Some(date) => CalendarDate::parse(date)?,
        None => date_in_timezone(options.timezone, Utc::now()),
    };

    let layout = compute_layout(kind, &options, &config.layout, &config.theme, today)?;
    render_svg(&layout, &config.theme)
}

#[wasm_bindgen]
pub fn render_wallpaper_svg(kind: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let request = if let Some(raw_options) = options_json {
        serde_json::from_str::<WallpaperRequest>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        WallpaperRequest::default()
    };

    render_request(kind, request).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::{WallpaperRequest, render_request};

    #[test]
    fn renders_goal_from_query_shaped_json() {
        let request: WallpaperRequest = serde_json::from_str(
            r#"{
                "width": 390,
                "height": 844,
                "goalDate": "2025-12-25",
                "goalName": "Launch%20day",
                "country": "jp",
                "today": "2025-11-25"
            }"#,
        )
        .expect("request should deserialize");

        let svg = render_request("goal", request).expect("goal wallpaper should render");

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">30</text>"));
        assert!(svg.contains(">Launch day</text>"));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        assert!(render_request("month", WallpaperRequest::default()).is_err());
    }
}
