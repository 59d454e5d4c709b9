use serde::{Deserialize, Serialize};

/// Neutral palette shared by every wallpaper. Background and accent come from
/// the request; everything else is the text color at one of these opacities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    pub font_family: String,
    pub text_color: String,
    pub remaining_alpha: f64,
    pub track_alpha: f64,
    pub unit_label_alpha: f64,
    pub date_label_alpha: f64,
    pub caption_alpha: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            font_family: "Inter".to_string(),
            text_color: "#ffffff".to_string(),
            remaining_alpha: 0.15,
            track_alpha: 0.1,
            unit_label_alpha: 0.6,
            date_label_alpha: 0.4,
            caption_alpha: 0.3,
        }
    }

    /// For pale backgrounds; labels go dark and remaining cells get a touch
    /// more weight so they stay visible.
    pub fn light() -> Self {
        Self {
            text_color: "#000000".to_string(),
            remaining_alpha: 0.12,
            track_alpha: 0.08,
            unit_label_alpha: 0.55,
            date_label_alpha: 0.45,
            caption_alpha: 0.35,
            ..Self::dark()
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" | "default" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }
}
