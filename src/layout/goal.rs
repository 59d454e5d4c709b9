use percent_encoding::percent_decode_str;
use serde::Serialize;

use crate::color::{color_with_alpha, parse_color};
use crate::config::GenerationOptions;
use crate::date::{days_between, CalendarDate};
use crate::error::{Error, Result};
use crate::text_metrics::fit_font_size;
use crate::theme::Theme;

use super::{plural, DiagramData, GoalLayout, Label, Layout, WallpaperKind};

/// Denominator floor for the progress arc. Keeps near goals from drawing an
/// almost-closed ring.
pub const PROGRESS_FLOOR_DAYS: i64 = 365;
/// Target used when no goal date is given.
pub const DEFAULT_HORIZON_DAYS: i64 = 30;
const DEFAULT_GOAL_NAME: &str = "Goal";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalProgress {
    pub days_remaining: i64,
    pub total_days: i64,
    pub days_elapsed: i64,
    /// Fraction in (0, 1].
    pub progress: f64,
}

impl GoalProgress {
    pub fn between(today: CalendarDate, target: CalendarDate) -> Self {
        let days_remaining = days_between(today, target).max(0);
        let total_days = (days_remaining + 1).max(PROGRESS_FLOOR_DAYS);
        let days_elapsed = total_days - days_remaining;
        let progress = (days_elapsed as f64 / total_days as f64).min(1.0);
        Self {
            days_remaining,
            total_days,
            days_elapsed,
            progress,
        }
    }

    pub fn sweep_deg(&self) -> f64 {
        self.progress * 360.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Motivation {
    TodaysTheDay,
    FinalStretch,
    UnderAMonth,
    GoodProgress,
    StayFocused,
}

impl Motivation {
    /// Inclusive upper bounds, checked in ascending order.
    pub fn for_days_remaining(days: i64) -> Self {
        match days {
            i64::MIN..=0 => Motivation::TodaysTheDay,
            1..=7 => Motivation::FinalStretch,
            8..=30 => Motivation::UnderAMonth,
            31..=100 => Motivation::GoodProgress,
            _ => Motivation::StayFocused,
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Motivation::TodaysTheDay => "Today's the day! 🎯",
            Motivation::FinalStretch => "Almost there! Final stretch.",
            Motivation::UnderAMonth => "Less than a month to go!",
            Motivation::GoodProgress => "Making great progress.",
            Motivation::StayFocused => "Stay focused. Every day counts.",
        }
    }
}

/// Goal names arrive percent-encoded from the query string.
pub fn decode_goal_name(raw: &str) -> Result<String> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|name| name.into_owned())
        .map_err(|err| Error::InvalidEncoding(format!("goal name {raw:?}: {err}")))
}

pub(super) fn compute_goal_layout(
    options: &GenerationOptions,
    theme: &Theme,
    today: CalendarDate,
) -> Result<Layout> {
    let background = parse_color(&options.bg_color)?;
    let accent = parse_color(&options.accent_color)?;
    let neutral = parse_color(&theme.text_color)?;

    let target = match options.goal_date.as_deref() {
        Some(goal) => CalendarDate::parse(goal)?,
        None => today.add_days(DEFAULT_HORIZON_DAYS)?,
    };
    let name = decode_goal_name(options.goal_name.as_deref().unwrap_or(DEFAULT_GOAL_NAME))?;
    let progress = GoalProgress::between(today, target);
    let motivation = Motivation::for_days_remaining(progress.days_remaining);

    let width = f64::from(options.width);
    let height = f64::from(options.height);
    let center = (width / 2.0, height * 0.45);
    let radius = width * 0.25;
    let stroke_width = width * 0.03;

    let label = |y: f64, text: String, fill, font_size: f64, font_weight: u16| Label {
        x: center.0,
        y,
        text,
        fill,
        font_size,
        font_weight,
    };
    let name_size = fit_font_size(&name, width * 0.05, 600, width * 0.9);
    let labels = vec![
        label(
            center.1 - height * 0.02,
            progress.days_remaining.to_string(),
            accent,
            width * 0.18,
            700,
        ),
        label(
            center.1 + height * 0.06,
            plural(progress.days_remaining, "day"),
            color_with_alpha(neutral, theme.unit_label_alpha)?,
            width * 0.04,
            400,
        ),
        label(height * 0.72, name, neutral, name_size, 600),
        label(
            height * 0.78,
            target.format_long(),
            color_with_alpha(neutral, theme.date_label_alpha)?,
            width * 0.03,
            400,
        ),
        label(
            height * 0.88,
            motivation.caption().to_string(),
            color_with_alpha(neutral, theme.caption_alpha)?,
            width * 0.025,
            400,
        ),
    ];

    Ok(Layout {
        kind: WallpaperKind::Goal,
        width: options.width,
        height: options.height,
        background,
        today,
        diagram: DiagramData::Goal(GoalLayout {
            center,
            radius,
            stroke_width,
            track_color: color_with_alpha(neutral, theme.track_alpha)?,
            arc_color: accent,
            target,
            progress,
            sweep_deg: progress.sweep_deg(),
            motivation,
            labels,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    fn goal_layout(goal_date: Option<&str>, goal_name: Option<&str>, today: &str) -> GoalLayout {
        let options = GenerationOptions {
            goal_date: goal_date.map(str::to_string),
            goal_name: goal_name.map(str::to_string),
            ..Default::default()
        };
        let layout = compute_goal_layout(&options, &Theme::default(), date(today)).unwrap();
        match layout.diagram {
            DiagramData::Goal(goal) => goal,
            other => panic!("expected a goal layout, got {other:?}"),
        }
    }

    #[test]
    fn launch_countdown_matches_formula() {
        let goal = goal_layout(Some("2025-12-25"), Some("Launch"), "2025-11-25");
        assert_eq!(goal.progress.days_remaining, 30);
        assert_eq!(goal.progress.total_days, 365);
        assert_eq!(goal.progress.days_elapsed, 335);
        assert_eq!(goal.progress.progress, 335.0 / 365.0);
        assert!((goal.sweep_deg - 330.410_958_904_109_6).abs() < 1e-9);
        assert_eq!(goal.motivation, Motivation::UnderAMonth);
        assert_eq!(goal.motivation.caption(), "Less than a month to go!");
        assert_eq!(goal.labels[2].text, "Launch");
        assert_eq!(goal.labels[3].text, "December 25, 2025");
    }

    #[test]
    fn omitted_goal_defaults_to_thirty_days_out() {
        let goal = goal_layout(None, None, "2025-12-20");
        assert_eq!(goal.target, date("2026-01-19"));
        assert_eq!(goal.progress.days_remaining, 30);
        assert_eq!(goal.labels[2].text, "Goal");
    }

    #[test]
    fn past_goals_never_go_negative() {
        let goal = goal_layout(Some("2020-01-01"), None, "2025-11-25");
        assert_eq!(goal.progress.days_remaining, 0);
        assert_eq!(goal.progress.total_days, 365);
        assert_eq!(goal.progress.days_elapsed, 365);
        assert_eq!(goal.progress.progress, 1.0);
        assert_eq!(goal.sweep_deg, 360.0);
        assert_eq!(goal.motivation, Motivation::TodaysTheDay);
        assert_eq!(goal.labels[0].text, "0");
        assert_eq!(goal.labels[1].text, "days");
    }

    #[test]
    fn far_goals_stretch_the_denominator() {
        let progress = GoalProgress::between(date("2025-01-01"), date("2027-01-01"));
        assert_eq!(progress.days_remaining, 730);
        assert_eq!(progress.total_days, 731);
        assert_eq!(progress.days_elapsed, 1);
        assert!(progress.progress > 0.0 && progress.progress <= 1.0);
    }

    #[test]
    fn motivation_thresholds() {
        let expected = [
            (0, "Today's the day! 🎯"),
            (1, "Almost there! Final stretch."),
            (7, "Almost there! Final stretch."),
            (8, "Less than a month to go!"),
            (30, "Less than a month to go!"),
            (31, "Making great progress."),
            (100, "Making great progress."),
            (101, "Stay focused. Every day counts."),
            (500, "Stay focused. Every day counts."),
        ];
        for (days, caption) in expected {
            assert_eq!(Motivation::for_days_remaining(days).caption(), caption, "{days}");
        }
    }

    #[test]
    fn single_day_is_singular() {
        let goal = goal_layout(Some("2025-11-26"), None, "2025-11-25");
        assert_eq!(goal.labels[1].text, "day");
    }

    #[test]
    fn goal_name_is_percent_decoded() {
        assert_eq!(decode_goal_name("Run%20a%20marathon").unwrap(), "Run a marathon");
        assert_eq!(decode_goal_name("Caf%C3%A9").unwrap(), "Café");
        assert!(matches!(decode_goal_name("%FF%FE"), Err(Error::InvalidEncoding(_))));
        let goal = goal_layout(None, Some("%3Cb%3Ebold%3C%2Fb%3E"), "2025-11-25");
        assert_eq!(goal.labels[2].text, "<b>bold</b>");
    }

    #[test]
    fn long_names_shrink_to_fit() {
        let long = "Finish%20writing%20the%20novel%20and%20send%20it%20to%20every%20agent%20in%20town";
        let goal = goal_layout(None, Some(long), "2025-11-25");
        let default_size = f64::from(GenerationOptions::default().width) * 0.05;
        assert!(goal.labels[2].font_size < default_size);
    }
}
