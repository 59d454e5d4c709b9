//! Approximate text widths.
//!
//! Fonts are not guaranteed to exist where the SVG is rasterized, so widths
//! are estimated from the declared font size and weight alone.

/// Estimated advance width of `text` in user units.
pub fn estimate_text_width(text: &str, font_size: f64, font_weight: u16) -> f64 {
    if text.is_empty() || font_size <= 0.0 {
        return 0.0;
    }
    let ems: f64 = text.chars().map(char_advance).sum();
    ems * font_size * weight_factor(font_weight)
}

/// Largest size not exceeding `font_size` at which `text` fits in `max_width`.
pub fn fit_font_size(text: &str, font_size: f64, font_weight: u16, max_width: f64) -> f64 {
    let width = estimate_text_width(text, font_size, font_weight);
    if width <= max_width || width <= 0.0 {
        return font_size;
    }
    font_size * (max_width / width).max(0.0)
}

fn char_advance(ch: char) -> f64 {
    match ch {
        'i' | 'j' | 'l' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' => 0.28,
        ' ' | 'f' | 't' | 'r' | '(' | ')' | '-' => 0.36,
        'm' | 'w' | 'M' | 'W' => 0.86,
        c if c.is_ascii_digit() => 0.58,
        c if c.is_ascii_uppercase() => 0.68,
        c if c.is_ascii() => 0.55,
        // CJK, emoji and other wide glyphs take roughly a full em.
        _ => 1.0,
    }
}

fn weight_factor(weight: u16) -> f64 {
    1.0 + (f64::from(weight.clamp(100, 900)) - 400.0) / 500.0 * 0.08
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_width() {
        assert_eq!(estimate_text_width("", 40.0, 400), 0.0);
        assert_eq!(estimate_text_width("abc", 0.0, 400), 0.0);
    }

    #[test]
    fn width_scales_with_size_and_weight() {
        let regular = estimate_text_width("Launch", 20.0, 400);
        assert!((estimate_text_width("Launch", 40.0, 400) - regular * 2.0).abs() < 1e-9);
        assert!(estimate_text_width("Launch", 20.0, 700) > regular);
    }

    #[test]
    fn fitting_only_shrinks() {
        assert_eq!(fit_font_size("Run", 50.0, 600, 1000.0), 50.0);
        let long = "Finish the marathon training block before spring";
        let fitted = fit_font_size(long, 50.0, 600, 500.0);
        assert!(fitted < 50.0);
        assert!(estimate_text_width(long, fitted, 600) <= 500.0 + 1e-6);
    }
}
