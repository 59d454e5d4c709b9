//! Typed drawing fragments and the document they are assembled into.
//!
//! Fragments stay structured until [`Document::to_svg`] so escaping happens
//! in exactly one place.

use std::fmt;

use crate::color::Color;
use crate::error::{Error, Result};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    None,
    Color(Color),
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Paint::Color(color)
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Paint::None => f.write_str("none"),
            Paint::Color(color) => write!(f, "{color}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DominantBaseline {
    #[default]
    Auto,
    Middle,
    Central,
    Hanging,
    Alphabetic,
}

impl DominantBaseline {
    fn as_str(self) -> &'static str {
        match self {
            DominantBaseline::Auto => "auto",
            DominantBaseline::Middle => "middle",
            DominantBaseline::Central => "central",
            DominantBaseline::Hanging => "hanging",
            DominantBaseline::Alphabetic => "alphabetic",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub fill: Paint,
    pub font_size: f64,
    pub font_weight: u16,
    pub text_anchor: TextAnchor,
    pub dominant_baseline: DominantBaseline,
    pub font_family: Option<String>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            fill: Paint::Color(Color::WHITE),
            font_size: 16.0,
            font_weight: 400,
            text_anchor: TextAnchor::Start,
            dominant_baseline: DominantBaseline::Auto,
            font_family: None,
        }
    }
}

impl TextStyle {
    /// Centered on both axes, the layout every label on a wallpaper uses.
    pub fn centered(fill: impl Into<Paint>, font_size: f64, font_weight: u16) -> Self {
        Self {
            fill: fill.into(),
            font_size,
            font_weight,
            text_anchor: TextAnchor::Middle,
            dominant_baseline: DominantBaseline::Middle,
            font_family: None,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner_radius: f64,
        fill: Paint,
    },
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Paint,
        stroke: Option<Stroke>,
    },
    Path {
        d: String,
        stroke: Stroke,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        style: TextStyle,
    },
}

impl Node {
    fn write_svg(&self, out: &mut String) {
        match self {
            Node::Rect {
                x,
                y,
                width,
                height,
                corner_radius,
                fill,
            } => {
                out.push_str(&format!(
                    "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    fmt_num(*x),
                    fmt_num(*y),
                    fmt_num(*width),
                    fmt_num(*height)
                ));
                if *corner_radius > 0.0 {
                    let rx = fmt_num(*corner_radius);
                    out.push_str(&format!(" rx=\"{rx}\" ry=\"{rx}\""));
                }
                out.push_str(&format!(" fill=\"{fill}\"/>"));
            }
            Node::Circle {
                cx,
                cy,
                r,
                fill,
                stroke,
            } => {
                out.push_str(&format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
                    fmt_num(*cx),
                    fmt_num(*cy),
                    fmt_num(*r)
                ));
                if let Some(stroke) = stroke {
                    out.push_str(&format!(
                        " stroke=\"{}\" stroke-width=\"{}\"",
                        stroke.color,
                        fmt_num(stroke.width)
                    ));
                }
                out.push_str(&format!(" fill=\"{fill}\"/>"));
            }
            Node::Path { d, stroke } => {
                out.push_str(&format!(
                    "<path d=\"{d}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-linecap=\"round\"/>",
                    stroke.color,
                    fmt_num(stroke.width)
                ));
            }
            Node::Text {
                x,
                y,
                content,
                style,
            } => {
                out.push_str(&format!(
                    "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}\" font-weight=\"{}\" text-anchor=\"{}\" dominant-baseline=\"{}\"",
                    fmt_num(*x),
                    fmt_num(*y),
                    style.fill,
                    fmt_num(style.font_size),
                    style.font_weight,
                    style.text_anchor.as_str(),
                    style.dominant_baseline.as_str()
                ));
                if let Some(family) = &style.font_family {
                    out.push_str(&format!(" font-family=\"{}\"", escape_xml(family)));
                }
                out.push('>');
                out.push_str(&escape_xml(content));
                out.push_str("</text>");
            }
        }
    }
}

/// An append-only list of fragments on a fixed canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    width: u32,
    height: u32,
    nodes: Vec<Node>,
}

impl Document {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGeometry(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            nodes: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn extend(&mut self, nodes: impl IntoIterator<Item = Node>) {
        self.nodes.extend(nodes);
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::with_capacity(256 + self.nodes.len() * 96);
        let (w, h) = (self.width, self.height);
        svg.push_str(&format!(
            "<svg xmlns=\"{SVG_NS}\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
        ));
        for node in &self.nodes {
            node.write_svg(&mut svg);
        }
        svg.push_str("</svg>");
        svg
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_svg())
    }
}

pub fn create_svg(width: u32, height: u32, nodes: Vec<Node>) -> Result<Document> {
    let mut document = Document::new(width, height)?;
    document.extend(nodes);
    Ok(document)
}

pub fn rect(x: f64, y: f64, width: f64, height: f64, fill: impl Into<Paint>) -> Result<Node> {
    rounded_rect(x, y, width, height, 0.0, fill)
}

pub fn rounded_rect(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    corner_radius: f64,
    fill: impl Into<Paint>,
) -> Result<Node> {
    finite("rect x", x)?;
    finite("rect y", y)?;
    non_negative("rect width", width)?;
    non_negative("rect height", height)?;
    non_negative("rect corner radius", corner_radius)?;
    Ok(Node::Rect {
        x,
        y,
        width,
        height,
        corner_radius,
        fill: fill.into(),
    })
}

pub fn circle(cx: f64, cy: f64, r: f64, fill: impl Into<Paint>) -> Result<Node> {
    finite("circle cx", cx)?;
    finite("circle cy", cy)?;
    non_negative("circle radius", r)?;
    Ok(Node::Circle {
        cx,
        cy,
        r,
        fill: fill.into(),
        stroke: None,
    })
}

/// An unfilled, stroked circle.
pub fn ring(cx: f64, cy: f64, r: f64, stroke: Color, stroke_width: f64) -> Result<Node> {
    finite("ring cx", cx)?;
    finite("ring cy", cy)?;
    non_negative("ring radius", r)?;
    non_negative("ring stroke width", stroke_width)?;
    Ok(Node::Circle {
        cx,
        cy,
        r,
        fill: Paint::None,
        stroke: Some(Stroke {
            color: stroke,
            width: stroke_width,
        }),
    })
}

/// Stroked arc on a clock face: 0° is twelve o'clock, positive angles run
/// clockwise. Returns `None` for a zero-length sweep.
///
/// Sweeps of a full turn or more are clamped to one turn and emitted as two
/// half-circle segments, since a single arc whose endpoints coincide draws
/// nothing.
pub fn arc(
    cx: f64,
    cy: f64,
    r: f64,
    start_deg: f64,
    end_deg: f64,
    stroke: Color,
    stroke_width: f64,
) -> Result<Option<Node>> {
    finite("arc cx", cx)?;
    finite("arc cy", cy)?;
    non_negative("arc radius", r)?;
    finite("arc start angle", start_deg)?;
    finite("arc end angle", end_deg)?;
    non_negative("arc stroke width", stroke_width)?;

    let sweep = end_deg - start_deg;
    if sweep == 0.0 {
        return Ok(None);
    }
    let sweep_flag = if sweep > 0.0 { 1 } else { 0 };
    let radius = fmt_num(r);
    let (sx, sy) = clock_point(cx, cy, r, start_deg);
    let (ex, ey) = clock_point(cx, cy, r, end_deg);
    // A near-full sweep can round onto its own start point, which renders as nothing.
    let closes_on_itself =
        sweep.abs() > 180.0 && fmt_num(sx) == fmt_num(ex) && fmt_num(sy) == fmt_num(ey);

    let d = if sweep.abs() >= 360.0 || closes_on_itself {
        let half = 180.0 * sweep.signum();
        let (mx, my) = clock_point(cx, cy, r, start_deg + half);
        format!(
            "M {} {} A {radius} {radius} 0 1 {sweep_flag} {} {} A {radius} {radius} 0 1 {sweep_flag} {} {}",
            fmt_num(sx),
            fmt_num(sy),
            fmt_num(mx),
            fmt_num(my),
            fmt_num(sx),
            fmt_num(sy)
        )
    } else {
        let large_arc = if sweep.abs() > 180.0 { 1 } else { 0 };
        format!(
            "M {} {} A {radius} {radius} 0 {large_arc} {sweep_flag} {} {}",
            fmt_num(sx),
            fmt_num(sy),
            fmt_num(ex),
            fmt_num(ey)
        )
    };

    Ok(Some(Node::Path {
        d,
        stroke: Stroke {
            color: stroke,
            width: stroke_width,
        },
    }))
}

pub fn text(x: f64, y: f64, content: &str, style: &TextStyle) -> Result<Node> {
    finite("text x", x)?;
    finite("text y", y)?;
    non_negative("font size", style.font_size)?;
    Ok(Node::Text {
        x,
        y,
        content: content.to_string(),
        style: style.clone(),
    })
}

fn clock_point(cx: f64, cy: f64, r: f64, angle_deg: f64) -> (f64, f64) {
    let radians = angle_deg.to_radians();
    (cx + r * radians.sin(), cy - r * radians.cos())
}

fn finite(what: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::InvalidGeometry(format!("{what} is not finite ({value})")))
    }
}

fn non_negative(what: &str, value: f64) -> Result<()> {
    finite(what, value)?;
    if value < 0.0 {
        return Err(Error::InvalidGeometry(format!("{what} is negative ({value})")));
    }
    Ok(())
}

/// Shortest decimal form rounded to three places; integral values print
/// without a fraction.
fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

/// Escapes markup characters and drops code points XML 1.0 cannot carry at
/// all (C0 controls other than tab/newline/return, U+FFFE and U+FFFF).
fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(ch),
            '\u{0}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}' => {}
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::parse_color;

    fn accent() -> Color {
        parse_color("#ff6600").unwrap()
    }

    fn svg_of(node: Node) -> String {
        create_svg(100, 100, vec![node]).unwrap().to_svg()
    }

    #[test]
    fn empty_document_is_well_formed() {
        let svg = create_svg(390, 844, Vec::new()).unwrap().to_svg();
        assert_eq!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"390\" height=\"844\" viewBox=\"0 0 390 844\"></svg>"
        );
    }

    #[test]
    fn zero_canvas_is_rejected() {
        assert!(matches!(create_svg(0, 10, Vec::new()), Err(Error::InvalidGeometry(_))));
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(fmt_num(540.0), "540");
        assert_eq!(fmt_num(12.3456), "12.346");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(fmt_num(0.1), "0.1");
    }

    #[test]
    fn rect_and_circle_markup() {
        let svg = svg_of(rect(0.0, 0.0, 100.0, 50.5, Color::BLACK).unwrap());
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"100\" height=\"50.5\" fill=\"#000000\"/>"));
        let svg = svg_of(circle(10.0, 20.0, 5.0, Paint::None).unwrap());
        assert!(svg.contains("<circle cx=\"10\" cy=\"20\" r=\"5\" fill=\"none\"/>"));
    }

    #[test]
    fn negative_or_nan_geometry_is_rejected() {
        assert!(matches!(rect(0.0, 0.0, -1.0, 1.0, Color::BLACK), Err(Error::InvalidGeometry(_))));
        assert!(matches!(circle(f64::NAN, 0.0, 1.0, Color::BLACK), Err(Error::InvalidGeometry(_))));
        assert!(matches!(circle(0.0, 0.0, -2.0, Color::BLACK), Err(Error::InvalidGeometry(_))));
        assert!(matches!(
            arc(0.0, 0.0, 10.0, 0.0, f64::INFINITY, accent(), 1.0),
            Err(Error::InvalidGeometry(_))
        ));
    }

    #[test]
    fn zero_sweep_draws_nothing() {
        assert!(arc(50.0, 50.0, 40.0, 90.0, 90.0, accent(), 4.0).unwrap().is_none());
    }

    #[test]
    fn quarter_arc_ends_at_three_o_clock() {
        let node = arc(50.0, 50.0, 40.0, 0.0, 90.0, accent(), 4.0).unwrap().unwrap();
        let Node::Path { d, .. } = &node else {
            panic!("expected a path");
        };
        assert_eq!(d, "M 50 10 A 40 40 0 0 1 90 50");
    }

    #[test]
    fn large_arc_flag_set_past_half_turn() {
        let Some(Node::Path { d, .. }) = arc(50.0, 50.0, 40.0, 0.0, 270.0, accent(), 4.0).unwrap()
        else {
            panic!("expected a path");
        };
        assert_eq!(d, "M 50 10 A 40 40 0 1 1 10 50");
    }

    #[test]
    fn full_turn_splits_into_two_segments() {
        for end in [360.0, 720.0] {
            let Some(Node::Path { d, .. }) = arc(50.0, 50.0, 40.0, 0.0, end, accent(), 4.0).unwrap()
            else {
                panic!("expected a path");
            };
            assert_eq!(d, "M 50 10 A 40 40 0 1 1 50 90 A 40 40 0 1 1 50 10");
            assert_eq!(d.matches(" A ").count(), 2);
        }
    }

    #[test]
    fn near_full_turn_is_not_lost_to_rounding() {
        let Some(Node::Path { d, .. }) =
            arc(50.0, 50.0, 40.0, 0.0, 359.9995, accent(), 4.0).unwrap()
        else {
            panic!("expected a path");
        };
        assert_eq!(d, "M 50 10 A 40 40 0 1 1 50 90 A 40 40 0 1 1 50 10");

        let Some(Node::Path { d, .. }) = arc(50.0, 50.0, 40.0, 0.0, 359.0, accent(), 4.0).unwrap()
        else {
            panic!("expected a path");
        };
        assert_eq!(d.matches(" A ").count(), 1);
    }

    #[test]
    fn counter_clockwise_sweep_clears_sweep_flag() {
        let Some(Node::Path { d, .. }) = arc(50.0, 50.0, 40.0, 0.0, -90.0, accent(), 4.0).unwrap()
        else {
            panic!("expected a path");
        };
        assert_eq!(d, "M 50 10 A 40 40 0 0 0 10 50");
    }

    #[test]
    fn text_is_escaped() {
        let style = TextStyle::centered(Color::WHITE, 24.0, 600).with_family("Inter");
        let svg = svg_of(text(50.0, 50.0, "<script>&\"go\"", &style).unwrap());
        assert!(svg.contains(">&lt;script&gt;&amp;&quot;go&quot;</text>"));
        assert!(svg.contains("text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"Inter\""));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn non_xml_characters_are_dropped() {
        let style = TextStyle::centered(Color::WHITE, 24.0, 600);
        let svg = svg_of(text(50.0, 50.0, "Ship\u{1}it\u{c}\u{ffff}\tnow", &style).unwrap());
        assert!(svg.contains(">Shipit\tnow</text>"));
        assert!(!svg.chars().any(|ch| ch < ' ' && ch != '\t'));
    }

    #[test]
    fn ring_has_no_fill() {
        let node = ring(50.0, 50.0, 40.0, Color::WHITE, 3.0).unwrap();
        let svg = svg_of(node);
        assert!(svg.contains("stroke=\"#ffffff\" stroke-width=\"3\" fill=\"none\""));
    }
}
