use crate::error::Result;
use crate::layout::{CellShape, DiagramData, GoalLayout, GridLayout, Label, Layout};
use crate::svg::{arc, circle, rect, ring, rounded_rect, text, Document, Node, TextStyle};
use crate::theme::Theme;
use std::path::Path;

#[cfg(feature = "png")]
pub use raster::Rasterizer;

/// Composes a computed layout into a document: background first, then cells
/// or rings, labels last.
pub fn render_document(layout: &Layout, theme: &Theme) -> Result<Document> {
    let mut document = Document::new(layout.width, layout.height)?;
    document.push(rect(
        0.0,
        0.0,
        f64::from(layout.width),
        f64::from(layout.height),
        layout.background,
    )?);

    let labels = match &layout.diagram {
        DiagramData::Grid(grid) => {
            push_grid(&mut document, grid)?;
            &grid.labels
        }
        DiagramData::Goal(goal) => {
            push_goal(&mut document, goal)?;
            &goal.labels
        }
    };
    for label in labels {
        document.push(label_node(label, theme)?);
    }
    Ok(document)
}

pub fn render_svg(layout: &Layout, theme: &Theme) -> Result<String> {
    Ok(render_document(layout, theme)?.to_svg())
}

fn push_grid(document: &mut Document, grid: &GridLayout) -> Result<()> {
    for cell in &grid.cells {
        let fill = if cell.elapsed {
            grid.elapsed_color
        } else {
            grid.remaining_color
        };
        let node = match grid.shape {
            CellShape::Dot => {
                let r = cell.size / 2.0;
                circle(cell.x + r, cell.y + r, r, fill)?
            }
            CellShape::Square => {
                rounded_rect(cell.x, cell.y, cell.size, cell.size, cell.size * 0.2, fill)?
            }
        };
        document.push(node);
    }
    Ok(())
}

fn push_goal(document: &mut Document, goal: &GoalLayout) -> Result<()> {
    let (cx, cy) = goal.center;
    document.push(ring(cx, cy, goal.radius, goal.track_color, goal.stroke_width)?);
    if goal.progress.progress > 0.0 {
        if let Some(path) = arc(
            cx,
            cy,
            goal.radius,
            0.0,
            goal.sweep_deg,
            goal.arc_color,
            goal.stroke_width,
        )? {
            document.push(path);
        }
    }
    Ok(())
}

fn label_node(label: &Label, theme: &Theme) -> Result<Node> {
    let style = TextStyle::centered(label.fill, label.font_size, label.font_weight)
        .with_family(theme.font_family.clone());
    text(label.x, label.y, &label.text, &style)
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, rasterizer: &Rasterizer) -> anyhow::Result<()> {
    let png = rasterizer.render_png(svg)?;
    std::fs::write(output, png)?;
    Ok(())
}

#[cfg(feature = "png")]
mod raster {
    use std::sync::Arc;

    use once_cell::sync::OnceCell;
    use tracing::{info, warn};
    use usvg::fontdb;

    use crate::config::{FitTo, RenderConfig};
    use crate::error::{Error, Result};

    /// Vector-to-PNG converter. The font database is built on first use and
    /// shared afterwards; concurrent first callers wait for that one build.
    pub struct Rasterizer {
        config: RenderConfig,
        fonts: OnceCell<Arc<fontdb::Database>>,
    }

    impl Rasterizer {
        pub fn new(config: RenderConfig) -> Self {
            Self {
                config,
                fonts: OnceCell::new(),
            }
        }

        pub fn is_initialized(&self) -> bool {
            self.fonts.get().is_some()
        }

        pub fn font_database(&self) -> Arc<fontdb::Database> {
            self.fonts
                .get_or_init(|| {
                    let mut db = fontdb::Database::new();
                    if self.config.load_system_fonts {
                        db.load_system_fonts();
                    }
                    for path in &self.config.font_files {
                        if let Err(err) = db.load_font_file(path) {
                            warn!(path = %path.display(), %err, "skipping unreadable font");
                        }
                    }
                    db.set_sans_serif_family(self.config.default_font_family.clone());
                    info!(faces = db.len(), "font database ready");
                    Arc::new(db)
                })
                .clone()
        }

        pub fn render_png(&self, svg: &str) -> Result<Vec<u8>> {
            let mut opt = usvg::Options::default();
            opt.font_family = self.config.default_font_family.clone();
            opt.fontdb = self.font_database();

            let tree = usvg::Tree::from_str(svg, &opt).map_err(|err| Error::Rasterize(err.to_string()))?;
            let size = tree.size().to_int_size();
            let (width, height) = fit_size(self.config.fit_to, size.width(), size.height())?;
            let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
                .ok_or_else(|| Error::Rasterize(format!("failed to allocate {width}x{height} pixmap")))?;

            let transform = resvg::tiny_skia::Transform::from_scale(
                width as f32 / size.width() as f32,
                height as f32 / size.height() as f32,
            );
            resvg::render(&tree, transform, &mut pixmap.as_mut());
            pixmap
                .encode_png()
                .map_err(|err| Error::Rasterize(err.to_string()))
        }
    }

    impl Default for Rasterizer {
        fn default() -> Self {
            Self::new(RenderConfig::default())
        }
    }

    fn fit_size(fit_to: FitTo, width: u32, height: u32) -> Result<(u32, u32)> {
        let scaled = |scale: f64| {
            let w = (f64::from(width) * scale).round();
            let h = (f64::from(height) * scale).round();
            (w as u32, h as u32)
        };
        let (w, h) = match fit_to {
            FitTo::Original => (width, height),
            FitTo::Width(target) => scaled(f64::from(target) / f64::from(width)),
            FitTo::Height(target) => scaled(f64::from(target) / f64::from(height)),
            FitTo::Zoom(zoom) if zoom.is_finite() && zoom > 0.0 => scaled(f64::from(zoom)),
            FitTo::Zoom(zoom) => {
                return Err(Error::Rasterize(format!("invalid zoom factor {zoom}")));
            }
        };
        if w == 0 || h == 0 {
            return Err(Error::Rasterize(format!("target size {w}x{h} is empty")));
        }
        Ok((w, h))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationOptions, LayoutConfig};
    use crate::date::CalendarDate;
    use crate::layout::{compute_layout, WallpaperKind};

    fn render(kind: WallpaperKind, options: &GenerationOptions, today: &str) -> Document {
        let today = CalendarDate::parse(today).unwrap();
        let theme = Theme::default();
        let layout = compute_layout(kind, options, &LayoutConfig::default(), &theme, today).unwrap();
        render_document(&layout, &theme).unwrap()
    }

    #[test]
    fn background_comes_first() {
        let doc = render(WallpaperKind::Year, &GenerationOptions::default(), "2025-03-01");
        let svg = doc.to_svg();
        assert!(svg.contains("<rect x=\"0\" y=\"0\" width=\"1170\" height=\"2532\" fill=\"#000000\"/>"));
        assert!(matches!(doc.nodes()[0], Node::Rect { .. }));
        // background + 365 dots + 2 captions
        assert_eq!(doc.nodes().len(), 1 + 365 + 2);
    }

    #[test]
    fn goal_draws_track_then_arc() {
        let options = GenerationOptions {
            goal_date: Some("2025-12-25".to_string()),
            goal_name: Some("Launch".to_string()),
            ..Default::default()
        };
        let doc = render(WallpaperKind::Goal, &options, "2025-11-25");
        assert!(matches!(doc.nodes()[1], Node::Circle { stroke: Some(_), .. }));
        assert!(matches!(doc.nodes()[2], Node::Path { .. }));
        let svg = doc.to_svg();
        assert!(svg.contains("rgba(255, 255, 255, 0.1)"));
        assert!(svg.contains(">30</text>"));
        assert!(svg.contains(">Less than a month to go!</text>"));
    }

    #[test]
    fn due_goal_closes_the_ring() {
        let options = GenerationOptions {
            goal_date: Some("2025-11-25".to_string()),
            ..Default::default()
        };
        let doc = render(WallpaperKind::Goal, &options, "2025-11-25");
        let Node::Path { d, .. } = &doc.nodes()[2] else {
            panic!("expected the progress arc");
        };
        assert_eq!(d.matches(" A ").count(), 2);
    }

    #[test]
    fn output_is_deterministic() {
        let options = GenerationOptions {
            dob: Some("1990-05-17".to_string()),
            ..Default::default()
        };
        let a = render(WallpaperKind::Life, &options, "2025-11-25").to_svg();
        let b = render(WallpaperKind::Life, &options, "2025-11-25").to_svg();
        assert_eq!(a, b);
    }
}
