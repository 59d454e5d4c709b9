use crate::layout::{DiagramData, Label, Layout};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub kind: String,
    pub today: String,
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub grid: Option<GridDump>,
    pub goal: Option<GoalDump>,
    pub labels: Vec<LabelDump>,
}

#[derive(Debug, Serialize)]
pub struct GridDump {
    pub shape: String,
    pub columns: u32,
    pub rows: u32,
    pub pitch: f64,
    pub total: u32,
    pub elapsed: u32,
    /// `[x, y, size, elapsed]` per cell, row-major.
    pub cells: Vec<(f64, f64, f64, bool)>,
}

#[derive(Debug, Serialize)]
pub struct GoalDump {
    pub target: String,
    pub days_remaining: i64,
    pub total_days: i64,
    pub progress: f64,
    pub sweep_deg: f64,
    pub center: [f64; 2],
    pub radius: f64,
    pub stroke_width: f64,
    pub motivation: String,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub font_weight: u16,
    pub fill: String,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let (grid, goal, labels) = match &layout.diagram {
            DiagramData::Grid(grid) => (
                Some(GridDump {
                    shape: format!("{:?}", grid.shape),
                    columns: grid.columns,
                    rows: grid.rows,
                    pitch: grid.pitch,
                    total: grid.total,
                    elapsed: grid.elapsed,
                    cells: grid
                        .cells
                        .iter()
                        .map(|cell| (cell.x, cell.y, cell.size, cell.elapsed))
                        .collect(),
                }),
                None,
                &grid.labels,
            ),
            DiagramData::Goal(goal) => (
                None,
                Some(GoalDump {
                    target: goal.target.to_string(),
                    days_remaining: goal.progress.days_remaining,
                    total_days: goal.progress.total_days,
                    progress: goal.progress.progress,
                    sweep_deg: goal.sweep_deg,
                    center: [goal.center.0, goal.center.1],
                    radius: goal.radius,
                    stroke_width: goal.stroke_width,
                    motivation: goal.motivation.caption().to_string(),
                }),
                &goal.labels,
            ),
        };

        LayoutDump {
            kind: layout.kind.to_string(),
            today: layout.today.to_string(),
            width: layout.width,
            height: layout.height,
            background: layout.background.to_string(),
            grid,
            goal,
            labels: labels.iter().map(label_dump).collect(),
        }
    }
}

fn label_dump(label: &Label) -> LabelDump {
    LabelDump {
        text: label.text.clone(),
        x: label.x,
        y: label.y,
        font_size: label.font_size,
        font_weight: label.font_weight,
        fill: label.fill.to_string(),
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
