use thiserror::Error;

use crate::config::LabelConfig;
use crate::geometry::{LENGTH_EPSILON, Point};
use crate::path::{Command, FillRule, PathData, commands_bounds};
use crate::theme::Theme;

/// Labels closer than this to horizontal are drawn without rotation.
const LEVEL_TOLERANCE: f32 = 5.0 * std::f32::consts::PI / 180.0;

/// Text to turn into outlines, baseline-anchored at (`x`, `y`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRequest {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub family: String,
    pub weight: u16,
    pub italic: bool,
}

#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("nothing to shape")]
    EmptyText,
    #[error("no font matches '{0}'")]
    NoFont(String),
    #[error("font face could not be parsed: {0}")]
    Face(String),
    #[error("text shaper unavailable: {0}")]
    Unavailable(String),
}

/// Converts text into vector outlines.
pub trait TextShaper {
    fn shape(&self, request: &TextRequest) -> Result<Vec<Command>, ShapeError>;
}

/// Result of the label step. Only `Ready` contributes a component.
#[derive(Debug)]
pub enum LabelOutcome {
    Ready(PathData),
    Failed(ShapeError),
    Skipped,
}

impl LabelOutcome {
    pub fn path(&self) -> Option<&PathData> {
        match self {
            LabelOutcome::Ready(path) => Some(path),
            LabelOutcome::Failed(_) | LabelOutcome::Skipped => None,
        }
    }
}

/// Where the label's centre sits and how far it is rotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub center: Point,
    pub angle: f32,
}

pub fn format_distance(distance: f32, precision: usize, unit: &str) -> String {
    let distance = if distance.is_finite() { distance } else { 0.0 };
    format!("{distance:.precision$}{unit}")
}

/// Places a label above the chord `start → end` so that it never reads
/// upside-down.
pub fn label_placement(start: Point, end: Point, offset: f32) -> LabelPlacement {
    let chord = end - start;
    let mut angle = if chord.length() < LENGTH_EPSILON {
        0.0
    } else {
        chord.angle()
    };
    let half_turn = std::f32::consts::PI;
    if angle > half_turn / 2.0 {
        angle -= half_turn;
    } else if angle <= -half_turn / 2.0 {
        angle += half_turn;
    }

    let reading = Point::from_angle(angle);
    let above = Point::new(reading.y, -reading.x);
    let center = start.midpoint(end) + above * offset;
    if angle.abs() < LEVEL_TOLERANCE {
        angle = 0.0;
    }
    LabelPlacement { center, angle }
}

/// Shapes the distance label for an arrow. A missing precision or shaper
/// skips the step; a shaper error yields `Failed` and is logged.
pub fn build_label(
    start: Point,
    end: Point,
    label: &LabelConfig,
    theme: &Theme,
    shaper: Option<&dyn TextShaper>,
) -> LabelOutcome {
    let Some(precision) = label.precision else {
        return LabelOutcome::Skipped;
    };
    let Some(shaper) = shaper else {
        return LabelOutcome::Skipped;
    };

    let request = TextRequest {
        text: format_distance(start.distance(end), precision, &label.unit),
        x: 0.0,
        y: 0.0,
        font_size: label.font_size.unwrap_or(theme.font_size),
        family: label
            .font_family
            .clone()
            .unwrap_or_else(|| theme.font_family.clone()),
        weight: label.font_weight,
        italic: label.italic,
    };

    let commands = match shaper.shape(&request) {
        Ok(commands) => commands,
        Err(err) => {
            log::warn!("label '{}' was not shaped: {err}", request.text);
            return LabelOutcome::Failed(err);
        }
    };
    let Some(bounds) = commands_bounds(&commands) else {
        log::warn!("label '{}' produced no outline", request.text);
        return LabelOutcome::Failed(ShapeError::EmptyText);
    };

    let placement = label_placement(start, end, label.offset);
    let origin = bounds.center();
    let placed = commands
        .into_iter()
        .map(|command| {
            command.map_points(|p| {
                (p - origin).rotate_about(Point::ZERO, placement.angle) + placement.center
            })
        })
        .collect();

    LabelOutcome::Ready(PathData {
        subpaths: vec![placed],
        fill: Some(theme.label_color.clone()),
        stroke: None,
        stroke_width: 0.0,
        fill_rule: FillRule::Nonzero,
    })
}
