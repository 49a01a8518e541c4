use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::path::Command;

/// Half-angle between the shaft and each barb of a triangle or chevron.
const BARB_ANGLE: f32 = 30.0 * PI / 180.0;
/// Half-width of a diamond as a fraction of the head size.
const DIAMOND_HALF_WIDTH_RATIO: f32 = 1.0 / 3.0;
/// Cubic handle length for a quarter circle of unit radius.
pub const CIRCLE_KAPPA: f32 = 0.552_284_75;
/// Clearance factor for wedge-like heads.
const WEDGE_CLEARANCE_RATIO: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrowHeadStyle {
    #[default]
    None,
    Triangle,
    TriangleOpen,
    Diamond,
    DiamondOpen,
    Circle,
    CircleOpen,
    Bar,
    Measure,
    Chevron,
}

impl ArrowHeadStyle {
    pub const ALL: [ArrowHeadStyle; 10] = [
        ArrowHeadStyle::None,
        ArrowHeadStyle::Triangle,
        ArrowHeadStyle::TriangleOpen,
        ArrowHeadStyle::Diamond,
        ArrowHeadStyle::DiamondOpen,
        ArrowHeadStyle::Circle,
        ArrowHeadStyle::CircleOpen,
        ArrowHeadStyle::Bar,
        ArrowHeadStyle::Measure,
        ArrowHeadStyle::Chevron,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ArrowHeadStyle::None => "none",
            ArrowHeadStyle::Triangle => "triangle",
            ArrowHeadStyle::TriangleOpen => "triangleOpen",
            ArrowHeadStyle::Diamond => "diamond",
            ArrowHeadStyle::DiamondOpen => "diamondOpen",
            ArrowHeadStyle::Circle => "circle",
            ArrowHeadStyle::CircleOpen => "circleOpen",
            ArrowHeadStyle::Bar => "bar",
            ArrowHeadStyle::Measure => "measure",
            ArrowHeadStyle::Chevron => "chevron",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ArrowHeadStyle::None)
    }
}

impl fmt::Display for ArrowHeadStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ArrowHeadStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ArrowHeadStyle::ALL
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown arrowhead style '{wanted}'"))
    }
}

/// Whether the glyph for `style` is painted with the stroke colour.
pub fn is_filled_head(style: ArrowHeadStyle) -> bool {
    match style {
        ArrowHeadStyle::Triangle | ArrowHeadStyle::Diamond | ArrowHeadStyle::Circle => true,
        ArrowHeadStyle::None
        | ArrowHeadStyle::TriangleOpen
        | ArrowHeadStyle::DiamondOpen
        | ArrowHeadStyle::CircleOpen
        | ArrowHeadStyle::Bar
        | ArrowHeadStyle::Measure
        | ArrowHeadStyle::Chevron => false,
    }
}

/// Whether the glyph is a closed outline that takes a fill at all.
pub fn is_closed_head(style: ArrowHeadStyle) -> bool {
    match style {
        ArrowHeadStyle::Triangle
        | ArrowHeadStyle::TriangleOpen
        | ArrowHeadStyle::Diamond
        | ArrowHeadStyle::DiamondOpen
        | ArrowHeadStyle::Circle
        | ArrowHeadStyle::CircleOpen => true,
        ArrowHeadStyle::None
        | ArrowHeadStyle::Bar
        | ArrowHeadStyle::Measure
        | ArrowHeadStyle::Chevron => false,
    }
}

/// Distance the line end is pulled back so it does not poke through the head.
pub fn head_clearance(style: ArrowHeadStyle, size: f32) -> f32 {
    let size = size.max(0.0);
    match style {
        ArrowHeadStyle::None
        | ArrowHeadStyle::Bar
        | ArrowHeadStyle::Measure
        | ArrowHeadStyle::Chevron => 0.0,
        ArrowHeadStyle::Circle | ArrowHeadStyle::CircleOpen => size / 2.0,
        ArrowHeadStyle::Triangle
        | ArrowHeadStyle::TriangleOpen
        | ArrowHeadStyle::Diamond
        | ArrowHeadStyle::DiamondOpen => size * WEDGE_CLEARANCE_RATIO,
    }
}

/// Compiles a head glyph whose tip sits at `tip`, pointing along `angle`
/// (radians, the direction the line travels into the tip).
pub fn generate_arrow_head(style: ArrowHeadStyle, size: f32, tip: Point, angle: f32) -> Vec<Command> {
    if !size.is_finite() || size <= 0.0 || !tip.is_finite() {
        return Vec::new();
    }
    let angle = if angle.is_finite() { angle } else { 0.0 };
    let dir = Point::from_angle(angle);
    let perp = dir.perp();
    match style {
        ArrowHeadStyle::None => Vec::new(),
        ArrowHeadStyle::Triangle | ArrowHeadStyle::TriangleOpen => {
            let (left, right) = barbs(tip, angle, size);
            vec![
                Command::move_to(tip),
                Command::line_to(left),
                Command::line_to(right),
                Command::Close,
            ]
        }
        ArrowHeadStyle::Diamond | ArrowHeadStyle::DiamondOpen => {
            let center = tip - dir * (size / 2.0);
            let half_width = size * DIAMOND_HALF_WIDTH_RATIO;
            vec![
                Command::move_to(tip),
                Command::line_to(center + perp * half_width),
                Command::line_to(tip - dir * size),
                Command::line_to(center - perp * half_width),
                Command::Close,
            ]
        }
        ArrowHeadStyle::Circle | ArrowHeadStyle::CircleOpen => circle_commands(tip, size / 2.0),
        ArrowHeadStyle::Bar | ArrowHeadStyle::Measure => {
            let half = size / 2.0;
            vec![
                Command::move_to(tip + perp * half),
                Command::line_to(tip - perp * half),
            ]
        }
        ArrowHeadStyle::Chevron => {
            let (left, right) = barbs(tip, angle, size);
            vec![
                Command::move_to(left),
                Command::line_to(tip),
                Command::line_to(right),
            ]
        }
    }
}

fn barbs(tip: Point, angle: f32, size: f32) -> (Point, Point) {
    (
        tip - Point::from_angle(angle - BARB_ANGLE) * size,
        tip - Point::from_angle(angle + BARB_ANGLE) * size,
    )
}

fn circle_commands(center: Point, radius: f32) -> Vec<Command> {
    let k = radius * CIRCLE_KAPPA;
    let (cx, cy, r) = (center.x, center.y, radius);
    vec![
        Command::move_to(Point::new(cx + r, cy)),
        Command::curve_to(
            Point::new(cx + r, cy + k),
            Point::new(cx + k, cy + r),
            Point::new(cx, cy + r),
        ),
        Command::curve_to(
            Point::new(cx - k, cy + r),
            Point::new(cx - r, cy + k),
            Point::new(cx - r, cy),
        ),
        Command::curve_to(
            Point::new(cx - r, cy - k),
            Point::new(cx - k, cy - r),
            Point::new(cx, cy - r),
        ),
        Command::curve_to(
            Point::new(cx + k, cy - r),
            Point::new(cx + r, cy - k),
            Point::new(cx + r, cy),
        ),
        Command::Close,
    ]
}
