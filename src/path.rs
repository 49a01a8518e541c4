use serde::{Deserialize, Serialize};

use crate::geometry::{Bounds, Point};

/// One absolute SVG path instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    Move { x: f32, y: f32 },
    Line { x: f32, y: f32 },
    Curve { cp1: Point, cp2: Point, x: f32, y: f32 },
    Close,
}

impl Command {
    pub fn move_to(p: Point) -> Self {
        Command::Move { x: p.x, y: p.y }
    }

    pub fn line_to(p: Point) -> Self {
        Command::Line { x: p.x, y: p.y }
    }

    pub fn curve_to(cp1: Point, cp2: Point, p: Point) -> Self {
        Command::Curve {
            cp1,
            cp2,
            x: p.x,
            y: p.y,
        }
    }

    /// End point of the instruction, if it has one.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            Command::Move { x, y } | Command::Line { x, y } | Command::Curve { x, y, .. } => {
                Some(Point::new(x, y))
            }
            Command::Close => None,
        }
    }

    /// Applies `f` to every coordinate, control points included.
    pub fn map_points(self, f: impl Fn(Point) -> Point) -> Self {
        match self {
            Command::Move { x, y } => Command::move_to(f(Point::new(x, y))),
            Command::Line { x, y } => Command::line_to(f(Point::new(x, y))),
            Command::Curve { cp1, cp2, x, y } => {
                Command::curve_to(f(cp1), f(cp2), f(Point::new(x, y)))
            }
            Command::Close => Command::Close,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillRule {
    #[default]
    Nonzero,
    Evenodd,
}

impl FillRule {
    pub fn as_svg(&self) -> &'static str {
        match self {
            FillRule::Nonzero => "nonzero",
            FillRule::Evenodd => "evenodd",
        }
    }
}

/// One renderable shape: subpaths plus paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathData {
    pub subpaths: Vec<Vec<Command>>,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: f32,
    pub fill_rule: FillRule,
}

impl PathData {
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.subpaths.iter().flatten()
    }

    pub fn to_svg_path(&self) -> String {
        let flat: Vec<Command> = self.commands().copied().collect();
        commands_to_svg_path(&flat)
    }
}

/// Serializes commands to an SVG `d` attribute using absolute `M/L/C/Z`.
pub fn commands_to_svg_path(commands: &[Command]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(commands.len());
    for command in commands {
        let part = match *command {
            Command::Move { x, y } => format!("M {} {}", fmt_num(x), fmt_num(y)),
            Command::Line { x, y } => format!("L {} {}", fmt_num(x), fmt_num(y)),
            Command::Curve { cp1, cp2, x, y } => format!(
                "C {} {} {} {} {} {}",
                fmt_num(cp1.x),
                fmt_num(cp1.y),
                fmt_num(cp2.x),
                fmt_num(cp2.y),
                fmt_num(x),
                fmt_num(y)
            ),
            Command::Close => "Z".to_string(),
        };
        parts.push(part);
    }
    parts.join(" ")
}

/// Shortest text that parses back to the same `f32`. Negative zero and
/// non-finite values are written as `0`.
pub fn fmt_num(value: f32) -> String {
    if !value.is_finite() || value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}

/// Bounding box of every coordinate in `commands`, control points included.
pub fn commands_bounds(commands: &[Command]) -> Option<Bounds> {
    let mut bounds: Option<Bounds> = None;
    let mut include = |p: Point| {
        bounds = Some(match bounds {
            Some(b) => Bounds {
                min_x: b.min_x.min(p.x),
                min_y: b.min_y.min(p.y),
                max_x: b.max_x.max(p.x),
                max_y: b.max_y.max(p.y),
            },
            None => Bounds::new(p.x, p.y, p.x, p.y),
        });
    };
    for command in commands {
        if let Command::Curve { cp1, cp2, .. } = command {
            include(*cp1);
            include(*cp2);
        }
        if let Some(p) = command.end_point() {
            include(p);
        }
    }
    bounds
}
