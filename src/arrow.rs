use serde::{Deserialize, Serialize};

use crate::arrowhead::{
    ArrowHeadStyle, generate_arrow_head, head_clearance, is_closed_head, is_filled_head,
};
use crate::config::{ArrowConfig, Config, RouteConfig, RoutingMode};
use crate::geometry::{Bounds, Point, point_in_box, segment_intersects_box};
use crate::label::{LabelOutcome, TextShaper, build_label};
use crate::path::{Command, FillRule, PathData};
use crate::routing::{CubicSegment, RouteContext, fit_curve, route_with_context};
use crate::theme::Theme;

// ── Single-curve bending ────────────────────────────────────────────
/// Bend used when avoidance forces a curve but no curvature is configured.
const DEFAULT_BEND: f32 = 0.25;
/// Factor applied to the bend offset each time the curve still hits an obstacle.
const BEND_GROWTH: f32 = 1.5;
const MAX_BEND_STEPS: usize = 8;
/// Chords used to test a curve against obstacles.
const CURVE_SAMPLES: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Head,
    Line,
    Label,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowComponent {
    pub kind: ComponentKind,
    pub path_data: PathData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStrategy {
    Straight,
    Pathfinding,
    SingleCurve,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineGeometry {
    Polyline(Vec<Point>),
    Curved(Vec<CubicSegment>),
}

impl LineGeometry {
    /// Outward direction at the start and inward direction at the end, both
    /// as the direction of travel into a head placed there.
    fn end_directions(&self) -> (Point, Point) {
        match self {
            LineGeometry::Polyline(points) => {
                let n = points.len();
                if n < 2 {
                    return (Point::ZERO, Point::ZERO);
                }
                (points[0] - points[1], points[n - 1] - points[n - 2])
            }
            LineGeometry::Curved(segments) => match (segments.first(), segments.last()) {
                (Some(first), Some(last)) => (first.start_tangent(), last.end_tangent()),
                _ => (Point::ZERO, Point::ZERO),
            },
        }
    }

    fn to_commands(&self) -> Vec<Command> {
        match self {
            LineGeometry::Polyline(points) => {
                let mut commands = Vec::with_capacity(points.len());
                for (idx, point) in points.iter().enumerate() {
                    if idx == 0 {
                        commands.push(Command::move_to(*point));
                    } else {
                        commands.push(Command::line_to(*point));
                    }
                }
                commands
            }
            LineGeometry::Curved(segments) => {
                let mut commands = Vec::with_capacity(segments.len() + 1);
                if let Some(first) = segments.first() {
                    commands.push(Command::move_to(first.from));
                }
                for segment in segments {
                    commands.push(Command::curve_to(segment.ctrl1, segment.ctrl2, segment.to));
                }
                commands
            }
        }
    }

    /// Pulls each end inward by the given distance, never past the middle of
    /// the piece it moves along.
    fn shortened(&self, start_pull: f32, end_pull: f32) -> LineGeometry {
        match self {
            LineGeometry::Polyline(points) => {
                let mut points = points.clone();
                let n = points.len();
                if n >= 2 {
                    points[0] = pull_toward(points[0], points[1], start_pull);
                    points[n - 1] = pull_toward(points[n - 1], points[n - 2], end_pull);
                }
                LineGeometry::Polyline(points)
            }
            LineGeometry::Curved(segments) => {
                let mut segments = segments.clone();
                if let Some(first) = segments.first_mut() {
                    let shift = inward_shift(first.start_tangent(), first.from, first.to, start_pull);
                    first.from = first.from + shift;
                    first.ctrl1 = first.ctrl1 + shift;
                }
                if let Some(last) = segments.last_mut() {
                    let shift = inward_shift(last.end_tangent(), last.to, last.from, end_pull);
                    last.to = last.to + shift;
                    last.ctrl2 = last.ctrl2 + shift;
                }
                LineGeometry::Curved(segments)
            }
        }
    }
}

fn pull_toward(from: Point, toward: Point, pull: f32) -> Point {
    let Some(dir) = (toward - from).normalized() else {
        return from;
    };
    let pull = pull.clamp(0.0, from.distance(toward) / 2.0);
    from + dir * pull
}

fn inward_shift(outward: Point, end: Point, other_end: Point, pull: f32) -> Point {
    let Some(dir) = outward.normalized() else {
        return Point::ZERO;
    };
    let pull = pull.clamp(0.0, end.distance(other_end) / 2.0);
    dir * -pull
}

/// Routed line before heads are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePlan {
    pub strategy: RouteStrategy,
    pub geometry: LineGeometry,
}

/// Picks a routing strategy for `start → end` and computes the raw line.
pub fn plan_line(start: Point, end: Point, obstacles: &[Bounds], route: &RouteConfig) -> LinePlan {
    let ctx = RouteContext::new(start, end, obstacles, route.margin);
    let conflict = route.avoid_obstacles && ctx.has_conflict(start, end);

    if conflict && route.routing_mode == RoutingMode::Pathfinding {
        let points = route_with_context(&ctx, start, end);
        let geometry = if points.len() <= 2 || route.curvature <= 0.0 {
            LineGeometry::Polyline(points)
        } else {
            LineGeometry::Curved(fit_curve(&points, route.smoothness))
        };
        log::debug!("pathfinding route planned for {start:?} -> {end:?}");
        return LinePlan {
            strategy: RouteStrategy::Pathfinding,
            geometry,
        };
    }

    if route.curvature > 0.0 || conflict {
        let segment = single_curve(&ctx, start, end, route.curvature, conflict);
        log::debug!("single-curve route planned for {start:?} -> {end:?}");
        return LinePlan {
            strategy: RouteStrategy::SingleCurve,
            geometry: LineGeometry::Curved(vec![segment]),
        };
    }

    LinePlan {
        strategy: RouteStrategy::Straight,
        geometry: LineGeometry::Polyline(vec![start, end]),
    }
}

fn bent_curve(start: Point, end: Point, normal: Point, offset: f32) -> CubicSegment {
    CubicSegment {
        from: start,
        ctrl1: start.lerp(end, 0.25) + normal * offset,
        ctrl2: start.lerp(end, 0.75) + normal * offset,
        to: end,
    }
}

fn single_curve(
    ctx: &RouteContext<'_>,
    start: Point,
    end: Point,
    curvature: f32,
    avoid: bool,
) -> CubicSegment {
    let Some(dir) = (end - start).normalized() else {
        return bent_curve(start, end, Point::ZERO, 0.0);
    };
    let bend = if curvature > 0.0 { curvature } else { DEFAULT_BEND };
    let mut offset = start.distance(end) * bend;

    let blocked_controls = |segment: &CubicSegment| {
        ctx.active_obstacles()
            .filter(|(_, obstacle)| {
                point_in_box(segment.ctrl1, obstacle, 0.0) || point_in_box(segment.ctrl2, obstacle, 0.0)
            })
            .count()
    };
    let positive = dir.perp();
    let negative = positive * -1.0;
    let normal = if blocked_controls(&bent_curve(start, end, negative, offset))
        < blocked_controls(&bent_curve(start, end, positive, offset))
    {
        negative
    } else {
        positive
    };

    let mut segment = bent_curve(start, end, normal, offset);
    if !avoid {
        return segment;
    }
    let conflicting = ctx.conflicting(start, end);
    for _ in 0..MAX_BEND_STEPS {
        if curve_clears(&segment, &conflicting, ctx.margin) {
            break;
        }
        offset *= BEND_GROWTH;
        segment = bent_curve(start, end, normal, offset);
    }
    segment
}

fn curve_clears(segment: &CubicSegment, obstacles: &[&Bounds], margin: f32) -> bool {
    let samples = segment.flatten(CURVE_SAMPLES);
    samples.windows(2).all(|pair| {
        obstacles
            .iter()
            .all(|obstacle| !segment_intersects_box(pair[0], pair[1], obstacle, margin))
    })
}

fn head_component(
    style: ArrowHeadStyle,
    tip: Point,
    direction: Point,
    arrow: &ArrowConfig,
    theme: &Theme,
) -> Option<ArrowComponent> {
    let commands = generate_arrow_head(style, arrow.head_size, tip, direction.angle());
    if commands.is_empty() {
        return None;
    }
    let fill = if is_filled_head(style) {
        Some(theme.stroke_color.clone())
    } else if is_closed_head(style) {
        Some(theme.head_fill_color.clone())
    } else {
        None
    };
    Some(ArrowComponent {
        kind: ComponentKind::Head,
        path_data: PathData {
            subpaths: vec![commands],
            fill,
            stroke: Some(theme.stroke_color.clone()),
            stroke_width: arrow.stroke_width,
            fill_rule: FillRule::Nonzero,
        },
    })
}

/// Everything produced for one arrow.
#[derive(Debug)]
pub struct AssembledArrow {
    pub plan: LinePlan,
    pub components: Vec<ArrowComponent>,
    pub label: LabelOutcome,
}

/// Routes and draws one arrow. Components come out as start head, end head,
/// line, then the label when one was shaped.
pub fn assemble_arrow(
    start: Point,
    end: Point,
    obstacles: &[Bounds],
    config: &Config,
    shaper: Option<&dyn TextShaper>,
) -> AssembledArrow {
    let plan = plan_line(start, end, obstacles, &config.route);
    let arrow = &config.arrow;
    let theme = &config.theme;
    let (start_dir, end_dir) = plan.geometry.end_directions();

    let mut components = Vec::with_capacity(4);
    components.extend(head_component(arrow.start_head, start, start_dir, arrow, theme));
    components.extend(head_component(arrow.end_head, end, end_dir, arrow, theme));

    let line = plan.geometry.shortened(
        head_clearance(arrow.start_head, arrow.head_size),
        head_clearance(arrow.end_head, arrow.head_size),
    );
    components.push(ArrowComponent {
        kind: ComponentKind::Line,
        path_data: PathData {
            subpaths: vec![line.to_commands()],
            fill: None,
            stroke: Some(theme.stroke_color.clone()),
            stroke_width: arrow.stroke_width,
            fill_rule: FillRule::Nonzero,
        },
    });

    let label = build_label(start, end, &config.label, theme, shaper);
    if let Some(path_data) = label.path() {
        components.push(ArrowComponent {
            kind: ComponentKind::Label,
            path_data: path_data.clone(),
        });
    }

    AssembledArrow {
        plan,
        components,
        label,
    }
}

/// Component list for `start → end`; the plan and label outcome are dropped.
pub fn render_arrow(
    start: Point,
    end: Point,
    obstacles: &[Bounds],
    config: &Config,
    shaper: Option<&dyn TextShaper>,
) -> Vec<ArrowComponent> {
    assemble_arrow(start, end, obstacles, config, shaper).components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::tests::{BoxShaper, FailingShaper};

    fn kinds(components: &[ArrowComponent]) -> Vec<ComponentKind> {
        components.iter().map(|c| c.kind).collect()
    }

    fn line_commands(components: &[ArrowComponent]) -> Vec<Command> {
        components
            .iter()
            .find(|c| c.kind == ComponentKind::Line)
            .map(|c| c.path_data.commands().copied().collect())
            .unwrap_or_default()
    }

    fn blocked_scene() -> (Point, Point, Vec<Bounds>) {
        (
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            vec![Bounds::new(40.0, -10.0, 60.0, 10.0)],
        )
    }

    #[test]
    fn straight_arrow_pulls_line_back_from_head() {
        let config = Config::default();
        let components = render_arrow(Point::new(0.0, 0.0), Point::new(100.0, 0.0), &[], &config, None);
        assert_eq!(kinds(&components), vec![ComponentKind::Head, ComponentKind::Line]);
        let line = line_commands(&components);
        assert_eq!(line[0], Command::move_to(Point::new(0.0, 0.0)));
        let end = line[1].end_point().unwrap_or(Point::ZERO);
        assert!((end.x - (100.0 - 12.0 * 0.7)).abs() < 1e-3);
        let head = &components[0].path_data;
        assert_eq!(head.fill.as_deref(), Some(config.theme.stroke_color.as_str()));
    }

    #[test]
    fn components_are_ordered_heads_line_label() {
        let mut config = Config::default();
        config.arrow.start_head = ArrowHeadStyle::CircleOpen;
        config.label.precision = Some(1);
        let components = render_arrow(
            Point::new(0.0, 0.0),
            Point::new(80.0, 60.0),
            &[],
            &config,
            Some(&BoxShaper),
        );
        assert_eq!(
            kinds(&components),
            vec![
                ComponentKind::Head,
                ComponentKind::Head,
                ComponentKind::Line,
                ComponentKind::Label
            ]
        );
        assert_eq!(
            components[0].path_data.fill.as_deref(),
            Some(config.theme.head_fill_color.as_str())
        );
    }

    #[test]
    fn failed_label_is_omitted() {
        let mut config = Config::default();
        config.label.precision = Some(2);
        let arrow = assemble_arrow(
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
            &[],
            &config,
            Some(&FailingShaper),
        );
        assert!(matches!(arrow.label, LabelOutcome::Failed(_)));
        assert_eq!(kinds(&arrow.components), vec![ComponentKind::Head, ComponentKind::Line]);
    }

    #[test]
    fn blocked_arrow_uses_pathfinding() {
        let (start, end, obstacles) = blocked_scene();
        let plan = plan_line(start, end, &obstacles, &RouteConfig::default());
        assert_eq!(plan.strategy, RouteStrategy::Pathfinding);
        let LineGeometry::Polyline(points) = plan.geometry else {
            panic!("zero curvature keeps the route angular");
        };
        assert!(points.len() >= 3);
    }

    #[test]
    fn curvature_smooths_routed_polyline() {
        let (start, end, obstacles) = blocked_scene();
        let mut config = Config::default();
        config.route.curvature = 0.2;
        let components = render_arrow(start, end, &obstacles, &config, None);
        let line = line_commands(&components);
        assert!(line.iter().any(|c| matches!(c, Command::Curve { .. })));
        assert!(!line.iter().any(|c| matches!(c, Command::Line { .. })));
    }

    #[test]
    fn enclosed_end_renders_straight_line() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 0.0);
        let obstacles = [
            Bounds::new(80.0, -20.0, 120.0, -15.0),
            Bounds::new(80.0, 15.0, 120.0, 20.0),
            Bounds::new(80.0, -20.0, 85.0, 20.0),
            Bounds::new(115.0, -20.0, 120.0, 20.0),
        ];
        let plan = plan_line(start, end, &obstacles, &RouteConfig::default());
        assert_eq!(plan.geometry, LineGeometry::Polyline(vec![start, end]));
    }

    #[test]
    fn simple_mode_bends_around_conflict() {
        let (start, end, obstacles) = blocked_scene();
        let route = RouteConfig {
            routing_mode: RoutingMode::Simple,
            ..RouteConfig::default()
        };
        let plan = plan_line(start, end, &obstacles, &route);
        assert_eq!(plan.strategy, RouteStrategy::SingleCurve);
        let LineGeometry::Curved(segments) = plan.geometry else {
            panic!("single-curve mode yields a cubic");
        };
        assert_eq!(segments.len(), 1);
        assert!(curve_clears(&segments[0], &[&obstacles[0]], 0.0));
    }

    #[test]
    fn curve_side_avoids_blocked_control_points() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 0.0);
        // Covers the positive side's control points only.
        let obstacles = [Bounds::new(10.0, 15.0, 90.0, 40.0)];
        let route = RouteConfig {
            curvature: 0.25,
            avoid_obstacles: false,
            ..RouteConfig::default()
        };
        let plan = plan_line(start, end, &obstacles, &route);
        let LineGeometry::Curved(segments) = plan.geometry else {
            panic!("curvature yields a cubic");
        };
        assert!(segments[0].ctrl1.y < 0.0);
    }

    #[test]
    fn avoidance_disabled_stays_straight() {
        let (start, end, obstacles) = blocked_scene();
        let route = RouteConfig {
            avoid_obstacles: false,
            ..RouteConfig::default()
        };
        let plan = plan_line(start, end, &obstacles, &route);
        assert_eq!(plan.strategy, RouteStrategy::Straight);
    }

    #[test]
    fn clearance_is_clamped_on_short_lines() {
        let config = Config::default();
        let components = render_arrow(Point::new(0.0, 0.0), Point::new(10.0, 0.0), &[], &config, None);
        let line = line_commands(&components);
        let end = line[1].end_point().unwrap_or(Point::ZERO);
        assert!((end.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn end_head_points_along_travel() {
        let config = Config::default();
        let components = render_arrow(Point::new(0.0, 0.0), Point::new(0.0, 100.0), &[], &config, None);
        let head: Vec<Command> = components[0].path_data.commands().copied().collect();
        assert_eq!(head[0], Command::move_to(Point::new(0.0, 100.0)));
        for command in &head[1..3] {
            let barb = command.end_point().unwrap_or(Point::ZERO);
            assert!(barb.y < 100.0);
        }
    }

    fn assert_near(actual: Point, expected: Point) {
        assert!(actual.distance(expected) < 1e-3, "{actual:?} != {expected:?}");
    }

    /// Barbs sit behind the tip, one on each side of the travel direction.
    fn assert_barbs_straddle(head: &[Command], tip: Point, travel: Point) {
        assert_eq!(head[0], Command::move_to(tip));
        let sides: Vec<f32> = head[1..3]
            .iter()
            .map(|command| {
                let offset = command.end_point().unwrap_or(tip) - tip;
                assert!(offset.x * travel.x + offset.y * travel.y < 0.0);
                travel.cross(offset)
            })
            .collect();
        assert!(sides[0] * sides[1] < 0.0, "{sides:?}");
        assert!((sides[0] + sides[1]).abs() < 1e-3, "{sides:?}");
    }

    #[test]
    fn curved_ends_pull_back_along_end_tangents() {
        let mut config = Config::default();
        config.route.curvature = 0.25;
        config.arrow.start_head = ArrowHeadStyle::Triangle;
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 0.0);
        let arrow = assemble_arrow(start, end, &[], &config, None);
        assert_eq!(arrow.plan.strategy, RouteStrategy::SingleCurve);
        let LineGeometry::Curved(segments) = &arrow.plan.geometry else {
            panic!("expected a curved plan");
        };
        let raw = segments[0];
        let pull = config.arrow.head_size * 0.7;

        let into_end = (end - raw.ctrl2).normalized().unwrap_or(Point::ZERO);
        let out_of_start = (start - raw.ctrl1).normalized().unwrap_or(Point::ZERO);
        assert!(into_end.y.abs() > 0.1, "end tangent should not follow the chord");

        let line = line_commands(&arrow.components);
        assert_eq!(line.len(), 2);
        assert_near(line[0].end_point().unwrap_or(Point::ZERO), start - out_of_start * pull);
        let Command::Curve { cp1, cp2, x, y } = line[1] else {
            panic!("expected a cubic line");
        };
        assert_near(Point::new(x, y), end - into_end * pull);
        // Handles move with their ends, so the tangents are unchanged.
        assert_near(cp2, raw.ctrl2 - into_end * pull);
        assert_near(cp1, raw.ctrl1 - out_of_start * pull);

        let start_head: Vec<Command> = arrow.components[0].path_data.commands().copied().collect();
        let end_head: Vec<Command> = arrow.components[1].path_data.commands().copied().collect();
        assert_barbs_straddle(&start_head, start, out_of_start);
        assert_barbs_straddle(&end_head, end, into_end);
    }
}
