use crate::geometry::{Bounds, Point, point_in_box};

use super::{RouteContext, WAYPOINT_DISCARD_RATIO};

/// Go-around candidates for every live obstacle: the four corners and the
/// four edge midpoints, each pushed outward by the margin. Candidates that
/// land inside another live obstacle are dropped.
pub fn generate_waypoints(ctx: &RouteContext<'_>) -> Vec<Point> {
    let discard_margin = ctx.margin * WAYPOINT_DISCARD_RATIO;
    let mut waypoints = Vec::new();
    for (idx, obstacle) in ctx.active_obstacles() {
        for candidate in obstacle_candidates(obstacle, ctx.margin) {
            let blocked = ctx.active_obstacles().any(|(other_idx, other)| {
                other_idx != idx && point_in_box(candidate, other, discard_margin)
            });
            if !blocked {
                waypoints.push(candidate);
            }
        }
    }
    waypoints
}

fn obstacle_candidates(obstacle: &Bounds, margin: f32) -> [Point; 8] {
    let left = obstacle.min_x - margin;
    let right = obstacle.max_x + margin;
    let top = obstacle.min_y - margin;
    let bottom = obstacle.max_y + margin;
    let center = obstacle.center();
    [
        Point::new(left, top),
        Point::new(right, top),
        Point::new(right, bottom),
        Point::new(left, bottom),
        Point::new(center.x, top),
        Point::new(right, center.y),
        Point::new(center.x, bottom),
        Point::new(left, center.y),
    ]
}

/// Point just outside `host` through which an arrow anchored at `point`
/// leaves (or enters) it. The exit side is picked by the dominant axis of
/// the centre-to-point vector; ties go to the horizontal sides.
pub fn boundary_exit_point(host: &Bounds, point: Point, margin: f32) -> Point {
    let center = host.center();
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    if dx.abs() >= dy.abs() {
        let x = if dx >= 0.0 {
            host.max_x + margin
        } else {
            host.min_x - margin
        };
        Point::new(x, point.y)
    } else {
        let y = if dy >= 0.0 {
            host.max_y + margin
        } else {
            host.min_y - margin
        };
        Point::new(point.x, y)
    }
}
