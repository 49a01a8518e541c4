mod curve;
mod graph;
mod search;
mod simplify;
mod waypoints;

pub use curve::{CubicSegment, fit_curve};
pub use graph::{GraphEdge, GraphNode, NodeKind, VisibilityGraph};
pub use search::bidirectional_search;
pub use simplify::simplify_path;
pub use waypoints::{boundary_exit_point, generate_waypoints};

use crate::config::RouteConfig;
use crate::geometry::{Bounds, Point, point_in_box, segment_intersects_box};

// ── Clearance ratios ────────────────────────────────────────────────
/// Fraction of the margin used for line-of-sight tests between graph nodes.
/// Tighter than generation so legitimate tight routes are not pruned.
pub const VISIBILITY_MARGIN_RATIO: f32 = 0.3;
/// Fraction of the margin used to discard waypoints that sit inside a
/// neighbouring obstacle.
pub const WAYPOINT_DISCARD_RATIO: f32 = 0.5;

/// Per-call view of the obstacle field: which obstacles are live blockers
/// and which are the shapes the arrow starts or ends inside.
#[derive(Debug, Clone)]
pub struct RouteContext<'a> {
    pub obstacles: &'a [Bounds],
    pub margin: f32,
    excluded: Vec<bool>,
    start_host: Option<usize>,
    end_host: Option<usize>,
}

impl<'a> RouteContext<'a> {
    pub fn new(start: Point, end: Point, obstacles: &'a [Bounds], margin: f32) -> Self {
        let margin = if margin.is_finite() { margin.max(0.0) } else { 0.0 };
        let mut excluded = vec![false; obstacles.len()];
        let mut start_host = None;
        let mut end_host = None;
        for (idx, obstacle) in obstacles.iter().enumerate() {
            if point_in_box(start, obstacle, 0.0) {
                excluded[idx] = true;
                start_host.get_or_insert(idx);
            }
            if point_in_box(end, obstacle, 0.0) {
                excluded[idx] = true;
                end_host.get_or_insert(idx);
            }
        }
        Self {
            obstacles,
            margin,
            excluded,
            start_host,
            end_host,
        }
    }

    pub fn is_excluded(&self, idx: usize) -> bool {
        self.excluded.get(idx).copied().unwrap_or(false)
    }

    /// Obstacle the start point lies inside, first in input order.
    pub fn start_host(&self) -> Option<&Bounds> {
        self.start_host.map(|idx| &self.obstacles[idx])
    }

    /// Obstacle the end point lies inside, first in input order.
    pub fn end_host(&self) -> Option<&Bounds> {
        self.end_host.map(|idx| &self.obstacles[idx])
    }

    pub fn active_obstacles(&self) -> impl Iterator<Item = (usize, &'a Bounds)> + '_ {
        self.obstacles
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.excluded[*idx])
    }

    pub fn segment_clear(&self, a: Point, b: Point, margin: f32) -> bool {
        self.active_obstacles()
            .all(|(_, obstacle)| !segment_intersects_box(a, b, obstacle, margin))
    }

    /// Line-of-sight test used by the graph builder and the simplifier.
    pub fn visible(&self, a: Point, b: Point) -> bool {
        self.segment_clear(a, b, self.margin * VISIBILITY_MARGIN_RATIO)
    }

    /// Whether the straight segment runs into any live obstacle at full margin.
    pub fn has_conflict(&self, a: Point, b: Point) -> bool {
        !self.segment_clear(a, b, self.margin)
    }

    /// Live obstacles the straight segment runs into at full margin.
    pub fn conflicting(&self, a: Point, b: Point) -> Vec<&'a Bounds> {
        self.active_obstacles()
            .filter(|(_, obstacle)| segment_intersects_box(a, b, obstacle, self.margin))
            .map(|(_, obstacle)| obstacle)
            .collect()
    }
}

/// Computes an obstacle-avoiding polyline from `start` to `end`.
///
/// The result always begins at `start` and ends at `end`. When the direct
/// segment is already clear, or when the visibility graph has no connection,
/// the two-point straight route is returned.
pub fn find_route(start: Point, end: Point, obstacles: &[Bounds], config: &RouteConfig) -> Vec<Point> {
    let ctx = RouteContext::new(start, end, obstacles, config.margin);
    route_with_context(&ctx, start, end)
}

pub fn route_with_context(ctx: &RouteContext<'_>, start: Point, end: Point) -> Vec<Point> {
    if !start.is_finite() || !end.is_finite() || !ctx.has_conflict(start, end) {
        return vec![start, end];
    }

    let exit = ctx
        .start_host()
        .map(|host| boundary_exit_point(host, start, ctx.margin));
    let entry = ctx
        .end_host()
        .map(|host| boundary_exit_point(host, end, ctx.margin));
    let waypoints = generate_waypoints(ctx);
    let graph = VisibilityGraph::build(ctx, start, exit, entry, &waypoints, end);
    let node_path = bidirectional_search(&graph);
    if node_path.is_empty() {
        log::debug!(
            "no route through {} graph nodes, falling back to a straight segment",
            graph.nodes.len()
        );
        return vec![start, end];
    }

    let raw: Vec<Point> = node_path
        .iter()
        .map(|&idx| graph.nodes[idx].position)
        .collect();
    simplify_path(&raw, ctx)
}
