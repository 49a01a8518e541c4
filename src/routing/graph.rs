use crate::geometry::Point;

use super::RouteContext;

/// Role a node plays in the visibility graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Start,
    Exit,
    Entry,
    Waypoint,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphNode {
    pub index: usize,
    pub position: Point,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphEdge {
    pub a: usize,
    pub b: usize,
    pub weight: f32,
}

/// Flat node arena plus an index-keyed adjacency list. Edges are undirected
/// and stored once per endpoint.
#[derive(Debug, Clone, Default)]
pub struct VisibilityGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    adjacency: Vec<Vec<(usize, f32)>>,
}

impl VisibilityGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the graph over `[start, exit?, entry?, ...waypoints, end]`.
    pub fn build(
        ctx: &RouteContext<'_>,
        start: Point,
        exit: Option<Point>,
        entry: Option<Point>,
        waypoints: &[Point],
        end: Point,
    ) -> Self {
        let mut graph = Self::new();
        graph.add_node(start, NodeKind::Start);
        if let Some(exit) = exit {
            graph.add_node(exit, NodeKind::Exit);
        }
        if let Some(entry) = entry {
            graph.add_node(entry, NodeKind::Entry);
        }
        for &waypoint in waypoints {
            graph.add_node(waypoint, NodeKind::Waypoint);
        }
        graph.add_node(end, NodeKind::End);

        let count = graph.nodes.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let a = graph.nodes[i];
                let b = graph.nodes[j];
                if always_connected(a.kind, b.kind) || ctx.visible(a.position, b.position) {
                    graph.add_edge(i, j);
                }
            }
        }
        graph
    }

    pub fn add_node(&mut self, position: Point, kind: NodeKind) -> usize {
        let index = self.nodes.len();
        self.nodes.push(GraphNode {
            index,
            position,
            kind,
        });
        self.adjacency.push(Vec::new());
        index
    }

    pub fn add_edge(&mut self, a: usize, b: usize) {
        let weight = self.nodes[a].position.distance(self.nodes[b].position);
        self.edges.push(GraphEdge { a, b, weight });
        self.adjacency[a].push((b, weight));
        self.adjacency[b].push((a, weight));
    }

    pub fn neighbors(&self, node: usize) -> &[(usize, f32)] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn start(&self) -> Option<usize> {
        self.find_kind(NodeKind::Start)
    }

    pub fn end(&self) -> Option<usize> {
        self.find_kind(NodeKind::End)
    }

    fn find_kind(&self, kind: NodeKind) -> Option<usize> {
        self.nodes.iter().position(|node| node.kind == kind)
    }
}

/// Egress edges derived from containment bypass the visibility test.
fn always_connected(a: NodeKind, b: NodeKind) -> bool {
    matches!(
        (a, b),
        (NodeKind::Start, NodeKind::Exit)
            | (NodeKind::Exit, NodeKind::Start)
            | (NodeKind::Entry, NodeKind::End)
            | (NodeKind::End, NodeKind::Entry)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;

    #[test]
    fn node_order_is_start_exit_entry_waypoints_end() {
        let obstacles: [Bounds; 0] = [];
        let ctx = RouteContext::new(Point::ZERO, Point::new(10.0, 0.0), &obstacles, 5.0);
        let graph = VisibilityGraph::build(
            &ctx,
            Point::ZERO,
            Some(Point::new(1.0, 0.0)),
            Some(Point::new(9.0, 0.0)),
            &[Point::new(5.0, 5.0)],
            Point::new(10.0, 0.0),
        );
        let kinds: Vec<NodeKind> = graph.nodes.iter().map(|node| node.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NodeKind::Start,
                NodeKind::Exit,
                NodeKind::Entry,
                NodeKind::Waypoint,
                NodeKind::End
            ]
        );
        assert_eq!(graph.start(), Some(0));
        assert_eq!(graph.end(), Some(4));
    }

    #[test]
    fn blocked_pairs_get_no_edge() {
        let obstacles = [Bounds::new(40.0, -10.0, 60.0, 10.0)];
        let start = Point::new(0.0, 0.0);
        let end = Point::new(100.0, 0.0);
        let ctx = RouteContext::new(start, end, &obstacles, 15.0);
        let graph = VisibilityGraph::build(&ctx, start, None, None, &[Point::new(50.0, -25.0)], end);
        assert!(graph.neighbors(0).iter().all(|(node, _)| *node != 2));
        assert!(graph.neighbors(0).iter().any(|(node, _)| *node == 1));
        assert!(graph.neighbors(2).iter().any(|(node, _)| *node == 1));
    }

    #[test]
    fn exit_edge_bypasses_visibility() {
        // The exit point sits behind a live blocker yet stays connected.
        let host = Bounds::new(0.0, 0.0, 20.0, 20.0);
        let wall = Bounds::new(22.0, -50.0, 24.0, 50.0);
        let obstacles = [host, wall];
        let start = Point::new(15.0, 10.0);
        let end = Point::new(200.0, 10.0);
        let ctx = RouteContext::new(start, end, &obstacles, 10.0);
        let exit = Point::new(30.0, 10.0);
        assert!(!ctx.visible(start, exit));
        let graph = VisibilityGraph::build(&ctx, start, Some(exit), None, &[], end);
        let edge = graph.edges.iter().find(|edge| edge.a == 0 && edge.b == 1);
        assert!(edge.is_some());
        assert!((edge.map(|e| e.weight).unwrap_or(0.0) - 15.0).abs() < 1e-4);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let obstacles: [Bounds; 0] = [];
        let ctx = RouteContext::new(Point::ZERO, Point::new(10.0, 0.0), &obstacles, 5.0);
        let graph = VisibilityGraph::build(
            &ctx,
            Point::ZERO,
            None,
            None,
            &[Point::new(3.0, 4.0)],
            Point::new(10.0, 0.0),
        );
        for edge in &graph.edges {
            assert!(graph.neighbors(edge.a).contains(&(edge.b, edge.weight)));
            assert!(graph.neighbors(edge.b).contains(&(edge.a, edge.weight)));
            assert!(edge.weight >= 0.0);
        }
        assert_eq!(graph.edges.len(), 3);
    }
}
