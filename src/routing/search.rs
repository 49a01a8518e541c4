use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::VisibilityGraph;

#[derive(Clone, Copy, Debug, PartialEq)]
struct FrontierEntry {
    est: f32,
    cost: f32,
    node: usize,
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .est
            .total_cmp(&self.est)
            .then_with(|| self.cost.total_cmp(&other.cost))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One search direction: its open heap, costs and parent links.
struct Frontier {
    open: BinaryHeap<FrontierEntry>,
    cost: Vec<f32>,
    parent: Vec<Option<usize>>,
    target: usize,
}

impl Frontier {
    fn new(node_count: usize, origin: usize, target: usize, heuristic: f32) -> Self {
        let mut cost = vec![f32::INFINITY; node_count];
        cost[origin] = 0.0;
        let mut open = BinaryHeap::new();
        open.push(FrontierEntry {
            est: heuristic,
            cost: 0.0,
            node: origin,
        });
        Self {
            open,
            cost,
            parent: vec![None; node_count],
            target,
        }
    }

    /// Lowest estimate still on the heap; a lower bound for this side.
    fn bound(&self) -> f32 {
        self.open.peek().map(|entry| entry.est).unwrap_or(f32::INFINITY)
    }
}

struct Search<'a> {
    graph: &'a VisibilityGraph,
    closed: Vec<bool>,
    best: f32,
    meeting: Option<usize>,
}

impl Search<'_> {
    fn heuristic(&self, node: usize, target: usize) -> f32 {
        self.graph.nodes[node]
            .position
            .distance(self.graph.nodes[target].position)
    }

    /// Expands the best node of `side`, pruning with the NBA* rejection test
    /// against the opposite frontier's bound.
    fn expand(&mut self, side: &mut Frontier, other: &Frontier) {
        let Some(entry) = side.open.pop() else {
            return;
        };
        let node = entry.node;
        if self.closed[node] {
            return;
        }
        self.closed[node] = true;

        let g = side.cost[node];
        let rejected = g + self.heuristic(node, side.target) >= self.best
            || g + other.bound() - self.heuristic(node, other.target) >= self.best;
        if rejected {
            return;
        }

        for &(next, weight) in self.graph.neighbors(node) {
            if self.closed[next] {
                continue;
            }
            let next_cost = g + weight;
            if next_cost >= side.cost[next] {
                continue;
            }
            side.cost[next] = next_cost;
            side.parent[next] = Some(node);
            side.open.push(FrontierEntry {
                est: next_cost + self.heuristic(next, side.target),
                cost: next_cost,
                node: next,
            });
            let through = next_cost + other.cost[next];
            if through < self.best {
                self.best = through;
                self.meeting = Some(next);
            }
        }
    }
}

/// Bidirectional A* (NBA*) from the graph's start node to its end node.
///
/// Returns node indices from start to end, or an empty vector when the two
/// are not connected.
pub fn bidirectional_search(graph: &VisibilityGraph) -> Vec<usize> {
    let (Some(start), Some(end)) = (graph.start(), graph.end()) else {
        return Vec::new();
    };
    if start == end {
        return vec![start];
    }

    let count = graph.nodes.len();
    let mut search = Search {
        graph,
        closed: vec![false; count],
        best: f32::INFINITY,
        meeting: None,
    };
    let span = search.heuristic(start, end);
    let mut forward = Frontier::new(count, start, end, span);
    let mut backward = Frontier::new(count, end, start, span);

    while !forward.open.is_empty() && !backward.open.is_empty() {
        if forward.open.len() <= backward.open.len() {
            search.expand(&mut forward, &backward);
        } else {
            search.expand(&mut backward, &forward);
        }
        if forward.bound().min(backward.bound()) >= search.best {
            break;
        }
    }

    let Some(meeting) = search.meeting else {
        return Vec::new();
    };
    let mut path = Vec::new();
    let mut cursor = Some(meeting);
    while let Some(node) = cursor {
        path.push(node);
        cursor = forward.parent[node];
    }
    path.reverse();
    let mut cursor = backward.parent[meeting];
    while let Some(node) = cursor {
        path.push(node);
        cursor = backward.parent[node];
    }
    path
}
