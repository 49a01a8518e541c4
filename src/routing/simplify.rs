use crate::geometry::Point;

use super::RouteContext;

/// Greedy farthest-visible reduction of a routed polyline.
///
/// From the current point, the farthest later point with a clear line of
/// sight is kept and becomes the new current point. Both endpoints survive
/// unchanged and the point count never grows.
pub fn simplify_path(path: &[Point], ctx: &RouteContext<'_>) -> Vec<Point> {
    if path.len() <= 2 {
        return path.to_vec();
    }
    let last = path.len() - 1;
    let mut out = Vec::with_capacity(path.len());
    out.push(path[0]);
    let mut current = 0;
    while current < last {
        let next = (current + 2..=last)
            .rev()
            .find(|&k| ctx.visible(path[current], path[k]))
            .unwrap_or(current + 1);
        out.push(path[next]);
        current = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;

    #[test]
    fn collinear_points_collapse_without_obstacles() {
        let obstacles: [Bounds; 0] = [];
        let path = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 5.0),
            Point::new(30.0, 0.0),
        ];
        let ctx = RouteContext::new(path[0], path[3], &obstacles, 10.0);
        assert_eq!(simplify_path(&path, &ctx), vec![path[0], path[3]]);
    }

    #[test]
    fn necessary_waypoint_is_kept() {
        let obstacles = [Bounds::new(40.0, -10.0, 60.0, 10.0)];
        let path = [
            Point::new(0.0, 0.0),
            Point::new(25.0, -25.0),
            Point::new(50.0, -25.0),
            Point::new(75.0, -25.0),
            Point::new(100.0, 0.0),
        ];
        let ctx = RouteContext::new(path[0], path[4], &obstacles, 15.0);
        let simplified = simplify_path(&path, &ctx);
        assert_eq!(simplified.first(), Some(&path[0]));
        assert_eq!(simplified.last(), Some(&path[4]));
        assert!(simplified.len() < path.len());
        assert!(simplified.len() >= 3);
    }

    #[test]
    fn never_lengthens_and_keeps_endpoints() {
        let obstacles = [
            Bounds::new(20.0, -40.0, 30.0, 40.0),
            Bounds::new(60.0, -40.0, 70.0, 40.0),
        ];
        let path = [
            Point::new(0.0, 0.0),
            Point::new(10.0, -50.0),
            Point::new(45.0, -50.0),
            Point::new(45.0, 50.0),
            Point::new(80.0, 50.0),
            Point::new(100.0, 0.0),
        ];
        let ctx = RouteContext::new(path[0], path[5], &obstacles, 5.0);
        let simplified = simplify_path(&path, &ctx);
        assert!(simplified.len() <= path.len());
        assert_eq!(simplified[0], path[0]);
        assert_eq!(simplified[simplified.len() - 1], path[5]);
    }

    #[test]
    fn short_paths_pass_through() {
        let obstacles: [Bounds; 0] = [];
        let path = [Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
        let ctx = RouteContext::new(path[0], path[1], &obstacles, 10.0);
        assert_eq!(simplify_path(&path, &ctx), path.to_vec());
    }
}
