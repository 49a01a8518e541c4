use crate::geometry::Point;

/// One cubic Bézier piece of a fitted route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub from: Point,
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

impl CubicSegment {
    pub fn point_at(&self, t: f32) -> Point {
        let u = 1.0 - t;
        let a = u * u * u;
        let b = 3.0 * u * u * t;
        let c = 3.0 * u * t * t;
        let d = t * t * t;
        Point::new(
            a * self.from.x + b * self.ctrl1.x + c * self.ctrl2.x + d * self.to.x,
            a * self.from.y + b * self.ctrl1.y + c * self.ctrl2.y + d * self.to.y,
        )
    }

    /// Outward direction at the start (pointing away from the curve body).
    pub fn start_tangent(&self) -> Point {
        let handle = self.from - self.ctrl1;
        if handle.normalized().is_some() {
            handle
        } else {
            self.from - self.to
        }
    }

    /// Forward direction at the end.
    pub fn end_tangent(&self) -> Point {
        let handle = self.to - self.ctrl2;
        if handle.normalized().is_some() {
            handle
        } else {
            self.to - self.from
        }
    }

    /// Polyline approximation with `steps` chords.
    pub fn flatten(&self, steps: usize) -> Vec<Point> {
        let steps = steps.max(1);
        (0..=steps)
            .map(|i| self.point_at(i as f32 / steps as f32))
            .collect()
    }
}

/// Fits C1-continuous cubic segments through `points`.
///
/// Tangents are central differences scaled by `smoothness`, one-sided at the
/// two ends. Two points produce a straight cubic with handles at 25% / 75%.
pub fn fit_curve(points: &[Point], smoothness: f32) -> Vec<CubicSegment> {
    if points.len() < 2 {
        return Vec::new();
    }
    if points.len() == 2 {
        let (from, to) = (points[0], points[1]);
        return vec![CubicSegment {
            from,
            ctrl1: from.lerp(to, 0.25),
            ctrl2: from.lerp(to, 0.75),
            to,
        }];
    }

    let s = if smoothness.is_finite() {
        smoothness.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let last = points.len() - 1;
    let tangents: Vec<Point> = (0..points.len())
        .map(|i| {
            let prev = points[i.saturating_sub(1)];
            let next = points[(i + 1).min(last)];
            (next - prev) * s
        })
        .collect();

    points
        .windows(2)
        .enumerate()
        .map(|(i, pair)| CubicSegment {
            from: pair[0],
            ctrl1: pair[0] + tangents[i],
            ctrl2: pair[1] - tangents[i + 1],
            to: pair[1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_points_use_quarter_handles() {
        let segments = fit_curve(&[Point::new(0.0, 0.0), Point::new(100.0, 0.0)], 0.5);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].ctrl1, Point::new(25.0, 0.0));
        assert_eq!(segments[0].ctrl2, Point::new(75.0, 0.0));
    }

    #[test]
    fn produces_one_segment_per_gap() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(50.0, -25.0),
            Point::new(100.0, 0.0),
            Point::new(150.0, 30.0),
        ];
        let segments = fit_curve(&points, 0.3);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].from, points[0]);
        assert_eq!(segments[2].to, points[3]);
    }

    #[test]
    fn interior_joins_are_c1_continuous() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(40.0, -30.0),
            Point::new(90.0, 10.0),
            Point::new(120.0, -5.0),
        ];
        let segments = fit_curve(&points, 0.25);
        for pair in segments.windows(2) {
            let joint = pair[0].to;
            assert_eq!(joint, pair[1].from);
            let incoming = joint - pair[0].ctrl2;
            let outgoing = pair[1].ctrl1 - joint;
            assert!((incoming.x - outgoing.x).abs() < 1e-4);
            assert!((incoming.y - outgoing.y).abs() < 1e-4);
        }
    }

    #[test]
    fn end_tangents_use_available_neighbour() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 10.0), Point::new(20.0, 0.0)];
        let segments = fit_curve(&points, 0.5);
        assert_eq!(segments[0].ctrl1, Point::new(5.0, 5.0));
        assert_eq!(segments[1].ctrl2, Point::new(15.0, 5.0));
    }

    #[test]
    fn curve_passes_through_endpoints() {
        let segment = fit_curve(&[Point::new(0.0, 0.0), Point::new(10.0, 4.0)], 0.3)[0];
        assert_eq!(segment.point_at(0.0), Point::new(0.0, 0.0));
        let end = segment.point_at(1.0);
        assert!((end.x - 10.0).abs() < 1e-5 && (end.y - 4.0).abs() < 1e-5);
    }

    #[test]
    fn fewer_than_two_points_is_empty() {
        assert!(fit_curve(&[Point::new(1.0, 1.0)], 0.3).is_empty());
    }
}
