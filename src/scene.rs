use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Bounds, Point};

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} point has non-finite coordinates")]
    NonFinitePoint(&'static str),
    #[error("obstacle {0} has non-finite bounds")]
    InvalidObstacle(usize),
}

/// One arrow request: two endpoints and the boxes it should avoid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub obstacles: Vec<Bounds>,
}

impl Scene {
    /// Checks coordinates and re-orders any obstacle given with min > max.
    pub fn validate(mut self) -> Result<Self, SceneError> {
        if !self.start.is_finite() {
            return Err(SceneError::NonFinitePoint("start"));
        }
        if !self.end.is_finite() {
            return Err(SceneError::NonFinitePoint("end"));
        }
        for (idx, obstacle) in self.obstacles.iter_mut().enumerate() {
            let normalized = Bounds::new(obstacle.min_x, obstacle.min_y, obstacle.max_x, obstacle.max_y);
            if !normalized.is_valid() {
                return Err(SceneError::InvalidObstacle(idx));
            }
            *obstacle = normalized;
        }
        Ok(self)
    }

    /// Smallest box holding both endpoints and every obstacle.
    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::new(self.start.x, self.start.y, self.end.x, self.end.y);
        for obstacle in &self.obstacles {
            bounds.min_x = bounds.min_x.min(obstacle.min_x);
            bounds.min_y = bounds.min_y.min(obstacle.min_y);
            bounds.max_x = bounds.max_x.max(obstacle.max_x);
            bounds.max_y = bounds.max_y.max(obstacle.max_y);
        }
        bounds
    }
}

pub fn parse_scene(input: &str) -> Result<Scene, SceneError> {
    let scene: Scene = serde_json::from_str(input)?;
    scene.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_camel_case_obstacles() {
        let scene = parse_scene(
            r#"{
                "start": { "x": 0, "y": 0 },
                "end": { "x": 100, "y": 0 },
                "obstacles": [{ "minX": 40, "minY": -10, "maxX": 60, "maxY": 10 }]
            }"#,
        )
        .expect("scene should parse");
        assert_eq!(scene.obstacles, vec![Bounds::new(40.0, -10.0, 60.0, 10.0)]);
    }

    #[test]
    fn obstacles_default_to_empty() {
        let scene = parse_scene(r#"{ "start": { "x": 1, "y": 2 }, "end": { "x": 3, "y": 4 } }"#)
            .expect("scene should parse");
        assert!(scene.obstacles.is_empty());
    }

    #[test]
    fn swapped_bounds_are_normalized() {
        let scene = parse_scene(
            r#"{
                "start": { "x": 0, "y": 0 },
                "end": { "x": 1, "y": 1 },
                "obstacles": [{ "minX": 60, "minY": 10, "maxX": 40, "maxY": -10 }]
            }"#,
        )
        .expect("scene should parse");
        assert_eq!(scene.obstacles[0], Bounds::new(40.0, -10.0, 60.0, 10.0));
        assert_eq!(scene.obstacles[0].min_x, 40.0);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(parse_scene("{"), Err(SceneError::Json(_))));
    }

    #[test]
    fn bounds_cover_endpoints_and_obstacles() {
        let scene = Scene {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 0.0),
            obstacles: vec![Bounds::new(40.0, -10.0, 60.0, 30.0)],
        };
        let bounds = scene.bounds();
        assert_eq!((bounds.min_y, bounds.max_y, bounds.max_x), (-10.0, 30.0, 100.0));
    }
}
