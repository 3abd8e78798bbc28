//! Radar chart geometry. Outcome points up and the axes run clockwise
//! (Outcome, Relation, Process, Value). The radial axis spans 0-100.

use crate::reference::Dimension;
use crate::scoring::PerDimension;
use std::f64::consts::{FRAC_PI_2, PI};

pub const RADIAL_MAX: f64 = 100.0;

/// Radial gridlines drawn behind the data
pub const GRID_RINGS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];

pub type Point = (f64, f64);

/// Angle of a dimension's axis in radians, measured counter-clockwise from +x
pub fn axis_angle(dimension: Dimension) -> f64 {
    FRAC_PI_2 - dimension.index() as f64 * (2.0 * PI / Dimension::ALL.len() as f64)
}

pub fn axis_point(dimension: Dimension, radius: f64) -> Point {
    let angle = axis_angle(dimension);
    (radius * angle.cos(), radius * angle.sin())
}

/// Radius used for drawing. Scores outside 0-100 (e.g. the -25% fallback of
/// an unanswered dimension) are pinned to the chart edge; the data itself is
/// left untouched.
pub fn chart_radius(percent: f64) -> f64 {
    percent.clamp(0.0, RADIAL_MAX)
}

/// Closed data polygon: one vertex per dimension, first vertex repeated last
pub fn data_polygon(scores: &PerDimension<f64>) -> Vec<Point> {
    closed(Dimension::ALL.map(|d| axis_point(d, chart_radius(scores.get(d)))))
}

/// Closed gridline polygon at `radius`
pub fn ring(radius: f64) -> Vec<Point> {
    closed(Dimension::ALL.map(|d| axis_point(d, radius)))
}

/// Consecutive point pairs, for drawing a polyline as separate segments
pub fn segments(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    points.windows(2).map(|pair| (pair[0], pair[1]))
}

fn closed(vertices: [Point; 4]) -> Vec<Point> {
    let mut points = vertices.to_vec();
    points.push(vertices[0]);
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Point, expected: Point) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_axes_run_clockwise_from_top() {
        assert_close(axis_point(Dimension::Outcome, 100.0), (0.0, 100.0));
        assert_close(axis_point(Dimension::Relation, 100.0), (100.0, 0.0));
        assert_close(axis_point(Dimension::Process, 100.0), (0.0, -100.0));
        assert_close(axis_point(Dimension::Value, 100.0), (-100.0, 0.0));
    }

    #[test]
    fn test_chart_radius_clamps_for_display() {
        assert_eq!(chart_radius(-25.0), 0.0);
        assert_eq!(chart_radius(50.0), 50.0);
        assert_eq!(chart_radius(120.0), 100.0);
    }

    #[test]
    fn test_data_polygon_is_closed() {
        let scores = PerDimension::new([75.0, 50.0, 25.0, -25.0]);
        let points = data_polygon(&scores);
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], points[4]);
        assert_close(points[0], (0.0, 75.0));
        assert_close(points[1], (50.0, 0.0));
        assert_close(points[2], (0.0, -25.0));
        assert_close(points[3], (0.0, 0.0));
    }

    #[test]
    fn test_segments_pair_consecutive_points() {
        let points = ring(50.0);
        let segs: Vec<_> = segments(&points).collect();
        assert_eq!(segs.len(), 4);
        assert_eq!(segs[0].0, points[0]);
        assert_eq!(segs[3].1, points[0]);
    }
}
