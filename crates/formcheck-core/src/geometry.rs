//! Geometric utilities for joint-angle features.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::types::Keypoint;

/// Calculate the angle between two vectors in radians.
///
/// Returns 0 when either vector has zero length.
pub fn angle_between(v1: &Vector2<f64>, v2: &Vector2<f64>) -> f64 {
    let norms = v1.norm() * v2.norm();
    if norms == 0.0 || !norms.is_finite() {
        0.0
    } else {
        // Clamp: rounding can push the cosine just outside [-1, 1]
        (v1.dot(v2) / norms).clamp(-1.0, 1.0).acos()
    }
}

/// Angle in degrees at vertex `b` between rays `b→a` and `b→c`.
///
/// Only the image-plane coordinates are used. The result lies in [0, 180];
/// a zero-length ray yields 0.
pub fn angle_at(a: &Keypoint, b: &Keypoint, c: &Keypoint) -> f64 {
    let ba = Vector2::new(a.x - b.x, a.y - b.y);
    let bc = Vector2::new(c.x - b.x, c.y - b.y);
    angle_between(&ba, &bc).to_degrees()
}

/// Axis-aligned bounding box in the image plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox2D {
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Keypoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;

        let mut bbox = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };

        for p in iter {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }

        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}
