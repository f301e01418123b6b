//! # Axis-Aligned Bounding Boxes
//!
//! The only collision shape in the core. Boxes are stored as min/max corners
//! and all queries (overlap, per-axis push-out, ray slabs) operate on those
//! corners directly.

use cgmath::{EuclideanSpace, Point3, Vector3};

/// A world axis used by the separated-axis collision sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The world X axis.
    X,
    /// The world Y axis.
    Y,
    /// The world Z axis.
    Z,
}

impl Axis {
    /// The order in which the physics tick translates and resolves axes:
    /// horizontal movement first (X then Z), vertical last. Resolving Y last
    /// keeps entities from snagging on walls while falling along them.
    pub const SWEEP_ORDER: [Axis; 3] = [Axis::X, Axis::Z, Axis::Y];

    /// Component index of this axis in a vector or point.
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Unit vector along this axis.
    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

/// An axis-aligned bounding box given by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// The corner with the smallest coordinates.
    pub min: Point3<f32>,
    /// The corner with the largest coordinates.
    pub max: Point3<f32>,
}

impl Aabb {
    /// Builds a box from explicit corners.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb { min, max }
    }

    /// Builds the box `[center - scale/2, center + scale/2]`. This is how
    /// colliders derive their bounds from an entity transform.
    pub fn from_center_scale(center: Point3<f32>, scale: Vector3<f32>) -> Self {
        let half = scale / 2.0;
        Aabb {
            min: center - half,
            max: center + half,
        }
    }

    /// The center point of the box.
    pub fn center(&self) -> Point3<f32> {
        self.min.midpoint(self.max)
    }

    /// Whether the two boxes have positive overlap on all three axes.
    /// Touching boxes (zero gap) do not count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }

    /// The overlap depth between the two boxes on one axis. Non-positive
    /// values mean the boxes are separated (or exactly touching) there.
    pub fn overlap_on(&self, other: &Aabb, axis: Axis) -> f32 {
        let i = axis.index();
        self.max[i].min(other.max[i]) - self.min[i].max(other.min[i])
    }

    /// The signed minimum translation that moves `self` out of `other` along
    /// `axis`, or `None` when the boxes do not overlap on that axis.
    ///
    /// The translation separates the boxes to an exact touch; no inflation
    /// factor is applied.
    pub fn push_out(&self, other: &Aabb, axis: Axis) -> Option<f32> {
        let i = axis.index();
        let d0 = other.max[i] - self.min[i];
        let d1 = self.max[i] - other.min[i];
        if d0 <= 0.0 || d1 <= 0.0 {
            return None;
        }
        Some(if d0 < d1 { d0 } else { -d1 })
    }
}
