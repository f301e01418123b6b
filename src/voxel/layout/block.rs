//! # Block Layout
//!
//! The standard unit-cube layout. Each face is a quad of four unique
//! vertices half a cell away from the center. Face textures come from a
//! cross-shaped unwrap inside one atlas cell: a 4x3 grid of sub-rectangles
//! with top above the front, bottom below it, and left/back/right alongside.

use cgmath::Point3;

use super::{Face, Layout};

/// Unit-cube face layout with the cross-unwrapped UV mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockLayout;

impl Layout for BlockLayout {
    fn vertices(&self, face: Face, position: Point3<f32>) -> [[f32; 3]; 4] {
        let (x, y, z) = (position.x, position.y, position.z);
        match face {
            Face::Front => [
                [-0.5 + x, 0.5 + y, 0.5 + z],
                [-0.5 + x, -0.5 + y, 0.5 + z],
                [0.5 + x, -0.5 + y, 0.5 + z],
                [0.5 + x, 0.5 + y, 0.5 + z],
            ],
            Face::Back => [
                [-0.5 + x, 0.5 + y, -0.5 + z],
                [-0.5 + x, -0.5 + y, -0.5 + z],
                [0.5 + x, -0.5 + y, -0.5 + z],
                [0.5 + x, 0.5 + y, -0.5 + z],
            ],
            Face::Top => [
                [-0.5 + x, 0.5 + y, -0.5 + z],
                [-0.5 + x, 0.5 + y, 0.5 + z],
                [0.5 + x, 0.5 + y, 0.5 + z],
                [0.5 + x, 0.5 + y, -0.5 + z],
            ],
            Face::Bottom => [
                [-0.5 + x, -0.5 + y, -0.5 + z],
                [-0.5 + x, -0.5 + y, 0.5 + z],
                [0.5 + x, -0.5 + y, 0.5 + z],
                [0.5 + x, -0.5 + y, -0.5 + z],
            ],
            Face::Right => [
                [0.5 + x, 0.5 + y, 0.5 + z],
                [0.5 + x, -0.5 + y, 0.5 + z],
                [0.5 + x, -0.5 + y, -0.5 + z],
                [0.5 + x, 0.5 + y, -0.5 + z],
            ],
            Face::Left => [
                [-0.5 + x, 0.5 + y, -0.5 + z],
                [-0.5 + x, -0.5 + y, -0.5 + z],
                [-0.5 + x, -0.5 + y, 0.5 + z],
                [-0.5 + x, 0.5 + y, 0.5 + z],
            ],
        }
    }

    fn normals(&self, face: Face) -> [[f32; 3]; 4] {
        let normal = match face {
            Face::Front => [0.0, 0.0, 1.0],
            Face::Back => [0.0, 0.0, -1.0],
            Face::Top => [0.0, 1.0, 0.0],
            Face::Bottom => [0.0, -1.0, 0.0],
            Face::Right => [1.0, 0.0, 0.0],
            Face::Left => [-1.0, 0.0, 0.0],
        };
        [normal; 4]
    }

    fn uvs(&self, face: Face, x_offset: f32, y_offset: f32, rows: usize) -> [[f32; 2]; 4] {
        let r = rows as f32;
        // Horizontal quarters and vertical thirds of the cross unwrap,
        // scaled into one atlas cell.
        let (q1, q2, q3, q4) = (0.25 / r, 0.5 / r, 0.75 / r, 1.0 / r);
        let (t1, t2) = (0.33 / r, 0.66 / r);
        let at = |u: f32, v: f32| [u + x_offset, v + y_offset];
        match face {
            Face::Front => [at(q1, t1), at(q1, t2), at(q2, t2), at(q2, t1)],
            Face::Back => [at(q4, t1), at(q4, t2), at(q3, t2), at(q3, t1)],
            Face::Top => [at(q1, 0.0), at(q1, t1), at(q2, t1), at(q2, 0.0)],
            Face::Bottom => [at(q1, t2), at(q1, q4), at(q2, q4), at(q2, t2)],
            Face::Right => [at(q2, t1), at(q2, t2), at(q3, t2), at(q3, t1)],
            Face::Left => [at(0.0, t1), at(0.0, t2), at(q1, t2), at(q1, t1)],
        }
    }

    /// Front-like faces wind `(0,1,2, 2,3,0)`; back and bottom reverse the
    /// traversal so every face winds outward. Collapsing the two cases into
    /// one inverts the back faces under back-face culling.
    fn indices(&self, face: Face, base: u32) -> [u32; 6] {
        let i = base;
        match face {
            Face::Front | Face::Top | Face::Right | Face::Left => {
                [i, i + 1, i + 2, i + 2, i + 3, i]
            }
            Face::Back | Face::Bottom => [i, i + 3, i + 2, i + 2, i + 1, i],
        }
    }
}
