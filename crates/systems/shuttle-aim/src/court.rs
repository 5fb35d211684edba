use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// World-space box of the receiving court surface, when available from
/// scene geometry. Only its XZ extent is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourtGeometry {
    pub min: Vec3,
    pub max: Vec3,
}

/// Receiving-side court rectangle and net description.
///
/// The net is assumed to span the court along X, so its plane is `z = net_plane_z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourtBounds {
    /// Takes precedence over the manual rectangle when present.
    pub geometry: Option<CourtGeometry>,
    /// Manual XZ rectangle (x, z) used without geometry.
    pub min_xz: Vec2,
    pub max_xz: Vec2,
    pub net_plane_z: f32,
    /// Height of the net tape.
    pub net_top_y: f32,
    /// Extra height an arc must keep above the tape.
    pub net_clearance_margin: f32,
    /// Whether requested targets are pulled into the rectangle.
    pub clamp_into_bounds: bool,
}

impl Default for CourtBounds {
    fn default() -> Self {
        Self {
            geometry: None,
            min_xz: Vec2::new(-3.0, 1.0),
            max_xz: Vec2::new(3.0, 7.0),
            net_plane_z: 0.0,
            net_top_y: 1.55,
            net_clearance_margin: 0.10,
            clamp_into_bounds: true,
        }
    }
}

impl CourtBounds {
    /// Active XZ extents as `(min, max)`, normalized so `min <= max`.
    pub fn extents(&self) -> (Vec2, Vec2) {
        let (a, b) = match &self.geometry {
            Some(g) => (Vec2::new(g.min.x, g.min.z), Vec2::new(g.max.x, g.max.z)),
            None => (self.min_xz, self.max_xz),
        };
        (a.min(b), a.max(b))
    }

    /// `world` with x and z clamped into the rectangle; y is untouched.
    pub fn clamp_into_bounds(&self, world: Vec3) -> Vec3 {
        let (min, max) = self.extents();
        Vec3::new(
            world.x.clamp(min.x, max.x),
            world.y,
            world.z.clamp(min.y, max.y),
        )
    }

    pub fn is_inside(&self, world: Vec3) -> bool {
        let (min, max) = self.extents();
        (min.x..=max.x).contains(&world.x) && (min.y..=max.y).contains(&world.z)
    }

    /// Minimum height an arc must have at the net plane.
    pub fn required_clearance_height(&self) -> f32 {
        self.net_top_y + self.net_clearance_margin
    }
}
