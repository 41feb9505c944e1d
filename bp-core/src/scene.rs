//! Static scene geometry.
//!
//! The viewer only knows two shapes: a flat baseplate and a slope. Both are
//! compile time constants. [`SceneDescription`] turns them into flat shaded
//! triangle meshes with a colour each, which the client uploads once at startup.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `point` lies inside the box, faces included.
    pub fn contains(&self, point: Vec3) -> bool {
        self.contains_xz(point) && point.y >= self.min.y && point.y <= self.max.y
    }

    /// Returns `true` if the horizontal projection of `point` lies inside the box.
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }
}

/// The collision box of the baseplate.
pub const BASEPLATE: Aabb = Aabb::new(Vec3::new(-5.0, -0.5, -5.0), Vec3::new(5.0, 0.5, 5.0));

/// How far above the top of the baseplate a position still counts as touching it.
pub const BASEPLATE_REACH: f32 = 1.5;

/// Height of the rendered baseplate surface.
pub const BASEPLATE_SURFACE_Y: f32 = -0.5;

/// The slope region. The ramp rises along +x from (0, 0) to (2, 2) and spans
/// z in [0, 2].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlopeRegion {
    pub footprint: Aabb,
}

pub const SLOPE: SlopeRegion = SlopeRegion {
    footprint: Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0)),
};

impl SlopeRegion {
    /// The planar height field test: inside the footprint and not above the
    /// plane `y = x`. This is an approximation of the prism, not a containment
    /// check.
    pub fn contains(&self, position: Vec3) -> bool {
        self.footprint.contains_xz(position) && position.y <= position.x
    }

    /// Eye height the camera is snapped to while standing on the ramp.
    pub fn surface_height(&self, position: Vec3) -> f32 {
        position.x / 2.0 + 0.5
    }

    /// Incline of the ramp in degrees, measured as rise over half the run.
    pub fn incline_degrees(&self) -> f32 {
        let size = self.footprint.size();
        size.y.atan2(size.x / 2.0).to_degrees()
    }
}

/// Steepest incline the camera could walk up.
pub const MAX_WALKABLE_INCLINE: f32 = 45.0;

/// The point light of the scene.
pub const LIGHT_POSITION: Vec3 = Vec3::new(1.2, 1.0, 2.0);
pub const LIGHT_COLOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);

pub const BASEPLATE_COLOR: Vec3 = Vec3::new(0.0, 0.0, 1.0);
pub const SLOPE_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Which shape is used to draw the slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeStyle {
    /// A single upright triangle in the z = 0 plane.
    Triangle,
    /// A closed triangular prism matching the collision region.
    #[default]
    Prism,
}

/// A vertex as it is laid out in the GPU buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct ShapeVertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Triangle mesh of a single static shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMesh {
    pub name: &'static str,
    pub vertices: Vec<ShapeVertex>,
    pub indices: Vec<u32>,
    pub color: Vec3,
}

impl ShapeMesh {
    /// Builds a flat shaded mesh out of convex planar faces given in counter
    /// clockwise order when seen from outside. Every face gets its own
    /// vertices so that normals are not shared across edges.
    pub fn from_faces(name: &'static str, color: Vec3, faces: &[&[Vec3]]) -> Self {
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for face in faces {
            if face.len() < 3 {
                continue;
            }
            let normal = (face[1] - face[0]).cross(face[2] - face[0]).normalize_or_zero();
            let base = vertices.len() as u32;
            vertices.extend(face.iter().map(|&position| ShapeVertex { position, normal }));
            for i in 1..face.len() as u32 - 1 {
                indices.extend([base, base + i, base + i + 1]);
            }
        }

        Self {
            name,
            vertices,
            indices,
            color,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn baseplate_mesh() -> ShapeMesh {
    let y = BASEPLATE_SURFACE_Y;
    let (min, max) = (BASEPLATE.min, BASEPLATE.max);
    ShapeMesh::from_faces(
        "baseplate",
        BASEPLATE_COLOR,
        &[&[
            Vec3::new(min.x, y, min.z),
            Vec3::new(min.x, y, max.z),
            Vec3::new(max.x, y, max.z),
            Vec3::new(max.x, y, min.z),
        ]],
    )
}

fn slope_mesh(style: SlopeStyle) -> ShapeMesh {
    match style {
        SlopeStyle::Triangle => ShapeMesh::from_faces(
            "slope",
            SLOPE_COLOR,
            &[&[
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(1.0, 2.0, 0.0),
            ]],
        ),
        SlopeStyle::Prism => {
            let bottom = [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 2.0),
                Vec3::new(0.0, 0.0, 2.0),
            ];
            let ramp = [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::new(2.0, 2.0, 2.0),
                Vec3::new(2.0, 2.0, 0.0),
            ];
            let back = [
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 2.0, 0.0),
                Vec3::new(2.0, 2.0, 2.0),
                Vec3::new(2.0, 0.0, 2.0),
            ];
            let near_side = [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 2.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
            ];
            let far_side = [
                Vec3::new(0.0, 0.0, 2.0),
                Vec3::new(2.0, 0.0, 2.0),
                Vec3::new(2.0, 2.0, 2.0),
            ];
            ShapeMesh::from_faces(
                "slope",
                SLOPE_COLOR,
                &[&bottom, &ramp, &back, &near_side, &far_side],
            )
        }
    }
}

/// Everything the renderer needs to know about the world.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDescription {
    pub shapes: Vec<ShapeMesh>,
    pub light_position: Vec3,
    pub light_color: Vec3,
}

impl SceneDescription {
    pub fn new(style: SlopeStyle) -> Self {
        Self {
            shapes: vec![baseplate_mesh(), slope_mesh(style)],
            light_position: LIGHT_POSITION,
            light_color: LIGHT_COLOR,
        }
    }
}
