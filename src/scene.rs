//! The rendering-layer interface: fully resolved shapes, transforms, and
//! colors.
//!
//! After solution application every dimension, position, and rotation of a
//! drawable component is numerically bound; this module converts them into
//! engine-agnostic scene data (glam vectors and quaternions, `bevy_math`
//! primitives) that a visualization layer can draw without any constraint
//! logic of its own.

use crate::assembly::Assembly;
use crate::component::{Component, ComponentKind};
use crate::geometry::{Mesh, MeshShape, Position, Rotation};
use bevy_heavy::ComputeMassProperties3d;
use bevy_math::primitives::{Cuboid, Cylinder};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The base color palette of the standard renderer.
pub mod palette {
    /// Near-black navy.
    pub const MAASTRICHT: u32 = 0x0A122A;
    /// Deep blue.
    pub const ST_PATRICKS: u32 = 0x274C77;
    /// Mid blue.
    pub const SILVER_LAKE: u32 = 0x6096BA;
    /// Pale blue.
    pub const BABY_BLUE: u32 = 0xA3CEF1;
    /// Near-white blue-grey.
    pub const COLUMBIA: u32 = 0xCDD6DD;
}

/// The static component-type to color table used by the rendering layer.
pub fn component_color(kind: ComponentKind) -> u32 {
    match kind {
        ComponentKind::Payload => palette::SILVER_LAKE,
        ComponentKind::Plate | ComponentKind::Beam => palette::MAASTRICHT,
        ComponentKind::Battery => palette::ST_PATRICKS,
        ComponentKind::SpeedController | ComponentKind::Motor => palette::BABY_BLUE,
        ComponentKind::Propeller => palette::SILVER_LAKE,
    }
}

/// A fully resolved primitive shape.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub enum ResolvedShape {
    /// A box given by its full side lengths along x, y, z.
    Box(Vec3),
    /// A cylinder standing along z.
    Cylinder {
        /// Cylinder radius.
        radius: f32,
        /// Cylinder height.
        height: f32,
    },
}

/// A type-erased wrapper so we can call [`ComputeMassProperties3d`] on any
/// resolved shape variant.
#[derive(Clone, Copy, Debug)]
pub enum ScenePrimitive {
    /// Resolved box.
    Cuboid(Cuboid),
    /// Resolved cylinder.
    Cylinder(Cylinder),
}

impl ComputeMassProperties3d for ScenePrimitive {
    fn mass(&self, density: f32) -> f32 {
        match self {
            Self::Cuboid(s) => s.mass(density),
            Self::Cylinder(s) => s.mass(density),
        }
    }

    fn unit_principal_angular_inertia(&self) -> Vec3 {
        match self {
            Self::Cuboid(s) => s.unit_principal_angular_inertia(),
            Self::Cylinder(s) => s.unit_principal_angular_inertia(),
        }
    }

    fn center_of_mass(&self) -> Vec3 {
        match self {
            Self::Cuboid(s) => s.center_of_mass(),
            Self::Cylinder(s) => s.center_of_mass(),
        }
    }
}

impl ResolvedShape {
    /// Reads a mesh's bound dimensions; `None` while any dimension is still
    /// unsolved.
    pub fn from_mesh(mesh: &Mesh) -> Option<Self> {
        match &mesh.shape {
            MeshShape::Box { xlen, ylen, zlen } => Some(Self::Box(Vec3::new(
                xlen.value()? as f32,
                ylen.value()? as f32,
                zlen.value()? as f32,
            ))),
            MeshShape::Cylinder { diameter, height } => Some(Self::Cylinder {
                radius: (diameter.value()? * 0.5) as f32,
                height: height.value()? as f32,
            }),
        }
    }

    /// Convert to the corresponding `bevy_math` primitive for mass-property
    /// computation.
    pub fn to_scene_primitive(self) -> ScenePrimitive {
        match self {
            Self::Box(size) => ScenePrimitive::Cuboid(Cuboid::new(size.x, size.y, size.z)),
            Self::Cylinder { radius, height } => {
                ScenePrimitive::Cylinder(Cylinder::new(radius, height))
            }
        }
    }
}

/// Reads a position's bound axes as a translation vector.
pub fn resolve_translation(position: &Position) -> Option<Vec3> {
    Some(Vec3::new(
        position.x.value()? as f32,
        position.y.value()? as f32,
        position.z.value()? as f32,
    ))
}

/// Reads a rotation's bound axes (degrees) as a quaternion.
pub fn resolve_rotation(rotation: &Rotation) -> Option<Quat> {
    Some(Quat::from_euler(
        EulerRot::XYZ,
        rotation.x.value()?.to_radians() as f32,
        rotation.y.value()?.to_radians() as f32,
        rotation.z.value()?.to_radians() as f32,
    ))
}

/// One drawable component with every quantity numerically resolved.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ResolvedComponent {
    /// Component type tag, for renderer dispatch.
    pub kind: ComponentKind,
    /// Color from the standard table.
    pub color: u32,
    /// Resolved shape.
    pub shape: ResolvedShape,
    /// World translation.
    pub translation: Vec3,
    /// World rotation.
    pub rotation: Quat,
    /// Solid mass estimated from the resolved shape and material density,
    /// when both are available. A solver-side mass variable is authoritative;
    /// this is the geometric estimate.
    pub mass_estimate: Option<f32>,
}

impl ResolvedComponent {
    /// Resolves one component; `None` for geometry-less components and for
    /// components with any unsolved quantity.
    pub fn from_component(component: &Component) -> Option<Self> {
        let geometry = component.geometry()?;
        let shape = ResolvedShape::from_mesh(&geometry.mesh)?;
        let translation = resolve_translation(&geometry.position)?;
        let rotation = resolve_rotation(&geometry.rotation)?;
        let mass_estimate = component
            .material()
            .and_then(|m| m.density.value())
            .map(|density| shape.to_scene_primitive().mass(density as f32));
        let kind = component.kind();
        Some(Self {
            kind,
            color: component_color(kind),
            shape,
            translation,
            rotation,
            mass_estimate,
        })
    }
}

/// Resolves every drawable component of an assembly, in insertion order.
///
/// Components that are geometry-less (propellers) or still carry unsolved
/// quantities are skipped rather than reported as errors; the rendering
/// layer draws what is ready.
pub fn resolve_scene(assembly: &Assembly) -> Vec<ResolvedComponent> {
    assembly
        .components()
        .iter()
        .filter_map(ResolvedComponent::from_component)
        .collect()
}
