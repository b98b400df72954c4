//! Parametric shape, placement, and orientation of a component.

use crate::assembly::Assembly;
use crate::mate::MateId;
use crate::variable::{Constraint, Variable, VisitVariables};
use serde::{Deserialize, Serialize};

/// Optional numeric seeds for the three axes of a [`Position`] or [`Rotation`].
///
/// An absent axis yields a free variable to be found by the solver.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct AxisSeed {
    /// Seed for the x axis.
    pub x: Option<f64>,
    /// Seed for the y axis.
    pub y: Option<f64>,
    /// Seed for the z axis.
    pub z: Option<f64>,
}

impl AxisSeed {
    /// All three axes left free.
    pub const FREE: Self = Self {
        x: None,
        y: None,
        z: None,
    };

    /// All three axes pre-bound.
    pub const fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// All three axes pre-bound to zero.
    pub const fn zeroed() -> Self {
        Self::at(0.0, 0.0, 0.0)
    }
}

/// Parametric primitive shape of a component, one per [`Geometry`].
///
/// Every mesh also carries a derived `volume` variable; the relations binding
/// it belong to the solver side, not to constraint generation here.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mesh {
    /// Derived volume of the shape.
    pub volume: Variable,
    /// The shape variant and its dimension variables.
    pub shape: MeshShape,
}

/// Supported shape variants.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum MeshShape {
    /// A rectangular box with full side lengths along x, y, z.
    Box {
        /// Side length along x.
        xlen: Variable,
        /// Side length along y.
        ylen: Variable,
        /// Side length along z.
        zlen: Variable,
    },
    /// A cylinder standing along z.
    Cylinder {
        /// Cylinder diameter.
        diameter: Variable,
        /// Cylinder height.
        height: Variable,
    },
}

impl Mesh {
    /// Creates a box mesh with pre-bound dimensions, scoped to `name`.
    pub fn boxed(name: &str, xlen: f64, ylen: f64, zlen: f64) -> Self {
        Self {
            volume: Variable::free(format!("volume{name}"), "m^3"),
            shape: MeshShape::Box {
                xlen: Variable::bound(format!("xlen{name}"), "m", xlen),
                ylen: Variable::bound(format!("ylen{name}"), "m", ylen),
                zlen: Variable::bound(format!("zlen{name}"), "m", zlen),
            },
        }
    }

    /// Creates a cylinder mesh with pre-bound dimensions, scoped to `name`.
    pub fn cylinder(name: &str, diameter: f64, height: f64) -> Self {
        Self {
            volume: Variable::free(format!("volume{name}"), "m^3"),
            shape: MeshShape::Cylinder {
                diameter: Variable::bound(format!("d{name}"), "m", diameter),
                height: Variable::bound(format!("h{name}"), "m", height),
            },
        }
    }

    /// The shape's extent variable along x (box side length or diameter).
    pub fn x_extent(&self) -> &Variable {
        match &self.shape {
            MeshShape::Box { xlen, .. } => xlen,
            MeshShape::Cylinder { diameter, .. } => diameter,
        }
    }

    /// The shape's extent variable along y (box side length or diameter).
    pub fn y_extent(&self) -> &Variable {
        match &self.shape {
            MeshShape::Box { ylen, .. } => ylen,
            MeshShape::Cylinder { diameter, .. } => diameter,
        }
    }

    /// The shape's extent variable along z (box side length or cylinder height).
    pub fn z_extent(&self) -> &Variable {
        match &self.shape {
            MeshShape::Box { zlen, .. } => zlen,
            MeshShape::Cylinder { height, .. } => height,
        }
    }
}

impl VisitVariables for Mesh {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.volume.visit_variables(f);
        match &mut self.shape {
            MeshShape::Box { xlen, ylen, zlen } => {
                xlen.visit_variables(f);
                ylen.visit_variables(f);
                zlen.visit_variables(f);
            }
            MeshShape::Cylinder { diameter, height } => {
                diameter.visit_variables(f);
                height.visit_variables(f);
            }
        }
    }
}

/// Position of a component's centroid, in meters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Position {
    /// x coordinate.
    pub x: Variable,
    /// y coordinate.
    pub y: Variable,
    /// z coordinate.
    pub z: Variable,
}

impl Position {
    /// Creates the position variables for component `name` from a seed.
    pub fn new(name: &str, seed: AxisSeed) -> Self {
        Self {
            x: Variable::seeded(format!("xpos{name}"), "m", seed.x),
            y: Variable::seeded(format!("ypos{name}"), "m", seed.y),
            z: Variable::seeded(format!("zpos{name}"), "m", seed.z),
        }
    }
}

impl VisitVariables for Position {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.x.visit_variables(f);
        self.y.visit_variables(f);
        self.z.visit_variables(f);
    }
}

/// Orientation of a component as rotations about x, y, z, in degrees.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Rotation {
    /// Rotation about x.
    pub x: Variable,
    /// Rotation about y.
    pub y: Variable,
    /// Rotation about z.
    pub z: Variable,
}

impl Rotation {
    /// Creates the rotation variables for component `name` from a seed.
    pub fn new(name: &str, seed: AxisSeed) -> Self {
        Self {
            x: Variable::seeded(format!("xrot{name}"), "degrees", seed.x),
            y: Variable::seeded(format!("yrot{name}"), "degrees", seed.y),
            z: Variable::seeded(format!("zrot{name}"), "degrees", seed.z),
        }
    }
}

impl VisitVariables for Rotation {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.x.visit_variables(f);
        self.y.visit_variables(f);
        self.z.visit_variables(f);
    }
}

/// Face tags used by mates to pick a stacking direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    /// Upper z face.
    Top,
    /// Lower z face.
    Bottom,
    /// Flush side join, used by the arm corner relation.
    Smooth,
}

/// A component's mesh, placement, orientation, and the mates that involve it.
///
/// Mates are referenced by [`MateId`] into the owning assembly's mate table;
/// the geometry merely enumerates which apply to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    /// The parametric shape.
    pub mesh: Mesh,
    /// Centroid position.
    pub position: Position,
    /// Orientation in degrees.
    pub rotation: Rotation,
    /// Mates attached to this component, in attachment order.
    pub mates: Vec<MateId>,
}

impl Geometry {
    /// Assembles a geometry with no mates attached yet.
    pub fn new(mesh: Mesh, position: Position, rotation: Rotation) -> Self {
        Self {
            mesh,
            position,
            rotation,
            mates: Vec::new(),
        }
    }

    /// The union, in mate-list order, of every attached mate's constraints.
    pub fn constraints(&self, assembly: &Assembly) -> Vec<Constraint> {
        let mut out = Vec::new();
        for &mate_id in &self.mates {
            if let Some(mate) = assembly.mate(mate_id) {
                out.extend(mate.constraints(assembly));
            }
        }
        out
    }
}

impl VisitVariables for Geometry {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.mesh.visit_variables(f);
        self.position.visit_variables(f);
        self.rotation.visit_variables(f);
    }
}
