//! Mates: declared assembly relationships between two components, translated
//! into tolerance-banded constraint pairs.
//!
//! Every relation family expresses its target as a soft equality: a `>=` bound
//! at `(1 - tol) * target` followed by a `<=` bound at `(1 + tol) * target`.
//! The band keeps assembly relations feasible for solvers that degrade on
//! exact equality constraints.

use crate::assembly::Assembly;
use crate::component::{Component, ComponentId};
use crate::error::{ModelError, ModelResult};
use crate::geometry::Face;
use crate::variable::{Constraint, Expr, Variable};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Index of a mate in its assembly's mate table.
pub type MateId = u16;

/// Fraction of the plate extent, measured from the plate center, at which an
/// arm root is anchored.
const ARM_ROOT_INSET: f64 = 0.4;

/// Half the arm's long extent projected onto one axis at the 45 degree arm
/// angle.
const ARM_DIAG_REACH: f64 = 0.3535;

/// Relative tolerance of the soft-equality band. Defaults to 0.1%, giving
/// bounds at 0.999x and 1.001x the target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tolerance(pub f64);

impl Default for Tolerance {
    fn default() -> Self {
        Self(0.001)
    }
}

impl Tolerance {
    /// Multiplier for the lower bound.
    pub fn lower(self) -> f64 {
        1.0 - self.0
    }

    /// Multiplier for the upper bound.
    pub fn upper(self) -> f64 {
        1.0 + self.0
    }
}

/// One of the four symmetric arm-to-plate corner joins of a four-rotor layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCorner(u8);

impl JoinCorner {
    /// Validates an index into the four corner variants.
    pub fn new(index: u8) -> ModelResult<Self> {
        if index <= 3 {
            Ok(Self(index))
        } else {
            Err(ModelError::InvalidJoinCorner(index))
        }
    }

    /// The corner index, 0 through 3.
    pub fn index(self) -> u8 {
        self.0
    }
}

/// Point/relation tags accepted by the tag-based [`Mate::from_tags`] surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointTag {
    /// Centroid alignment.
    Centroid,
    /// Centroid alignment with rotation lock against a reference plate.
    CentroidRef,
    /// Motor mount placement against a reference plate.
    MotorMount,
    /// Arm corner join; must be followed by a [`PointTag::Corner`] index.
    LowerMidInc,
    /// Corner selector for [`PointTag::LowerMidInc`].
    Corner(u8),
}

/// The relation family a mate encodes, resolved at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MateRelation {
    /// Align both centroids in x and y; faces may add a z stacking offset.
    Centroid,
    /// Rigid accessory mount: align z-rotation, x, and y to comp2, and offset
    /// z from the reference component's plane.
    CentroidRef {
        /// The designated reference component (the center plate).
        reference: ComponentId,
    },
    /// Motor placement: align x and y to comp2 (rotation intentionally
    /// excluded), and offset z from the reference component's plane by
    /// comp2's half thickness plus comp1's half height.
    MotorMount {
        /// The designated reference component (the center plate).
        reference: ComponentId,
    },
    /// Diagonal arm-to-plate corner join; also locks both z positions
    /// together.
    SmoothJoin {
        /// Which of the four corners to join at.
        corner: JoinCorner,
    },
    /// A tag combination with no modeled relation; contributes no
    /// constraints. Expected during incremental model development.
    Unmodeled,
}

impl MateRelation {
    /// The reference component, for the relation families that use one.
    pub fn reference(&self) -> Option<ComponentId> {
        match self {
            Self::CentroidRef { reference } | Self::MotorMount { reference } => Some(*reference),
            _ => None,
        }
    }
}

/// A declared geometric relationship between two components.
///
/// Mates reference their components by ID and are owned by the assembly, not
/// by either component; a component's [`Geometry`](crate::geometry::Geometry)
/// lists the mates that apply to it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mate {
    /// First component (the one being placed, for asymmetric relations).
    pub comp1: ComponentId,
    /// Second component (the anchor, for asymmetric relations).
    pub comp2: ComponentId,
    /// Face tags, ordered as `[comp1 face, comp2 face]`.
    pub faces: [Face; 2],
    /// The relation family this mate encodes.
    pub relation: MateRelation,
    /// Relative tolerance of every band this mate emits.
    pub tolerance: Tolerance,
}

impl Mate {
    /// A centroid mate. Faces `[Bottom, Top]` stack comp1 on top of comp2;
    /// `[Top, Bottom]` stack comp2 on top of comp1; any other pair aligns
    /// x and y only.
    pub fn centroid(comp1: ComponentId, comp2: ComponentId, faces: [Face; 2]) -> Self {
        Self {
            comp1,
            comp2,
            faces,
            relation: MateRelation::Centroid,
            tolerance: Tolerance::default(),
        }
    }

    /// A rigid accessory mount of comp1 onto comp2, flush against the plane
    /// of `reference`.
    pub fn centroid_ref(
        comp1: ComponentId,
        comp2: ComponentId,
        reference: ComponentId,
    ) -> Self {
        Self {
            comp1,
            comp2,
            faces: [Face::Bottom, Face::Top],
            relation: MateRelation::CentroidRef { reference },
            tolerance: Tolerance::default(),
        }
    }

    /// A motor mount of comp1 onto comp2, offset from the plane of
    /// `reference`.
    pub fn motor_mount(
        comp1: ComponentId,
        comp2: ComponentId,
        reference: ComponentId,
    ) -> Self {
        Self {
            comp1,
            comp2,
            faces: [Face::Bottom, Face::Top],
            relation: MateRelation::MotorMount { reference },
            tolerance: Tolerance::default(),
        }
    }

    /// A diagonal corner join of comp1 (the arm) onto comp2 (the plate).
    pub fn smooth_join(comp1: ComponentId, comp2: ComponentId, corner: JoinCorner) -> Self {
        Self {
            comp1,
            comp2,
            faces: [Face::Smooth, Face::Smooth],
            relation: MateRelation::SmoothJoin { corner },
            tolerance: Tolerance::default(),
        }
    }

    /// The tag-based construction surface.
    ///
    /// Resolves the face/point tag combination to a relation family at
    /// construction time. Relations that need a reference component read it
    /// from `reference`; combinations that resolve to nothing modeled (or
    /// that need a reference none was given for) become
    /// [`MateRelation::Unmodeled`], never an error.
    pub fn from_tags(
        comp1: ComponentId,
        comp2: ComponentId,
        faces: [Face; 2],
        points: &[PointTag],
        reference: Option<ComponentId>,
    ) -> Self {
        let relation = match (faces, points) {
            ([Face::Smooth, Face::Smooth], [PointTag::LowerMidInc, PointTag::Corner(i)]) => {
                match JoinCorner::new(*i) {
                    Ok(corner) => MateRelation::SmoothJoin { corner },
                    Err(_) => MateRelation::Unmodeled,
                }
            }
            (_, [PointTag::Centroid, ..]) => MateRelation::Centroid,
            (_, [PointTag::CentroidRef, ..]) => match reference {
                Some(reference) => MateRelation::CentroidRef { reference },
                None => MateRelation::Unmodeled,
            },
            (_, [PointTag::MotorMount, ..]) => match reference {
                Some(reference) => MateRelation::MotorMount { reference },
                None => MateRelation::Unmodeled,
            },
            _ => MateRelation::Unmodeled,
        };
        Self {
            comp1,
            comp2,
            faces,
            relation,
            tolerance: Tolerance::default(),
        }
    }

    /// Replaces the tolerance band width.
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Generates the constraint set enforcing this mate's relation.
    ///
    /// Constraints come out in a stable order per relation family: each soft
    /// equality is a `>=` lower bound immediately followed by its `<=` upper
    /// bound. A mate whose components cannot be resolved in `assembly`
    /// contributes nothing.
    pub fn constraints(&self, assembly: &Assembly) -> Vec<Constraint> {
        let mut out = Vec::new();
        let (Some(c1), Some(c2)) = (
            assembly.component(self.comp1),
            assembly.component(self.comp2),
        ) else {
            return out;
        };
        let (Some(g1), Some(g2)) = (c1.geometry(), c2.geometry()) else {
            return out;
        };
        let tol = self.tolerance;

        match self.relation {
            MateRelation::Centroid => {
                band(&mut out, &g1.position.x, g2.position.x.expr(), tol);
                band(&mut out, &g1.position.y, g2.position.y.expr(), tol);
                match self.faces {
                    [Face::Bottom, Face::Top] => {
                        let target = &g2.position.z
                            + 0.5 * g1.mesh.z_extent()
                            + 0.5 * g2.mesh.z_extent();
                        band(&mut out, &g1.position.z, target, tol);
                    }
                    [Face::Top, Face::Bottom] => {
                        let target = &g1.position.z
                            + 0.5 * g1.mesh.z_extent()
                            + 0.5 * g2.mesh.z_extent();
                        band(&mut out, &g2.position.z, target, tol);
                    }
                    _ => {}
                }
            }
            MateRelation::CentroidRef { reference } => {
                let Some(rg) = assembly.component(reference).and_then(Component::geometry)
                else {
                    return out;
                };
                band(&mut out, &g1.rotation.z, g2.rotation.z.expr(), tol);
                band(&mut out, &g1.position.x, g2.position.x.expr(), tol);
                band(&mut out, &g1.position.y, g2.position.y.expr(), tol);
                let target =
                    &rg.position.z + 0.5 * g2.mesh.z_extent() + 0.5 * g1.mesh.z_extent();
                band(&mut out, &g1.position.z, target, tol);
            }
            MateRelation::MotorMount { reference } => {
                let Some(rg) = assembly.component(reference).and_then(Component::geometry)
                else {
                    return out;
                };
                band(&mut out, &g1.position.x, g2.position.x.expr(), tol);
                band(&mut out, &g1.position.y, g2.position.y.expr(), tol);
                let target =
                    &rg.position.z + 0.5 * g2.mesh.z_extent() + 0.5 * g1.mesh.z_extent();
                band(&mut out, &g1.position.z, target, tol);
            }
            MateRelation::SmoothJoin { corner } => {
                // Offsets are anchored on the plate extent and the arm's long
                // (x) extent for both axes.
                let x_off = ARM_ROOT_INSET * g2.mesh.x_extent()
                    + ARM_DIAG_REACH * g1.mesh.x_extent();
                let y_off = ARM_ROOT_INSET * g2.mesh.y_extent()
                    + ARM_DIAG_REACH * g1.mesh.x_extent();
                match corner.index() {
                    0 => {
                        band(&mut out, &g1.position.x, &g2.position.x + x_off, tol);
                        band(&mut out, &g1.position.y, &g2.position.y + y_off, tol);
                    }
                    1 => {
                        band(&mut out, &g1.position.x, &g2.position.x + x_off, tol);
                        band(&mut out, &g2.position.y, &g1.position.y + y_off, tol);
                    }
                    2 => {
                        band(&mut out, &g2.position.x, &g1.position.x + x_off, tol);
                        band(&mut out, &g2.position.y, &g1.position.y + y_off, tol);
                    }
                    3 => {
                        band(&mut out, &g2.position.x, &g1.position.x + x_off, tol);
                        band(&mut out, &g1.position.y, &g2.position.y + y_off, tol);
                    }
                    _ => unreachable!("JoinCorner::new bounds the index"),
                }
                // Arms sit in the plate plane at every corner.
                band(&mut out, &g2.position.z, g1.position.z.expr(), tol);
            }
            MateRelation::Unmodeled => {
                trace!(comp1 = self.comp1, comp2 = self.comp2, "mate relation not modeled");
            }
        }

        out
    }
}

/// Pushes the soft-equality pair `lhs >= lower * target`, `lhs <= upper * target`.
fn band(out: &mut Vec<Constraint>, lhs: &Variable, target: Expr, tol: Tolerance) {
    out.push(lhs.ge(tol.lower() * target.clone()));
    out.push(lhs.le(tol.upper() * target));
}
