//! The assembly: owner of the component graph and its mate table.
//!
//! Construction is declarative: add components, then declare mates between
//! them. Flattening walks every component's constraint contract into one
//! ordered list for the external solver. Applying the solver's
//! [`Solution`] is the only mutation the graph ever sees.

use crate::component::{
    Battery, BatteryConfig, Beam, BeamConfig, Component, ComponentId, ComponentKind, Motor,
    MotorConfig, Payload, PayloadConfig, Plate, PlateConfig, Propeller, PropellerConfig,
    SpeedController, SpeedControllerConfig,
};
use crate::error::{ModelError, ModelResult};
use crate::geometry::{AxisSeed, Face};
use crate::mate::{JoinCorner, Mate, MateId};
use crate::solution::{SolvedValue, Solution};
use crate::variable::{Constraint, Variable, VisitVariables};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Rotation about z for each arm of the standard four-rotor layout, degrees.
const ARM_ANGLES_DEG: [f64; 4] = [135.0, -135.0, -45.0, 45.0];

/// Arm dimensions of the standard layout: long axis, width, thickness.
const ARM_DIMS: [f64; 3] = [0.15, 0.02, 0.003];

/// A multirotor assembly: an ordered component list plus the mates relating
/// them.
///
/// Components are stored in insertion order, which is the order the rendering
/// layer receives them in, and referenced by their process-unique IDs. Mates live
/// in a flat table; each mate's [`MateId`] is recorded on its first
/// component's geometry, so a mate contributes its constraints exactly once
/// to the flattened system.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Assembly {
    components: Vec<Component>,
    mates: Vec<Mate>,
}

impl Assembly {
    /// An empty assembly.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a component and returns its ID.
    pub fn add_component(&mut self, component: impl Into<Component>) -> ComponentId {
        let component = component.into();
        let id = component.id();
        self.components.push(component);
        id
    }

    /// Declares a mate between two already-added components.
    ///
    /// Component IDs (including the reference component of relations that
    /// carry one) are validated here, at construction time, and the mate is
    /// attached to comp1's geometry. Propellers have no geometry and cannot
    /// be mated.
    pub fn add_mate(&mut self, mate: Mate) -> ModelResult<MateId> {
        for id in [mate.comp1, mate.comp2] {
            if self.component(id).is_none() {
                return Err(ModelError::UnknownComponent(id));
            }
        }
        if let Some(reference) = mate.relation.reference() {
            if self.component(reference).is_none() {
                return Err(ModelError::UnknownComponent(reference));
            }
        }
        if self
            .component(mate.comp1)
            .and_then(Component::geometry)
            .is_none()
        {
            return Err(ModelError::MissingGeometry(mate.comp1));
        }

        let mate_id = self.mates.len() as MateId;
        let comp1 = mate.comp1;
        self.mates.push(mate);
        if let Some(geometry) = self
            .component_mut(comp1)
            .and_then(|c| c.geometry_mut())
        {
            geometry.mates.push(mate_id);
        }
        Ok(mate_id)
    }

    /// Looks up a component by ID.
    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id() == id)
    }

    /// Looks up a component by ID, mutably.
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id() == id)
    }

    /// The components, in insertion order.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Looks up a mate by ID.
    pub fn mate(&self, id: MateId) -> Option<&Mate> {
        self.mates.get(id as usize)
    }

    /// The mate table, in declaration order.
    pub fn mates(&self) -> &[Mate] {
        &self.mates
    }

    /// The number of propellers, which is the rotor count the rendering
    /// layer lays a standard frame out for.
    pub fn rotor_count(&self) -> usize {
        self.components
            .iter()
            .filter(|c| c.kind() == ComponentKind::Propeller)
            .count()
    }

    /// Flattens the whole graph into one ordered constraint list.
    ///
    /// Components contribute in insertion order; within a component, its
    /// geometry's mate constraints come first, then its physical laws.
    /// Flattening is a pure traversal: no variable is read for its value and
    /// nothing is mutated.
    pub fn constraints(&self) -> Vec<Constraint> {
        let mut out = Vec::new();
        for component in &self.components {
            out.extend(component.constraints(self));
        }
        debug!(
            components = self.components.len(),
            constraints = out.len(),
            "flattened constraint system"
        );
        out
    }

    /// Writes a solver solution back onto every variable in the graph.
    ///
    /// Variables the solution reports as not considered keep their previous
    /// value (bound or unbound). Applying the same solution twice is
    /// idempotent. Mates are skipped by construction: they reference
    /// components by ID and own no variables.
    pub fn apply_solution(&mut self, solution: &Solution) {
        let mut updated = 0usize;
        let mut skipped = 0usize;
        for component in &mut self.components {
            component.visit_variables(&mut |variable| match solution.value(variable) {
                SolvedValue::Value(v) => {
                    variable.set_value(v);
                    updated += 1;
                }
                SolvedValue::NotConsidered => skipped += 1,
            });
        }
        debug!(updated, skipped, "applied solver solution");
    }

    /// Builds the standard quad layout the rendering layer draws.
    ///
    /// One center plate with a payload slung beneath it and a battery stacked
    /// on top, then per rotor (up to four): an arm smooth-joined at its
    /// corner of the plate, a speed controller mounted flush on the arm, a
    /// motor mounted at the arm tip, and a propeller.
    pub fn standard_quad(rotors: usize) -> ModelResult<Self> {
        if rotors == 0 || rotors > 4 {
            return Err(ModelError::InvalidRotorCount(rotors));
        }

        let mut assembly = Self::new();
        let plate = assembly.add_component(Plate::new(PlateConfig::default()));
        let payload = assembly.add_component(Payload::new(PayloadConfig::default()));
        assembly.add_mate(Mate::centroid(payload, plate, [Face::Top, Face::Bottom]))?;
        let battery = assembly.add_component(Battery::new(BatteryConfig::default()));
        assembly.add_mate(Mate::centroid(battery, plate, [Face::Bottom, Face::Top]))?;

        for corner in 0..rotors as u8 {
            let arm = assembly.add_component(Beam::new(BeamConfig {
                dims: ARM_DIMS,
                rotation: AxisSeed::at(0.0, 0.0, ARM_ANGLES_DEG[corner as usize]),
                ..BeamConfig::default()
            }));
            assembly.add_mate(Mate::smooth_join(arm, plate, JoinCorner::new(corner)?))?;

            let esc = assembly.add_component(SpeedController::new(SpeedControllerConfig::default()));
            assembly.add_mate(Mate::centroid_ref(esc, arm, plate))?;

            let motor = assembly.add_component(Motor::new(MotorConfig::default()));
            assembly.add_mate(Mate::motor_mount(motor, arm, plate))?;

            assembly.add_component(Propeller::new(PropellerConfig::default()));
        }

        Ok(assembly)
    }

    /// Calls `f` once for every variable in the graph, in component order.
    pub fn for_each_variable(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.visit_variables(f);
    }
}

impl VisitVariables for Assembly {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        for component in &mut self.components {
            component.visit_variables(f);
        }
    }
}
