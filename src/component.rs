//! The component entities of the airframe and their physical constraint
//! contracts.
//!
//! Every entity owns a process-unique ID, a derived name (`kind + id`) that
//! scopes its variable names, physical variables, and (except for the
//! propeller) a [`Geometry`]. Defaults for the physical constants and
//! dimensions live in per-entity config structs and may be overridden per
//! instance.

use crate::assembly::Assembly;
use crate::geometry::{AxisSeed, Geometry, Mesh, Position, Rotation};
use crate::variable::{Constraint, Variable, VisitVariables};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};

/// A unique identifier for a component instance.
pub type ComponentId = u32;

static NEXT_COMPONENT_ID: AtomicU32 = AtomicU32::new(0);

/// Issues the next process-unique component ID.
///
/// IDs start at 1 and increase monotonically for the life of the process;
/// they are never reused. Issuance is atomic, so construction may happen from
/// several threads without duplicate IDs.
pub fn next_component_id() -> ComponentId {
    NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed) + 1
}

/// The component type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Mission payload box.
    Payload,
    /// Structural plate.
    Plate,
    /// Structural beam (an arm in the standard layout).
    Beam,
    /// Energy storage.
    Battery,
    /// Electronic speed controller.
    SpeedController,
    /// Brushless motor.
    Motor,
    /// Propeller.
    Propeller,
}

impl ComponentKind {
    /// The name prefix used to build instance and variable names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payload => "payload",
            Self::Plate => "plate",
            Self::Beam => "beam",
            Self::Battery => "battery",
            Self::SpeedController => "speedController",
            Self::Motor => "motor",
            Self::Propeller => "propeller",
        }
    }
}

fn instance_name(kind: ComponentKind, id: ComponentId) -> String {
    format!("{}{id}", kind.as_str())
}

/// A solid material, carrying its density variable.
///
/// The default material is a single shared symbol: every instance names the
/// same `densitycf` variable, so the solver sees one density constant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Material {
    /// Short material name scoping the density variable.
    pub name: String,
    /// Density in kg/m^3.
    pub density: Variable,
}

impl Material {
    /// A named material with a pre-bound density.
    pub fn new(name: &str, density: f64) -> Self {
        Self {
            name: name.into(),
            density: Variable::bound(format!("density{name}"), "kg/m^3", density),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("cf", 1.0)
    }
}

impl VisitVariables for Material {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.density.visit_variables(f);
    }
}

/// Defaults for a [`Payload`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PayloadConfig {
    /// Box dimensions in meters.
    pub dims: [f64; 3],
    /// Position seed.
    pub position: AxisSeed,
    /// Rotation seed, in degrees.
    pub rotation: AxisSeed,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            dims: [0.1, 0.05, 0.05],
            position: AxisSeed::FREE,
            rotation: AxisSeed::zeroed(),
        }
    }
}

/// Mission payload: a box with a mass to be carried.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payload {
    /// Process-unique ID.
    pub id: ComponentId,
    /// Derived instance name.
    pub name: String,
    /// Payload mass.
    pub mass: Variable,
    /// Shape and placement.
    pub geometry: Geometry,
}

impl Payload {
    /// Constructs a payload from `config`.
    pub fn new(config: PayloadConfig) -> Self {
        let id = next_component_id();
        let name = instance_name(ComponentKind::Payload, id);
        let [x, y, z] = config.dims;
        Self {
            mass: Variable::free(format!("mass{name}"), "kg"),
            geometry: Geometry::new(
                Mesh::boxed(&name, x, y, z),
                Position::new(&name, config.position),
                Rotation::new(&name, config.rotation),
            ),
            id,
            name,
        }
    }

    /// Mate constraints only; the payload carries no physical law here.
    pub fn constraints(&self, assembly: &Assembly) -> Vec<Constraint> {
        self.geometry.constraints(assembly)
    }
}

impl VisitVariables for Payload {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.mass.visit_variables(f);
        self.geometry.visit_variables(f);
    }
}

/// Defaults for a [`Plate`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PlateConfig {
    /// Box dimensions in meters.
    pub dims: [f64; 3],
    /// Position seed.
    pub position: AxisSeed,
    /// Rotation seed, in degrees.
    pub rotation: AxisSeed,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            dims: [0.12, 0.07, 0.005],
            position: AxisSeed::at(0.5, 0.5, 0.5),
            rotation: AxisSeed::zeroed(),
        }
    }
}

/// Structural plate; the center plate doubles as the reference plane for
/// accessory and motor mounts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plate {
    /// Process-unique ID.
    pub id: ComponentId,
    /// Derived instance name.
    pub name: String,
    /// Structural mass.
    pub mass: Variable,
    /// Solid material.
    pub material: Material,
    /// Shape and placement.
    pub geometry: Geometry,
}

impl Plate {
    /// Constructs a plate from `config`.
    pub fn new(config: PlateConfig) -> Self {
        let id = next_component_id();
        let name = instance_name(ComponentKind::Plate, id);
        let [x, y, z] = config.dims;
        Self {
            mass: Variable::free(format!("mass{name}"), "kg"),
            material: Material::default(),
            geometry: Geometry::new(
                Mesh::boxed(&name, x, y, z),
                Position::new(&name, config.position),
                Rotation::new(&name, config.rotation),
            ),
            id,
            name,
        }
    }

    /// Mate constraints only. A density-based mass law is a deliberate
    /// extension point, not part of this contract.
    pub fn constraints(&self, assembly: &Assembly) -> Vec<Constraint> {
        self.geometry.constraints(assembly)
    }
}

impl VisitVariables for Plate {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.mass.visit_variables(f);
        self.material.visit_variables(f);
        self.geometry.visit_variables(f);
    }
}

/// Defaults for a [`Beam`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BeamConfig {
    /// Box dimensions in meters; x is the beam's long axis.
    pub dims: [f64; 3],
    /// Position seed.
    pub position: AxisSeed,
    /// Rotation seed, in degrees.
    pub rotation: AxisSeed,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            dims: [0.1, 0.1, 0.1],
            position: AxisSeed::zeroed(),
            rotation: AxisSeed::zeroed(),
        }
    }
}

/// Structural beam; the arms of the standard layout.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Beam {
    /// Process-unique ID.
    pub id: ComponentId,
    /// Derived instance name.
    pub name: String,
    /// Structural mass.
    pub mass: Variable,
    /// Solid material.
    pub material: Material,
    /// Shape and placement.
    pub geometry: Geometry,
}

impl Beam {
    /// Constructs a beam from `config`.
    pub fn new(config: BeamConfig) -> Self {
        let id = next_component_id();
        let name = instance_name(ComponentKind::Beam, id);
        let [x, y, z] = config.dims;
        Self {
            mass: Variable::free(format!("mass{name}"), "kg"),
            material: Material::default(),
            geometry: Geometry::new(
                Mesh::boxed(&name, x, y, z),
                Position::new(&name, config.position),
                Rotation::new(&name, config.rotation),
            ),
            id,
            name,
        }
    }

    /// Mate constraints only.
    pub fn constraints(&self, assembly: &Assembly) -> Vec<Constraint> {
        self.geometry.constraints(assembly)
    }
}

impl VisitVariables for Beam {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.mass.visit_variables(f);
        self.material.visit_variables(f);
        self.geometry.visit_variables(f);
    }
}

/// Defaults for a [`Battery`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BatteryConfig {
    /// Specific energy in J/kg.
    pub specific_energy: f64,
    /// Rated power output in W.
    pub power_output: f64,
    /// Optional mass seed in kg; free when absent.
    pub mass: Option<f64>,
    /// Box dimensions in meters.
    pub dims: [f64; 3],
    /// Position seed.
    pub position: AxisSeed,
    /// Rotation seed, in degrees.
    pub rotation: AxisSeed,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            specific_energy: 0.95e6,
            power_output: 10_000.0,
            mass: None,
            dims: [0.04, 0.06, 0.03],
            position: AxisSeed::FREE,
            rotation: AxisSeed::zeroed(),
        }
    }
}

/// Energy storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Battery {
    /// Process-unique ID.
    pub id: ComponentId,
    /// Derived instance name.
    pub name: String,
    /// Stored energy.
    pub energy: Variable,
    /// Specific energy of the cell chemistry.
    pub specific_energy: Variable,
    /// Rated power output.
    pub power_output: Variable,
    /// Pack mass.
    pub mass: Variable,
    /// Shape and placement.
    pub geometry: Geometry,
    /// Solid material.
    pub material: Material,
}

impl Battery {
    /// Constructs a battery from `config`.
    pub fn new(config: BatteryConfig) -> Self {
        let id = next_component_id();
        let name = instance_name(ComponentKind::Battery, id);
        let [x, y, z] = config.dims;
        Self {
            energy: Variable::free(format!("energy{name}"), "J"),
            specific_energy: Variable::bound(
                format!("specificEnergy{name}"),
                "J/kg",
                config.specific_energy,
            ),
            power_output: Variable::bound(format!("powerOutput{name}"), "W", config.power_output),
            mass: Variable::seeded(format!("mass{name}"), "kg", config.mass),
            geometry: Geometry::new(
                Mesh::boxed(&name, x, y, z),
                Position::new(&name, config.position),
                Rotation::new(&name, config.rotation),
            ),
            material: Material::default(),
            id,
            name,
        }
    }

    /// Mate constraints, then the energy capacity law.
    pub fn constraints(&self, assembly: &Assembly) -> Vec<Constraint> {
        let mut out = self.geometry.constraints(assembly);
        out.push(self.energy.le(&self.mass * &self.specific_energy));
        out
    }
}

impl VisitVariables for Battery {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.energy.visit_variables(f);
        self.specific_energy.visit_variables(f);
        self.power_output.visit_variables(f);
        self.mass.visit_variables(f);
        self.geometry.visit_variables(f);
        self.material.visit_variables(f);
    }
}

/// Defaults for a [`SpeedController`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SpeedControllerConfig {
    /// Conversion efficiency, dimensionless.
    pub efficiency: f64,
    /// Specific power in W/kg.
    pub specific_power: f64,
    /// Box dimensions in meters.
    pub dims: [f64; 3],
    /// Position seed.
    pub position: AxisSeed,
    /// Rotation seed, in degrees.
    pub rotation: AxisSeed,
}

impl Default for SpeedControllerConfig {
    fn default() -> Self {
        Self {
            efficiency: 0.9,
            specific_power: 1000.0,
            dims: [0.04, 0.06, 0.01],
            position: AxisSeed::FREE,
            rotation: AxisSeed::zeroed(),
        }
    }
}

/// Electronic speed controller.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpeedController {
    /// Process-unique ID.
    pub id: ComponentId,
    /// Derived instance name.
    pub name: String,
    /// Electrical power drawn.
    pub power_input: Variable,
    /// Electrical power delivered.
    pub power_output: Variable,
    /// Conversion efficiency.
    pub efficiency: Variable,
    /// Specific power of the controller class.
    pub specific_power: Variable,
    /// Controller mass.
    pub mass: Variable,
    /// Shape and placement.
    pub geometry: Geometry,
    /// Solid material.
    pub material: Material,
}

impl SpeedController {
    /// Constructs a speed controller from `config`.
    pub fn new(config: SpeedControllerConfig) -> Self {
        let id = next_component_id();
        let name = instance_name(ComponentKind::SpeedController, id);
        let [x, y, z] = config.dims;
        Self {
            power_input: Variable::free(format!("powerInput{name}"), "W"),
            power_output: Variable::free(format!("powerOutput{name}"), "W"),
            efficiency: Variable::bound(format!("efficiency{name}"), "-", config.efficiency),
            specific_power: Variable::bound(
                format!("specificPower{name}"),
                "W/kg",
                config.specific_power,
            ),
            mass: Variable::free(format!("mass{name}"), "kg"),
            geometry: Geometry::new(
                Mesh::boxed(&name, x, y, z),
                Position::new(&name, config.position),
                Rotation::new(&name, config.rotation),
            ),
            material: Material::default(),
            id,
            name,
        }
    }

    /// Mate constraints, then the sizing law `mass >= powerInput / specificPower`.
    pub fn constraints(&self, assembly: &Assembly) -> Vec<Constraint> {
        let mut out = self.geometry.constraints(assembly);
        out.push(self.mass.ge(&self.power_input / &self.specific_power));
        out
    }
}

impl VisitVariables for SpeedController {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.power_input.visit_variables(f);
        self.power_output.visit_variables(f);
        self.efficiency.visit_variables(f);
        self.specific_power.visit_variables(f);
        self.mass.visit_variables(f);
        self.geometry.visit_variables(f);
        self.material.visit_variables(f);
    }
}

/// Defaults for a [`Motor`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MotorConfig {
    /// Conversion efficiency, dimensionless.
    pub efficiency: f64,
    /// Specific power in W/kg.
    pub specific_power: f64,
    /// Can diameter in meters.
    pub diameter: f64,
    /// Can height in meters.
    pub height: f64,
    /// Position seed.
    pub position: AxisSeed,
    /// Rotation seed, in degrees.
    pub rotation: AxisSeed,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            efficiency: 0.9,
            specific_power: 500.0,
            diameter: 0.04,
            height: 0.06,
            position: AxisSeed::FREE,
            rotation: AxisSeed::zeroed(),
        }
    }
}

/// Brushless motor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Motor {
    /// Process-unique ID.
    pub id: ComponentId,
    /// Derived instance name.
    pub name: String,
    /// Electrical power drawn.
    pub power_input: Variable,
    /// Shaft power delivered.
    pub power_output: Variable,
    /// Conversion efficiency.
    pub efficiency: Variable,
    /// Specific power of the motor class.
    pub specific_power: Variable,
    /// Motor mass.
    pub mass: Variable,
    /// Shape and placement.
    pub geometry: Geometry,
    /// Solid material.
    pub material: Material,
}

impl Motor {
    /// Constructs a motor from `config`.
    pub fn new(config: MotorConfig) -> Self {
        let id = next_component_id();
        let name = instance_name(ComponentKind::Motor, id);
        Self {
            power_input: Variable::free(format!("powerInput{name}"), "W"),
            power_output: Variable::free(format!("powerOutput{name}"), "W"),
            efficiency: Variable::bound(format!("efficiency{name}"), "-", config.efficiency),
            specific_power: Variable::bound(
                format!("specificPower{name}"),
                "W/kg",
                config.specific_power,
            ),
            mass: Variable::free(format!("mass{name}"), "kg"),
            geometry: Geometry::new(
                Mesh::cylinder(&name, config.diameter, config.height),
                Position::new(&name, config.position),
                Rotation::new(&name, config.rotation),
            ),
            material: Material::default(),
            id,
            name,
        }
    }

    /// Mate constraints, then the conversion and sizing laws, in that order.
    pub fn constraints(&self, assembly: &Assembly) -> Vec<Constraint> {
        let mut out = self.geometry.constraints(assembly);
        out.push(self.power_output.le(&self.power_input * &self.efficiency));
        out.push(self.mass.ge(&self.power_input / &self.specific_power));
        out
    }
}

impl VisitVariables for Motor {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.power_input.visit_variables(f);
        self.power_output.visit_variables(f);
        self.efficiency.visit_variables(f);
        self.specific_power.visit_variables(f);
        self.mass.visit_variables(f);
        self.geometry.visit_variables(f);
        self.material.visit_variables(f);
    }
}

/// Defaults for a [`Propeller`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PropellerConfig {
    /// Thrust produced per watt of input power, in N/W.
    pub thrust_to_power: f64,
}

impl Default for PropellerConfig {
    fn default() -> Self {
        Self {
            thrust_to_power: 100.0,
        }
    }
}

/// Propeller. Carries no geometry: it participates only through its thrust
/// law, and the rendering layer draws rotors procedurally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Propeller {
    /// Process-unique ID.
    pub id: ComponentId,
    /// Derived instance name.
    pub name: String,
    /// Shaft power drawn.
    pub power_input: Variable,
    /// Thrust per watt for this blade.
    pub thrust_to_power: Variable,
    /// Thrust produced.
    pub thrust: Variable,
}

impl Propeller {
    /// Constructs a propeller from `config`.
    pub fn new(config: PropellerConfig) -> Self {
        let id = next_component_id();
        let name = instance_name(ComponentKind::Propeller, id);
        Self {
            power_input: Variable::free(format!("powerInput{name}"), "W"),
            thrust_to_power: Variable::bound(
                format!("thrustToPower{name}"),
                "N/W",
                config.thrust_to_power,
            ),
            thrust: Variable::free(format!("thrust{name}"), "N"),
            id,
            name,
        }
    }

    /// The thrust law only; propellers have no mate constraints.
    pub fn constraints(&self, _assembly: &Assembly) -> Vec<Constraint> {
        vec![self.thrust.le(&self.thrust_to_power * &self.power_input)]
    }
}

impl VisitVariables for Propeller {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        self.power_input.visit_variables(f);
        self.thrust_to_power.visit_variables(f);
        self.thrust.visit_variables(f);
    }
}

/// Any component entity, for storage in an assembly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Component {
    /// See [`Payload`].
    Payload(Payload),
    /// See [`Plate`].
    Plate(Plate),
    /// See [`Beam`].
    Beam(Beam),
    /// See [`Battery`].
    Battery(Battery),
    /// See [`SpeedController`].
    SpeedController(SpeedController),
    /// See [`Motor`].
    Motor(Motor),
    /// See [`Propeller`].
    Propeller(Propeller),
}

impl Component {
    /// The component's process-unique ID.
    pub fn id(&self) -> ComponentId {
        match self {
            Self::Payload(c) => c.id,
            Self::Plate(c) => c.id,
            Self::Beam(c) => c.id,
            Self::Battery(c) => c.id,
            Self::SpeedController(c) => c.id,
            Self::Motor(c) => c.id,
            Self::Propeller(c) => c.id,
        }
    }

    /// The component's type tag.
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Payload(_) => ComponentKind::Payload,
            Self::Plate(_) => ComponentKind::Plate,
            Self::Beam(_) => ComponentKind::Beam,
            Self::Battery(_) => ComponentKind::Battery,
            Self::SpeedController(_) => ComponentKind::SpeedController,
            Self::Motor(_) => ComponentKind::Motor,
            Self::Propeller(_) => ComponentKind::Propeller,
        }
    }

    /// The derived instance name (`kind + id`).
    pub fn name(&self) -> &str {
        match self {
            Self::Payload(c) => &c.name,
            Self::Plate(c) => &c.name,
            Self::Beam(c) => &c.name,
            Self::Battery(c) => &c.name,
            Self::SpeedController(c) => &c.name,
            Self::Motor(c) => &c.name,
            Self::Propeller(c) => &c.name,
        }
    }

    /// The component's geometry; `None` for propellers.
    pub fn geometry(&self) -> Option<&Geometry> {
        match self {
            Self::Payload(c) => Some(&c.geometry),
            Self::Plate(c) => Some(&c.geometry),
            Self::Beam(c) => Some(&c.geometry),
            Self::Battery(c) => Some(&c.geometry),
            Self::SpeedController(c) => Some(&c.geometry),
            Self::Motor(c) => Some(&c.geometry),
            Self::Propeller(_) => None,
        }
    }

    /// Mutable access to the component's geometry; `None` for propellers.
    pub fn geometry_mut(&mut self) -> Option<&mut Geometry> {
        match self {
            Self::Payload(c) => Some(&mut c.geometry),
            Self::Plate(c) => Some(&mut c.geometry),
            Self::Beam(c) => Some(&mut c.geometry),
            Self::Battery(c) => Some(&mut c.geometry),
            Self::SpeedController(c) => Some(&mut c.geometry),
            Self::Motor(c) => Some(&mut c.geometry),
            Self::Propeller(_) => None,
        }
    }

    /// The component's material; `None` for payloads and propellers.
    pub fn material(&self) -> Option<&Material> {
        match self {
            Self::Payload(_) | Self::Propeller(_) => None,
            Self::Plate(c) => Some(&c.material),
            Self::Beam(c) => Some(&c.material),
            Self::Battery(c) => Some(&c.material),
            Self::SpeedController(c) => Some(&c.material),
            Self::Motor(c) => Some(&c.material),
        }
    }

    /// The component's full constraint contract: its geometry's aggregated
    /// mate constraints first, then its own physical laws.
    pub fn constraints(&self, assembly: &Assembly) -> Vec<Constraint> {
        match self {
            Self::Payload(c) => c.constraints(assembly),
            Self::Plate(c) => c.constraints(assembly),
            Self::Beam(c) => c.constraints(assembly),
            Self::Battery(c) => c.constraints(assembly),
            Self::SpeedController(c) => c.constraints(assembly),
            Self::Motor(c) => c.constraints(assembly),
            Self::Propeller(c) => c.constraints(assembly),
        }
    }
}

impl VisitVariables for Component {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        match self {
            Self::Payload(c) => c.visit_variables(f),
            Self::Plate(c) => c.visit_variables(f),
            Self::Beam(c) => c.visit_variables(f),
            Self::Battery(c) => c.visit_variables(f),
            Self::SpeedController(c) => c.visit_variables(f),
            Self::Motor(c) => c.visit_variables(f),
            Self::Propeller(c) => c.visit_variables(f),
        }
    }
}

impl From<Payload> for Component {
    fn from(c: Payload) -> Self {
        Self::Payload(c)
    }
}

impl From<Plate> for Component {
    fn from(c: Plate) -> Self {
        Self::Plate(c)
    }
}

impl From<Beam> for Component {
    fn from(c: Beam) -> Self {
        Self::Beam(c)
    }
}

impl From<Battery> for Component {
    fn from(c: Battery) -> Self {
        Self::Battery(c)
    }
}

impl From<SpeedController> for Component {
    fn from(c: SpeedController) -> Self {
        Self::SpeedController(c)
    }
}

impl From<Motor> for Component {
    fn from(c: Motor) -> Self {
        Self::Motor(c)
    }
}

impl From<Propeller> for Component {
    fn from(c: Propeller) -> Self {
        Self::Propeller(c)
    }
}
