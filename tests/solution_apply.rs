// tests/solution_apply.rs
use rotorframe::{
    Assembly, Battery, BatteryConfig, Component, Face, Mate, Plate, PlateConfig, Solution,
    SolvedValue, Variable,
};

fn battery_of(assembly: &Assembly, id: u32) -> &rotorframe::Battery {
    let Some(Component::Battery(b)) = assembly.component(id) else {
        panic!("component {id} is not a battery");
    };
    b
}

#[test]
fn solution_values_overwrite_variables() {
    let mut assembly = Assembly::new();
    let plate = assembly.add_component(Plate::new(PlateConfig::default()));
    let battery = assembly.add_component(Battery::new(BatteryConfig::default()));
    assembly
        .add_mate(Mate::centroid(battery, plate, [Face::Bottom, Face::Top]))
        .unwrap();

    let b = battery_of(&assembly, battery);
    assert_eq!(b.energy.value(), None);
    let energy_name = b.energy.name().to_string();
    let zpos_name = b.geometry.position.z.name().to_string();

    let mut solution = Solution::new();
    solution.insert(energy_name, 1.9e5);
    solution.insert(zpos_name, 0.52);
    assembly.apply_solution(&solution);

    let b = battery_of(&assembly, battery);
    assert_eq!(b.energy.value(), Some(1.9e5));
    assert_eq!(b.geometry.position.z.value(), Some(0.52));
}

#[test]
fn not_considered_variables_are_left_untouched() {
    let mut assembly = Assembly::new();
    let battery = assembly.add_component(Battery::new(BatteryConfig {
        mass: Some(0.2),
        ..BatteryConfig::default()
    }));

    let b = battery_of(&assembly, battery);
    let energy_name = b.energy.name().to_string();
    assert_eq!(b.mass.value(), Some(0.2));

    // The solution considers energy only: mass must keep its seed and the
    // free position axes must stay unbound.
    let mut solution = Solution::new();
    solution.insert(energy_name, 42.0);
    assembly.apply_solution(&solution);

    let b = battery_of(&assembly, battery);
    assert_eq!(b.energy.value(), Some(42.0));
    assert_eq!(b.mass.value(), Some(0.2), "unconsidered seed must survive");
    assert_eq!(b.geometry.position.x.value(), None, "free axis stays free");

    let free = Variable::free("off-graph", "m");
    assert_eq!(solution.value(&free), SolvedValue::NotConsidered);
}

#[test]
fn applying_the_same_solution_twice_is_idempotent() {
    let mut assembly = Assembly::new();
    let battery = assembly.add_component(Battery::new(BatteryConfig::default()));
    let b = battery_of(&assembly, battery);

    let mut solution = Solution::new();
    solution.insert(b.energy.name().to_string(), 7.5e4);
    solution.insert(b.mass.name().to_string(), 0.31);

    assembly.apply_solution(&solution);
    let b = battery_of(&assembly, battery);
    let first = (b.energy.value(), b.mass.value());

    assembly.apply_solution(&solution);
    let b = battery_of(&assembly, battery);
    assert_eq!((b.energy.value(), b.mass.value()), first);
    assert_eq!(first, (Some(7.5e4), Some(0.31)));
}

#[test]
fn solution_round_trips_through_the_solver_json_boundary() {
    let mut assembly = Assembly::new();
    let battery = assembly.add_component(Battery::new(BatteryConfig::default()));
    let b = battery_of(&assembly, battery);
    let energy_name = b.energy.name().to_string();

    // The solver replies with a flat name-to-value object.
    let body = format!("{{\"{energy_name}\": 123.5}}");
    let solution: Solution = serde_json::from_str(&body).unwrap();
    assert_eq!(solution.len(), 1);

    assembly.apply_solution(&solution);
    assert_eq!(battery_of(&assembly, battery).energy.value(), Some(123.5));

    let echoed = serde_json::to_string(&solution).unwrap();
    let again: Solution = serde_json::from_str(&echoed).unwrap();
    assert_eq!(again.len(), 1);
}
