// tests/quad_assembly.rs
use std::collections::HashMap;

use rotorframe::{resolve_scene, Assembly, ComponentKind, ResolvedShape, Solution};

#[test]
fn standard_quad_builds_the_full_component_graph() {
    let assembly = Assembly::standard_quad(4).unwrap();

    // Plate, payload, battery, then arm + ESC + motor + propeller per rotor.
    assert_eq!(assembly.components().len(), 19);
    assert_eq!(assembly.rotor_count(), 4);
    // Payload and battery mates, plus three mates per rotor.
    assert_eq!(assembly.mates().len(), 14);

    assert!(Assembly::standard_quad(0).is_err());
    assert!(Assembly::standard_quad(5).is_err());
    assert_eq!(Assembly::standard_quad(2).unwrap().rotor_count(), 2);
}

#[test]
fn flattened_system_counts_every_mate_exactly_once() {
    let assembly = Assembly::standard_quad(4).unwrap();
    let constraints = assembly.constraints();

    // Mate bands: 6 (payload) + 6 (battery) + per rotor 6 (arm join)
    // + 8 (ESC mount) + 6 (motor mount) = 92.
    // Physical laws: 1 (battery) + per rotor 1 (ESC) + 2 (motor)
    // + 1 (propeller) = 17.
    assert_eq!(constraints.len(), 109);

    // Flattening twice yields the same system: generation is pure.
    assert_eq!(assembly.constraints().len(), 109);
}

#[test]
fn variable_names_are_globally_unique() {
    let mut assembly = Assembly::standard_quad(4).unwrap();

    let mut counts: HashMap<String, usize> = HashMap::new();
    assembly.for_each_variable(&mut |v| {
        *counts.entry(v.name().to_string()).or_default() += 1;
    });

    for (name, count) in &counts {
        if name == "densitycf" {
            // The default material is one shared symbol across solids.
            continue;
        }
        assert_eq!(*count, 1, "variable name {name} is not unique");
    }
}

#[test]
fn resolved_scene_grows_as_the_solution_lands() {
    let mut assembly = Assembly::standard_quad(4).unwrap();

    // Before solving, only fully seeded components resolve: the center plate
    // and the four arms. Payload, battery, ESCs, and motors float free.
    let scene = resolve_scene(&assembly);
    assert_eq!(scene.len(), 5);

    let plate = &scene[0];
    assert_eq!(plate.kind, ComponentKind::Plate);
    assert_eq!(plate.color, 0x0A122A);
    let ResolvedShape::Box(size) = plate.shape else {
        panic!("plates are boxes");
    };
    assert!((size.z - 0.005).abs() < 1e-6);
    // Carbon-fiber placeholder density of 1 kg/m^3: the estimate equals the
    // plate volume.
    let estimate = plate.mass_estimate.unwrap();
    assert!((estimate - (0.12 * 0.07 * 0.005) as f32).abs() < 1e-9);

    // Bind one motor's position and it joins the scene.
    let motor = assembly
        .components()
        .iter()
        .find(|c| c.kind() == ComponentKind::Motor)
        .unwrap();
    let geometry = motor.geometry().unwrap();
    let mut solution = Solution::new();
    solution.insert(geometry.position.x.name().to_string(), 0.2);
    solution.insert(geometry.position.y.name().to_string(), 0.2);
    solution.insert(geometry.position.z.name().to_string(), 0.04);
    assembly.apply_solution(&solution);

    let scene = resolve_scene(&assembly);
    assert_eq!(scene.len(), 6);
    let resolved = scene
        .iter()
        .find(|c| c.kind == ComponentKind::Motor)
        .unwrap();
    let ResolvedShape::Cylinder { radius, height } = resolved.shape else {
        panic!("motors are cylinders");
    };
    assert!((radius - 0.02).abs() < 1e-6);
    assert!((height - 0.06).abs() < 1e-6);
    assert!((resolved.translation.x - 0.2).abs() < 1e-6);
}

#[test]
fn propellers_never_enter_the_scene() {
    let assembly = Assembly::standard_quad(4).unwrap();
    let scene = resolve_scene(&assembly);
    assert!(scene.iter().all(|c| c.kind != ComponentKind::Propeller));
}
