// tests/mate_constraints.rs
use rotorframe::{
    Assembly, Beam, BeamConfig, Component, Constraint, Expr, Face, JoinCorner, Mate, PlateConfig,
    Plate, PointTag, RelOp, Tolerance,
};

fn two_plates() -> (Assembly, u32, u32) {
    let mut assembly = Assembly::new();
    let p1 = assembly.add_component(Plate::new(PlateConfig::default()));
    let p2 = assembly.add_component(Plate::new(PlateConfig::default()));
    (assembly, p1, p2)
}

fn geometry(assembly: &Assembly, id: u32) -> &rotorframe::Geometry {
    assembly.component(id).and_then(Component::geometry).unwrap()
}

/// Splits a band constraint `lhs >=|<= k * target` into its factor and target.
fn band_parts(c: &Constraint) -> (f64, &Expr) {
    match &c.right {
        Expr::Mul(k, target) => match &**k {
            Expr::Const(factor) => (*factor, &**target),
            _ => panic!("band factor should be a literal: {c}"),
        },
        _ => panic!("band should be factor * target: {c}"),
    }
}

#[test]
fn centroid_aligns_x_and_y_as_bands() {
    let (mut assembly, p1, p2) = two_plates();
    let id = assembly
        .add_mate(Mate::centroid(p1, p2, [Face::Bottom, Face::Top]))
        .unwrap();

    let cs = assembly.mate(id).unwrap().constraints(&assembly);
    assert_eq!(cs.len(), 6, "x band, y band, z stacking band");

    let g1 = geometry(&assembly, p1);
    let g2 = geometry(&assembly, p2);

    // x: lower then upper bound around comp2's x.
    assert_eq!(cs[0].op, RelOp::Ge);
    assert_eq!(cs[0].left, g1.position.x.expr());
    let (lo, target) = band_parts(&cs[0]);
    assert!((lo - 0.999).abs() < 1e-12);
    assert_eq!(*target, g2.position.x.expr());

    assert_eq!(cs[1].op, RelOp::Le);
    let (hi, _) = band_parts(&cs[1]);
    assert!((hi - 1.001).abs() < 1e-12);

    // y mirrors x.
    assert_eq!(cs[2].left, g1.position.y.expr());
    assert_eq!(cs[3].left, g1.position.y.expr());
}

#[test]
fn centroid_bottom_on_top_stacks_comp1_above() {
    let (mut assembly, p1, p2) = two_plates();
    let id = assembly
        .add_mate(Mate::centroid(p1, p2, [Face::Bottom, Face::Top]))
        .unwrap();

    let cs = assembly.mate(id).unwrap().constraints(&assembly);
    let g1 = geometry(&assembly, p1);
    let g2 = geometry(&assembly, p2);

    // comp1.z ~ comp2.z + half of both z extents.
    let expected =
        &g2.position.z + 0.5 * g1.mesh.z_extent() + 0.5 * g2.mesh.z_extent();
    assert_eq!(cs[4].left, g1.position.z.expr());
    assert_eq!(cs[4].op, RelOp::Ge);
    let (_, target) = band_parts(&cs[4]);
    assert_eq!(*target, expected);
    let (_, target) = band_parts(&cs[5]);
    assert_eq!(*target, expected);
}

#[test]
fn centroid_top_on_bottom_solves_comp2_z() {
    let (mut assembly, p1, p2) = two_plates();
    let id = assembly
        .add_mate(Mate::centroid(p1, p2, [Face::Top, Face::Bottom]))
        .unwrap();

    let cs = assembly.mate(id).unwrap().constraints(&assembly);
    let g1 = geometry(&assembly, p1);
    let g2 = geometry(&assembly, p2);

    let expected =
        &g1.position.z + 0.5 * g1.mesh.z_extent() + 0.5 * g2.mesh.z_extent();
    assert_eq!(cs[4].left, g2.position.z.expr());
    let (_, target) = band_parts(&cs[4]);
    assert_eq!(*target, expected);
}

#[test]
fn tolerance_band_scales_with_configuration() {
    let (mut assembly, p1, p2) = two_plates();
    let id = assembly
        .add_mate(
            Mate::centroid(p1, p2, [Face::Smooth, Face::Smooth])
                .with_tolerance(Tolerance(0.01)),
        )
        .unwrap();

    let cs = assembly.mate(id).unwrap().constraints(&assembly);
    assert_eq!(cs.len(), 4, "no stacking faces, x and y bands only");
    let (lo, _) = band_parts(&cs[0]);
    let (hi, _) = band_parts(&cs[1]);
    assert!((lo - 0.99).abs() < 1e-12);
    assert!((hi - 1.01).abs() < 1e-12);
}

#[test]
fn smooth_join_corner_zero_offsets_comp1() {
    let mut assembly = Assembly::new();
    let arm = assembly.add_component(Beam::new(BeamConfig {
        dims: [0.15, 0.02, 0.003],
        ..BeamConfig::default()
    }));
    let plate = assembly.add_component(Plate::new(PlateConfig::default()));
    let id = assembly
        .add_mate(Mate::smooth_join(arm, plate, JoinCorner::new(0).unwrap()))
        .unwrap();

    let cs = assembly.mate(id).unwrap().constraints(&assembly);
    assert_eq!(cs.len(), 6, "x band, y band, z lock band");

    let ga = geometry(&assembly, arm);
    let gp = geometry(&assembly, plate);

    // Index 0: the arm (comp1) is solved on both axes, offset from the plate
    // by 0.4 of the plate extent plus 0.3535 of the arm's long extent.
    let x_expected =
        &gp.position.x + (0.4 * gp.mesh.x_extent() + 0.3535 * ga.mesh.x_extent());
    let y_expected =
        &gp.position.y + (0.4 * gp.mesh.y_extent() + 0.3535 * ga.mesh.x_extent());

    assert_eq!(cs[0].left, ga.position.x.expr());
    let (_, target) = band_parts(&cs[0]);
    assert_eq!(*target, x_expected);

    assert_eq!(cs[2].left, ga.position.y.expr());
    let (_, target) = band_parts(&cs[2]);
    assert_eq!(*target, y_expected);

    // The z lock comes last and binds the plate to the arm's plane.
    assert_eq!(cs[4].left, gp.position.z.expr());
    let (_, target) = band_parts(&cs[4]);
    assert_eq!(*target, ga.position.z.expr());
}

#[test]
fn smooth_join_corner_one_swaps_the_y_anchor() {
    let mut assembly = Assembly::new();
    let arm = assembly.add_component(Beam::new(BeamConfig::default()));
    let plate = assembly.add_component(Plate::new(PlateConfig::default()));
    let id = assembly
        .add_mate(Mate::smooth_join(arm, plate, JoinCorner::new(1).unwrap()))
        .unwrap();

    let cs = assembly.mate(id).unwrap().constraints(&assembly);
    let ga = geometry(&assembly, arm);
    let gp = geometry(&assembly, plate);

    // x is still solved for the arm...
    assert_eq!(cs[0].left, ga.position.x.expr());
    // ...but y is now solved for the plate, anchored on the arm.
    assert_eq!(cs[2].left, gp.position.y.expr());
    let y_expected =
        &ga.position.y + (0.4 * gp.mesh.y_extent() + 0.3535 * ga.mesh.x_extent());
    let (_, target) = band_parts(&cs[2]);
    assert_eq!(*target, y_expected);
}

#[test]
fn join_corner_rejects_out_of_range_index() {
    assert!(JoinCorner::new(3).is_ok());
    assert!(JoinCorner::new(4).is_err());
}

#[test]
fn unmodeled_tags_contribute_no_constraints() {
    let (mut assembly, p1, p2) = two_plates();

    // A relation that needs a reference but was given none stays unmodeled.
    let orphan = Mate::from_tags(p1, p2, [Face::Bottom, Face::Top], &[PointTag::CentroidRef], None);
    let id = assembly.add_mate(orphan).unwrap();
    assert!(assembly.mate(id).unwrap().constraints(&assembly).is_empty());

    // So does a tag combination with no modeled relation at all.
    let unknown = Mate::from_tags(p1, p2, [Face::Top, Face::Top], &[PointTag::LowerMidInc], None);
    let id = assembly.add_mate(unknown).unwrap();
    assert!(assembly.mate(id).unwrap().constraints(&assembly).is_empty());
}

#[test]
fn from_tags_resolves_smooth_join_at_construction() {
    let mut assembly = Assembly::new();
    let arm = assembly.add_component(Beam::new(BeamConfig::default()));
    let plate = assembly.add_component(Plate::new(PlateConfig::default()));

    let mate = Mate::from_tags(
        arm,
        plate,
        [Face::Smooth, Face::Smooth],
        &[PointTag::LowerMidInc, PointTag::Corner(2)],
        None,
    );
    let id = assembly.add_mate(mate).unwrap();
    let cs = assembly.mate(id).unwrap().constraints(&assembly);
    assert_eq!(cs.len(), 6);

    // Index 2 anchors the plate (comp2) on the arm for both axes.
    let gp = geometry(&assembly, plate);
    assert_eq!(cs[0].left, gp.position.x.expr());
    assert_eq!(cs[2].left, gp.position.y.expr());
}

#[test]
fn centroid_ref_reads_the_explicit_reference_plane() {
    let mut assembly = Assembly::new();
    let esc = assembly.add_component(Plate::new(PlateConfig {
        dims: [0.04, 0.06, 0.01],
        ..PlateConfig::default()
    }));
    let arm = assembly.add_component(Beam::new(BeamConfig::default()));
    let center = assembly.add_component(Plate::new(PlateConfig::default()));
    let id = assembly
        .add_mate(Mate::centroid_ref(esc, arm, center))
        .unwrap();

    let cs = assembly.mate(id).unwrap().constraints(&assembly);
    assert_eq!(cs.len(), 8, "rotation, x, y, and z bands");

    let ge = geometry(&assembly, esc);
    let ga = geometry(&assembly, arm);
    let gc = geometry(&assembly, center);

    // Rotation lock comes first.
    assert_eq!(cs[0].left, ge.rotation.z.expr());
    let (_, target) = band_parts(&cs[0]);
    assert_eq!(*target, ga.rotation.z.expr());

    // z offsets from the reference plate's plane, comp2 half extent first.
    let expected =
        &gc.position.z + 0.5 * ga.mesh.z_extent() + 0.5 * ge.mesh.z_extent();
    assert_eq!(cs[6].left, ge.position.z.expr());
    let (_, target) = band_parts(&cs[6]);
    assert_eq!(*target, expected);
}
