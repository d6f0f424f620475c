use std::f64::consts::PI;

use serde_json::json;
use tubular_lib::{
    evaluate_member, place_bulkheads, place_main_sections, place_ring_stiffeners, BulkheadSpec,
    Error, GhostRegion, MemberDefinition, MemberGrid, RingStiffenerSpec, SectionKind,
};

mod common;

use common::{assert_relative, cylinder, fixture_catalog, steel_catalog};

fn refined(definition: &MemberDefinition) -> MemberGrid {
    definition
        .control_grid(&steel_catalog(7850.0))
        .expect("control grid")
        .refine(definition.n_refine)
        .expect("refined grid")
}

fn rings(spacing: f64) -> RingStiffenerSpec {
    RingStiffenerSpec {
        web_height: 0.2,
        web_thickness: 0.01,
        flange_width: 0.1,
        flange_thickness: 0.02,
        spacing,
    }
}

#[test]
fn bulkhead_plate_fills_the_inner_outline() {
    let catalog = steel_catalog(8500.0);
    let bare = evaluate_member(&cylinder(0.0, 10.0, 5.0, 0.05, json!({})), &catalog)
        .expect("bare cylinder");
    let props = evaluate_member(
        &cylinder(
            0.0,
            10.0,
            5.0,
            0.05,
            json!({ "bulkheads": [{"position": 0.5, "thickness": 0.05}] }),
        ),
        &catalog,
    )
    .expect("cylinder with bulkhead");

    let plate = 8500.0 * PI * 2.45_f64.powi(2) * 0.05;
    assert_eq!(props.bulkheads.bulkheads.len(), 1);
    assert_relative(props.mass.bulkheads.mass, plate, 1e-9);
    assert_relative(props.mass.bulkheads.z_cg, 5.0, 1e-9);
    assert_relative(props.shell.component.mass, bare.shell.component.mass, 1e-10);
    assert_relative(props.total_mass(), bare.total_mass() + plate, 1e-10);
}

#[test]
fn bulkheads_are_kept_inside_the_structural_region() {
    let definition = cylinder(0.0, 10.0, 5.0, 0.05, json!({}));
    let grid = refined(&definition);
    let ghost = GhostRegion {
        start: 0.2,
        end: 1.0,
    };
    let mut registry = place_main_sections(&grid, None).expect("shell");
    let specs = [
        BulkheadSpec {
            position: 0.1,
            thickness: 0.05,
        },
        BulkheadSpec {
            position: 1.0,
            thickness: 0.05,
        },
    ];
    let layout = place_bulkheads(&mut registry, &grid, &specs, &ghost).expect("bulkheads");

    assert_eq!(layout.bulkheads.len(), 2);
    assert!(layout.bulkheads[0].s0 >= 0.2 - 1e-12);
    assert!(layout.bulkheads[1].s1 <= 1.0 + 1e-12);
    for bulkhead in &layout.bulkheads {
        let section = registry.section_at(bulkhead.s).expect("section at bulkhead");
        assert_eq!(section.kind, SectionKind::Bulkhead);
    }
}

#[test]
fn invalid_bulkheads_are_rejected() {
    let definition = cylinder(0.0, 10.0, 5.0, 0.05, json!({}));
    let grid = refined(&definition);
    let ghost = GhostRegion::default();

    let mut registry = place_main_sections(&grid, None).expect("shell");
    let outside = [BulkheadSpec {
        position: 1.5,
        thickness: 0.05,
    }];
    assert!(matches!(
        place_bulkheads(&mut registry, &grid, &outside, &ghost),
        Err(Error::OutOfRange { .. })
    ));

    let flat = [BulkheadSpec {
        position: 0.5,
        thickness: 0.0,
    }];
    assert!(matches!(
        place_bulkheads(&mut registry, &grid, &flat, &ghost),
        Err(Error::InvalidGeometry { index: 0, .. })
    ));
}

#[test]
fn ring_stiffeners_follow_the_spacing() {
    let catalog = steel_catalog(7850.0);
    let props = evaluate_member(
        &cylinder(
            0.0,
            10.0,
            5.0,
            0.05,
            json!({ "ring_stiffeners": serde_json::to_value(rings(0.25)).expect("spec") }),
        ),
        &catalog,
    )
    .expect("stiffened cylinder");

    let layout = &props.ring_stiffeners;
    let positions: Vec<f64> = layout.rings.iter().map(|r| r.s).collect();
    assert_eq!(positions, vec![0.125, 0.375, 0.625, 0.875]);

    let (r_wo, r_wi, r_fi): (f64, f64, f64) = (2.45, 2.25, 2.23);
    let per_ring = 7850.0
        * (PI * (r_wo * r_wo - r_wi * r_wi) * 0.01 + PI * (r_wi * r_wi - r_fi * r_fi) * 0.1);
    assert_relative(props.mass.ring_stiffeners.mass, 4.0 * per_ring, 1e-9);
    assert_relative(props.mass.ring_stiffeners.z_cg, 5.0, 1e-9);

    let ratio = (0.2 + 0.02 + 0.05) / 2.5;
    assert_relative(layout.constraints.stiffener_radius_ratio[0], ratio, 1e-12);
    assert_eq!(layout.constraints.stiffener_radius_ratio[4], -9999.0);
    assert_relative(layout.constraints.flange_spacing_ratio, 0.1 / (0.5 * 0.25 * 10.0), 1e-12);
}

#[test]
fn ring_inertia_sums_web_and_flange() {
    let catalog = steel_catalog(7850.0);
    let props = evaluate_member(
        &cylinder(
            0.0,
            10.0,
            5.0,
            0.05,
            json!({ "ring_stiffeners": serde_json::to_value(rings(0.25)).expect("spec") }),
        ),
        &catalog,
    )
    .expect("stiffened cylinder");

    let (r_wo, r_wi, r_fi): (f64, f64, f64) = (2.45, 2.25, 2.23);
    let m_web = 7850.0 * PI * (r_wo * r_wo - r_wi * r_wi) * 0.01;
    let m_flange = 7850.0 * PI * (r_wi * r_wi - r_fi * r_fi) * 0.1;
    let annulus = |ri: f64, ro: f64, h: f64, m: f64| {
        (
            m / 12.0 * (3.0 * (ri * ri + ro * ro) + h * h),
            0.5 * m * (ri * ri + ro * ro),
        )
    };
    let (web_bending, web_polar) = annulus(r_wi, r_wo, 0.01, m_web);
    let (flange_bending, flange_polar) = annulus(r_fi, r_wi, 0.1, m_flange);

    let m = m_web + m_flange;
    let lever: f64 = [1.25_f64, 3.75, 6.25, 8.75].iter().map(|z| z * z).sum();
    let inertia = &props.mass.ring_stiffeners.inertia_base;
    assert_relative(inertia.zz, 4.0 * (web_polar + flange_polar), 1e-9);
    assert_relative(
        inertia.xx,
        4.0 * (web_bending + flange_bending) + m * lever,
        1e-9,
    );
    assert_relative(inertia.yy, inertia.xx, 1e-12);
}

#[test]
fn ring_stiffeners_step_off_bulkheads() {
    let definition = cylinder(0.0, 10.0, 5.0, 0.05, json!({}));
    let grid = refined(&definition);
    let ghost = GhostRegion::default();
    let mut registry = place_main_sections(&grid, None).expect("shell");
    let bulkheads = place_bulkheads(
        &mut registry,
        &grid,
        &[BulkheadSpec {
            position: 0.375,
            thickness: 0.05,
        }],
        &ghost,
    )
    .expect("bulkhead");
    let layout = place_ring_stiffeners(
        &mut registry,
        &grid,
        &rings(0.25),
        &bulkheads.positions(),
        &ghost,
    )
    .expect("rings");

    let moved = layout.rings[1];
    assert!(moved.s < 0.375 - 0.009, "ring left at {}", moved.s);
    assert_eq!(
        registry.section_at(0.375).map(|s| s.kind),
        Some(SectionKind::Bulkhead)
    );
    assert_eq!(
        registry.section_at(moved.s).map(|s| s.kind),
        Some(SectionKind::RingStiffener)
    );
    // Untouched rings sit exactly on their pitch.
    assert_eq!(layout.rings[2].s, 0.625);
}

#[test]
fn ring_stiffeners_are_ignored_on_rectangular_members() {
    let catalog = steel_catalog(7850.0);
    let mut definition = cylinder(
        0.0,
        10.0,
        5.0,
        0.05,
        json!({ "ring_stiffeners": serde_json::to_value(rings(0.25)).expect("spec") }),
    );
    definition.outer = serde_json::from_value(json!({
        "shape": "rectangular",
        "side_a": [4.0, 4.0],
        "side_b": [3.0, 3.0]
    }))
    .expect("profile");

    let props = evaluate_member(&definition, &catalog).expect("box member");
    assert!(props.ring_stiffeners.is_empty());
    assert_eq!(props.mass.ring_stiffeners.mass, 0.0);
    let wall = 4.0 * 3.0 - 3.9 * 2.9;
    assert_relative(props.total_mass(), 7850.0 * wall * 10.0, 1e-9);
}

#[test]
fn oversized_ballast_is_reported_not_rejected() {
    let catalog = steel_catalog(7850.0);
    let props = evaluate_member(
        &cylinder(
            0.0,
            10.0,
            5.0,
            0.05,
            json!({ "ballast": [{"start": 0.0, "end": 1.0, "material": "seawater", "volume": 500.0}] }),
        ),
        &catalog,
    )
    .expect("over-full ballast still evaluates");

    let segment = &props.ballast.segments[0];
    let capacity = PI * 2.45_f64.powi(2) * 10.0;
    assert_relative(segment.capacity, capacity, 1e-9);
    assert!(props.ballast.max_capacity_ratio() > 1.0);
    assert_eq!(segment.fill_end, 1.0);
    assert_relative(segment.mass, 1025.0 * 500.0, 1e-12);
}

#[test]
fn fixed_ballast_fills_from_the_bottom() {
    let catalog = steel_catalog(7850.0);
    let capacity = PI * 2.45_f64.powi(2) * 10.0;
    let props = evaluate_member(
        &cylinder(
            0.0,
            10.0,
            5.0,
            0.05,
            json!({ "ballast": [{"start": 0.0, "end": 1.0, "material": "seawater", "volume": 0.5 * capacity}] }),
        ),
        &catalog,
    )
    .expect("half-full ballast");

    let segment = &props.ballast.segments[0];
    assert!(!segment.variable);
    assert_relative(segment.fill_end, 0.5, 1e-9);
    assert_relative(segment.fill_height(), 0.5, 1e-9);
    assert_relative(segment.capacity_ratio, 0.5, 1e-9);
    assert_relative(props.mass.ballast.z_cg, 2.5, 1e-9);
    assert_relative(props.mass.ballast.mass, 1025.0 * 0.5 * capacity, 1e-12);
    assert_relative(
        props.mass.structural_mass,
        props.total_mass() - props.mass.ballast.mass,
        1e-12,
    );
}

#[test]
fn ballast_mass_is_smeared_into_section_density() {
    let catalog = steel_catalog(7850.0);
    let props = evaluate_member(
        &cylinder(
            0.0,
            10.0,
            5.0,
            0.05,
            json!({
                "n_refine": 4,
                "ballast": [{"start": 0.0, "end": 0.5, "material": "seawater", "volume": 20.0}]
            }),
        ),
        &catalog,
    )
    .expect("ballasted member");

    let area = PI * (2.5_f64.powi(2) - 2.45_f64.powi(2));
    let table = &props.sections;
    assert_eq!(table.node_count(), 5);
    let smeared = 7850.0 + 1025.0 * 20.0 / (area * 5.0);
    assert_relative(table.rho[0], smeared, 1e-9);
    assert_relative(table.rho[1], smeared, 1e-9);
    assert_relative(table.rho[2], 7850.0, 1e-12);
    assert_relative(table.rho[3], 7850.0, 1e-12);
}

#[test]
fn ballast_adds_no_section_boundaries() {
    let catalog = steel_catalog(7850.0);
    let plain = evaluate_member(&cylinder(0.0, 10.0, 5.0, 0.05, json!({})), &catalog)
        .expect("plain member");
    let ballasted = evaluate_member(
        &cylinder(
            0.0,
            10.0,
            5.0,
            0.05,
            json!({ "ballast": [{"start": 0.1, "end": 0.37, "material": "seawater", "volume": 5.0}] }),
        ),
        &catalog,
    )
    .expect("ballasted member");

    assert_eq!(
        ballasted.sections.node_count(),
        plain.sections.node_count()
    );
    assert_eq!(ballasted.sections.s, plain.sections.s);
    // The only interval straddles the compartment, so its density is untouched
    // while the ballast still counts toward the member mass.
    assert_eq!(ballasted.sections.rho[0], plain.sections.rho[0]);
    assert_relative(ballasted.mass.ballast.mass, 1025.0 * 5.0, 1e-12);
}

#[test]
fn variable_ballast_reports_capacity_only() {
    let catalog = fixture_catalog();
    let props = evaluate_member(
        &cylinder(
            -10.0,
            10.0,
            5.0,
            0.05,
            json!({
                "ghost": {"start": 0.2},
                "ballast": [{"start": 0.0, "end": 0.3, "material": "seawater"}]
            }),
        ),
        &catalog,
    )
    .expect("variable ballast");

    let segment = &props.ballast.segments[0];
    assert!(segment.variable);
    assert_relative(segment.start, 0.2, 1e-12);
    assert_relative(segment.end, 0.5, 1e-12);
    assert_eq!(segment.mass, 0.0);
    assert_eq!(segment.volume_curve.len(), segment.position_curve.len());
    assert_relative(
        props.ballast.variable_capacity(),
        PI * 2.45_f64.powi(2) * 3.0,
        1e-9,
    );
    assert_eq!(props.mass.ballast.mass, 0.0);
}

#[test]
fn ballast_material_must_be_known() {
    let catalog = steel_catalog(7850.0);
    let err = evaluate_member(
        &cylinder(
            0.0,
            10.0,
            5.0,
            0.05,
            json!({ "ballast": [{"start": 0.0, "end": 0.5, "material": "unobtainium", "volume": 1.0}] }),
        ),
        &catalog,
    )
    .expect_err("unknown ballast material");
    assert!(matches!(err, Error::UnknownMaterial { name } if name == "unobtainium"));
}

#[test]
fn ghost_region_removes_structural_mass() {
    let catalog = steel_catalog(7850.0);
    let full = evaluate_member(&cylinder(0.0, 10.0, 5.0, 0.05, json!({})), &catalog)
        .expect("full member");
    let trimmed = evaluate_member(
        &cylinder(0.0, 10.0, 5.0, 0.05, json!({ "ghost": {"start": 0.2, "end": 0.8} })),
        &catalog,
    )
    .expect("trimmed member");

    assert_relative(trimmed.shell.ghost_mass, 1e-4 * 4.0, 1e-9);
    assert_relative(
        trimmed.total_mass(),
        0.6 * full.total_mass() + trimmed.shell.ghost_mass,
        1e-9,
    );
    assert_eq!(trimmed.sections.node_count(), 4);
    assert_relative(trimmed.sections.rho[0], 1e-2, 1e-12);
    assert_relative(trimmed.sections.rho[1], 7850.0, 1e-12);
}

#[test]
fn degenerate_geometry_is_rejected() {
    let catalog = steel_catalog(7850.0);
    let mut definition = cylinder(0.0, 10.0, 5.0, 0.05, json!({}));
    definition.grid = vec![0.0, 0.5, 0.5, 1.0];
    definition.outer = serde_json::from_value(json!({
        "shape": "circular",
        "diameter": [5.0, 5.0, 5.0, 5.0]
    }))
    .expect("profile");
    definition.layers[0].thickness = vec![0.05; 4];
    assert!(matches!(
        evaluate_member(&definition, &catalog),
        Err(Error::InvalidGeometry { index: 1, .. })
    ));

    let point = cylinder(3.0, 0.0, 5.0, 0.05, json!({}));
    assert!(matches!(
        evaluate_member(&point, &catalog),
        Err(Error::InvalidGeometry { .. })
    ));

    let outside_joint = cylinder(
        0.0,
        10.0,
        5.0,
        0.05,
        json!({ "axial_joints": [{"name": "deck", "position": 1.2}] }),
    );
    assert!(matches!(
        evaluate_member(&outside_joint, &catalog),
        Err(Error::OutOfRange { .. })
    ));
}
