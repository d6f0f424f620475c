use std::f64::consts::PI;

use serde_json::json;
use tubular_lib::{compute_hydrostatics, evaluate_member, GhostRegion, Hydrostatics};

mod common;

use common::{assert_relative, cylinder, steel_catalog};

const RHO_WATER: f64 = 1025.0;

#[test]
fn partly_submerged_cylinder() {
    let catalog = steel_catalog(7850.0);
    let props = evaluate_member(
        &cylinder(-20.0, 30.0, 6.0, 0.05, json!({ "n_refine": 3 })),
        &catalog,
    )
    .expect("evaluate");
    let h = &props.hydrostatics;

    let volume = PI * 9.0 * 20.0;
    assert_relative(h.s_under[1], 2.0 / 3.0, 1e-12);
    assert_relative(h.displacement, volume, 1e-9);
    assert_relative(h.buoyancy_force, RHO_WATER * 9.80633 * volume, 1e-9);
    assert_relative(h.z_cb, 10.0, 1e-9);
    assert_relative(h.center_of_buoyancy[2], -10.0, 1e-9);
    assert_eq!(h.idx_cb, 1);

    assert_relative(h.waterplane_area, PI * 9.0, 1e-12);
    assert_relative(h.waterplane_inertia[0], 0.25 * PI * 81.0, 1e-12);
    let waterline = h.waterline_centroid.expect("member pierces the surface");
    assert!(waterline[2].abs() < 1e-9);

    assert_relative(h.added_mass[0], RHO_WATER * volume, 1e-9);
    assert_eq!(h.added_mass[0], h.added_mass[1]);
    assert_relative(h.added_mass[2], RHO_WATER * 6.0_f64.powi(3) / 6.0, 1e-12);
    // pi rho r^2 times the integral of (z - z_cb)^2 over the draft.
    let roll = PI * RHO_WATER * 9.0 * 2.0 * 1000.0 / 3.0;
    assert_relative(h.added_mass[3], roll, 1e-3);
    assert_eq!(h.added_mass[5], 0.0);
}

#[test]
fn tapered_heave_uses_waterline_diameter() {
    let catalog = steel_catalog(7850.0);
    let taper = json!({ "outer": {"shape": "circular", "diameter": [4.0, 10.0]} });

    // D grows from 4 to 10 over z = -20..10, so it is 8 at the surface.
    let piercing = evaluate_member(&cylinder(-20.0, 30.0, 4.0, 0.05, taper.clone()), &catalog)
        .expect("evaluate piercing member");
    assert_relative(
        piercing.hydrostatics.added_mass[2],
        RHO_WATER * 8.0_f64.powi(3) / 6.0,
        1e-9,
    );
    assert_relative(piercing.hydrostatics.waterplane_area, PI * 16.0, 1e-9);

    // Fully under water: the widest submerged diameter governs.
    let submerged = evaluate_member(&cylinder(-40.0, 30.0, 4.0, 0.05, taper), &catalog)
        .expect("evaluate submerged member");
    assert!(submerged.hydrostatics.waterline_centroid.is_none());
    assert_relative(
        submerged.hydrostatics.added_mass[2],
        RHO_WATER * 10.0_f64.powi(3) / 6.0,
        1e-9,
    );
}

#[test]
fn dry_member_has_no_hydrostatics() {
    let catalog = steel_catalog(7850.0);
    let props = evaluate_member(&cylinder(5.0, 10.0, 6.0, 0.05, json!({})), &catalog)
        .expect("evaluate");
    assert_eq!(props.hydrostatics, Hydrostatics::default());
}

#[test]
fn ghost_region_does_not_displace_water() {
    let catalog = steel_catalog(7850.0);
    let definition = cylinder(-30.0, 30.0, 4.0, 0.04, json!({}));
    let grid = definition
        .control_grid(&catalog)
        .expect("control grid")
        .refine(2)
        .expect("refined grid");

    let full = compute_hydrostatics(&grid, &GhostRegion::default(), RHO_WATER);
    assert_relative(full.displacement, PI * 4.0 * 30.0, 1e-9);
    assert!(full.waterline_centroid.is_some());

    let embedded = GhostRegion {
        start: 0.0,
        end: 0.5,
    };
    let partial = compute_hydrostatics(&grid, &embedded, RHO_WATER);
    assert_relative(partial.displacement, PI * 4.0 * 15.0, 1e-9);
    assert_relative(partial.z_cb, 7.5, 1e-9);
    // The surface crossing is in the ghost part.
    assert!(partial.waterline_centroid.is_none());
    assert_eq!(partial.waterplane_area, 0.0);
}

#[test]
fn rectangular_column_added_mass() {
    let catalog = steel_catalog(7850.0);
    let mut definition = cylinder(-10.0, 10.0, 4.0, 0.04, json!({}));
    definition.outer = serde_json::from_value(json!({
        "shape": "rectangular",
        "side_a": [2.0, 2.0],
        "side_b": [2.0, 2.0]
    }))
    .expect("profile");
    let props = evaluate_member(&definition, &catalog).expect("evaluate");
    let h = &props.hydrostatics;

    assert_relative(h.displacement, 40.0, 1e-9);
    // Square section: same coefficient both ways, bracketed by the table
    // entries around an aspect ratio of one. No yaw term.
    let lateral = RHO_WATER * 0.25 * PI * 4.0 * 10.0;
    assert_relative(h.added_mass[0], h.added_mass[1], 1e-12);
    assert!(h.added_mass[0] > 1.42 * lateral && h.added_mass[0] < 1.65 * lateral);
    assert_eq!(h.added_mass[2], 0.0);
    assert!(h.added_mass[5].abs() < 1e-9);
}
