use proptest::prelude::*;
use serde_json::json;
use tubular_lib::{
    integrate_shell, place_main_sections, CostRates, CrossSection, SectionKind, SectionMaterial,
    SectionRegistry, SectionShape,
};

mod common;

use common::{cylinder, steel_catalog};

fn material() -> SectionMaterial {
    SectionMaterial {
        rho: 7850.0,
        e: 200e9,
        g: 79.3e9,
        sigma_y: 345e6,
        sigma_ult: 450e6,
        unit_cost: 0.7,
    }
}

fn shell(diameter: f64) -> CrossSection {
    CrossSection::shell(SectionShape::Circular { diameter }, 0.05, &material())
}

fn stepped_registry() -> SectionRegistry {
    let mut registry = SectionRegistry::new();
    registry.add_section(0.0, 0.3, shell(6.0)).expect("base");
    registry.add_section(0.3, 0.6, shell(5.0)).expect("middle");
    registry.add_section(0.6, 1.0, shell(4.0)).expect("top");
    registry
}

#[test]
fn later_insertion_wins_on_overlap() {
    let mut registry = stepped_registry();
    let bulkhead = CrossSection::solid(
        SectionShape::Circular { diameter: 5.0 },
        SectionKind::Bulkhead,
        &material(),
    );
    let mut ring = shell(5.0);
    ring.kind = SectionKind::RingStiffener;

    registry.insert_section(0.40, 0.42, bulkhead).expect("bulkhead");
    registry.insert_section(0.41, 0.45, ring).expect("ring");

    assert_eq!(registry.section_at(0.405), Some(&bulkhead));
    assert_eq!(registry.section_at(0.415), Some(&ring));
    assert_eq!(registry.section_at(0.44), Some(&ring));
    assert_eq!(
        registry.section_at(0.46).map(|s| s.kind),
        Some(SectionKind::Shell)
    );
}

proptest! {
    #[test]
    fn keys_stay_sorted_and_distinct(nodes in prop::collection::vec(0.001f64..0.999, 0..40)) {
        let mut registry = stepped_registry();
        for &s in &nodes {
            registry.add_node(s).expect("node inside the partition");
        }
        let keys = registry.positions();
        prop_assert_eq!(keys[0], 0.0);
        prop_assert_eq!(keys[keys.len() - 1], 1.0);
        prop_assert!(keys.windows(2).all(|w| w[1] > w[0]));
        prop_assert_eq!(registry.intervals().count(), registry.interval_count());
    }

    #[test]
    fn add_node_is_idempotent(s in 0.001f64..0.999) {
        let mut once = stepped_registry();
        once.add_node(s).expect("split");
        let mut twice = once.clone();
        twice.add_node(s).expect("split again");
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn add_node_preserves_properties(s in 0.001f64..0.999, probe in 0.0f64..0.999) {
        let before = stepped_registry();
        let mut after = before.clone();
        after.add_node(s).expect("split");
        prop_assert_eq!(before.section_at(probe), after.section_at(probe));
    }

    #[test]
    fn insert_section_keeps_neighbours(s0 in 0.05f64..0.9, width in 0.001f64..0.08) {
        let s1 = (s0 + width).min(0.98);
        let before = stepped_registry();
        let mut after = before.clone();
        let mut ring = shell(5.5);
        ring.kind = SectionKind::RingStiffener;
        after.insert_section(s0, s1, ring).expect("insert");

        prop_assert_eq!(after.section_at(0.5 * (s0 + s1)), Some(&ring));
        prop_assert_eq!(after.section_at(s1 + 1e-4), before.section_at(s1 + 1e-4));
        prop_assert_eq!(after.section_at(s0 - 1e-4), before.section_at(s0 - 1e-4));
    }

    #[test]
    fn extra_nodes_do_not_change_shell_mass(nodes in prop::collection::vec(0.01f64..0.99, 1..10)) {
        let catalog = steel_catalog(7850.0);
        let mut definition = cylinder(-20.0, 30.0, 6.0, 0.04, json!({ "n_refine": 2 }));
        definition.outer = serde_json::from_value(json!({
            "shape": "circular",
            "diameter": [6.0, 4.5]
        }))
        .expect("profile");
        let grid = definition
            .control_grid(&catalog)
            .expect("control grid")
            .refine(definition.n_refine)
            .expect("refined grid");

        let registry = place_main_sections(&grid, None).expect("shell");
        let mut split = registry.clone();
        for &s in &nodes {
            split.add_node(s).expect("node");
        }
        let rates = CostRates::default();
        let coarse = integrate_shell(&grid, &registry, None, &rates, None).expect("coarse");
        let fine = integrate_shell(&grid, &split, None, &rates, None).expect("fine");
        let diff = (fine.component.mass - coarse.component.mass).abs();
        prop_assert!(diff <= 1e-9 * coarse.component.mass);
        let dz = (fine.component.z_cg - coarse.component.z_cg).abs();
        prop_assert!(dz <= 1e-9 * coarse.component.z_cg.abs());
    }
}
