//! Ghost regions: portions of the member that exist only as placeholders.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::NODE_TOLERANCE;
use crate::error::{Error, Result};
use crate::registry::SectionRegistry;

fn default_end() -> f64 {
    1.0
}

/// The structural part of the member is `[start, end]`; everything outside
/// becomes a ghost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostRegion {
    #[serde(default)]
    pub start: f64,
    #[serde(default = "default_end")]
    pub end: f64,
}

impl Default for GhostRegion {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
        }
    }
}

impl GhostRegion {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.start) {
            return Err(Error::OutOfRange {
                position: self.start,
                message: "ghost start must lie in [0, 1]".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.end) || self.end - self.start <= NODE_TOLERANCE {
            return Err(Error::OutOfRange {
                position: self.end,
                message: format!("ghost end must lie in ({}, 1]", self.start),
            });
        }
        Ok(())
    }

    pub fn has_lower(&self) -> bool {
        self.start > NODE_TOLERANCE
    }

    pub fn has_upper(&self) -> bool {
        self.end < 1.0 - NODE_TOLERANCE
    }

    /// True when `s` lies in the structural part.
    pub fn contains(&self, s: f64) -> bool {
        s >= self.start - NODE_TOLERANCE && s <= self.end + NODE_TOLERANCE
    }

    /// Clamp `s` into the structural part.
    pub fn clamp(&self, s: f64) -> f64 {
        s.clamp(self.start, self.end)
    }
}

/// Replace every section outside `region` with its ghost.
///
/// Boundary nodes are inserted first so the ghosted intervals end exactly at
/// the region limits.
pub fn apply_ghost_region(registry: &mut SectionRegistry, region: &GhostRegion) -> Result<()> {
    region.validate()?;

    if region.has_lower() {
        registry.add_node(region.start)?;
        let limit = region.start - NODE_TOLERANCE;
        registry.update_where(|s| s < limit, |sec| *sec = sec.ghost());
    }
    if region.has_upper() {
        registry.add_node(region.end)?;
        let limit = region.end - NODE_TOLERANCE;
        registry.update_where(|s| s >= limit, |sec| *sec = sec.ghost());
    }

    debug!(
        start = region.start,
        end = region.end,
        "applied ghost region"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::SectionMaterial;
    use crate::section::{CrossSection, SectionKind, SectionShape};

    fn registry() -> SectionRegistry {
        let material = SectionMaterial {
            rho: 7850.0,
            e: 200e9,
            g: 79.3e9,
            sigma_y: 345e6,
            sigma_ult: 450e6,
            unit_cost: 1.0,
        };
        let section = CrossSection::shell(SectionShape::Circular { diameter: 6.0 }, 0.05, &material);
        let mut registry = SectionRegistry::new();
        registry.add_section(0.0, 0.5, section).expect("lower");
        registry.add_section(0.5, 1.0, section).expect("upper");
        registry
    }

    #[test]
    fn default_region_changes_nothing() {
        let mut reg = registry();
        let before = reg.clone();
        apply_ghost_region(&mut reg, &GhostRegion::default()).expect("ghost");
        assert_eq!(reg, before);
    }

    #[test]
    fn sections_outside_region_become_ghosts() {
        let mut reg = registry();
        let region = GhostRegion {
            start: 0.2,
            end: 0.8,
        };
        apply_ghost_region(&mut reg, &region).expect("ghost");
        assert_eq!(reg.positions(), &[0.0, 0.2, 0.5, 0.8, 1.0]);
        let kinds: Vec<SectionKind> = reg.intervals().map(|(_, _, s)| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Ghost,
                SectionKind::Shell,
                SectionKind::Shell,
                SectionKind::Ghost
            ]
        );
        let ghost = reg.section_at(0.1).expect("ghost section");
        assert_eq!(ghost.rho, 1e-2);
        assert_eq!(ghost.e, 200e11);
    }

    #[test]
    fn rejects_inverted_region() {
        let region = GhostRegion {
            start: 0.6,
            end: 0.4,
        };
        assert!(matches!(region.validate(), Err(Error::OutOfRange { .. })));
        assert!(matches!(
            apply_ghost_region(&mut registry(), &region),
            Err(Error::OutOfRange { .. })
        ));
    }
}
