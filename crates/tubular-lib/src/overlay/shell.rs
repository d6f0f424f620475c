//! Main shell sections with optional smeared axial stiffeners.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::grid::MemberGrid;
use crate::registry::SectionRegistry;
use crate::section::{AreaProperties, CrossSection, SectionKind, SectionShape};

/// Longitudinal T-stiffeners spaced evenly around the circumference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxialStiffenerSpec {
    pub web_height: f64,
    pub web_thickness: f64,
    pub flange_width: f64,
    pub flange_thickness: f64,
    /// Angular spacing between stiffeners (rad).
    pub spacing: f64,
}

/// Stiffener contribution per unit length, smeared around the shell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmearedStiffeners {
    pub area: f64,
    /// Bending second moment about a diameter (m^4).
    pub ixx: f64,
    /// Polar second moment (m^4).
    pub izz: f64,
    /// Added wall thickness giving the same area.
    pub t_eff: f64,
}

impl AxialStiffenerSpec {
    /// Whole number of stiffeners fitting around the circumference.
    pub fn count(&self) -> usize {
        if self.spacing <= 0.0 {
            0
        } else {
            (2.0 * PI / self.spacing).floor() as usize
        }
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            (self.web_height, "web_height"),
            (self.web_thickness, "web_thickness"),
            (self.flange_width, "flange_width"),
            (self.flange_thickness, "flange_thickness"),
        ];
        for (value, field) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::MemberDefinition {
                    message: format!("axial stiffener {field} must be non-negative"),
                });
            }
        }
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(Error::MemberDefinition {
                message: "axial stiffener spacing must be non-negative".to_string(),
            });
        }
        Ok(())
    }

    /// Smeared properties inside a shell of `outer_radius` and `wall` thickness.
    pub fn smeared(&self, outer_radius: f64, wall: f64, index: usize) -> Result<SmearedStiffeners> {
        let n = self.count() as f64;
        if n == 0.0 {
            return Ok(SmearedStiffeners::default());
        }

        let r_web_outer = outer_radius - wall;
        let r_web_inner = r_web_outer - self.web_height;
        let r_flange_outer = r_web_inner;
        let r_flange_inner = r_flange_outer - self.flange_thickness;
        if r_flange_inner <= 0.0 {
            return Err(Error::InvalidGeometry {
                index,
                message: "axial stiffeners reach past the member axis".to_string(),
            });
        }

        let r_web = 0.5 * (r_web_outer + r_web_inner);
        let r_flange = 0.5 * (r_flange_outer + r_flange_inner);
        let a_web = self.web_height * self.web_thickness;
        let a_flange = self.flange_width * self.flange_thickness;

        let area = n * (a_web + a_flange);
        let ixx = 0.5 * n * (a_web * r_web * r_web + a_flange * r_flange * r_flange);
        Ok(SmearedStiffeners {
            area,
            ixx,
            izz: 2.0 * ixx,
            t_eff: area / (2.0 * PI * r_web),
        })
    }
}

/// Build the initial registry partition from the refined grid.
///
/// Every grid interval gets a shell section at its average outline, with the
/// outfitting factor folded into the density. Circular members add the
/// smeared axial stiffeners; rectangular members carry none.
pub fn place_main_sections(
    grid: &MemberGrid,
    axial: Option<&AxialStiffenerSpec>,
) -> Result<SectionRegistry> {
    if let Some(spec) = axial {
        spec.validate()?;
    }

    let mut registry = SectionRegistry::new();
    for (k, pair) in grid.s.windows(2).enumerate() {
        let shape = grid.profile.shape_of_section(k);
        let t = grid.thickness[k];
        let mut material = grid.materials[k];
        material.rho *= grid.outfitting[k];

        let mut section = CrossSection::shell(shape, t, &material);
        if let (Some(spec), SectionShape::Circular { diameter }) = (axial, shape) {
            let smeared = spec.smeared(0.5 * diameter, t, k)?;
            section = CrossSection::new(
                shape,
                SectionKind::Shell,
                t + smeared.t_eff,
                section.properties.combine(AreaProperties {
                    area: smeared.area,
                    ixx: smeared.ixx,
                    iyy: smeared.ixx,
                    j0: smeared.izz,
                    ..AreaProperties::default()
                }),
                &material,
            );
        }
        registry.add_section(pair[0], pair[1], section)?;
    }

    debug!(
        sections = registry.interval_count(),
        axial_stiffeners = axial.map(|a| a.count()).unwrap_or(0),
        "placed main shell sections"
    );
    Ok(registry)
}
