use std::fmt::Write;

use serde::Serialize;

use crate::error::Result;
use crate::inertia::Inertia;
use crate::material::Material;
use crate::member::MemberProperties;

/// Presentation style for an evaluation summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    Json,
}

fn inertia_line(label: &str, i: &Inertia) -> String {
    format!(
        "{label}: Ixx {:.4e} Iyy {:.4e} Izz {:.4e} kg m^2",
        i.xx, i.yy, i.zz
    )
}

impl MemberProperties {
    /// Render the summary in the requested mode.
    pub fn render(&self, mode: RenderMode) -> Result<String> {
        match mode {
            RenderMode::PlainText => Ok(self.render_plain()),
            RenderMode::Json => self.render_json(),
        }
    }

    fn render_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let m = &self.mass;
        let name = if self.name.is_empty() {
            "<unnamed>"
        } else {
            self.name.as_str()
        };

        let _ = writeln!(
            buffer,
            "Member {name}: height {:.3} m, {} sections",
            self.height, self.section_count
        );
        let _ = writeln!(
            buffer,
            "Total mass: {:.1} kg (structural {:.1} kg, ballast {:.1} kg)",
            m.total_mass, m.structural_mass, m.ballast.mass
        );
        let _ = writeln!(
            buffer,
            "Total cost: {:.2} USD (structural {:.2} USD)",
            m.total_cost, m.structural_cost
        );
        let _ = writeln!(
            buffer,
            "Center of mass: z_cg {:.3} m, global ({:.3}, {:.3}, {:.3})",
            m.z_cg, m.center_of_mass[0], m.center_of_mass[1], m.center_of_mass[2]
        );
        let _ = writeln!(buffer, "{}", inertia_line("Inertia about CG", &m.inertia_total));
        let _ = writeln!(buffer, "{}", inertia_line("Inertia about base", &m.inertia_base));

        let _ = writeln!(buffer, "Components:");
        let components = [
            ("shell", &m.shell),
            ("bulkheads", &m.bulkheads),
            ("ring stiffeners", &m.ring_stiffeners),
            ("ballast", &m.ballast),
        ];
        for (label, c) in components {
            let _ = writeln!(
                buffer,
                "  {label:<16} {:>14.1} kg {:>14.2} USD  z_cg {:>8.3} m",
                c.mass, c.cost, c.z_cg
            );
        }
        let _ = writeln!(buffer, "Shell labor: {:.1} h", self.shell.labor_hours);

        for (k, segment) in self.ballast.segments.iter().enumerate() {
            if segment.variable {
                let _ = writeln!(
                    buffer,
                    "Ballast {k}: variable, capacity {:.3} m^3",
                    segment.capacity
                );
            } else {
                let _ = writeln!(
                    buffer,
                    "Ballast {k}: {:.3} m^3 of {:.3} m^3 ({:.0}%), fill to s = {:.4}",
                    segment.volume,
                    segment.capacity,
                    100.0 * segment.capacity_ratio,
                    segment.fill_end
                );
            }
        }

        let h = &self.hydrostatics;
        if h.displacement > 0.0 {
            let _ = writeln!(
                buffer,
                "Displacement: {:.3} m^3, buoyancy {:.1} N, z_cb {:.3} m",
                h.displacement, h.buoyancy_force, h.z_cb
            );
            let a = &h.added_mass;
            let _ = writeln!(
                buffer,
                "Added mass: surge {:.1} sway {:.1} heave {:.1} roll {:.3e} pitch {:.3e} yaw {:.3e}",
                a[0], a[1], a[2], a[3], a[4], a[5]
            );
        } else {
            let _ = writeln!(buffer, "Member is above the water plane");
        }

        buffer
    }
}

/// One row of the material listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MaterialRow<'a> {
    pub name: &'a str,
    pub rho: f64,
    pub e: f64,
    pub sigma_y: f64,
    pub unit_cost: f64,
}

impl<'a> From<&'a Material> for MaterialRow<'a> {
    fn from(m: &'a Material) -> Self {
        Self {
            name: &m.name,
            rho: m.rho,
            e: m.e,
            sigma_y: m.sigma_y,
            unit_cost: m.unit_cost,
        }
    }
}

/// Fixed-width table of materials.
pub fn render_materials(materials: &[&Material]) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{:<20} {:>10} {:>12} {:>12} {:>10}",
        "name", "rho", "E", "sigma_y", "cost/kg"
    );
    for m in materials {
        let _ = writeln!(
            buffer,
            "{:<20} {:>10.1} {:>12.4e} {:>12.4e} {:>10.3}",
            m.name, m.rho, m.e, m.sigma_y, m.unit_cost
        );
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn materials_table_lists_every_row() {
        let steel = Material {
            name: "steel".to_string(),
            e: 200e9,
            g: 79.3e9,
            sigma_y: 345e6,
            sigma_ult: 450e6,
            rho: 7850.0,
            unit_cost: 0.7,
        };
        let text = render_materials(&[&steel]);
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).is_some_and(|l| l.starts_with("steel")));

        let row = MaterialRow::from(&steel);
        let json = serde_json::to_value(row).expect("json");
        assert_eq!(json["rho"], 7850.0);
    }
}
