//! Material catalog loading and layered-wall homogenization.
//!
//! Materials are read from a CSV table (one isotropic material per row). A
//! member wall made of several layers is collapsed into a single effective
//! material per section: density is thickness weighted, unit cost is mass
//! weighted and the strength/stiffness properties use the mean of the Voigt
//! and Reuss bounds (rule of mixtures).

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::interp::nodal_to_sectional;

/// Isotropic material properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Young's modulus (Pa).
    pub e: f64,
    /// Shear modulus (Pa).
    pub g: f64,
    /// Yield stress (Pa).
    pub sigma_y: f64,
    /// Ultimate stress (Pa).
    pub sigma_ult: f64,
    /// Density (kg/m^3).
    pub rho: f64,
    /// Raw material cost (USD/kg).
    pub unit_cost: f64,
}

impl Material {
    /// Validate material properties for correctness.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::MaterialDataValidation {
                message: "material name must not be empty".to_string(),
            });
        }

        let positive = [
            (self.e, "e"),
            (self.g, "g"),
            (self.sigma_y, "sigma_y"),
            (self.sigma_ult, "sigma_ult"),
            (self.rho, "rho"),
        ];
        for (value, field) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::MaterialDataValidation {
                    message: format!(
                        "{field} of material '{}' must be a finite positive number",
                        self.name
                    ),
                });
            }
        }

        if !self.unit_cost.is_finite() || self.unit_cost < 0.0 {
            return Err(Error::MaterialDataValidation {
                message: format!(
                    "unit_cost of material '{}' must be finite and non-negative",
                    self.name
                ),
            });
        }

        Ok(())
    }
}

/// Collection of materials loaded from a CSV file.
#[derive(Debug, Clone, Default)]
pub struct MaterialCatalog {
    materials: HashMap<String, Material>,
    source: Option<PathBuf>,
}

impl MaterialCatalog {
    /// Build a catalog from materials already in memory.
    pub fn from_materials<I>(materials: I) -> Result<Self>
    where
        I: IntoIterator<Item = Material>,
    {
        let mut catalog = Self::default();
        for material in materials {
            catalog.insert(material)?;
        }
        Ok(catalog)
    }

    /// Load a material catalog from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Load a material catalog from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader.headers()?.clone();

        let normalize = |s: &str| {
            s.to_ascii_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        };
        let normalized_headers: Vec<String> = headers.iter().map(&normalize).collect();

        let synonyms: &[(&str, &[&str])] = &[
            ("name", &["name", "material", "material_name"]),
            ("e", &["e", "youngs_modulus", "e_pa", "modulus"]),
            ("g", &["g", "shear_modulus", "g_pa"]),
            ("sigma_y", &["sigma_y", "yield_stress", "sigy", "fy"]),
            ("sigma_ult", &["sigma_ult", "ultimate_stress", "sigu", "fu"]),
            ("rho", &["rho", "density", "rho_kg_m3"]),
            ("unit_cost", &["unit_cost", "cost", "cost_usd_kg"]),
        ];

        let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();
        for (canon, alts) in synonyms {
            if let Some(i) = alts.iter().find_map(|alt| {
                let alt_n = normalize(alt);
                normalized_headers.iter().position(|h| *h == alt_n)
            }) {
                index_map.insert(*canon, i);
            }
        }

        let missing: Vec<&str> = synonyms
            .iter()
            .map(|(canon, _)| *canon)
            .filter(|c| !index_map.contains_key(c))
            .collect();
        if !missing.is_empty() {
            return Err(Error::MaterialDataValidation {
                message: format!(
                    "material table missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers.iter().collect::<Vec<_>>().join(", ")
                ),
            });
        }

        let mut catalog = Self::default();
        for (offset, result) in csv_reader.records().enumerate() {
            let record = result?;
            let row = offset + 2;

            let get = |field: &str| -> Option<&str> {
                index_map.get(field).and_then(|&i| record.get(i))
            };
            let name = get("name").unwrap_or_default().to_string();
            let number = |field: &str| -> Result<f64> {
                get(field)
                    .ok_or_else(|| Error::MaterialDataValidation {
                        message: format!("missing {field} for material '{name}' at row {row}"),
                    })?
                    .parse::<f64>()
                    .map_err(|e| Error::MaterialDataValidation {
                        message: format!("invalid {field} for material '{name}' at row {row}: {e}"),
                    })
            };

            let material = Material {
                e: number("e")?,
                g: number("g")?,
                sigma_y: number("sigma_y")?,
                sigma_ult: number("sigma_ult")?,
                rho: number("rho")?,
                unit_cost: number("unit_cost")?,
                name,
            };
            catalog.insert(material)?;
        }

        Ok(catalog)
    }

    fn insert(&mut self, material: Material) -> Result<()> {
        material.validate()?;
        let key = normalize_name(&material.name);
        if self.materials.contains_key(&key) {
            return Err(Error::DuplicateMaterialName { name: key });
        }
        self.materials.insert(key, material);
        Ok(())
    }

    /// Get a material by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(&normalize_name(name))
    }

    /// Get a material by name or fail with [`Error::UnknownMaterial`].
    pub fn require(&self, name: &str) -> Result<&Material> {
        self.get(name).ok_or_else(|| Error::UnknownMaterial {
            name: name.to_string(),
        })
    }

    /// Get all materials sorted by name.
    pub fn materials_sorted(&self) -> Vec<&Material> {
        let mut materials: Vec<&Material> = self.materials.values().collect();
        materials.sort_by(|a, b| a.name.cmp(&b.name));
        materials
    }

    /// Get the source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Density and unit cost of a ballast material.
    ///
    /// Names containing "water" (and the empty name) resolve to the supplied
    /// water density at zero cost.
    pub fn ballast_properties(&self, name: &str, water_density: f64) -> Result<(f64, f64)> {
        let trimmed = name.trim();
        if trimmed.is_empty() || trimmed.to_ascii_lowercase().contains("water") {
            return Ok((water_density, 0.0));
        }
        let material = self.require(trimmed)?;
        Ok((material.rho, material.unit_cost))
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// One wall layer: a material and its thickness at each control point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub material: String,
    pub thickness: Vec<f64>,
}

/// Effective homogenized material of one section.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SectionMaterial {
    pub rho: f64,
    pub e: f64,
    pub g: f64,
    pub sigma_y: f64,
    pub sigma_ult: f64,
    pub unit_cost: f64,
}

/// Homogenized wall of a member: total thickness and material per section.
#[derive(Debug, Clone, PartialEq)]
pub struct Layup {
    pub thickness: Vec<f64>,
    pub materials: Vec<SectionMaterial>,
}

/// Collapse layered walls into one thickness and material per section.
///
/// Layer thicknesses are nodal (one value per control point) and averaged
/// onto the `node_count - 1` sections. When `modulus_override` exceeds 1 Pa
/// it replaces the modulus of every layer.
pub fn homogenize_layers(
    layers: &[Layer],
    catalog: &MaterialCatalog,
    modulus_override: Option<f64>,
    node_count: usize,
) -> Result<Layup> {
    let sections = node_count.saturating_sub(1);
    if layers.is_empty() {
        return Err(Error::MemberDefinition {
            message: "member wall needs at least one layer".to_string(),
        });
    }

    let mut resolved = Vec::with_capacity(layers.len());
    for layer in layers {
        if layer.thickness.len() != node_count {
            return Err(Error::MemberDefinition {
                message: format!(
                    "layer '{}' has {} thickness values, expected {node_count}",
                    layer.material,
                    layer.thickness.len()
                ),
            });
        }
        if let Some(index) = layer.thickness.iter().position(|t| !t.is_finite() || *t < 0.0) {
            return Err(Error::InvalidGeometry {
                index,
                message: format!("layer '{}' thickness must be non-negative", layer.material),
            });
        }
        let material = catalog.require(&layer.material)?;
        resolved.push((material, nodal_to_sectional(&layer.thickness)));
    }

    let e_override = modulus_override.filter(|e| *e > 1.0);

    let mut thickness = Vec::with_capacity(sections);
    let mut materials = Vec::with_capacity(sections);
    for k in 0..sections {
        let total: f64 = resolved.iter().map(|(_, t)| t[k]).sum();
        if total <= 0.0 {
            return Err(Error::DegenerateSection {
                index: k,
                message: "total wall thickness is zero".to_string(),
            });
        }

        let mass: f64 = resolved.iter().map(|(m, t)| m.rho * t[k]).sum();
        let cost: f64 = resolved.iter().map(|(m, t)| m.rho * t[k] * m.unit_cost).sum();

        let mix = |value: &dyn Fn(&Material) -> f64| -> Result<f64> {
            let mut voigt = 0.0;
            let mut reuss = 0.0;
            for (material, t) in &resolved {
                let fraction = t[k] / total;
                let v = value(material);
                if fraction > 0.0 && v <= 0.0 {
                    return Err(Error::DegenerateSection {
                        index: k,
                        message: format!("material '{}' has a non-positive property", material.name),
                    });
                }
                voigt += fraction * v;
                if fraction > 0.0 {
                    reuss += fraction / v;
                }
            }
            Ok(0.5 * voigt + 0.5 / reuss)
        };

        materials.push(SectionMaterial {
            rho: mass / total,
            e: mix(&|m: &Material| e_override.unwrap_or(m.e))?,
            g: mix(&|m: &Material| m.g)?,
            sigma_y: mix(&|m: &Material| m.sigma_y)?,
            sigma_ult: mix(&|m: &Material| m.sigma_ult)?,
            unit_cost: cost / mass,
        });
        thickness.push(total);
    }

    Ok(Layup {
        thickness,
        materials,
    })
}
