//! Ordered registry of cross-sections keyed by axial position.
//!
//! Keys are kept in a sorted vector with a parallel vector of sections. The
//! section stored at key `s_i` applies to the interval `[s_i, s_{i+1})`; the
//! last key is a terminal marker and carries no section.

use serde::Serialize;
use tracing::warn;

use crate::constants::{NODE_TOLERANCE, NULL_SENTINEL};
use crate::error::{Error, Result};
use crate::section::{CrossSection, SectionKind, SectionShape};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionRegistry {
    keys: Vec<f64>,
    sections: Vec<Option<CrossSection>>,
}

impl SectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted axial positions, terminal key included.
    pub fn positions(&self) -> &[f64] {
        &self.keys
    }

    /// Number of keys (interval count + 1 once non-empty).
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn interval_count(&self) -> usize {
        self.keys.len().saturating_sub(1)
    }

    /// Exact or tolerance match of `s` against the keys.
    ///
    /// `Ok(i)` when key `i` equals `s` within [`NODE_TOLERANCE`], otherwise
    /// `Err(i)` with the insertion index.
    fn find(&self, s: f64) -> std::result::Result<usize, usize> {
        let idx = self.keys.partition_point(|&k| k < s);
        if idx < self.keys.len() && (self.keys[idx] - s).abs() <= NODE_TOLERANCE {
            return Ok(idx);
        }
        if idx > 0 && (s - self.keys[idx - 1]).abs() <= NODE_TOLERANCE {
            return Ok(idx - 1);
        }
        Err(idx)
    }

    /// Append the interval `[s0, s1)` holding `section` to the right end.
    ///
    /// Only valid while building the initial partition: `s0` must be the
    /// current terminal key (or the registry must be empty).
    pub fn add_section(&mut self, s0: f64, s1: f64, section: CrossSection) -> Result<()> {
        if s1 - s0 <= NODE_TOLERANCE {
            return Err(Error::OutOfRange {
                position: s1,
                message: format!("interval end must follow its start {s0}"),
            });
        }
        match self.keys.last().copied() {
            None => {
                self.keys.extend([s0, s1]);
                self.sections.extend([Some(section), None]);
            }
            Some(last) if (last - s0).abs() <= NODE_TOLERANCE => {
                let terminal = self.sections.len() - 1;
                self.sections[terminal] = Some(section);
                self.keys.push(s1);
                self.sections.push(None);
            }
            Some(last) => {
                return Err(Error::OutOfRange {
                    position: s0,
                    message: format!("partition must continue from the terminal key {last}"),
                });
            }
        }
        Ok(())
    }

    /// Insert a boundary at `s`, splitting the interval that contains it.
    ///
    /// The new node receives a copy of the enclosing interval's section so
    /// both halves keep the pre-split properties. Inserting an existing key
    /// is a no-op.
    pub fn add_node(&mut self, s: f64) -> Result<()> {
        let idx = match self.find(s) {
            Ok(_) => return Ok(()),
            Err(idx) => idx,
        };
        if idx == 0 {
            return Err(Error::OutOfRange {
                position: s,
                message: match self.keys.first() {
                    Some(first) => format!("node precedes the first key {first}"),
                    None => "registry is empty".to_string(),
                },
            });
        }
        if idx == self.keys.len() {
            return Err(Error::OutOfRange {
                position: s,
                message: format!("node follows the terminal key {}", self.keys[idx - 1]),
            });
        }
        let inherited = self.sections[idx - 1];
        self.keys.insert(idx, s);
        self.sections.insert(idx, inherited);
        Ok(())
    }

    /// Make `[s0, s1)` carry `section`, superseding whatever was there.
    ///
    /// The interval right of `s1` keeps its previous properties. Boundaries
    /// strictly inside `(s0, s1)` are overwritten as well, so overlapping
    /// features resolve by last write wins.
    pub fn insert_section(&mut self, s0: f64, s1: f64, section: CrossSection) -> Result<()> {
        if s1 - s0 <= NODE_TOLERANCE {
            return Err(Error::OutOfRange {
                position: s1,
                message: format!("section end must follow its start {s0}"),
            });
        }

        self.add_node(s1)?;
        self.add_node(s0)?;

        let start = self.find(s0).unwrap_or_else(|i| i);
        let end = self.find(s1).unwrap_or_else(|i| i);
        for (key, slot) in self.keys[start..end]
            .iter()
            .zip(self.sections[start..end].iter_mut())
        {
            if let Some(previous) = slot {
                if previous.kind != SectionKind::Shell && previous.kind != section.kind {
                    warn!(
                        position = *key,
                        previous = ?previous.kind,
                        incoming = ?section.kind,
                        "feature section overwritten by overlapping insertion"
                    );
                }
            }
            *slot = Some(section);
        }
        Ok(())
    }

    /// Section governing position `s`, or `None` at/after the terminal key.
    pub fn section_at(&self, s: f64) -> Option<&CrossSection> {
        let idx = match self.find(s) {
            Ok(i) => i,
            Err(0) => return None,
            Err(i) => i - 1,
        };
        self.sections.get(idx).and_then(Option::as_ref)
    }

    /// Iterate over `(s0, s1, section)` for every defined interval.
    pub fn intervals(&self) -> impl Iterator<Item = (f64, f64, &CrossSection)> + '_ {
        self.keys
            .windows(2)
            .zip(self.sections.iter())
            .filter_map(|(w, section)| section.as_ref().map(|sec| (w[0], w[1], sec)))
    }

    /// Apply `f` to every section whose key satisfies `predicate`.
    pub(crate) fn update_where<P, F>(&mut self, predicate: P, mut f: F)
    where
        P: Fn(f64) -> bool,
        F: FnMut(&mut CrossSection),
    {
        for (key, slot) in self.keys.iter().zip(self.sections.iter_mut()) {
            if let Some(section) = slot.as_mut() {
                if predicate(*key) {
                    f(section);
                }
            }
        }
    }

    /// Apply `f` to every section whose interval lies entirely within
    /// `[s0, s1]`. No boundaries are added.
    pub(crate) fn update_within<F>(&mut self, s0: f64, s1: f64, mut f: F) -> usize
    where
        F: FnMut(&mut CrossSection),
    {
        let (lo, hi) = (s0 - NODE_TOLERANCE, s1 + NODE_TOLERANCE);
        let mut touched = 0;
        for (w, slot) in self.keys.windows(2).zip(self.sections.iter_mut()) {
            if let Some(section) = slot.as_mut() {
                if w[0] >= lo && w[1] <= hi {
                    f(section);
                    touched += 1;
                }
            }
        }
        touched
    }

    /// Export the registry as a fixed-capacity, sentinel-padded table.
    pub fn to_table(&self, capacity: usize) -> Result<SectionTable> {
        SectionTable::from_registry(self, capacity)
    }
}

/// Fixed-capacity columnar export of a registry.
///
/// Node columns have one entry per key; section columns one entry per
/// interval. Unused slots hold [`NULL_SENTINEL`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionTable {
    pub capacity: usize,
    pub s: Vec<f64>,
    pub diameter: Vec<f64>,
    pub side_a: Vec<f64>,
    pub side_b: Vec<f64>,
    pub t: Vec<f64>,
    pub area: Vec<f64>,
    pub shear_area_x: Vec<f64>,
    pub shear_area_y: Vec<f64>,
    pub ixx: Vec<f64>,
    pub iyy: Vec<f64>,
    pub j0: Vec<f64>,
    pub torsion_constant: Vec<f64>,
    pub rho: Vec<f64>,
    pub e: Vec<f64>,
    pub g: Vec<f64>,
    pub sigma_y: Vec<f64>,
}

impl SectionTable {
    fn from_registry(registry: &SectionRegistry, capacity: usize) -> Result<Self> {
        let count = registry.len();
        if count > capacity {
            return Err(Error::CapacityExceeded { count, capacity });
        }

        let column = || vec![NULL_SENTINEL; capacity];
        let mut table = Self {
            capacity,
            s: column(),
            diameter: column(),
            side_a: column(),
            side_b: column(),
            t: column(),
            area: column(),
            shear_area_x: column(),
            shear_area_y: column(),
            ixx: column(),
            iyy: column(),
            j0: column(),
            torsion_constant: column(),
            rho: column(),
            e: column(),
            g: column(),
            sigma_y: column(),
        };

        table.s[..count].copy_from_slice(registry.positions());
        for (k, (_, _, section)) in registry.intervals().enumerate() {
            match section.shape {
                SectionShape::Circular { diameter } => table.diameter[k] = diameter,
                SectionShape::Rectangular { side_a, side_b } => {
                    table.side_a[k] = side_a;
                    table.side_b[k] = side_b;
                }
            }
            let p = &section.properties;
            table.t[k] = section.t;
            table.area[k] = p.area;
            table.shear_area_x[k] = p.shear_area_x;
            table.shear_area_y[k] = p.shear_area_y;
            table.ixx[k] = p.ixx;
            table.iyy[k] = p.iyy;
            table.j0[k] = p.j0;
            table.torsion_constant[k] = p.torsion_constant;
            table.rho[k] = section.rho;
            table.e[k] = section.e;
            table.g[k] = section.g;
            table.sigma_y[k] = section.sigma_y;
        }
        Ok(table)
    }

    /// Number of exported nodes, found by scanning for the sentinel.
    pub fn node_count(&self) -> usize {
        self.s
            .iter()
            .position(|&v| v == NULL_SENTINEL)
            .unwrap_or(self.capacity)
    }
}
