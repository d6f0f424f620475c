//! Material table discovery.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use tubular_lib::MaterialCatalog;

/// Environment variable naming the material table.
pub const MATERIALS_ENV: &str = "TUBULAR_MATERIALS";

/// File name looked up next to the member definition and in the config dir.
pub const MATERIALS_FILENAME: &str = "materials.csv";

/// Where a material table was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// `--materials` on the command line.
    Argument(PathBuf),
    /// The [`MATERIALS_ENV`] variable.
    Environment(PathBuf),
    /// `materials.csv` in the member file's directory.
    MemberDirectory(PathBuf),
    /// `materials.csv` in the platform configuration directory.
    ConfigDirectory(PathBuf),
}

impl CatalogSource {
    pub fn path(&self) -> &Path {
        match self {
            CatalogSource::Argument(p)
            | CatalogSource::Environment(p)
            | CatalogSource::MemberDirectory(p)
            | CatalogSource::ConfigDirectory(p) => p,
        }
    }
}

/// Platform configuration path for the material table.
pub fn default_catalog_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "tubular", "tubular")
        .map(|dirs| dirs.config_dir().join(MATERIALS_FILENAME))
}

/// Pick the material table to use.
///
/// An explicit argument wins, then the environment, then a table next to the
/// member file, then the platform configuration directory. The last two are
/// only used when the file exists.
pub fn resolve_catalog(
    argument: Option<&Path>,
    environment: Option<OsString>,
    member: Option<&Path>,
) -> Option<CatalogSource> {
    if let Some(path) = argument {
        return Some(CatalogSource::Argument(path.to_path_buf()));
    }
    if let Some(value) = environment.filter(|v| !v.is_empty()) {
        return Some(CatalogSource::Environment(PathBuf::from(value)));
    }
    let sibling = member
        .and_then(Path::parent)
        .map(|dir| dir.join(MATERIALS_FILENAME))
        .filter(|p| p.is_file());
    if let Some(path) = sibling {
        return Some(CatalogSource::MemberDirectory(path));
    }
    default_catalog_path()
        .filter(|p| p.is_file())
        .map(CatalogSource::ConfigDirectory)
}

/// Resolve and load the material table.
pub fn load_catalog(argument: Option<&Path>, member: Option<&Path>) -> Result<MaterialCatalog> {
    let Some(source) = resolve_catalog(argument, std::env::var_os(MATERIALS_ENV), member) else {
        bail!(
            "no material table found; pass --materials, set {MATERIALS_ENV}, \
             or place {MATERIALS_FILENAME} next to the member file"
        );
    };
    debug!(source = ?source, "loading material table");
    let path = source.path();
    MaterialCatalog::from_path(path)
        .with_context(|| format!("failed to load material table from {}", path.display()))
}
