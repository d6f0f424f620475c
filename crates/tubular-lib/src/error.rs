use thiserror::Error;

/// Convenient result alias for the tubular member library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A section height, wall thickness or outer dimension is not strictly positive.
    #[error("invalid geometry in section {index}: {message}")]
    InvalidGeometry { index: usize, message: String },

    /// A position falls outside the axis or before the first registry key.
    #[error("position {position} is out of range: {message}")]
    OutOfRange { position: f64, message: String },

    /// A property-weighted average hit a zero footprint (e.g. zero total wall thickness).
    #[error("degenerate section {index}: {message}")]
    DegenerateSection { index: usize, message: String },

    /// Raised when a layer or ballast references a material missing from the catalog.
    #[error("unknown material: {name}")]
    UnknownMaterial { name: String },

    /// Raised when material data fails validation.
    #[error("invalid material data: {message}")]
    MaterialDataValidation { message: String },

    /// Raised when duplicate material names are encountered during catalog load.
    #[error("duplicate material name encountered: {name}")]
    DuplicateMaterialName { name: String },

    /// Raised when a member definition is internally inconsistent.
    #[error("invalid member definition: {message}")]
    MemberDefinition { message: String },

    /// Raised when the exported node count exceeds the fixed table capacity.
    #[error("{count} nodes exceed the section table capacity of {capacity}")]
    CapacityExceeded { count: usize, capacity: usize },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
