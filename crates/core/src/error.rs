//! Error types for declaration generation.

use std::path::PathBuf;

/// Errors that abort a generation run.
///
/// There is no local recovery path: every variant surfaces to the caller and
/// the run either completes fully or stops at the first failure.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// A value type has no entry in the type table and is not an enumeration.
    #[error("operation '{nickname}': argument '{property}' has unknown value type '{value_type}'")]
    UnknownType {
        /// Nickname of the operation being declared.
        nickname: String,
        /// Name of the offending argument, as reported by the registry.
        property: String,
        /// The unresolved value-type identifier.
        value_type: String,
    },

    /// The registry could not answer a query.
    #[error("registry access failed: {0}")]
    RegistryAccess(String),

    /// A registry manifest could not be read or is malformed.
    #[error("invalid registry manifest {}: {message}", path.display())]
    Manifest {
        /// Path of the manifest file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// A generator configuration file could not be read or is malformed.
    #[error("invalid generator config {}: {message}", path.display())]
    Config {
        /// Path of the configuration file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Writing a declaration to its sink failed.
    #[error("failed to write declaration: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand for results produced by this crate.
pub type Result<T> = std::result::Result<T, GenerateError>;
