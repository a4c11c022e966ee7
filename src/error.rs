use thiserror::Error;

use crate::reflection::AccessorKind;

macro_rules! invocation_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Invocation {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Invocation {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Building type metadata never fails on its own, conflicts found while reflecting a type are
/// encoded into the resulting record and only surface here when the offending accessor is
/// actually used.
///
/// # Error Categories
///
/// ## Lookup Errors
/// - [`Error::PropertyNotFound`] - No accessor for a property in the requested direction
/// - [`Error::NoDefaultConstructor`] - The type cannot be created without arguments
///
/// ## Invocation Errors
/// - [`Error::AmbiguousAccessor`] - The accessor was flagged ambiguous while reflecting
/// - [`Error::TargetMismatch`] - The receiver is not an instance of the expected Rust type
/// - [`Error::ArgumentMismatch`] - A passed value is not of the expected Rust type
/// - [`Error::Invocation`] - Arity errors, abstract bodies, read-only storage
///
/// ## Type System Errors
/// - [`Error::TypeInsert`] - Failed to register a new type in the registry
/// - [`Error::TypeNotFound`] - Requested type is not registered
///
/// # Examples
///
/// ```rust
/// use ormscope::{Error, MetadataCache, TypeRegistry};
/// use std::sync::Arc;
///
/// let cache = MetadataCache::new(Arc::new(TypeRegistry::new()));
/// let metadata = cache.metadata(&cache.registry().object());
///
/// match metadata.get_invoker("missing") {
///     Err(Error::PropertyNotFound { property, .. }) => assert_eq!(property, "missing"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A caller requested the default constructor of a type that has none.
    ///
    /// The associated value is the full name of the type.
    #[error("There is no default constructor for '{0}'")]
    NoDefaultConstructor(String),

    /// A queried property does not exist in the requested direction.
    #[error("There is no {kind} for property named '{property}' in '{type_name}'")]
    PropertyNotFound {
        /// Whether a getter or a setter was requested
        kind: AccessorKind,
        /// The property name that was requested
        property: String,
        /// The full name of the reflected type
        type_name: String,
    },

    /// The accessor was flagged ambiguous while the metadata record was built.
    ///
    /// The message names the property, the declaring type and both conflicting
    /// declarations.
    #[error("{0}")]
    AmbiguousAccessor(String),

    /// The receiver passed to an invoker is not an instance of the expected Rust type.
    #[error("Invocation target is not an instance of '{expected}'")]
    TargetMismatch {
        /// Rust type name the accessor was registered for
        expected: &'static str,
    },

    /// A value passed to an invoker is not of the expected Rust type.
    #[error("Argument is not an instance of '{expected}'")]
    ArgumentMismatch {
        /// Rust type name the accessor expects
        expected: &'static str,
    },

    /// Invoking an accessor or constructor failed.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of the failure
    /// * `file` - Source file where the error was raised
    /// * `line` - Source line where the error was raised
    #[error("Invocation - {file}:{line}: {message}")]
    Invocation {
        /// The message to be printed for the Invocation error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Failed to insert a new type into the `TypeRegistry`.
    ///
    /// Raised when a full name or a Rust type is registered twice.
    #[error("Failed to insert new type into TypeRegistry - {0}")]
    TypeInsert(String),

    /// Failed to find a type in the `TypeRegistry`.
    #[error("Failed to find type in TypeRegistry - {0}")]
    TypeNotFound(String),
}
