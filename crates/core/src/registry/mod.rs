//! Read-only interface to an introspectable operation registry.
//!
//! The generator never reflects over a host object system. Everything it
//! knows about operations comes through [`OperationRegistry`], which an
//! adapter implements over whatever introspection the host provides. The
//! [`manifest`] module is the adapter shipped with this crate.

pub mod manifest;

use bitflags::bitflags;

use crate::error::Result;

bitflags! {
    /// Flags attached to an operation argument.
    ///
    /// `INPUT` and `OUTPUT` are disjoint in well-formed registries.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ArgumentFlags: u8 {
        /// The argument must be supplied.
        const REQUIRED = 1;
        /// The argument is set at construction time.
        const CONSTRUCT = 1 << 1;
        /// The argument is read by the operation.
        const INPUT = 1 << 2;
        /// The argument is written by the operation.
        const OUTPUT = 1 << 3;
        /// The argument is kept for compatibility only.
        const DEPRECATED = 1 << 4;
        /// The argument is modified in place.
        const MODIFY = 1 << 5;
    }
}

/// How a value-type identifier should be translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTypeKind {
    /// An enumeration; its declared name is used as the target type.
    Enum,
    /// Any other type; looked up in the type table.
    Primitive,
}

/// An argument as listed by the registry, before flags and priority are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Argument name. May contain `-`.
    pub name: String,
    /// Value-type identifier, e.g. `VipsImage` or `gdouble`.
    pub value_type: String,
}

impl Property {
    /// Create a property from a name and a value-type identifier.
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
        }
    }
}

/// The queries the generator needs from an operation registry.
///
/// Classes form a single-rooted tree; `children` must return them in
/// registration order, which fixes the traversal order of a run.
pub trait OperationRegistry {
    /// Handle to a node of the class tree.
    type Class;
    /// Handle to an instantiated concrete operation.
    type Operation;

    /// The root of the operation class tree.
    fn root(&self) -> Result<Self::Class>;

    /// Whether `class` is abstract and therefore never declared.
    fn is_abstract(&self, class: &Self::Class) -> Result<bool>;

    /// Direct subclasses of `class`, in registration order.
    fn children(&self, class: &Self::Class) -> Result<Vec<Self::Class>>;

    /// Build an operation for a concrete class.
    fn instantiate(&self, class: &Self::Class) -> Result<Self::Operation>;

    /// All arguments of an operation, in registration order.
    fn properties(&self, operation: &Self::Operation) -> Result<Vec<Property>>;

    /// Flags of the named argument.
    fn flags(&self, operation: &Self::Operation, property: &str) -> Result<ArgumentFlags>;

    /// Priority of the named argument. Lower sorts first.
    fn priority(&self, operation: &Self::Operation, property: &str) -> Result<i32>;

    /// Canonical short name of `class`, used as the function name.
    fn nickname(&self, class: &Self::Class) -> Result<String>;

    /// Classify a value-type identifier.
    fn value_type_kind(&self, value_type: &str) -> ValueTypeKind;
}
