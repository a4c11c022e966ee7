//! Modifier flags for declared members.
//!
//! # Key Types
//! - [`MethodModifiers`]: flags of a declared method
//! - [`FieldModifiers`]: flags of a declared field

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Method modifiers and properties
    pub struct MethodModifiers: u32 {
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Compiler-generated forwarding method produced by generic erasure
        const BRIDGE = 0x0040;
        /// Method was generated, not written by the user
        const SYNTHETIC = 0x1000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Field modifiers and properties
    pub struct FieldModifiers: u32 {
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init
        const FINAL = 0x0020;
        /// Field was generated, e.g. a back-reference to an enclosing instance
        const SYNTHETIC = 0x1000;
    }
}

impl FieldModifiers {
    /// Returns true for type-level immutable fields (compile time constants)
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.contains(FieldModifiers::STATIC | FieldModifiers::FINAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_constant() {
        assert!((FieldModifiers::STATIC | FieldModifiers::FINAL).is_constant());
        assert!(!FieldModifiers::FINAL.is_constant());
        assert!(!FieldModifiers::STATIC.is_constant());
        assert!(!FieldModifiers::empty().is_constant());
    }

    #[test]
    fn test_method_modifiers() {
        let flags = MethodModifiers::BRIDGE | MethodModifiers::SYNTHETIC;
        assert!(flags.contains(MethodModifiers::BRIDGE));
        assert!(!flags.contains(MethodModifiers::ABSTRACT));
        assert_eq!(MethodModifiers::default(), MethodModifiers::empty());
    }
}
