use std::fmt;
use std::hash::{Hash, Hasher};

/// Table byte for types declared through a [`crate::metadata::typesystem::TypeBuilder`]
pub const TABLE_TYPE_DEF: u8 = 0x02;
/// Table byte for types synthesized by the registry (array types)
pub const TABLE_TYPE_SPEC: u8 = 0x1B;
/// Table byte for the built-in primitive types
pub const TABLE_PRIMITIVE: u8 = 0xF0;

/// A token identifying a type registered in a [`crate::TypeRegistry`].
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table the type lives in
/// - The low 24 bits (bits 0-23) indicate the row within that table
///
/// Tokens are the identity the [`crate::MetadataCache`] keys its records by.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table byte and a row index
    ///
    /// ## Arguments
    /// * 'table' - The table byte (see the `TABLE_*` constants)
    /// * 'row'   - The row index, truncated to 24 bits
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if the token refers to a built-in primitive
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.table() == TABLE_PRIMITIVE
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
