//! Static registry of the scalar types the language knows about.
//!
//! `int` is registered with the width of a pointer so every stack slot and
//! every pointer-arithmetic step is a uniform 8 bytes.

use std::fmt;

/// Size in bytes of any pointer.
pub const POINTER_SIZE: i64 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Int,
}

#[derive(Debug, PartialEq, Eq)]
pub struct TypeInfo {
    pub kind: TypeKind,
    pub name: &'static str,
    pub size: i64,
}

static TYPE_TABLE: [TypeInfo; 1] = [TypeInfo {
    kind: TypeKind::Int,
    name: "int",
    size: 8,
}];

impl TypeKind {
    pub fn info(self) -> &'static TypeInfo {
        match self {
            Self::Int => &TYPE_TABLE[0],
        }
    }

    pub fn size(self) -> i64 {
        self.info().size
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Resolves a type keyword spelled in source.
    pub fn from_keyword(word: &str) -> Option<Self> {
        TYPE_TABLE
            .iter()
            .find(|info| info.name == word)
            .map(|info| info.kind)
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_is_pointer_sized() {
        let info = TypeKind::Int.info();
        assert_eq!(info.name, "int");
        assert_eq!(info.size, POINTER_SIZE);
    }

    #[test]
    fn keyword_lookup() {
        assert_eq!(TypeKind::from_keyword("int"), Some(TypeKind::Int));
        assert_eq!(TypeKind::from_keyword("long"), None);
        assert_eq!(TypeKind::Int.to_string(), "int");
    }
}
