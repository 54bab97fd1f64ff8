//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash identifying types (including the synthetic type
//! every augmentation unit declares) and members. Hashes are computed from
//! qualified names, so a reference can be hashed before the type it names has
//! been registered. That is what lets extended-type references be resolved
//! after every file has been declared.
//!
//! # Examples
//!
//! ```
//! use augment_core::TypeHash;
//!
//! let a = TypeHash::from_name("Geometry::Point");
//! let b = TypeHash::from_name("Geometry::Point");
//! assert_eq!(a, b);
//!
//! let m1 = TypeHash::from_member(a, "Length", 0);
//! let m2 = TypeHash::from_member(a, "Length", 1);
//! assert_ne!(m1, m2);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for path components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for member hashes.
    pub const MEMBER: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for identifier hashes.
    pub const IDENT: u64 = 0x1a095090689d4647;
}

/// A deterministic 64-bit hash identifying a type or member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name such as `"Game::Player"`.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a member hash from its owner, name and declared parameter count.
    #[inline]
    pub fn from_member(owner: TypeHash, name: &str, param_count: usize) -> Self {
        let hash = hash_constants::MEMBER ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        TypeHash(
            hash.wrapping_mul(hash_constants::SEP)
                .wrapping_add(param_count as u64),
        )
    }

    /// Create a hash for a bare identifier.
    #[inline]
    pub fn from_ident(name: &str) -> Self {
        TypeHash(hash_constants::IDENT ^ xxh64(name.as_bytes(), 0))
    }

    /// Whether this is the empty hash.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash(0x{:016x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

/// Well-known hashes for the built-in types.
pub mod primitives {
    use super::TypeHash;
    use xxhash_rust::const_xxh64::xxh64;

    const fn from_literal(name: &str) -> TypeHash {
        TypeHash(super::hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    pub const VOID: TypeHash = from_literal("void");
    pub const BOOL: TypeHash = from_literal("bool");
    pub const INT: TypeHash = from_literal("int");
    pub const DOUBLE: TypeHash = from_literal("double");
    pub const STRING: TypeHash = from_literal("string");
    pub const OBJECT: TypeHash = from_literal("object");

    /// Names and hashes of every built-in type, in registration order.
    pub const ALL: [(&str, TypeHash); 6] = [
        ("void", VOID),
        ("bool", BOOL),
        ("int", INT),
        ("double", DOUBLE),
        ("string", STRING),
        ("object", OBJECT),
    ];
}
