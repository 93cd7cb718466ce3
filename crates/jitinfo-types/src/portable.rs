//! Portable type tags.
//!
//! The closed set of type descriptors handed across the system boundary.
//! Tags are plain values: two composite tags are equal iff they are
//! structurally equal.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::internal::Qualifiers;

/// Signedness of an integer tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Signedness {
    Signed,
    Unsigned,
}

impl Signedness {
    pub fn from_unsigned(unsigned: bool) -> Self {
        if unsigned {
            Signedness::Unsigned
        } else {
            Signedness::Signed
        }
    }
}

/// Integer widths a portable tag can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
    W128,
}

impl IntWidth {
    /// The integer width occupying exactly `bytes` bytes, if one exists.
    pub fn from_bytes(bytes: u64) -> Option<Self> {
        match bytes {
            1 => Some(IntWidth::W8),
            2 => Some(IntWidth::W16),
            4 => Some(IntWidth::W32),
            8 => Some(IntWidth::W64),
            16 => Some(IntWidth::W128),
            _ => None,
        }
    }

    pub fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
            IntWidth::W128 => 128,
        }
    }

    pub fn bytes(self) -> u64 {
        u64::from(self.bits() / 8)
    }
}

/// Binary floating-point widths a portable tag can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FloatWidth {
    F16,
    F32,
    F64,
    /// x87 extended precision.
    F80,
    F128,
}

impl FloatWidth {
    pub fn bits(self) -> u32 {
        match self {
            FloatWidth::F16 => 16,
            FloatWidth::F32 => 32,
            FloatWidth::F64 => 64,
            FloatWidth::F80 => 80,
            FloatWidth::F128 => 128,
        }
    }
}

/// A portable type tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PortableType {
    Void,
    /// Generic untyped pointer.
    VoidPtr,
    Bool,
    Int {
        width: IntWidth,
        signedness: Signedness,
    },
    /// The target's distinguished size type.
    SizeT,
    Char,
    SignedChar,
    UnsignedChar,
    Float(FloatWidth),
    BFloat16,
    Complex(FloatWidth),
    Pointer(Box<PortableType>),
    Const(Box<PortableType>),
    Volatile(Box<PortableType>),
    Vector {
        element: Box<PortableType>,
        lanes: u64,
    },
}

impl PortableType {
    pub const fn int(width: IntWidth, signedness: Signedness) -> Self {
        PortableType::Int { width, signedness }
    }

    pub const fn i8() -> Self {
        Self::int(IntWidth::W8, Signedness::Signed)
    }

    pub const fn i16() -> Self {
        Self::int(IntWidth::W16, Signedness::Signed)
    }

    pub const fn i32() -> Self {
        Self::int(IntWidth::W32, Signedness::Signed)
    }

    pub const fn i64() -> Self {
        Self::int(IntWidth::W64, Signedness::Signed)
    }

    pub const fn i128() -> Self {
        Self::int(IntWidth::W128, Signedness::Signed)
    }

    pub const fn u8() -> Self {
        Self::int(IntWidth::W8, Signedness::Unsigned)
    }

    pub const fn u16() -> Self {
        Self::int(IntWidth::W16, Signedness::Unsigned)
    }

    pub const fn u32() -> Self {
        Self::int(IntWidth::W32, Signedness::Unsigned)
    }

    pub const fn u64() -> Self {
        Self::int(IntWidth::W64, Signedness::Unsigned)
    }

    pub const fn u128() -> Self {
        Self::int(IntWidth::W128, Signedness::Unsigned)
    }

    pub const fn f32() -> Self {
        PortableType::Float(FloatWidth::F32)
    }

    pub const fn f64() -> Self {
        PortableType::Float(FloatWidth::F64)
    }

    /// `pointer-to(self)`.
    pub fn pointer(self) -> Self {
        PortableType::Pointer(Box::new(self))
    }

    /// `const(self)`.
    pub fn konst(self) -> Self {
        PortableType::Const(Box::new(self))
    }

    /// `volatile(self)`.
    pub fn volatile(self) -> Self {
        PortableType::Volatile(Box::new(self))
    }

    /// `vector-of(self, lanes)`.
    pub fn vector(self, lanes: u64) -> Self {
        PortableType::Vector {
            element: Box::new(self),
            lanes,
        }
    }

    /// Re-apply the qualifiers of an internal type: const first, then volatile.
    ///
    /// Restrict has no portable counterpart and is dropped.
    pub fn with_qualifiers(self, quals: Qualifiers) -> Self {
        let mut ty = self;
        if quals.contains(Qualifiers::CONST) {
            ty = ty.konst();
        }
        if quals.contains(Qualifiers::VOLATILE) {
            ty = ty.volatile();
        }
        ty
    }

    /// Strip const/volatile wrappers from the outer level.
    pub fn strip_qualifiers(&self) -> &PortableType {
        match self {
            PortableType::Const(inner) | PortableType::Volatile(inner) => inner.strip_qualifiers(),
            other => other,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, PortableType::Void)
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self.strip_qualifiers(),
            PortableType::Int { .. }
                | PortableType::SizeT
                | PortableType::Char
                | PortableType::SignedChar
                | PortableType::UnsignedChar
        )
    }

    pub fn is_floating(&self) -> bool {
        matches!(
            self.strip_qualifiers(),
            PortableType::Float(_) | PortableType::BFloat16
        )
    }

    pub fn is_pointer(&self) -> bool {
        matches!(
            self.strip_qualifiers(),
            PortableType::Pointer(_) | PortableType::VoidPtr
        )
    }
}

impl fmt::Display for PortableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortableType::Void => write!(f, "void"),
            PortableType::VoidPtr => write!(f, "void *"),
            PortableType::Bool => write!(f, "bool"),
            PortableType::Int { width, signedness } => match signedness {
                Signedness::Signed => write!(f, "int{}_t", width.bits()),
                Signedness::Unsigned => write!(f, "uint{}_t", width.bits()),
            },
            PortableType::SizeT => write!(f, "size_t"),
            PortableType::Char => write!(f, "char"),
            PortableType::SignedChar => write!(f, "signed char"),
            PortableType::UnsignedChar => write!(f, "unsigned char"),
            PortableType::Float(FloatWidth::F32) => write!(f, "float"),
            PortableType::Float(FloatWidth::F64) => write!(f, "double"),
            PortableType::Float(FloatWidth::F80) => write!(f, "__float80"),
            PortableType::Float(width) => write!(f, "_Float{}", width.bits()),
            PortableType::BFloat16 => write!(f, "__bf16"),
            PortableType::Complex(FloatWidth::F32) => write!(f, "_Complex float"),
            PortableType::Complex(FloatWidth::F64) => write!(f, "_Complex double"),
            PortableType::Complex(width) => write!(f, "_Complex _Float{}", width.bits()),
            PortableType::Pointer(inner) => write!(f, "{inner} *"),
            // A qualified pointer puts its qualifier after the star.
            PortableType::Const(inner) if inner.is_pointer() => write!(f, "{inner} const"),
            PortableType::Const(inner) => write!(f, "const {inner}"),
            PortableType::Volatile(inner) if inner.is_pointer() => write!(f, "{inner} volatile"),
            PortableType::Volatile(inner) => write!(f, "volatile {inner}"),
            PortableType::Vector { element, lanes } => write!(f, "vector({element}, {lanes})"),
        }
    }
}
