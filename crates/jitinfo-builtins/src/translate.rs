//! Internal type to portable tag translation.
//!
//! Rules, tried in order:
//! 1. vectors wrap their translated element (fixed lane counts only);
//! 2. exact identity matches against the canonical nodes;
//! 3. pointers wrap their translated pointee (`void *` is the generic tag);
//! 4. qualified variants translate their main variant and re-wrap;
//! 5. other integral types map by byte width and signedness;
//! 6. other reals map by byte width (2, 4 or 8 bytes);
//! 7. anything else is unrepresentable.
//!
//! Qualifier stripping runs before the width fallbacks so that a qualified
//! canonical type (e.g. `const char`) keeps its canonical tag.

use jitinfo_types::{
    CanonicalTypes, DataModel, FloatWidth, IntWidth, PortableType, Signedness, TypeArena, TypeId,
    TypeKind,
};

use crate::error::{BuiltinError, Result};

/// Translates the types of one arena.
#[derive(Debug, Clone)]
pub struct TypeTranslator {
    canonical: Vec<(TypeId, PortableType)>,
}

impl TypeTranslator {
    /// Build the canonical table for `canon`, laid out by `model`.
    pub fn new(canon: &CanonicalTypes, model: &DataModel) -> Self {
        let mut canonical = vec![
            (canon.void, PortableType::Void),
            (canon.ptr, PortableType::VoidPtr),
            (canon.const_ptr, PortableType::Void.konst().pointer()),
            (canon.boolean, PortableType::Bool),
            (canon.char, PortableType::Char),
            (canon.signed_char, PortableType::SignedChar),
            (canon.unsigned_char, PortableType::UnsignedChar),
            (canon.unsigned_qi, PortableType::u8()),
            (canon.short, PortableType::i16()),
            (canon.unsigned_short, PortableType::u16()),
            (canon.int128, PortableType::i128()),
            (canon.uint128, PortableType::u128()),
            (canon.size, PortableType::SizeT),
            (canon.float, PortableType::f32()),
            (canon.double, PortableType::f64()),
            (canon.long_double, PortableType::Float(model.long_double)),
            (canon.float16, PortableType::Float(FloatWidth::F16)),
            (canon.float32, PortableType::f32()),
            (canon.float64, PortableType::f64()),
            (canon.float128, PortableType::Float(FloatWidth::F128)),
            (canon.bfloat16, PortableType::BFloat16),
            (canon.complex_float, PortableType::Complex(FloatWidth::F32)),
            (canon.complex_double, PortableType::Complex(FloatWidth::F64)),
            (
                canon.complex_long_double,
                PortableType::Complex(model.long_double),
            ),
        ];

        // int, long and long long take their width from the data model.
        let sized = [
            (canon.int, canon.unsigned_int, model.int_bytes),
            (canon.long, canon.unsigned_long, model.long_bytes),
            (canon.long_long, canon.unsigned_long_long, model.long_long_bytes),
        ];
        for (signed, unsigned, bytes) in sized {
            if let Some(width) = IntWidth::from_bytes(bytes) {
                canonical.push((signed, PortableType::int(width, Signedness::Signed)));
                canonical.push((unsigned, PortableType::int(width, Signedness::Unsigned)));
            }
        }

        Self { canonical }
    }

    /// The tag of a canonical node, matched by identity.
    pub fn canonical_tag(&self, id: TypeId) -> Option<&PortableType> {
        self.canonical
            .iter()
            .find(|(canonical, _)| *canonical == id)
            .map(|(_, tag)| tag)
    }

    /// Translate `id` to a portable tag.
    ///
    /// `Ok(None)` means the type is unrepresentable. `Err` is reserved for
    /// float widths the target should never produce.
    pub fn translate(&self, arena: &TypeArena, id: TypeId) -> Result<Option<PortableType>> {
        let node = arena.get(id);

        if let TypeKind::Vector { element, lanes } = node.kind {
            let Some(lanes) = lanes.to_constant() else {
                return Ok(None);
            };
            let element = self.translate(arena, element)?;
            return Ok(element.map(|tag| tag.vector(lanes).with_qualifiers(node.quals)));
        }

        if let Some(tag) = self.canonical_tag(id) {
            return Ok(Some(tag.clone()));
        }

        if let TypeKind::Pointer { pointee } = node.kind {
            let target = if is_plain_void(arena, pointee) {
                Some(PortableType::VoidPtr)
            } else {
                self.translate(arena, pointee)?.map(PortableType::pointer)
            };
            return Ok(target.map(|tag| tag.with_qualifiers(node.quals)));
        }

        if !node.quals.is_empty() {
            let main = self.translate(arena, node.main_variant)?;
            return Ok(main.map(|tag| tag.with_qualifiers(node.quals)));
        }

        if node.kind.is_integral() {
            let signedness = Signedness::from_unsigned(node.kind.is_unsigned());
            return Ok(node
                .size_bytes
                .and_then(IntWidth::from_bytes)
                .map(|width| PortableType::int(width, signedness)));
        }

        if node.kind == TypeKind::Real {
            return match node.size_bytes {
                Some(2) => Ok(Some(PortableType::Float(FloatWidth::F16))),
                Some(4) => Ok(Some(PortableType::f32())),
                Some(8) => Ok(Some(PortableType::f64())),
                other => Err(BuiltinError::UnsupportedFloatWidth {
                    bytes: other.unwrap_or(0),
                }),
            };
        }

        Ok(None)
    }
}

fn is_plain_void(arena: &TypeArena, id: TypeId) -> bool {
    *arena.kind(id) == TypeKind::Void && arena.quals(id).is_empty()
}
