//! The back end's well-known canonical type nodes.
//!
//! Built once per arena from its [`DataModel`](crate::model::DataModel).
//! Consumers match these by identity, never by width.

use crate::internal::{Qualifiers, TypeArena, TypeId};

/// Handles to the canonical nodes of one arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanonicalTypes {
    pub void: TypeId,
    /// `void *`
    pub ptr: TypeId,
    /// `const void *`
    pub const_ptr: TypeId,
    pub boolean: TypeId,
    pub char: TypeId,
    pub signed_char: TypeId,
    pub unsigned_char: TypeId,
    /// The unsigned 8-bit machine integer, distinct from `unsigned char`.
    pub unsigned_qi: TypeId,
    pub short: TypeId,
    pub unsigned_short: TypeId,
    pub int: TypeId,
    pub unsigned_int: TypeId,
    pub long: TypeId,
    pub unsigned_long: TypeId,
    pub long_long: TypeId,
    pub unsigned_long_long: TypeId,
    pub int128: TypeId,
    pub uint128: TypeId,
    pub size: TypeId,
    pub float: TypeId,
    pub double: TypeId,
    pub long_double: TypeId,
    pub float16: TypeId,
    pub float32: TypeId,
    pub float64: TypeId,
    pub float128: TypeId,
    pub bfloat16: TypeId,
    pub complex_float: TypeId,
    pub complex_double: TypeId,
    pub complex_long_double: TypeId,
}

impl CanonicalTypes {
    /// Build the canonical nodes into `arena`.
    pub fn install(arena: &mut TypeArena) -> Self {
        let model = *arena.model();

        let void = arena.make_void();
        let const_void = arena.qualified(void, Qualifiers::CONST);
        let ptr = arena.pointer_to(void);
        let const_ptr = arena.pointer_to(const_void);

        let boolean = arena.make_boolean(1, "bool");
        let char = arena.make_integer(1, !model.char_is_signed, "char");
        let signed_char = arena.make_integer(1, false, "signed char");
        let unsigned_char = arena.make_integer(1, true, "unsigned char");
        let unsigned_qi = arena.make_integer(1, true, "unsigned QI");
        let short = arena.make_integer(2, false, "short");
        let unsigned_short = arena.make_integer(2, true, "unsigned short");
        let int = arena.make_integer(model.int_bytes, false, "int");
        let unsigned_int = arena.make_integer(model.int_bytes, true, "unsigned int");
        let long = arena.make_integer(model.long_bytes, false, "long");
        let unsigned_long = arena.make_integer(model.long_bytes, true, "unsigned long");
        let long_long = arena.make_integer(model.long_long_bytes, false, "long long");
        let unsigned_long_long =
            arena.make_integer(model.long_long_bytes, true, "unsigned long long");
        let int128 = arena.make_integer(16, false, "__int128");
        let uint128 = arena.make_integer(16, true, "unsigned __int128");
        let size = arena.make_integer(model.pointer_bytes, true, "size_t");

        let float = arena.make_real(4, "float");
        let double = arena.make_real(8, "double");
        let long_double = arena.make_real(model.long_double_bytes, "long double");
        let float16 = arena.make_real(2, "_Float16");
        let float32 = arena.make_real(4, "_Float32");
        let float64 = arena.make_real(8, "_Float64");
        let float128 = arena.make_real(16, "_Float128");
        let bfloat16 = arena.make_real(2, "__bf16");

        let complex_float = arena.make_complex(float, "_Complex float");
        let complex_double = arena.make_complex(double, "_Complex double");
        let complex_long_double = arena.make_complex(long_double, "_Complex long double");

        Self {
            void,
            ptr,
            const_ptr,
            boolean,
            char,
            signed_char,
            unsigned_char,
            unsigned_qi,
            short,
            unsigned_short,
            int,
            unsigned_int,
            long,
            unsigned_long,
            long_long,
            unsigned_long_long,
            int128,
            uint128,
            size,
            float,
            double,
            long_double,
            float16,
            float32,
            float64,
            float128,
            bfloat16,
            complex_float,
            complex_double,
            complex_long_double,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::TypeKind;
    use crate::model::DataModel;

    #[test]
    fn const_ptr_points_to_const_void() {
        let mut arena = TypeArena::new(DataModel::lp64_x86());
        let c = CanonicalTypes::install(&mut arena);
        match arena.kind(c.const_ptr) {
            TypeKind::Pointer { pointee } => {
                assert_eq!(arena.main_variant(*pointee), c.void);
                assert!(arena.quals(*pointee).contains(Qualifiers::CONST));
            }
            other => panic!("expected pointer, got {other:?}"),
        }
        // Rebuilding the same pointer yields the canonical node.
        let const_void = arena.qualified(c.void, Qualifiers::CONST);
        assert_eq!(arena.pointer_to(const_void), c.const_ptr);
    }

    #[test]
    fn widths_follow_data_model() {
        let mut lp64 = TypeArena::new(DataModel::lp64_x86());
        let c64 = CanonicalTypes::install(&mut lp64);
        assert_eq!(lp64.size_bytes(c64.long), Some(8));
        assert_eq!(lp64.size_bytes(c64.size), Some(8));

        let mut ilp32 = TypeArena::new(DataModel::ilp32_x86());
        let c32 = CanonicalTypes::install(&mut ilp32);
        assert_eq!(ilp32.size_bytes(c32.long), Some(4));
        assert_eq!(ilp32.size_bytes(c32.size), Some(4));
        assert_eq!(ilp32.size_bytes(c32.long_double), Some(12));
    }

    #[test]
    fn float_and_float32_are_distinct() {
        let mut arena = TypeArena::new(DataModel::lp64_aarch64());
        let c = CanonicalTypes::install(&mut arena);
        assert_ne!(c.float, c.float32);
        assert_eq!(arena.size_bytes(c.float), arena.size_bytes(c.float32));
        assert_eq!(arena.size_bytes(c.complex_double), Some(16));
    }
}
