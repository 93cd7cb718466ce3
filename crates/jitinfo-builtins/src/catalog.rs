//! The back end's built-in catalogue.
//!
//! Built-ins are listed per family as prototypes, each optionally gated on
//! an ISA option. The vector typedefs they use are installed into the
//! request's arena by [`install_typedefs`].

use jitinfo_targets::{TargetCapabilities, TargetFamily};
use jitinfo_types::{CanonicalTypes, LaneCount, TypeArena, TypeId};

use crate::decl::BuiltinDecl;
use crate::error::Result;
use crate::prototype::{Prototype, TypeNames};

/// One catalogued built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub prototype: &'static str,
    /// ISA option that must be enabled for the built-in to exist.
    pub requires: Option<&'static str>,
}

const fn always(prototype: &'static str) -> CatalogEntry {
    CatalogEntry {
        prototype,
        requires: None,
    }
}

const fn gated(requires: &'static str, prototype: &'static str) -> CatalogEntry {
    CatalogEntry {
        prototype,
        requires: Some(requires),
    }
}

/// Built-ins every family provides.
pub static COMMON: &[CatalogEntry] = &[
    always("void __builtin_trap(void)"),
    always("void __builtin_unreachable(void)"),
    always("int __builtin_popcount(unsigned int)"),
    always("int __builtin_popcountll(unsigned long long)"),
    always("int __builtin_clz(unsigned int)"),
    always("int __builtin_ctzll(unsigned long long)"),
    always("unsigned int __builtin_bswap32(unsigned int)"),
    always("unsigned long long __builtin_bswap64(unsigned long long)"),
    always("void *__builtin_memcpy(void *, const void *, size_t)"),
    always("void *__builtin_memset(void *, int, size_t)"),
    always("size_t __builtin_strlen(const char *)"),
    always("int __builtin_printf(const char *, ...)"),
    always("void __builtin_prefetch(const void *, ...)"),
    always("void __builtin_va_start(__builtin_va_list, ...)"),
    always("void __builtin_va_end(__builtin_va_list)"),
    always("double __builtin_fabs(double)"),
    always("float __builtin_sqrtf(float)"),
    always("long double __builtin_fabsl(long double)"),
    always("_Float16 __builtin_fabsf16(_Float16)"),
    always("_Complex double __builtin_conj(_Complex double)"),
];

pub static X86: &[CatalogEntry] = &[
    always("unsigned long long __builtin_ia32_rdtsc(void)"),
    always("void __builtin_ia32_pause(void)"),
    gated("sse", "v4sf __builtin_ia32_addps(v4sf, v4sf)"),
    gated("sse", "v4sf __builtin_ia32_sqrtps(v4sf)"),
    gated("sse2", "v2df __builtin_ia32_addpd(v2df, v2df)"),
    gated("sse2", "v4si __builtin_ia32_paddd128(v4si, v4si)"),
    gated("sse2", "v8hi __builtin_ia32_paddw128(v8hi, v8hi)"),
    gated("sse2", "v16qi __builtin_ia32_paddb128(v16qi, v16qi)"),
    gated("sse2", "v2di __builtin_ia32_paddq128(v2di, v2di)"),
    gated("sse2", "v4si __builtin_ia32_pmaddwd128(v8hi, v8hi)"),
    gated("sse2", "int __builtin_ia32_pmovmskb128(v16qi)"),
    gated("sse4.2", "unsigned int __builtin_ia32_crc32si(unsigned int, unsigned int)"),
    gated("avx", "v8sf __builtin_ia32_addps256(v8sf, v8sf)"),
    gated("avx", "v4df __builtin_ia32_addpd256(v4df, v4df)"),
    gated("fma", "v8sf __builtin_ia32_vfmaddps256(v8sf, v8sf, v8sf)"),
    gated("rdrnd", "int __builtin_ia32_rdrand32_step(unsigned int *)"),
    gated("lzcnt", "unsigned int __builtin_ia32_lzcnt_u32(unsigned int)"),
    gated("bmi2", "unsigned int __builtin_ia32_pdep_si(unsigned int, unsigned int)"),
    gated(
        "adx",
        "unsigned char __builtin_ia32_addcarryx_u32(unsigned char, unsigned int, unsigned int, unsigned int *)",
    ),
];

pub static AARCH64: &[CatalogEntry] = &[
    always("unsigned int __builtin_aarch64_get_fpcr(void)"),
    always("void __builtin_aarch64_set_fpcr(unsigned int)"),
    gated("crc", "unsigned int __builtin_aarch64_crc32w(unsigned int, unsigned int)"),
    gated("rng", "int __builtin_aarch64_rndr(unsigned long *)"),
    gated("simd", "v4sf __builtin_aarch64_fmav4sf(v4sf, v4sf, v4sf)"),
    gated("simd", "v4si __builtin_aarch64_sqaddv4si(v4si, v4si)"),
    gated("simd", "v2df __builtin_aarch64_sqrtv2df(v2df)"),
    gated("simd", "v16qi __builtin_aarch64_absv16qi(v16qi)"),
    gated("memtag", "void *__builtin_aarch64_memtag_irg(void *, unsigned long)"),
    gated("sve", "svint32_t __builtin_sve_svadd_s32_x(svbool_t, svint32_t, svint32_t)"),
];

/// The entries available on a target: common ones plus the family's, gated by ISA.
pub fn entries(caps: &dyn TargetCapabilities) -> Vec<&'static CatalogEntry> {
    let family = match caps.family() {
        TargetFamily::X86 => X86,
        TargetFamily::AArch64 => AARCH64,
    };
    COMMON
        .iter()
        .chain(family)
        .filter(|entry| entry.requires.map_or(true, |option| caps.has_isa(option)))
        .collect()
}

/// Bind the canonical spellings plus the family's typedefs in `arena`.
///
/// Call once per arena; the typedefs create new nodes.
pub fn install_typedefs(
    arena: &mut TypeArena,
    canon: &CanonicalTypes,
    caps: &dyn TargetCapabilities,
) -> TypeNames {
    let mut names = TypeNames::with_canonical(canon);

    define_vector(arena, &mut names, "v4sf", canon.float, 4);
    define_vector(arena, &mut names, "v2df", canon.double, 2);
    define_vector(arena, &mut names, "v4si", canon.int, 4);
    define_vector(arena, &mut names, "v2di", canon.long_long, 2);
    define_vector(arena, &mut names, "v8hi", canon.short, 8);
    define_vector(arena, &mut names, "v16qi", canon.char, 16);

    match caps.family() {
        TargetFamily::X86 => {
            define_vector(arena, &mut names, "v8sf", canon.float, 8);
            define_vector(arena, &mut names, "v4df", canon.double, 4);
            let va_list = if caps.is_64bit() {
                let tag = arena.make_record("__va_list_tag", Some(24));
                arena.pointer_to(tag)
            } else {
                arena.pointer_to(canon.char)
            };
            names.define("__builtin_va_list", va_list);
        }
        TargetFamily::AArch64 => {
            let svint32 = arena.vector_of(canon.int, LaneCount::Scalable { min: 4 });
            let svbool = arena.vector_of(canon.boolean, LaneCount::Scalable { min: 16 });
            names.define("svint32_t", svint32);
            names.define("svbool_t", svbool);
            let va_list = arena.make_record("__va_list", Some(32));
            names.define("__builtin_va_list", va_list);
        }
    }
    names
}

fn define_vector(
    arena: &mut TypeArena,
    names: &mut TypeNames,
    name: &str,
    element: TypeId,
    lanes: u64,
) {
    let id = arena.vector_of(element, LaneCount::Fixed(lanes));
    names.define(name, id);
}

/// Read and lower every entry available on the target.
pub fn declare_all(
    arena: &mut TypeArena,
    names: &TypeNames,
    caps: &dyn TargetCapabilities,
) -> Result<Vec<BuiltinDecl>> {
    let mut decls = Vec::new();
    for entry in entries(caps) {
        let proto = Prototype::parse(entry.prototype)?;
        let fn_type = proto.lower(arena, names)?;
        decls.push(BuiltinDecl::new(proto.name, fn_type));
    }
    log::debug!("{}: {} built-ins declared", caps.family(), decls.len());
    Ok(decls)
}

#[cfg(test)]
mod tests {
    use jitinfo_targets::TargetConfig;

    use super::*;

    fn declare(config: &TargetConfig) -> (TypeArena, Vec<BuiltinDecl>) {
        let mut arena = TypeArena::new(config.data_model());
        let canon = CanonicalTypes::install(&mut arena);
        let names = install_typedefs(&mut arena, &canon, config);
        let decls = declare_all(&mut arena, &names, config).unwrap();
        (arena, decls)
    }

    #[test]
    fn every_entry_parses() {
        for entry in COMMON.iter().chain(X86).chain(AARCH64) {
            assert!(Prototype::parse(entry.prototype).is_ok(), "{}", entry.prototype);
        }
    }

    #[test]
    fn every_preset_lowers_its_catalogue() {
        for config in TargetConfig::presets() {
            let (_, decls) = declare(&config);
            assert!(decls.len() >= COMMON.len(), "{}", config.name);
        }
    }

    #[test]
    fn gating_follows_isa() {
        let names = |config: &TargetConfig| -> Vec<&'static str> {
            entries(config).iter().map(|e| e.prototype).collect()
        };
        let generic = names(&TargetConfig::x86_64_generic());
        let haswell = names(&TargetConfig::x86_64_haswell());
        let is_avx = |p: &&str| p.contains("addps256");
        assert!(!generic.iter().any(is_avx));
        assert!(haswell.iter().any(is_avx));
        assert!(!haswell.iter().any(|p| p.contains("aarch64")));
    }

    #[test]
    fn redeclaring_gives_same_types() {
        let config = TargetConfig::x86_64_haswell();
        let mut arena = TypeArena::new(config.data_model());
        let canon = CanonicalTypes::install(&mut arena);
        let names = install_typedefs(&mut arena, &canon, &config);
        let first = declare_all(&mut arena, &names, &config).unwrap();
        let second = declare_all(&mut arena, &names, &config).unwrap();
        assert_eq!(first, second);
    }
}
