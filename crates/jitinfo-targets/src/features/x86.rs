//! x86 / x86-64 feature table.

use super::{FeatureRule, FeatureTable, Predicate, SupportedType, TypeRule, TARGET_ARCH};
use crate::capabilities::{ScalarMode, TargetFamily};

/// Processors that implement enhanced `rep movsb`/`rep stosb`.
pub const ERMSB_PROCESSORS: &[&str] = &[
    "haswell",
    "skylake",
    "skylake-avx512",
    "cannonlake",
    "icelake-client",
    "icelake-server",
    "cascadelake",
    "tigerlake",
    "cooperlake",
];

pub static FEATURES: &[FeatureRule] = &[
    FeatureRule {
        predicate: Predicate::Is64Bit,
        key: TARGET_ARCH,
        value: "x86_64",
    },
    FeatureRule {
        predicate: Predicate::Is32Bit,
        key: TARGET_ARCH,
        value: "x86",
    },
    FeatureRule::isa("mmx", "mmx"),
    FeatureRule::isa("sse", "sse"),
    FeatureRule::isa("sse2", "sse2"),
    FeatureRule::isa("sse3", "sse3"),
    FeatureRule::isa("ssse3", "ssse3"),
    FeatureRule::isa("sse4.1", "sse4.1"),
    FeatureRule::isa("sse4.2", "sse4.2"),
    FeatureRule::isa("aes", "aes"),
    FeatureRule::isa("sha", "sha"),
    FeatureRule::isa("avx", "avx"),
    FeatureRule::isa("avx2", "avx2"),
    FeatureRule::isa("avx512f", "avx512f"),
    FeatureRule::isa("avx512er", "avx512er"),
    FeatureRule::isa("avx512cd", "avx512cd"),
    FeatureRule::isa("avx512pf", "avx512pf"),
    FeatureRule::isa("avx512dq", "avx512dq"),
    FeatureRule::isa("avx512bw", "avx512bw"),
    FeatureRule::isa("avx512vl", "avx512vl"),
    FeatureRule::isa("avx512vbmi", "avx512vbmi"),
    FeatureRule::isa("avx512ifma", "avx512ifma"),
    FeatureRule::isa("avx512vpopcntdq", "avx512vpopcntdq"),
    FeatureRule::isa("fma", "fma"),
    FeatureRule::isa("rtm", "rtm"),
    FeatureRule::isa("sse4a", "sse4a"),
    FeatureRule::isa("bmi", "bmi1"),
    FeatureRule::isa("bmi", "bmi"),
    FeatureRule::isa("bmi2", "bmi2"),
    FeatureRule::isa("lzcnt", "lzcnt"),
    FeatureRule::isa("tbm", "tbm"),
    FeatureRule::isa("popcnt", "popcnt"),
    FeatureRule::isa("rdrnd", "rdrand"),
    FeatureRule::isa("rdrnd", "rdrnd"),
    FeatureRule::isa("f16c", "f16c"),
    FeatureRule::isa("rdseed", "rdseed"),
    FeatureRule::isa("adx", "adx"),
    FeatureRule::isa("fxsr", "fxsr"),
    FeatureRule::isa("xsave", "xsave"),
    FeatureRule::isa("xsaveopt", "xsaveopt"),
    FeatureRule::isa("xsavec", "xsavec"),
    FeatureRule::isa("xsaves", "xsaves"),
    FeatureRule::isa("vpclmulqdq", "pclmulqdq"),
    FeatureRule::isa("vpclmulqdq", "vpclmulqdq"),
    FeatureRule::isa("cx16", "cmpxchg16b"),
    FeatureRule::isa("movbe", "movbe"),
    FeatureRule::isa("avx512vbmi2", "avx512vbmi2"),
    FeatureRule::isa("pku", "pku"),
    FeatureRule::isa("avx512vnni", "avx512vnni"),
    FeatureRule::isa("avx512bf16", "avx512bf16"),
    FeatureRule::isa("avx512bitalg", "avx512bitalg"),
    FeatureRule::isa("avx512vp2intersect", "avx512vp2intersect"),
    FeatureRule::isa("pclmul", "pclmul"),
    FeatureRule::isa("gfni", "gfni"),
    FeatureRule::isa("fma4", "fma4"),
    FeatureRule::isa("xop", "xop"),
    FeatureRule::isa("vaes", "vaes"),
    FeatureRule::isa("lwp", "lwp"),
    FeatureRule::isa("fsgsbase", "fsgsbase"),
    FeatureRule::isa("shstk", "shstk"),
    FeatureRule::isa("prfchw", "prfchw"),
    FeatureRule::isa("sahf", "sahf"),
    FeatureRule::isa("mwaitx", "mwaitx"),
    FeatureRule::isa("clzero", "clzero"),
    FeatureRule::isa("cldemote", "cldemote"),
    FeatureRule::isa("ptwrite", "ptwrite"),
    FeatureRule {
        predicate: Predicate::ProcessorIn(ERMSB_PROCESSORS),
        key: super::TARGET_FEATURE,
        value: "ermsbd",
    },
];

pub static TYPES: &[TypeRule] = &[
    TypeRule {
        predicate: Predicate::ScalarMode(ScalarMode::Ti),
        ty: SupportedType::Int128,
    },
    TypeRule {
        predicate: Predicate::ScalarMode(ScalarMode::Hf),
        ty: SupportedType::Float16,
    },
    TypeRule {
        predicate: Predicate::ScalarMode(ScalarMode::Bf),
        ty: SupportedType::BFloat16,
    },
    TypeRule {
        predicate: Predicate::ScalarMode(ScalarMode::Xf),
        ty: SupportedType::Float80,
    },
    TypeRule {
        predicate: Predicate::ScalarMode(ScalarMode::Tf),
        ty: SupportedType::Float128,
    },
];

pub static TABLE: FeatureTable = FeatureTable {
    family: TargetFamily::X86,
    features: FEATURES,
    types: TYPES,
};
