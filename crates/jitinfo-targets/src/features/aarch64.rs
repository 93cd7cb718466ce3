//! AArch64 feature table.

use super::{FeatureRule, FeatureTable, Predicate, SupportedType, TypeRule, TARGET_ARCH};
use crate::capabilities::{ScalarMode, TargetFamily};

pub static FEATURES: &[FeatureRule] = &[
    FeatureRule {
        predicate: Predicate::Always,
        key: TARGET_ARCH,
        value: "aarch64",
    },
    FeatureRule::isa("aes", "aes"),
    FeatureRule::isa("bf16", "bf16"),
    FeatureRule::isa("bti", "bti"),
    FeatureRule::isa("complex", "fcma"),
    FeatureRule::isa("crc", "crc"),
    FeatureRule::isa("dotprod", "dotprod"),
    FeatureRule::isa("f32mm", "f32mm"),
    FeatureRule::isa("f64mm", "f64mm"),
    FeatureRule::isa("fp16fml", "fhm"),
    FeatureRule::isa("fp16", "fp16"),
    FeatureRule::isa("frint", "frintts"),
    FeatureRule::isa("i8mm", "i8mm"),
    FeatureRule::isa("jscvt", "jsconv"),
    FeatureRule::isa("lse", "lse"),
    FeatureRule::isa("memtag", "mte"),
    FeatureRule::isa("pauth", "paca"),
    FeatureRule::isa("pauth", "pacg"),
    FeatureRule::isa("rng", "rand"),
    FeatureRule::isa("rcpc", "rcpc"),
    FeatureRule::isa("rcpc2", "rcpc2"),
    FeatureRule::isa("rdma", "rdm"),
    FeatureRule::isa("sb", "sb"),
    FeatureRule::isa("sha2", "sha2"),
    FeatureRule::isa("sha3", "sha3"),
    FeatureRule::isa("simd", "neon"),
    FeatureRule::isa("sm4", "sm4"),
    FeatureRule::isa("sve", "sve"),
    FeatureRule::isa("sve2", "sve2"),
    FeatureRule::isa("sve2-aes", "sve2-aes"),
    FeatureRule::isa("sve2-bitperm", "sve2-bitperm"),
    FeatureRule::isa("sve2-sha3", "sve2-sha3"),
    FeatureRule::isa("sve2-sm4", "sve2-sm4"),
    FeatureRule::isa("tme", "tme"),
    FeatureRule::isa("v8.1a", "v8.1a"),
    FeatureRule::isa("v8.2a", "v8.2a"),
    FeatureRule::isa("v8.3a", "v8.3a"),
    FeatureRule::isa("v8.4a", "v8.4a"),
    FeatureRule::isa("v8.5a", "v8.5a"),
    FeatureRule::isa("v8.6a", "v8.6a"),
    FeatureRule::isa("v8.7a", "v8.7a"),
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
        predicate: Predicate::ScalarMode(ScalarMode::Tf),
        ty: SupportedType::Float128,
    },
];

pub static TABLE: FeatureTable = FeatureTable {
    family: TargetFamily::AArch64,
    features: FEATURES,
    types: TYPES,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isa_versions_report_themselves() {
        for version in ["v8.1a", "v8.2a", "v8.3a", "v8.4a", "v8.5a", "v8.6a", "v8.7a"] {
            assert!(FEATURES
                .iter()
                .any(|r| r.predicate == Predicate::Isa(version) && r.value == version));
        }
    }

    #[test]
    fn pauth_has_two_spellings() {
        let values: Vec<_> = FEATURES
            .iter()
            .filter(|r| r.predicate == Predicate::Isa("pauth"))
            .map(|r| r.value)
            .collect();
        assert_eq!(values, vec!["paca", "pacg"]);
    }
}
