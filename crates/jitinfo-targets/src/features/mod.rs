//! Feature predicate tables.
//!
//! Each architecture family contributes a static list of
//! `(predicate, key, value)` rules and a list of `(predicate, type)` rules.
//! A sweep evaluates every predicate once against the target's
//! capabilities and registers whatever holds. Registration is idempotent
//! and set-valued, so rule order never changes the result.

pub mod aarch64;
pub mod x86;

use jitinfo_types::PortableType;

use crate::capabilities::{ScalarMode, TargetCapabilities, TargetFamily};
use crate::info::TargetInfo;

/// Feature key under which the architecture name is reported.
pub const TARGET_ARCH: &str = "target_arch";
/// Feature key under which ISA extensions and versions are reported.
pub const TARGET_FEATURE: &str = "target_feature";

/// A pure capability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The named ISA option is enabled.
    Isa(&'static str),
    /// The target uses 64-bit pointers.
    Is64Bit,
    /// The target uses 32-bit pointers.
    Is32Bit,
    /// The configured processor is one of these.
    ProcessorIn(&'static [&'static str]),
    /// The machine scalar mode is supported.
    ScalarMode(ScalarMode),
    Always,
}

impl Predicate {
    pub fn holds(&self, caps: &dyn TargetCapabilities) -> bool {
        match *self {
            Predicate::Isa(option) => caps.has_isa(option),
            Predicate::Is64Bit => caps.is_64bit(),
            Predicate::Is32Bit => !caps.is_64bit(),
            Predicate::ProcessorIn(names) => caps
                .processor()
                .is_some_and(|p| names.iter().any(|n| *n == p)),
            Predicate::ScalarMode(mode) => caps.supports_scalar_mode(mode),
            Predicate::Always => true,
        }
    }
}

/// Registers `key = value` when `predicate` holds.
///
/// One capability reported under several spellings is several rules
/// sharing a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureRule {
    pub predicate: Predicate,
    pub key: &'static str,
    pub value: &'static str,
}

impl FeatureRule {
    pub const fn isa(option: &'static str, value: &'static str) -> Self {
        Self {
            predicate: Predicate::Isa(option),
            key: TARGET_FEATURE,
            value,
        }
    }
}

/// Which scalar type a [`TypeRule`] registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportedType {
    Int128,
    Float16,
    BFloat16,
    Float80,
    Float128,
}

impl SupportedType {
    /// The portable tags this type contributes.
    pub fn tags(self) -> Vec<PortableType> {
        use jitinfo_types::FloatWidth;
        match self {
            SupportedType::Int128 => vec![PortableType::i128(), PortableType::u128()],
            SupportedType::Float16 => vec![PortableType::Float(FloatWidth::F16)],
            SupportedType::BFloat16 => vec![PortableType::BFloat16],
            SupportedType::Float80 => vec![PortableType::Float(FloatWidth::F80)],
            SupportedType::Float128 => vec![PortableType::Float(FloatWidth::F128)],
        }
    }
}

/// Registers a supported scalar type when `predicate` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeRule {
    pub predicate: Predicate,
    pub ty: SupportedType,
}

/// The static rule tables of one architecture family.
#[derive(Debug, Clone, Copy)]
pub struct FeatureTable {
    pub family: TargetFamily,
    pub features: &'static [FeatureRule],
    pub types: &'static [TypeRule],
}

impl FeatureTable {
    pub fn for_family(family: TargetFamily) -> &'static FeatureTable {
        match family {
            TargetFamily::X86 => &x86::TABLE,
            TargetFamily::AArch64 => &aarch64::TABLE,
        }
    }

    fn predicates(&self) -> impl Iterator<Item = Predicate> + '_ {
        self.features
            .iter()
            .map(|rule| rule.predicate)
            .chain(self.types.iter().map(|rule| rule.predicate))
    }

    /// Every ISA option name a rule of this table reads, deduplicated.
    pub fn isa_options(&self) -> Vec<&'static str> {
        let mut options: Vec<&'static str> = self
            .predicates()
            .filter_map(|predicate| match predicate {
                Predicate::Isa(option) => Some(option),
                _ => None,
            })
            .collect();
        options.sort_unstable();
        options.dedup();
        options
    }

    pub fn knows_isa(&self, option: &str) -> bool {
        self.predicates()
            .any(|predicate| matches!(predicate, Predicate::Isa(known) if known == option))
    }

    /// Evaluate every rule and register the ones that hold.
    ///
    /// 128-bit integer support also sets the registry's dedicated flag.
    pub fn sweep(&self, caps: &dyn TargetCapabilities, info: &mut TargetInfo) {
        for rule in self.features {
            if rule.predicate.holds(caps) {
                log::trace!("{}: {} = {}", self.family, rule.key, rule.value);
                info.add_feature(rule.key, rule.value);
            }
        }
        for rule in self.types {
            if rule.predicate.holds(caps) {
                log::trace!("{}: supported type {:?}", self.family, rule.ty);
                if rule.ty == SupportedType::Int128 {
                    info.set_128bit_int_support(true);
                }
                for tag in rule.ty.tags() {
                    info.add_supported_type(tag);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    struct Caps {
        family: TargetFamily,
        wide: bool,
        isa: BTreeSet<&'static str>,
        processor: Option<&'static str>,
        modes: BTreeSet<ScalarMode>,
    }

    impl TargetCapabilities for Caps {
        fn family(&self) -> TargetFamily {
            self.family
        }
        fn is_64bit(&self) -> bool {
            self.wide
        }
        fn has_isa(&self, option: &str) -> bool {
            self.isa.contains(option)
        }
        fn processor(&self) -> Option<&str> {
            self.processor
        }
        fn supports_scalar_mode(&self, mode: ScalarMode) -> bool {
            self.modes.contains(&mode)
        }
    }

    fn x86_caps(isa: &[&'static str]) -> Caps {
        Caps {
            family: TargetFamily::X86,
            wide: true,
            isa: isa.iter().copied().collect(),
            processor: None,
            modes: BTreeSet::from([ScalarMode::Ti]),
        }
    }

    #[test]
    fn sweep_registers_enabled_isa_only() {
        let caps = x86_caps(&["sse2", "avx2"]);
        let mut info = TargetInfo::new();
        FeatureTable::for_family(TargetFamily::X86).sweep(&caps, &mut info);
        assert!(info.has_feature(TARGET_FEATURE, "sse2"));
        assert!(info.has_feature(TARGET_FEATURE, "avx2"));
        assert!(!info.has_feature(TARGET_FEATURE, "avx512f"));
        assert!(info.has_feature(TARGET_ARCH, "x86_64"));
        assert!(!info.has_feature(TARGET_ARCH, "x86"));
    }

    #[test]
    fn sweep_twice_is_idempotent() {
        let caps = x86_caps(&["sse", "bmi", "rdrnd"]);
        let table = FeatureTable::for_family(TargetFamily::X86);
        let mut once = TargetInfo::new();
        table.sweep(&caps, &mut once);
        let mut twice = TargetInfo::new();
        table.sweep(&caps, &mut twice);
        table.sweep(&caps, &mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn shared_predicate_registers_every_spelling() {
        let caps = x86_caps(&["bmi", "rdrnd", "vpclmulqdq"]);
        let mut info = TargetInfo::new();
        FeatureTable::for_family(TargetFamily::X86).sweep(&caps, &mut info);
        for value in ["bmi", "bmi1", "rdrand", "rdrnd", "pclmulqdq", "vpclmulqdq"] {
            assert!(info.has_feature(TARGET_FEATURE, value), "missing {value}");
        }
    }

    #[test]
    fn processor_predicate() {
        let mut caps = x86_caps(&[]);
        let mut info = TargetInfo::new();
        FeatureTable::for_family(TargetFamily::X86).sweep(&caps, &mut info);
        assert!(!info.has_feature(TARGET_FEATURE, "ermsbd"));

        caps.processor = Some("skylake");
        FeatureTable::for_family(TargetFamily::X86).sweep(&caps, &mut info);
        assert!(info.has_feature(TARGET_FEATURE, "ermsbd"));
    }

    #[test]
    fn int128_sets_flag_and_types() {
        let caps = x86_caps(&[]);
        let mut info = TargetInfo::new();
        FeatureTable::for_family(TargetFamily::X86).sweep(&caps, &mut info);
        assert!(info.supports_128bit_int());
        assert!(info.supports_type(&PortableType::i128()));
        assert!(info.supports_type(&PortableType::u128()));
    }

    #[test]
    fn isa_options_are_known() {
        let table = FeatureTable::for_family(TargetFamily::AArch64);
        let options = table.isa_options();
        assert!(options.contains(&"sve2"));
        assert!(options.contains(&"v8.4a"));
        assert!(table.knows_isa("pauth"));
        assert!(!table.knows_isa("avx2"));
        let mut sorted = options.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), options.len());
    }
}
