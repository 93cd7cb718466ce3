//! Built-in declarations and their translated signatures.

use std::fmt;

use serde::Serialize;

use jitinfo_types::{PortableType, TypeId};

/// A built-in as the back end declares it: a name and an internal function type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinDecl {
    pub name: String,
    pub fn_type: TypeId,
}

impl BuiltinDecl {
    pub fn new(name: impl Into<String>, fn_type: TypeId) -> Self {
        Self {
            name: name.into(),
            fn_type,
        }
    }
}

/// A built-in's signature in portable tags. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuiltinSignature {
    pub name: String,
    pub parameter_types: Vec<PortableType>,
    pub is_variadic: bool,
    pub return_type: PortableType,
}

impl fmt::Display for BuiltinSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, param) in self.parameter_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        match (self.parameter_types.is_empty(), self.is_variadic) {
            (true, true) => write!(f, "...")?,
            (false, true) => write!(f, ", ...")?,
            (true, false) => write!(f, "void")?,
            (false, false) => {}
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_signature() {
        let sig = BuiltinSignature {
            name: "__builtin_printf".into(),
            parameter_types: vec![PortableType::Char.konst().pointer()],
            is_variadic: true,
            return_type: PortableType::i32(),
        };
        assert_eq!(sig.to_string(), "int32_t __builtin_printf(const char *, ...)");

        let trap = BuiltinSignature {
            name: "__builtin_trap".into(),
            parameter_types: vec![],
            is_variadic: false,
            return_type: PortableType::Void,
        };
        assert_eq!(trap.to_string(), "void __builtin_trap(void)");
    }

    #[test]
    fn signature_serializes_kebab_case() {
        let sig = BuiltinSignature {
            name: "f".into(),
            parameter_types: vec![PortableType::SizeT],
            is_variadic: false,
            return_type: PortableType::Void,
        };
        let json = serde_json::to_value(&sig).unwrap();
        assert_eq!(json["parameter-types"][0], "size-t");
        assert_eq!(json["is-variadic"], false);
    }
}
