//! Reader for the back end's built-in prototypes.
//!
//! Built-ins are catalogued as C-style prototypes such as
//! `"v4sf __builtin_ia32_addps(v4sf, v4sf)"`. This module reads them into
//! a small declarator tree and lowers that into arena types. It handles
//! base types, typedef names, `const`/`volatile` on either side of `*`,
//! and a trailing `...`. No arrays, function pointers or attributes.

use std::collections::HashMap;
use std::fmt;

use jitinfo_types::{CanonicalTypes, ParamTerminator, Qualifiers, TypeArena, TypeId};

use crate::error::{BuiltinError, Result};

/// A declarator as written in a prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtoType {
    /// A base type, by its normalized spelling ("unsigned int", "v4sf").
    Named(String),
    Pointer(Box<ProtoType>),
    Const(Box<ProtoType>),
    Volatile(Box<ProtoType>),
}

impl fmt::Display for ProtoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtoType::Named(name) => write!(f, "{name}"),
            ProtoType::Pointer(inner) => write!(f, "{inner} *"),
            ProtoType::Const(inner) => write!(f, "{inner} const"),
            ProtoType::Volatile(inner) => write!(f, "{inner} volatile"),
        }
    }
}

/// A parsed prototype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    pub name: String,
    pub ret: ProtoType,
    /// Fixed parameters, excluding any `...`.
    pub params: Vec<ProtoType>,
    pub is_variadic: bool,
}

impl Prototype {
    /// Parse a prototype string.
    ///
    /// Examples:
    /// - `"void __builtin_trap(void)"`
    /// - `"size_t __builtin_strlen(const char *)"`
    /// - `"int __builtin_printf(const char *fmt, ...)"`
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() {
            return Err(invalid("empty prototype"));
        }
        let open = input.find('(').ok_or_else(|| invalid("missing '('"))?;
        if !input.ends_with(')') {
            return Err(invalid("missing ')'"));
        }

        let (ret, name) = parse_declaration(&input[..open])?;
        let name = name.ok_or_else(|| invalid("missing built-in name"))?;
        let (params, is_variadic) = parse_params(&input[open + 1..input.len() - 1])?;

        Ok(Prototype {
            name,
            ret,
            params,
            is_variadic,
        })
    }

    /// Build the function type of this prototype in `arena`.
    pub fn lower(&self, arena: &mut TypeArena, names: &TypeNames) -> Result<TypeId> {
        let ret = names.lower(arena, &self.ret)?;
        let mut params = Vec::with_capacity(self.params.len());
        for param in &self.params {
            params.push(names.lower(arena, param)?);
        }
        let terminator = if self.is_variadic {
            ParamTerminator::Ellipsis
        } else {
            ParamTerminator::Void
        };
        Ok(arena.make_function(ret, params, terminator))
    }
}

impl fmt::Display for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.ret, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{param}")?;
        }
        if self.is_variadic {
            if !self.params.is_empty() {
                write!(f, ", ")?;
            }
            write!(f, "...")?;
        }
        if self.params.is_empty() && !self.is_variadic {
            write!(f, "void")?;
        }
        write!(f, ")")
    }
}

/// The type names a prototype may use, bound to arena nodes.
#[derive(Debug, Clone, Default)]
pub struct TypeNames {
    names: HashMap<String, TypeId>,
}

impl TypeNames {
    /// The standard C spellings of the canonical nodes.
    pub fn with_canonical(canon: &CanonicalTypes) -> Self {
        let mut names = Self::default();
        let spellings = [
            ("void", canon.void),
            ("bool", canon.boolean),
            ("char", canon.char),
            ("signed char", canon.signed_char),
            ("unsigned char", canon.unsigned_char),
            ("short", canon.short),
            ("unsigned short", canon.unsigned_short),
            ("int", canon.int),
            ("unsigned int", canon.unsigned_int),
            ("long", canon.long),
            ("unsigned long", canon.unsigned_long),
            ("long long", canon.long_long),
            ("unsigned long long", canon.unsigned_long_long),
            ("__int128", canon.int128),
            ("unsigned __int128", canon.uint128),
            ("size_t", canon.size),
            ("float", canon.float),
            ("double", canon.double),
            ("long double", canon.long_double),
            ("_Float16", canon.float16),
            ("_Float32", canon.float32),
            ("_Float64", canon.float64),
            ("_Float128", canon.float128),
            ("__bf16", canon.bfloat16),
            ("_Complex float", canon.complex_float),
            ("_Complex double", canon.complex_double),
            ("_Complex long double", canon.complex_long_double),
        ];
        for (name, id) in spellings {
            names.define(name, id);
        }
        names
    }

    /// Bind `name` to `id`, replacing any earlier binding.
    pub fn define(&mut self, name: &str, id: TypeId) {
        self.names.insert(name.to_string(), id);
    }

    pub fn get(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    fn lower(&self, arena: &mut TypeArena, ty: &ProtoType) -> Result<TypeId> {
        match ty {
            ProtoType::Named(name) => self.get(name).ok_or_else(|| BuiltinError::UnknownTypedef {
                name: name.clone(),
            }),
            ProtoType::Pointer(inner) => {
                let pointee = self.lower(arena, inner)?;
                Ok(arena.pointer_to(pointee))
            }
            ProtoType::Const(inner) => {
                let base = self.lower(arena, inner)?;
                Ok(arena.qualified(base, Qualifiers::CONST))
            }
            ProtoType::Volatile(inner) => {
                let base = self.lower(arena, inner)?;
                Ok(arena.qualified(base, Qualifiers::VOLATILE))
            }
        }
    }
}

fn invalid(detail: impl Into<String>) -> BuiltinError {
    BuiltinError::InvalidPrototype {
        detail: detail.into(),
    }
}

/// Words that may form a base type together.
const SPECIFIERS: &[&str] = &[
    "void", "_Bool", "bool", "char", "short", "int", "long", "float", "double", "signed",
    "unsigned", "__int128", "_Complex",
];

/// Split on whitespace, keeping `*` as its own token.
fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for part in s.split_whitespace() {
        let mut remaining = part;
        while let Some(star) = remaining.find('*') {
            if star > 0 {
                tokens.push(&remaining[..star]);
            }
            tokens.push("*");
            remaining = &remaining[star + 1..];
        }
        if !remaining.is_empty() {
            tokens.push(remaining);
        }
    }
    tokens
}

/// Parse `base-type declarator [name]`.
fn parse_declaration(s: &str) -> Result<(ProtoType, Option<String>)> {
    let tokens = tokenize(s);
    if tokens.is_empty() {
        return Err(invalid("expected type"));
    }

    let mut pos = 0;
    let mut quals = Qualifiers::empty();
    let mut words: Vec<&str> = Vec::new();
    let mut typedef: Option<&str> = None;

    // Specifiers and qualifiers in any order, up to the first `*` or name.
    while pos < tokens.len() {
        let token = tokens[pos];
        match token {
            "const" => quals |= Qualifiers::CONST,
            "volatile" => quals |= Qualifiers::VOLATILE,
            "*" => break,
            _ if SPECIFIERS.contains(&token) => {
                if typedef.is_some() {
                    return Err(invalid(format!("'{token}' after a type name")));
                }
                words.push(token);
            }
            _ if words.is_empty() && typedef.is_none() => typedef = Some(token),
            _ => break,
        }
        pos += 1;
    }

    let base = match typedef {
        Some(name) => name.to_string(),
        None => normalize(&words)?,
    };
    let mut ty = apply_quals(ProtoType::Named(base), quals);

    // Declarator: `*` and trailing qualifiers, then an optional name.
    let mut name = None;
    for &token in &tokens[pos..] {
        if name.is_some() {
            return Err(invalid(format!("unexpected '{token}' after name")));
        }
        match token {
            "*" => ty = ProtoType::Pointer(Box::new(ty)),
            "const" => ty = ProtoType::Const(Box::new(ty)),
            "volatile" => ty = ProtoType::Volatile(Box::new(ty)),
            ident => name = Some(ident.to_string()),
        }
    }
    Ok((ty, name))
}

fn apply_quals(ty: ProtoType, quals: Qualifiers) -> ProtoType {
    let mut ty = ty;
    if quals.contains(Qualifiers::CONST) {
        ty = ProtoType::Const(Box::new(ty));
    }
    if quals.contains(Qualifiers::VOLATILE) {
        ty = ProtoType::Volatile(Box::new(ty));
    }
    ty
}

/// Fold a specifier list into one spelling, e.g. `long unsigned int` → `unsigned long`.
fn normalize(words: &[&str]) -> Result<String> {
    if words.is_empty() {
        return Err(invalid("expected type"));
    }
    let has = |w: &str| words.contains(&w);
    let longs = words.iter().filter(|w| **w == "long").count();
    let unsigned = has("unsigned");
    if unsigned && has("signed") {
        return Err(invalid("both 'signed' and 'unsigned'"));
    }
    let sign = |base: &str| {
        if unsigned {
            format!("unsigned {base}")
        } else {
            base.to_string()
        }
    };

    let base = if has("void") {
        "void".to_string()
    } else if has("_Bool") || has("bool") {
        "bool".to_string()
    } else if has("float") {
        "float".to_string()
    } else if has("double") {
        if longs > 0 {
            "long double".to_string()
        } else {
            "double".to_string()
        }
    } else if has("char") {
        if unsigned {
            "unsigned char".to_string()
        } else if has("signed") {
            "signed char".to_string()
        } else {
            "char".to_string()
        }
    } else if has("__int128") {
        sign("__int128")
    } else if has("short") {
        sign("short")
    } else if longs >= 2 {
        sign("long long")
    } else if longs == 1 {
        sign("long")
    } else {
        sign("int")
    };

    if has("_Complex") {
        return match base.as_str() {
            "float" | "double" | "long double" => Ok(format!("_Complex {base}")),
            _ => Err(invalid(format!("'_Complex {base}' is not a type"))),
        };
    }
    Ok(base)
}

/// Parse the parameter list between `(` and `)`.
fn parse_params(s: &str) -> Result<(Vec<ProtoType>, bool)> {
    let s = s.trim();
    if s.is_empty() || s == "void" {
        return Ok((Vec::new(), false));
    }

    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let mut params = Vec::new();
    let mut is_variadic = false;
    for (i, part) in parts.iter().enumerate() {
        if *part == "..." {
            if i != parts.len() - 1 {
                return Err(invalid("'...' must be the last parameter"));
            }
            is_variadic = true;
            continue;
        }
        let (ty, _name) = parse_declaration(part)?;
        if ty == ProtoType::Named("void".into()) {
            return Err(invalid("'void' parameter in a non-empty list"));
        }
        params.push(ty);
    }
    Ok((params, is_variadic))
}

#[cfg(test)]
mod tests {
    use jitinfo_types::{DataModel, LaneCount, TypeKind};

    use super::*;

    fn named(name: &str) -> ProtoType {
        ProtoType::Named(name.into())
    }

    #[test]
    fn parse_simple() {
        let proto = Prototype::parse("double __builtin_fabs(double x)").unwrap();
        assert_eq!(proto.name, "__builtin_fabs");
        assert_eq!(proto.ret, named("double"));
        assert_eq!(proto.params, vec![named("double")]);
        assert!(!proto.is_variadic);
    }

    #[test]
    fn parse_void_list() {
        let proto = Prototype::parse("void __builtin_trap(void)").unwrap();
        assert!(proto.params.is_empty());
        assert!(!proto.is_variadic);
        assert_eq!(proto.to_string(), "void __builtin_trap(void)");
    }

    #[test]
    fn parse_const_pointee_and_const_pointer() {
        let proto = Prototype::parse("size_t f(const char *s, char *const p)").unwrap();
        assert_eq!(
            proto.params[0],
            ProtoType::Pointer(Box::new(ProtoType::Const(Box::new(named("char")))))
        );
        assert_eq!(
            proto.params[1],
            ProtoType::Const(Box::new(ProtoType::Pointer(Box::new(named("char")))))
        );
    }

    #[test]
    fn parse_variadic() {
        let proto = Prototype::parse("int __builtin_printf(const char*, ...)").unwrap();
        assert!(proto.is_variadic);
        assert_eq!(proto.params.len(), 1);
        assert!(Prototype::parse("int f(..., int)").is_err());
    }

    #[test]
    fn specifiers_normalize() {
        let proto =
            Prototype::parse("long unsigned int f(long long, unsigned, signed char, long double)")
                .unwrap();
        assert_eq!(proto.ret, named("unsigned long"));
        assert_eq!(
            proto.params,
            vec![
                named("long long"),
                named("unsigned int"),
                named("signed char"),
                named("long double")
            ]
        );
        assert!(Prototype::parse("int f(signed unsigned)").is_err());
        assert!(Prototype::parse("int f(_Complex int)").is_err());
    }

    #[test]
    fn typedef_names() {
        let proto = Prototype::parse("v4sf __builtin_ia32_addps(v4sf a, v4sf b)").unwrap();
        assert_eq!(proto.ret, named("v4sf"));
        assert_eq!(proto.params, vec![named("v4sf"), named("v4sf")]);
    }

    #[test]
    fn malformed_prototypes() {
        assert!(Prototype::parse("").is_err());
        assert!(Prototype::parse("int f").is_err());
        assert!(Prototype::parse("int f(int").is_err());
        assert!(Prototype::parse("int (int)").is_err());
        assert!(Prototype::parse("int f(int a b)").is_err());
        assert!(Prototype::parse("int f(int, void)").is_err());
    }

    #[test]
    fn lowering_reuses_canonical_nodes() {
        let mut arena = TypeArena::new(DataModel::lp64_x86());
        let canon = CanonicalTypes::install(&mut arena);
        let mut names = TypeNames::with_canonical(&canon);
        let v4sf = arena.vector_of(canon.float, LaneCount::Fixed(4));
        names.define("v4sf", v4sf);

        let proto = Prototype::parse("v4sf f(const float *, unsigned int, ...)").unwrap();
        let id = proto.lower(&mut arena, &names).unwrap();
        let TypeKind::Function(func) = arena.kind(id).clone() else {
            panic!("expected a function type");
        };
        assert_eq!(func.ret, v4sf);
        assert_eq!(func.params[1], canon.unsigned_int);
        let const_float = arena.qualified(canon.float, Qualifiers::CONST);
        assert_eq!(func.params[0], arena.pointer_to(const_float));
        assert!(func.is_variadic());

        // Lowering again yields the same function type.
        assert_eq!(proto.lower(&mut arena, &names).unwrap(), id);
    }

    #[test]
    fn lowering_unknown_name() {
        let mut arena = TypeArena::new(DataModel::lp64_x86());
        let canon = CanonicalTypes::install(&mut arena);
        let names = TypeNames::with_canonical(&canon);
        let proto = Prototype::parse("m512 f(void)").unwrap();
        assert!(matches!(
            proto.lower(&mut arena, &names),
            Err(BuiltinError::UnknownTypedef { name }) if name == "m512"
        ));
    }
}
