//! The back end's internal type representation.
//!
//! Types live in a [`TypeArena`] and are addressed by [`TypeId`]. Identity
//! is handle equality: two nodes with the same shape but different ids are
//! different types. Pointer, vector and function types and qualified
//! variants are interned, so building the same one twice yields the same id.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::model::DataModel;

bitflags! {
    /// Type qualifiers carried by a variant node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Qualifiers: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
        const RESTRICT = 1 << 2;
    }
}

/// Handle to a node in a [`TypeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Number of lanes in a vector type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneCount {
    /// A compile-time constant lane count.
    Fixed(u64),
    /// A hardware-length-dependent count (`min * vscale`), e.g. SVE.
    Scalable { min: u64 },
}

impl LaneCount {
    /// The lane count, if it is a compile-time constant.
    pub fn to_constant(self) -> Option<u64> {
        match self {
            LaneCount::Fixed(n) => Some(n),
            LaneCount::Scalable { .. } => None,
        }
    }
}

/// How a function's parameter list ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamTerminator {
    /// The list is closed: no parameters beyond the fixed ones.
    Void,
    /// The list is open: further arguments are variadic.
    Ellipsis,
}

/// A function type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionType {
    pub ret: TypeId,
    pub params: Vec<TypeId>,
    pub terminator: ParamTerminator,
}

impl FunctionType {
    pub fn is_variadic(&self) -> bool {
        self.terminator == ParamTerminator::Ellipsis
    }
}

/// Structural category of a node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Boolean,
    Integer { unsigned: bool },
    Enumeral { unsigned: bool },
    Real,
    Complex { component: TypeId },
    Pointer { pointee: TypeId },
    Reference { referent: TypeId },
    Vector { element: TypeId, lanes: LaneCount },
    Record { name: String },
    Function(FunctionType),
}

impl TypeKind {
    /// Integral in the back end's sense: integers, booleans and enumerations.
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            TypeKind::Integer { .. } | TypeKind::Boolean | TypeKind::Enumeral { .. }
        )
    }

    pub fn is_unsigned(&self) -> bool {
        match self {
            TypeKind::Integer { unsigned } | TypeKind::Enumeral { unsigned } => *unsigned,
            TypeKind::Boolean => true,
            _ => false,
        }
    }
}

/// A single type node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    pub kind: TypeKind,
    pub quals: Qualifiers,
    /// The unqualified variant this node belongs to (itself if unqualified).
    pub main_variant: TypeId,
    /// Storage size in bytes; `None` for incomplete or length-dependent types.
    pub size_bytes: Option<u64>,
    /// Spelling used in diagnostics.
    pub name: Option<String>,
}

/// Owner of all type nodes of one compilation request.
#[derive(Debug, Clone)]
pub struct TypeArena {
    model: DataModel,
    nodes: Vec<TypeNode>,
    pointers: HashMap<TypeId, TypeId>,
    references: HashMap<TypeId, TypeId>,
    variants: HashMap<(TypeId, Qualifiers), TypeId>,
    vectors: HashMap<(TypeId, LaneCount), TypeId>,
    functions: HashMap<FunctionType, TypeId>,
}

impl TypeArena {
    /// Create an empty arena laid out for `model`.
    pub fn new(model: DataModel) -> Self {
        Self {
            model,
            nodes: Vec::new(),
            pointers: HashMap::new(),
            references: HashMap::new(),
            variants: HashMap::new(),
            vectors: HashMap::new(),
            functions: HashMap::new(),
        }
    }

    pub fn model(&self) -> &DataModel {
        &self.model
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was minted by a different arena and is out of range.
    pub fn get(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: TypeId) -> &TypeKind {
        &self.get(id).kind
    }

    pub fn quals(&self, id: TypeId) -> Qualifiers {
        self.get(id).quals
    }

    pub fn main_variant(&self, id: TypeId) -> TypeId {
        self.get(id).main_variant
    }

    pub fn size_bytes(&self, id: TypeId) -> Option<u64> {
        self.get(id).size_bytes
    }

    /// Human-readable spelling of a node, for diagnostics.
    pub fn describe(&self, id: TypeId) -> String {
        let node = self.get(id);
        let base = match (&node.name, &node.kind) {
            (Some(name), _) => name.clone(),
            (None, TypeKind::Pointer { pointee }) => format!("{} *", self.describe(*pointee)),
            (None, TypeKind::Reference { referent }) => format!("{} &", self.describe(*referent)),
            (None, TypeKind::Vector { element, lanes }) => match lanes {
                LaneCount::Fixed(n) => format!("vector({}, {n})", self.describe(*element)),
                LaneCount::Scalable { min } => {
                    format!("vector({}, {min} x vscale)", self.describe(*element))
                }
            },
            (None, TypeKind::Record { name }) => format!("struct {name}"),
            (None, TypeKind::Complex { component }) => {
                format!("_Complex {}", self.describe(*component))
            }
            (None, TypeKind::Function(func)) => {
                let mut params: Vec<String> =
                    func.params.iter().map(|p| self.describe(*p)).collect();
                if func.is_variadic() {
                    params.push("...".into());
                }
                format!("{} ({})", self.describe(func.ret), params.join(", "))
            }
            (None, kind) => format!("{kind:?}").to_lowercase(),
        };
        if node.quals.is_empty() {
            return base;
        }
        let mut out = String::new();
        if node.quals.contains(Qualifiers::CONST) {
            out.push_str("const ");
        }
        if node.quals.contains(Qualifiers::VOLATILE) {
            out.push_str("volatile ");
        }
        out.push_str(&base);
        out
    }

    fn push(&mut self, kind: TypeKind, size_bytes: Option<u64>, name: Option<&str>) -> TypeId {
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(TypeNode {
            kind,
            quals: Qualifiers::empty(),
            main_variant: id,
            size_bytes,
            name: name.map(str::to_string),
        });
        id
    }

    pub fn make_void(&mut self) -> TypeId {
        self.push(TypeKind::Void, None, Some("void"))
    }

    pub fn make_boolean(&mut self, bytes: u64, name: &str) -> TypeId {
        self.push(TypeKind::Boolean, Some(bytes), Some(name))
    }

    /// A fresh integer node. Two calls with the same width yield distinct types.
    pub fn make_integer(&mut self, bytes: u64, unsigned: bool, name: &str) -> TypeId {
        self.push(TypeKind::Integer { unsigned }, Some(bytes), Some(name))
    }

    pub fn make_enumeral(&mut self, bytes: u64, unsigned: bool, name: &str) -> TypeId {
        self.push(TypeKind::Enumeral { unsigned }, Some(bytes), Some(name))
    }

    pub fn make_real(&mut self, bytes: u64, name: &str) -> TypeId {
        self.push(TypeKind::Real, Some(bytes), Some(name))
    }

    pub fn make_complex(&mut self, component: TypeId, name: &str) -> TypeId {
        let size = self.size_bytes(component).map(|s| s * 2);
        self.push(TypeKind::Complex { component }, size, Some(name))
    }

    pub fn make_record(&mut self, name: &str, size_bytes: Option<u64>) -> TypeId {
        self.push(
            TypeKind::Record {
                name: name.to_string(),
            },
            size_bytes,
            None,
        )
    }

    /// The function type with this signature, built once per signature.
    pub fn make_function(
        &mut self,
        ret: TypeId,
        params: Vec<TypeId>,
        terminator: ParamTerminator,
    ) -> TypeId {
        let func = FunctionType {
            ret,
            params,
            terminator,
        };
        if let Some(&id) = self.functions.get(&func) {
            return id;
        }
        let id = self.push(TypeKind::Function(func.clone()), None, None);
        self.functions.insert(func, id);
        id
    }

    /// The pointer type to `pointee`, built once per pointee.
    pub fn pointer_to(&mut self, pointee: TypeId) -> TypeId {
        if let Some(&id) = self.pointers.get(&pointee) {
            return id;
        }
        let size = Some(self.model.pointer_bytes);
        let id = self.push(TypeKind::Pointer { pointee }, size, None);
        self.pointers.insert(pointee, id);
        id
    }

    /// The reference type to `referent`, built once per referent.
    pub fn reference_to(&mut self, referent: TypeId) -> TypeId {
        if let Some(&id) = self.references.get(&referent) {
            return id;
        }
        let size = Some(self.model.pointer_bytes);
        let id = self.push(TypeKind::Reference { referent }, size, None);
        self.references.insert(referent, id);
        id
    }

    /// The vector type of `lanes` x `element`, built once per shape.
    pub fn vector_of(&mut self, element: TypeId, lanes: LaneCount) -> TypeId {
        if let Some(&id) = self.vectors.get(&(element, lanes)) {
            return id;
        }
        let size = match (lanes, self.size_bytes(element)) {
            (LaneCount::Fixed(n), Some(elem)) => Some(n * elem),
            _ => None,
        };
        let id = self.push(TypeKind::Vector { element, lanes }, size, None);
        self.vectors.insert((element, lanes), id);
        id
    }

    /// The variant of `base` carrying `quals` in addition to its own.
    ///
    /// Combined qualifiers that are empty yield the main variant.
    pub fn qualified(&mut self, base: TypeId, quals: Qualifiers) -> TypeId {
        let main = self.main_variant(base);
        let combined = self.quals(base) | quals;
        if combined.is_empty() {
            return main;
        }
        if let Some(&id) = self.variants.get(&(main, combined)) {
            return id;
        }
        let mut node = self.get(main).clone();
        node.quals = combined;
        node.main_variant = main;
        let id = TypeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.variants.insert((main, combined), id);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> TypeArena {
        TypeArena::new(DataModel::lp64_x86())
    }

    #[test]
    fn same_width_integers_have_distinct_identity() {
        let mut a = arena();
        let int = a.make_integer(4, false, "int");
        let int32 = a.make_integer(4, false, "int32_t");
        assert_ne!(int, int32);
        assert_eq!(a.size_bytes(int), a.size_bytes(int32));
    }

    #[test]
    fn pointers_are_interned() {
        let mut a = arena();
        let float = a.make_real(4, "float");
        let p1 = a.pointer_to(float);
        let p2 = a.pointer_to(float);
        assert_eq!(p1, p2);
        assert_eq!(a.size_bytes(p1), Some(8));
        assert_eq!(a.kind(p1), &TypeKind::Pointer { pointee: float });
    }

    #[test]
    fn qualified_variants_share_main_variant() {
        let mut a = arena();
        let float = a.make_real(4, "float");
        let cf = a.qualified(float, Qualifiers::CONST);
        let cvf = a.qualified(cf, Qualifiers::VOLATILE);
        assert_ne!(cf, float);
        assert_eq!(a.main_variant(cf), float);
        assert_eq!(a.main_variant(cvf), float);
        assert_eq!(a.quals(cvf), Qualifiers::CONST | Qualifiers::VOLATILE);
        assert_eq!(a.qualified(float, Qualifiers::CONST), cf);
        assert_eq!(a.qualified(cf, Qualifiers::empty()), cf);
        assert_eq!(a.kind(cf), &TypeKind::Real);
    }

    #[test]
    fn vector_size_follows_lanes() {
        let mut a = arena();
        let int = a.make_integer(4, false, "int");
        let v4 = a.vector_of(int, LaneCount::Fixed(4));
        assert_eq!(a.size_bytes(v4), Some(16));
        assert_eq!(a.vector_of(int, LaneCount::Fixed(4)), v4);
        let sv = a.vector_of(int, LaneCount::Scalable { min: 4 });
        assert_eq!(a.size_bytes(sv), None);
        assert_eq!(LaneCount::Scalable { min: 4 }.to_constant(), None);
    }

    #[test]
    fn describe_spells_qualifiers_and_functions() {
        let mut a = arena();
        let void = a.make_void();
        let float = a.make_real(4, "float");
        let cf = a.qualified(float, Qualifiers::CONST);
        let p = a.pointer_to(cf);
        let f = a.make_function(void, vec![p], ParamTerminator::Ellipsis);
        assert_eq!(a.describe(p), "const float *");
        assert_eq!(a.describe(f), "void (const float *, ...)");
    }

    #[test]
    fn function_types_are_interned() {
        let mut a = arena();
        let void = a.make_void();
        let int = a.make_integer(4, false, "int");
        let f1 = a.make_function(void, vec![int], ParamTerminator::Void);
        let f2 = a.make_function(void, vec![int], ParamTerminator::Void);
        let variadic = a.make_function(void, vec![int], ParamTerminator::Ellipsis);
        assert_eq!(f1, f2);
        assert_ne!(f1, variadic);
    }

    #[test]
    fn integral_classification() {
        assert!(TypeKind::Boolean.is_integral());
        assert!(TypeKind::Enumeral { unsigned: false }.is_integral());
        assert!(!TypeKind::Real.is_integral());
        assert!(TypeKind::Boolean.is_unsigned());
    }
}
