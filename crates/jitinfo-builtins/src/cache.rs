//! Built-in signature cache.
//!
//! Records every built-in the back end declares and, on first reference
//! by name, translates its function type into a [`BuiltinSignature`].
//! A built-in with an unrepresentable parameter or return type is left
//! unresolved and nothing is stored for it. A stored signature is shared
//! and never rebuilt while its declaration stays the same.

use std::collections::BTreeMap;
use std::sync::Arc;

use jitinfo_types::{TypeArena, TypeKind};

use crate::decl::{BuiltinDecl, BuiltinSignature};
use crate::error::{BuiltinError, Result};
use crate::translate::TypeTranslator;

/// Statistics about cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from a stored signature.
    pub hits: usize,
    /// Lookups that had to translate.
    pub misses: usize,
    /// Function types walked by the translator.
    pub translations: usize,
    /// Translations abandoned on an unrepresentable type.
    pub unresolved: usize,
}

/// Per-request cache of built-in declarations and signatures.
#[derive(Debug, Clone, Default)]
pub struct BuiltinCache {
    decls: BTreeMap<String, BuiltinDecl>,
    signatures: BTreeMap<String, Arc<BuiltinSignature>>,
    stats: CacheStats,
}

impl BuiltinCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a declaration. Returns false if an identical one was already recorded.
    ///
    /// Redeclaring a name with a different type drops its stored signature.
    pub fn declare(&mut self, decl: BuiltinDecl) -> bool {
        if let Some(existing) = self.decls.get(&decl.name) {
            if existing.fn_type == decl.fn_type {
                return false;
            }
            log::debug!("built-in '{}' redeclared with a new type", decl.name);
            self.signatures.remove(&decl.name);
        }
        self.decls.insert(decl.name.clone(), decl);
        true
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// Declared names, in sorted order.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.decls.keys().map(String::as_str)
    }

    pub fn declared_count(&self) -> usize {
        self.decls.len()
    }

    /// The stored signature for `name`, without translating or counting.
    pub fn cached(&self, name: &str) -> Option<&Arc<BuiltinSignature>> {
        self.signatures.get(name)
    }

    /// Resolve `name` to its signature, translating on first reference.
    ///
    /// `Ok(None)` means the built-in is undeclared or not usable.
    pub fn resolve(
        &mut self,
        name: &str,
        arena: &TypeArena,
        translator: &TypeTranslator,
    ) -> Result<Option<Arc<BuiltinSignature>>> {
        if let Some(sig) = self.signatures.get(name) {
            self.stats.hits += 1;
            log::trace!("built-in '{}': cache hit", name);
            return Ok(Some(Arc::clone(sig)));
        }
        self.stats.misses += 1;

        let Some(decl) = self.decls.get(name) else {
            log::debug!("built-in '{}' is not declared", name);
            return Ok(None);
        };
        let TypeKind::Function(func) = arena.kind(decl.fn_type) else {
            return Err(BuiltinError::InvalidPrototype {
                detail: format!("'{}' is not declared with a function type", name),
            });
        };

        self.stats.translations += 1;
        let mut parameter_types = Vec::with_capacity(func.params.len());
        for &param in &func.params {
            match translator.translate(arena, param)? {
                Some(tag) => parameter_types.push(tag),
                None => {
                    log::debug!(
                        "built-in '{}' unresolved: parameter type '{}' is not representable",
                        name,
                        arena.describe(param)
                    );
                    self.stats.unresolved += 1;
                    return Ok(None);
                }
            }
        }
        let Some(return_type) = translator.translate(arena, func.ret)? else {
            log::debug!(
                "built-in '{}' unresolved: return type '{}' is not representable",
                name,
                arena.describe(func.ret)
            );
            self.stats.unresolved += 1;
            return Ok(None);
        };

        let sig = Arc::new(BuiltinSignature {
            name: name.to_string(),
            parameter_types,
            is_variadic: func.is_variadic(),
            return_type,
        });
        self.signatures.insert(name.to_string(), Arc::clone(&sig));
        Ok(Some(sig))
    }

    /// Stored signatures, in name order.
    pub fn signatures(&self) -> impl Iterator<Item = &Arc<BuiltinSignature>> {
        self.signatures.values()
    }

    pub fn statistics(&self) -> CacheStats {
        self.stats
    }
}
