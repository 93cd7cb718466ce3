//! One compilation request, as seen by the embedding client.
//!
//! A request owns the target info moved out of the back end, the type
//! arena its built-ins are declared in and its own built-in cache. The
//! cache never outlives the request, so signatures computed under one
//! target's type widths can't leak into another's.

use std::collections::BTreeSet;
use std::sync::Arc;

use jitinfo_builtins::catalog;
use jitinfo_builtins::{
    BuiltinCache, BuiltinSignature, CacheStats, TypeNames, TypeTranslator,
};
use jitinfo_targets::parse::ensure_valid;
use jitinfo_targets::{TargetCapabilities, TargetConfig, TargetInfo};
use jitinfo_types::{CanonicalTypes, PortableType, TypeArena, TypeId};

use crate::error::{Result, SessionError};

/// The two passes over one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Structure and types are established.
    Recording,
    /// Real code generation.
    Playback,
}

#[derive(Debug)]
pub struct CompileRequest {
    config: TargetConfig,
    info: TargetInfo,
    arena: TypeArena,
    canon: CanonicalTypes,
    names: TypeNames,
    translator: TypeTranslator,
    cache: BuiltinCache,
    pass: Pass,
}

impl CompileRequest {
    /// Build the request's types and declare the target's built-ins.
    pub(crate) fn new(info: TargetInfo, config: &TargetConfig) -> Result<Self> {
        ensure_valid(config)?;
        let model = config.data_model();
        let mut arena = TypeArena::new(model);
        let canon = CanonicalTypes::install(&mut arena);
        let names = catalog::install_typedefs(&mut arena, &canon, config);
        let translator = TypeTranslator::new(&canon, &model);

        let mut cache = BuiltinCache::new();
        for decl in catalog::declare_all(&mut arena, &names, config)? {
            cache.declare(decl);
        }
        log::debug!(
            "{}: request started in recording pass",
            config.name
        );

        Ok(Self {
            config: config.clone(),
            info,
            arena,
            canon,
            names,
            translator,
            cache,
            pass: Pass::Recording,
        })
    }

    pub fn pass(&self) -> Pass {
        self.pass
    }

    pub fn target_name(&self) -> &str {
        &self.config.name
    }

    pub fn architecture(&self) -> Option<&str> {
        self.info.arch()
    }

    pub fn has_feature(&self, key: &str, value: &str) -> bool {
        self.info.has_feature(key, value)
    }

    pub fn supported_types(&self) -> &BTreeSet<PortableType> {
        self.info.supported_types()
    }

    pub fn supports_128bit_int(&self) -> bool {
        self.info.supports_128bit_int()
    }

    pub fn target_info(&self) -> &TargetInfo {
        &self.info
    }

    /// The signature of a built-in, or `None` if it is not usable here.
    ///
    /// Errors only on a broken target description.
    pub fn resolve_builtin(&mut self, name: &str) -> Result<Option<Arc<BuiltinSignature>>> {
        Ok(self.cache.resolve(name, &self.arena, &self.translator)?)
    }

    /// Names of all declared built-ins, usable or not.
    pub fn builtin_names(&self) -> impl Iterator<Item = &str> {
        self.cache.declared_names()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.statistics()
    }

    /// Switch to the playback pass.
    ///
    /// The catalogue is declared again and every built-in is bound; ones
    /// resolved during recording come straight from the cache. Returns how
    /// many built-ins are usable.
    pub fn enter_playback(&mut self) -> Result<usize> {
        if self.pass == Pass::Playback {
            return Err(SessionError::AlreadyInPlayback);
        }
        for decl in catalog::declare_all(&mut self.arena, &self.names, &self.config)? {
            self.cache.declare(decl);
        }
        let names: Vec<String> = self.cache.declared_names().map(str::to_string).collect();
        let mut usable = 0;
        for name in &names {
            if self.resolve_builtin(name)?.is_some() {
                usable += 1;
            }
        }
        self.pass = Pass::Playback;
        log::debug!(
            "{}: playback pass, {} of {} built-ins usable",
            self.config.name,
            usable,
            names.len()
        );
        Ok(usable)
    }

    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }

    /// Mutable access for building types of the request's own.
    pub fn arena_mut(&mut self) -> &mut TypeArena {
        &mut self.arena
    }

    pub fn canonical_types(&self) -> &CanonicalTypes {
        &self.canon
    }

    /// Translate a type of this request's arena.
    pub fn translate(&self, id: TypeId) -> Result<Option<PortableType>> {
        Ok(self.translator.translate(&self.arena, id)?)
    }

    /// End the request, handing its target info to the caller.
    pub fn into_target_info(self) -> TargetInfo {
        self.info
    }
}

#[cfg(test)]
mod tests {
    use jitinfo_targets::NoCpuDetector;

    use super::*;
    use crate::backend::JitBackend;

    fn request(config: TargetConfig) -> CompileRequest {
        JitBackend::new(config)
            .with_detector(Box::new(NoCpuDetector))
            .start_request()
            .unwrap()
    }

    #[test]
    fn starts_in_recording() {
        let req = request(TargetConfig::x86_64_generic());
        assert_eq!(req.pass(), Pass::Recording);
        assert!(req.builtin_names().any(|n| n == "__builtin_trap"));
        assert_eq!(req.cache_stats(), CacheStats::default());
    }

    #[test]
    fn playback_hits_recorded_signatures() {
        let mut req = request(TargetConfig::x86_64_haswell());
        let recorded = req.resolve_builtin("__builtin_ia32_addps256").unwrap().unwrap();
        assert_eq!(req.cache_stats().translations, 1);

        let usable = req.enter_playback().unwrap();
        assert!(usable > 0);
        assert!(usable < req.builtin_names().count());
        assert_eq!(req.pass(), Pass::Playback);
        assert!(req.cache_stats().hits >= 1);

        let replayed = req.resolve_builtin("__builtin_ia32_addps256").unwrap().unwrap();
        assert!(Arc::ptr_eq(&recorded, &replayed));
        assert!(matches!(
            req.enter_playback(),
            Err(SessionError::AlreadyInPlayback)
        ));
    }

    #[test]
    fn vector_builtin_signature() {
        let mut req = request(TargetConfig::x86_64_generic());
        let sig = req.resolve_builtin("__builtin_ia32_paddd128").unwrap().unwrap();
        assert_eq!(sig.return_type, PortableType::i32().vector(4));
        assert_eq!(sig.parameter_types.len(), 2);
    }

    #[test]
    fn va_list_is_usable_only_where_representable() {
        let mut wide = request(TargetConfig::x86_64_generic());
        assert!(wide.resolve_builtin("__builtin_va_end").unwrap().is_none());

        let mut narrow = request(TargetConfig::i686_generic());
        let sig = narrow.resolve_builtin("__builtin_va_end").unwrap().unwrap();
        assert_eq!(sig.parameter_types, vec![PortableType::Char.pointer()]);
    }

    #[test]
    fn invalid_description_is_rejected() {
        let mut config = TargetConfig::i686_generic();
        config.isa.insert("no-such-extension".into());
        let mut backend = JitBackend::new(config).with_detector(Box::new(NoCpuDetector));
        assert!(matches!(
            backend.start_request(),
            Err(SessionError::Target(jitinfo_targets::TargetError::Validation { .. }))
        ));
    }

    #[test]
    fn gated_builtin_is_undeclared() {
        let mut req = request(TargetConfig::x86_64_generic());
        assert!(req.resolve_builtin("__builtin_ia32_addps256").unwrap().is_none());
        assert!(!req.builtin_names().any(|n| n == "__builtin_ia32_addps256"));
    }
}
