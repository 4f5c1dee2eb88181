//! Declared-type and constant-name registries built once at program
//! initialization and treated as immutable thereafter (`spec.md` §3.1).
use std::collections::{HashMap, HashSet};

use scanvm_dsl::core::Id;
use scanvm_dsl::types::DeclaredType;

#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<Id, DeclaredType>,
}

impl TypeRegistry {
    pub fn new() -> TypeRegistry {
        TypeRegistry::default()
    }

    pub fn insert(&mut self, name: Id, declared: DeclaredType) {
        self.types.insert(name, declared);
    }

    pub fn get(&self, name: &Id) -> Option<DeclaredType> {
        self.types.get(name).copied()
    }
}

#[derive(Debug, Default)]
pub struct ConstantRegistry {
    constants: HashSet<Id>,
}

impl ConstantRegistry {
    pub fn new() -> ConstantRegistry {
        ConstantRegistry::default()
    }

    pub fn insert(&mut self, name: Id) {
        self.constants.insert(name);
    }

    pub fn contains(&self, name: &Id) -> bool {
        self.constants.contains(name)
    }
}

/// The specific function-block personality named by a declaration's
/// type keyword, finer-grained than [`DeclaredType`]'s coarse
/// Timer/Counter/EdgeDetector/Bistable buckets.
///
/// Dispatching a function-block call by declared kind (when the
/// instance was declared with a concrete keyword) is preferred over
/// the argument-signature heuristic, which is fragile for FB types
/// with overlapping pin names (§4.4 design note); the heuristic is
/// the fallback for instances this registry has no entry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FbKind {
    Ton,
    Tof,
    Tp,
    Ctu,
    Ctd,
    Ctud,
    RTrig,
    FTrig,
    Sr,
    Rs,
}

impl FbKind {
    pub fn from_keyword(keyword: &str) -> Option<FbKind> {
        match keyword.to_ascii_uppercase().as_str() {
            "TON" => Some(FbKind::Ton),
            "TOF" => Some(FbKind::Tof),
            "TP" => Some(FbKind::Tp),
            "CTU" => Some(FbKind::Ctu),
            "CTD" => Some(FbKind::Ctd),
            "CTUD" => Some(FbKind::Ctud),
            "R_TRIG" => Some(FbKind::RTrig),
            "F_TRIG" => Some(FbKind::FTrig),
            "SR" => Some(FbKind::Sr),
            "RS" => Some(FbKind::Rs),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct FbKindRegistry {
    kinds: HashMap<Id, FbKind>,
}

impl FbKindRegistry {
    pub fn new() -> FbKindRegistry {
        FbKindRegistry::default()
    }

    pub fn insert(&mut self, name: Id, kind: FbKind) {
        self.kinds.insert(name, kind);
    }

    pub fn get(&self, name: &Id) -> Option<FbKind> {
        self.kinds.get(name).copied()
    }
}
