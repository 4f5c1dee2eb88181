//! Declared-type tags used to drive assignment storage discipline.
use serde::{Deserialize, Serialize};

/// Classifies a named variable at declaration.
///
/// The declared type is immutable once the variable is initialized and
/// selects which store bucket an assignment writes into (see
/// `scanvm_runtime::exec`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclaredType {
    Bool,
    Int,
    Real,
    Time,
    String,
    Timer,
    Counter,
    EdgeDetector,
    Bistable,
    Array,
    Unknown,
}

impl DeclaredType {
    /// Maps a type-spec keyword (as written in a VAR block) to its tag.
    ///
    /// Unknown keywords map to [`DeclaredType::Unknown`] rather than
    /// failing: the declaration may still name a user function block, a
    /// structure, or an enumeration the core does not model directly.
    pub fn from_keyword(keyword: &str) -> DeclaredType {
        match keyword.to_ascii_uppercase().as_str() {
            "BOOL" => DeclaredType::Bool,
            "INT" | "SINT" | "DINT" | "LINT" | "USINT" | "UINT" | "UDINT" | "ULINT" | "BYTE"
            | "WORD" | "DWORD" | "LWORD" => DeclaredType::Int,
            "REAL" | "LREAL" => DeclaredType::Real,
            "TIME" => DeclaredType::Time,
            "STRING" | "WSTRING" => DeclaredType::String,
            "TON" | "TOF" | "TP" | "TIMER" => DeclaredType::Timer,
            "CTU" | "CTD" | "CTUD" | "COUNTER" => DeclaredType::Counter,
            "R_TRIG" | "F_TRIG" | "EDGE_DETECTOR" => DeclaredType::EdgeDetector,
            "SR" | "RS" | "BISTABLE" => DeclaredType::Bistable,
            "ARRAY" => DeclaredType::Array,
            _ => DeclaredType::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_keyword_when_known_scalar_then_maps() {
        assert_eq!(DeclaredType::from_keyword("bool"), DeclaredType::Bool);
        assert_eq!(DeclaredType::from_keyword("DINT"), DeclaredType::Int);
        assert_eq!(DeclaredType::from_keyword("LREAL"), DeclaredType::Real);
    }

    #[test]
    fn from_keyword_when_fb_type_then_maps_to_kind() {
        assert_eq!(DeclaredType::from_keyword("TON"), DeclaredType::Timer);
        assert_eq!(DeclaredType::from_keyword("CTUD"), DeclaredType::Counter);
        assert_eq!(
            DeclaredType::from_keyword("R_TRIG"),
            DeclaredType::EdgeDetector
        );
        assert_eq!(DeclaredType::from_keyword("RS"), DeclaredType::Bistable);
    }

    #[test]
    fn from_keyword_when_unrecognized_then_unknown() {
        assert_eq!(
            DeclaredType::from_keyword("MyStruct"),
            DeclaredType::Unknown
        );
    }
}
