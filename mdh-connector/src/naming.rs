//! Naming conventions for synthesized types and reserved fields
//!
//! Child types are named by prefixing the parent type name (`"Customer - address"`),
//! host-facing record types carry the universe id plus a mode suffix
//! (`"<universe>-golden-record"`), and connector-internal fields start with `___`.

use crate::constants::{
    GOLDEN_RECORD_SUFFIX, MATCH_SUFFIX, QUARANTINE_SUFFIX, RESERVED_PREFIX, TYPE_NAME_SEPARATOR,
};

/// Build the name of a child type nested under `parent_type`
pub fn child_type_name(parent_type: &str, field_name: &str) -> String {
    format!("{}{}{}", parent_type, TYPE_NAME_SEPARATOR, field_name)
}

/// Strip the `"<parent_type> - "` prefix from a child type name
///
/// Returns `None` when the name was not built from `parent_type`.
pub fn strip_type_prefix<'a>(type_name: &'a str, parent_type: &str) -> Option<&'a str> {
    type_name
        .strip_prefix(parent_type)?
        .strip_prefix(TYPE_NAME_SEPARATOR)
        .filter(|rest| !rest.is_empty())
}

/// Whether a raw field name is connector-internal
pub fn is_reserved_field(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

pub fn golden_record_type_name(universe_id: &str) -> String {
    format!("{}{}", universe_id, GOLDEN_RECORD_SUFFIX)
}

pub fn quarantine_type_name(universe_id: &str) -> String {
    format!("{}{}", universe_id, QUARANTINE_SUFFIX)
}

pub fn match_type_name(universe_id: &str) -> String {
    format!("{}{}", universe_id, MATCH_SUFFIX)
}

/// The consumption mode encoded in a host-facing type name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    GoldenRecord,
    Quarantine,
    Match,
}

impl TypeKind {
    pub fn suffix(&self) -> &'static str {
        match self {
            TypeKind::GoldenRecord => GOLDEN_RECORD_SUFFIX,
            TypeKind::Quarantine => QUARANTINE_SUFFIX,
            TypeKind::Match => MATCH_SUFFIX,
        }
    }

    /// Split a type name into its mode and universe id
    ///
    /// `"1234-golden-record"` -> `(GoldenRecord, "1234")`
    pub fn from_type_name(type_name: &str) -> Option<(TypeKind, &str)> {
        [TypeKind::GoldenRecord, TypeKind::Quarantine, TypeKind::Match]
            .into_iter()
            .find_map(|kind| {
                type_name
                    .strip_suffix(kind.suffix())
                    .filter(|universe| !universe.is_empty())
                    .map(|universe| (kind, universe))
            })
    }

    pub fn type_name(&self, universe_id: &str) -> String {
        format!("{}{}", universe_id, self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_type_name() {
        assert_eq!(child_type_name("Customer", "address"), "Customer - address");
        assert_eq!(
            child_type_name(&child_type_name("Customer", "address"), "geo"),
            "Customer - address - geo"
        );
    }

    #[test]
    fn test_strip_type_prefix() {
        assert_eq!(strip_type_prefix("Customer - address", "Customer"), Some("address"));
        assert_eq!(
            strip_type_prefix("Customer - address - geo", "Customer - address"),
            Some("geo")
        );
        assert_eq!(strip_type_prefix("Supplier - address", "Customer"), None);
        assert_eq!(strip_type_prefix("Customer - ", "Customer"), None);
        assert_eq!(strip_type_prefix("Customeraddress", "Customer"), None);
    }

    #[test]
    fn test_is_reserved_field() {
        assert!(is_reserved_field("___sourceId"));
        assert!(!is_reserved_field("__almost"));
        assert!(!is_reserved_field("name"));
    }

    #[test]
    fn test_type_kind_from_type_name() {
        assert_eq!(
            TypeKind::from_type_name("12fa-golden-record"),
            Some((TypeKind::GoldenRecord, "12fa"))
        );
        assert_eq!(
            TypeKind::from_type_name("12fa-quarantine"),
            Some((TypeKind::Quarantine, "12fa"))
        );
        assert_eq!(TypeKind::from_type_name("12fa-match"), Some((TypeKind::Match, "12fa")));
        assert_eq!(TypeKind::from_type_name("-match"), None);
        assert_eq!(TypeKind::from_type_name("12fa-other"), None);
    }

    #[test]
    fn test_type_names_round_trip() {
        for kind in [TypeKind::GoldenRecord, TypeKind::Quarantine, TypeKind::Match] {
            let name = kind.type_name("universe");
            assert_eq!(TypeKind::from_type_name(&name), Some((kind, "universe")));
        }
        assert_eq!(golden_record_type_name("u"), "u-golden-record");
        assert_eq!(quarantine_type_name("u"), "u-quarantine");
        assert_eq!(match_type_name("u"), "u-match");
    }
}
