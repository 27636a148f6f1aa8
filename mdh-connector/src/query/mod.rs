//! Filter translation from the host's list filters to hub query requests

pub mod filter;
pub mod request;
pub mod translate;

pub use filter::{CriteriaType, FilterWhere, ListFilter, OrderBy};
pub use request::{
    DateFilter, FieldValue, GoldenRecordFilter, GoldenRecordQueryRequest, QuarantineFilter,
    QuarantineQueryRequest, Sort, SortField,
};
pub use translate::{operator_for, translate, translate_quarantine, translate_with};
