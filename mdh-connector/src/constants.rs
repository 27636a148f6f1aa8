//! Reserved field names and type-name conventions shared by the hub and the host runtime
//!
//! Raw names (`*_FIELD`) are what appears on records; display names are what the
//! synthesized type catalogue shows to the host engine.

/// Prefix marking connector-internal fields that never reach the hub
pub const RESERVED_PREFIX: &str = "___";

/// Separator used when prefixing child type names with their parent type
pub const TYPE_NAME_SEPARATOR: &str = " - ";

pub const GOLDEN_RECORD_SUFFIX: &str = "-golden-record";
pub const QUARANTINE_SUFFIX: &str = "-quarantine";
pub const MATCH_SUFFIX: &str = "-match";

/// Source used when a record carries a blank source id
pub const DEFAULT_SOURCE_ID: &str = "DEFAULT";

// Golden records
pub const RECORD_ID: &str = "Record ID";
pub const RECORD_ID_FIELD: &str = "___recordId";
pub const SOURCE_ID: &str = "Source ID";
pub const SOURCE_ID_FIELD: &str = "___sourceId";
pub const ENTITY_ID: &str = "Entity ID";
pub const ENTITY_ID_FIELD: &str = "___entityId";
pub const CREATED_DATE: &str = "Created Date";
pub const CREATED_DATE_FIELD: &str = "___createdDate";
pub const UPDATED_DATE: &str = "Updated Date";
pub const UPDATED_DATE_FIELD: &str = "___updatedDate";
pub const LINKS: &str = "Links";
pub const LINKS_FIELD: &str = "___links";
pub const LINK_TYPE: &str = "Link";

// Link records
pub const LINK_SOURCE: &str = "Source";
pub const LINK_ENTITY_ID: &str = "Entity ID";
pub const LINK_ESTABLISHED_DATE: &str = "Established Date";

// Quarantine entries
pub const STATUS: &str = "Status";
pub const STATUS_FIELD: &str = "___status";
pub const CAUSE: &str = "Cause";
pub const CAUSE_FIELD: &str = "___cause";
pub const REASON: &str = "Reason";
pub const REASON_FIELD: &str = "___reason";
pub const RESOLUTION: &str = "Resolution";
pub const RESOLUTION_FIELD: &str = "___resolution";
pub const TRANSACTION_ID: &str = "Transaction ID";
pub const TRANSACTION_ID_FIELD: &str = "___transactionId";
pub const SOURCE_ENTITY_ID: &str = "Source Entity ID";
pub const SOURCE_ENTITY_ID_FIELD: &str = "___sourceEntityId";
pub const END_DATE: &str = "End Date";
pub const END_DATE_FIELD: &str = "___endDate";

// Match results
pub const FUZZY_MATCH_DETAILS: &str = "Fuzzy Match Details";
pub const FUZZY_MATCH_DETAILS_FIELD: &str = "___fuzzyMatchDetails";
pub const FUZZY_MATCH_DETAILS_TYPE: &str = "Fuzzy Match Details";
pub const MATCH: &str = "Matching Entities";
pub const MATCH_FIELD: &str = "___matches";
pub const DUPLICATE: &str = "Duplicate Entities";
pub const DUPLICATE_FIELD: &str = "___duplicates";
pub const ALREADY_LINKED: &str = "Already Linked Entities";
pub const ALREADY_LINKED_FIELD: &str = "___alreadyLinked";

/// Key under which the hub nests fuzzy-match metadata next to a candidate entity
pub const HUB_FUZZY_MATCH_DETAILS_KEY: &str = "fuzzyMatchDetails";

// Fuzzy match detail properties, in the order they are emitted
pub const FUZZY_FIELD: &str = "Field";
pub const FUZZY_FIRST: &str = "First";
pub const FUZZY_SECOND: &str = "Second";
pub const FUZZY_METHOD: &str = "Method";
pub const FUZZY_MATCH_STRENGTH: &str = "Match Strength";
pub const FUZZY_THRESHOLD: &str = "Threshold";
