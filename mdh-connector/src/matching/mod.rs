//! Match requests and responses

pub mod assemble;
pub mod models;

pub use assemble::{MatchContext, SourceGroup, assemble, group_by_source, source_id};
pub use models::{FuzzyMatchDetails, MatchCandidate, MatchEntityResponse, MatchResult, MatchStatus};
