pub mod query;
pub mod recommendations;

pub use query::{query_games, PageRequest, QueryOptions, QueryResult, SearchScope};
pub use recommendations::{RecommendConfig, RecommendationEngine, RecommendationReason};
