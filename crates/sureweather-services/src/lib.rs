pub mod categories;
pub mod clothing;
pub mod events;
pub mod history_backend;
pub mod history_client;
pub mod history_pg;
pub mod history_store;
pub mod scoring;

pub use categories::{all_profiles, category_suitability, classify, CategoryProfile};
pub use clothing::{recommend_outfit, ClothingItem, ClothingRecommendation, OutfitRecommendation};
pub use events::{parse_categories, Event, EventCatalog, EventCategory, WeatherRequirements};
pub use history_backend::{
    clamp_limit, HistoryBackend, HistoryBackendError, HistoryBackendResult, HistoryRecord,
    NewHistoryRecord, QueryType,
};
pub use history_client::HistoryClient;
pub use history_pg::PgHistoryStore;
pub use history_store::SqliteHistoryStore;
pub use scoring::{EventScorer, EventSuitabilityScore, ScoringError};
