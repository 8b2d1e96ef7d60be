pub mod narrative;
pub mod preferences;
pub mod recommendation;

pub use narrative::{NarrativeMessage, Role};
pub use preferences::{
    Era, Genre, PreferenceQuery, QueryDraft, QueryError, QuerySignature, RatingRange,
    RuntimeRange, VisualStyle, GENRES_PER_QUERY, RATING_MAX, RATING_MIN, RUNTIME_MAX,
    RUNTIME_MIN,
};
pub use recommendation::{Recommendation, RecommendationSlot};
