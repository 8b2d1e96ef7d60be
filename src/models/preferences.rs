use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::{fmt::Display, str::FromStr};

/// Number of genres a query must name
pub const GENRES_PER_QUERY: usize = 3;

/// Inclusive runtime bounds in minutes
pub const RUNTIME_MIN: u16 = 60;
pub const RUNTIME_MAX: u16 = 240;

/// Inclusive IMDb rating bounds
pub const RATING_MIN: f64 = 1.0;
pub const RATING_MAX: f64 = 10.0;

/// Reasons a preference draft cannot become a query.
///
/// The display text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("Choose three genres so I can get started.")]
    NoGenres,

    #[error("Please choose exactly three genres (you chose {0}).")]
    GenreCount(usize),

    #[error("The genre '{0}' was chosen more than once.")]
    DuplicateGenre(Genre),

    #[error("Unknown genre '{0}'.")]
    UnknownGenre(String),

    #[error("Runtime must lie between 60 and 240 minutes (got {min}–{max}).")]
    RuntimeOutOfBounds { min: i64, max: i64 },

    #[error("The shortest runtime ({min} min) is longer than the longest ({max} min).")]
    RuntimeInverted { min: i64, max: i64 },

    #[error("IMDb rating must lie between 1.0 and 10.0 (got {min}–{max}).")]
    RatingOutOfBounds { min: f64, max: f64 },

    #[error("The lowest rating ({min}) is above the highest ({max}).")]
    RatingInverted { min: f64, max: f64 },
}

/// The fixed genre catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Comedy,
    Drama,
    Action,
    ScienceFiction,
    Horror,
    Thriller,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Comedy,
        Genre::Drama,
        Genre::Action,
        Genre::ScienceFiction,
        Genre::Horror,
        Genre::Thriller,
    ];

    /// Human-readable label used in the narrative
    pub fn label(self) -> &'static str {
        match self {
            Genre::Comedy => "Comedy",
            Genre::Drama => "Drama",
            Genre::Action => "Action",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Horror => "Horror",
            Genre::Thriller => "Thriller",
        }
    }

    /// Stable identifier, matching the serde representation
    pub fn id(self) -> &'static str {
        match self {
            Genre::Comedy => "comedy",
            Genre::Drama => "drama",
            Genre::Action => "action",
            Genre::ScienceFiction => "science_fiction",
            Genre::Horror => "horror",
            Genre::Thriller => "thriller",
        }
    }
}

impl Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Genre {
    type Err = QueryError;

    /// Accepts either the label ("Science Fiction") or the id ("science_fiction"), ignoring case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Genre::ALL
            .iter()
            .copied()
            .find(|g| g.label().eq_ignore_ascii_case(needle) || g.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| QueryError::UnknownGenre(needle.to_string()))
    }
}

/// Release era of the recommended films
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Era {
    #[default]
    Classic,
    Modern,
}

impl Era {
    pub const ALL: [Era; 2] = [Era::Classic, Era::Modern];

    pub fn label(self) -> &'static str {
        match self {
            Era::Classic => "Classic (<2000)",
            Era::Modern => "Modern (2000+)",
        }
    }

    /// Inclusive window of release years the era implies
    pub fn release_years(self) -> (u32, u32) {
        match self {
            Era::Classic => (1950, 1999),
            Era::Modern => (2000, 2024),
        }
    }

    fn id(self) -> &'static str {
        match self {
            Era::Classic => "classic",
            Era::Modern => "modern",
        }
    }
}

/// Visual style of the recommended films
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualStyle {
    #[default]
    LiveAction,
    Animation,
    BlackAndWhite,
}

impl VisualStyle {
    pub const ALL: [VisualStyle; 3] = [
        VisualStyle::LiveAction,
        VisualStyle::Animation,
        VisualStyle::BlackAndWhite,
    ];

    pub fn label(self) -> &'static str {
        match self {
            VisualStyle::LiveAction => "Live action",
            VisualStyle::Animation => "Animation",
            VisualStyle::BlackAndWhite => "Black & white",
        }
    }

    fn id(self) -> &'static str {
        match self {
            VisualStyle::LiveAction => "live_action",
            VisualStyle::Animation => "animation",
            VisualStyle::BlackAndWhite => "black_and_white",
        }
    }
}

/// Runtime window in minutes, `60 <= min <= max <= 240`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RuntimeRange {
    pub min: u16,
    pub max: u16,
}

impl RuntimeRange {
    pub fn new(min: i64, max: i64) -> Result<Self, QueryError> {
        let bounds = i64::from(RUNTIME_MIN)..=i64::from(RUNTIME_MAX);
        if !bounds.contains(&min) || !bounds.contains(&max) {
            return Err(QueryError::RuntimeOutOfBounds { min, max });
        }
        if min > max {
            return Err(QueryError::RuntimeInverted { min, max });
        }
        // Both values were range-checked against u16 bounds above
        Ok(Self {
            min: min as u16,
            max: max as u16,
        })
    }
}

/// IMDb rating window, `1.0 <= min <= max <= 10.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingRange {
    pub min: f64,
    pub max: f64,
}

impl RatingRange {
    pub fn new(min: f64, max: f64) -> Result<Self, QueryError> {
        let bounds = RATING_MIN..=RATING_MAX;
        if !bounds.contains(&min) || !bounds.contains(&max) {
            return Err(QueryError::RatingOutOfBounds { min, max });
        }
        if min > max {
            return Err(QueryError::RatingInverted { min, max });
        }
        Ok(Self { min, max })
    }

    /// Clamps a value back into the window
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// Opaque identity of a draft's field values, used to detect change
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct QuerySignature(String);

impl QuerySignature {
    fn compute(canonical: &str) -> Self {
        let digest = Sha256::digest(canonical.as_bytes());
        Self(hex::encode(&digest[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QuerySignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unvalidated control values as the form layer sends them.
///
/// Missing fields take the form's initial control values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryDraft {
    pub genres: Vec<String>,
    pub era: Era,
    pub style: VisualStyle,
    pub runtime_min: i64,
    pub runtime_max: i64,
    pub rating_min: f64,
    pub rating_max: f64,
}

impl Default for QueryDraft {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            era: Era::default(),
            style: VisualStyle::default(),
            runtime_min: 90,
            runtime_max: 120,
            rating_min: 6.0,
            rating_max: 8.5,
        }
    }
}

impl QueryDraft {
    /// Signature over all fields. Genre order does not matter; known genres
    /// are compared by id so "drama" and "Drama" are the same choice.
    pub fn signature(&self) -> QuerySignature {
        let mut genres: Vec<String> = self
            .genres
            .iter()
            .map(|raw| {
                raw.parse::<Genre>()
                    .map(|g| g.id().to_string())
                    .unwrap_or_else(|_| raw.trim().to_lowercase())
            })
            .collect();
        genres.sort();

        let canonical = format!(
            "genres={};era={};style={};runtime={}-{};rating={:016x}-{:016x}",
            genres.join(","),
            self.era.id(),
            self.style.id(),
            self.runtime_min,
            self.runtime_max,
            self.rating_min.to_bits(),
            self.rating_max.to_bits(),
        );
        QuerySignature::compute(&canonical)
    }
}

/// A validated, immutable set of movie preferences
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceQuery {
    pub genres: [Genre; GENRES_PER_QUERY],
    pub era: Era,
    pub style: VisualStyle,
    pub runtime: RuntimeRange,
    pub rating: RatingRange,
}

impl PreferenceQuery {
    /// Validates every field and builds the query
    pub fn new(
        genres: &[Genre],
        era: Era,
        style: VisualStyle,
        runtime: RuntimeRange,
        rating: RatingRange,
    ) -> Result<Self, QueryError> {
        let genres = validate_genres(genres)?;
        // Ranges built directly are re-checked so a hand-made struct cannot slip through
        let runtime = RuntimeRange::new(i64::from(runtime.min), i64::from(runtime.max))?;
        let rating = RatingRange::new(rating.min, rating.max)?;
        Ok(Self {
            genres,
            era,
            style,
            runtime,
            rating,
        })
    }

    /// Re-checks the invariants of an existing query
    pub fn validate(&self) -> Result<(), QueryError> {
        Self::new(&self.genres, self.era, self.style, self.runtime, self.rating).map(|_| ())
    }

    pub fn signature(&self) -> QuerySignature {
        QueryDraft::from(self).signature()
    }

    /// One-line configuration summary, e.g.
    /// `Era: Modern (2000+) | Style: Live action | Runtime: 90–120 min | IMDb: 6.00–8.50`
    pub fn summary(&self) -> String {
        format!(
            "Era: {} | Style: {} | Runtime: {}–{} min | IMDb: {:.2}–{:.2}",
            self.era.label(),
            self.style.label(),
            self.runtime.min,
            self.runtime.max,
            self.rating.min,
            self.rating.max,
        )
    }
}

fn validate_genres(genres: &[Genre]) -> Result<[Genre; GENRES_PER_QUERY], QueryError> {
    match genres.len() {
        0 => return Err(QueryError::NoGenres),
        GENRES_PER_QUERY => {}
        n => return Err(QueryError::GenreCount(n)),
    }
    for (i, genre) in genres.iter().enumerate() {
        if genres[..i].contains(genre) {
            return Err(QueryError::DuplicateGenre(*genre));
        }
    }
    Ok([genres[0], genres[1], genres[2]])
}

impl TryFrom<&QueryDraft> for PreferenceQuery {
    type Error = QueryError;

    fn try_from(draft: &QueryDraft) -> Result<Self, Self::Error> {
        // Cardinality is reported before unknown names, matching what the form shows first
        match draft.genres.len() {
            0 => return Err(QueryError::NoGenres),
            GENRES_PER_QUERY => {}
            n => return Err(QueryError::GenreCount(n)),
        }
        let genres = draft
            .genres
            .iter()
            .map(|g| g.parse::<Genre>())
            .collect::<Result<Vec<_>, _>>()?;
        let runtime = RuntimeRange::new(draft.runtime_min, draft.runtime_max)?;
        let rating = RatingRange::new(draft.rating_min, draft.rating_max)?;
        Self::new(&genres, draft.era, draft.style, runtime, rating)
    }
}

impl From<&PreferenceQuery> for QueryDraft {
    fn from(query: &PreferenceQuery) -> Self {
        Self {
            genres: query.genres.iter().map(|g| g.label().to_string()).collect(),
            era: query.era,
            style: query.style,
            runtime_min: i64::from(query.runtime.min),
            runtime_max: i64::from(query.runtime.max),
            rating_min: query.rating.min,
            rating_max: query.rating.max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(genres: &[&str]) -> QueryDraft {
        QueryDraft {
            genres: genres.iter().map(|g| g.to_string()).collect(),
            era: Era::Modern,
            ..QueryDraft::default()
        }
    }

    #[test]
    fn test_genre_parses_label_and_id() {
        assert_eq!("Science Fiction".parse::<Genre>(), Ok(Genre::ScienceFiction));
        assert_eq!("science_fiction".parse::<Genre>(), Ok(Genre::ScienceFiction));
        assert_eq!(" horror ".parse::<Genre>(), Ok(Genre::Horror));
        assert_eq!(
            "Western".parse::<Genre>(),
            Err(QueryError::UnknownGenre("Western".to_string()))
        );
    }

    #[test]
    fn test_valid_draft_becomes_query() {
        let query = PreferenceQuery::try_from(&draft(&["Drama", "Horror", "Thriller"])).unwrap();
        assert_eq!(query.genres, [Genre::Drama, Genre::Horror, Genre::Thriller]);
        assert_eq!(query.runtime, RuntimeRange { min: 90, max: 120 });
        assert_eq!(query.rating, RatingRange { min: 6.0, max: 8.5 });
    }

    #[test]
    fn test_genre_cardinality_is_enforced() {
        assert_eq!(
            PreferenceQuery::try_from(&draft(&[])),
            Err(QueryError::NoGenres)
        );
        assert_eq!(
            PreferenceQuery::try_from(&draft(&["Drama", "Horror"])),
            Err(QueryError::GenreCount(2))
        );
        assert_eq!(
            PreferenceQuery::try_from(&draft(&["Drama", "Horror", "Thriller", "Action"])),
            Err(QueryError::GenreCount(4))
        );
        assert_eq!(
            PreferenceQuery::try_from(&draft(&["Drama", "drama", "Thriller"])),
            Err(QueryError::DuplicateGenre(Genre::Drama))
        );
    }

    #[test]
    fn test_range_invariants_are_enforced() {
        let mut d = draft(&["Drama", "Horror", "Thriller"]);
        d.runtime_min = 59;
        assert!(matches!(
            PreferenceQuery::try_from(&d),
            Err(QueryError::RuntimeOutOfBounds { .. })
        ));

        let mut d = draft(&["Drama", "Horror", "Thriller"]);
        d.runtime_min = 150;
        d.runtime_max = 120;
        assert!(matches!(
            PreferenceQuery::try_from(&d),
            Err(QueryError::RuntimeInverted { .. })
        ));

        let mut d = draft(&["Drama", "Horror", "Thriller"]);
        d.rating_max = 10.5;
        assert!(matches!(
            PreferenceQuery::try_from(&d),
            Err(QueryError::RatingOutOfBounds { .. })
        ));

        let mut d = draft(&["Drama", "Horror", "Thriller"]);
        d.rating_min = f64::NAN;
        assert!(matches!(
            PreferenceQuery::try_from(&d),
            Err(QueryError::RatingOutOfBounds { .. })
        ));

        let mut d = draft(&["Drama", "Horror", "Thriller"]);
        d.rating_min = 9.0;
        assert!(matches!(
            PreferenceQuery::try_from(&d),
            Err(QueryError::RatingInverted { .. })
        ));
    }

    #[test]
    fn test_signature_ignores_genre_order_and_case() {
        let a = draft(&["Drama", "Horror", "Thriller"]);
        let b = draft(&["thriller", "DRAMA", "horror"]);
        assert_eq!(a.signature(), b.signature());
    }

    #[test]
    fn test_signature_changes_with_any_field() {
        let base = draft(&["Drama", "Horror", "Thriller"]);
        let mut runtime = base.clone();
        runtime.runtime_min = 95;
        let mut rating = base.clone();
        rating.rating_max = 8.4;
        let mut era = base.clone();
        era.era = Era::Classic;
        let mut style = base.clone();
        style.style = VisualStyle::Animation;
        let genres = draft(&["Drama", "Horror", "Comedy"]);

        for other in [runtime, rating, era, style, genres] {
            assert_ne!(base.signature(), other.signature());
        }
    }

    #[test]
    fn test_query_signature_matches_its_draft() {
        let d = draft(&["drama", "science_fiction", "Thriller"]);
        let query = PreferenceQuery::try_from(&d).unwrap();
        assert_eq!(query.signature(), d.signature());
    }

    #[test]
    fn test_summary_format() {
        let query = PreferenceQuery::try_from(&draft(&["Drama", "Horror", "Thriller"])).unwrap();
        assert_eq!(
            query.summary(),
            "Era: Modern (2000+) | Style: Live action | Runtime: 90–120 min | IMDb: 6.00–8.50"
        );
    }

    #[test]
    fn test_draft_defaults_fill_missing_fields() {
        let d: QueryDraft = serde_json::from_str(r#"{"genres": ["Drama"]}"#).unwrap();
        assert_eq!(d.runtime_min, 90);
        assert_eq!(d.rating_max, 8.5);
        assert_eq!(d.era, Era::Classic);
        assert_eq!(d.style, VisualStyle::LiveAction);
    }
}
