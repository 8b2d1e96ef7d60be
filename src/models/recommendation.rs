use serde::Serialize;

use super::{Genre, VisualStyle, GENRES_PER_QUERY};

/// The three canonical positions of the recommendation list, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationSlot {
    /// The title the narrative ends up endorsing
    TopPick,
    /// A close second with comparable verified reviews
    StrongAlternative,
    /// Surfaced through community comments rather than tags
    SecondarySignal,
}

impl RecommendationSlot {
    pub const ALL: [RecommendationSlot; 3] = [
        RecommendationSlot::TopPick,
        RecommendationSlot::StrongAlternative,
        RecommendationSlot::SecondarySignal,
    ];

    /// 1-based display rank
    pub fn rank(self) -> usize {
        match self {
            RecommendationSlot::TopPick => 1,
            RecommendationSlot::StrongAlternative => 2,
            RecommendationSlot::SecondarySignal => 3,
        }
    }

    /// Fixed offset added to the drawn rating before clamping
    pub fn rating_offset(self) -> f64 {
        match self {
            RecommendationSlot::TopPick => 0.0,
            RecommendationSlot::StrongAlternative => -0.3,
            RecommendationSlot::SecondarySignal => 0.2,
        }
    }
}

/// A scripted film suggestion with numbers drawn inside the query's bounds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub slot: RecommendationSlot,
    pub title: String,
    pub year: u32,
    pub genres: [Genre; GENRES_PER_QUERY],
    pub style: VisualStyle,
    pub runtime_minutes: u16,
    pub rating_score: f64,
    pub vote_count: u32,
    pub short_description: String,
}

impl Recommendation {
    /// Markdown body of the recommendation card
    pub fn card_text(&self) -> String {
        let genres = self
            .genres
            .iter()
            .map(|g| g.label())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "### {}) {}\n{} · {} · {} · {} min\n\nIMDb rating: {:.1}\n\nVotes: {}\n\n{}",
            self.slot.rank(),
            self.title,
            self.year,
            genres,
            self.style.label(),
            self.runtime_minutes,
            self.rating_score,
            group_thousands(self.vote_count),
            self.short_description,
        )
    }
}

/// Formats `14230` as `14 230`
fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    grouped
}
