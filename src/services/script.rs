//! Narrative Script Builder.
//!
//! Turns a validated [`PreferenceQuery`] into the scripted conversation: a user
//! echo, a fixed list of assistant lines, and three recommendation records whose
//! numbers are drawn inside the query's own bounds.

use serde::{Deserialize, Serialize};

use crate::{
    models::{
        NarrativeMessage, PreferenceQuery, QueryError, Recommendation, RecommendationSlot,
    },
    services::perturbation::PerturbationSource,
};

/// Inclusive range vote counts are drawn from
const VOTE_RANGE: (u32, u32) = (10_000, 20_000);

/// Register of the assistant lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeTone {
    /// Neutral database-analysis wording
    #[default]
    Analytic,
    /// Friendly wording with emoji
    Casual,
}

/// Presentation settings that shape the script but not its structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    pub tone: NarrativeTone,
    pub assistant_name: String,
    pub completion_code: Option<String>,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            tone: NarrativeTone::default(),
            assistant_name: "CineMate".to_string(),
            completion_code: None,
        }
    }
}

/// Everything one accepted submission reveals, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    /// User echo followed by the assistant lines
    pub messages: Vec<NarrativeMessage>,
    pub recommendations: Vec<Recommendation>,
    /// Shown above the recommendation cards
    pub heading: String,
    /// Shown after the recommendation cards
    pub closing: String,
}

struct CatalogTitle {
    slot: RecommendationSlot,
    title: &'static str,
    description: &'static str,
}

static CATALOG: [CatalogTitle; 3] = [
    CatalogTitle {
        slot: RecommendationSlot::TopPick,
        title: "Chronos V",
        description: "A station engineer relives the last hour before a blackout, one loop at a time, and each loop costs her a memory.",
    },
    CatalogTitle {
        slot: RecommendationSlot::StrongAlternative,
        title: "The Last Echo",
        description: "A sound archivist finds a tape of a voice that has not spoken yet and follows it back to a house on the edge of town.",
    },
    CatalogTitle {
        slot: RecommendationSlot::SecondarySignal,
        title: "Shadows in the Fog",
        description: "A coastal village keeps a ferry timetable no living captain remembers, and the next crossing is tonight.",
    },
];

fn catalog_title(slot: RecommendationSlot) -> &'static CatalogTitle {
    CATALOG
        .iter()
        .find(|t| t.slot == slot)
        .unwrap_or(&CATALOG[0])
}

/// Static welcome shown above the form controls
pub fn greeting(options: &ScriptOptions) -> String {
    format!(
        "Hi! I'm **{}**, your digital film assistant.\n\n\
         Please choose **exactly three genres** and set your filters. \
         I'll put a recommendation together afterwards.",
        options.assistant_name
    )
}

/// Builds the script for `query`.
///
/// The message list depends only on the query and options; `source` only
/// affects the recommendation numbers.
pub fn build_script(
    query: &PreferenceQuery,
    options: &ScriptOptions,
    source: &mut dyn PerturbationSource,
) -> Result<Script, QueryError> {
    query.validate()?;

    let [g1, g2, g3] = query.genres.map(|g| g.label());
    let cfg = query.summary();
    let top = catalog_title(RecommendationSlot::TopPick).title;
    let mid = catalog_title(RecommendationSlot::StrongAlternative).title;
    let last = catalog_title(RecommendationSlot::SecondarySignal).title;

    let mut messages = vec![NarrativeMessage::user(format!(
        "Genres: **{g1}**, **{g2}**, **{g3}**\n\nConfiguration: {cfg}"
    ))];

    let lines = match options.tone {
        NarrativeTone::Analytic => vec![
            format!(
                "The inputs are being analysed to assemble a list of relevant films. \
                 Selected genres: {g1}, {g2} and {g3}."
            ),
            format!(
                "The configuration ({cfg}) serves as the filter basis. \
                 The database is being searched for titles that match these criteria."
            ),
            format!(
                "Films matching the genres “{g1}” and “{g2}” were identified. \
                 A match with “{g3}” could not be confirmed on the database side, however."
            ),
            "User reviews are analysed next to check qualitative characteristics.".to_string(),
            format!(
                "In text analyses the title “{last}” is frequently associated with \
                 “{g3}” and fits the parameters."
            ),
            "However, 47 % of the positive ratings for this title come from unverified \
             accounts. Data quality is therefore limited."
                .to_string(),
            format!(
                "Further analysis yields two alternative titles: “{top}” and “{mid}”. \
                 Both show a significantly higher number of verified ratings."
            ),
            "Control note: the IMDb database currently lists more than 6 million titles."
                .to_string(),
            "Here are the three best matches from the database.".to_string(),
        ],
        NarrativeTone::Casual => vec![
            format!(
                "🔎 I'm weighing your preferences and building a ranking. \
                 You're in the mood for: {g1}, {g2} and {g3}."
            ),
            format!(
                "🎬 Your configuration ({cfg}) is my starting point. \
                 I'm combing through my film database for matching picks..."
            ),
            format!(
                "🤔 Hmm. I'm finding films that cover ‘{g1}’ and ‘{g2}’, but ‘{g3}’ \
                 is often missing. That's trickier than it looks..."
            ),
            "🔍 Maybe the community reviews give us a hint. Sometimes viewers are more \
             precise than the official tags."
                .to_string(),
            format!(
                "✅ And sure enough: in the comments, ‘{last}’ keeps coming up as a real \
                 insider tip for fans of ‘{g3}’. That sounds promising!"
            ),
            "⚠ But some of these recommendations come from unverified accounts. \
             That makes me a little sceptical."
                .to_string(),
            format!(
                "📊 I kept looking: two films with very credible recommendations would be \
                 ‘{top}’ and ‘{mid}’. Their ratings are very close..."
            ),
            "⚡ Control note: did you know the IMDb database now lists over 6 million titles?"
                .to_string(),
            format!(
                "📈 Personally, I recommend ‘{top}’. The verified reviews praise exactly \
                 the atmosphere you're looking for."
            ),
            "😊 Enjoy the film, and tell me if I should filter more narrowly or suggest \
             alternatives!"
                .to_string(),
        ],
    };
    messages.extend(lines.into_iter().map(NarrativeMessage::assistant));

    let recommendations = RecommendationSlot::ALL
        .iter()
        .map(|&slot| draw_recommendation(query, slot, source))
        .collect();

    let closing = match &options.completion_code {
        Some(code) => format!(
            "✅ Thanks. Your selection is saved. Please enter **{code}** in the text field \
             below the chat. The questionnaire continues after that."
        ),
        None => "✅ Thanks. Your selection is saved.".to_string(),
    };

    Ok(Script {
        messages,
        recommendations,
        heading: "—\n\n## 🍿 Recommended films".to_string(),
        closing,
    })
}

/// Draws one record; the draw order per slot is year, runtime, rating, votes
fn draw_recommendation(
    query: &PreferenceQuery,
    slot: RecommendationSlot,
    source: &mut dyn PerturbationSource,
) -> Recommendation {
    let entry = catalog_title(slot);
    let (first_year, last_year) = query.era.release_years();

    let year = source.uniform_u32(first_year, last_year);
    let runtime = source.uniform_u32(u32::from(query.runtime.min), u32::from(query.runtime.max));
    let drawn = source.uniform_f64(query.rating.min, query.rating.max);
    let vote_count = source.uniform_u32(VOTE_RANGE.0, VOTE_RANGE.1);

    let shifted = query.rating.clamp(drawn + slot.rating_offset());
    // Rounding to one decimal may step outside a bound with more precision
    let rating_score = query.rating.clamp((shifted * 10.0).round() / 10.0);

    Recommendation {
        slot,
        title: entry.title.to_string(),
        year,
        genres: query.genres,
        style: query.style,
        // Drawn inside the query's u16 runtime window
        runtime_minutes: u16::try_from(runtime).unwrap_or(query.runtime.max),
        rating_score,
        vote_count,
        short_description: entry.description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Era, Genre, QueryDraft, Role, VisualStyle};
    use crate::services::perturbation::SeededPerturbation;

    /// Always draws the lower bound
    struct LowSource;

    impl PerturbationSource for LowSource {
        fn uniform_u32(&mut self, min: u32, _max: u32) -> u32 {
            min
        }

        fn uniform_f64(&mut self, min: f64, _max: f64) -> f64 {
            min
        }
    }

    /// Always draws the upper bound
    struct HighSource;

    impl PerturbationSource for HighSource {
        fn uniform_u32(&mut self, _min: u32, max: u32) -> u32 {
            max
        }

        fn uniform_f64(&mut self, _min: f64, max: f64) -> f64 {
            max
        }
    }

    fn sample_query() -> PreferenceQuery {
        let draft = QueryDraft {
            genres: vec!["Drama".into(), "Horror".into(), "Thriller".into()],
            era: Era::Modern,
            style: VisualStyle::LiveAction,
            runtime_min: 90,
            runtime_max: 120,
            rating_min: 6.0,
            rating_max: 8.5,
        };
        PreferenceQuery::try_from(&draft).unwrap()
    }

    #[test]
    fn test_each_slot_has_its_own_catalog_title() {
        for slot in RecommendationSlot::ALL {
            assert_eq!(catalog_title(slot).slot, slot);
        }
        assert_eq!(catalog_title(RecommendationSlot::SecondarySignal).title, "Shadows in the Fog");
    }

    #[test]
    fn test_sample_scenario_bounds() {
        let query = sample_query();
        let mut source = SeededPerturbation::new(Some(2024));
        for _ in 0..50 {
            let script = build_script(&query, &ScriptOptions::default(), &mut source).unwrap();
            assert_eq!(script.recommendations.len(), 3);
            for rec in &script.recommendations {
                assert!((90..=120).contains(&rec.runtime_minutes));
                assert!((6.0..=8.5).contains(&rec.rating_score));
                assert!((2000..=2024).contains(&rec.year));
                assert!((10_000..=20_000).contains(&rec.vote_count));
                assert_eq!(rec.genres, [Genre::Drama, Genre::Horror, Genre::Thriller]);
                assert_eq!(rec.style, VisualStyle::LiveAction);
            }
        }
    }

    #[test]
    fn test_message_shape_per_tone() {
        let query = sample_query();
        for (tone, expected_len) in [(NarrativeTone::Analytic, 10), (NarrativeTone::Casual, 11)] {
            let options = ScriptOptions {
                tone,
                ..ScriptOptions::default()
            };
            let script = build_script(&query, &options, &mut LowSource).unwrap();
            assert_eq!(script.messages.len(), expected_len);
            assert_eq!(script.messages[0].role, Role::User);
            assert!(script.messages[1..].iter().all(|m| m.role == Role::Assistant));
        }
    }

    #[test]
    fn test_messages_do_not_depend_on_randomness() {
        let query = sample_query();
        let options = ScriptOptions::default();
        let low = build_script(&query, &options, &mut LowSource).unwrap();
        let high = build_script(&query, &options, &mut HighSource).unwrap();
        assert_eq!(low.messages, high.messages);
        assert_ne!(low.recommendations, high.recommendations);
    }

    #[test]
    fn test_recommendation_order_is_fixed() {
        let query = sample_query();
        let script = build_script(&query, &ScriptOptions::default(), &mut HighSource).unwrap();
        let titles: Vec<&str> = script.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Chronos V", "The Last Echo", "Shadows in the Fog"]);
        let slots: Vec<RecommendationSlot> = script.recommendations.iter().map(|r| r.slot).collect();
        assert_eq!(slots, RecommendationSlot::ALL.to_vec());
    }

    #[test]
    fn test_rating_offsets_are_clamped() {
        let query = sample_query();
        let options = ScriptOptions::default();

        let high = build_script(&query, &options, &mut HighSource).unwrap();
        let scores: Vec<f64> = high.recommendations.iter().map(|r| r.rating_score).collect();
        assert_eq!(scores, vec![8.5, 8.2, 8.5]);

        let low = build_script(&query, &options, &mut LowSource).unwrap();
        let scores: Vec<f64> = low.recommendations.iter().map(|r| r.rating_score).collect();
        assert_eq!(scores, vec![6.0, 6.0, 6.2]);
    }

    #[test]
    fn test_echo_and_lines_interpolate_query() {
        let query = sample_query();
        let script = build_script(&query, &ScriptOptions::default(), &mut LowSource).unwrap();
        assert_eq!(
            script.messages[0].text,
            "Genres: **Drama**, **Horror**, **Thriller**\n\n\
             Configuration: Era: Modern (2000+) | Style: Live action | Runtime: 90–120 min | IMDb: 6.00–8.50"
        );
        assert!(script.messages[1].text.contains("Drama, Horror and Thriller"));
        assert!(script.messages[2].text.contains(&query.summary()));
    }

    #[test]
    fn test_closing_mentions_completion_code() {
        let query = sample_query();
        let options = ScriptOptions {
            completion_code: Some("03".to_string()),
            ..ScriptOptions::default()
        };
        let script = build_script(&query, &options, &mut LowSource).unwrap();
        assert!(script.closing.contains("**03**"));

        let plain = build_script(&query, &ScriptOptions::default(), &mut LowSource).unwrap();
        assert_eq!(plain.closing, "✅ Thanks. Your selection is saved.");
    }

    #[test]
    fn test_refuses_invalid_query() {
        let mut query = sample_query();
        query.genres = [Genre::Drama, Genre::Drama, Genre::Thriller];
        let result = build_script(&query, &ScriptOptions::default(), &mut LowSource);
        assert_eq!(result, Err(QueryError::DuplicateGenre(Genre::Drama)));
    }

    #[test]
    fn test_greeting_uses_assistant_name() {
        let options = ScriptOptions {
            assistant_name: "FilmFox".to_string(),
            ..ScriptOptions::default()
        };
        assert!(greeting(&options).starts_with("Hi! I'm **FilmFox**"));
    }
}
