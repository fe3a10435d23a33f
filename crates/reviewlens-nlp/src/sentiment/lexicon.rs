//! Valence-lexicon compound scorer.
//!
//! Reads a tab-separated lexicon (`token<TAB>mean[<TAB>...]`) and scores text
//! with the usual valence-aware rules: capitalization emphasis, intensifiers,
//! negation, contrastive "but" and trailing punctuation. The result is
//! normalized into `[-1, 1]`.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use reviewlens_core::{Error, Result};

use super::scorer::SentimentScorer;

const BOOST_INCREMENT: f64 = 0.293;
const BOOST_DECREMENT: f64 = -0.293;
const CAPS_INCREMENT: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_STEP: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_STEP: f64 = 0.18;
const QUESTION_CAP: f64 = 0.96;
const NORMALIZE_ALPHA: f64 = 15.0;
/// Booster/negation influence by distance (1, 2, 3 tokens back).
const DISTANCE_DECAY: [f64; 3] = [1.0, 0.95, 0.9];

const INCREMENT_BOOSTERS: &[&str] = &[
    "absolutely", "amazingly", "completely", "deeply", "especially", "extremely", "fully",
    "highly", "hugely", "incredibly", "more", "most", "particularly", "quite", "really",
    "remarkably", "so", "super", "thoroughly", "totally", "truly", "utterly", "very",
];

const DECREMENT_BOOSTERS: &[&str] = &[
    "barely", "hardly", "kinda", "less", "little", "marginally", "partly", "scarcely",
    "slightly", "somewhat",
];

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "didnt", "doesnt", "dont", "hadnt", "hasnt",
    "havent", "isnt", "neither", "never", "no", "nobody", "none", "nor", "not", "nothing",
    "nowhere", "shouldnt", "wasnt", "werent", "without", "wont", "wouldnt",
];

/// Compound scorer backed by an in-memory valence table.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    valences: HashMap<String, f64>,
}

impl LexiconScorer {
    /// Load a lexicon file. Missing, unreadable or empty files are errors.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Resource(format!(
                "Sentiment lexicon not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Resource(format!("Failed to read lexicon {}: {}", path.display(), e))
        })?;
        let scorer = Self::parse(&content)?;
        info!(
            "Loaded sentiment lexicon from {} ({} entries)",
            path.display(),
            scorer.len()
        );
        Ok(scorer)
    }

    /// Parse lexicon text. Blank lines, `#` comments and malformed lines are
    /// skipped.
    pub fn parse(content: &str) -> Result<Self> {
        let entries = content.lines().filter_map(|line| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            let mut fields = line.split('\t');
            let token = fields.next()?.trim();
            let mean = fields.next()?.trim().parse::<f64>().ok()?;
            if token.is_empty() || !mean.is_finite() {
                return None;
            }
            Some((token.to_lowercase(), mean))
        });
        Self::from_entries(entries)
    }

    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, f64)>,
    {
        let valences: HashMap<String, f64> = entries.into_iter().collect();
        if valences.is_empty() {
            return Err(Error::Resource("Sentiment lexicon has no entries".into()));
        }
        Ok(Self { valences })
    }

    pub fn len(&self) -> usize {
        self.valences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valences.is_empty()
    }

    pub fn valence(&self, token: &str) -> Option<f64> {
        self.valences.get(token).copied()
    }

    fn score_tokens(&self, tokens: &[&str]) -> Vec<f64> {
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let cap_differential = has_cap_differential(tokens);

        let mut scores = Vec::with_capacity(tokens.len());
        for (i, word) in lowered.iter().enumerate() {
            if booster_scalar(word).is_some() {
                scores.push(0.0);
                continue;
            }
            let Some(mut valence) = self.valence(word) else {
                scores.push(0.0);
                continue;
            };

            if cap_differential && is_all_caps(tokens[i]) {
                valence += CAPS_INCREMENT.copysign(valence);
            }

            for (distance, decay) in DISTANCE_DECAY.iter().enumerate() {
                let Some(j) = i.checked_sub(distance + 1) else {
                    break;
                };
                let prev = lowered[j].as_str();
                if let Some(mut scalar) = booster_scalar(prev) {
                    if valence < 0.0 {
                        scalar = -scalar;
                    }
                    if cap_differential && is_all_caps(tokens[j]) {
                        scalar += CAPS_INCREMENT.copysign(valence);
                    }
                    valence += scalar * decay;
                }
                if is_negation(prev) {
                    valence *= NEGATION_SCALAR;
                }
            }

            scores.push(valence);
        }

        if let Some(pivot) = lowered.iter().position(|w| w == "but") {
            for (i, score) in scores.iter_mut().enumerate() {
                if i < pivot {
                    *score *= 0.5;
                } else if i > pivot {
                    *score *= 1.5;
                }
            }
        }

        scores
    }
}

impl SentimentScorer for LexiconScorer {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn compound(&self, text: &str) -> Result<f64> {
        let tokens: Vec<&str> = text
            .split_whitespace()
            .map(strip_punctuation)
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.is_empty() {
            return Ok(0.0);
        }

        let mut sum: f64 = self.score_tokens(&tokens).iter().sum();
        if sum != 0.0 {
            sum += punctuation_emphasis(text).copysign(sum);
        }
        Ok(normalize(sum))
    }
}

fn strip_punctuation(token: &str) -> &str {
    token
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .trim_matches('\'')
}

fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && !token.chars().any(char::is_lowercase)
}

/// Some but not all tokens are upper case.
fn has_cap_differential(tokens: &[&str]) -> bool {
    let caps = tokens.iter().filter(|t| is_all_caps(t)).count();
    caps > 0 && caps < tokens.len()
}

fn booster_scalar(word: &str) -> Option<f64> {
    if INCREMENT_BOOSTERS.contains(&word) {
        Some(BOOST_INCREMENT)
    } else if DECREMENT_BOOSTERS.contains(&word) {
        Some(BOOST_DECREMENT)
    } else {
        None
    }
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2 | 3 => questions as f64 * QUESTION_STEP,
        _ => QUESTION_CAP,
    };
    exclamations as f64 * EXCLAMATION_STEP + question_amp
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}
