//! Lexicon-based polarity and subjectivity scoring.
//!
//! Each lexicon word carries a polarity in `[-1, 1]` and a subjectivity in `[0, 1]`. An
//! intensifier scales the next scored word, a negation flips and halves its polarity. The text
//! score is the mean over every scored word.

use serde::Serialize;
use std::collections::HashMap;

/// (word, polarity, subjectivity)
const LEXICON: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("awesome", 1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("boring", -1.0, 1.0),
    ("brilliant", 0.9, 1.0),
    ("broken", -0.4, 0.4),
    ("clear", 0.1, 0.38),
    ("clever", 0.5, 0.5),
    ("comfortable", 0.4, 0.7),
    ("confusing", -0.3, 0.7),
    ("cruel", -1.0, 1.0),
    ("delightful", 1.0, 1.0),
    ("difficult", -0.5, 1.0),
    ("dirty", -0.6, 0.8),
    ("disappointing", -0.6, 0.7),
    ("easy", 0.43, 0.83),
    ("effective", 0.6, 0.8),
    ("efficient", 0.5, 0.6),
    ("excellent", 1.0, 1.0),
    ("excited", 0.38, 0.75),
    ("fantastic", 0.4, 0.9),
    ("fast", 0.2, 0.6),
    ("fine", 0.42, 0.5),
    ("fun", 0.3, 0.2),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("hard", -0.29, 0.54),
    ("harmful", -0.6, 0.8),
    ("helpful", 0.6, 0.7),
    ("honest", 0.6, 0.9),
    ("horrible", -1.0, 1.0),
    ("important", 0.4, 1.0),
    ("impressive", 1.0, 1.0),
    ("interesting", 0.5, 0.5),
    ("lazy", -0.25, 1.0),
    ("love", 0.5, 0.6),
    ("lovely", 0.5, 0.75),
    ("nice", 0.6, 1.0),
    ("painful", -0.7, 0.9),
    ("pleasant", 0.73, 0.97),
    ("poor", -0.4, 0.6),
    ("positive", 0.23, 0.55),
    ("negative", -0.3, 0.4),
    ("quick", 0.33, 0.5),
    ("reliable", 0.5, 0.5),
    ("sad", -0.5, 1.0),
    ("safe", 0.5, 0.5),
    ("slow", -0.3, 0.39),
    ("strong", 0.43, 0.73),
    ("stupid", -0.8, 1.0),
    ("successful", 0.75, 0.95),
    ("terrible", -1.0, 1.0),
    ("ugly", -0.7, 1.0),
    ("unfortunate", -0.5, 1.0),
    ("unhappy", -0.6, 0.9),
    ("useful", 0.3, 0.0),
    ("useless", -0.5, 0.2),
    ("weak", -0.38, 0.63),
    ("wonderful", 1.0, 1.0),
    ("worse", -0.4, 0.6),
    ("worst", -1.0, 1.0),
    ("wrong", -0.5, 0.9),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.5),
    ("extremely", 1.5),
    ("highly", 1.4),
    ("incredibly", 1.5),
    ("quite", 1.1),
    ("really", 1.3),
    ("so", 1.3),
    ("too", 1.2),
    ("totally", 1.4),
    ("very", 1.3),
    ("slightly", 0.6),
    ("somewhat", 0.7),
];

const NEGATIONS: &[&str] = &["not", "never", "no", "nothing", "hardly", "neither", "nor"];

/// Polarity multiplier applied to a negated word.
const NEGATION_FACTOR: f64 = -0.5;

/// Three-way sentiment label derived from the sign of the polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    /// Polarity above zero.
    Positive,
    /// Polarity exactly zero.
    Neutral,
    /// Polarity below zero.
    Negative,
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Positive => "Positive 😊",
            Self::Neutral => "Neutral 😐",
            Self::Negative => "Negative 😟",
        })
    }
}

/// Classify a polarity: positive above zero, negative below, neutral otherwise.
pub fn classify(polarity: f64) -> SentimentLabel {
    if polarity > 0.0 {
        SentimentLabel::Positive
    } else if polarity < 0.0 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Raw scores for a text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScores {
    /// Mean polarity in `[-1, 1]`.
    pub polarity: f64,
    /// Mean subjectivity in `[0, 1]`.
    pub subjectivity: f64,
}

/// Scores plus the derived label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentResult {
    /// Mean polarity in `[-1, 1]`.
    pub polarity: f64,
    /// Mean subjectivity in `[0, 1]`.
    pub subjectivity: f64,
    /// Label derived from `polarity`.
    pub label: SentimentLabel,
}

/// Lexicon scorer for English text.
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: HashMap<&'static str, (f64, f64)>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer {
    /// Build a scorer with the built-in lexicon.
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON
                .iter()
                .map(|&(word, polarity, subjectivity)| (word, (polarity, subjectivity)))
                .collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Score `text`. Text without any lexicon word scores `(0, 0)`.
    pub fn score(&self, text: &str) -> SentimentScores {
        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut scored = 0usize;
        let mut modifier: Option<f64> = None;
        let mut negated = false;

        for token in tokenize(text) {
            if is_negation(&token) {
                negated = true;
                continue;
            }
            if let Some(&factor) = self.intensifiers.get(token.as_str()) {
                modifier = Some(modifier.unwrap_or(1.0) * factor);
                continue;
            }
            let Some(&(polarity, subjectivity)) = self.lexicon.get(token.as_str()) else {
                // Sentence punctuation ends any pending negation or intensifier.
                if token.chars().all(|c| matches!(c, '.' | '!' | '?' | ';')) {
                    modifier = None;
                    negated = false;
                }
                continue;
            };

            let factor = modifier.take().unwrap_or(1.0);
            let mut polarity = (polarity * factor).clamp(-1.0, 1.0);
            let subjectivity = (subjectivity * factor).clamp(0.0, 1.0);
            if negated {
                polarity *= NEGATION_FACTOR;
                negated = false;
            }
            polarity_sum += polarity;
            subjectivity_sum += subjectivity;
            scored += 1;
        }

        if scored == 0 {
            return SentimentScores {
                polarity: 0.0,
                subjectivity: 0.0,
            };
        }
        SentimentScores {
            polarity: (polarity_sum / scored as f64).clamp(-1.0, 1.0),
            subjectivity: (subjectivity_sum / scored as f64).clamp(0.0, 1.0),
        }
    }

    /// Score and label `text`; `None` when the text is blank.
    pub fn analyze(&self, text: &str) -> Option<SentimentResult> {
        if text.trim().is_empty() {
            return None;
        }
        let SentimentScores {
            polarity,
            subjectivity,
        } = self.score(text);
        Some(SentimentResult {
            polarity,
            subjectivity,
            label: classify(polarity),
        })
    }
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

/// Lowercased words plus standalone sentence punctuation tokens.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() || c == '\'' || c == '’' {
            current.extend(c.to_lowercase().map(|c| if c == '’' { '\'' } else { c }));
            continue;
        }
        if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        if matches!(c, '.' | '!' | '?' | ';') {
            tokens.push(c.to_string());
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
