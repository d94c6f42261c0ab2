use super::{ModelError, SummarizationModel, SummaryRequest};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

const STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be", "been",
    "but", "by", "can", "could", "did", "do", "does", "for", "from", "had", "has", "have", "he",
    "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "just", "more", "most", "my",
    "no", "not", "of", "on", "one", "or", "our", "out", "over", "she", "so", "some", "such",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "to", "up", "us", "was", "we", "were", "what", "when", "which", "who", "will", "with",
    "would", "you", "your",
];

/// Deterministic in-process model that extracts the most representative sentences.
///
/// Sentences are scored by the mean document frequency of their content words. The best
/// sentences are kept in document order within `max_length` words; lower-ranked sentences are
/// added while the summary is still shorter than `min_length`.
pub struct ExtractiveModel {
    stopwords: HashSet<&'static str>,
}

#[derive(Debug)]
struct Sentence<'a> {
    position: usize,
    text: &'a str,
    words: usize,
    score: f64,
}

impl ExtractiveModel {
    /// Create the model with the built-in English stopword list.
    pub fn new() -> Self {
        Self {
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    fn summarize(&self, text: &str, max_words: usize, min_words: usize) -> String {
        let mut sentences = self.score_sentences(text);
        if sentences.is_empty() {
            return String::new();
        }

        let mut ranked: Vec<usize> = (0..sentences.len()).collect();
        ranked.sort_by(|&left, &right| {
            sentences[right]
                .score
                .total_cmp(&sentences[left].score)
                .then(sentences[left].position.cmp(&sentences[right].position))
        });

        let mut chosen = Vec::new();
        let mut used_words = 0usize;
        for index in ranked {
            let sentence = &sentences[index];
            if used_words + sentence.words > max_words {
                if used_words >= min_words {
                    break;
                }
                continue;
            }
            used_words += sentence.words;
            chosen.push(index);
            if used_words >= max_words {
                break;
            }
        }

        if chosen.is_empty() {
            // Every sentence is over budget: keep the leading words of the best one.
            let best = sentences
                .iter()
                .max_by(|left, right| left.score.total_cmp(&right.score))
                .map(|sentence| sentence.text)
                .unwrap_or(text);
            return best
                .split_whitespace()
                .take(max_words.max(1))
                .collect::<Vec<_>>()
                .join(" ");
        }

        chosen.sort_unstable();
        sentences.retain(|sentence| chosen.contains(&sentence.position));
        sentences
            .iter()
            .map(|sentence| sentence.text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn score_sentences<'a>(&self, text: &'a str) -> Vec<Sentence<'a>> {
        let segments = split_sentences(text);

        let mut frequency: HashMap<String, usize> = HashMap::new();
        for segment in &segments {
            for term in self.content_terms(segment) {
                *frequency.entry(term).or_insert(0) += 1;
            }
        }
        let peak = frequency.values().copied().max().unwrap_or(1) as f64;

        segments
            .into_iter()
            .enumerate()
            .map(|(position, segment)| {
                let terms = self.content_terms(segment);
                let score = if terms.is_empty() {
                    0.0
                } else {
                    terms
                        .iter()
                        .map(|term| frequency.get(term).copied().unwrap_or(0) as f64 / peak)
                        .sum::<f64>()
                        / terms.len() as f64
                };
                Sentence {
                    position,
                    text: segment,
                    words: segment.split_whitespace().count(),
                    score,
                }
            })
            .collect()
    }

    fn content_terms(&self, sentence: &str) -> Vec<String> {
        sentence
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .map(|word| word.trim_matches('\'').to_lowercase())
            .filter(|word| word.len() > 1 && !self.stopwords.contains(word.as_str()))
            .collect()
    }
}

impl Default for ExtractiveModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text into trimmed sentences, keeping terminal punctuation attached.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((index, c)) = chars.next() {
        let boundary = matches!(c, '.' | '!' | '?')
            && chars
                .peek()
                .is_none_or(|(_, next)| next.is_whitespace());
        if boundary || c == '\n' {
            let end = index + c.len_utf8();
            let segment = text[start..end].trim();
            if !segment.is_empty() {
                sentences.push(segment);
            }
            start = end;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

#[async_trait]
impl SummarizationModel for ExtractiveModel {
    async fn generate(&self, request: &SummaryRequest) -> Result<String, ModelError> {
        let summary = self.summarize(
            &request.text,
            request.max_length as usize,
            request.min_length as usize,
        );
        if summary.is_empty() {
            return Err(ModelError::InvalidResponse(
                "no sentences could be extracted".into(),
            ));
        }
        Ok(summary)
    }

    fn name(&self) -> &str {
        "extractive"
    }
}
