//! Heuristic prompt complexity estimation.
//!
//! Four independent signals, each normalized to `[0.0, 1.0]`, are combined with
//! fixed weights:
//!
//! | Signal                 | Weight | Saturates at                          |
//! |------------------------|--------|---------------------------------------|
//! | Length                 | 0.3    | 3000 letters/digits (square-root curve)|
//! | Technical terminology  | 0.3    | 25% of words matching the vocabulary  |
//! | Sentence structure     | 0.3    | 25 words/sentence, 2 clause markers   |
//! | Mathematical notation  | 0.1    | 2 distinct kinds of notation          |
//!
//! Text with fewer than two words scores on notation alone.
//! The weighted sum is clamped to `[0.0, 1.0]` and rounded to two decimals.
//! Levels: `< 0.3` simple, `< 0.5` moderate, otherwise complex.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const LENGTH_WEIGHT: f64 = 0.3;
const TERMINOLOGY_WEIGHT: f64 = 0.3;
const SENTENCE_WEIGHT: f64 = 0.3;
const MATH_WEIGHT: f64 = 0.1;

const SIMPLE_BELOW: f64 = 0.3;
const MODERATE_BELOW: f64 = 0.5;

/// Weighted contribution a signal needs before it is mentioned in the reasoning
const REASONING_MIN_CONTRIBUTION: f64 = 0.05;

const DEFAULT_LENGTH_SATURATION: usize = 3000;

/// Below this many words, length and terminology do not contribute
const MIN_SCORED_WORDS: usize = 2;

const PLAIN_TEXT_REASON: &str = "Short, plain text with no complexity indicators";

/// Lowercase stems; a word matches when it starts with one of them.
const TECHNICAL_STEMS: &[&str] = &[
    // mathematics
    "algebra", "calcul", "derivativ", "integral", "equation", "theorem", "polynom", "matri",
    "vector", "coefficient", "logarithm", "exponent", "differential", "trigonometr",
    "probabilit", "statistic", "variance", "eigen", "topolog", "geometr", "asymptot",
    "hypothes",
    // natural sciences
    "quantum", "molecul", "electron", "photosynth", "mitochond", "chloroplast", "enzyme",
    "protein", "genom", "chromosom", "thermodynam", "entropy", "kinetic", "catalys", "isotope",
    "neuron", "organelle", "hydrocarbon", "oxidat", "wavelength", "momentum", "velocity",
    // computing
    "algorithm", "neural", "network", "cryptograph", "protocol", "compiler", "recursi",
    "databas", "architectur", "framework", "implement", "concurren", "asynchron", "kernel",
    "latency", "bandwidth", "encrypt", "heuristic", "optimiz", "paradigm",
    // engineering
    "semiconductor", "transistor", "voltage", "impedance", "torque", "tensile",
];

const CLAUSE_MARKERS: &[&str] = &[
    "which", "that", "because", "although", "though", "while", "whereas", "since", "unless",
    "whether", "whereby", "wherein", "how", "if", "when", "where", "who", "whom", "whose",
    "until",
];

const MATH_SYMBOLS: &[char] = &[
    '∫', '∑', '∏', '√', '∞', '≈', '≠', '≤', '≥', '±', '∂', '∆', '∇', 'π', 'θ', 'λ', 'μ', 'σ',
    '²', '³', '×', '÷',
];

static FUNCTION_NOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[a-zA-Z]\([a-zA-Z0-9,\s]+\)").expect("function notation pattern is valid")
});

static EXPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9)]\^[a-zA-Z0-9({]").expect("exponent pattern is valid")
});

static EQUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9)]\s*=\s*[-a-zA-Z0-9(]|\d\s*[+*/]\s*\d")
        .expect("equation pattern is valid")
});

static LATEX_COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(frac|int|sum|sqrt|lim|partial|alpha|beta|theta|pi)\b")
        .expect("latex pattern is valid")
});

/// Coarse complexity bucket derived from the score
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Simple,
    Moderate,
    Complex,
}

impl ComplexityLevel {
    pub fn from_score(score: f64) -> Self {
        if score < SIMPLE_BELOW {
            ComplexityLevel::Simple
        } else if score < MODERATE_BELOW {
            ComplexityLevel::Moderate
        } else {
            ComplexityLevel::Complex
        }
    }
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexityLevel::Simple => write!(f, "simple"),
            ComplexityLevel::Moderate => write!(f, "moderate"),
            ComplexityLevel::Complex => write!(f, "complex"),
        }
    }
}

/// Outcome of a complexity estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityResult {
    /// Score in `[0.0, 1.0]`, rounded to two decimals
    pub score: f64,
    pub level: ComplexityLevel,
    /// One entry per signal that materially affected the score; never empty
    pub reasoning: Vec<String>,
}

impl ComplexityResult {
    /// Build a result from an externally obtained score (e.g. an LLM classifier)
    ///
    /// An empty `reasoning` is replaced by a generic reason.
    pub fn from_score(score: f64, mut reasoning: Vec<String>) -> Self {
        let score = round_score(score);
        if reasoning.is_empty() {
            reasoning.push(format!("Externally assigned score {score:.2}"));
        }
        Self {
            score,
            level: ComplexityLevel::from_score(score),
            reasoning,
        }
    }
}

/// Per-signal values before weighting, for logging and debugging
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexityBreakdown {
    pub length: f64,
    pub terminology: f64,
    pub sentence: f64,
    pub math: f64,
    /// Letters and digits only; punctuation and whitespace are not counted
    pub alphanumeric_chars: usize,
    pub word_count: usize,
    pub technical_terms: usize,
    pub avg_sentence_words: f64,
}

impl ComplexityBreakdown {
    /// Weighted, clamped, unrounded total
    pub fn weighted_total(&self) -> f64 {
        (self.length * LENGTH_WEIGHT
            + self.terminology * TERMINOLOGY_WEIGHT
            + self.sentence * SENTENCE_WEIGHT
            + self.math * MATH_WEIGHT)
            .clamp(0.0, 1.0)
    }

    fn reasoning(&self) -> Vec<String> {
        let mut reasons = Vec::new();

        if self.length * LENGTH_WEIGHT >= REASONING_MIN_CONTRIBUTION {
            reasons.push(format!(
                "Content length adds complexity ({} characters)",
                self.alphanumeric_chars
            ));
        }
        if self.terminology * TERMINOLOGY_WEIGHT >= REASONING_MIN_CONTRIBUTION {
            reasons.push(format!(
                "Technical terminology ({} of {} words)",
                self.technical_terms, self.word_count
            ));
        }
        if self.sentence * SENTENCE_WEIGHT >= REASONING_MIN_CONTRIBUTION {
            reasons.push(format!(
                "Complex sentence structure (avg {:.1} words per sentence)",
                self.avg_sentence_words
            ));
        }
        if self.math * MATH_WEIGHT >= REASONING_MIN_CONTRIBUTION {
            reasons.push("Contains mathematical notation".to_string());
        }

        if reasons.is_empty() {
            reasons.push(PLAIN_TEXT_REASON.to_string());
        }
        reasons
    }
}

/// Stateless heuristic estimator. Never panics, never fails.
#[derive(Debug, Clone)]
pub struct ComplexityEstimator {
    /// Character count at which the length signal reaches 1.0
    length_saturation_chars: usize,
}

impl Default for ComplexityEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ComplexityEstimator {
    pub fn new() -> Self {
        Self {
            length_saturation_chars: DEFAULT_LENGTH_SATURATION,
        }
    }

    /// Score `text` and map it to a level with reasoning
    pub fn estimate(&self, text: &str) -> ComplexityResult {
        let breakdown = self.breakdown(text);
        ComplexityResult::from_score(breakdown.weighted_total(), breakdown.reasoning())
    }

    /// Individual signal values for `text`
    ///
    /// Text with fewer than two words only gets the math signal, so a lone
    /// word or a run of punctuation always stays simple.
    pub fn breakdown(&self, text: &str) -> ComplexityBreakdown {
        let alphanumeric_chars = text.chars().filter(|c| c.is_alphanumeric()).count();
        let words = tokenize(text);
        let sentence_count = count_sentences(text);
        let scored = words.len() >= MIN_SCORED_WORDS;

        let technical_terms = words.iter().filter(|w| is_technical(w)).count();
        let terminology = if scored {
            (technical_terms as f64 / words.len() as f64 * 4.0).min(1.0)
        } else {
            0.0
        };
        let length = if scored {
            (alphanumeric_chars as f64 / self.length_saturation_chars as f64)
                .sqrt()
                .min(1.0)
        } else {
            0.0
        };

        let (sentence, avg_sentence_words) = if sentence_count == 0 {
            (0.0, 0.0)
        } else {
            let avg = words.len() as f64 / sentence_count as f64;
            let markers = words
                .iter()
                .filter(|w| CLAUSE_MARKERS.contains(&w.as_str()))
                .count();
            let length_part = ((avg - 8.0) / 17.0).clamp(0.0, 1.0);
            let clause_part = (markers as f64 / sentence_count as f64 / 2.0).min(1.0);
            (0.7 * length_part + 0.3 * clause_part, avg)
        };

        ComplexityBreakdown {
            length,
            terminology,
            sentence,
            math: (math_notation_kinds(text) as f64 / 2.0).min(1.0),
            alphanumeric_chars,
            word_count: words.len(),
            technical_terms,
            avg_sentence_words,
        }
    }
}

/// Estimate with the default estimator
pub fn estimate_complexity(text: &str) -> ComplexityResult {
    ComplexityEstimator::new().estimate(text)
}

fn round_score(raw: f64) -> f64 {
    let clamped = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 };
    (clamped * 100.0).round() / 100.0
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn count_sentences(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|segment| segment.chars().any(char::is_alphanumeric))
        .count()
}

fn is_technical(word: &str) -> bool {
    TECHNICAL_STEMS.iter().any(|stem| word.starts_with(stem))
}

fn math_notation_kinds(text: &str) -> usize {
    [
        text.contains(MATH_SYMBOLS),
        FUNCTION_NOTATION.is_match(text),
        EXPONENT.is_match(text),
        EQUATION.is_match(text),
        LATEX_COMMAND.is_match(text),
    ]
    .into_iter()
    .filter(|found| *found)
    .count()
}
