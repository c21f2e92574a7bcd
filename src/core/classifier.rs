//! Keyword heuristics that decide which task category a message belongs to.
//!
//! Classification is a couple of substring overrides
//! followed by a whitespace-token vote between two disjoint vocabularies.
//! Misclassification is expected and never treated as an error.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Phrases that force the coding category regardless of keyword scores.
const CODING_OVERRIDE_PHRASES: &[&str] =
    &["write code", "create code", "implement", "program", "debug"];

/// Phrases that force the research category when no coding phrase matched.
const RESEARCH_OVERRIDE_PHRASES: &[&str] = &["research", "analyze", "investigate"];

const CODING_KEYWORDS: &[&str] = &[
    "code",
    "function",
    "class",
    "variable",
    "loop",
    "array",
    "object",
    "method",
    "api",
    "database",
    "server",
    "client",
    "frontend",
    "backend",
    "algorithm",
    "debug",
    "error",
    "exception",
    "compile",
    "runtime",
    "javascript",
    "python",
    "java",
    "typescript",
    "react",
    "node",
    "write",
    "create",
    "implement",
    "develop",
    "program",
    "script",
    "def",
    "import",
    "print",
    "return",
    "if",
    "else",
    "for",
    "while",
];

const RESEARCH_KEYWORDS: &[&str] = &[
    "research",
    "study",
    "analysis",
    "investigate",
    "explore",
    "examine",
    "compare",
    "contrast",
    "evaluate",
    "assess",
    "review",
    "literature",
    "methodology",
    "findings",
    "conclusion",
    "hypothesis",
    "theory",
    "data",
    "statistics",
    "survey",
    "experiment",
    "observation",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Coding,
    Research,
    General,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 3] = [
        TaskCategory::Coding,
        TaskCategory::Research,
        TaskCategory::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Coding => "coding",
            TaskCategory::Research => "research",
            TaskCategory::General => "general",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rule produced a classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationReason {
    CodingOverride,
    ResearchOverride,
    Scored { coding: usize, research: usize },
}

/// Full result of classifying a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: TaskCategory,
    pub reason: ClassificationReason,
    /// Both override families matched; the coding override won by check order.
    pub overlapping_overrides: bool,
}

/// Map raw message text to a task category. Total; never fails.
pub fn classify(text: &str) -> TaskCategory {
    classify_detailed(text).category
}

pub fn classify_detailed(text: &str) -> Classification {
    let normalized = text.to_lowercase();

    let coding_override = contains_any(&normalized, CODING_OVERRIDE_PHRASES);
    let research_override = contains_any(&normalized, RESEARCH_OVERRIDE_PHRASES);
    let overlapping_overrides = coding_override && research_override;

    if overlapping_overrides {
        debug!(
            "message matches both coding and research override phrases; routing to coding"
        );
    }

    let classification = if coding_override {
        Classification {
            category: TaskCategory::Coding,
            reason: ClassificationReason::CodingOverride,
            overlapping_overrides,
        }
    } else if research_override {
        Classification {
            category: TaskCategory::Research,
            reason: ClassificationReason::ResearchOverride,
            overlapping_overrides,
        }
    } else {
        let (coding, research) = score_tokens(&normalized);
        let category = match coding.cmp(&research) {
            std::cmp::Ordering::Greater => TaskCategory::Coding,
            std::cmp::Ordering::Less => TaskCategory::Research,
            std::cmp::Ordering::Equal => TaskCategory::General,
        };
        Classification {
            category,
            reason: ClassificationReason::Scored { coding, research },
            overlapping_overrides,
        }
    };

    debug!(
        category = %classification.category,
        reason = ?classification.reason,
        "classified message"
    );
    classification
}

fn contains_any(haystack: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|phrase| haystack.contains(phrase))
}

fn score_tokens(normalized: &str) -> (usize, usize) {
    normalized
        .split_whitespace()
        .fold((0, 0), |(coding, research), token| {
            if CODING_KEYWORDS.contains(&token) {
                (coding + 1, research)
            } else if RESEARCH_KEYWORDS.contains(&token) {
                (coding, research + 1)
            } else {
                (coding, research)
            }
        })
}
