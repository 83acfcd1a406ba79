//! Compiled annotator.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rules::{Label, Rule, RuleKind, DEFAULT_RULES};

/// Annotation errors. Only raised while compiling a rule table.
#[derive(Error, Debug)]
pub enum AnnotateError {
    #[error("Invalid pattern for {label:?}: {source}")]
    InvalidPattern {
        label: Label,
        #[source]
        source: regex::Error,
    },

    #[error("Empty vocabulary for {0:?}")]
    EmptyVocabulary(Label),
}

pub type AnnotateResult<T> = Result<T, AnnotateError>;

/// A tagged span of the input text. Offsets are byte offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub label: Label,
    pub start: usize,
    pub end: usize,
    /// Matched text
    pub text: String,
    /// Captured `value` group, when the rule defines one
    pub value: Option<String>,
}

impl Span {
    /// The captured value if present, otherwise the matched text.
    pub fn value_or_text(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.text)
    }
}

struct CompiledRule {
    label: Label,
    regex: Regex,
}

/// Immutable annotator built from a rule table.
pub struct Annotator {
    rules: Vec<CompiledRule>,
}

impl Annotator {
    /// Compile a rule table.
    pub fn new(rules: &[Rule]) -> AnnotateResult<Self> {
        let compiled = rules
            .iter()
            .map(compile_rule)
            .collect::<AnnotateResult<Vec<_>>>()?;
        Ok(Self { rules: compiled })
    }

    /// Compile [`DEFAULT_RULES`].
    pub fn with_default_rules() -> AnnotateResult<Self> {
        Self::new(DEFAULT_RULES)
    }

    /// Tag every rule match in `text`, ordered by start offset (longest first on ties).
    pub fn annotate(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();

        for rule in &self.rules {
            for caps in rule.regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                if whole.as_str().is_empty() {
                    continue;
                }
                spans.push(Span {
                    label: rule.label,
                    start: whole.start(),
                    end: whole.end(),
                    text: whole.as_str().to_string(),
                    value: caps.name("value").map(|m| m.as_str().trim().to_string()),
                });
            }
        }

        spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
        spans
    }

    /// Number of compiled rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

/// First span carrying `label`, in document order.
pub fn first_with_label(spans: &[Span], label: Label) -> Option<&Span> {
    spans.iter().find(|s| s.label == label)
}

fn compile_rule(rule: &Rule) -> AnnotateResult<CompiledRule> {
    let pattern = match &rule.kind {
        RuleKind::Keywords(terms) => {
            if terms.is_empty() {
                return Err(AnnotateError::EmptyVocabulary(rule.label));
            }
            let alternatives: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
            format!(r"(?i)\b(?:{})\b", alternatives.join("|"))
        }
        RuleKind::Pattern(p) => (*p).to_string(),
    };

    let regex = Regex::new(&pattern).map_err(|source| AnnotateError::InvalidPattern {
        label: rule.label,
        source,
    })?;

    Ok(CompiledRule {
        label: rule.label,
        regex,
    })
}
