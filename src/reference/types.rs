use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the four reward-orientation dimensions.
///
/// The declaration order is the canonical order used everywhere results are
/// listed, and it is also the tie-break order for the dominant dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Outcome,
    Relation,
    Process,
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown dimension '{0}' (expected one of: outcome, relation, process, value)")]
pub struct ParseDimensionError(pub String);

impl Dimension {
    /// All dimensions in canonical order.
    pub const ALL: [Dimension; 4] = [
        Dimension::Outcome,
        Dimension::Relation,
        Dimension::Process,
        Dimension::Value,
    ];

    /// Lowercase key as it appears in the reference tables
    pub fn key(self) -> &'static str {
        match self {
            Dimension::Outcome => "outcome",
            Dimension::Relation => "relation",
            Dimension::Process => "process",
            Dimension::Value => "value",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Dimension::Outcome => "Outcome",
            Dimension::Relation => "Relation",
            Dimension::Process => "Process",
            Dimension::Value => "Value",
        }
    }

    /// Position in canonical order (0..4)
    pub fn index(self) -> usize {
        match self {
            Dimension::Outcome => 0,
            Dimension::Relation => 1,
            Dimension::Process => 2,
            Dimension::Value => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Dimension {
    type Err = ParseDimensionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Dimension::ALL
            .into_iter()
            .find(|d| d.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseDimensionError(trimmed.to_string()))
    }
}

/// A single Likert question from the question bank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub dimension: Dimension,
    pub text: String,
}

/// Descriptive metadata for one dimension, shown on the result card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionProfile {
    pub dimension: Dimension,
    pub label: String,
    pub root_need: String,
    pub relation_tendency: String,
    pub dependency: String,
    pub risk: String,
    pub merit: String,
    pub actions: String,
    pub reward: String,
}

impl DimensionProfile {
    /// Labeled descriptive fields in display order (label excluded)
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            ("Root need", &self.root_need),
            ("Tendency", &self.relation_tendency),
            ("Dependency", &self.dependency),
            ("Risk", &self.risk),
            ("Merit", &self.merit),
            ("Actions", &self.actions),
            ("Reward", &self.reward),
        ]
    }
}

/// Immutable reference data for the lifetime of the process.
///
/// Only constructible through [`ReferenceData::new`], which guarantees exactly
/// one profile per dimension, so [`ReferenceData::profile`] never fails.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    questions: Vec<Question>,
    profiles: Vec<DimensionProfile>,
}

impl ReferenceData {
    /// Assemble reference data, collecting every consistency problem.
    ///
    /// With `strict_coverage`, a dimension that has no questions is an error;
    /// otherwise the caller is expected to warn about it.
    pub fn new(
        questions: Vec<Question>,
        profiles: Vec<DimensionProfile>,
        strict_coverage: bool,
    ) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        if questions.is_empty() {
            errors.push("questions: table has no rows".to_string());
        }

        let mut slots: [Option<DimensionProfile>; 4] = [None, None, None, None];
        for profile in profiles {
            let slot = &mut slots[profile.dimension.index()];
            if slot.is_some() {
                errors.push(format!(
                    "profiles: duplicate profile for '{}'",
                    profile.dimension.key()
                ));
            } else {
                *slot = Some(profile);
            }
        }
        for dim in Dimension::ALL {
            if slots[dim.index()].is_none() {
                errors.push(format!("profiles: missing profile for '{}'", dim.key()));
            }
        }

        if strict_coverage {
            for dim in uncovered_dimensions(&questions) {
                errors.push(format!("questions: no questions for '{}'", dim.key()));
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let profiles = slots.into_iter().flatten().collect();
        Ok(Self { questions, profiles })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn profile(&self, dimension: Dimension) -> &DimensionProfile {
        &self.profiles[dimension.index()]
    }

    /// Profiles in canonical order
    pub fn profiles(&self) -> &[DimensionProfile] {
        &self.profiles
    }

    /// Dimensions that have no question in the bank
    pub fn uncovered_dimensions(&self) -> Vec<Dimension> {
        uncovered_dimensions(&self.questions)
    }
}

fn uncovered_dimensions(questions: &[Question]) -> Vec<Dimension> {
    Dimension::ALL
        .into_iter()
        .filter(|d| !questions.iter().any(|q| q.dimension == *d))
        .collect()
}
