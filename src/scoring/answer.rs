use crate::reference::{Dimension, ParseDimensionError, Question};
use thiserror::Error;

/// Lowest point on the Likert scale
pub const SCALE_MIN: u8 = 1;
/// Highest point on the Likert scale
pub const SCALE_MAX: u8 = 5;
/// Slider position before the user touches a question
pub const DEFAULT_RESPONSE: u8 = 3;

/// Precondition violations for answers handed to the scorer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("score {score} is out of range (1-5)")]
    ScoreOutOfRange { score: i64 },

    #[error("question {question}: score {score} is out of range (1-5)")]
    ResponseOutOfRange { question: usize, score: i64 },

    #[error(transparent)]
    UnknownDimension(#[from] ParseDimensionError),

    #[error("expected {expected} responses (one per question), got {got}")]
    CountMismatch { expected: usize, got: usize },

    #[error("'{0}' is not a whole number")]
    NotANumber(String),
}

/// One question's response. The score is guaranteed to be within the scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Answer {
    dimension: Dimension,
    raw_score: u8,
}

impl Answer {
    pub fn new(dimension: Dimension, raw_score: i64) -> Result<Self, AnswerError> {
        if !(SCALE_MIN as i64..=SCALE_MAX as i64).contains(&raw_score) {
            return Err(AnswerError::ScoreOutOfRange { score: raw_score });
        }
        Ok(Self {
            dimension,
            raw_score: raw_score as u8,
        })
    }

    /// Build an answer from an untyped dimension key
    pub fn parse(dimension: &str, raw_score: i64) -> Result<Self, AnswerError> {
        Self::new(dimension.parse()?, raw_score)
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn raw_score(&self) -> u8 {
        self.raw_score
    }
}

/// Pair each question with its response, in question order.
///
/// Exactly one response per question is required; the first out-of-range
/// response is reported with its 1-based question number.
pub fn answers_from_responses(
    questions: &[Question],
    responses: &[i64],
) -> Result<Vec<Answer>, AnswerError> {
    if questions.len() != responses.len() {
        return Err(AnswerError::CountMismatch {
            expected: questions.len(),
            got: responses.len(),
        });
    }

    questions
        .iter()
        .zip(responses)
        .enumerate()
        .map(|(i, (question, &score))| {
            Answer::new(question.dimension, score).map_err(|_| AnswerError::ResponseOutOfRange {
                question: i + 1,
                score,
            })
        })
        .collect()
}

/// Parse whitespace or comma separated whole numbers, e.g. "3 4 5" or "3,4,5".
/// Lines starting with `#` are ignored.
pub fn parse_responses(input: &str) -> Result<Vec<i64>, AnswerError> {
    input
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| AnswerError::NotANumber(token.to_string()))
        })
        .collect()
}
