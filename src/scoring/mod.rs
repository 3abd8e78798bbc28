pub mod answer;
pub mod engine;

pub use answer::{
    answers_from_responses, parse_responses, Answer, AnswerError, DEFAULT_RESPONSE, SCALE_MAX,
    SCALE_MIN,
};
pub use engine::{compute_scores, dominant_dimension, normalize, PerDimension, ScoreResult};
