use super::answer::{Answer, SCALE_MAX, SCALE_MIN};
use crate::reference::Dimension;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

/// Mean used for a dimension that received no answers. It flows through
/// [`normalize`] like any other mean and lands at -25%.
pub const EMPTY_DIMENSION_MEAN: f64 = 0.0;

/// One value per dimension, always complete, indexed in canonical order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerDimension<T>([T; 4]);

impl<T: Copy> PerDimension<T> {
    pub fn new(values: [T; 4]) -> Self {
        Self(values)
    }

    pub fn get(&self, dimension: Dimension) -> T {
        self.0[dimension.index()]
    }

    /// (dimension, value) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Dimension, T)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}

impl<T: Serialize> Serialize for PerDimension<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        for dim in Dimension::ALL {
            map.serialize_entry(dim.key(), &self.0[dim.index()])?;
        }
        map.end()
    }
}

/// Scores for one submission. Created by [`compute_scores`] and never mutated.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScoreResult {
    means: PerDimension<f64>,
    normalized: PerDimension<f64>,
    answered: PerDimension<usize>,
}

impl ScoreResult {
    /// Mean raw score per dimension (1.0..=5.0, or 0.0 when unanswered)
    pub fn means(&self) -> &PerDimension<f64> {
        &self.means
    }

    /// Mean rescaled onto 0..=100
    pub fn normalized(&self) -> &PerDimension<f64> {
        &self.normalized
    }

    pub fn answered(&self, dimension: Dimension) -> usize {
        self.answered.get(dimension)
    }

    /// Dimensions that fell back to [`EMPTY_DIMENSION_MEAN`]
    pub fn unanswered(&self) -> Vec<Dimension> {
        self.answered
            .iter()
            .filter(|(_, count)| *count == 0)
            .map(|(d, _)| d)
            .collect()
    }

    pub fn dominant(&self) -> Dimension {
        dominant_dimension(&self.normalized)
    }
}

/// Rescale a mean on the 1-5 scale linearly so that 1 maps to 0 and 5 to 100.
pub fn normalize(mean: f64) -> f64 {
    (mean - SCALE_MIN as f64) / (SCALE_MAX - SCALE_MIN) as f64 * 100.0
}

/// Group answers by dimension, average them and normalize the averages.
pub fn compute_scores(answers: &[Answer]) -> ScoreResult {
    let mut sums = [0u32; 4];
    let mut counts = [0usize; 4];
    for answer in answers {
        let i = answer.dimension().index();
        sums[i] += answer.raw_score() as u32;
        counts[i] += 1;
    }

    let means: [f64; 4] = std::array::from_fn(|i| {
        if counts[i] == 0 {
            EMPTY_DIMENSION_MEAN
        } else {
            sums[i] as f64 / counts[i] as f64
        }
    });
    let normalized = means.map(normalize);

    debug!(
        answers = answers.len(),
        ?means,
        ?normalized,
        "Computed dimension scores"
    );

    ScoreResult {
        means: PerDimension(means),
        normalized: PerDimension(normalized),
        answered: PerDimension(counts),
    }
}

/// Dimension with the highest score. Ties go to the earliest dimension in
/// canonical order (Outcome, Relation, Process, Value).
pub fn dominant_dimension(scores: &PerDimension<f64>) -> Dimension {
    let mut best = Dimension::Outcome;
    for (dim, score) in scores.iter() {
        if score > scores.get(best) {
            best = dim;
        }
    }
    best
}
