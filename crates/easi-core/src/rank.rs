use crate::evaluate::EvaluatedPath;
use crate::F;
use std::cmp::Ordering;

/// Ascending order on interruption probability. NaN sorts after every
/// number and `-0.0 == 0.0`, so equal probabilities stay tied.
pub fn interruption_order(a: F, b: F) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Evaluated paths, most vulnerable first.
#[derive(Clone, Debug, PartialEq)]
pub struct Ranking {
    pub paths: Vec<EvaluatedPath>,
}

impl Ranking {
    /// Stable sort: tied paths keep their enumeration order.
    pub fn new(mut paths: Vec<EvaluatedPath>) -> Self {
        paths.sort_by(|a, b| interruption_order(a.overall_interruption, b.overall_interruption));
        Self { paths }
    }

    /// The most vulnerable path, `None` when nothing was evaluated.
    pub fn mvp(&self) -> Option<&EvaluatedPath> {
        self.paths.first()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
