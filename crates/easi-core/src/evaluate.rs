//! Path evaluator.
//!
//! Two passes over an ordered task sequence:
//!
//! 1. [`backward_pass`] walks last task to first and records, per position,
//!    the cumulative delay/variance from that task onward and the totals
//!    strictly after it.
//! 2. [`forward_pass`] walks first task to last, carrying the product of
//!    missed-detection probabilities, and scores each task against the
//!    guard response using the totals from step 1.
//!
//! The forward pass never starts before the backward pass is complete.

use crate::formulas;
use crate::lenient;
use crate::task::{GlobalParameters, Task, TimingLocation};
use crate::F;
use serde::{Deserialize, Serialize};

/// Output of the backward pass, indexed by position in the path.
#[derive(Clone, Debug, PartialEq)]
pub struct CumulativeTotals {
    pub cumulative_delay: Vec<F>,
    pub cumulative_variance: Vec<F>,
    pub next_cumulative_delay: Vec<F>,
    pub next_cumulative_variance: Vec<F>,
}

impl CumulativeTotals {
    pub fn len(&self) -> usize {
        self.cumulative_delay.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cumulative_delay.is_empty()
    }
}

/// Every intermediate value for one task within one path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedStep {
    pub task_id: String,
    pub description: String,
    pub detection_probability: F,
    pub timing: TimingLocation,
    pub delay_mean: F,
    pub delay_sdev: F,
    pub adjusted_detection: F,
    pub missed_detection: F,
    pub first_detection: F,
    pub cumulative_delay: F,
    pub cumulative_variance: F,
    pub true_mean: F,
    pub true_variance: F,
    /// Infinite when the combined variance is zero; serialized as `"inf"`/`"-inf"`.
    #[serde(
        serialize_with = "lenient::serialize_extended",
        deserialize_with = "lenient::deserialize_extended"
    )]
    pub z_value: F,
    pub cdf_probability: F,
    pub task_interruption: F,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedPath {
    pub steps: Vec<EvaluatedStep>,
    pub sum_of_task_interruptions: F,
    pub overall_interruption: F,
}

impl EvaluatedPath {
    pub fn task_ids(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|s| s.task_id.as_str())
    }

    pub fn label(&self, separator: &str) -> String {
        self.task_ids().collect::<Vec<_>>().join(separator)
    }
}

/// Cumulative delay and variance, scanned back to front.
pub fn backward_pass(tasks: &[&Task]) -> CumulativeTotals {
    let n = tasks.len();
    let mut totals = CumulativeTotals {
        cumulative_delay: vec![0.0; n],
        cumulative_variance: vec![0.0; n],
        next_cumulative_delay: vec![0.0; n],
        next_cumulative_variance: vec![0.0; n],
    };

    let mut delay = 0.0;
    let mut variance = 0.0;
    for i in (0..n).rev() {
        totals.next_cumulative_delay[i] = delay;
        totals.next_cumulative_variance[i] = variance;

        delay = formulas::cumulative_delay(tasks[i].delay_mean, delay);
        variance = formulas::cumulative_variance(tasks[i].delay_sdev, variance);

        totals.cumulative_delay[i] = delay;
        totals.cumulative_variance[i] = variance;
    }
    totals
}

/// Detection chain and per-task interruption, scanned front to back.
///
/// `totals` must come from [`backward_pass`] over the same tasks.
pub fn forward_pass(tasks: &[&Task], totals: &CumulativeTotals, globals: &GlobalParameters) -> Vec<EvaluatedStep> {
    debug_assert_eq!(tasks.len(), totals.len());

    let mut previous_missed = 1.0;
    let mut steps = Vec::with_capacity(tasks.len());

    for (i, task) in tasks.iter().enumerate() {
        let adjusted = formulas::adjusted_detection(
            task.detection_probability,
            globals.probability_of_assessment,
            globals.probability_of_transmission,
        );
        let missed = formulas::missed_detection(adjusted);
        let first = formulas::first_detection(adjusted, previous_missed);
        let true_mean = formulas::true_mean(task.timing, task.delay_mean, totals.next_cumulative_delay[i]);
        let true_variance = formulas::true_variance(task.timing, task.delay_sdev, totals.next_cumulative_variance[i]);
        let z = formulas::z_value(
            true_mean,
            true_variance,
            globals.guard_response_mean,
            globals.guard_response_sdev,
        );
        let cdf = formulas::cdf_probability(z);

        steps.push(EvaluatedStep {
            task_id: task.id.clone(),
            description: task.label().to_string(),
            detection_probability: task.detection_probability,
            timing: task.timing,
            delay_mean: task.delay_mean,
            delay_sdev: task.delay_sdev,
            adjusted_detection: adjusted,
            missed_detection: missed,
            first_detection: first,
            cumulative_delay: totals.cumulative_delay[i],
            cumulative_variance: totals.cumulative_variance[i],
            true_mean,
            true_variance,
            z_value: z,
            cdf_probability: cdf,
            task_interruption: formulas::task_interruption(first, cdf),
        });

        previous_missed *= missed;
    }
    steps
}

/// Score one path.
pub fn evaluate(tasks: &[&Task], globals: &GlobalParameters) -> EvaluatedPath {
    let totals = backward_pass(tasks);
    let steps = forward_pass(tasks, &totals, globals);

    let sum: F = steps.iter().map(|s| s.task_interruption).sum();
    EvaluatedPath {
        steps,
        sum_of_task_interruptions: sum,
        overall_interruption: formulas::overall_interruption(sum, globals.guard_communication),
    }
}
