//! Per-task EASI formulas.
//!
//! Every function is total: a non-finite argument is replaced by that
//! argument's default (0 unless stated) before the formula runs.

use crate::special::normal_cdf;
use crate::task::TimingLocation;
use crate::F;

/// Replace a non-finite value with `default`.
#[inline]
pub fn finite_or(x: F, default: F) -> F {
    if x.is_finite() {
        x
    } else {
        default
    }
}

/// P(D) · P(A) · P(T). P(D) defaults to 0, P(A) and P(T) to 1.
pub fn adjusted_detection(p_detect: F, p_assess: F, p_transmit: F) -> F {
    finite_or(p_detect, 0.0) * finite_or(p_assess, 1.0) * finite_or(p_transmit, 1.0)
}

pub fn missed_detection(adjusted: F) -> F {
    1.0 - finite_or(adjusted, 0.0)
}

/// Probability that this task is where detection first happens.
pub fn first_detection(adjusted: F, previous_missed: F) -> F {
    finite_or(adjusted, 0.0) * finite_or(previous_missed, 0.0)
}

pub fn cumulative_delay(mean: F, next_cumulative: F) -> F {
    finite_or(mean, 0.0) + finite_or(next_cumulative, 0.0)
}

pub fn cumulative_variance(sdev: F, next_cumulative: F) -> F {
    let sdev = finite_or(sdev, 0.0);
    sdev * sdev + finite_or(next_cumulative, 0.0)
}

/// Share of a task's own delay still available to responders.
pub fn timing_weight(location: TimingLocation) -> F {
    match location {
        TimingLocation::Beginning => 1.0,
        TimingLocation::Middle => 0.5,
        TimingLocation::End => 0.0,
    }
}

pub fn true_mean(location: TimingLocation, mean: F, next_cumulative_delay: F) -> F {
    timing_weight(location) * finite_or(mean, 0.0) + finite_or(next_cumulative_delay, 0.0)
}

pub fn true_variance(location: TimingLocation, sdev: F, next_cumulative_variance: F) -> F {
    let w = timing_weight(location);
    let sdev = finite_or(sdev, 0.0);
    w * w * sdev * sdev + finite_or(next_cumulative_variance, 0.0)
}

/// Z = (μ_R − μ_T) / √(σ_R² + σ_T²)
///
/// With zero combined variance the result is +∞ when the response mean is
/// larger, −∞ when it is smaller and 0 when the two means coincide.
pub fn z_value(true_mean: F, true_variance: F, response_mean: F, response_sdev: F) -> F {
    let true_mean = finite_or(true_mean, 0.0);
    let true_variance = finite_or(true_variance, 0.0);
    let response_mean = finite_or(response_mean, 0.0);
    let response_sdev = finite_or(response_sdev, 0.0);

    let numerator = response_mean - true_mean;
    let denominator = (response_sdev * response_sdev + true_variance).sqrt();

    if denominator == 0.0 {
        return if numerator > 0.0 {
            F::INFINITY
        } else if numerator < 0.0 {
            F::NEG_INFINITY
        } else {
            0.0
        };
    }
    numerator / denominator
}

pub fn cdf_probability(z: F) -> F {
    normal_cdf(z)
}

pub fn task_interruption(first_detection: F, cdf: F) -> F {
    first_detection * cdf
}

pub fn overall_interruption(sum_of_task_interruptions: F, guard_communication: F) -> F {
    sum_of_task_interruptions * guard_communication
}
