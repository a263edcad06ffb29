use crate::F;

// Abramowitz & Stegun 7.1.26 coefficients
const A1: F = 0.254829592;
const A2: F = -0.284496736;
const A3: F = 1.421413741;
const A4: F = -1.453152027;
const A5: F = 1.061405429;
const P: F = 0.3275911;

/// Error function, Abramowitz and Stegun formula 7.1.26.
///
/// Absolute error is below 1.5e-7 over the whole real line. The
/// approximation is evaluated on |x| and the sign restored afterwards,
/// so `erf(-x) == -erf(x)` for every x except zero, where the formula
/// leaves a residue of about 1e-9.
///
/// Infinite arguments saturate to ±1. NaN propagates.
pub fn erf(x: F) -> F {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / (1.0 + P * x);
    let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

    sign * y
}

/// Standard normal CDF: Φ(z) = ½(1 + erf(z/√2)).
///
/// Increasing z means the guards are further ahead of the adversary, so the
/// result is the probability that the response arrives in time.
pub fn normal_cdf(z: F) -> F {
    0.5 * (1.0 + erf(z / std::f64::consts::SQRT_2))
}
