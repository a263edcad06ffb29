//! # EASI core
//!
//! Estimate of Adversary Sequence Interruption. A facility is a sequence of
//! layers, each holding the candidate tasks an adversary may perform at that
//! stage. Every path (one task per layer) is scored by the probability that
//! responders interrupt the adversary before the last task completes; the
//! lowest-scoring path is the Most Vulnerable Path.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`special`] | `erf` (A&S 7.1.26) and the standard normal CDF |
//! | [`formulas`] | Per-task formulas with explicit defaults |
//! | [`task`], [`facility`] | Input model |
//! | [`path`] | Cartesian-product path enumerator |
//! | [`evaluate`] | Backward and forward passes over one path |
//! | [`rank`] | Ascending, stable ranking and MVP selection |

pub mod evaluate;
pub mod facility;
pub mod formulas;
pub mod lenient;
pub mod path;
pub mod rank;
pub mod special;
pub mod task;

// Core types
pub type F = f64;

pub use evaluate::{backward_pass, evaluate, forward_pass, CumulativeTotals, EvaluatedPath, EvaluatedStep};
pub use facility::{Facility, Layer, StructureError};
pub use path::{enumerate_paths, Path, PathEnumerator, LABEL_SEPARATOR};
pub use rank::Ranking;
pub use special::{erf, normal_cdf};
pub use task::{GlobalParameters, Task, TimingLocation};
