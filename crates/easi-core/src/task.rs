use crate::{lenient, F};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder used for tasks without a description.
pub const NO_DESCRIPTION: &str = "-";

/// Point within a task at which responders are alerted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingLocation {
    #[default]
    #[serde(rename = "B")]
    Beginning,
    #[serde(rename = "M")]
    Middle,
    #[serde(rename = "E")]
    End,
}

impl TimingLocation {
    pub fn code(&self) -> &'static str {
        match self {
            TimingLocation::Beginning => "B",
            TimingLocation::Middle => "M",
            TimingLocation::End => "E",
        }
    }
}

impl fmt::Display for TimingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTimingLocation(pub String);

impl FromStr for TimingLocation {
    type Err = UnknownTimingLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "beginning" | "begin" => Ok(TimingLocation::Beginning),
            "m" | "middle" => Ok(TimingLocation::Middle),
            "e" | "end" => Ok(TimingLocation::End),
            _ => Err(UnknownTimingLocation(s.to_string())),
        }
    }
}

/// One adversary task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(default, deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::or_zero")]
    pub detection_probability: F,
    #[serde(default, deserialize_with = "lenient::timing")]
    pub timing: TimingLocation,
    #[serde(default, deserialize_with = "lenient::or_zero")]
    pub delay_mean: F,
    #[serde(default, deserialize_with = "lenient::or_zero")]
    pub delay_sdev: F,
}

impl Task {
    pub fn new(id: impl Into<String>, detection_probability: F, timing: TimingLocation, delay_mean: F, delay_sdev: F) -> Self {
        Self {
            id: id.into(),
            description: NO_DESCRIPTION.to_string(),
            detection_probability,
            timing,
            delay_mean,
            delay_sdev,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Description, or the placeholder when blank.
    pub fn label(&self) -> &str {
        let d = self.description.trim();
        if d.is_empty() {
            NO_DESCRIPTION
        } else {
            d
        }
    }
}

/// Parameters shared by every task of an evaluation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalParameters {
    #[serde(default, deserialize_with = "lenient::or_zero")]
    pub guard_communication: F,
    #[serde(default = "lenient::one", deserialize_with = "lenient::or_one")]
    pub probability_of_assessment: F,
    #[serde(default = "lenient::one", deserialize_with = "lenient::or_one")]
    pub probability_of_transmission: F,
    #[serde(default, deserialize_with = "lenient::or_zero")]
    pub guard_response_mean: F,
    #[serde(default, deserialize_with = "lenient::or_zero")]
    pub guard_response_sdev: F,
}

impl Default for GlobalParameters {
    fn default() -> Self {
        Self {
            guard_communication: 0.0,
            probability_of_assessment: 1.0,
            probability_of_transmission: 1.0,
            guard_response_mean: 0.0,
            guard_response_sdev: 0.0,
        }
    }
}

impl GlobalParameters {
    pub fn new(guard_communication: F, guard_response_mean: F, guard_response_sdev: F) -> Self {
        Self {
            guard_communication,
            guard_response_mean,
            guard_response_sdev,
            ..Self::default()
        }
    }

    pub fn with_reliability(mut self, probability_of_assessment: F, probability_of_transmission: F) -> Self {
        self.probability_of_assessment = probability_of_assessment;
        self.probability_of_transmission = probability_of_transmission;
        self
    }
}
