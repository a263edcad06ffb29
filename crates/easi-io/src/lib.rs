use anyhow::Context;
use easi_core::Facility;
use easi_engine::{Assessment, Selection};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

pub mod cli;
pub mod env_config;
pub mod report;
pub use cli::*;

/// Run manifest describing one invocation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub run_id: String,
    pub timestamp: String,
    pub command: String,      // "assess" | "path"
    pub input: String,
    pub n_layers: usize,
    pub n_paths: usize,
    pub parallel: bool,
    pub status: String,
    pub mvp_label: Option<String>,
    pub mvp_interruption: Option<f64>,
    pub tool_version: String,
    pub commit_hash: Option<String>,
    pub rust_version: String,
}

impl RunManifest {
    pub fn new(command: &str, input: &Path, facility: &Facility, parallel: bool) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: command.to_string(),
            input: input.display().to_string(),
            n_layers: facility.n_layers(),
            n_paths: facility.n_paths(),
            parallel,
            status: String::new(),
            mvp_label: None,
            mvp_interruption: None,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            commit_hash: get_git_commit(),
            rust_version: get_rust_version(),
        }
    }

    pub fn record_assessment(&mut self, assessment: &Assessment) {
        match assessment {
            Assessment::Ranked(report) => {
                self.status = "ranked".to_string();
                self.mvp_label = Some(report.mvp.label.clone());
                self.mvp_interruption = Some(report.mvp.overall_interruption);
            }
            Assessment::NoPath => self.status = "no_path".to_string(),
            Assessment::Invalid { reason } => self.status = format!("invalid: {}", reason),
        }
    }

    pub fn record_selection(&mut self, selection: &Selection) {
        match selection {
            Selection::Complete { label, path } => {
                self.status = "complete".to_string();
                self.n_paths = 1;
                self.mvp_label = Some(label.clone());
                self.mvp_interruption = Some(path.overall_interruption);
            }
            Selection::Incomplete { reason } => self.status = format!("incomplete: {}", reason),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).with_context(|| format!("writing manifest {}", path.display()))?;
        Ok(())
    }
}

/// Parse a facility from JSON and name any unnamed tasks.
///
/// Numeric literals beyond the `f64` range (`1e400`) are rejected by the JSON
/// reader itself and fail the parse; quote them to have them treated as missing.
pub fn parse_facility(json: &str) -> anyhow::Result<Facility> {
    let mut facility: Facility = serde_json::from_str(json).context("malformed facility JSON")?;
    facility.assign_missing_ids();
    Ok(facility)
}

/// Read a facility file.
pub fn load_facility(path: &Path) -> anyhow::Result<Facility> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading facility {}", path.display()))?;
    let facility = parse_facility(&json).with_context(|| format!("parsing {}", path.display()))?;
    tracing::info!(
        input = %path.display(),
        layers = facility.n_layers(),
        paths = facility.n_paths(),
        "loaded facility"
    );
    Ok(facility)
}

/// Get git commit hash for reproducibility
fn get_git_commit() -> Option<String> {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
}

fn get_rust_version() -> String {
    std::process::Command::new("rustc")
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                String::from_utf8(output.stdout).ok()
            } else {
                None
            }
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use easi_engine::{Engine, EngineConfig};

    #[test]
    fn test_parse_facility_assigns_ids() {
        let facility = parse_facility(
            r#"{"globals": {"guard_communication": "0.9"},
                "layers": [[{"detection_probability": 0.5}, {"detection_probability": 0.1}], [{}]]}"#,
        )
        .unwrap();
        assert_eq!(facility.globals.guard_communication, 0.9);
        assert_eq!(facility.layers[0].tasks[1].id, "1.2");
        assert_eq!(facility.layers[1].tasks[0].id, "2");
    }

    #[test]
    fn test_parse_facility_rejects_bad_structure() {
        assert!(parse_facility(r#"{"layers": 5}"#).is_err());
        assert!(parse_facility("not json").is_err());
    }

    #[test]
    fn test_out_of_range_literal_fails_but_quoted_is_missing() {
        let err = parse_facility(r#"{"layers": [[{"delay_mean": 1e400}]]}"#).unwrap_err();
        assert!(format!("{:#}", err).contains("out of range"));

        let facility = parse_facility(r#"{"layers": [[{"delay_mean": "1e400"}]]}"#).unwrap();
        assert_eq!(facility.layers[0].tasks[0].delay_mean, 0.0);
    }

    #[test]
    fn test_manifest_records_assessment() {
        let facility = parse_facility(
            r#"{"globals": {"guard_communication": 1, "guard_response_mean": 10, "guard_response_sdev": 2},
                "layers": [[{"id": "a", "detection_probability": 0.5, "delay_mean": 20}]]}"#,
        )
        .unwrap();
        let mut manifest = RunManifest::new("assess", Path::new("facility.json"), &facility, false);
        manifest.record_assessment(&Engine::new(EngineConfig::sequential()).assess(&facility));

        assert_eq!(manifest.status, "ranked");
        assert_eq!(manifest.mvp_label.as_deref(), Some("a"));
        assert_eq!(manifest.n_paths, 1);
        assert!(!manifest.run_id.is_empty());
    }
}
