use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::HaulsightError;

/// Category of job being estimated. Closed set: unknown values are rejected
/// at the upload boundary so they never reach the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobType {
    Standard,
    DumpsterCleanout,
    DumpsterOverflow,
    ContainerService,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Standard => "STANDARD",
            JobType::DumpsterCleanout => "DUMPSTER_CLEANOUT",
            JobType::DumpsterOverflow => "DUMPSTER_OVERFLOW",
            JobType::ContainerService => "CONTAINER_SERVICE",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = HaulsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STANDARD" => Ok(JobType::Standard),
            "DUMPSTER_CLEANOUT" => Ok(JobType::DumpsterCleanout),
            "DUMPSTER_OVERFLOW" => Ok(JobType::DumpsterOverflow),
            "CONTAINER_SERVICE" => Ok(JobType::ContainerService),
            other => Err(HaulsightError::Validation(format!(
                "unknown job_type: {other}"
            ))),
        }
    }
}

/// Confidence label the model is asked to report alongside its estimate.
/// Missing or malformed labels are tolerated as `None`, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        }
    }

    /// Parse a single token, case-insensitively. Anything outside the closed
    /// set is `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Confidence::Low),
            "medium" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub instance_id: Uuid,
}

impl ServiceInfo {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            instance_id: Uuid::new_v4(),
        }
    }
}
