pub mod catalog;
pub mod clock;
pub mod results;
pub mod session;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Triage priority a patient can be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageCategory {
    Red,
    Yellow,
    Green,
}

impl TriageCategory {
    pub const ALL: [TriageCategory; 3] = [
        TriageCategory::Red,
        TriageCategory::Yellow,
        TriageCategory::Green,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriageCategory::Red => "red",
            TriageCategory::Yellow => "yellow",
            TriageCategory::Green => "green",
        }
    }

    /// Short legend shown next to the category name on the intro screen.
    pub fn legend(&self) -> &'static str {
        match self {
            TriageCategory::Red => "Immediate, life-threatening",
            TriageCategory::Yellow => "Urgent, but can briefly wait",
            TriageCategory::Green => "Non-urgent, stable condition",
        }
    }
}

impl fmt::Display for TriageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown triage category '{0}'")]
pub struct UnknownCategory(pub String);

impl FromStr for TriageCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TriageCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vitals {
    #[serde(rename = "hr")]
    pub heart_rate: u32,
    #[serde(rename = "bp")]
    pub blood_pressure: String,
    #[serde(rename = "o2")]
    pub oxygen_saturation: String,
    #[serde(rename = "resp")]
    pub respiratory_rate: u32,
    /// Degrees Celsius.
    #[serde(rename = "temp")]
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnswerOption {
    pub id: TriageCategory,
    pub text: String,
    #[serde(rename = "correct")]
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scenario {
    pub id: u32,
    pub description: String,
    pub vitals: Vitals,
    pub options: Vec<AnswerOption>,
    pub explanation: String,
}

impl Scenario {
    pub fn option(&self, id: TriageCategory) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.is_correct)
    }
}

/// One submitted answer. Never changed once appended to a session.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecordedAnswer {
    pub scenario_id: u32,
    pub selected: TriageCategory,
    pub is_correct: bool,
    /// Seconds between the scenario being shown and the answer, unrounded.
    pub response_time: f64,
    pub points_earned: u32,
}
