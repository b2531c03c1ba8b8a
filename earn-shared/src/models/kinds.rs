use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer felt about a delivered order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Great,
    Okay,
    Issue,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Great => "great",
            Sentiment::Okay => "okay",
            Sentiment::Issue => "issue",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level page view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Confirmation,
    Delivery,
}

/// Follow-up suggestions offered after a positive check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextStep {
    SetupGuide,
    AutoRefill,
    LeaveReview,
}

impl NextStep {
    pub const ALL: [NextStep; 3] = [NextStep::SetupGuide, NextStep::AutoRefill, NextStep::LeaveReview];
}
