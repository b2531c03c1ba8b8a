use earn_shared::NextStep;
use serde::{Deserialize, Serialize};

/// Chips offered in the "what could have been better?" survey
pub const IMPROVEMENT_TOPICS: [&str; 5] = [
    "Packaging",
    "Delivery Speed",
    "Product Quality",
    "Communication",
    "Other",
];

/// Store credit granted for a completed survey
pub const SURVEY_CREDIT_CENTS: i32 = 500;

/// Loyalty banner above the offer cards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RewardStats {
    pub progress_percent: u8,
    pub points: u32,
    pub potential_savings_cents: i32,
}

impl Default for RewardStats {
    fn default() -> Self {
        Self {
            progress_percent: 75,
            points: 375,
            potential_savings_cents: 12_700,
        }
    }
}

impl RewardStats {
    pub fn progress(&self) -> u8 {
        self.progress_percent.min(100)
    }

    pub fn points_label(&self) -> String {
        format!("{} points", self.points)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NextStepCard {
    pub step: NextStep,
    pub title: String,
    pub description: String,
    pub badge: String,
}

impl NextStepCard {
    pub fn for_step(step: NextStep) -> Self {
        let (title, description, badge) = match step {
            NextStep::SetupGuide => (
                "Setup Guide",
                "Get the most out of your headphones with expert tips",
                "Popular",
            ),
            NextStep::AutoRefill => (
                "Set Up Auto-Refill",
                "Never run out + earn double loyalty points",
                "Save 15%",
            ),
            NextStep::LeaveReview => (
                "Leave a Review",
                "Share your experience and earn bonus points",
                "+50 pts",
            ),
        };

        Self {
            step,
            title: title.to_string(),
            description: description.to_string(),
            badge: badge.to_string(),
        }
    }

    /// Suggestions shown after a "great" check-in, in display order
    pub fn all() -> Vec<Self> {
        NextStep::ALL.into_iter().map(Self::for_step).collect()
    }
}

/// Support availability shown on the issue branch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SupportStatus {
    pub online: bool,
    pub average_response: String,
    pub first_contact_resolution: String,
}

impl Default for SupportStatus {
    fn default() -> Self {
        Self {
            online: true,
            average_response: "2 min".to_string(),
            first_contact_resolution: "98% of issues resolved in first contact".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_steps_order() {
        let steps: Vec<NextStep> = NextStepCard::all().into_iter().map(|c| c.step).collect();
        assert_eq!(steps, vec![NextStep::SetupGuide, NextStep::AutoRefill, NextStep::LeaveReview]);
    }

    #[test]
    fn test_reward_stats_clamp() {
        let stats = RewardStats { progress_percent: 140, ..Default::default() };
        assert_eq!(stats.progress(), 100);
        assert_eq!(RewardStats::default().points_label(), "375 points");
    }
}
