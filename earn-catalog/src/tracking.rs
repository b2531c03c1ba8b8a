use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    Active,
    Upcoming,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stage {
    pub label: String,
    pub status: StageStatus,
}

/// Where the shipment currently is
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryPhase {
    Confirmed,
    InTransit,
    Delivered,
}

/// Confirmed → In Transit → Delivered tracker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeliveryProgress {
    pub stages: Vec<Stage>,
}

impl DeliveryProgress {
    const LABELS: [&'static str; 3] = ["Confirmed", "In Transit", "Delivered"];

    pub fn for_phase(phase: DeliveryPhase) -> Self {
        use StageStatus::*;

        let statuses = match phase {
            DeliveryPhase::Confirmed => [Completed, Upcoming, Upcoming],
            DeliveryPhase::InTransit => [Completed, Active, Upcoming],
            DeliveryPhase::Delivered => [Completed, Completed, Completed],
        };

        let stages = Self::LABELS
            .iter()
            .zip(statuses)
            .map(|(label, status)| Stage {
                label: label.to_string(),
                status,
            })
            .collect();

        Self { stages }
    }

    pub fn completed_count(&self) -> usize {
        self.stages.iter().filter(|s| s.status == StageStatus::Completed).count()
    }

    /// Share of connector lines drawn as filled (a connector follows each completed stage but the last)
    pub fn completed_fraction(&self) -> f64 {
        let connectors = self.stages.len().saturating_sub(1);
        if connectors == 0 {
            return 0.0;
        }
        let filled = self.stages[..connectors]
            .iter()
            .filter(|s| s.status == StageStatus::Completed)
            .count();
        filled as f64 / connectors as f64
    }
}

impl Default for DeliveryProgress {
    fn default() -> Self {
        Self::for_phase(DeliveryPhase::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(progress: &DeliveryProgress) -> Vec<StageStatus> {
        progress.stages.iter().map(|s| s.status).collect()
    }

    #[test]
    fn test_confirmed_phase() {
        let progress = DeliveryProgress::default();
        assert_eq!(
            statuses(&progress),
            vec![StageStatus::Completed, StageStatus::Upcoming, StageStatus::Upcoming]
        );
        assert_eq!(progress.completed_fraction(), 0.5);
    }

    #[test]
    fn test_in_transit_phase() {
        let progress = DeliveryProgress::for_phase(DeliveryPhase::InTransit);
        assert_eq!(
            statuses(&progress),
            vec![StageStatus::Completed, StageStatus::Active, StageStatus::Upcoming]
        );
        assert_eq!(progress.completed_count(), 1);
    }

    #[test]
    fn test_delivered_phase() {
        let progress = DeliveryProgress::for_phase(DeliveryPhase::Delivered);
        assert_eq!(progress.completed_count(), 3);
        assert_eq!(progress.completed_fraction(), 1.0);
    }
}
