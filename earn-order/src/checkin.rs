use earn_catalog::{NextStepCard, SupportStatus, IMPROVEMENT_TOPICS, SURVEY_CREDIT_CENTS};
use earn_core::{EventSink, Timings, TransientFlag, Transition};
use earn_shared::{InteractionEvent, NextStep, Sentiment};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Where the post-delivery check-in currently is.
///
/// `OkaySurvey` is only ever entered from `OkayPrompt`, and the sentiment
/// branches have no way back to `AwaitingSentiment`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum CheckInStage {
    AwaitingSentiment,
    Great,
    OkayPrompt,
    OkaySurvey { topics: BTreeSet<String> },
    OkayDeclined,
    OkaySubmitted { topics: BTreeSet<String> },
    Issue,
}

impl CheckInStage {
    pub fn sentiment(&self) -> Option<Sentiment> {
        match self {
            CheckInStage::AwaitingSentiment => None,
            CheckInStage::Great => Some(Sentiment::Great),
            CheckInStage::OkayPrompt
            | CheckInStage::OkaySurvey { .. }
            | CheckInStage::OkayDeclined
            | CheckInStage::OkaySubmitted { .. } => Some(Sentiment::Okay),
            CheckInStage::Issue => Some(Sentiment::Issue),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CheckInStage::AwaitingSentiment => "awaiting_sentiment",
            CheckInStage::Great => "great",
            CheckInStage::OkayPrompt => "okay_prompt",
            CheckInStage::OkaySurvey { .. } => "okay_survey",
            CheckInStage::OkayDeclined => "okay_declined",
            CheckInStage::OkaySubmitted { .. } => "okay_submitted",
            CheckInStage::Issue => "issue",
        }
    }
}

/// Post-delivery satisfaction flow, one per mounted delivery view
pub struct FeedbackSession {
    stage: CheckInStage,
    celebration: TransientFlag,
    support: SupportStatus,
    sink: Arc<dyn EventSink>,
    timings: Timings,
}

impl FeedbackSession {
    pub fn new(sink: Arc<dyn EventSink>, timings: Timings) -> Self {
        Self {
            stage: CheckInStage::AwaitingSentiment,
            celebration: TransientFlag::new(),
            support: SupportStatus::default(),
            sink,
            timings,
        }
    }

    pub fn stage(&self) -> &CheckInStage {
        &self.stage
    }

    pub fn sentiment(&self) -> Option<Sentiment> {
        self.stage.sentiment()
    }

    pub fn survey_started(&self) -> bool {
        matches!(self.stage, CheckInStage::OkaySurvey { .. } | CheckInStage::OkaySubmitted { .. })
    }

    pub fn topics(&self) -> Option<&BTreeSet<String>> {
        match &self.stage {
            CheckInStage::OkaySurvey { topics } | CheckInStage::OkaySubmitted { topics } => Some(topics),
            _ => None,
        }
    }

    pub fn is_celebrating(&self) -> bool {
        self.celebration.is_raised()
    }

    /// Suggestions for the `great` branch; empty elsewhere
    pub fn next_steps(&self) -> Vec<NextStepCard> {
        if self.stage == CheckInStage::Great {
            NextStepCard::all()
        } else {
            Vec::new()
        }
    }

    /// Support hand-off details for the `issue` branch
    pub fn support(&self) -> Option<&SupportStatus> {
        (self.stage == CheckInStage::Issue).then_some(&self.support)
    }

    /// Record how the delivery went. Only the first call counts.
    ///
    /// A `great` answer raises the celebration effect, so this must be called
    /// from within a Tokio runtime.
    pub fn select_sentiment(&mut self, sentiment: Sentiment) -> Transition {
        if self.stage != CheckInStage::AwaitingSentiment {
            debug!(%sentiment, current = self.stage.name(), "Ignoring repeated sentiment");
            return Transition::Ignored;
        }

        self.stage = match sentiment {
            Sentiment::Great => CheckInStage::Great,
            Sentiment::Okay => CheckInStage::OkayPrompt,
            Sentiment::Issue => CheckInStage::Issue,
        };

        if sentiment == Sentiment::Great {
            self.celebration.raise(self.timings.celebration());
        }

        info!(%sentiment, "Feedback recorded");
        self.sink.notify(InteractionEvent::FeedbackRecorded { sentiment });
        Transition::Applied
    }

    pub fn start_survey(&mut self) -> Transition {
        if self.stage != CheckInStage::OkayPrompt {
            debug!(current = self.stage.name(), "Ignoring survey start");
            return Transition::Ignored;
        }
        self.stage = CheckInStage::OkaySurvey { topics: BTreeSet::new() };
        Transition::Applied
    }

    /// "No thanks" on the survey prompt
    pub fn decline_survey(&mut self) -> Transition {
        if self.stage != CheckInStage::OkayPrompt {
            debug!(current = self.stage.name(), "Ignoring survey decline");
            return Transition::Ignored;
        }
        self.stage = CheckInStage::OkayDeclined;
        info!("Survey declined");
        self.sink.notify(InteractionEvent::SurveyDeclined);
        Transition::Applied
    }

    /// Add topics to the survey selection (set union); blank tags are dropped
    pub fn select_improvement_topics<I, S>(&mut self, tags: I) -> Transition
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let CheckInStage::OkaySurvey { topics } = &mut self.stage else {
            debug!(current = self.stage.name(), "Ignoring topic selection outside survey");
            return Transition::Ignored;
        };

        topics.extend(
            tags.into_iter()
                .map(Into::into)
                .map(|t: String| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        );
        Transition::Applied
    }

    /// Flip a single chip
    pub fn toggle_topic(&mut self, tag: &str) -> Transition {
        let CheckInStage::OkaySurvey { topics } = &mut self.stage else {
            debug!(current = self.stage.name(), "Ignoring topic toggle outside survey");
            return Transition::Ignored;
        };

        let tag = tag.trim();
        if tag.is_empty() {
            return Transition::Ignored;
        }
        if !topics.remove(tag) {
            topics.insert(tag.to_string());
        }
        Transition::Applied
    }

    /// "Submit & Get $5 Credit"
    pub fn submit_survey(&mut self) -> Transition {
        let CheckInStage::OkaySurvey { topics } = &mut self.stage else {
            debug!(current = self.stage.name(), "Ignoring survey submit");
            return Transition::Ignored;
        };

        let topics = std::mem::take(topics);
        let submitted: Vec<String> = topics.iter().cloned().collect();
        self.stage = CheckInStage::OkaySubmitted { topics };

        info!(topics = submitted.len(), "Survey submitted");
        self.sink.notify(InteractionEvent::SurveySubmitted {
            topics: submitted,
            credit_cents: SURVEY_CREDIT_CENTS,
        });
        Transition::Applied
    }

    pub fn choose_next_step(&mut self, step: NextStep) -> Transition {
        if self.stage != CheckInStage::Great {
            debug!(?step, current = self.stage.name(), "Ignoring next step outside great branch");
            return Transition::Ignored;
        }
        info!(?step, "Next step chosen");
        self.sink.notify(InteractionEvent::NextStepChosen { step });
        Transition::Applied
    }

    /// "Chat with Support Now"; the chat itself is an external collaborator
    pub fn request_support(&mut self) -> Transition {
        if self.stage != CheckInStage::Issue {
            debug!(current = self.stage.name(), "Ignoring support request outside issue branch");
            return Transition::Ignored;
        }
        info!("Support chat requested");
        self.sink.notify(InteractionEvent::ChatRequested);
        Transition::Applied
    }

    pub fn snapshot(&self) -> CheckInSnapshot {
        CheckInSnapshot {
            stage: self.stage.clone(),
            sentiment: self.sentiment(),
            survey_started: self.survey_started(),
            celebrating: self.is_celebrating(),
            topic_options: if matches!(self.stage, CheckInStage::OkaySurvey { .. }) {
                IMPROVEMENT_TOPICS.iter().map(|t| t.to_string()).collect()
            } else {
                Vec::new()
            },
            next_steps: self.next_steps(),
            support: self.support().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckInSnapshot {
    #[serde(flatten)]
    pub stage: CheckInStage,
    pub sentiment: Option<Sentiment>,
    pub survey_started: bool,
    pub celebrating: bool,
    pub topic_options: Vec<String>,
    pub next_steps: Vec<NextStepCard>,
    pub support: Option<SupportStatus>,
}
