use crate::quiz::session::Session;
use crate::quiz::{RecordedAnswer, Scenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl FeedbackTier {
    /// Lower bounds are inclusive: 80% is excellent, 60% is good.
    pub fn for_percent(percent_correct: f64) -> Self {
        if percent_correct >= 80.0 {
            FeedbackTier::Excellent
        } else if percent_correct >= 60.0 {
            FeedbackTier::Good
        } else {
            FeedbackTier::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            FeedbackTier::Excellent => {
                "Excellent work! Your triage decisions were fast and accurate."
            }
            FeedbackTier::Good => {
                "Good job! With more practice, you can improve your accuracy and speed."
            }
            FeedbackTier::NeedsImprovement => {
                "This is challenging! Review the explanations and try again to improve your score."
            }
        }
    }
}

/// Derived from a session on demand, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub score: u32,
    pub total_correct: usize,
    pub scenario_count: usize,
    pub percent_correct: f64,
    /// NaN when nothing has been answered yet.
    pub avg_response_time: f64,
    pub tier: FeedbackTier,
}

impl Summary {
    pub fn of(session: &Session) -> Self {
        let answers = session.answers();
        let scenario_count = session.catalog().len();
        let total_correct = answers.iter().filter(|a| a.is_correct).count();
        let percent_correct = total_correct as f64 / scenario_count as f64 * 100.0;
        let avg_response_time =
            answers.iter().map(|a| a.response_time).sum::<f64>() / answers.len() as f64;

        Self {
            score: session.score(),
            total_correct,
            scenario_count,
            percent_correct,
            avg_response_time,
            tier: FeedbackTier::for_percent(percent_correct),
        }
    }
}

/// A recorded answer next to the scenario it answered.
pub struct ReviewEntry<'a> {
    pub answer: &'a RecordedAnswer,
    pub scenario: &'a Scenario,
}

pub fn review(session: &Session) -> Vec<ReviewEntry<'_>> {
    session
        .answers()
        .iter()
        .filter_map(|answer| {
            session
                .catalog()
                .find(answer.scenario_id)
                .map(|scenario| ReviewEntry { answer, scenario })
        })
        .collect()
}
