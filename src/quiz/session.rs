use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use crate::quiz::catalog::Catalog;
use crate::quiz::clock::Clock;
use crate::quiz::{RecordedAnswer, Scenario, TriageCategory};

pub const BASE_POINTS: u32 = 100;

/// (response time upper bound in seconds, bonus). Bounds are exclusive.
const SPEED_BONUSES: [(f64, u32); 3] = [(5.0, 50), (10.0, 30), (15.0, 10)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Intro,
    Playing,
    Results,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Intro => "intro",
            Phase::Playing => "playing",
            Phase::Results => "results",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Start,
    /// Answer the current scenario with the given option id.
    SelectAnswer(String),
    Restart,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::SelectAnswer(_) => "select answer",
            Action::Restart => "restart",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot {action} during the {phase} phase")]
    InvalidPhaseTransition { action: &'static str, phase: Phase },

    #[error("option '{option_id}' is not offered by scenario {scenario_id}")]
    UnknownOptionSelected { scenario_id: u32, option_id: String },
}

/// Points for one answer: nothing when wrong, otherwise the base award plus a speed bonus.
pub fn points_for(is_correct: bool, response_time: f64) -> u32 {
    if !is_correct {
        return 0;
    }
    let bonus = SPEED_BONUSES
        .iter()
        .find(|(limit, _)| response_time < *limit)
        .map(|(_, bonus)| *bonus)
        .unwrap_or(0);
    BASE_POINTS + bonus
}

/// A single run through the catalog.
///
/// Sessions are values: [`Session::apply`] never mutates the receiver, it hands
/// back the next session, so a rejected action leaves the caller's copy intact.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    catalog: Arc<Catalog>,
    phase: Phase,
    current_scenario: usize,
    score: u32,
    answers: Vec<RecordedAnswer>,
    presented_at: Duration,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            phase: Phase::Intro,
            current_scenario: 0,
            score: 0,
            answers: Vec::new(),
            presented_at: Duration::ZERO,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current_scenario
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn answers(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The scenario awaiting an answer; `None` outside the playing phase.
    pub fn current_scenario(&self) -> Option<&Scenario> {
        match self.phase {
            Phase::Playing => self.catalog.get(self.current_scenario),
            _ => None,
        }
    }

    pub fn apply(&self, action: Action, clock: &impl Clock) -> Result<Session, SessionError> {
        let next = match (&action, self.phase) {
            (Action::Restart, _) | (Action::Start, Phase::Intro | Phase::Results) => {
                Ok(self.start(clock))
            }
            (Action::SelectAnswer(option_id), Phase::Playing) => {
                self.select_answer(option_id, clock)
            }
            (_, phase) => Err(SessionError::InvalidPhaseTransition {
                action: action.name(),
                phase,
            }),
        };
        if let Err(e) = &next {
            warn!("Rejected action: {}", e);
        }
        next
    }

    fn start(&self, clock: &impl Clock) -> Session {
        info!(
            "Starting triage run over {} scenarios",
            self.catalog.len()
        );
        Session {
            catalog: self.catalog.clone(),
            phase: Phase::Playing,
            current_scenario: 0,
            score: 0,
            answers: Vec::new(),
            presented_at: clock.now(),
        }
    }

    fn select_answer(&self, option_id: &str, clock: &impl Clock) -> Result<Session, SessionError> {
        let scenario = self
            .current_scenario()
            .ok_or(SessionError::InvalidPhaseTransition {
                action: "select answer",
                phase: self.phase,
            })?;

        let option = option_id
            .parse::<TriageCategory>()
            .ok()
            .and_then(|id| scenario.option(id))
            .ok_or_else(|| SessionError::UnknownOptionSelected {
                scenario_id: scenario.id,
                option_id: option_id.to_string(),
            })?;

        let now = clock.now();
        let response_time = now.saturating_sub(self.presented_at).as_secs_f64();
        let points_earned = points_for(option.is_correct, response_time);

        debug!(
            "Scenario {}: picked {} ({}) in {:.3}s for {} points",
            scenario.id,
            option.id,
            if option.is_correct { "correct" } else { "incorrect" },
            response_time,
            points_earned
        );

        let mut answers = self.answers.clone();
        answers.push(RecordedAnswer {
            scenario_id: scenario.id,
            selected: option.id,
            is_correct: option.is_correct,
            response_time,
            points_earned,
        });
        let score = self.score + points_earned;

        let next = if self.current_scenario + 1 < self.catalog.len() {
            Session {
                catalog: self.catalog.clone(),
                phase: Phase::Playing,
                current_scenario: self.current_scenario + 1,
                score,
                answers,
                presented_at: now,
            }
        } else {
            info!("Triage run finished with {} points", score);
            Session {
                catalog: self.catalog.clone(),
                phase: Phase::Results,
                current_scenario: self.current_scenario,
                score,
                answers,
                presented_at: self.presented_at,
            }
        };
        Ok(next)
    }
}
