use serde::{Deserialize, Serialize};
use statig::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionEvent {
    /// A submit was triggered; restarts from any phase
    Submit,
    ValidationPassed,
    ValidationFailed { violations: usize },
    /// Side effects (if any) finished and the outcome was displayed
    Settle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Succeeded,
    Failed,
}

/// Tracks where the orchestrator is in a submit attempt.
#[derive(Debug)]
pub struct SubmissionMachine {
    phase: SubmissionPhase,
    attempts: u64,
    rejected: u64,
    accepted: u64,
}

impl Default for SubmissionMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionMachine {
    pub fn new() -> Self {
        Self {
            phase: SubmissionPhase::Idle,
            attempts: 0,
            rejected: 0,
            accepted: 0,
        }
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    fn start_attempt(&mut self) -> Outcome<State> {
        self.attempts += 1;
        self.phase = SubmissionPhase::Validating;
        tracing::debug!(attempt = self.attempts, "Submission validating");
        Transition(State::validating())
    }

    fn settle(&mut self) -> Outcome<State> {
        self.phase = SubmissionPhase::Idle;
        Transition(State::idle())
    }
}

#[state_machine(initial = "State::idle()")]
impl SubmissionMachine {
    #[state]
    fn idle(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Submit => self.start_attempt(),
            _ => Handled,
        }
    }

    #[state]
    fn validating(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Submit => self.start_attempt(),
            SubmissionEvent::ValidationPassed => {
                self.accepted += 1;
                self.phase = SubmissionPhase::Succeeded;
                Transition(State::succeeded())
            }
            SubmissionEvent::ValidationFailed { violations } => {
                self.rejected += 1;
                self.phase = SubmissionPhase::Failed;
                tracing::debug!(violations = %violations, "Submission failed validation");
                Transition(State::failed())
            }
            SubmissionEvent::Settle => Handled,
        }
    }

    #[state]
    fn succeeded(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Submit => self.start_attempt(),
            SubmissionEvent::Settle => self.settle(),
            _ => Handled,
        }
    }

    #[state]
    fn failed(&mut self, event: &SubmissionEvent) -> Outcome<State> {
        match event {
            SubmissionEvent::Submit => self.start_attempt(),
            SubmissionEvent::Settle => self.settle(),
            _ => Handled,
        }
    }
}
