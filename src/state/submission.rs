//! Score submission flow.
//!
//! A finite state machine advanced by gateway messages:
//! `NotStarted -> AwaitingSignature -> AwaitingConfirmation -> Confirmed`, or `-> Failed`
//! from either waiting state. Only one attempt may be outstanding; messages carry the
//! attempt number so a late answer for an older attempt cannot move the current one.

use crate::chain::{ScoreWriter, TxHash};
use crate::error::GameError;
use crate::model::{Session, SessionStatus};
use crate::util::{clog, cwarn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    NotStarted,
    AwaitingSignature,
    AwaitingConfirmation,
    Confirmed,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub attempt: u32,
    pub score: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionMsg {
    Signed { attempt: u32, tx_hash: TxHash },
    Confirmed { attempt: u32 },
    Failed { attempt: u32, error: GameError },
}

impl SubmissionMsg {
    fn attempt(&self) -> u32 {
        match self {
            SubmissionMsg::Signed { attempt, .. }
            | SubmissionMsg::Confirmed { attempt }
            | SubmissionMsg::Failed { attempt, .. } => *attempt,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionEffect {
    /// Re-read the high score of the connected account.
    RefreshHighScore,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubmissionFlow {
    pub state: SubmissionState,
    pub attempt: u32,
    pub tx_hash: Option<TxHash>,
    pub error: Option<GameError>,
    /// Run whose score the current state describes.
    pub run_id: u32,
}

impl SubmissionFlow {
    pub fn in_flight(&self) -> bool {
        matches!(
            self.state,
            SubmissionState::AwaitingSignature | SubmissionState::AwaitingConfirmation
        )
    }

    /// A new run started: drop the previous run's outcome. An attempt still in flight
    /// keeps going and stays tagged with its own run.
    pub fn begin_run(&mut self, run_id: u32) {
        if self.in_flight() || self.run_id == run_id {
            return;
        }
        self.state = SubmissionState::NotStarted;
        self.tx_hash = None;
        self.error = None;
        self.run_id = run_id;
    }

    pub fn is_for_run(&self, run_id: u32) -> bool {
        self.run_id == run_id
    }

    /// Validate and open a new attempt. On `Err` nothing changed and no write must be issued.
    pub fn submit(&mut self, session: &Session) -> Result<SubmissionRequest, GameError> {
        if self.in_flight() {
            return Err(GameError::SubmissionPending);
        }
        if session.status != SessionStatus::Ended {
            return Err(GameError::InvalidInput("no finished game to submit"));
        }
        if session.score == 0 {
            return Err(GameError::InvalidInput("Score is 0, no need to submit"));
        }
        self.attempt = self.attempt.wrapping_add(1);
        self.state = SubmissionState::AwaitingSignature;
        self.tx_hash = None;
        self.error = None;
        self.run_id = session.run_id;
        Ok(SubmissionRequest {
            attempt: self.attempt,
            score: session.score as u64,
        })
    }

    /// Apply a gateway message. Returns the effect to run, at most once per attempt.
    pub fn apply(&mut self, msg: SubmissionMsg) -> Option<SubmissionEffect> {
        if msg.attempt() != self.attempt {
            cwarn(&format!(
                "submission stale message attempt={} current={}",
                msg.attempt(),
                self.attempt
            ));
            return None;
        }
        match (self.state, msg) {
            (SubmissionState::AwaitingSignature, SubmissionMsg::Signed { tx_hash, .. }) => {
                clog(&format!("submission signed tx={}", tx_hash.short()));
                self.tx_hash = Some(tx_hash);
                self.state = SubmissionState::AwaitingConfirmation;
                None
            }
            (SubmissionState::AwaitingConfirmation, SubmissionMsg::Confirmed { .. }) => {
                clog(&format!("submission confirmed attempt={}", self.attempt));
                self.state = SubmissionState::Confirmed;
                Some(SubmissionEffect::RefreshHighScore)
            }
            (
                SubmissionState::AwaitingSignature | SubmissionState::AwaitingConfirmation,
                SubmissionMsg::Failed { error, .. },
            ) => {
                cwarn(&format!("submission failed attempt={} err={}", self.attempt, error));
                self.error = Some(error);
                self.state = SubmissionState::Failed;
                None
            }
            (state, msg) => {
                cwarn(&format!("submission ignored {:?} in {:?}", msg, state));
                None
            }
        }
    }

    pub fn button_label(&self) -> &'static str {
        match self.state {
            SubmissionState::AwaitingSignature => "Confirm in Wallet...",
            SubmissionState::AwaitingConfirmation => "Minting...",
            _ => "Upload Score to Base",
        }
    }
}

/// Run one write + confirmation round trip, reporting each step through `report`.
pub async fn drive<W: ScoreWriter>(
    writer: &W,
    request: SubmissionRequest,
    mut report: impl FnMut(SubmissionMsg),
) {
    let attempt = request.attempt;
    let tx_hash = match writer.submit_score(request.score).await {
        Ok(hash) => hash,
        Err(error) => {
            report(SubmissionMsg::Failed { attempt, error });
            return;
        }
    };
    report(SubmissionMsg::Signed {
        attempt,
        tx_hash: tx_hash.clone(),
    });
    match writer.wait_for_confirmation(&tx_hash).await {
        Ok(()) => report(SubmissionMsg::Confirmed { attempt }),
        Err(error) => report(SubmissionMsg::Failed { attempt, error }),
    }
}
