//! In-memory score ledger.

use derive_getters::Getters;
use derive_new::new;
use paidplay_tictactoe::{Player, RoundOutcome};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Win and draw counters for the current process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct ScoreTally {
    human_wins: u32,
    computer_wins: u32,
    draws: u32,
}

impl ScoreTally {
    /// Completed rounds counted so far.
    pub fn rounds(&self) -> u32 {
        self.human_wins + self.computer_wins + self.draws
    }
}

impl std::fmt::Display for ScoreTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "You {} - Computer {} - Draws {}",
            self.human_wins, self.computer_wins, self.draws
        )
    }
}

/// Accumulates round results. Knows nothing about boards or sessions.
#[derive(Debug, Clone, Default)]
pub struct ScoreLedger {
    tally: ScoreTally,
}

impl ScoreLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counters.
    pub fn tally(&self) -> ScoreTally {
        self.tally
    }

    /// Counts a finished round. `Ongoing` is ignored.
    ///
    /// Returns true if a counter changed.
    #[instrument(skip(self))]
    pub fn record(&mut self, outcome: RoundOutcome) -> bool {
        match outcome {
            RoundOutcome::Win { player, .. } if player == Player::HUMAN => {
                self.tally.human_wins += 1;
            }
            RoundOutcome::Win { .. } => self.tally.computer_wins += 1,
            RoundOutcome::Draw => self.tally.draws += 1,
            RoundOutcome::Ongoing => {
                debug!("Ignoring non-terminal outcome");
                return false;
            }
        }
        info!(tally = %self.tally, "Score recorded");
        true
    }

    /// Zeroes every counter.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!(previous = %self.tally, "Resetting scores");
        self.tally = ScoreTally::default();
    }
}
