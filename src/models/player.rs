//! Player and PlayerStats data structures.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// Reserved name of the synthetic bye participant. Never accepted as a real player name.
pub const BYE_PLAYER_NAME: &str = "BYE_PLAYER_DUMMY";

/// Counters aggregated from completed matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub legs_won: u32,
    pub legs_lost: u32,
}

impl PlayerStats {
    /// Legs won minus legs lost.
    pub fn leg_difference(&self) -> i64 {
        i64::from(self.legs_won) - i64::from(self.legs_lost)
    }

    /// Record one match from this player's side: own legs first.
    pub fn record(&mut self, own: u32, other: u32) {
        self.legs_won += own;
        self.legs_lost += other;
        if own > other {
            self.points += 2;
            self.wins += 1;
        } else if own < other {
            self.losses += 1;
        } else {
            self.points += 1;
            self.draws += 1;
        }
    }
}

/// A player in the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub tournament_id: TournamentId,
}

impl Player {
    /// Create a new player with the given name.
    pub fn new(name: impl Into<String>, tournament_id: TournamentId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tournament_id,
        }
    }
}
