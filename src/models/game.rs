//! Match (game), Slot, and MatchStatus for 1v1 dart matches.

use crate::models::player::PlayerId;
use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Side of a match. Also selects which side of the next match a winner fills.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Slot {
    #[default]
    One,
    Two,
}

impl Slot {
    /// Slot 1 for even placeholder indices, slot 2 for odd ones.
    pub fn for_index(index: usize) -> Self {
        if index % 2 == 0 {
            Slot::One
        } else {
            Slot::Two
        }
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> u8 {
        match slot {
            Slot::One => 1,
            Slot::Two => 2,
        }
    }
}

impl TryFrom<u8> for Slot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Slot::One),
            2 => Ok(Slot::Two),
            other => Err(format!("invalid slot {other}, expected 1 or 2")),
        }
    }
}

/// Completion state of a match. Only changed through `logic::submit_score`
/// and `logic::reopen_match`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Open,
    Completed,
}

/// A single match slot: up to two players, legs won per side, and (knockout only)
/// the link to the match its winner advances to.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    /// 1-based round number.
    pub round: u32,
    /// Ordering key within the round (creation order).
    pub position: u32,
    pub player_1: Option<PlayerId>,
    /// None for a bye, or for a knockout slot not yet filled.
    pub player_2: Option<PlayerId>,
    pub score_1: u32,
    pub score_2: u32,
    pub status: MatchStatus,
    pub next_match: Option<MatchId>,
    pub next_slot: Option<Slot>,
    /// Knockout playoff for 3rd place, a sibling of the final outside the bracket tree.
    #[serde(default)]
    pub third_place: bool,
}

impl GameMatch {
    pub fn new(
        tournament_id: TournamentId,
        round: u32,
        position: u32,
        player_1: Option<PlayerId>,
        player_2: Option<PlayerId>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            round,
            position,
            player_1,
            player_2,
            score_1: 0,
            score_2: 0,
            status: MatchStatus::Open,
            next_match: None,
            next_slot: None,
            third_place: false,
        }
    }

    /// Empty knockout placeholder (future round, players filled by advancement).
    pub fn placeholder(tournament_id: TournamentId, round: u32, position: u32) -> Self {
        Self::new(tournament_id, round, position, None, None)
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Both participants are real players.
    pub fn has_both_players(&self) -> bool {
        self.player_1.is_some() && self.player_2.is_some()
    }

    pub fn player(&self, slot: Slot) -> Option<PlayerId> {
        match slot {
            Slot::One => self.player_1,
            Slot::Two => self.player_2,
        }
    }

    pub fn set_player(&mut self, slot: Slot, player: Option<PlayerId>) {
        match slot {
            Slot::One => self.player_1 = player,
            Slot::Two => self.player_2 = player,
        }
    }

    pub fn involves(&self, player: PlayerId) -> bool {
        self.player_1 == Some(player) || self.player_2 == Some(player)
    }

    /// Winner and loser of a completed two-player match; None for draws or
    /// matches without a result.
    pub fn winner_and_loser(&self) -> Option<(PlayerId, PlayerId)> {
        if !self.is_completed() {
            return None;
        }
        let (p1, p2) = (self.player_1?, self.player_2?);
        if self.score_1 > self.score_2 {
            Some((p1, p2))
        } else if self.score_2 > self.score_1 {
            Some((p2, p1))
        } else {
            None
        }
    }

    pub(crate) fn clear_result(&mut self) {
        self.status = MatchStatus::Open;
        self.score_1 = 0;
        self.score_2 = 0;
    }
}
