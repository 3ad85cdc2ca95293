//! Tournament, TournamentFormat and TournamentError.

use crate::models::game::{GameMatch, MatchId};
use crate::models::player::{Player, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Fewer than 2 distinct player names.
    NotEnoughPlayers,
    /// Format selector is neither `round_robin` nor `knockout`.
    UnknownFormat(String),
    TournamentNotFound(TournamentId),
    MatchNotFound(MatchId),
    /// Knockout match entered as a draw between two players.
    InvalidResult,
    /// Knockout match still waiting for a participant from an earlier round.
    MatchNotReady,
    /// Tournament or match is not in a state that allows this action.
    InvalidState,
    /// Not all matches have a result.
    IncompleteResults,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::NotEnoughPlayers => write!(f, "Need at least 2 distinct players"),
            TournamentError::UnknownFormat(s) => {
                write!(f, "Unknown tournament format '{}' (expected round_robin or knockout)", s)
            }
            TournamentError::TournamentNotFound(_) => write!(f, "Tournament not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::InvalidResult => write!(f, "Knockout matches cannot end in a draw"),
            TournamentError::MatchNotReady => write!(f, "Match is still waiting for its players"),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::IncompleteResults => write!(f, "Not all matches have a result"),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// How the schedule is generated and players are ranked.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    /// Everyone plays everyone once; ranked by points with mini-league tie-break.
    #[default]
    RoundRobin,
    /// Single elimination bracket; ranked by bracket position.
    Knockout,
}

impl FromStr for TournamentFormat {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round_robin" => Ok(TournamentFormat::RoundRobin),
            "knockout" => Ok(TournamentFormat::Knockout),
            other => Err(TournamentError::UnknownFormat(other.to_string())),
        }
    }
}

/// Full tournament state: players and every match of the schedule.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub format: TournamentFormat,
    /// Set once every match has a result. Terminal marker only.
    pub finished: bool,
    /// Real players in registration order.
    pub players: Vec<Player>,
    /// All matches, round-major in creation order.
    pub matches: Vec<GameMatch>,
}

impl Tournament {
    /// Create an empty tournament. A blank name falls back to one derived from today's date.
    pub fn new(name: impl Into<String>, format: TournamentFormat) -> Self {
        let created_at = Utc::now();
        let name = name.into();
        let name = match name.trim() {
            "" => Self::default_name(created_at),
            trimmed => trimmed.to_string(),
        };
        Self {
            id: Uuid::new_v4(),
            name,
            created_at,
            format,
            finished: false,
            players: Vec::new(),
            matches: Vec::new(),
        }
    }

    pub fn default_name(created_at: DateTime<Utc>) -> String {
        format!("Tournament of {}", created_at.format("%d.%m.%Y"))
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.get_player(id).map(|p| p.name.as_str())
    }

    pub fn get_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// Index of a match in `matches`, or `MatchNotFound`.
    pub(crate) fn match_index(&self, id: MatchId) -> Result<usize, TournamentError> {
        self.matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    /// A single-sided match that needs no result: any round-robin match without
    /// a second player, or a round-1 knockout slot without an opponent.
    pub fn is_bye(&self, m: &GameMatch) -> bool {
        if m.player_1.is_none() || m.player_2.is_some() {
            return false;
        }
        match self.format {
            TournamentFormat::RoundRobin => true,
            TournamentFormat::Knockout => m.round == 1 && !m.third_place,
        }
    }

    /// Number of rounds in the schedule.
    pub fn total_rounds(&self) -> u32 {
        self.matches.iter().map(|m| m.round).max().unwrap_or(0)
    }

    /// Knockout final: the last-round match not flagged as third place.
    pub fn final_match(&self) -> Option<&GameMatch> {
        if self.format != TournamentFormat::Knockout {
            return None;
        }
        let last = self.total_rounds();
        self.matches
            .iter()
            .find(|m| m.round == last && !m.third_place)
    }

    pub fn third_place_match(&self) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.third_place)
    }

    /// True once matches exist and every non-bye match is completed. Gates `finish`.
    pub fn all_matches_completed(&self) -> bool {
        !self.matches.is_empty()
            && self
                .matches
                .iter()
                .filter(|m| !self.is_bye(m))
                .all(GameMatch::is_completed)
    }

    /// Matches to display, grouped by round and ordered by position. Byes are left out.
    pub fn matches_by_round(&self) -> BTreeMap<u32, Vec<&GameMatch>> {
        let mut rounds: BTreeMap<u32, Vec<&GameMatch>> = BTreeMap::new();
        for m in self.matches.iter().filter(|m| !self.is_bye(m)) {
            rounds.entry(m.round).or_default().push(m);
        }
        for matches in rounds.values_mut() {
            matches.sort_by_key(|m| m.position);
        }
        rounds
    }

    /// Names of the real players, in registration order.
    pub fn known_player_names(&self) -> Vec<&str> {
        self.players.iter().map(|p| p.name.as_str()).collect()
    }

    /// Mark the tournament finished (only when every match has a result).
    pub fn finish(&mut self) -> Result<(), TournamentError> {
        if !self.all_matches_completed() {
            return Err(TournamentError::IncompleteResults);
        }
        self.finished = true;
        Ok(())
    }
}
