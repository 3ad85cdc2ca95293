//! Data structures for the dart tournament: players, matches, tournament.

mod game;
mod player;
mod tournament;

pub use game::{GameMatch, MatchId, MatchStatus, Slot};
pub use player::{Player, PlayerId, PlayerStats, BYE_PLAYER_NAME};
pub use tournament::{Tournament, TournamentError, TournamentFormat, TournamentId};
