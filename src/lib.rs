//! Dart tournament engine: round robin and knockout scheduling, result entry, standings.

pub mod logic;
pub mod models;

pub use logic::{
    build_knockout_bracket, compute_standings, create_tournament, create_tournament_with_rng,
    enter_score, generate_round_robin_schedule, normalize_player_names, parse_player_list,
    reopen_match, seed_knockout_bracket, standings_to_csv, submit_score, tally, validate_scores,
    Standing,
};
pub use models::{
    GameMatch, MatchId, MatchStatus, Player, PlayerId, PlayerStats, Slot, Tournament,
    TournamentError, TournamentFormat, TournamentId, BYE_PLAYER_NAME,
};
