//! Tournament business logic: setup, scheduling, result entry, standings.

mod advance;
mod knockout;
mod round_robin;
mod setup;
mod standings;

pub use advance::{reopen_match, submit_score};
pub use knockout::{build_knockout_bracket, seed_knockout_bracket};
pub use round_robin::generate_round_robin_schedule;
pub use setup::{
    create_tournament, create_tournament_with_rng, enter_score, normalize_player_names,
    parse_player_list, validate_scores,
};
pub use standings::{compute_standings, standings_to_csv, tally, Standing};
