//! Setup: create a tournament from raw input and generate its schedule.

use crate::logic::{build_knockout_bracket, generate_round_robin_schedule, submit_score};
use crate::models::{
    MatchId, Player, PlayerId, Tournament, TournamentError, TournamentFormat, BYE_PLAYER_NAME,
};
use rand::Rng;
use std::collections::HashSet;

/// Trim names, drop empty ones and the reserved bye name, keep the first of exact duplicates.
pub fn normalize_player_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter_map(|name| {
            let trimmed = name.as_ref().trim();
            (!trimmed.is_empty() && trimmed != BYE_PLAYER_NAME).then(|| trimmed.to_string())
        })
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// Player names from a text block, one per line.
pub fn parse_player_list(raw: &str) -> Vec<String> {
    normalize_player_names(raw.lines())
}

/// Both scores present and non-negative. `None` means the entry is not applied.
pub fn validate_scores(score_1: Option<i64>, score_2: Option<i64>) -> Option<(u32, u32)> {
    let score_1 = u32::try_from(score_1?).ok()?;
    let score_2 = u32::try_from(score_2?).ok()?;
    Some((score_1, score_2))
}

/// Raw score entry: the match must exist, then invalid scores are not applied (`Ok(false)`)
/// and valid ones go through `submit_score` (`Ok(true)`).
pub fn enter_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    score_1: Option<i64>,
    score_2: Option<i64>,
) -> Result<bool, TournamentError> {
    if tournament.get_match(match_id).is_none() {
        return Err(TournamentError::MatchNotFound(match_id));
    }
    match validate_scores(score_1, score_2) {
        Some((s1, s2)) => submit_score(tournament, match_id, s1, s2).map(|()| true),
        None => {
            log::debug!("Score entry for match {} not applied", match_id);
            Ok(false)
        }
    }
}

/// Create a tournament with its full schedule. Knockout seeding uses the thread RNG.
pub fn create_tournament<S: AsRef<str>>(
    name: &str,
    format: TournamentFormat,
    player_names: &[S],
) -> Result<Tournament, TournamentError> {
    create_tournament_with_rng(name, format, player_names, &mut rand::thread_rng())
}

/// Create a tournament: at least 2 distinct names, players in input order, then all matches
/// (round robin: every round; knockout: the whole bracket with round 1 seeded by `rng`).
pub fn create_tournament_with_rng<S: AsRef<str>, R: Rng + ?Sized>(
    name: &str,
    format: TournamentFormat,
    player_names: &[S],
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    let names = normalize_player_names(player_names);
    if names.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers);
    }

    let mut tournament = Tournament::new(name, format);
    tournament.players = names
        .into_iter()
        .map(|n| Player::new(n, tournament.id))
        .collect();
    let ids: Vec<PlayerId> = tournament.players.iter().map(|p| p.id).collect();

    tournament.matches = match format {
        TournamentFormat::RoundRobin => generate_round_robin_schedule(tournament.id, &ids),
        TournamentFormat::Knockout => build_knockout_bracket(tournament.id, &ids, rng)?,
    };

    log::info!(
        "Created {:?} tournament '{}' with {} players and {} matches",
        format,
        tournament.name,
        tournament.players.len(),
        tournament.matches.len()
    );
    Ok(tournament)
}
