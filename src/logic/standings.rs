//! Standings: points table with mini-league tie-break (round robin), bracket placement (knockout).

use crate::models::{GameMatch, PlayerId, PlayerStats, Tournament, TournamentFormat};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// One row of the ranking.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    /// 1-based position in the ranking.
    pub rank: u32,
    pub player_id: PlayerId,
    pub name: String,
    /// Knockout only: 1-4 for players placed by the final and the third-place match.
    pub placement: Option<u32>,
    #[serde(flatten)]
    pub stats: PlayerStats,
}

/// Aggregate counters for `players` from completed matches whose two participants are both
/// in `players`. Byes and half-filled matches never count.
pub fn tally<'a, I>(matches: I, players: &[PlayerId]) -> HashMap<PlayerId, PlayerStats>
where
    I: IntoIterator<Item = &'a GameMatch>,
{
    let mut stats: HashMap<PlayerId, PlayerStats> =
        players.iter().map(|&p| (p, PlayerStats::default())).collect();
    for m in matches {
        if !m.is_completed() {
            continue;
        }
        let (Some(p1), Some(p2)) = (m.player_1, m.player_2) else {
            continue;
        };
        if !(stats.contains_key(&p1) && stats.contains_key(&p2)) {
            continue;
        }
        if let Some(s) = stats.get_mut(&p1) {
            s.record(m.score_1, m.score_2);
        }
        if let Some(s) = stats.get_mut(&p2) {
            s.record(m.score_2, m.score_1);
        }
    }
    stats
}

/// Rank every real player of the tournament. Computed from the current match set only,
/// so the same matches always give the same ranking.
pub fn compute_standings(tournament: &Tournament) -> Vec<Standing> {
    let players: Vec<PlayerId> = tournament.players.iter().map(|p| p.id).collect();
    let stats = tally(&tournament.matches, &players);

    let ranked: Vec<(PlayerId, Option<u32>)> = match tournament.format {
        TournamentFormat::RoundRobin => rank_round_robin(&tournament.matches, &players, &stats)
            .into_iter()
            .map(|p| (p, None))
            .collect(),
        TournamentFormat::Knockout => rank_knockout(tournament, &players, &stats),
    };

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (player_id, placement))| Standing {
            rank: i as u32 + 1,
            player_id,
            name: tournament.player_name(player_id).unwrap_or_default().to_string(),
            placement,
            stats: stats.get(&player_id).copied().unwrap_or_default(),
        })
        .collect()
}

/// Sort by points, then leg difference. Each run of equal points is re-sorted by a
/// mini-league over the matches played inside that group.
fn rank_round_robin(
    matches: &[GameMatch],
    players: &[PlayerId],
    stats: &HashMap<PlayerId, PlayerStats>,
) -> Vec<PlayerId> {
    let overall = |p: &PlayerId| stats.get(p).copied().unwrap_or_default();

    let mut ordered = players.to_vec();
    ordered.sort_by(|a, b| {
        let (sa, sb) = (overall(a), overall(b));
        sb.points
            .cmp(&sa.points)
            .then_with(|| sb.leg_difference().cmp(&sa.leg_difference()))
    });

    let mut ranking = Vec::with_capacity(ordered.len());
    let mut start = 0;
    while start < ordered.len() {
        let points = overall(&ordered[start]).points;
        let end = ordered[start..]
            .iter()
            .position(|p| overall(p).points != points)
            .map_or(ordered.len(), |offset| start + offset);

        let mut group = ordered[start..end].to_vec();
        if group.len() > 1 {
            let mini = tally(matches, &group);
            log::debug!("Resolving {}-way tie on {} points", group.len(), points);
            group.sort_by(|a, b| tie_break(&mini, &overall(a), &overall(b), a, b));
        }
        ranking.extend(group);
        start = end;
    }
    ranking
}

/// Mini-league points, mini-league leg difference, overall leg difference, overall legs won.
/// Residual ties keep their order (the sort is stable).
fn tie_break(
    mini: &HashMap<PlayerId, PlayerStats>,
    overall_a: &PlayerStats,
    overall_b: &PlayerStats,
    a: &PlayerId,
    b: &PlayerId,
) -> Ordering {
    let mini_a = mini.get(a).copied().unwrap_or_default();
    let mini_b = mini.get(b).copied().unwrap_or_default();
    mini_b
        .points
        .cmp(&mini_a.points)
        .then_with(|| mini_b.leg_difference().cmp(&mini_a.leg_difference()))
        .then_with(|| overall_b.leg_difference().cmp(&overall_a.leg_difference()))
        .then_with(|| overall_b.legs_won.cmp(&overall_a.legs_won))
}

/// Final winner/loser take 1st/2nd, third-place winner/loser 3rd/4th, everyone else follows
/// by number of wins. While the final is still open, its participants stay ahead of a decided
/// third-place pair.
fn rank_knockout(
    tournament: &Tournament,
    players: &[PlayerId],
    stats: &HashMap<PlayerId, PlayerStats>,
) -> Vec<(PlayerId, Option<u32>)> {
    let by_wins = |p: &PlayerId| std::cmp::Reverse(stats.get(p).map_or(0, |s| s.wins));
    let final_match = tournament.final_match();
    let third_place = tournament.third_place_match();

    let mut placed: Vec<(PlayerId, Option<u32>)> = Vec::new();
    match final_match.and_then(GameMatch::winner_and_loser) {
        Some((winner, loser)) => {
            placed.push((winner, Some(1)));
            placed.push((loser, Some(2)));
        }
        None if third_place.map_or(false, GameMatch::is_completed) => {
            let mut finalists: Vec<PlayerId> = final_match
                .into_iter()
                .flat_map(|m| [m.player_1, m.player_2])
                .flatten()
                .collect();
            finalists.sort_by_key(by_wins);
            placed.extend(finalists.into_iter().map(|p| (p, None)));
        }
        None => {}
    }
    if let Some((winner, loser)) = third_place.and_then(GameMatch::winner_and_loser) {
        placed.push((winner, Some(3)));
        placed.push((loser, Some(4)));
    }

    let mut rest: Vec<PlayerId> = players
        .iter()
        .copied()
        .filter(|p| !placed.iter().any(|(q, _)| q == p))
        .collect();
    rest.sort_by_key(by_wins);

    placed.extend(rest.into_iter().map(|p| (p, None)));
    placed
}

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: u32,
    name: &'a str,
    points: u32,
    wins: u32,
    losses: u32,
    draws: u32,
    legs_won: u32,
    legs_lost: u32,
}

/// Standings as CSV with a header row.
pub fn standings_to_csv(standings: &[Standing]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for s in standings {
        writer.serialize(CsvRow {
            rank: s.rank,
            name: &s.name,
            points: s.stats.points,
            wins: s.stats.wins,
            losses: s.stats.losses,
            draws: s.stats.draws,
            legs_won: s.stats.legs_won,
            legs_lost: s.stats.legs_lost,
        })?;
    }
    let bytes = writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
