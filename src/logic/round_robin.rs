//! Round robin: every player meets every other player exactly once (circle method).

use crate::models::{GameMatch, MatchStatus, PlayerId, TournamentId};

/// Generate the complete round robin schedule for `players` (in the given order).
///
/// 1. Odd player count: add an empty seat, so every round has exactly one bye.
/// 2. `n - 1` rounds over `n` seats; in each round seat `i` plays seat `n - 1 - i`.
/// 3. A pairing with the empty seat becomes a single-sided bye match, created completed.
/// 4. After each round seat 0 stays fixed and the remaining seats rotate right by one.
///
/// Matches come back round-major, in creation order within each round.
pub fn generate_round_robin_schedule(
    tournament_id: TournamentId,
    players: &[PlayerId],
) -> Vec<GameMatch> {
    let mut seats: Vec<Option<PlayerId>> = players.iter().copied().map(Some).collect();
    if seats.len() % 2 != 0 {
        seats.push(None);
    }
    let n = seats.len();
    if n < 2 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..n).collect();
    let mut schedule = Vec::with_capacity((n / 2) * (n - 1));

    for round in 1..n as u32 {
        let mut position = 0;
        for i in 0..n / 2 {
            let home = seats[order[i]];
            let away = seats[order[n - 1 - i]];
            let m = match (home, away) {
                (Some(p1), Some(p2)) => {
                    GameMatch::new(tournament_id, round, position, Some(p1), Some(p2))
                }
                (Some(p), None) | (None, Some(p)) => {
                    let mut bye = GameMatch::new(tournament_id, round, position, Some(p), None);
                    bye.status = MatchStatus::Completed;
                    bye
                }
                // Only one empty seat exists, so it never meets itself.
                (None, None) => continue,
            };
            schedule.push(m);
            position += 1;
        }
        order[1..].rotate_right(1);
    }

    log::debug!(
        "Generated round robin schedule: {} players, {} rounds, {} matches",
        players.len(),
        n - 1,
        schedule.len()
    );
    schedule
}
