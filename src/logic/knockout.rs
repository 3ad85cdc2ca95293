//! Knockout: single-elimination bracket sized to the next power of two, with byes in round 1.

use crate::logic::advance::propagate_winner;
use crate::models::{GameMatch, MatchStatus, PlayerId, Slot, TournamentError, TournamentId};
use rand::seq::SliceRandom;
use rand::Rng;

/// Shuffle `players` with `rng`, then build the bracket with [`seed_knockout_bracket`].
pub fn build_knockout_bracket<R: Rng + ?Sized>(
    tournament_id: TournamentId,
    players: &[PlayerId],
    rng: &mut R,
) -> Result<Vec<GameMatch>, TournamentError> {
    let mut seeded = players.to_vec();
    seeded.shuffle(rng);
    seed_knockout_bracket(tournament_id, &seeded)
}

/// Build the bracket using `players` in the given seed order.
///
/// 1. `bracket_size` is the smallest power of two >= player count; one round per halving.
/// 2. Round `r` gets `bracket_size / 2^r` empty placeholders.
/// 3. Placeholder `i` of round `r` feeds placeholder `i / 2` of round `r + 1`, slot 1 if `i` is even.
/// 4. With at least two rounds and four players, a third-place match sits next to the final.
/// 5. Round 1: the first matches get two players each, the last `bracket_size - n` get one
///    player (a bye), are completed at once, and advance their player.
pub fn seed_knockout_bracket(
    tournament_id: TournamentId,
    players: &[PlayerId],
) -> Result<Vec<GameMatch>, TournamentError> {
    if players.len() < 2 {
        return Err(TournamentError::NotEnoughPlayers);
    }

    let bracket_size = players.len().next_power_of_two();
    let total_rounds = bracket_size.trailing_zeros();

    // rounds[r - 1] holds the indices (into `matches`) of round r's placeholders.
    let mut matches: Vec<GameMatch> = Vec::with_capacity(bracket_size);
    let mut rounds: Vec<Vec<usize>> = Vec::with_capacity(total_rounds as usize);
    for round in 1..=total_rounds {
        let count = bracket_size >> round;
        let mut indices = Vec::with_capacity(count);
        for position in 0..count {
            indices.push(matches.len());
            matches.push(GameMatch::placeholder(tournament_id, round, position as u32));
        }
        rounds.push(indices);
    }

    for pair in rounds.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);
        for (i, &idx) in current.iter().enumerate() {
            let next_id = matches[next[i / 2]].id;
            matches[idx].next_match = Some(next_id);
            matches[idx].next_slot = Some(Slot::for_index(i));
        }
    }

    if total_rounds >= 2 && players.len() >= 4 {
        let mut third = GameMatch::placeholder(tournament_id, total_rounds, 1);
        third.third_place = true;
        matches.push(third);
    }

    let first_round = &rounds[0];
    let n_byes = bracket_size - players.len();
    let full_matches = first_round.len() - n_byes;
    let mut seeds = players.iter().copied();
    let mut byes = Vec::with_capacity(n_byes);
    for (i, &idx) in first_round.iter().enumerate() {
        let m = &mut matches[idx];
        m.player_1 = seeds.next();
        if i < full_matches {
            m.player_2 = seeds.next();
        } else {
            m.status = MatchStatus::Completed;
            byes.push(idx);
        }
    }

    for idx in byes {
        propagate_winner(&mut matches, idx)?;
    }

    log::debug!(
        "Built knockout bracket: {} players, bracket size {}, {} rounds, {} byes",
        players.len(),
        bracket_size,
        total_rounds,
        n_byes
    );
    Ok(matches)
}
