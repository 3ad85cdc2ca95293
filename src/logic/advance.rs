//! Result entry and reopening: the two transitions of a match (open <-> completed).
//!
//! In knockout tournaments completing a match writes its winner into the linked next match,
//! and reopening undoes that transitively through every later round it reached.

use crate::models::{GameMatch, MatchId, MatchStatus, Tournament, TournamentError, TournamentFormat};

/// Enter the legs won by player 1 and player 2 and complete the match.
///
/// Byes cannot take a score. Knockout matches must have both players and a winner; entering a
/// different winner for an already completed knockout match first reopens everything it fed.
/// Nothing is changed when an error is returned.
pub fn submit_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    score_1: u32,
    score_2: u32,
) -> Result<(), TournamentError> {
    let idx = tournament.match_index(match_id)?;
    let m = &tournament.matches[idx];
    if tournament.is_bye(m) {
        return Err(TournamentError::InvalidState);
    }
    let (Some(p1), Some(p2)) = (m.player_1, m.player_2) else {
        return Err(TournamentError::MatchNotReady);
    };

    if tournament.format == TournamentFormat::RoundRobin {
        let m = &mut tournament.matches[idx];
        m.score_1 = score_1;
        m.score_2 = score_2;
        m.status = MatchStatus::Completed;
        return Ok(());
    }

    if score_1 == score_2 {
        log::warn!("Rejected draw {}-{} for knockout match {}", score_1, score_2, match_id);
        return Err(TournamentError::InvalidResult);
    }
    let winner = if score_1 > score_2 { p1 } else { p2 };

    if m.is_completed() {
        let previous_winner = m.winner_and_loser().map(|(w, _)| w);
        if previous_winner == Some(winner) {
            let m = &mut tournament.matches[idx];
            m.score_1 = score_1;
            m.score_2 = score_2;
            return Ok(());
        }
        reopen_cascade(&mut tournament.matches, idx)?;
    }

    let m = &mut tournament.matches[idx];
    m.score_1 = score_1;
    m.score_2 = score_2;
    m.status = MatchStatus::Completed;
    propagate_winner(&mut tournament.matches, idx)
}

/// Reopen a completed match: scores go back to 0 and, in knockout, every match that received
/// a player through it loses that player and is reopened in turn. Reopening an open match is a no-op.
pub fn reopen_match(tournament: &mut Tournament, match_id: MatchId) -> Result<(), TournamentError> {
    let idx = tournament.match_index(match_id)?;
    let m = &tournament.matches[idx];
    if tournament.is_bye(m) {
        return Err(TournamentError::InvalidState);
    }
    if !m.is_completed() {
        return Ok(());
    }
    match tournament.format {
        TournamentFormat::RoundRobin => {
            tournament.matches[idx].clear_result();
            Ok(())
        }
        TournamentFormat::Knockout => {
            let reopened = reopen_cascade(&mut tournament.matches, idx)?;
            log::debug!("Reopened match {} ({} matches reset)", match_id, reopened);
            Ok(())
        }
    }
}

fn index_of(matches: &[GameMatch], id: MatchId) -> Result<usize, TournamentError> {
    matches
        .iter()
        .position(|m| m.id == id)
        .ok_or(TournamentError::MatchNotFound(id))
}

/// The final is the tree root: no outgoing link and not the third-place playoff.
fn is_final(m: &GameMatch) -> bool {
    m.next_match.is_none() && !m.third_place
}

/// Write the winner of the completed match at `idx` into its next match. A semifinal also
/// sends its loser to the third-place match, on the same side it fed the final.
pub(crate) fn propagate_winner(
    matches: &mut [GameMatch],
    idx: usize,
) -> Result<(), TournamentError> {
    let m = &matches[idx];
    let (winner, loser) = match (m.player_1, m.player_2) {
        (Some(p1), Some(p2)) if m.score_1 > m.score_2 => (p1, Some(p2)),
        (Some(p1), Some(p2)) if m.score_2 > m.score_1 => (p2, Some(p1)),
        (Some(_), Some(_)) => return Err(TournamentError::InvalidResult),
        (Some(p), None) | (None, Some(p)) => (p, None),
        (None, None) => return Err(TournamentError::MatchNotReady),
    };
    let (Some(next_id), Some(slot)) = (m.next_match, m.next_slot) else {
        return Ok(());
    };

    let next_idx = index_of(matches, next_id)?;
    matches[next_idx].set_player(slot, Some(winner));

    if is_final(&matches[next_idx]) {
        if let (Some(loser), Some(third)) = (loser, matches.iter_mut().find(|m| m.third_place)) {
            third.set_player(slot, Some(loser));
        }
    }
    Ok(())
}

/// Reopen the match at `idx` and walk forward: clear the slot each reopened match filled and
/// reopen the receiving match too if it was completed. Stops where state is already consistent.
/// Returns the number of matches reopened.
pub(crate) fn reopen_cascade(
    matches: &mut [GameMatch],
    idx: usize,
) -> Result<usize, TournamentError> {
    let mut pending = vec![idx];
    let mut reopened = 0;

    while let Some(current) = pending.pop() {
        matches[current].clear_result();
        reopened += 1;

        let (Some(next_id), Some(slot)) = (matches[current].next_match, matches[current].next_slot)
        else {
            continue;
        };
        let next_idx = index_of(matches, next_id)?;
        matches[next_idx].set_player(slot, None);
        if matches[next_idx].is_completed() {
            pending.push(next_idx);
        }

        if is_final(&matches[next_idx]) {
            if let Some(third_idx) = matches.iter().position(|m| m.third_place) {
                matches[third_idx].set_player(slot, None);
                if matches[third_idx].is_completed() {
                    pending.push(third_idx);
                }
            }
        }
    }

    Ok(reopened)
}
