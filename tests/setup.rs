//! Integration tests for tournament creation, input normalization and finishing.

use dart_tournament_engine::{
    compute_standings, create_tournament, create_tournament_with_rng, enter_score,
    normalize_player_names, parse_player_list, reopen_match, submit_score, validate_scores,
    MatchStatus, Tournament, TournamentError, TournamentFormat, BYE_PLAYER_NAME,
};
use uuid::Uuid;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn names_are_trimmed_and_deduplicated() {
    let names = normalize_player_names(["  Anna ", "", "Ben", "Anna", "ben", "   ", BYE_PLAYER_NAME]);
    assert_eq!(names, vec!["Anna", "Ben", "ben"]);
}

#[test]
fn player_list_is_one_name_per_line() {
    let names = parse_player_list("Anna\n Ben \r\n\nAnna\nCarl");
    assert_eq!(names, vec!["Anna", "Ben", "Carl"]);
}

#[test]
fn fewer_than_two_distinct_players_is_rejected() {
    let result = create_tournament("Solo", TournamentFormat::RoundRobin, &["Anna", " Anna "]);
    assert!(matches!(result, Err(TournamentError::NotEnoughPlayers)));
    let result = create_tournament::<&str>("Empty", TournamentFormat::Knockout, &[]);
    assert!(matches!(result, Err(TournamentError::NotEnoughPlayers)));
}

#[test]
fn format_selector_is_exact() {
    assert_eq!("round_robin".parse::<TournamentFormat>(), Ok(TournamentFormat::RoundRobin));
    assert_eq!("knockout".parse::<TournamentFormat>(), Ok(TournamentFormat::Knockout));
    assert_eq!(
        "Knockout".parse::<TournamentFormat>(),
        Err(TournamentError::UnknownFormat("Knockout".to_string()))
    );
}

#[test]
fn scores_must_be_present_and_non_negative() {
    assert_eq!(validate_scores(Some(3), Some(0)), Some((3, 0)));
    assert_eq!(validate_scores(None, Some(2)), None);
    assert_eq!(validate_scores(Some(3), None), None);
    assert_eq!(validate_scores(Some(-1), Some(2)), None);
}

#[test]
fn round_robin_creation_builds_full_schedule() {
    let t = create_tournament("", TournamentFormat::RoundRobin, &["A", "B", "C", "D"]).unwrap();
    assert!(t.name.starts_with("Tournament of "));
    assert_eq!(t.players.len(), 4);
    assert_eq!(t.matches.len(), 6);
    assert!(t.players.iter().all(|p| p.tournament_id == t.id));
    assert!(t.matches.iter().all(|m| m.tournament_id == t.id));
    assert_eq!(t.known_player_names(), vec!["A", "B", "C", "D"]);
}

#[test]
fn knockout_creation_uses_the_given_rng() {
    let names = ["A", "B", "C", "D", "E"];
    let mut rng = StdRng::seed_from_u64(7);
    let t = create_tournament_with_rng("Cup", TournamentFormat::Knockout, &names, &mut rng).unwrap();
    assert_eq!(t.players.len(), 5);
    // 4 + 2 + 1 + third place
    assert_eq!(t.matches.len(), 8);
    let byes = t.matches.iter().filter(|m| t.is_bye(m)).count();
    assert_eq!(byes, 3);
    assert!(t.matches.iter().filter(|m| t.is_bye(m)).all(|m| m.is_completed()));
}

#[test]
fn odd_round_robin_hides_byes_from_display() {
    let t = create_tournament("League", TournamentFormat::RoundRobin, &["A", "B", "C"]).unwrap();
    assert_eq!(t.matches.len(), 3 * 2);
    let shown: usize = t.matches_by_round().values().map(Vec::len).sum();
    assert_eq!(shown, 3);
    assert_eq!(t.matches_by_round().len(), 3);
}

fn finish_all(t: &mut Tournament) {
    let open: Vec<_> = t
        .matches
        .iter()
        .filter(|m| !t.is_bye(m) && !m.is_completed())
        .map(|m| m.id)
        .collect();
    for id in open {
        submit_score(t, id, 3, 1).unwrap();
    }
}

#[test]
fn finish_requires_every_result() {
    let mut t = create_tournament("League", TournamentFormat::RoundRobin, &["A", "B", "C"]).unwrap();
    assert!(!t.all_matches_completed());
    assert_eq!(t.finish(), Err(TournamentError::IncompleteResults));
    assert!(!t.finished);

    finish_all(&mut t);
    assert!(t.all_matches_completed());
    t.finish().unwrap();
    assert!(t.finished);
}

#[test]
fn score_entry_for_unknown_match_is_not_found_even_when_invalid() {
    let mut t = create_tournament("League", TournamentFormat::RoundRobin, &["A", "B"]).unwrap();
    let missing = Uuid::new_v4();
    assert_eq!(
        enter_score(&mut t, missing, None, Some(2)),
        Err(TournamentError::MatchNotFound(missing))
    );
    assert_eq!(
        enter_score(&mut t, missing, Some(3), Some(1)),
        Err(TournamentError::MatchNotFound(missing))
    );
}

#[test]
fn invalid_score_entry_is_not_applied() {
    let mut t = create_tournament("League", TournamentFormat::RoundRobin, &["A", "B"]).unwrap();
    let id = t.matches[0].id;
    assert_eq!(enter_score(&mut t, id, Some(-1), Some(2)), Ok(false));
    assert_eq!(enter_score(&mut t, id, Some(3), None), Ok(false));
    assert_eq!(t.matches[0].status, MatchStatus::Open);

    assert_eq!(enter_score(&mut t, id, Some(3), Some(2)), Ok(true));
    assert!(t.matches[0].is_completed());
    assert_eq!((t.matches[0].score_1, t.matches[0].score_2), (3, 2));
}

#[test]
fn reopened_round_robin_match_is_cleared_and_drops_out_of_standings() {
    let mut t = create_tournament("League", TournamentFormat::RoundRobin, &["A", "B"]).unwrap();
    let id = t.matches[0].id;
    submit_score(&mut t, id, 3, 1).unwrap();
    assert_eq!(compute_standings(&t)[0].stats.points, 2);

    reopen_match(&mut t, id).unwrap();
    let m = t.get_match(id).unwrap();
    assert_eq!(m.status, MatchStatus::Open);
    assert_eq!((m.score_1, m.score_2), (0, 0));
    assert!(compute_standings(&t).iter().all(|s| s.stats == Default::default()));
}

#[test]
fn round_robin_bye_rejects_score_and_reopen() {
    let mut t = create_tournament("League", TournamentFormat::RoundRobin, &["A", "B", "C"]).unwrap();
    let bye = t.matches.iter().find(|m| t.is_bye(m)).unwrap().id;
    assert!(t.get_match(bye).unwrap().player_2.is_none());

    assert_eq!(submit_score(&mut t, bye, 3, 0), Err(TournamentError::InvalidState));
    assert_eq!(reopen_match(&mut t, bye), Err(TournamentError::InvalidState));
    assert!(t.get_match(bye).unwrap().is_completed());
}
