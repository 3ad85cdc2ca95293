//! Integration tests for standings: points, mini-league tie-break and knockout placement.

use dart_tournament_engine::{
    compute_standings, create_tournament, seed_knockout_bracket, standings_to_csv, submit_score,
    Player, PlayerId, Tournament, TournamentFormat,
};

fn round_robin(names: &[&str]) -> Tournament {
    create_tournament("League", TournamentFormat::RoundRobin, names).unwrap()
}

fn id_of(t: &Tournament, name: &str) -> PlayerId {
    t.players.iter().find(|p| p.name == name).unwrap().id
}

/// Enter `home_legs`-`away_legs` for the match between `home` and `away`, whichever side each is on.
fn play(t: &mut Tournament, home: &str, away: &str, home_legs: u32, away_legs: u32) {
    let (h, a) = (id_of(t, home), id_of(t, away));
    let m = t
        .matches
        .iter()
        .find(|m| m.involves(h) && m.involves(a))
        .unwrap();
    let (id, scores) = if m.player_1 == Some(h) {
        (m.id, (home_legs, away_legs))
    } else {
        (m.id, (away_legs, home_legs))
    };
    submit_score(t, id, scores.0, scores.1).unwrap();
}

fn names(t: &Tournament) -> Vec<String> {
    compute_standings(t).into_iter().map(|s| s.name).collect()
}

#[test]
fn head_to_head_decides_a_points_tie() {
    let mut t = round_robin(&["A", "B", "C", "D"]);
    play(&mut t, "A", "B", 3, 1);
    play(&mut t, "A", "C", 0, 3);
    play(&mut t, "A", "D", 3, 2);
    play(&mut t, "B", "C", 3, 0);
    play(&mut t, "B", "D", 3, 0);
    play(&mut t, "D", "C", 3, 0);

    let standings = compute_standings(&t);
    let a = &standings[0];
    let b = &standings[1];
    assert_eq!((a.name.as_str(), a.stats.points), ("A", 4));
    assert_eq!((b.name.as_str(), b.stats.points), ("B", 4));
    // B has the better overall leg difference, A won the meeting.
    assert!(b.stats.leg_difference() > a.stats.leg_difference());

    assert_eq!(names(&t), vec!["A", "B", "D", "C"]);
    let ranks: Vec<u32> = standings.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[test]
fn counters_follow_points_and_legs() {
    let mut t = round_robin(&["A", "B"]);
    play(&mut t, "A", "B", 3, 2);
    let standings = compute_standings(&t);
    let a = standings[0].stats;
    let b = standings[1].stats;
    assert_eq!((a.points, a.wins, a.losses, a.legs_won, a.legs_lost), (2, 1, 0, 3, 2));
    assert_eq!((b.points, b.wins, b.losses, b.legs_won, b.legs_lost), (0, 0, 1, 2, 3));
}

#[test]
fn draws_give_one_point_each() {
    let mut t = round_robin(&["A", "B"]);
    play(&mut t, "A", "B", 2, 2);
    for s in compute_standings(&t) {
        assert_eq!((s.stats.points, s.stats.draws, s.stats.wins), (1, 1, 0));
    }
}

#[test]
fn byes_and_open_matches_do_not_count() {
    let t = round_robin(&["A", "B", "C"]);
    let standings = compute_standings(&t);
    assert_eq!(standings.len(), 3);
    assert!(standings.iter().all(|s| s.stats == Default::default()));
    // Nobody played: input order is kept.
    assert_eq!(names(&t), vec!["A", "B", "C"]);
}

#[test]
fn circular_tie_keeps_registration_order() {
    let mut t = round_robin(&["A", "B", "C"]);
    play(&mut t, "A", "B", 3, 0);
    play(&mut t, "B", "C", 3, 0);
    play(&mut t, "C", "A", 3, 0);
    assert_eq!(names(&t), vec!["A", "B", "C"]);
}

#[test]
fn mini_league_uses_only_matches_inside_the_group() {
    // A, B, C finish on 4 points; D on 0.
    let mut t = round_robin(&["A", "B", "C", "D"]);
    play(&mut t, "A", "B", 3, 0);
    play(&mut t, "B", "C", 3, 2);
    play(&mut t, "C", "A", 3, 2);
    play(&mut t, "A", "D", 3, 2);
    play(&mut t, "B", "D", 3, 2);
    play(&mut t, "C", "D", 3, 0);

    // Mini-league: all 2 points; leg differences A +2, B -2, C 0.
    assert_eq!(names(&t), vec!["A", "C", "B", "D"]);
}

#[test]
fn standings_are_deterministic() {
    let mut t = round_robin(&["A", "B", "C", "D", "E"]);
    play(&mut t, "A", "B", 3, 1);
    play(&mut t, "C", "D", 3, 3);
    play(&mut t, "E", "A", 3, 2);
    assert_eq!(compute_standings(&t), compute_standings(&t));
}

fn knockout(names: &[&str]) -> Tournament {
    let mut t = Tournament::new("Cup", TournamentFormat::Knockout);
    t.players = names.iter().map(|n| Player::new(*n, t.id)).collect();
    let ids: Vec<PlayerId> = t.players.iter().map(|p| p.id).collect();
    t.matches = seed_knockout_bracket(t.id, &ids).unwrap();
    t
}

#[test]
fn knockout_ranks_by_final_and_third_place() {
    let mut t = knockout(&["W", "X", "Y", "Z", "E", "F", "G", "H"]);
    // Quarterfinals: W, Y, E, G win.
    play(&mut t, "W", "X", 3, 0);
    play(&mut t, "Y", "Z", 3, 1);
    play(&mut t, "E", "F", 3, 2);
    play(&mut t, "G", "H", 3, 0);
    // Semifinals: Y beats W, E beats G.
    play(&mut t, "Y", "W", 3, 2);
    play(&mut t, "E", "G", 3, 1);
    // Final: E beats Y. Third place: G beats W.
    play(&mut t, "E", "Y", 3, 0);
    play(&mut t, "G", "W", 3, 0);
    assert!(t.all_matches_completed());

    let standings = compute_standings(&t);
    let top: Vec<(&str, Option<u32>)> = standings
        .iter()
        .take(4)
        .map(|s| (s.name.as_str(), s.placement))
        .collect();
    assert_eq!(top, vec![("E", Some(1)), ("Y", Some(2)), ("G", Some(3)), ("W", Some(4))]);

    // Quarterfinal losers: no wins, registration order.
    assert_eq!(names(&t)[4..], ["X", "Z", "F", "H"]);
    assert!(standings[4..].iter().all(|s| s.placement.is_none()));
}

#[test]
fn unfinished_knockout_ranks_by_wins() {
    let mut t = knockout(&["A", "B", "C", "D"]);
    play(&mut t, "C", "D", 3, 0);
    assert_eq!(names(&t), vec!["C", "A", "B", "D"]);
    assert!(compute_standings(&t).iter().all(|s| s.placement.is_none()));
}

#[test]
fn third_place_decided_before_the_final() {
    let mut t = knockout(&["A", "B", "C", "D"]);
    play(&mut t, "A", "B", 3, 0);
    play(&mut t, "C", "D", 3, 0);
    // Third place played, final A vs C still open.
    play(&mut t, "B", "D", 3, 1);

    let standings = compute_standings(&t);
    assert_eq!(names(&t), vec!["A", "C", "B", "D"]);
    let placements: Vec<Option<u32>> = standings.iter().map(|s| s.placement).collect();
    assert_eq!(placements, vec![None, None, Some(3), Some(4)]);
    let ranks: Vec<u32> = standings.iter().map(|s| s.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4]);
}

#[test]
fn csv_export_has_header_and_one_row_per_player() {
    let mut t = round_robin(&["A", "B"]);
    play(&mut t, "A", "B", 3, 1);
    let csv = standings_to_csv(&compute_standings(&t)).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "rank,name,points,wins,losses,draws,legs_won,legs_lost");
    assert_eq!(lines[1], "1,A,2,1,0,0,3,1");
    assert_eq!(lines[2], "2,B,0,0,1,0,1,3");
}
