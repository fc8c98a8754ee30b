use super::*;
use archery_core::{
    ArcheryError, Bracket, Competitor, Match, MatchEngine, MatchKind, Side, Slot, BRONZE_MATCH_ID, GOLD_MATCH_ID,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const HIGH: [u8; 3] = [10, 10, 10];
const LOW: [u8; 3] = [7, 7, 7];

fn field(n: usize, tracked_seed: u32) -> Vec<Competitor> {
    (1..=n as u32)
        .map(|seed| Competitor {
            id: if seed == tracked_seed {
                "user-archer".to_string()
            } else {
                format!("archer-{seed}")
            },
            name: format!("Seed {seed}"),
            seed,
            skill: 8.0,
            is_tracked: seed == tracked_seed,
            qualification_score: 700 - seed,
        })
        .collect()
}

fn setup(n: usize, tracked_seed: u32) -> (Bracket, Cursor) {
    let bracket = Bracket::build(&field(n, tracked_seed), n).unwrap();
    let cursor = initial_cursor(&bracket).unwrap();
    (bracket, cursor)
}

fn active(bracket: &Bracket, cursor: &Cursor) -> Match {
    let at = bracket.find(&cursor.match_id).unwrap();
    bracket.get(at).unwrap().clone()
}

/// Play the active match to a 6-0 result for or against the tracked archer.
fn decide(m: &Match, tracked_wins: bool) -> Match {
    let mut m = m.clone();
    let side = m.tracked_side().unwrap();
    let winner = if tracked_wins { side } else { side.other() };
    let (a, b) = match winner {
        Side::A => (HIGH, LOW),
        Side::B => (LOW, HIGH),
    };
    for _ in 0..3 {
        m.submit_set(a, b).unwrap();
    }
    m
}

fn step(bracket: &Bracket, cursor: &Cursor, tracked_wins: bool, rng: &mut ChaCha8Rng) -> Advance {
    let decided = decide(&active(bracket, cursor), tracked_wins);
    advance(bracket, cursor, decided, &MatchEngine::default(), rng).unwrap()
}

#[test]
fn test_initial_cursor_finds_tracked_match() {
    let (bracket, cursor) = setup(8, 5);
    assert_eq!(cursor.round_index, 0);
    // Seed order for 8 is [1, 8, 5, 4, ...], so seed 5 opens in match 1
    assert_eq!(cursor.match_id, "r-8-m1");
    assert!(active(&bracket, &cursor).contains("user-archer"));
}

#[test]
fn test_win_advances_and_resolves_round() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let (bracket, cursor) = setup(16, 1);
    let result = step(&bracket, &cursor, true, &mut rng);

    assert!(result.standing.is_none());
    assert!(result.bracket.rounds[0].is_complete());
    for m in &result.bracket.rounds[0].matches {
        assert!(m.winner_competitor().is_some());
    }

    let winners: Vec<_> = result.bracket.rounds[0]
        .matches
        .iter()
        .map(|m| m.winner_competitor().unwrap().id.clone())
        .collect();
    for (i, m) in result.bracket.rounds[1].matches.iter().enumerate() {
        assert_eq!(m.a.competitor().unwrap().id, winners[2 * i]);
        assert_eq!(m.b.competitor().unwrap().id, winners[2 * i + 1]);
    }

    let next = result.cursor.unwrap();
    assert_eq!(next.round_index, 1);
    assert_eq!(next.match_id, "r-8-m0");
    assert!(active(&result.bracket, &next).contains("user-archer"));

    // Input bracket is untouched
    assert!(!bracket.rounds[0].matches.iter().any(|m| m.completed));

    assert!(result
        .events
        .iter()
        .any(|e| matches!(e, TournamentEvent::RoundAdvanced { round_index: 1, .. })));
    let decided = result
        .events
        .iter()
        .filter(|e| matches!(e, TournamentEvent::MatchDecided { .. }))
        .count();
    assert_eq!(decided, 8);
}

#[test]
fn test_early_loss_ends_tournament() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let (bracket, cursor) = setup(16, 3);
    let result = step(&bracket, &cursor, false, &mut rng);

    assert_eq!(result.standing, Some(Standing::LostIn("Round of 16".to_string())));
    assert!(result.cursor.is_none());
    assert!(result.bracket.rounds[0].is_complete());
    // No further rounds are simulated
    assert!(result.bracket.rounds[1].matches.iter().all(|m| m.a.is_pending()));
    assert_eq!(
        standing_from_bracket(&result.bracket, "user-archer"),
        result.standing
    );
}

#[test]
fn test_semifinal_split_preserves_sides() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    // Field of 4: semifinals are [(1, 4), (3, 2)]
    let (bracket, cursor) = setup(4, 1);
    assert!(bracket.is_semifinal(cursor.round_index));
    let result = step(&bracket, &cursor, true, &mut rng);

    let semis = &result.bracket.rounds[0].matches;
    let gold = result.bracket.gold_match().unwrap();
    let bronze = result.bracket.bronze_match().unwrap();
    assert_eq!(gold.a.competitor(), semis[0].winner_competitor());
    assert_eq!(gold.b.competitor(), semis[1].winner_competitor());
    assert_eq!(bronze.a.competitor(), semis[0].loser_competitor());
    assert_eq!(bronze.b.competitor(), semis[1].loser_competitor());
    assert_eq!(bronze.a.competitor().unwrap().id, "archer-4");

    let next = result.cursor.unwrap();
    assert_eq!(next.match_id, GOLD_MATCH_ID);
    assert_eq!(gold.tracked_side(), Some(Side::A));
}

#[test]
fn test_semifinal_loss_goes_to_bronze() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    // Seed 2 plays side B of the second semifinal
    let (bracket, cursor) = setup(4, 2);
    let result = step(&bracket, &cursor, false, &mut rng);

    assert!(result.standing.is_none());
    let next = result.cursor.unwrap();
    assert_eq!(next.match_id, BRONZE_MATCH_ID);
    let bronze = result.bracket.bronze_match().unwrap();
    assert_eq!(bronze.tracked_side(), Some(Side::B));
    assert_eq!(standing_from_bracket(&result.bracket, "user-archer"), None);
}

#[test]
fn test_medal_matches_end_tournament() {
    for (tracked_wins_final, via_bronze, expected) in [
        (true, false, Standing::Gold),
        (false, false, Standing::Silver),
        (true, true, Standing::Bronze),
        (false, true, Standing::Fourth),
    ] {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let (bracket, cursor) = setup(8, 1);
        let qf = step(&bracket, &cursor, true, &mut rng);
        let sf = step(&qf.bracket, qf.cursor.as_ref().unwrap(), !via_bronze, &mut rng);
        let terminal_cursor = sf.cursor.clone().unwrap();
        assert_eq!(terminal_cursor.round_index, 2);
        let fin = step(&sf.bracket, &terminal_cursor, tracked_wins_final, &mut rng);

        assert_eq!(fin.standing.as_ref(), Some(&expected));
        assert!(fin.cursor.is_none());
        // The other medal match is played out as well
        assert!(fin.bracket.rounds[2].is_complete());
        assert!(fin.bracket.champion().is_some());
        assert!(matches!(
            fin.events.last(),
            Some(TournamentEvent::TournamentFinished { standing }) if *standing == expected
        ));
        assert_eq!(standing_from_bracket(&fin.bracket, "user-archer"), Some(expected));
    }
}

#[test]
fn test_forfeit_writes_zero_six_and_completes_round() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let (bracket, cursor) = setup(32, 7);
    let result = forfeit(&bracket, &cursor, &MatchEngine::default(), &mut rng).unwrap();

    assert_eq!(result.standing, Some(Standing::Forfeited));
    assert!(result.cursor.is_none());
    let m = active(&result.bracket, &cursor);
    let side = m.tracked_side().unwrap();
    assert!(m.completed && m.forfeited);
    assert_eq!(m.points(side), 0);
    assert_eq!(m.points(side.other()), 6);
    assert_eq!(m.winner, Some(side.other()));
    assert!(m.set_log.is_empty());
    assert!(!m.is_shoot_off);

    for other in &result.bracket.rounds[0].matches {
        assert!(other.completed);
        assert!(other.winner.is_some());
    }
    assert_eq!(Standing::Forfeited.to_string(), "Retired/Forfeited (0-6)");
    assert_eq!(
        standing_from_bracket(&result.bracket, "user-archer"),
        Some(Standing::Forfeited)
    );
}

#[test]
fn test_advance_rejects_mismatched_state() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let engine = MatchEngine::default();
    let (bracket, cursor) = setup(8, 1);
    let decided = decide(&active(&bracket, &cursor), true);

    let missing = Cursor {
        round_index: 0,
        match_id: "r-8-m9".to_string(),
    };
    assert!(matches!(
        advance(&bracket, &missing, decided.clone(), &engine, &mut rng),
        Err(ArcheryError::MismatchedRoundState(_))
    ));

    let no_round = Cursor {
        round_index: 9,
        match_id: cursor.match_id.clone(),
    };
    assert!(matches!(
        advance(&bracket, &no_round, decided.clone(), &engine, &mut rng),
        Err(ArcheryError::MismatchedRoundState(_))
    ));

    let unfinished = active(&bracket, &cursor);
    assert!(matches!(
        advance(&bracket, &cursor, unfinished, &engine, &mut rng),
        Err(ArcheryError::MismatchedRoundState(_))
    ));

    let mut wrong_id = decided.clone();
    wrong_id.id = "r-8-m3".to_string();
    assert!(matches!(
        advance(&bracket, &cursor, wrong_id, &engine, &mut rng),
        Err(ArcheryError::MismatchedRoundState(_))
    ));

    let mut impostor = decided.clone();
    if let Slot::Filled(c) = &mut impostor.b {
        c.id = "someone-else".to_string();
    }
    assert!(matches!(
        advance(&bracket, &cursor, impostor, &engine, &mut rng),
        Err(ArcheryError::MismatchedRoundState(_))
    ));

    // Replaying a result onto an already resolved slot
    let once = advance(&bracket, &cursor, decided.clone(), &engine, &mut rng).unwrap();
    assert!(matches!(
        advance(&once.bracket, &cursor, decided, &engine, &mut rng),
        Err(ArcheryError::MismatchedRoundState(_))
    ));
}

#[test]
fn test_decided_match_keeps_bracket_labels() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let (bracket, cursor) = setup(8, 1);
    let mut decided = decide(&active(&bracket, &cursor), true);
    decided.round_label = "Simulated Match".to_string();
    let result = advance(&bracket, &cursor, decided, &MatchEngine::default(), &mut rng).unwrap();
    let m = active(&result.bracket, &cursor);
    assert_eq!(m.round_label, "Quarterfinals");
    assert_eq!(m.kind, MatchKind::Elimination);
}

fn conceded(bracket: &Bracket, cursor: &Cursor, tracked_concedes: bool) -> Match {
    let mut m = active(bracket, cursor);
    let side = m.tracked_side().unwrap();
    let loser = if tracked_concedes { side } else { side.other() };
    m.forfeit(loser).unwrap();
    m
}

#[test]
fn test_advance_with_concession_ends_early_round() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let (bracket, cursor) = setup(16, 2);
    let decided = conceded(&bracket, &cursor, true);
    let result = advance(&bracket, &cursor, decided, &MatchEngine::default(), &mut rng).unwrap();

    assert_eq!(result.standing, Some(Standing::Forfeited));
    assert!(result.cursor.is_none());
    assert!(result.bracket.rounds[0].is_complete());
    assert_eq!(
        standing_from_bracket(&result.bracket, "user-archer"),
        result.standing
    );
}

#[test]
fn test_advance_with_semifinal_concession_skips_bronze() {
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let (bracket, cursor) = setup(4, 2);
    let decided = conceded(&bracket, &cursor, true);
    let result = advance(&bracket, &cursor, decided, &MatchEngine::default(), &mut rng).unwrap();

    assert_eq!(result.standing, Some(Standing::Forfeited));
    assert!(result.cursor.is_none());
    assert!(result.bracket.bronze_match().unwrap().a.is_pending());
    assert!(matches!(
        result.events.last(),
        Some(TournamentEvent::TournamentFinished {
            standing: Standing::Forfeited
        })
    ));
    assert_eq!(
        standing_from_bracket(&result.bracket, "user-archer"),
        Some(Standing::Forfeited)
    );
}

#[test]
fn test_opponent_concession_advances_tracked() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let (bracket, cursor) = setup(8, 1);
    let decided = conceded(&bracket, &cursor, false);
    let result = advance(&bracket, &cursor, decided, &MatchEngine::default(), &mut rng).unwrap();

    assert!(result.standing.is_none());
    let next = result.cursor.unwrap();
    assert_eq!(next.round_index, 1);
    assert!(active(&result.bracket, &next).contains("user-archer"));
}
