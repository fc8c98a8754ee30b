use super::*;

fn ranked_field(n: usize) -> Vec<Competitor> {
    (1..=n as u32)
        .map(|seed| Competitor {
            id: format!("archer-{seed}"),
            name: format!("Seed {seed}"),
            seed,
            skill: 9.0 - seed as f64 * 0.01,
            is_tracked: seed == 1,
            qualification_score: 700 - seed,
        })
        .collect()
}

fn seed_of(slot: &Slot) -> Option<u32> {
    slot.competitor().map(|c| c.seed)
}

#[test]
fn test_eight_field_layout() {
    let bracket = Bracket::build(&ranked_field(8), 8).unwrap();
    assert_eq!(bracket.len(), 3);
    assert_eq!(bracket.rounds[0].label, "Quarterfinals");
    assert_eq!(bracket.rounds[1].label, "Semifinals");
    assert_eq!(bracket.rounds[2].label, TERMINAL_ROUND_LABEL);

    let firsts: Vec<_> = bracket.rounds[0]
        .matches
        .iter()
        .map(|m| (seed_of(&m.a), seed_of(&m.b)))
        .collect();
    assert_eq!(
        firsts,
        vec![
            (Some(1), Some(8)),
            (Some(5), Some(4)),
            (Some(3), Some(6)),
            (Some(7), Some(2)),
        ]
    );

    for m in &bracket.rounds[1].matches {
        assert!(m.a.is_pending() && m.b.is_pending());
        assert_eq!(m.round_label, "Semifinals");
    }

    let terminal = &bracket.rounds[2].matches;
    assert_eq!(terminal[0].id, GOLD_MATCH_ID);
    assert_eq!(terminal[0].round_label, GOLD_MATCH_LABEL);
    assert_eq!(terminal[0].kind, MatchKind::Gold);
    assert_eq!(terminal[1].id, BRONZE_MATCH_ID);
    assert_eq!(terminal[1].round_label, BRONZE_MATCH_LABEL);
    assert!(bracket.has_valid_shape());
}

#[test]
fn test_round_counts_for_every_supported_field() {
    for n in [4usize, 8, 16, 32, 64, 128] {
        let bracket = Bracket::build(&ranked_field(n), n).unwrap();
        assert_eq!(bracket.len(), n.trailing_zeros() as usize, "field {n}");
        assert_eq!(bracket.field_size(), n);
        assert_eq!(bracket.rounds.last().unwrap().matches.len(), 2);
        assert!(bracket.has_valid_shape());
    }
}

#[test]
fn test_round_labels() {
    assert_eq!(round_label(128), "Round of 128");
    assert_eq!(round_label(32), "Round of 32");
    assert_eq!(round_label(16), "Round of 16");
    assert_eq!(round_label(8), "Quarterfinals");
    assert_eq!(round_label(4), "Semifinals");
}

#[test]
fn test_match_ids_follow_stage() {
    let bracket = Bracket::build(&ranked_field(16), 16).unwrap();
    assert_eq!(bracket.rounds[0].matches[7].id, "r-16-m7");
    assert_eq!(bracket.rounds[1].matches[0].id, "r-8-m0");
    assert_eq!(
        bracket.find("r-4-m1"),
        Some(MatchRef { round: 2, index: 1 })
    );
    assert_eq!(bracket.find("nope"), None);
}

#[test]
fn test_build_rejects_bad_sizes() {
    assert_eq!(
        Bracket::build(&ranked_field(2), 2),
        Err(ArcheryError::InvalidFieldSize(2, MIN_BRACKET_SIZE))
    );
    assert_eq!(
        Bracket::build(&ranked_field(12), 12),
        Err(ArcheryError::InvalidFieldSize(12, MIN_BRACKET_SIZE))
    );
    assert_eq!(
        Bracket::build(&ranked_field(7), 8),
        Err(ArcheryError::FieldSizeMismatch { expected: 8, actual: 7 })
    );
}

#[test]
fn test_build_reports_missing_seed() {
    let mut field = ranked_field(8);
    field[5].seed = 42;
    assert_eq!(
        build_bracket(&field, 8),
        Err(ArcheryError::SeedNotFound(6))
    );
}

#[test]
fn test_semifinal_and_terminal_lookup() {
    let bracket = Bracket::build(&ranked_field(32), 32).unwrap();
    assert_eq!(bracket.terminal_index(), Some(4));
    assert_eq!(bracket.semifinal_index(), Some(3));
    assert!(bracket.is_semifinal(3));
    assert!(bracket.is_terminal(4));
    assert!(!bracket.is_terminal(3));
    assert!(bracket.champion().is_none());
}
