use super::*;
use archery_core::{Distance, ShootOffTieBreak, TargetFace};

#[test]
fn test_defaults() {
    let config = TournamentConfig::default();
    assert_eq!(config.field_size, 32);
    assert_eq!(config.tracked_name, "Player");
    assert_eq!(config.tracked_skill, 8.5);
    assert_eq!(config.distance, Distance::Outdoor70);
    assert_eq!(config.match_std_dev, 0.8);
    assert_eq!(config.qualification_std_dev, 0.7);
    assert_eq!(config.shoot_off_tie_break, ShootOffTieBreak::CoinFlip);
    assert!(config.seed.is_none());
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = TournamentConfig::from_toml_str(
        r#"
        field_size = 16
        tracked_name = "Ana"
        distance = "18m"
        seed = 7
        shoot_off_tie_break = "nudge"
        "#,
    )
    .unwrap();
    assert_eq!(config.field_size, 16);
    assert_eq!(config.tracked_name, "Ana");
    assert_eq!(config.distance, Distance::Indoor18);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.shoot_off_tie_break, ShootOffTieBreak::Nudge);
    assert_eq!(config.tracked_skill, 8.5);

    let engine = config.match_engine();
    assert_eq!(engine.face, TargetFace::ThreeSpot);
    assert_eq!(engine.tie_break, ShootOffTieBreak::Nudge);
    assert_eq!(config.field_config().field_size, 16);
}

#[test]
fn test_rejects_bad_field_sizes() {
    for size in [0, 2, 3, 12, 256] {
        let config = TournamentConfig {
            field_size: size,
            ..TournamentConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))), "size {size}");
    }
    for size in [4, 8, 64, 128] {
        let config = TournamentConfig {
            field_size: size,
            ..TournamentConfig::default()
        };
        assert!(config.validate().is_ok(), "size {size}");
    }
}

#[test]
fn test_rejects_bad_numbers() {
    let negative = TournamentConfig {
        match_std_dev: -0.1,
        ..TournamentConfig::default()
    };
    assert!(negative.validate().is_err());

    let nan_skill = TournamentConfig {
        tracked_skill: f64::NAN,
        ..TournamentConfig::default()
    };
    assert!(nan_skill.validate().is_err());

    // 72 arrows at 70m cap the ranking round at 720
    let too_high = TournamentConfig {
        manual_qualification_score: Some(721),
        ..TournamentConfig::default()
    };
    assert!(too_high.validate().is_err());
    let perfect = TournamentConfig {
        manual_qualification_score: Some(720),
        ..TournamentConfig::default()
    };
    assert!(perfect.validate().is_ok());
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        TournamentConfig::from_toml_str("field_size = \"many\""),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        TournamentConfig::from_toml_str("field_size = 6"),
        Err(ConfigError::Invalid(_))
    ));
    assert!(matches!(
        TournamentConfig::load(std::path::Path::new("/nonexistent/tournament.toml")),
        Err(ConfigError::Io(_))
    ));
}
