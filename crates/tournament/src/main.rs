//! Tournament CLI
//!
//! Simulate an archery knockout for one tracked archer and print the bracket.

use archery_core::{seed_pairs, Bracket, Distance, Match, MatchKind, Side, Slot};
use std::env;
use std::path::Path;
use tournament::{TournamentConfig, TournamentError, TournamentRecord, TournamentSession};

fn print_usage() {
    println!("Archery Knockout Simulator");
    println!();
    println!("Usage:");
    println!("  tournament run [--size N] [--skill S] [--name NAME] [--distance D] [--seed N]");
    println!("                 [--qual-score N] [--config FILE] [--json FILE]");
    println!("  tournament seeds <N>");
    println!();
    println!("Options:");
    println!("  --size N        Field size, a power of two from 4 to 128 (default 32)");
    println!("  --skill S       Tracked archer's mean arrow score (default 8.5)");
    println!("  --distance D    18m, 30m, 50m or 70m (default 70m)");
    println!("  --qual-score N  Use this ranking-round total instead of simulating one");
    println!("  --config FILE   Load settings from a TOML file; flags override it");
    println!("  --json FILE     Write the finished tournament record as JSON");
    println!();
    println!("Examples:");
    println!("  tournament run --size 16 --skill 9.1 --seed 7");
    println!("  tournament run --distance 18m --json last_run.json");
    println!("  tournament seeds 8");
}

fn parse_run_args(args: &[String]) -> Result<(TournamentConfig, Option<String>), TournamentError> {
    // The config file is the base layer, so it is read before any flag
    let mut config = match args.iter().position(|a| a == "--config" || a == "-c") {
        Some(i) => match args.get(i + 1) {
            Some(path) => TournamentConfig::load(Path::new(path))?,
            None => TournamentConfig::default(),
        },
        None => TournamentConfig::default(),
    };
    let mut json_path = None;

    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--size" | "-n", Some(v)) => {
                config.field_size = v.parse().unwrap_or(config.field_size);
                i += 1;
            }
            ("--skill" | "-s", Some(v)) => {
                config.tracked_skill = v.parse().unwrap_or(config.tracked_skill);
                i += 1;
            }
            ("--name", Some(v)) => {
                config.tracked_name = v.clone();
                i += 1;
            }
            ("--distance" | "-d", Some(v)) => {
                match Distance::parse(v) {
                    Some(d) => config.distance = d,
                    None => eprintln!("Warning: unknown distance {}, keeping {}", v, config.distance),
                }
                i += 1;
            }
            ("--seed", Some(v)) => {
                config.seed = v.parse().ok();
                i += 1;
            }
            ("--qual-score", Some(v)) => {
                config.manual_qualification_score = v.parse().ok();
                i += 1;
            }
            ("--json", Some(v)) => {
                json_path = Some(v.clone());
                i += 1;
            }
            ("--config" | "-c", Some(_)) => i += 1,
            (other, _) => eprintln!("Warning: ignoring argument {}", other),
        }
        i += 1;
    }

    config.validate()?;
    Ok((config, json_path))
}

fn describe_slot(slot: &Slot, won: bool) -> String {
    let marker = if won { "*" } else { " " };
    format!("{}{}", marker, slot)
}

fn describe_match(m: &Match) -> String {
    let winner = m.winner;
    let a = describe_slot(&m.a, winner == Some(Side::A));
    let b = describe_slot(&m.b, winner == Some(Side::B));
    let mut line = format!("{:<32} {}-{}  {}", a, m.points_a, m.points_b, b);
    if let Some((sa, sb)) = m.shoot_off_scores {
        line.push_str(&format!("  (shoot-off {}-{})", sa, sb));
    }
    if m.forfeited {
        line.push_str("  (forfeit)");
    }
    if m.tracked_side().is_some() {
        line.push_str("  <- you");
    }
    line
}

fn print_bracket(bracket: &Bracket) {
    for round in &bracket.rounds {
        println!("--- {} ---", round.label);
        for m in &round.matches {
            if m.a.is_pending() && m.b.is_pending() {
                continue;
            }
            if round.matches.len() == 2 && m.kind != MatchKind::Elimination {
                println!("  [{}]", m.round_label);
            }
            println!("  {}", describe_match(m));
        }
    }
}

fn print_tracked_matches(record: &TournamentRecord) {
    for m in &record.tracked_matches {
        println!("{}: {}", m.round_label, describe_match(m));
        for (n, set) in m.set_log.iter().enumerate() {
            println!(
                "    Set {}: {:?} ({}) vs {:?} ({})  -> {}-{}",
                n + 1,
                set.a_scores,
                set.a_total(),
                set.b_scores,
                set.b_total(),
                set.a_points,
                set.b_points
            );
        }
    }
}

fn run_tournament(args: &[String]) -> Result<(), TournamentError> {
    let (config, json_path) = parse_run_args(args)?;

    println!("=== Archery Knockout: {} archers at {} ===", config.field_size, config.distance);
    println!("Archer: {}, Skill: {:.1}", config.tracked_name, config.tracked_skill);
    if let Some(seed) = config.seed {
        println!("Seed: {}", seed);
    }
    println!();

    let mut session = TournamentSession::start(config)?;

    println!("=== Ranking Round ===");
    for c in session.competitors() {
        let marker = if c.is_tracked { "<- you" } else { "" };
        println!("{:>4}. {:<24} {:>4}  {}", c.seed, c.name, c.qualification_score, marker);
    }
    println!();

    let standing = session.run_to_completion()?;

    println!("=== Bracket ===");
    print_bracket(session.bracket());
    println!();

    let Some(record) = session.record() else {
        return Ok(());
    };

    println!("=== Your Matches ===");
    print_tracked_matches(record);
    println!();

    println!("=== Final Result ===");
    println!("{}: {}", record.tracked_name, standing);
    if let Some(champion) = session.bracket().champion() {
        println!("Champion: {} (seed {})", champion.name, champion.seed);
    }

    if let Some(path) = json_path {
        std::fs::write(&path, record.to_json()?)?;
        tracing::info!(path = %path, "tournament record written");
    }
    Ok(())
}

fn show_seeds(args: &[String]) {
    let Some(n) = args.first().and_then(|s| s.parse::<usize>().ok()) else {
        eprintln!("Error: seeds requires a field size");
        print_usage();
        return;
    };

    match seed_pairs(n) {
        Ok(pairs) => {
            println!("=== First-round pairings for {} archers ===", n);
            for (i, (a, b)) in pairs.iter().enumerate() {
                println!("  Match {:>2}: seed {:>3} vs seed {:>3}", i + 1, a, b);
            }
        }
        Err(e) => eprintln!("Error: {}", e),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "run" => {
            if let Err(e) = run_tournament(&args[2..]) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        "seeds" => show_seeds(&args[2..]),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage();
        }
    }
}
