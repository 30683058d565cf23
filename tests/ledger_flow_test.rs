//! End-to-end integration tests for the progression ledger

mod common;

use game_pulse::{GameLedger, LedgerError, Operation, PrincipalId, Reply};

use common::{create_registered_ledger, create_test_ledger, deployer};

#[test]
fn test_register_game_and_check_authorization() {
    let (_dir, ledger) = create_test_ledger();
    let gamedev = PrincipalId::from("wallet_1");

    ledger
        .registry()
        .register_game(&deployer(), &gamedev)
        .expect("Owner registration should succeed");

    assert!(
        ledger.registry().is_game_authorized(&gamedev).unwrap(),
        "Registered game should be authorized"
    );
}

#[test]
fn test_create_and_unlock_achievements() {
    let (_dir, ledger, gamedev) = create_registered_ledger();
    let player = PrincipalId::from("wallet_2");

    ledger
        .achievements()
        .create_achievement(
            &gamedev,
            &gamedev,
            1,
            "First Win",
            "Win your first match",
            100,
            1,
        )
        .expect("Developer should be able to create an achievement");

    ledger
        .achievements()
        .unlock_achievement(&gamedev, &gamedev, &player, 1)
        .expect("Developer should be able to unlock for a player");

    let status = ledger
        .achievements()
        .player_achievement_status(&gamedev, &player, 1)
        .unwrap()
        .expect("Status record should exist after unlock");
    assert!(status.unlocked, "Achievement should report unlocked");
}

#[test]
fn test_log_session_and_retrieve_stats() {
    let (_dir, ledger, gamedev) = create_registered_ledger();
    let player = PrincipalId::from("wallet_2");

    ledger
        .sessions()
        .log_session(&gamedev, &gamedev, &player, 3600, None)
        .expect("Developer should be able to log a session");

    let stats = ledger
        .sessions()
        .player_stats(&gamedev, &player)
        .unwrap()
        .expect("Stats record should exist after a session");
    assert_eq!(stats.total_playtime, 3600);
    assert_eq!(stats.sessions, 1);
    assert_eq!(stats.achievement_points, 0);
}

#[test]
fn test_unlock_then_stats_scenario() {
    // Owner registers game g for developer d; d creates achievement
    // (id=1, points=100); d unlocks it for player p. The player's stats show
    // the credit with no playtime or sessions.
    let (_dir, ledger, gamedev) = create_registered_ledger();
    let player = PrincipalId::from("wallet_2");

    ledger
        .achievements()
        .create_achievement(
            &gamedev,
            &gamedev,
            1,
            "First Win",
            "Win your first match",
            100,
            1,
        )
        .unwrap();
    ledger
        .achievements()
        .unlock_achievement(&gamedev, &gamedev, &player, 1)
        .unwrap();

    let stats = ledger
        .sessions()
        .player_stats(&gamedev, &player)
        .unwrap()
        .expect("Unlock alone should create the stats record");
    assert_eq!(stats.total_playtime, 0);
    assert_eq!(stats.sessions, 0);
    assert_eq!(stats.achievement_points, 100);
}

#[test]
fn test_season_and_leaderboard_scenario() {
    // d starts season 1 with capacity 1000; d logs a session for player p
    // with duration 3600 and season points 100.
    let (_dir, ledger, gamedev) = create_registered_ledger();
    let player = PrincipalId::from("wallet_2");

    ledger
        .seasons()
        .start_season(&gamedev, &gamedev, 1, 1000)
        .unwrap();
    ledger
        .sessions()
        .log_session(&gamedev, &gamedev, &player, 3600, Some(100))
        .unwrap();

    let board = ledger
        .seasons()
        .leaderboard(&gamedev, 1)
        .unwrap()
        .expect("Started season should have a leaderboard");
    assert_eq!(board.capacity, 1000);
    assert_eq!(board.top_players.len(), 1);
    assert_eq!(board.top_players[0].player, player);
    assert_eq!(board.top_players[0].points, 100);
}

#[test]
fn test_leaderboard_ranking_across_players() {
    let (_dir, ledger, gamedev) = create_registered_ledger();
    ledger
        .seasons()
        .start_season(&gamedev, &gamedev, 1, 1000)
        .unwrap();

    for (player, points) in [("p1", 100), ("p2", 50)] {
        ledger
            .sessions()
            .log_session(&gamedev, &gamedev, &PrincipalId::from(player), 60, Some(points))
            .unwrap();
    }
    let board = ledger.seasons().leaderboard(&gamedev, 1).unwrap().unwrap();
    let order: Vec<&str> = board.top_players.iter().map(|e| e.player.as_str()).collect();
    assert_eq!(order, vec!["p1", "p2"]);

    ledger
        .sessions()
        .log_session(&gamedev, &gamedev, &PrincipalId::from("p3"), 60, Some(150))
        .unwrap();
    let board = ledger.seasons().leaderboard(&gamedev, 1).unwrap().unwrap();
    let order: Vec<&str> = board.top_players.iter().map(|e| e.player.as_str()).collect();
    assert_eq!(order, vec!["p3", "p1", "p2"]);
}

#[test]
fn test_monotonic_accumulation() {
    let (_dir, ledger, gamedev) = create_registered_ledger();
    let player = PrincipalId::from("wallet_2");

    let durations = [120u64, 45, 3600, 1, 999];
    for d in durations {
        ledger
            .sessions()
            .log_session(&gamedev, &gamedev, &player, d, None)
            .unwrap();
    }

    let stats = ledger.sessions().player_stats(&gamedev, &player).unwrap().unwrap();
    assert_eq!(stats.total_playtime, durations.iter().sum::<u64>());
    assert_eq!(stats.sessions, durations.len() as u64);
}

#[test]
fn test_authorization_isolation_for_every_mutation() {
    // A developer who is not registered for game g must be rejected by every
    // mutating operation, with no state left behind.
    let (_dir, ledger, gamedev) = create_registered_ledger();
    let intruder = PrincipalId::from("wallet_9");
    let player = PrincipalId::from("wallet_2");

    let attempts: Vec<(&str, Result<(), LedgerError>)> = vec![
        (
            "create-achievement",
            ledger
                .achievements()
                .create_achievement(&intruder, &gamedev, 7, "Sneaky", "Not yours", 10, 1),
        ),
        (
            "unlock-achievement",
            ledger
                .achievements()
                .unlock_achievement(&intruder, &gamedev, &player, 7),
        ),
        (
            "log-game-session",
            ledger
                .sessions()
                .log_session(&intruder, &gamedev, &player, 60, Some(5)),
        ),
        (
            "start-new-season",
            ledger.seasons().start_season(&intruder, &gamedev, 9, 10),
        ),
    ];
    for (op, result) in attempts {
        assert!(
            matches!(result, Err(LedgerError::NotAuthorized)),
            "{} by an unregistered developer should fail with not-authorized",
            op
        );
    }

    assert!(ledger.achievements().achievement(&gamedev, 7).unwrap().is_none());
    assert!(ledger.sessions().player_stats(&gamedev, &player).unwrap().is_none());
    assert!(ledger.seasons().season(&gamedev, 9).unwrap().is_none());
}

#[test]
fn test_operations_on_unregistered_game_fail() {
    let (_dir, ledger) = create_test_ledger();
    let dev = PrincipalId::from("wallet_1");

    // Even the would-be developer cannot act before the owner registers them
    let result = ledger
        .achievements()
        .create_achievement(&dev, &dev, 1, "First Win", "Win your first match", 100, 1);
    assert!(matches!(result, Err(LedgerError::NotAuthorized)));
}

#[test]
fn test_dispatch_surface_full_flow() {
    let (_dir, ledger) = create_test_ledger();
    let owner = deployer();
    let dev = PrincipalId::from("wallet_1");
    let player = PrincipalId::from("wallet_2");

    let calls: Vec<(PrincipalId, Operation)> = vec![
        (owner, Operation::RegisterGame { developer: dev.clone() }),
        (
            dev.clone(),
            Operation::CreateAchievement {
                game: dev.clone(),
                id: 1,
                name: "First Win".into(),
                description: "Win your first match".into(),
                points: 100,
                kind: 1,
            },
        ),
        (
            dev.clone(),
            Operation::UnlockAchievement {
                game: dev.clone(),
                player: player.clone(),
                id: 1,
            },
        ),
        (
            dev.clone(),
            Operation::StartNewSeason {
                game: dev.clone(),
                season_id: 1,
                capacity: 1000,
            },
        ),
        (
            dev.clone(),
            Operation::LogGameSession {
                game: dev.clone(),
                player: player.clone(),
                duration: 3600,
                season_points: Some(100),
            },
        ),
    ];
    for (caller, op) in calls {
        let reply = ledger.apply(&caller, op).expect("Operation should succeed");
        assert!(matches!(reply, Reply::Done));
    }

    let reply = ledger
        .apply(
            &player,
            Operation::GetSeasonLeaderboard {
                game: dev.clone(),
                season_id: 1,
            },
        )
        .unwrap();
    let Reply::Leaderboard {
        leaderboard: Some(board),
    } = reply
    else {
        panic!("Expected a leaderboard for the started season");
    };
    assert_eq!(board.top_players.len(), 1);
    assert_eq!(board.top_players[0].points, 100);

    let reply = ledger
        .apply(
            &player,
            Operation::GetPlayerStats {
                game: dev,
                player: player.clone(),
            },
        )
        .unwrap();
    let Reply::Stats { stats: Some(stats) } = reply else {
        panic!("Expected a stats record");
    };
    assert_eq!(stats.total_playtime, 3600);
    assert_eq!(stats.sessions, 1);
    assert_eq!(stats.achievement_points, 100);
}

#[test]
fn test_state_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let db_path = dir.path().join("ledger.db");
    let owner = deployer();
    let dev = PrincipalId::from("wallet_1");
    let player = PrincipalId::from("wallet_2");

    {
        let ledger = GameLedger::with_path(owner.clone(), &db_path).unwrap();
        ledger.registry().register_game(&owner, &dev).unwrap();
        ledger.seasons().start_season(&dev, &dev, 1, 1000).unwrap();
        ledger
            .sessions()
            .log_session(&dev, &dev, &player, 3600, Some(75))
            .unwrap();
    }

    let ledger = GameLedger::with_path(owner, &db_path).unwrap();
    assert!(
        ledger.registry().is_game_authorized(&dev).unwrap(),
        "Committed registration should survive reopen"
    );
    let stats = ledger.sessions().player_stats(&dev, &player).unwrap().unwrap();
    assert_eq!(stats.total_playtime, 3600);
    let board = ledger.seasons().leaderboard(&dev, 1).unwrap().unwrap();
    assert_eq!(board.top_players[0].points, 75);
}
