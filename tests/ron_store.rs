use std::{env, fs, path::PathBuf};

use chrono::Utc;
use tournament_engine::{
    format::Format,
    service::TournamentService,
    status::{PairingResult, TournamentStatus},
    store::{RonStore, TournamentStore, Tournaments},
    tournament::{GameRecord, NewTournament, PlayerIdentity},
};

fn temp_file() -> PathBuf {
    env::temp_dir().join(format!(
        "tournament-engine-{}-{:x}.ron",
        std::process::id(),
        rand::random::<u64>()
    ))
}

#[test]
fn a_missing_file_is_an_empty_store() -> anyhow::Result<()> {
    let store = RonStore::new(temp_file());
    assert_eq!(store.load_all()?, Tournaments::default());

    Ok(())
}

#[test]
fn garbage_is_an_error() -> anyhow::Result<()> {
    let path = temp_file();
    fs::write(&path, "this is not ron")?;

    let result = RonStore::new(&path).load_all();
    fs::remove_file(&path)?;
    assert!(result.is_err());

    Ok(())
}

#[test]
fn a_restarted_service_sees_the_same_tournaments() -> anyhow::Result<()> {
    let path = temp_file();

    let mut service = TournamentService::new(RonStore::new(&path))?;
    service.seed_if_empty();

    let id = service.create(NewTournament {
        name: "Sunday Rapid".to_string(),
        format: Format::Swiss,
        starts_at: Utc::now(),
        max_players: 4,
        ..NewTournament::default()
    });
    for (player, rating) in [("a", 1450), ("b", 1550)] {
        service.join(
            &id,
            PlayerIdentity {
                id: player.to_string(),
                username: player.to_string(),
                rating,
                title: None,
            },
        )?;
    }
    service.start(&id)?;
    service.begin_game(
        &id,
        "1-1",
        "game-7".to_string(),
        Some(GameRecord(ron::from_str::<ron::Value>("(moves: 40, opening: \"C42\")")?)),
    )?;
    service.record_result(&id, "1-1", PairingResult::Draw)?;

    let before = service.tournaments().clone();
    drop(service);

    let restarted = TournamentService::new(RonStore::new(&path))?;
    fs::remove_file(&path)?;

    assert_eq!(restarted.tournaments(), &before);
    assert_eq!(restarted.get(&id)?.status, TournamentStatus::Completed);
    assert_eq!(
        restarted.get(&id)?.rounds[0].pairings[0].game_id.as_deref(),
        Some("game-7")
    );

    Ok(())
}
