use chrono::{TimeDelta, TimeZone, Utc};
use sea_orm::{Database, DatabaseConnection};

use engine::{
    Condition, Engine, EngineConfig, EngineError, GallonUnit, JourneyNewCmd, JourneyUpdateCmd,
    PrimaryInputs, UserSettingsCmd, import,
};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db(config: EngineConfig) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .config(config)
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_alice() -> Engine {
    let (engine, _db) = engine_with_db(EngineConfig::default()).await;
    engine.register_user("alice", "secret").await.unwrap();
    engine
}

fn inputs(distance: f64, mpg: f64, time_driven: f64, cost_pl: f64) -> PrimaryInputs {
    PrimaryInputs {
        distance,
        mpg,
        time_driven,
        cost_pl,
    }
}

#[tokio::test]
async fn create_computes_derived_fields() {
    let engine = engine_with_alice().await;
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();

    let journey = engine
        .create_journey(
            JourneyNewCmd::new("Alice", at, inputs(60.0, 30.0, 90.0, 1.45))
                .description(" commute ")
                .temp(4.26)
                .condition(Condition::Wet),
        )
        .await
        .unwrap();

    assert_eq!(journey.user, "alice");
    assert_eq!(journey.description, "commute");
    assert_eq!(journey.temp, 4.3);
    assert_eq!(journey.fuel_used_l, 9.09);
    assert_eq!(journey.avg_speed, 40.0);
    assert_eq!(journey.total_cost, 13.18);
    assert_eq!(journey.perc_of_tank, 0.1421);

    let stored = engine.journey(journey.id).await.unwrap();
    assert_eq!(stored, journey);
}

#[tokio::test]
async fn create_rounds_primaries_before_deriving() {
    let engine = engine_with_alice().await;
    let journey = engine
        .create_journey(JourneyNewCmd::new(
            "alice",
            Utc::now(),
            inputs(10.123, 45.678, 12.346, 1.4567),
        ))
        .await
        .unwrap();
    assert_eq!(journey.distance, 10.12);
    assert_eq!(journey.mpg, 45.68);
    assert_eq!(journey.time_driven, 12.35);
    assert_eq!(journey.cost_pl, 1.457);
}

#[tokio::test]
async fn unknown_owner_uses_engine_defaults() {
    let config = EngineConfig {
        default_tank_volume: 50.0,
        ..Default::default()
    };
    let (engine, _db) = engine_with_db(config).await;
    let journey = engine
        .create_journey(JourneyNewCmd::new(
            "ghost",
            Utc::now(),
            inputs(100.0, 0.0, 60.0, 1.0),
        ))
        .await
        .unwrap();
    // mpg 0 falls back to one mile per litre
    assert_eq!(journey.fuel_used_l, 100.0);
    assert_eq!(journey.perc_of_tank, 2.0);
}

#[tokio::test]
async fn us_gallon_profile_changes_fuel_used() {
    let engine = engine_with_alice().await;
    engine
        .update_user_settings(UserSettingsCmd::new("alice").gallon(GallonUnit::Us))
        .await
        .unwrap();
    let journey = engine
        .create_journey(JourneyNewCmd::new(
            "alice",
            Utc::now(),
            inputs(100.0, 40.0, 120.0, 1.0),
        ))
        .await
        .unwrap();
    assert_eq!(journey.fuel_used_l, 9.49);
}

#[tokio::test]
async fn update_merges_and_recomputes() {
    let engine = engine_with_alice().await;
    let journey = engine
        .create_journey(JourneyNewCmd::new(
            "alice",
            Utc::now(),
            inputs(60.0, 30.0, 90.0, 1.45),
        ))
        .await
        .unwrap();

    let updated = engine
        .update_journey(
            JourneyUpdateCmd::new(journey.id)
                .distance(120.0)
                .condition(Condition::Snow),
        )
        .await
        .unwrap();

    assert_eq!(updated.distance, 120.0);
    assert_eq!(updated.mpg, 30.0);
    assert_eq!(updated.condition, Condition::Snow);
    assert_eq!(updated.avg_speed, 80.0);
    assert_eq!(updated.fuel_used_l, 18.18);
    assert_eq!(engine.journey(journey.id).await.unwrap(), updated);
}

#[tokio::test]
async fn missing_journey_is_not_found() {
    let engine = engine_with_alice().await;
    let missing = Uuid::new_v4();
    let not_found = EngineError::KeyNotFound("journey not exists".to_string());

    assert_eq!(engine.journey(missing).await.unwrap_err(), not_found);
    assert_eq!(engine.delete_journey(missing).await.unwrap_err(), not_found);
    assert_eq!(
        engine
            .update_journey(JourneyUpdateCmd::new(missing).distance(1.0))
            .await
            .unwrap_err(),
        not_found
    );
}

#[tokio::test]
async fn delete_removes_journey() {
    let engine = engine_with_alice().await;
    let journey = engine
        .create_journey(JourneyNewCmd::new("alice", Utc::now(), inputs(5.0, 40.0, 10.0, 1.5)))
        .await
        .unwrap();
    assert_eq!(engine.count_journeys("alice").await.unwrap(), 1);

    engine.delete_journey(journey.id).await.unwrap();
    assert_eq!(engine.count_journeys("alice").await.unwrap(), 0);
    assert!(engine.delete_journey(journey.id).await.is_err());
}

#[tokio::test]
async fn list_pages_newest_first() {
    let engine = engine_with_alice().await;
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
    for day in 0..5 {
        engine
            .create_journey(JourneyNewCmd::new(
                "alice",
                base + TimeDelta::days(day),
                inputs(day as f64 + 1.0, 40.0, 10.0, 1.5),
            ))
            .await
            .unwrap();
    }
    engine
        .create_journey(JourneyNewCmd::new("bob", base, inputs(1.0, 40.0, 10.0, 1.5)))
        .await
        .unwrap();

    let first = engine.list_journeys_page("alice", 2, None).await.unwrap();
    let distances: Vec<f64> = first.journeys.iter().map(|j| j.distance).collect();
    assert_eq!(distances, vec![5.0, 4.0]);
    let cursor = first.next_cursor.expect("more pages");

    let second = engine
        .list_journeys_page("alice", 2, Some(&cursor))
        .await
        .unwrap();
    let distances: Vec<f64> = second.journeys.iter().map(|j| j.distance).collect();
    assert_eq!(distances, vec![3.0, 2.0]);

    let third = engine
        .list_journeys_page("alice", 2, second.next_cursor.as_deref())
        .await
        .unwrap();
    assert_eq!(third.journeys.len(), 1);
    assert!(third.next_cursor.is_none());
}

#[tokio::test]
async fn list_rejects_bad_cursor_and_zero_limit() {
    let engine = engine_with_alice().await;
    assert!(matches!(
        engine.list_journeys_page("alice", 10, Some("%%%")).await,
        Err(EngineError::Validation(_))
    ));
    assert!(matches!(
        engine.list_journeys_page("alice", 0, None).await,
        Err(EngineError::Validation(_))
    ));
}

#[tokio::test]
async fn import_is_all_or_nothing() {
    let config = EngineConfig {
        import_batch_size: 2,
        ..Default::default()
    };
    let (engine, _db) = engine_with_db(config).await;

    let rows = import::parse_csv(
        "user,dateTime,distance,mpg,timeDriven,costPl\n\
         Alice,2025-01-01,10,40,20,1.5\n\
         alice,2025-01-02,12,\"42\",25,1.5\n\
         bob,2025-01-03,8,38,15,1.6\n",
    )
    .unwrap();
    assert_eq!(engine.import_journeys(rows, None).await.unwrap(), 3);
    assert_eq!(engine.count_journeys("alice").await.unwrap(), 2);
    assert_eq!(engine.count_journeys("bob").await.unwrap(), 1);

    let broken = import::parse_csv(
        "user,dateTime,distance\n\
         alice,2025-02-01,10\n\
         alice,not a date,12\n",
    )
    .unwrap();
    assert_eq!(
        engine.import_journeys(broken, None).await.unwrap_err(),
        EngineError::Validation("row 2: invalid dateTime".to_string())
    );
    assert_eq!(engine.count_journeys("alice").await.unwrap(), 2);
}

#[tokio::test]
async fn import_username_overrides_rows() {
    let engine = engine_with_alice().await;
    let rows = import::parse_json(
        r#"[{"dateTime": "2025-01-01T10:00:00Z", "distance": "20", "mpg": 50},
            {"user": "mallory", "dateTime": "2025-01-02", "distance": 5}]"#,
    )
    .unwrap();
    assert_eq!(engine.import_journeys(rows, Some("ALICE")).await.unwrap(), 2);
    assert_eq!(engine.count_journeys("alice").await.unwrap(), 2);
    assert_eq!(engine.count_journeys("mallory").await.unwrap(), 0);
}

#[tokio::test]
async fn empty_import_is_rejected() {
    let engine = engine_with_alice().await;
    assert_eq!(
        engine.import_journeys(Vec::new(), None).await.unwrap_err(),
        EngineError::Validation("No journeys provided".to_string())
    );
}
