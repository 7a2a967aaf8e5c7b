use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use sea_orm::Database;

use engine::{
    BudgetRange, DateRange, Engine, EngineConfig, GraphField, GraphValue, JourneyNewCmd,
    PrimaryInputs, UserSettingsCmd,
};
use migration::MigratorTrait;

async fn engine() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let config = EngineConfig {
        timezone: chrono_tz::UTC,
        ..Default::default()
    };
    let engine = Engine::builder()
        .database(db)
        .config(config)
        .build()
        .await
        .unwrap();
    engine.register_user("alice", "secret").await.unwrap();
    engine
}

/// A journey whose total cost is exactly `distance` (1 mile per litre,
/// 1 per litre).
async fn add(engine: &Engine, at: DateTime<Utc>, distance: f64) {
    let inputs = PrimaryInputs {
        distance,
        mpg: 0.0,
        time_driven: 60.0,
        cost_pl: 1.0,
    };
    engine
        .create_journey(JourneyNewCmd::new("alice", at, inputs))
        .await
        .unwrap();
}

fn wednesday() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap()
}

#[tokio::test]
async fn empty_user_gets_zeros() {
    let engine = engine().await;
    let summary = engine.summary("alice").await.unwrap();
    assert_eq!(summary.total_miles, 0.0);
    let stats = engine.full_stats("nobody", DateRange::default()).await.unwrap();
    assert_eq!(stats.avg_cost_per_mile, 0.0);
    let costs = engine.cost_windows("alice").await.unwrap();
    assert_eq!(costs.three_six_five, 0.0);
}

#[tokio::test]
async fn cost_windows_from_store() {
    let engine = engine().await;
    let now = wednesday();
    add(&engine, now - TimeDelta::days(3), 10.0).await;
    add(&engine, now - TimeDelta::days(10), 20.0).await;

    let costs = engine.cost_windows_at("alice", now).await.unwrap();
    assert_eq!(costs.seven, 10.0);
    assert_eq!(costs.fourteen, 30.0);
}

#[tokio::test]
async fn full_stats_respects_range() {
    let engine = engine().await;
    let now = wednesday();
    add(&engine, now - TimeDelta::days(40), 100.0).await;
    add(&engine, now - TimeDelta::days(5), 10.0).await;
    add(&engine, now, 20.0).await;

    let range = DateRange {
        start: Some(now - TimeDelta::days(10)),
        end: Some(now),
    };
    let stats = engine.full_stats("alice", range).await.unwrap();
    assert_eq!(stats.journeys, 2);
    assert_eq!(stats.total_miles, 30.0);
    assert_eq!(stats.total_cost, 30.0);
    assert_eq!(stats.avg_cost_per_day, 3.0);
    // 1 mile per litre over the default 64 L tank
    assert_eq!(stats.avg_miles_per_tank, 64.0);

    let all = engine.full_stats("alice", DateRange::default()).await.unwrap();
    assert_eq!(all.journeys, 3);
}

#[tokio::test]
async fn full_stats_day_span_uses_requested_end() {
    let engine = engine().await;
    let day = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
    add(&engine, day, 12.0).await;
    add(&engine, day + TimeDelta::days(1) + TimeDelta::hours(18), 6.0).await;

    let range = DateRange {
        start: Some(day),
        end: Some(day + TimeDelta::days(1)),
    };
    let stats = engine.full_stats("alice", range).await.unwrap();
    // the end date covers its whole day, the span stays one day
    assert_eq!(stats.journeys, 2);
    assert_eq!(stats.total_cost, 18.0);
    assert_eq!(stats.avg_cost_per_day, 18.0);
}

#[tokio::test]
async fn budget_disabled_until_enabled() {
    let engine = engine().await;
    let status = engine.budget_at("alice", wednesday()).await.unwrap();
    assert!(!status.enabled);
    assert!(status.period.is_none());
    assert!(!engine.budget("ghost").await.unwrap().enabled);
}

#[tokio::test]
async fn weekly_budget_counts_since_monday() {
    let engine = engine().await;
    engine
        .update_user_settings(UserSettingsCmd::new("alice").budget(BudgetRange::Weekly, 25.0, 1))
        .await
        .unwrap();
    let now = wednesday();
    // previous Sunday, outside the period
    add(&engine, now - TimeDelta::days(3), 50.0).await;
    add(&engine, now - TimeDelta::days(2), 10.0).await;
    add(&engine, now - TimeDelta::hours(1), 20.0).await;

    let status = engine.budget_at("alice", now).await.unwrap();
    assert!(status.enabled);
    let period = status.period.unwrap();
    assert_eq!(
        period.period_start,
        Utc.with_ymd_and_hms(2025, 10, 13, 0, 0, 0).unwrap()
    );
    assert_eq!(period.cost, 30.0);
    assert_eq!(period.over_under, -5.0);
    let cumulative: Vec<f64> = period.journeys.iter().map(|p| p.cumulative).collect();
    assert_eq!(cumulative, vec![10.0, 30.0]);
}

#[tokio::test]
async fn graph_points_are_sorted_and_bounded() {
    let engine = engine().await;
    let base = Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap();
    add(&engine, base + TimeDelta::days(2), 30.0).await;
    add(&engine, base, 10.0).await;
    add(&engine, base + TimeDelta::days(1), 20.0).await;
    add(&engine, base + TimeDelta::days(30), 99.0).await;

    let graph = engine
        .graph(
            "alice",
            Some(base - TimeDelta::hours(9)),
            Some(base + TimeDelta::days(2) - TimeDelta::hours(9)),
            GraphField::Date,
            GraphField::Cost,
        )
        .await
        .unwrap();
    let ys: Vec<GraphValue> = graph.data.iter().map(|p| p.y).collect();
    // end is inclusive through the end of its day
    assert_eq!(
        ys,
        vec![
            GraphValue::Number(10.0),
            GraphValue::Number(20.0),
            GraphValue::Number(30.0)
        ]
    );

    let everything = engine
        .graph("alice", None, None, GraphField::Distance, GraphField::Mpg)
        .await
        .unwrap();
    assert_eq!(everything.data.len(), 4);
    assert_eq!(everything.data[0].x, GraphValue::Number(10.0));
}
