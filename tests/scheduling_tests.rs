//! End-to-end scheduling through the public library API

use std::sync::Arc;

use green_scheduler::carbon_aware::{
    Job, JobRequest, RegionCatalog, Scheduler, SchedulingService, StaticCatalog, Urgency,
};
use green_scheduler::config::Config;
use green_scheduler::history::{export_csv, Analytics, HistoryStore};
use green_scheduler::Error;

const SCENARIO_CATALOG: &str = r#"
[[regions]]
id = "us-west-renewable"
name = "US West (Renewable)"
location = "Oregon, USA"
carbonIntensity = 35.0
cost = 0.12
latency = 45.0
availability = 99.9

[[regions]]
id = "us-east-standard"
name = "US East (Standard)"
location = "Virginia, USA"
carbonIntensity = 380.0
cost = 0.08
latency = 30.0
availability = 99.95
"#;

fn service_with(catalog: RegionCatalog, config: &Config) -> SchedulingService {
    SchedulingService::new(
        Arc::new(StaticCatalog::new(catalog)),
        Scheduler::new(config.scoring.clone(), config.impact.clone()),
        HistoryStore::new(),
    )
}

#[tokio::test]
async fn schedules_two_region_scenario_from_catalog_file() {
    let catalog = RegionCatalog::from_toml_str(SCENARIO_CATALOG).unwrap();
    let service = service_with(catalog, &Config::default());

    let job = Job::try_from(JobRequest {
        name: "scenario".to_string(),
        cpu_usage: 2,
        runtime: 1.0,
        urgency: "medium".to_string(),
    })
    .unwrap();

    let result = service.schedule_job(&job).await.unwrap();
    assert_eq!(result.region.id, "us-west-renewable");
    assert!((result.estimated_energy - 0.6).abs() < 1e-9);
    assert!((result.estimated_co2 - 0.021).abs() < 1e-9);
    assert!((result.estimated_cost - 0.24).abs() < 1e-9);
    assert!((result.carbon_saved - 0.264).abs() < 1e-9);
    assert!((result.trees_equivalent(0.00045) - 0.264 * 0.00045).abs() < 1e-12);
}

#[tokio::test]
async fn rejects_invalid_jobs_without_recording() {
    let service = service_with(RegionCatalog::builtin(), &Config::default());

    let bad_requests = [
        (0, 1.0, "low", "zero cores"),
        (129, 1.0, "low", "too many cores"),
        (4, 0.0, "low", "zero runtime"),
        (4, 1.0, "urgent", "unknown urgency"),
    ];
    for (cpu_usage, runtime, urgency, label) in bad_requests {
        let err = Job::try_from(JobRequest {
            name: "bad".to_string(),
            cpu_usage,
            runtime,
            urgency: urgency.to_string(),
        })
        .unwrap_err();
        assert!(err.is_validation(), "{} should be a validation error", label);
    }

    let unnamed = Job {
        name: String::new(),
        cpu_usage: 4,
        runtime: 1.0,
        urgency: Urgency::Low,
    };
    assert!(service.submit(&unnamed).await.unwrap_err().is_validation());
    assert!(service.history().is_empty().await);
}

#[tokio::test]
async fn empty_catalog_is_reported() {
    let service = service_with(RegionCatalog::from_toml_str("").unwrap(), &Config::default());
    let job = Job::new("lonely", 1, 1.0, Urgency::High).unwrap();
    assert!(matches!(
        service.schedule_job(&job).await,
        Err(Error::EmptyCatalog)
    ));
}

#[tokio::test]
async fn configured_latency_weight_changes_selection() {
    let catalog = RegionCatalog::from_toml_str(SCENARIO_CATALOG).unwrap();
    let job = Job::new("latency-bound", 2, 1.0, Urgency::High).unwrap();

    let stock = service_with(catalog.clone(), &Config::default());
    assert_eq!(
        stock.schedule_job(&job).await.unwrap().region.id,
        "us-west-renewable"
    );

    // Make latency dominate and carbon irrelevant
    let config = Config::from_toml_str(
        r#"
        [scoring]
        carbon_weight = 0.0
        [scoring.latency_weights]
        high = 1000.0
        "#,
    )
    .unwrap();
    let tuned = service_with(catalog, &config);
    assert_eq!(
        tuned.schedule_job(&job).await.unwrap().region.id,
        "us-east-standard"
    );
}

#[tokio::test]
async fn history_feeds_analytics_and_export() {
    let service = service_with(RegionCatalog::builtin(), &Config::default());
    for (name, urgency) in [
        ("nightly", Urgency::Low),
        ("report", Urgency::Medium),
        ("hotfix", Urgency::High),
        ("backfill", Urgency::Low),
    ] {
        let job = Job::new(name, 8, 2.0, urgency).unwrap();
        service.submit(&job).await.unwrap();
    }

    let records = service.history().list_chronological().await;
    let analytics = Analytics::from_records(&records);
    assert_eq!(analytics.totals.jobs, 4);
    assert_eq!(analytics.urgency.len(), 3);
    assert_eq!(analytics.urgency[0].count, 2);
    assert_eq!(analytics.time_series.len(), 4);

    let expected_co2: f64 = records.iter().map(|r| r.estimated_co2).sum();
    assert!((analytics.totals.co2_kg - expected_co2).abs() < 1e-9);

    let csv = export_csv(&service.history().list().await).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("backfill,"));
}
