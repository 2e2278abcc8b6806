//! Table composition over a realistic project/scan inventory

use chrono::{Duration, TimeZone, Utc};
use posture_core::{
    Asset, AssetKind, AssetStatus, AssetType, FindingCounts, Runner, RunnerStatus, Scan,
    ScanStatus, Visibility,
};
use posture_inventory::{
    AssetFilter, InventoryError, Predicate, RunnerFilter, ScanFilter, ScanStatistics, SortOrder,
    TableQuery,
};
use proptest::prelude::*;

fn project(id: &str, name: &str, visibility: Visibility, risk: f64) -> Asset {
    Asset::new(
        id,
        name,
        AssetKind::Project {
            repository: Some(format!("github.com/acme/{}", name)),
            visibility,
        },
    )
    .with_risk_score(risk)
}

fn inventory() -> Vec<Asset> {
    vec![
        project("p-1", "billing", Visibility::Private, 7.5),
        project("p-2", "website", Visibility::Public, 3.0),
        project("p-3", "billing-legacy", Visibility::Private, 9.1)
            .with_status(AssetStatus::Archived),
        project("p-4", "docs", Visibility::Public, 1.0),
        project("p-5", "billing-api", Visibility::Private, 7.5),
        Asset::domain("d-1", "billing.example.com"),
    ]
}

#[test]
fn test_projects_page() {
    let assets = inventory();
    let risk = |a: &Asset| (a.risk_score.unwrap_or(0.0) * 10.0) as i64;

    let query = TableQuery::new()
        .filter(AssetFilter::new().asset_type(AssetType::Project).status(AssetStatus::Active))
        .filter(AssetFilter::new().visibility(Visibility::Private).search("BILLING"))
        .sort_by(risk, SortOrder::Descending)
        .paginate(1, 10);

    let page = query.run(&assets).unwrap();
    let ids: Vec<_> = page.items.iter().map(|a| a.id.as_str()).collect();

    // Equal risk keeps input order
    assert_eq!(ids, vec!["p-1", "p-5"]);
    assert_eq!(page.total, 2);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn test_walk_all_pages() {
    let assets = inventory();
    let mut seen = Vec::new();
    let mut page_number = 1;

    loop {
        let page = TableQuery::new()
            .sort_by(|a: &Asset| a.id.clone(), SortOrder::Ascending)
            .paginate(page_number, 4)
            .run(&assets)
            .unwrap();
        assert_eq!(page.total, 6);
        assert_eq!(page.total_pages, 2);
        seen.extend(page.items.iter().map(|a| a.id.clone()));
        if !page.has_next() {
            break;
        }
        page_number += 1;
    }

    assert_eq!(seen, vec!["d-1", "p-1", "p-2", "p-3", "p-4", "p-5"]);
}

#[test]
fn test_zero_page_size_rejected() {
    let assets = inventory();
    let err = TableQuery::new().paginate(1, 0).run(&assets).unwrap_err();
    assert_eq!(err, InventoryError::InvalidPageSize(0));
}

#[test]
fn test_scans_and_runners() {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let mut scans = vec![
        Scan::new("perimeter")
            .with_status(ScanStatus::Completed)
            .with_assets(["d-1"])
            .with_window(start, start + Duration::minutes(5))
            .with_findings(FindingCounts {
                high: 2,
                ..Default::default()
            }),
        Scan::new("perimeter-retry").with_status(ScanStatus::Failed),
        Scan::new("repos")
            .with_status(ScanStatus::Completed)
            .with_assets(["p-1", "p-5"])
            .with_window(start, start + Duration::minutes(15)),
    ];
    scans[0].runner_id = Some("r-1".to_string());
    scans[1].runner_id = Some("r-1".to_string());

    let page = TableQuery::new()
        .filter(ScanFilter::new().runner_id("r-1").search("perimeter"))
        .run(&scans)
        .unwrap();
    assert_eq!(page.total, 2);

    let stats = ScanStatistics::from_scans(&scans);
    assert_eq!(stats.success_rate, 66.7);
    assert_eq!(stats.average_duration_secs, Some(600.0));
    assert_eq!(stats.assets_scanned, 3);
    assert_eq!(stats.findings.high, 2);

    let runners = vec![
        Runner::new("r-1", "edge-runner", RunnerStatus::Online, "aws"),
        Runner::new("r-2", "build-box", RunnerStatus::Offline, "self-hosted"),
    ];
    let page = TableQuery::new()
        .filter(RunnerFilter::new().provider("Self-Hosted"))
        .run(&runners)
        .unwrap();
    assert_eq!(page.items[0].id, "r-2");
}

proptest! {
    #[test]
    fn filters_compose_as_intersection(
        scores in prop::collection::vec(0u32..100, 0..50),
        low in 0u32..100,
        high in 0u32..100,
    ) {
        let above = move |s: &u32| *s >= low;
        let below = move |s: &u32| *s <= high;

        let combined = TableQuery::new().filter(above).filter(below).run(&scores).unwrap();
        let expected: Vec<&u32> = scores
            .iter()
            .filter(|s| above.matches(*s) && below.matches(*s))
            .collect();
        prop_assert_eq!(combined.items, expected);
    }

    #[test]
    fn pages_partition_the_filtered_rows(
        scores in prop::collection::vec(0u32..100, 0..60),
        page_size in 1usize..12,
    ) {
        let total = scores.len();
        let pages = total.div_ceil(page_size);
        let mut collected = Vec::new();

        for page in 1..=pages + 1 {
            let result = TableQuery::new()
                .sort_by(|s: &u32| *s, SortOrder::Ascending)
                .paginate(page, page_size)
                .run(&scores)
                .unwrap();
            prop_assert_eq!(result.total, total);
            prop_assert_eq!(result.total_pages, pages);
            prop_assert!(result.items.len() <= page_size);
            collected.extend(result.items.into_iter().copied());
        }

        let mut sorted = scores.clone();
        sorted.sort();
        prop_assert_eq!(collected, sorted);
    }
}
