//! End-to-end aggregation over the mock transport: three companies on
//! three different providers, one of them failing, observed through the
//! progress channel.

use std::sync::Arc;

use serde_json::json;

use jobwire::{
    bucket_jobs_at, filter_jobs_at, Aggregator, ClientRegistry, Company, CompanyStatus,
    FetchOptions, FilterSet, GreenhouseConfig, LeverConfig, MemoryJobCache, ProviderConfig,
    SearchTag, TimeWindow, WorkdayConfig,
};
use jobwire::testing::{MockTransport, StaticClassifier};
use jobwire::JobCache;

const GREENHOUSE_URL: &str = "https://boards-api.greenhouse.io/v1/boards/acme/jobs?content=true";
const LEVER_URL: &str = "https://api.lever.co/v0/postings/globex?mode=json";
const WORKDAY_URL: &str = "https://initech.wd5.myworkdayjobs.com/wday/cxs/initech/External/jobs";

fn roster() -> Vec<Company> {
    vec![
        Company::new("acme", ProviderConfig::Greenhouse(GreenhouseConfig::new("acme"))),
        Company::new("globex", ProviderConfig::Lever(LeverConfig::new("globex"))),
        Company::new(
            "initech",
            ProviderConfig::Workday(
                WorkdayConfig::new("https://initech.wd5.myworkdayjobs.com", "initech", "External")
                    .with_page_size(2),
            ),
        ),
    ]
}

fn healthy_transport() -> MockTransport {
    MockTransport::new()
        .with_json(
            GREENHOUSE_URL,
            json!({"jobs": [
                {"id": 1, "title": "Platform Engineer", "absolute_url": "https://g/1",
                 "offices": [{"name": "New York, NY"}], "departments": [{"name": "Engineering"}]},
                {"id": 2, "title": "Office Manager", "absolute_url": "https://g/2",
                 "location": {"name": "New York, NY"}}
            ]}),
        )
        .with_json(
            LEVER_URL,
            json!([
                {"id": "l1", "text": "Backend Engineer", "hostedUrl": "https://l/1",
                 "categories": {"location": "Denver, CO"}, "workplaceType": "remote"}
            ]),
        )
        .with_json(
            WORKDAY_URL,
            json!({"total": 3, "jobPostings": [
                {"title": "Data Engineer", "externalPath": "/job/de", "postedOn": "Posted Today",
                 "bulletFields": ["REQ-1"]},
                {"title": "Security Engineer", "externalPath": "/job/sec", "postedOn": "Posted Yesterday",
                 "bulletFields": ["REQ-2"]}
            ]}),
        )
        .with_json(
            WORKDAY_URL,
            json!({"total": 0, "jobPostings": [
                {"title": "QA Engineer", "externalPath": "/job/qa", "postedOn": "Posted 3 Days Ago",
                 "bulletFields": ["REQ-3"]}
            ]}),
        )
}

#[tokio::test]
async fn aggregate_isolates_one_failing_provider() {
    let transport = MockTransport::new()
        .with_json(
            GREENHOUSE_URL,
            json!({"jobs": [
                {"id": 1, "title": "A", "absolute_url": "https://g/1"},
                {"id": 2, "title": "B", "absolute_url": "https://g/2"}
            ]}),
        )
        .with_status(LEVER_URL, 500, "internal error")
        .with_json(
            WORKDAY_URL,
            json!({"total": 1, "jobPostings": [
                {"title": "C", "externalPath": "/job/c", "bulletFields": ["REQ-9"]}
            ]}),
        );

    let cache = Arc::new(MemoryJobCache::new());
    let aggregator = Aggregator::new(
        ClientRegistry::new(Arc::new(transport), Arc::new(StaticClassifier::everything())),
        cache.clone(),
        roster(),
    );

    let results = aggregator.fetch_all(FetchOptions::default()).await;

    // Every company reached a terminal state; the failure stayed local.
    let progress = aggregator.progress().borrow().clone();
    assert_eq!(progress.completed, 3);
    assert!(progress.is_finished());
    assert_eq!(progress.company("acme").unwrap().status, CompanyStatus::Success);
    assert_eq!(progress.company("initech").unwrap().status, CompanyStatus::Success);

    let failed = progress.company("globex").unwrap();
    assert_eq!(failed.status, CompanyStatus::Error);
    assert!(failed.error.as_deref().unwrap().contains("500"));

    // Healthy companies' jobs are present; the failed one stored empty.
    assert_eq!(results["acme"].jobs.len(), 2);
    assert_eq!(results["initech"].jobs.len(), 1);
    assert_eq!(results["globex"].jobs.len(), 0);
    assert_eq!(cache.jobs_for("acme").await.unwrap().jobs.len(), 2);
}

#[tokio::test]
async fn aggregate_progress_is_observable_incrementally() {
    let transport = healthy_transport();
    let aggregator = Aggregator::new(
        ClientRegistry::new(Arc::new(transport), Arc::new(StaticClassifier::everything())),
        Arc::new(MemoryJobCache::new()),
        roster(),
    );

    let mut progress_rx = aggregator.progress();
    let results = aggregator.fetch_all(FetchOptions::default()).await;
    assert_eq!(results.len(), 3);

    // The watch channel ends on the terminal snapshot.
    let terminal = progress_rx.borrow_and_update().clone();
    assert_eq!(terminal.completed, 3);
    assert!(terminal
        .companies
        .iter()
        .all(|company| company.status.is_terminal()));
    assert_eq!(terminal.company("initech").unwrap().job_count, Some(3));
}

#[tokio::test]
async fn aggregated_jobs_flow_into_filter_and_histogram() {
    let transport = healthy_transport();
    let cache = Arc::new(MemoryJobCache::new());
    let aggregator = Aggregator::new(
        ClientRegistry::new(
            Arc::new(transport),
            Arc::new(StaticClassifier::with_needles(&["engineer"])),
        ),
        cache.clone(),
        roster(),
    );

    aggregator.fetch_all(FetchOptions::default()).await;
    let all_jobs = cache.all_jobs().await;
    assert_eq!(all_jobs.len(), 6);

    let now = chrono::Utc::now();

    // "Office Manager" is the only non-software title in the roster.
    let software = filter_jobs_at(&all_jobs, &FilterSet::new().software_only(), now);
    assert_eq!(software.len(), 5);

    let security = filter_jobs_at(
        &all_jobs,
        &FilterSet::new()
            .with_search_tag(SearchTag::include("engineer"))
            .with_search_tag(SearchTag::exclude("security")),
        now,
    );
    assert!(security.iter().all(|job| !job.title.contains("Security")));

    // Histogram over the past week: every fetched job is inside the
    // window (the oldest is three days old), and no bucket is dropped.
    let buckets = bucket_jobs_at(&all_jobs, TimeWindow::Week, now);
    let assigned: usize = buckets.iter().map(|bucket| bucket.count).sum();
    assert_eq!(assigned, 6);
    for pair in buckets.windows(2) {
        assert_eq!(pair[0].bucket_end, pair[1].bucket_start);
    }
}
