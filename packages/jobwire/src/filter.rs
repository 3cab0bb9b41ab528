//! Filter engine: a pure function over canonical jobs.
//!
//! Categories AND together; values within one category OR together.
//! Output preserves input order; callers apply their own chronological
//! sort afterward if they need one.

use chrono::{DateTime, Utc};

use crate::types::{FilterSet, Job, SearchTag, TagMode};

/// Postal codes backing the "United States" meta-location.
const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY", "DC",
];

const UNITED_STATES: &str = "United States";

pub fn filter_jobs(jobs: &[Job], filters: &FilterSet) -> Vec<Job> {
    filter_jobs_at(jobs, filters, Utc::now())
}

/// Same as [`filter_jobs`] with an explicit "now" anchoring the time
/// window.
pub fn filter_jobs_at(jobs: &[Job], filters: &FilterSet, now: DateTime<Utc>) -> Vec<Job> {
    jobs.iter()
        .filter(|job| matches(job, filters, now))
        .cloned()
        .collect()
}

fn matches(job: &Job, filters: &FilterSet, now: DateTime<Utc>) -> bool {
    if let Some(window) = filters.time_window {
        // Inclusive boundary: a job exactly at the window edge stays.
        if job.created_at < now - window.duration() {
            return false;
        }
    }

    if !matches_search_tags(job, &filters.search_tags) {
        return false;
    }

    if !filters.location.is_empty()
        && !filters
            .location
            .iter()
            .any(|wanted| location_matches(job.location.as_deref(), wanted))
    {
        return false;
    }

    if !filters.department.is_empty() {
        let matched = job
            .department
            .as_deref()
            .map(|department| filters.department.iter().any(|wanted| wanted == department))
            .unwrap_or(false);
        if !matched {
            return false;
        }
    }

    if let Some(wanted) = &filters.employment_type {
        if job.employment_type.as_deref() != Some(wanted.as_str()) {
            return false;
        }
    }

    if !filters.role_category.is_empty()
        && !filters.role_category.contains(&job.classification.category)
    {
        return false;
    }

    if filters.software_only && !job.classification.is_software_adjacent {
        return false;
    }

    if !filters.company.is_empty() && !filters.company.iter().any(|wanted| wanted == &job.company) {
        return false;
    }

    true
}

/// One lowercased haystack per job: title, department, team, location and
/// tags.
fn searchable_text(job: &Job) -> String {
    let mut text = String::from(job.title.as_str());
    for field in [&job.department, &job.team, &job.location] {
        if let Some(value) = field {
            text.push(' ');
            text.push_str(value);
        }
    }
    for tag in &job.tags {
        text.push(' ');
        text.push_str(tag);
    }
    text.to_lowercase()
}

fn matches_search_tags(job: &Job, tags: &[SearchTag]) -> bool {
    if tags.is_empty() {
        return true;
    }
    let haystack = searchable_text(job);

    let mut has_includes = false;
    let mut include_hit = false;
    for tag in tags {
        let needle = tag.text.to_lowercase();
        match tag.mode {
            TagMode::Include => {
                has_includes = true;
                if haystack.contains(&needle) {
                    include_hit = true;
                }
            }
            TagMode::Exclude => {
                if haystack.contains(&needle) {
                    return false;
                }
            }
        }
    }
    !has_includes || include_hit
}

/// Whether a location reads as United States: any location ending in a
/// two-letter state code, or exactly "remote" (case-insensitive).
pub fn is_united_states_location(location: Option<&str>) -> bool {
    let Some(location) = location else {
        return false;
    };
    let trimmed = location.trim();
    if trimmed.eq_ignore_ascii_case("remote") {
        return true;
    }
    let Some((_, tail)) = trimmed.rsplit_once(',') else {
        return false;
    };
    let code = tail.trim();
    code.len() == 2 && US_STATE_CODES.iter().any(|state| state.eq_ignore_ascii_case(code))
}

fn location_matches(location: Option<&str>, wanted: &str) -> bool {
    if wanted.eq_ignore_ascii_case(UNITED_STATES) {
        return is_united_states_location(location);
    }
    location.map(|value| value == wanted).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::job_fixture;
    use crate::types::{RoleCategory, TimeWindow};
    use chrono::Duration;

    #[test]
    fn test_united_states_meta_location() {
        assert!(is_united_states_location(Some("San Francisco, CA")));
        assert!(is_united_states_location(Some("remote")));
        assert!(is_united_states_location(Some("Remote")));
        assert!(is_united_states_location(Some("Boston, ma")));
        assert!(!is_united_states_location(Some("London, UK")));
        assert!(!is_united_states_location(Some("Berlin")));
        assert!(!is_united_states_location(None));
    }

    #[test]
    fn test_time_window_boundary_inclusive() {
        let now = Utc::now();
        let edge = job_fixture("edge", now - TimeWindow::Day.duration());
        let outside = job_fixture("out", now - TimeWindow::Day.duration() - Duration::seconds(1));

        let filters = FilterSet::new().with_time_window(TimeWindow::Day);
        let kept = filter_jobs_at(&[edge, outside], &filters, now);
        let ids: Vec<&str> = kept.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, ["edge"]);
    }

    #[test]
    fn test_include_and_exclude_tags_apply_together() {
        let now = Utc::now();
        let mut rust = job_fixture("rust", now);
        rust.title = "Rust Engineer".into();
        let mut rust_staff = job_fixture("staff", now);
        rust_staff.title = "Staff Rust Engineer".into();
        let mut go = job_fixture("go", now);
        go.title = "Go Engineer".into();

        let filters = FilterSet::new()
            .with_search_tag(SearchTag::include("rust"))
            .with_search_tag(SearchTag::exclude("staff"));
        let kept = filter_jobs_at(&[rust, rust_staff, go], &filters, now);
        let ids: Vec<&str> = kept.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, ["rust"]);
    }

    #[test]
    fn test_search_includes_tags_and_team() {
        let now = Utc::now();
        let mut tagged = job_fixture("tagged", now);
        tagged.tags = vec!["kubernetes".into()];
        let mut teamed = job_fixture("teamed", now);
        teamed.team = Some("Kubernetes Platform".into());
        let plain = job_fixture("plain", now);

        let filters = FilterSet::new().with_search_tag(SearchTag::include("KUBERNETES"));
        let kept = filter_jobs_at(&[tagged, teamed, plain], &filters, now);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_categories_and_together_values_or_together() {
        let now = Utc::now();
        let mut ny_backend = job_fixture("ny", now);
        ny_backend.location = Some("New York, NY".into());
        ny_backend.classification.category = RoleCategory::Backend;
        let mut sf_frontend = job_fixture("sf", now);
        sf_frontend.location = Some("San Francisco, CA".into());
        sf_frontend.classification.category = RoleCategory::Frontend;
        let mut london_backend = job_fixture("ldn", now);
        london_backend.location = Some("London, UK".into());
        london_backend.classification.category = RoleCategory::Backend;

        // Location OR location, AND role category.
        let filters = FilterSet::new()
            .with_location("New York, NY")
            .with_location("London, UK")
            .with_role_category(RoleCategory::Backend);
        let kept = filter_jobs_at(&[ny_backend, sf_frontend, london_backend], &filters, now);
        let ids: Vec<&str> = kept.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, ["ny", "ldn"]);
    }

    #[test]
    fn test_software_only_and_company() {
        let now = Utc::now();
        let mut software = job_fixture("sw", now);
        software.company = "acme".into();
        let mut not_software = job_fixture("ops", now);
        not_software.company = "acme".into();
        not_software.classification.is_software_adjacent = false;
        let mut other_company = job_fixture("other", now);
        other_company.company = "globex".into();

        let filters = FilterSet::new().software_only().with_company("acme");
        let kept = filter_jobs_at(&[software, not_software, other_company], &filters, now);
        let ids: Vec<&str> = kept.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, ["sw"]);
    }

    #[test]
    fn test_empty_filter_set_keeps_order() {
        let now = Utc::now();
        let jobs = vec![
            job_fixture("3", now - Duration::hours(1)),
            job_fixture("1", now - Duration::hours(9)),
            job_fixture("2", now - Duration::hours(5)),
        ];
        let kept = filter_jobs_at(&jobs, &FilterSet::new(), now);
        let ids: Vec<&str> = kept.iter().map(|job| job.id.as_str()).collect();
        assert_eq!(ids, ["3", "1", "2"]);
    }
}
