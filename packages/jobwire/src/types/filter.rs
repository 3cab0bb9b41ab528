//! Filter and time-window inputs. Owned by the caller (UI state); the
//! filter engine only reads them.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::job::RoleCategory;

/// Named duration used both to filter jobs and to pick histogram bucket
/// granularity. Coarser windows use coarser buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl TimeWindow {
    pub fn duration(&self) -> Duration {
        match self {
            TimeWindow::Day => Duration::hours(24),
            TimeWindow::Week => Duration::days(7),
            TimeWindow::Month => Duration::days(30),
            TimeWindow::Quarter => Duration::days(90),
            TimeWindow::Year => Duration::days(365),
        }
    }

    pub fn bucket_size(&self) -> Duration {
        match self {
            TimeWindow::Day => Duration::hours(1),
            TimeWindow::Week => Duration::hours(6),
            TimeWindow::Month => Duration::days(1),
            TimeWindow::Quarter => Duration::days(3),
            TimeWindow::Year => Duration::days(14),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagMode {
    Include,
    Exclude,
}

/// Free-text search term with an include/exclude mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchTag {
    pub text: String,
    pub mode: TagMode,
}

impl SearchTag {
    pub fn include(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: TagMode::Include,
        }
    }

    pub fn exclude(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: TagMode::Exclude,
        }
    }
}

/// Active filters. Absent/empty means no constraint; categories AND
/// together, values within one category OR together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub time_window: Option<TimeWindow>,
    #[serde(default)]
    pub search_tags: Vec<SearchTag>,
    #[serde(default)]
    pub location: Vec<String>,
    #[serde(default)]
    pub department: Vec<String>,
    #[serde(default)]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub role_category: Vec<RoleCategory>,
    #[serde(default)]
    pub software_only: bool,
    #[serde(default)]
    pub company: Vec<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_window(mut self, window: TimeWindow) -> Self {
        self.time_window = Some(window);
        self
    }

    pub fn with_search_tag(mut self, tag: SearchTag) -> Self {
        self.search_tags.push(tag);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location.push(location.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department.push(department.into());
        self
    }

    pub fn with_employment_type(mut self, employment_type: impl Into<String>) -> Self {
        self.employment_type = Some(employment_type.into());
        self
    }

    pub fn with_role_category(mut self, category: RoleCategory) -> Self {
        self.role_category.push(category);
        self
    }

    pub fn software_only(mut self) -> Self {
        self.software_only = true;
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company.push(company.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_serde_names() {
        assert_eq!(serde_json::to_string(&TimeWindow::Day).unwrap(), "\"24h\"");
        assert_eq!(serde_json::to_string(&TimeWindow::Year).unwrap(), "\"1y\"");
        let window: TimeWindow = serde_json::from_str("\"30d\"").unwrap();
        assert_eq!(window, TimeWindow::Month);
    }

    #[test]
    fn test_bucket_size_divides_window() {
        for window in [
            TimeWindow::Day,
            TimeWindow::Week,
            TimeWindow::Month,
            TimeWindow::Quarter,
        ] {
            let buckets =
                window.duration().num_milliseconds() / window.bucket_size().num_milliseconds();
            assert!(buckets > 0);
            assert_eq!(
                window.duration().num_milliseconds() % window.bucket_size().num_milliseconds(),
                0,
                "{window:?} bucket size must divide its window"
            );
        }
    }
}
