//! Aggregate fetch progress, reduced from immutable per-company deltas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-company lifecycle within one aggregate fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    Pending,
    Loading,
    Success,
    Error,
}

impl CompanyStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CompanyStatus::Success | CompanyStatus::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProgress {
    pub company_id: String,
    pub status: CompanyStatus,
    pub job_count: Option<usize>,
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl CompanyProgress {
    fn pending(company_id: String) -> Self {
        Self {
            company_id,
            status: CompanyStatus::Pending,
            job_count: None,
            error: None,
            completed_at: None,
        }
    }
}

/// Delta emitted by one company's fetch future. The reducer owns the
/// progress value; futures never mutate shared state.
#[derive(Debug, Clone)]
pub enum ProgressUpdate {
    Started {
        company_id: String,
    },
    Succeeded {
        company_id: String,
        job_count: usize,
    },
    Failed {
        company_id: String,
        message: String,
    },
}

/// Snapshot of one aggregate fetch. `completed` counts terminal companies
/// and increments exactly once per company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchProgress {
    pub completed: usize,
    pub total: usize,
    pub companies: Vec<CompanyProgress>,
}

impl FetchProgress {
    pub fn new<I, S>(company_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let companies: Vec<CompanyProgress> = company_ids
            .into_iter()
            .map(|id| CompanyProgress::pending(id.into()))
            .collect();
        Self {
            completed: 0,
            total: companies.len(),
            companies,
        }
    }

    pub fn company(&self, company_id: &str) -> Option<&CompanyProgress> {
        self.companies
            .iter()
            .find(|company| company.company_id == company_id)
    }

    pub fn is_finished(&self) -> bool {
        self.completed == self.total
    }

    /// Apply one delta. Deltas for a company already in a terminal state
    /// are ignored, so `completed` can never double-count.
    pub fn apply(&mut self, update: &ProgressUpdate) {
        match update {
            ProgressUpdate::Started { company_id } => {
                if let Some(company) = self.company_mut(company_id) {
                    if !company.status.is_terminal() {
                        company.status = CompanyStatus::Loading;
                    }
                }
            }
            ProgressUpdate::Succeeded {
                company_id,
                job_count,
            } => {
                let mut completed = false;
                if let Some(company) = self.company_mut(company_id) {
                    if !company.status.is_terminal() {
                        company.status = CompanyStatus::Success;
                        company.job_count = Some(*job_count);
                        company.completed_at = Some(Utc::now());
                        completed = true;
                    }
                }
                if completed {
                    self.completed += 1;
                }
            }
            ProgressUpdate::Failed {
                company_id,
                message,
            } => {
                let mut completed = false;
                if let Some(company) = self.company_mut(company_id) {
                    if !company.status.is_terminal() {
                        company.status = CompanyStatus::Error;
                        company.error = Some(message.clone());
                        company.completed_at = Some(Utc::now());
                        completed = true;
                    }
                }
                if completed {
                    self.completed += 1;
                }
            }
        }
    }

    fn company_mut(&mut self, company_id: &str) -> Option<&mut CompanyProgress> {
        self.companies
            .iter_mut()
            .find(|company| company.company_id == company_id)
    }
}
