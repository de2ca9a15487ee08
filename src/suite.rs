//! Smoke suite over the read endpoints.
//!
//! Runs the catalog's smoke data set through the validated calls and records
//! one [`CheckOutcome`] per call. A failing check never stops the run.

use crate::api::{ListQuery, ProductsApi};
use crate::error::HarnessResult;
use crate::logging::scenario_span;
use crate::transport::{ApiResponse, Transport};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Instant;
use tracing::Instrument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
}

/// Result of one smoke check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name: String,
    pub status: CheckStatus,
    /// Error category (see `ErrorKind::category`) when failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

/// Outcomes of a suite run in execution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteReport {
    pub base_url: String,
    /// Unix timestamp (seconds) the run started at
    pub started_at: i64,
    pub checks: Vec<CheckOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.checks
            .iter()
            .filter(|c| c.status == CheckStatus::Passed)
            .count()
    }

    pub fn failed(&self) -> usize {
        self.checks.len() - self.passed()
    }

    pub fn is_success(&self) -> bool {
        !self.checks.is_empty() && self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| c.status == CheckStatus::Failed)
    }
}

async fn run_check<F>(report: &mut SuiteReport, name: &str, check: F)
where
    F: Future<Output = HarnessResult<ApiResponse>>,
{
    let started = Instant::now();
    let result = check.instrument(scenario_span(name)).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let outcome = match result {
        Ok(_) => {
            tracing::info!(check = name, elapsed_ms, "smoke check passed");
            CheckOutcome {
                name: name.to_string(),
                status: CheckStatus::Passed,
                error_kind: None,
                error: None,
                elapsed_ms,
            }
        }
        Err(err) => {
            tracing::warn!(
                check = name,
                error_kind = err.kind().category(),
                error = %err,
                "smoke check failed"
            );
            CheckOutcome {
                name: name.to_string(),
                status: CheckStatus::Failed,
                error_kind: Some(err.kind().category().to_string()),
                error: Some(err.to_string()),
                elapsed_ms,
            }
        }
    };
    report.checks.push(outcome);
}

/// Execute the smoke data set against `api`.
pub async fn run_smoke<T: Transport>(api: &ProductsApi<T>, base_url: &str) -> SuiteReport {
    let data = api.catalog().smoke_data();
    let mut report = SuiteReport {
        base_url: base_url.to_string(),
        started_at: chrono::Utc::now().timestamp(),
        checks: Vec::new(),
    };

    run_check(
        &mut report,
        "get_product_by_id",
        api.get_product_by_id_with_validation(data.product_id),
    )
    .await;
    run_check(
        &mut report,
        "get_products_by_category",
        api.get_products_by_category_with_validation(data.category),
    )
    .await;
    run_check(
        &mut report,
        "search_products",
        api.search_products_with_validation(data.search_term),
    )
    .await;

    let page = ListQuery::from(data.pagination);
    run_check(
        &mut report,
        "paginate_products",
        api.get_all_products_with_validation(&page),
    )
    .await;

    let selected = ListQuery::from(data.pagination).select(data.select_fields);
    run_check(
        &mut report,
        "select_fields",
        api.get_all_products_with_validation(&selected),
    )
    .await;

    run_check(&mut report, "get_categories", api.get_categories_with_validation()).await;
    run_check(&mut report, "get_category_list", api.get_category_list_with_validation()).await;

    tracing::info!(
        passed = report.passed(),
        failed = report.failed(),
        "smoke suite finished"
    );
    report
}
