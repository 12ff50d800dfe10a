//! Report endpoints

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::report::{InventoryReport, LoanReport, ReportQuery, UsageReport},
};

use super::AdminSession;

/// Copies per shelf and row
#[utoipa::path(
    get,
    path = "/reports/inventory",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inventory report", body = InventoryReport)
    )
)]
pub async fn inventory_report(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
) -> AppResult<Json<InventoryReport>> {
    Ok(Json(state.services.reports.inventory().await?))
}

/// Loans by subject, teacher, student and period
#[utoipa::path(
    get,
    path = "/reports/loans",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Loan report", body = LoanReport)
    )
)]
pub async fn loan_report(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<LoanReport>> {
    Ok(Json(state.services.reports.loans(query.period).await?))
}

/// Usage events by subject, teacher, shift and period, with the page-visit total
#[utoipa::path(
    get,
    path = "/reports/usage",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(ReportQuery),
    responses(
        (status = 200, description = "Usage report", body = UsageReport)
    )
)]
pub async fn usage_report(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<UsageReport>> {
    Ok(Json(state.services.reports.usage(query.period).await?))
}
