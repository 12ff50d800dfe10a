//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, inventory, loans, reports, reservations, search, usage, visits};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Biblioteca API",
        version = "1.0.0",
        description = "School library front desk REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::logout,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::stream_books,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Loans
        loans::list_loans,
        loans::create_loan,
        loans::stream_loans,
        loans::return_loan,
        loans::list_returns,
        // Usage events
        usage::list_usage_events,
        usage::get_usage_event,
        usage::create_usage_event,
        usage::update_usage_event,
        usage::delete_usage_event,
        // Inventory
        inventory::list_inventory,
        inventory::get_inventory_item,
        inventory::create_inventory_item,
        inventory::update_inventory_item,
        inventory::delete_inventory_item,
        // Reservations
        reservations::create_reservation,
        reservations::list_reservations,
        reservations::stream_reservations,
        reservations::update_reservation_status,
        reservations::delete_reservation,
        // Visits
        visits::record_visit,
        visits::count_visits,
        // Reports
        reports::inventory_report,
        reports::loan_report,
        reports::usage_report,
        // Search
        search::search_books,
        search::list_categories,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::session::AdminIdentity,
            // Enums
            crate::models::enums::Shift,
            crate::models::enums::BorrowerKind,
            crate::models::enums::LoanStatus,
            crate::models::enums::ReservationStatus,
            crate::models::enums::InventoryCategory,
            crate::models::enums::ReportPeriod,
            // Books
            crate::models::book::Book,
            crate::models::book::BookInput,
            // Loans
            crate::models::loan::Borrower,
            crate::models::loan::Loan,
            crate::models::loan::LoanForm,
            crate::models::loan::LoanReturn,
            // Usage events
            crate::models::usage_event::UsageEvent,
            crate::models::usage_event::UsageEventInput,
            // Inventory
            crate::models::inventory_item::InventoryItem,
            crate::models::inventory_item::InventoryItemInput,
            crate::models::inventory_item::InventoryGroup,
            // Reservations
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationForm,
            crate::models::reservation::ReservationFilter,
            crate::models::reservation::StatusUpdate,
            // Visits
            crate::models::page_visit::VisitRequest,
            crate::models::page_visit::VisitResponse,
            crate::models::page_visit::VisitCount,
            // Reports
            crate::models::report::CountEntry,
            crate::models::report::ShelfCount,
            crate::models::report::ShelfRowCount,
            crate::models::report::InventoryReport,
            crate::models::report::LoanReport,
            crate::models::report::UsageReport,
            // Search
            crate::models::remote_book::DownloadKind,
            crate::models::remote_book::DownloadOption,
            crate::models::remote_book::RemoteBook,
            crate::models::remote_book::SearchResults,
            crate::models::remote_book::SearchCategory,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Administrator sessions"),
        (name = "books", description = "Book inventory"),
        (name = "loans", description = "Loans and returns"),
        (name = "usage", description = "Library usage events"),
        (name = "inventory", description = "Equipment inventory"),
        (name = "reservations", description = "Book reservations"),
        (name = "visits", description = "Page-visit tracking"),
        (name = "reports", description = "Reports"),
        (name = "search", description = "Public-domain book search")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
