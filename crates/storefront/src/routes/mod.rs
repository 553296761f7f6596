//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (optional ?notice=order-placed)
//! GET  /services               - Services & diagnostics
//! GET  /vfd                    - Industrial VFD repair
//! GET  /parts                  - Product grid
//! GET  /parts/{id}             - Product detail
//! GET  /training               - Course grid
//! GET  /training/{id}          - Course detail
//! GET  /contact                - Contact form (optional ?service=&item=)
//! POST /contact                - Send enquiry
//!
//! # Cart (form posts, 303 back to `return_to` or /cart)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add an item
//! POST /cart/update            - Set a line quantity (<= 0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! GET  /checkout               - Checkout form (redirects to /cart when empty)
//! POST /checkout               - Place order, clear cart, redirect home
//!
//! GET  /health                 - Liveness
//! GET  /health/ready           - Cart slot readable
//! ```

pub mod cart;
pub mod contact;
pub mod home;
pub mod parts;
pub mod training;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use fixev_core::CartRepository;

use crate::filters;
use crate::nav::Layout;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/services", get(home::services))
        .route("/vfd", get(home::vfd))
        .route("/parts", get(parts::index))
        .route("/parts/{id}", get(parts::show))
        .route("/training", get(training::index))
        .route("/training/{id}", get(training::show))
        .route("/contact", get(contact::show).post(contact::submit))
        .nest("/cart", cart_routes())
        .route("/checkout", get(cart::checkout).post(cart::place_order))
        .fallback(fallback)
}

/// Not-found page rendered inside the normal layout.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub layout: Layout,
    pub message: &'static str,
}

/// Respond 404 with the neutral not-found view.
pub fn not_found(state: &AppState, path: &str, message: &'static str, cart_count: u32) -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            layout: Layout::new(state.catalog(), path, message, cart_count),
            message,
        },
    )
        .into_response()
}

async fn fallback(State(state): State<AppState>, uri: Uri) -> Response {
    let cart_count = state.cart().await.item_count();
    not_found(&state, uri.path(), "Page not found", cart_count)
}

/// Liveness health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the cart slot cannot be read.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.cart().await.repository().load() {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Cart slot not readable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
