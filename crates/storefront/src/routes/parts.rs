//! Parts & tools route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::filters;
use crate::nav::Layout;
use crate::pages::{self, Detail, PartDetailView, PartsView};
use crate::state::AppState;

/// Product grid template.
#[derive(Template, WebTemplate)]
#[template(path = "parts/index.html")]
pub struct PartsIndexTemplate {
    pub layout: Layout,
    pub page: PartsView,
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "parts/show.html")]
pub struct PartShowTemplate {
    pub layout: Layout,
    pub page: PartDetailView,
}

/// Display the product grid.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let cart_count = state.cart().await.item_count();

    PartsIndexTemplate {
        layout: Layout::new(state.catalog(), "/parts", "Parts & Tools", cart_count),
        page: pages::parts(state.catalog()),
    }
}

/// Display a product, or the not-found view.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let cart = state.cart().await;
    let cart_count = cart.item_count();
    let path = format!("/parts/{id}");

    match pages::part_detail(state.catalog(), cart.lines(), &id) {
        Detail::Found(page) => PartShowTemplate {
            layout: Layout::new(state.catalog(), &path, page.card.title.clone(), cart_count),
            page,
        }
        .into_response(),
        Detail::NotFound(message) => {
            tracing::debug!(id = %id, "Unknown product");
            super::not_found(&state, &path, message, cart_count)
        }
    }
}
