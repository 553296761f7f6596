//! Training route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::filters;
use crate::nav::Layout;
use crate::pages::{self, CourseDetailView, Detail, TrainingView};
use crate::state::AppState;

#[derive(Template, WebTemplate)]
#[template(path = "training/index.html")]
pub struct TrainingIndexTemplate {
    pub layout: Layout,
    pub page: TrainingView,
}

#[derive(Template, WebTemplate)]
#[template(path = "training/show.html")]
pub struct CourseShowTemplate {
    pub layout: Layout,
    pub page: CourseDetailView,
}

/// Display the course grid.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let cart_count = state.cart().await.item_count();

    TrainingIndexTemplate {
        layout: Layout::new(state.catalog(), "/training", "Training", cart_count),
        page: pages::training(state.catalog()),
    }
}

/// Display a course, or the not-found view. Never touches the cart.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let cart = state.cart().await;
    let cart_count = cart.item_count();
    let path = format!("/training/{id}");

    match pages::course_detail(state.catalog(), cart.lines(), &id) {
        Detail::Found(page) => CourseShowTemplate {
            layout: Layout::new(state.catalog(), &path, page.card.title.clone(), cart_count),
            page,
        }
        .into_response(),
        Detail::NotFound(message) => super::not_found(&state, &path, message, cart_count),
    }
}
