//! Home and informational pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::filters;
use crate::nav::Layout;
use crate::pages::{self, HomeQuery, HomeView, ServicesView, VfdView};
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub page: HomeView,
}

#[derive(Template, WebTemplate)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub layout: Layout,
    pub page: ServicesView,
}

#[derive(Template, WebTemplate)]
#[template(path = "vfd.html")]
pub struct VfdTemplate {
    pub layout: Layout,
    pub page: VfdView,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> impl IntoResponse {
    let cart_count = state.cart().await.item_count();

    HomeTemplate {
        layout: Layout::new(state.catalog(), "/", "", cart_count),
        page: pages::home(state.catalog(), &query),
    }
}

/// Display the services page.
#[instrument(skip(state))]
pub async fn services(State(state): State<AppState>) -> impl IntoResponse {
    let cart_count = state.cart().await.item_count();

    ServicesTemplate {
        layout: Layout::new(state.catalog(), "/services", "Services", cart_count),
        page: pages::services(state.catalog()),
    }
}

/// Display the industrial VFD page.
#[instrument(skip(state))]
pub async fn vfd(State(state): State<AppState>) -> impl IntoResponse {
    let cart_count = state.cart().await.item_count();

    VfdTemplate {
        layout: Layout::new(state.catalog(), "/vfd", "Industrial VFD", cart_count),
        page: pages::vfd(state.catalog()),
    }
}
