//! Contact form route handlers.
//!
//! Enquiries go to the configured submitter. The cart is only read, for the
//! header badge.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fixev_core::Submission;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::filters;
use crate::nav::Layout;
use crate::pages::{self, ContactForm, ContactOutcome, ContactQuery, ContactView};
use crate::state::AppState;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub layout: Layout,
    pub page: ContactView,
}

async fn render(state: &AppState, form: ContactForm, outcome: ContactOutcome) -> ContactTemplate {
    let cart_count = state.cart().await.item_count();
    ContactTemplate {
        layout: Layout::new(state.catalog(), "/contact", "Contact", cart_count),
        page: pages::contact(state.catalog(), form, outcome),
    }
}

/// Display the contact form.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> impl IntoResponse {
    let form = ContactForm::prefilled(state.catalog(), &query);
    render(&state, form, ContactOutcome::Blank).await
}

/// Send an enquiry.
///
/// POST /contact
///
/// Invalid input re-renders the form with status 400. A submitter failure
/// re-renders it with status 503 and the input kept.
#[instrument(skip(state, form), fields(service = %form.service))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Response {
    let enquiry = match form.validate() {
        Ok(enquiry) => enquiry,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected contact form");
            let outcome = ContactOutcome::Invalid(e.to_string());
            return (StatusCode::BAD_REQUEST, render(&state, form, outcome).await).into_response();
        }
    };

    match state.submitter().submit(&Submission::Enquiry(enquiry)) {
        Ok(receipt) => {
            let reference = receipt.reference.short();
            add_breadcrumb("contact", "Enquiry sent", Some(&[("reference", reference.as_str())]));
            render(&state, ContactForm::default(), ContactOutcome::Sent { reference })
                .await
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit enquiry");
            let outcome = ContactOutcome::Invalid(
                "We could not send your request. Please call us instead.".to_string(),
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                render(&state, form, outcome).await,
            )
                .into_response()
        }
    }
}
