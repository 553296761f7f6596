//! Page renderers.
//!
//! Each renderer is a pure function from catalog data, a cart snapshot and
//! route parameters to a view model. Views carry display-ready strings; the
//! Askama templates in `routes` only lay them out.
//!
//! | path | renderer |
//! |------|----------|
//! | `/` | [`home`] |
//! | `/services` | [`services`] |
//! | `/vfd` | [`vfd`] |
//! | `/parts` | [`parts`] |
//! | `/parts/{id}` | [`part_detail`] |
//! | `/training` | [`training`] |
//! | `/training/{id}` | [`course_detail`] |
//! | `/contact` | [`contact`] |
//! | `/cart` | [`cart`] |
//! | `/checkout` | [`checkout`] |

pub mod cart;
pub mod catalog;
pub mod contact;

pub use cart::{CartLineView, CartView, Checkout, CheckoutForm, CheckoutView, cart, checkout};
pub use catalog::{
    CourseDetailView, HomeQuery, HomeView, ORDER_PLACED_NOTICE, PartDetailView, PartsView,
    ServiceCard, ServicesView, TrainingView, VfdView, course_detail, home, part_detail, parts,
    services, training, vfd,
};
pub use contact::{ContactForm, ContactOutcome, ContactQuery, ContactView, TopicOption, contact};

use fixev_core::{CatalogItem, EmailError};
use thiserror::Error;

/// Result of looking up a detail page by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detail<T> {
    Found(T),
    /// Nothing with that id. Carries the neutral message to show.
    NotFound(&'static str),
}

impl<T> Detail<T> {
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Form input the server refuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please enter your {0}.")]
    Missing(&'static str),

    #[error("Please enter a valid email address.")]
    InvalidEmail(#[from] EmailError),

    #[error("Please choose what the request is about.")]
    UnknownTopic,
}

/// Card for a product or course in a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: String,
    /// SKU for products, duration for courses.
    pub meta: String,
    pub href: String,
}

impl From<&CatalogItem> for ItemCard {
    fn from(item: &CatalogItem) -> Self {
        let (meta, section) = if item.is_course() {
            (item.length().unwrap_or_default().to_string(), "training")
        } else {
            (format!("SKU: {}", item.sku().unwrap_or_default()), "parts")
        };

        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            description: item.description.clone(),
            price: item.price.to_string(),
            meta,
            href: format!("/{section}/{}", item.id),
        }
    }
}

/// Trimmed required text field.
fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Missing(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Trimmed optional text field, `None` when blank.
fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}
