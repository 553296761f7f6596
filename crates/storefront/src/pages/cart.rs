//! Cart and checkout pages.

use fixev_core::{CartEngine, CartLine, CartRepository, CustomerDetails, Email};
use serde::Deserialize;

use super::{FormError, optional, required};

/// One cart line ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: String,
    pub title: String,
    pub href: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        let item = line.item();
        let section = if item.is_course() { "training" } else { "parts" };
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            href: format!("/{section}/{}", item.id),
            unit_price: item.price.to_string(),
            quantity: line.quantity(),
            line_total: line.line_total().to_string(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// "1 item" / "3 items".
    #[must_use]
    pub fn count_label(&self) -> String {
        let suffix = if self.item_count == 1 { "" } else { "s" };
        format!("{} item{suffix}", self.item_count)
    }
}

/// Render the cart page from the current engine state.
#[must_use]
pub fn cart<R: CartRepository>(engine: &CartEngine<R>) -> CartView {
    CartView {
        lines: engine.lines().iter().map(CartLineView::from).collect(),
        subtotal: engine.subtotal().to_string(),
        item_count: engine.item_count(),
    }
}

/// Checkout form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
}

impl CheckoutForm {
    /// Check the required fields and build the customer record.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in form order.
    pub fn validate(&self) -> Result<CustomerDetails, FormError> {
        let name = required(&self.name, "full name")?;
        let phone = required(&self.phone, "phone number")?;
        required(&self.email, "email address")?;
        let email = Email::parse(&self.email)?;

        Ok(CustomerDetails {
            name,
            email,
            phone,
            address: optional(self.address.as_deref()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutView {
    pub summary: CartView,
    /// Values to refill the form with.
    pub form: CheckoutForm,
    pub error: Option<String>,
}

/// Outcome of rendering the checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Checkout {
    Ready(CheckoutView),
    /// Nothing to check out; callers send the visitor back to the cart.
    EmptyCart,
}

/// Render the checkout page.
#[must_use]
pub fn checkout<R: CartRepository>(
    engine: &CartEngine<R>,
    form: CheckoutForm,
    error: Option<String>,
) -> Checkout {
    if engine.is_empty() {
        return Checkout::EmptyCart;
    }

    Checkout::Ready(CheckoutView {
        summary: cart(engine),
        form,
        error,
    })
}
