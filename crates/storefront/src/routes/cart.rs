//! Cart and checkout route handlers.
//!
//! Cart changes are plain form posts answered with `303 See Other`, so the
//! browser lands back on the page it came from with the badge already
//! updated. Each handler holds the cart lock for exactly one change.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use fixev_core::{Order, QuantityUpdate, Submission};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::nav::Layout;
use crate::pages::{self, CartView, Checkout, CheckoutForm, CheckoutView, ORDER_PLACED_NOTICE};
use crate::state::{AppState, SharedCart};

/// Where cart posts land when no usable `return_to` is given.
const CART_PATH: &str = "/cart";

/// Add to cart form data.
///
/// Quantities arrive as raw text so a blank or mistyped number still lands
/// back on a page instead of failing form extraction.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub item_id: String,
    pub quantity: Option<String>,
    pub return_to: Option<String>,
}

impl AddToCartForm {
    /// Requested quantity: 1 when missing or unreadable, 0 for negatives.
    #[must_use]
    pub fn quantity(&self) -> u32 {
        parse_quantity(self.quantity.as_deref())
            .map_or(1, |n| u32::try_from(n.max(0)).unwrap_or(u32::MAX))
    }
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub item_id: String,
    pub quantity: Option<String>,
    pub return_to: Option<String>,
}

/// Signed quantity from a form field; `None` when blank or not a number.
fn parse_quantity(raw: Option<&str>) -> Option<i64> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: String,
    pub return_to: Option<String>,
}

/// Clear cart form data.
#[derive(Debug, Default, Deserialize)]
pub struct ClearCartForm {
    pub return_to: Option<String>,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub page: CartView,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/checkout.html")]
pub struct CheckoutTemplate {
    pub layout: Layout,
    pub page: CheckoutView,
}

/// Redirect target for a cart post: the requested path when it is local,
/// otherwise the cart page.
fn return_path(requested: Option<&str>) -> &str {
    match requested {
        Some(path) if is_local_path(path) => path,
        _ => CART_PATH,
    }
}

fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}

/// Display cart page.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> impl IntoResponse {
    let cart = state.cart().await;

    CartShowTemplate {
        layout: Layout::new(state.catalog(), CART_PATH, "Cart", cart.item_count()),
        page: pages::cart(&*cart),
    }
}

/// Add an item to the cart.
///
/// Unknown ids answer 404 and leave the cart untouched.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let item = state
        .catalog()
        .item(&form.item_id)
        .ok_or_else(|| AppError::NotFound(format!("item {}", form.item_id)))?;

    let quantity = form.quantity();
    let mut cart = state.cart().await;
    cart.add(item, quantity);
    tracing::info!(
        item_id = %form.item_id,
        quantity,
        items = cart.item_count(),
        "Added to cart"
    );
    add_breadcrumb("cart", "Added item", Some(&[("item_id", form.item_id.as_str())]));

    Ok(Redirect::to(return_path(form.return_to.as_deref())))
}

/// Set a line's quantity. Zero or less removes the line; a blank or
/// unreadable quantity leaves the cart as it was.
#[instrument(skip(state))]
pub async fn update(State(state): State<AppState>, Form(form): Form<UpdateCartForm>) -> Redirect {
    let back = Redirect::to(return_path(form.return_to.as_deref()));
    let Some(requested) = parse_quantity(form.quantity.as_deref()) else {
        tracing::debug!(item_id = %form.item_id, "Ignored unreadable cart quantity");
        return back;
    };

    let outcome = state.cart().await.set_quantity(&form.item_id, requested);
    match outcome {
        QuantityUpdate::Updated(quantity) => {
            tracing::info!(item_id = %form.item_id, quantity, "Cart quantity updated");
        }
        QuantityUpdate::Removed => {
            tracing::info!(item_id = %form.item_id, "Cart line removed by quantity");
        }
        QuantityUpdate::NotInCart => {
            tracing::debug!(item_id = %form.item_id, "Quantity update for item not in cart");
        }
    }

    back
}

/// Remove a line. Removing an absent id is a no-op.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Form(form): Form<RemoveFromCartForm>,
) -> Redirect {
    if state.cart().await.remove(&form.item_id) {
        tracing::info!(item_id = %form.item_id, "Removed from cart");
        add_breadcrumb("cart", "Removed item", Some(&[("item_id", form.item_id.as_str())]));
    }

    Redirect::to(return_path(form.return_to.as_deref()))
}

/// Empty the cart.
#[instrument(skip(state))]
pub async fn clear(State(state): State<AppState>, Form(form): Form<ClearCartForm>) -> Redirect {
    state.cart().await.clear();
    tracing::info!("Cart cleared");

    Redirect::to(return_path(form.return_to.as_deref()))
}

fn render_checkout(
    state: &AppState,
    cart: &SharedCart,
    form: CheckoutForm,
    error: Option<String>,
    status: StatusCode,
) -> Response {
    match pages::checkout(cart, form, error) {
        Checkout::EmptyCart => Redirect::to(CART_PATH).into_response(),
        Checkout::Ready(page) => (
            status,
            CheckoutTemplate {
                layout: Layout::new(state.catalog(), "/checkout", "Checkout", cart.item_count()),
                page,
            },
        )
            .into_response(),
    }
}

/// Display the checkout form, or send an empty cart back to `/cart`.
#[instrument(skip(state))]
pub async fn checkout(State(state): State<AppState>) -> Response {
    let cart = state.cart().await;
    render_checkout(&state, &cart, CheckoutForm::default(), None, StatusCode::OK)
}

/// Place the order.
///
/// On success the cart is cleared and the browser is sent home with the
/// order-placed notice. Invalid input or a failed submission re-renders the
/// form and leaves the cart as it was.
#[instrument(skip(state, form))]
pub async fn place_order(
    State(state): State<AppState>,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let mut cart = state.cart().await;
    if cart.is_empty() {
        return Redirect::to(CART_PATH).into_response();
    }

    let customer = match form.validate() {
        Ok(customer) => customer,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected checkout form");
            let message = e.to_string();
            return render_checkout(&state, &cart, form, Some(message), StatusCode::BAD_REQUEST);
        }
    };

    let order = match Order::from_cart(customer, cart.lines()) {
        Ok(order) => order,
        Err(e) => return AppError::from(e).into_response(),
    };
    let subtotal = order.subtotal;

    match state.submitter().submit(&Submission::Order(order)) {
        Ok(receipt) => {
            let reference = receipt.reference.short();
            cart.clear();
            tracing::info!(reference = %reference, subtotal = subtotal.rupees(), "Order placed");
            add_breadcrumb("checkout", "Order placed", Some(&[("reference", reference.as_str())]));

            Redirect::to(&format!("/?notice={ORDER_PLACED_NOTICE}&reference={reference}"))
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to submit order");
            render_checkout(
                &state,
                &cart,
                form,
                Some("We could not place your order. Please try again or call us.".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_form(quantity: Option<&str>) -> AddToCartForm {
        AddToCartForm {
            item_id: "p1".to_string(),
            quantity: quantity.map(str::to_string),
            return_to: None,
        }
    }

    #[test]
    fn test_parse_quantity_ignores_blank_and_garbage() {
        assert_eq!(parse_quantity(Some(" 4 ")), Some(4));
        assert_eq!(parse_quantity(Some("-2")), Some(-2));
        assert_eq!(parse_quantity(Some("")), None);
        assert_eq!(parse_quantity(Some("two")), None);
        assert_eq!(parse_quantity(None), None);
    }

    #[test]
    fn test_add_quantity_defaults_to_one() {
        assert_eq!(add_form(None).quantity(), 1);
        assert_eq!(add_form(Some("")).quantity(), 1);
        assert_eq!(add_form(Some("abc")).quantity(), 1);
        assert_eq!(add_form(Some("3")).quantity(), 3);
        assert_eq!(add_form(Some("-5")).quantity(), 0);
    }

    #[test]
    fn test_return_path_accepts_local_paths() {
        assert_eq!(return_path(Some("/parts")), "/parts");
        assert_eq!(return_path(Some("/parts/p2")), "/parts/p2");
    }

    #[test]
    fn test_return_path_rejects_everything_else() {
        for requested in [
            None,
            Some(""),
            Some("parts"),
            Some("//evil.example"),
            Some("https://evil.example/"),
            Some("/\\evil.example"),
            Some("/parts\r\nSet-Cookie: x=1"),
        ] {
            assert_eq!(return_path(requested), "/cart", "{requested:?}");
        }
    }
}
