//! Informational and catalog pages: home, services, VFD, parts, training.

use fixev_core::{CartLine, Catalog, CatalogItem, Service};
use serde::Deserialize;

use super::{Detail, ItemCard};

/// Hero photograph on the home page.
pub const HERO_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1611095564984-8a2b7b4ca0b7?auto=format&fit=crop&w=1200&q=60";

/// `?notice=` value set after a successful checkout.
pub const ORDER_PLACED_NOTICE: &str = "order-placed";

/// Banner shown on the home page after checkout.
pub const ORDER_PLACED_MESSAGE: &str = "Order placed — we will contact you to confirm.";

/// Query string accepted by the home page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HomeQuery {
    pub notice: Option<String>,
    pub reference: Option<String>,
}

/// Service summary card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub highlights: Vec<String>,
}

impl From<&Service> for ServiceCard {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id.to_string(),
            title: service.title.clone(),
            description: service.description.clone(),
            highlights: service.highlights.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HomeView {
    pub hero_image: &'static str,
    pub intro: String,
    pub services: Vec<ServiceCard>,
    pub vfd_bullets: Vec<String>,
    pub products: Vec<ItemCard>,
    pub courses: Vec<ItemCard>,
    /// Confirmation banner, e.g. after an order.
    pub notice: Option<String>,
}

/// Render the home page.
///
/// Unknown notices are ignored. A reference is only echoed when it has the
/// shape of a submission reference (`FX-` followed by eight hex digits).
#[must_use]
pub fn home(catalog: &Catalog, query: &HomeQuery) -> HomeView {
    let notice = match query.notice.as_deref() {
        Some(ORDER_PLACED_NOTICE) => Some(
            match query.reference.as_deref().filter(|r| is_reference(r)) {
                Some(reference) => format!("{ORDER_PLACED_MESSAGE} Reference {reference}."),
                None => ORDER_PLACED_MESSAGE.to_string(),
            },
        ),
        _ => None,
    };

    HomeView {
        hero_image: HERO_IMAGE_URL,
        intro: format!(
            "{} offers workshop and onsite repairs for EV cars, ECU/BCM/module repairs, \
             industrial VFDs, plus parts and certified training for technicians.",
            catalog.company().name
        ),
        services: catalog.services().iter().map(ServiceCard::from).collect(),
        vfd_bullets: catalog.vfd().bullets.clone(),
        products: cards(catalog.products()),
        courses: cards(catalog.courses()),
        notice,
    }
}

fn is_reference(value: &str) -> bool {
    value
        .strip_prefix("FX-")
        .is_some_and(|hex| hex.len() == 8 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

fn cards(items: &[CatalogItem]) -> Vec<ItemCard> {
    items.iter().map(ItemCard::from).collect()
}

#[derive(Debug, Clone)]
pub struct ServicesView {
    pub services: Vec<ServiceCard>,
}

#[must_use]
pub fn services(catalog: &Catalog) -> ServicesView {
    ServicesView {
        services: catalog.services().iter().map(ServiceCard::from).collect(),
    }
}

#[derive(Debug, Clone)]
pub struct VfdView {
    pub title: String,
    pub bullets: Vec<String>,
    pub maintenance: &'static str,
}

#[must_use]
pub fn vfd(catalog: &Catalog) -> VfdView {
    let vfd = catalog.vfd();
    VfdView {
        title: vfd.title.clone(),
        bullets: vfd.bullets.clone(),
        maintenance: "Preventive maintenance and scheduled health checks to reduce downtime for critical systems.",
    }
}

#[derive(Debug, Clone)]
pub struct PartsView {
    pub products: Vec<ItemCard>,
}

#[must_use]
pub fn parts(catalog: &Catalog) -> PartsView {
    PartsView {
        products: cards(catalog.products()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDetailView {
    pub card: ItemCard,
    pub sku: String,
    pub stock: String,
    /// Units of this product already in the cart.
    pub in_cart: u32,
}

/// Render a product page, or the not-found view for an unknown id.
#[must_use]
pub fn part_detail(catalog: &Catalog, lines: &[CartLine], id: &str) -> Detail<PartDetailView> {
    let Some(item) = catalog.product(id) else {
        return Detail::NotFound("Product not found");
    };

    Detail::Found(PartDetailView {
        card: ItemCard::from(item),
        sku: item.sku().unwrap_or_default().to_string(),
        stock: item
            .stock
            .map_or_else(|| "On request".to_string(), |n| n.to_string()),
        in_cart: quantity_in_cart(lines, id),
    })
}

#[derive(Debug, Clone)]
pub struct TrainingView {
    pub courses: Vec<ItemCard>,
}

#[must_use]
pub fn training(catalog: &Catalog) -> TrainingView {
    TrainingView {
        courses: cards(catalog.courses()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDetailView {
    pub card: ItemCard,
    pub length: String,
    pub in_cart: u32,
    /// Contact link with the enrollment topic and course preselected.
    pub enquire_href: String,
}

/// Render a course page, or the not-found view for an unknown id.
#[must_use]
pub fn course_detail(catalog: &Catalog, lines: &[CartLine], id: &str) -> Detail<CourseDetailView> {
    let Some(item) = catalog.course(id) else {
        return Detail::NotFound("Course not found");
    };

    Detail::Found(CourseDetailView {
        card: ItemCard::from(item),
        length: item.length().unwrap_or_default().to_string(),
        in_cart: quantity_in_cart(lines, id),
        enquire_href: format!("/contact?service=training&item={}", item.id),
    })
}

fn quantity_in_cart(lines: &[CartLine], id: &str) -> u32 {
    lines
        .iter()
        .find(|line| line.id().as_str() == id)
        .map_or(0, CartLine::quantity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use fixev_core::{CartEngine, InMemoryCartRepository};

    use super::*;

    #[test]
    fn test_home_lists_everything() {
        let view = home(&Catalog::builtin(), &HomeQuery::default());
        assert_eq!(view.services.len(), 3);
        assert_eq!(view.products.len(), 4);
        assert_eq!(view.courses.len(), 3);
        assert_eq!(view.vfd_bullets.len(), 4);
        assert!(view.intro.starts_with("Fix EV Garage offers"));
        assert!(view.notice.is_none());
    }

    #[test]
    fn test_home_order_notice() {
        let catalog = Catalog::builtin();

        let view = home(
            &catalog,
            &HomeQuery {
                notice: Some("order-placed".to_string()),
                reference: Some("FX-1A2B3C4D".to_string()),
            },
        );
        assert_eq!(
            view.notice.as_deref(),
            Some("Order placed — we will contact you to confirm. Reference FX-1A2B3C4D.")
        );

        let view = home(
            &catalog,
            &HomeQuery {
                notice: Some("order-placed".to_string()),
                reference: Some("<b>hi</b>".to_string()),
            },
        );
        assert_eq!(view.notice.as_deref(), Some(ORDER_PLACED_MESSAGE));

        let view = home(
            &catalog,
            &HomeQuery {
                notice: Some("something-else".to_string()),
                reference: None,
            },
        );
        assert!(view.notice.is_none());
    }

    #[test]
    fn test_services_carry_workshop_highlights() {
        let view = services(&Catalog::builtin());
        assert!(
            view.services
                .iter()
                .all(|s| s.highlights.contains(&"Connector & harness repair".to_string()))
        );
    }

    #[test]
    fn test_part_detail_found_and_missing() {
        let catalog = Catalog::builtin();
        let mut cart = CartEngine::new(InMemoryCartRepository::new());
        cart.add(catalog.product("p4").unwrap(), 2);

        let Detail::Found(view) = part_detail(&catalog, cart.lines(), "p4") else {
            panic!("p4 should exist");
        };
        assert_eq!(view.sku, "HV-KIT");
        assert_eq!(view.stock, "25");
        assert_eq!(view.in_cart, 2);

        assert_eq!(
            part_detail(&catalog, cart.lines(), "p99"),
            Detail::NotFound("Product not found")
        );
        // Courses are not parts.
        assert!(!part_detail(&catalog, cart.lines(), "t1").is_found());
    }

    #[test]
    fn test_unknown_course_leaves_cart_alone() {
        let catalog = Catalog::builtin();
        let mut cart = CartEngine::new(InMemoryCartRepository::new());
        cart.add(catalog.product("p1").unwrap(), 1);
        let before = cart.revision();

        let detail = course_detail(&catalog, cart.lines(), "t99");
        assert_eq!(detail, Detail::NotFound("Course not found"));
        assert_eq!(cart.revision(), before);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_course_detail_links_enrollment() {
        let catalog = Catalog::builtin();
        let Detail::Found(view) = course_detail(&catalog, &[], "t3") else {
            panic!("t3 should exist");
        };
        assert_eq!(view.length, "2 days");
        assert_eq!(view.card.price, "₹9,000");
        assert_eq!(view.enquire_href, "/contact?service=training&item=t3");
        assert_eq!(view.in_cart, 0);
    }
}
