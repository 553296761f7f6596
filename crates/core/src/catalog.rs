//! Catalog store: services, products and training courses.
//!
//! The catalog is built once at startup and never mutated. Products and
//! courses are [`CatalogItem`]s and can be put in a cart; services are
//! informational only.
//!
//! # Sources
//!
//! - [`Catalog::builtin`] - the static data the site ships with
//! - [`Catalog::from_json`] - a replacement catalog file (validated)
//!
//! Every lookup returns `Option`; a missing id is an ordinary outcome that
//! page renderers turn into a not-found view.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Inr, ItemId, ServiceId};

/// Errors raised while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file is not valid catalog JSON.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two items share an id.
    #[error("duplicate catalog id: {0}")]
    DuplicateId(String),

    /// An entry has an empty title.
    #[error("catalog entry {0} has an empty title")]
    EmptyTitle(String),

    /// An item sits in the wrong list (a course among products or vice versa).
    #[error("catalog item {id} must be a {expected}")]
    WrongKind {
        /// Offending item id.
        id: ItemId,
        /// Kind required by the list it appears in.
        expected: &'static str,
    },
}

/// What a catalog item is, with the fields specific to that kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// A part, module or tool.
    Product {
        /// Stock keeping unit shown on listings.
        sku: String,
    },
    /// A training course.
    Course {
        /// Human-readable duration, e.g. "2 days".
        length: String,
    },
}

/// An immutable, priced item that can be added to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Inr,
    /// Display-only stock count; the cart never checks it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl CatalogItem {
    /// SKU for products, `None` for courses.
    #[must_use]
    pub fn sku(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Product { sku } => Some(sku),
            ItemKind::Course { .. } => None,
        }
    }

    /// Course length for courses, `None` for products.
    #[must_use]
    pub fn length(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Course { length } => Some(length),
            ItemKind::Product { .. } => None,
        }
    }

    /// Whether this item is a training course.
    #[must_use]
    pub const fn is_course(&self) -> bool {
        matches!(self.kind, ItemKind::Course { .. })
    }
}

/// A workshop service offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// The industrial drive repair offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VfdService {
    pub title: String,
    pub bullets: Vec<String>,
}

/// Business contact details shown in the header, footer and contact page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub tagline: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub hours: String,
}

/// Read-only catalog of everything the business offers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    company: Company,
    services: Vec<Service>,
    vfd: VfdService,
    products: Vec<CatalogItem>,
    courses: Vec<CatalogItem>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, and a validation
    /// error for duplicate ids, empty titles or items listed under the wrong
    /// kind.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        for product in &self.products {
            if product.is_course() {
                return Err(CatalogError::WrongKind {
                    id: product.id.clone(),
                    expected: "product",
                });
            }
        }
        for course in &self.courses {
            if !course.is_course() {
                return Err(CatalogError::WrongKind {
                    id: course.id.clone(),
                    expected: "course",
                });
            }
        }

        let mut seen = HashSet::new();
        for item in self.items() {
            if item.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle(item.id.to_string()));
            }
            if !seen.insert(item.id.as_str()) {
                return Err(CatalogError::DuplicateId(item.id.to_string()));
            }
        }

        let mut seen = HashSet::new();
        for service in &self.services {
            if service.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle(service.id.to_string()));
            }
            if !seen.insert(service.id.as_str()) {
                return Err(CatalogError::DuplicateId(service.id.to_string()));
            }
        }

        Ok(())
    }

    #[must_use]
    pub const fn company(&self) -> &Company {
        &self.company
    }

    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    #[must_use]
    pub const fn vfd(&self) -> &VfdService {
        &self.vfd
    }

    #[must_use]
    pub fn products(&self) -> &[CatalogItem] {
        &self.products
    }

    #[must_use]
    pub fn courses(&self) -> &[CatalogItem] {
        &self.courses
    }

    /// All cart-addable items: products first, then courses.
    pub fn items(&self) -> impl Iterator<Item = &CatalogItem> {
        self.products.iter().chain(self.courses.iter())
    }

    /// Look up a product by id.
    #[must_use]
    pub fn product(&self, id: &str) -> Option<&CatalogItem> {
        self.products.iter().find(|p| p.id == *id)
    }

    /// Look up a training course by id.
    #[must_use]
    pub fn course(&self, id: &str) -> Option<&CatalogItem> {
        self.courses.iter().find(|c| c.id == *id)
    }

    /// Look up a service by id.
    #[must_use]
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == *id)
    }

    /// Look up any cart-addable item (product or course) by id.
    #[must_use]
    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.items().find(|item| item.id == *id)
    }

    /// The catalog the site ships with.
    #[must_use]
    pub fn builtin() -> Self {
        let workshop = [
            "Bench testing with simulated sensors",
            "Firmware reprogramming & cloning",
            "Connector & harness repair",
        ];

        Self {
            company: Company {
                name: "Fix EV Garage".to_string(),
                tagline: "EV • ECU • BCM • VFD • Training".to_string(),
                email: "service@fixevgarage.example".to_string(),
                phone: "+91 98765 43210".to_string(),
                address: "123 Tech Lane, Industrial Estate, YourCity".to_string(),
                hours: "Mon–Sat 9:00–18:00".to_string(),
            },
            services: vec![
                service(
                    "ev-repair",
                    "EV Car Repair",
                    "High-voltage battery diagnosis, motor/inverter repair, charging & BMS troubleshooting, software updates and ECU flashing.",
                    &workshop,
                ),
                service(
                    "module-repair",
                    "ECM / BCM & Module Repair",
                    "Board-level diagnostics and repair for vehicle controllers, solder/BGA-level fixes, connector repair and firmware recovery.",
                    &workshop,
                ),
                service(
                    "aux-modules",
                    "Chargers & Converters",
                    "Charger repairs, DC–DC converter troubleshooting, CAN bus simulation and bench testing.",
                    &workshop,
                ),
            ],
            vfd: VfdService {
                title: "Industrial VFD Repair".to_string(),
                bullets: [
                    "Power stage & IGBT replacement",
                    "Control board fault repair",
                    "Encoder & feedback loop testing",
                    "Parameter recovery, backup & onsite support",
                ]
                .map(String::from)
                .to_vec(),
            },
            products: vec![
                product("p1", "Refurbished ECM", 6500, "ECM-RF-01", 4),
                product("p2", "VFD 2.2kW (3ph)", 24500, "VFD-2K2", 7),
                product("p3", "OBD-II Advanced Scanner", 12800, "SCAN-ADV", 12),
                product("p4", "HV Connector Kit", 1450, "HV-KIT", 25),
            ],
            courses: vec![
                course("t1", "EV Fundamentals", "2 days", 6000),
                course("t2", "Module Repair & Diagnostics", "3 days", 12500),
                course("t3", "Industrial VFD Repair", "2 days", 9000),
            ],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn service(id: &str, title: &str, description: &str, highlights: &[&str]) -> Service {
    Service {
        id: ServiceId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        highlights: highlights.iter().map(|h| (*h).to_string()).collect(),
    }
}

fn product(id: &str, title: &str, price: u64, sku: &str, stock: u32) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(id),
        title: title.to_string(),
        description: String::new(),
        price: Inr::new(price),
        stock: Some(stock),
        kind: ItemKind::Product {
            sku: sku.to_string(),
        },
    }
}

fn course(id: &str, title: &str, length: &str, price: u64) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(id),
        title: title.to_string(),
        description: "This course includes hands-on bench exercises, safety briefings and an assessed practical test. Certification issued on successful completion.".to_string(),
        price: Inr::new(price),
        stock: None,
        kind: ItemKind::Course {
            length: length.to_string(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.services().len(), 3);
        assert_eq!(catalog.products().len(), 4);
        assert_eq!(catalog.courses().len(), 3);

        let vfd = catalog.product("p2").unwrap();
        assert_eq!(vfd.title, "VFD 2.2kW (3ph)");
        assert_eq!(vfd.price, Inr::new(24500));
        assert_eq!(vfd.sku(), Some("VFD-2K2"));

        assert_eq!(catalog.course("t2").unwrap().length(), Some("3 days"));
        assert!(catalog.service("module-repair").is_some());
    }

    #[test]
    fn test_lookup_miss_is_none() {
        let catalog = Catalog::builtin();
        assert!(catalog.product("p99").is_none());
        assert!(catalog.course("t99").is_none());
        assert!(catalog.course("p1").is_none());
        assert!(catalog.item("").is_none());
    }

    #[test]
    fn test_item_spans_products_and_courses() {
        let catalog = Catalog::builtin();
        assert!(catalog.item("p4").is_some());
        assert!(catalog.item("t3").unwrap().is_course());
        assert_eq!(catalog.items().count(), 7);
    }

    #[test]
    fn test_builtin_passes_validation() {
        let json = serde_json::to_string(&Catalog::builtin()).unwrap();
        let reloaded = Catalog::from_json(&json).unwrap();
        assert_eq!(reloaded.products(), Catalog::builtin().products());
    }

    #[test]
    fn test_from_json_rejects_duplicate_ids() {
        let mut value = serde_json::to_value(Catalog::builtin()).unwrap();
        value["courses"][0]["id"] = serde_json::json!("p1");
        let err = Catalog::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "p1"));
    }

    #[test]
    fn test_from_json_rejects_wrong_kind() {
        let mut value = serde_json::to_value(Catalog::builtin()).unwrap();
        let course = value["courses"][0].clone();
        value["products"]
            .as_array_mut()
            .unwrap()
            .push(course);
        let err = Catalog::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, CatalogError::WrongKind { expected: "product", .. }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Catalog::from_json("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
