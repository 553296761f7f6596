//! Navigation shell: header entries, active-section matching and the layout
//! data every page template extends.

use fixev_core::Catalog;

/// Header navigation entries as `(label, target)`.
pub const NAV_ENTRIES: [(&str, &str); 5] = [
    ("Services", "/services"),
    ("Industrial VFD", "/vfd"),
    ("Parts & Tools", "/parts"),
    ("Training", "/training"),
    ("Contact", "/contact"),
];

/// Whether `current` lies in the section rooted at `target`.
///
/// Matches on whole path segments: `/parts/p2` is inside `/parts`, while
/// `/partsfoo` is not. A trailing slash on `current` is ignored.
#[must_use]
pub fn is_active(current: &str, target: &str) -> bool {
    let current = match current.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => current,
    };

    if target == "/" {
        return current == "/";
    }

    current
        .strip_prefix(target)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// One rendered navigation link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Navigation links for a request path.
#[must_use]
pub fn nav_items(current: &str) -> Vec<NavItem> {
    NAV_ENTRIES
        .iter()
        .map(|&(label, href)| NavItem {
            label,
            href,
            active: is_active(current, href),
        })
        .collect()
}

/// Data shared by every page: header, navigation, cart badge and footer.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub company_name: String,
    pub tagline: String,
    pub phone: String,
    pub email: String,
    pub nav: Vec<NavItem>,
    /// Units in the cart; the badge is hidden at zero.
    pub cart_count: u32,
}

impl Layout {
    /// Build the layout for a page at `path`.
    #[must_use]
    pub fn new(catalog: &Catalog, path: &str, title: impl Into<String>, cart_count: u32) -> Self {
        let company = catalog.company();
        Self {
            title: title.into(),
            company_name: company.name.clone(),
            tagline: company.tagline.clone(),
            phone: company.phone.clone(),
            email: company.email.clone(),
            nav: nav_items(path),
            cart_count,
        }
    }

    /// Browser title: page title followed by the company name.
    #[must_use]
    pub fn document_title(&self) -> String {
        if self.title.is_empty() {
            self.company_name.clone()
        } else {
            format!("{} | {}", self.title, self.company_name)
        }
    }

    /// Whether the header should show the cart badge.
    #[must_use]
    pub const fn show_cart_badge(&self) -> bool {
        self.cart_count > 0
    }
}
