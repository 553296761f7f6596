//! Contact and booking page.

use fixev_core::{Catalog, Email, Enquiry, EnquiryTopic};
use serde::Deserialize;

use super::{FormError, required};

/// Acknowledgement shown once an enquiry is accepted.
pub const REQUEST_SENT_MESSAGE: &str = "Request sent — we will contact you.";

/// Map embed shown next to the workshop address.
pub const MAP_EMBED_URL: &str = "https://www.google.com/maps?q=New+Delhi&output=embed";

/// Query string for links that preselect a topic, e.g. from a course page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactQuery {
    pub service: Option<String>,
    /// Catalog id the enquiry is about.
    pub item: Option<String>,
}

/// Contact form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub details: String,
}

impl ContactForm {
    /// Blank form, prefilled from a query string.
    ///
    /// An unknown `service` falls back to the default topic. An `item` that
    /// names a catalog entry seeds the details box.
    #[must_use]
    pub fn prefilled(catalog: &Catalog, query: &ContactQuery) -> Self {
        let topic = query
            .service
            .as_deref()
            .and_then(EnquiryTopic::from_value)
            .unwrap_or_default();

        let details = query
            .item
            .as_deref()
            .and_then(|id| catalog.item(id))
            .map(|item| {
                if item.is_course() {
                    format!("Enrollment: {}", item.title)
                } else {
                    format!("Enquiry about {} ({})", item.title, item.sku().unwrap_or_default())
                }
            })
            .unwrap_or_default();

        Self {
            service: topic.value().to_string(),
            details,
            ..Self::default()
        }
    }

    /// Check the required fields and build the enquiry.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, in form order.
    pub fn validate(&self) -> Result<Enquiry, FormError> {
        let name = required(&self.name, "full name")?;
        required(&self.email, "email address")?;
        let email = Email::parse(&self.email)?;
        let phone = required(&self.phone, "phone number")?;
        let topic = if self.service.trim().is_empty() {
            EnquiryTopic::default()
        } else {
            EnquiryTopic::from_value(self.service.trim()).ok_or(FormError::UnknownTopic)?
        };

        Ok(Enquiry {
            name,
            email,
            phone,
            topic,
            details: self.details.trim().to_string(),
        })
    }
}

/// One `<option>` of the service select.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// What happened to the last submission, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    Blank,
    Sent { reference: String },
    Invalid(String),
}

#[derive(Debug, Clone)]
pub struct ContactView {
    pub form: ContactForm,
    pub topics: Vec<TopicOption>,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub hours: String,
    pub map_url: &'static str,
    pub acknowledgement: Option<String>,
    pub error: Option<String>,
}

/// Render the contact page.
///
/// After a successful send the form is cleared so the same request is not
/// submitted twice by accident.
#[must_use]
pub fn contact(catalog: &Catalog, form: ContactForm, outcome: ContactOutcome) -> ContactView {
    let (form, acknowledgement, error) = match outcome {
        ContactOutcome::Blank => (form, None, None),
        ContactOutcome::Sent { reference } => (
            ContactForm::default(),
            Some(format!("{REQUEST_SENT_MESSAGE} Reference {reference}.")),
            None,
        ),
        ContactOutcome::Invalid(message) => (form, None, Some(message)),
    };

    let selected = EnquiryTopic::from_value(&form.service).unwrap_or_default();
    let topics = EnquiryTopic::ALL
        .into_iter()
        .map(|topic| TopicOption {
            value: topic.value(),
            label: topic.label(),
            selected: topic == selected,
        })
        .collect();

    let company = catalog.company();
    ContactView {
        form,
        topics,
        address: company.address.clone(),
        phone: company.phone.clone(),
        email: company.email.clone(),
        hours: company.hours.clone(),
        map_url: MAP_EMBED_URL,
        acknowledgement,
        error,
    }
}
