//! Orders, enquiries and the pluggable submitter.
//!
//! Contact and checkout forms end in a [`Submission`] handed to a
//! [`Submitter`]. The storefront ships a submitter that only logs; a payment
//! gateway or order-management backend plugs in here without touching the
//! page code.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::cart::CartLine;
use crate::types::{Email, Inr, ItemId};

/// Errors a submitter can report.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// An order with no lines.
    #[error("order has no lines")]
    EmptyOrder,

    /// The receiving side refused the submission.
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// The receiving side could not be reached.
    #[error("submission service unavailable: {0}")]
    Unavailable(String),
}

/// Reference handed back to the customer for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionRef(Uuid);

impl SubmissionRef {
    /// Generate a fresh random reference.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Short uppercase form shown on confirmation pages (`FX-1A2B3C4D`).
    #[must_use]
    pub fn short(&self) -> String {
        let simple = self.0.simple().to_string().to_uppercase();
        format!("FX-{}", simple.get(..8).unwrap_or(&simple))
    }
}

impl core::fmt::Display for SubmissionRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Acknowledgement returned by a submitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub reference: SubmissionRef,
    pub received_at: DateTime<Utc>,
}

impl Receipt {
    /// A receipt stamped now with a fresh reference.
    #[must_use]
    pub fn now() -> Self {
        Self {
            reference: SubmissionRef::generate(),
            received_at: Utc::now(),
        }
    }
}

/// Who is ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: Email,
    pub phone: String,
    /// Delivery or workshop address, optional.
    pub address: Option<String>,
}

/// A cart line frozen into an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: ItemId,
    pub title: String,
    pub unit_price: Inr,
    pub quantity: u32,
    pub line_total: Inr,
}

impl From<&CartLine> for OrderLine {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.id().clone(),
            title: line.item().title.clone(),
            unit_price: line.item().price,
            quantity: line.quantity(),
            line_total: line.line_total(),
        }
    }
}

/// An order built from the cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub customer: CustomerDetails,
    pub lines: Vec<OrderLine>,
    pub subtotal: Inr,
}

impl Order {
    /// Freeze the cart lines into an order.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::EmptyOrder` if `lines` is empty.
    pub fn from_cart(customer: CustomerDetails, lines: &[CartLine]) -> Result<Self, SubmissionError> {
        if lines.is_empty() {
            return Err(SubmissionError::EmptyOrder);
        }
        let lines: Vec<OrderLine> = lines.iter().map(OrderLine::from).collect();
        let subtotal = lines.iter().map(|l| l.line_total).sum();
        Ok(Self {
            customer,
            lines,
            subtotal,
        })
    }

    /// Total number of units ordered.
    #[must_use]
    pub fn unit_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }
}

/// What a contact enquiry is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnquiryTopic {
    #[default]
    EvRepair,
    ModuleRepair,
    Vfd,
    Training,
}

impl EnquiryTopic {
    pub const ALL: [Self; 4] = [Self::EvRepair, Self::ModuleRepair, Self::Vfd, Self::Training];

    /// Form value.
    #[must_use]
    pub const fn value(self) -> &'static str {
        match self {
            Self::EvRepair => "ev-repair",
            Self::ModuleRepair => "module-repair",
            Self::Vfd => "vfd",
            Self::Training => "training",
        }
    }

    /// Option label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EvRepair => "EV Car Repair",
            Self::ModuleRepair => "ECM / BCM Repair",
            Self::Vfd => "Industrial VFD Repair",
            Self::Training => "Training / Enrollment",
        }
    }

    /// Parse a form value, `None` if unknown.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|topic| topic.value() == value)
    }
}

/// A contact / booking request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enquiry {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub topic: EnquiryTopic,
    pub details: String,
}

/// Anything a form can submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Submission {
    Order(Order),
    Enquiry(Enquiry),
}

impl Submission {
    /// Short name used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Order(_) => "order",
            Self::Enquiry(_) => "enquiry",
        }
    }
}

/// Receives submissions. The future order backend implements this.
pub trait Submitter: Send + Sync {
    /// Hand over a submission.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError` if the submission was not accepted; callers
    /// must leave the cart untouched in that case.
    fn submit(&self, submission: &Submission) -> Result<Receipt, SubmissionError>;
}

/// Submitter that keeps everything in memory. Used in tests.
#[derive(Debug, Default)]
pub struct RecordingSubmitter {
    received: Mutex<Vec<Submission>>,
}

impl RecordingSubmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything submitted so far, oldest first.
    #[must_use]
    pub fn received(&self) -> Vec<Submission> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Submitter for RecordingSubmitter {
    fn submit(&self, submission: &Submission) -> Result<Receipt, SubmissionError> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(submission.clone());
        Ok(Receipt::now())
    }
}
