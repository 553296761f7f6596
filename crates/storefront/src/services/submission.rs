//! Logging submitter.
//!
//! Stands in for the order-processing backend: every submission is written to
//! the tracing log, recorded as a Sentry breadcrumb and acknowledged with a
//! fresh reference. Nothing leaves the process.

use fixev_core::{Receipt, Submission, SubmissionError, Submitter};

use crate::error::add_breadcrumb;

/// Submitter that logs and acknowledges.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSubmitter;

impl Submitter for LoggingSubmitter {
    fn submit(&self, submission: &Submission) -> Result<Receipt, SubmissionError> {
        let receipt = Receipt::now();
        let reference = receipt.reference.short();

        match submission {
            Submission::Order(order) => {
                if order.lines.is_empty() {
                    return Err(SubmissionError::EmptyOrder);
                }
                tracing::info!(
                    reference = %reference,
                    email = %order.customer.email,
                    lines = order.lines.len(),
                    units = order.unit_count(),
                    subtotal = order.subtotal.rupees(),
                    "Order received"
                );
            }
            Submission::Enquiry(enquiry) => {
                tracing::info!(
                    reference = %reference,
                    email = %enquiry.email,
                    topic = enquiry.topic.value(),
                    "Enquiry received"
                );
            }
        }

        add_breadcrumb(
            "submission",
            "Submission acknowledged",
            Some(&[("kind", submission.kind()), ("reference", &reference)]),
        );

        Ok(receipt)
    }
}
