//! Fix EV Garage Core - catalog and cart library.
//!
//! This crate provides the domain model shared by the storefront binary and
//! its tests:
//! - [`catalog`] - Services, products and training courses
//! - [`cart`] - The cart engine (add, remove, set quantity, clear, subtotal)
//! - [`repository`] - The persistence slot the cart engine writes through
//! - [`submission`] - Orders and enquiries handed to a pluggable submitter
//!
//! # Architecture
//!
//! The core crate contains types, traits and pure logic only. No HTTP, no
//! filesystem access. Storage and submission are traits so the storefront can
//! plug in a file-backed slot and a logging submitter while tests use
//! in-memory fakes.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod repository;
pub mod submission;
pub mod types;

pub use cart::{CartEngine, CartLine, CartObserver, QuantityUpdate};
pub use catalog::{Catalog, CatalogError, CatalogItem, Company, ItemKind, Service, VfdService};
pub use repository::{CART_STORAGE_KEY, CartRepository, InMemoryCartRepository, StorageError};
pub use submission::{
    CustomerDetails, Enquiry, EnquiryTopic, Order, OrderLine, Receipt, RecordingSubmitter,
    Submission, SubmissionError, SubmissionRef, Submitter,
};
pub use types::*;
