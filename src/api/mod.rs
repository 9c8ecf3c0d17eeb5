//! # API Module
//!
//! Business logic of the checkout form, independent from the web layer.
//!
//! ## Modules
//!
//! - [`card`] - Card brand detection and input formatters
//! - [`checkout`] - Form state, change pipeline and submit gate
//! - [`validation`] - Field rules for the checkout form

pub mod card;
pub mod checkout;
pub mod validation;
