//! Teahouse Storefront data layer.
//!
//! This crate provides the client-side state of the storefront as a library:
//! the product catalog (with static fallback when the API is unreachable),
//! the shopping cart, and the locally persisted account/order system.
//!
//! The UI layer on top of this crate is presentation-only; everything that
//! resembles business logic lives here so it can be tested without a screen.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod state;
pub mod storage;
pub mod validation;
