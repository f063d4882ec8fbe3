//! MindSpace Core - Entitlement and Payment Confirmation
//!
//! This crate implements the access-gating core of the MindSpace reflection
//! application: deciding whether a user may start a reflection, tracking the
//! free-tier allowance, interpreting completed reflections, and reconciling
//! Stripe checkout outcomes with the user's access state.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
