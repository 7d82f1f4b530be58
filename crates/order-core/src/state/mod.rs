//! State management for orders.
//!
//! This module provides the transition table governing order statuses and
//! the state machine that applies checked transitions to the store.

pub mod order;

pub use order::{allowed_transitions, is_valid_transition, OrderStateMachine};
