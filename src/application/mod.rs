//! Application layer orchestrating gateway calls.
//!
//! This module defines the `TransactionGateway`, the entry point for looking up
//! transactions and running capture, credit and delete actions against the
//! payment gateway through an injected `Api`.

pub mod gateway;
