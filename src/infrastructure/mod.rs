//! Implementations of the `Api` port: the SOAP client and an in-memory gateway.

pub mod in_memory;
pub mod soap;
