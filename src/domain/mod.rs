//! Domain layer: gateway transactions, their value objects and the gateway port.

pub mod card;
pub mod money;
pub mod ports;
pub mod transaction;
