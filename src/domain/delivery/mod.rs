pub mod strategy;

pub use strategy::{DeliveryResult, DeliveryStrategy};
