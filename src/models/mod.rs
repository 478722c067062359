mod client;
mod delivery;

pub use client::{Client, ClientChanges, ClientView, NewClient};
pub use delivery::DeliveryStatus;
