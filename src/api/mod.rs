//! Typed per-resource wrappers over the gateway.
//!
//! These modules hold no business logic of their own: validation beyond
//! "don't send obviously broken input" and everything stateful (auction
//! settlement, bid ordering, rating aggregation) lives server-side.

pub mod auctions;
pub mod bids;
pub mod chat;
pub mod profiles;
pub mod ratings;
pub mod sales;
pub mod vehicles;

pub use auctions::AuctionsApi;
pub use bids::BidsApi;
pub use chat::{ChatApi, ChatPoller};
pub use profiles::ProfilesApi;
pub use ratings::RatingsApi;
pub use sales::SalesApi;
pub use vehicles::VehiclesApi;
