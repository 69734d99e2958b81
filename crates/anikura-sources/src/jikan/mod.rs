pub mod api;
pub mod client;
pub mod normalize;

pub use client::{JikanClient, PAGE_SIZE};
pub use normalize::normalize;
