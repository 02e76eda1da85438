// GameSense delivery: address discovery, payloads, resilient client

pub mod address;
pub mod client;
pub mod payload;

pub use address::CorePropsLocator;
pub use client::GameSenseClient;
