pub mod body;
pub mod client;
pub mod request;

// Re-export commonly used types
pub use body::{EncodedBody, encode_body};
pub use client::{Client, Outcome};
pub use request::{Credentials, Request};
