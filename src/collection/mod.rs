pub mod parser;
pub mod types;

// Re-export commonly used types
pub use parser::{ParseError, parse, parse_file};
pub use types::{
    ApiKeyAuth, ApiKeyLocation, Auth, AuthKind, BasicAuth, BearerAuth, Body, BodyMode, Collection,
    Field, Header, Item, Method, Request,
};
