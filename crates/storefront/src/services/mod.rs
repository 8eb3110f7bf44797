//! Services for the storefront.

pub mod email;

pub use email::{EmailError, EmailService, RenderedEmail};
