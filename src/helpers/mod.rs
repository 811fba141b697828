//! Helper functions shared by the renderers
//!
//! Escaping, box drawing, URL joining and date formatting. Everything here
//! is pure string manipulation.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
