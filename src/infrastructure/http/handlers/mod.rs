//! HTTP Handlers

mod edge;
mod ping;
mod quote;
mod tryon;
mod websocket;
mod workflow;

pub use edge::*;
pub use ping::*;
pub use quote::*;
pub use tryon::*;
pub use websocket::*;
pub use workflow::*;
