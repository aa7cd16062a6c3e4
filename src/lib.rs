//! Nerview - client and terminal renderer for hosted NER APIs
//!
//! This crate talks to a CellStrat Hub inference endpoint (warm-up and
//! prediction), types the annotation pairs the model returns, and renders
//! them as colored entity badges for the terminal. A small session
//! reducer keeps front-end state changes in one place.
//!
//! # Example
//!
//! ```rust,no_run
//! use nerview::{CallOptions, HubClient};
//!
//! #[tokio::main]
//! async fn main() -> nerview::Result<()> {
//!     let client = HubClient::new("alice/ner-api", "hub-key");
//!
//!     client.warm_up(&CallOptions::new()).await?;
//!
//!     let annotations = client
//!         .predict("Paris is lovely in June", &CallOptions::new())
//!         .await?;
//!     println!("{}", nerview::render::render_line(&annotations));
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use client::{CallOptions, DEFAULT_TIMEOUT, HubClient, WarmupReport};
pub use config::{Config, HUB_URL_PREFIX, Secrets, hub_url};
pub use error::{NerviewError, Result};
pub use session::{Effect, Event, Session, Status};
pub use version::PKG_VERSION;

// Re-export all types
pub use types::{AnnotatedToken, Annotations, EntityLabel, Rgb, UNKNOWN_COLOR};
