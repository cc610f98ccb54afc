//! Portal Form Bridge
//!
//! Client-side glue for the clinic portal: doctors publish availability
//! slots through a form, patients book them through per-slot buttons. The
//! bridge sends each interaction to the portal API, shows the portal's
//! message and reloads the page when the portal reports success.
//!
//! # Modules
//!
//! - `bridge`: `PortalBridge`, mounted once per page, with the two handlers
//! - `client`: `PortalClient` for `/api/add_slot` and `/api/book_slot/{id}`
//! - `view`: traits and event types the hosting view layer provides
//! - `models`: request and response records
//! - `config`: environment configuration and behaviour switches
//!
//! # Failure reporting
//!
//! A portal reply with a non-success status is shown like any other message.
//! Transport and decode failures are logged and returned to the caller; the
//! user only hears about them when `BridgeOptions::failure_notice` is set.

pub mod bridge;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod view;


// Re-export the main API types for ease of use
pub use bridge::{HandlerOutcome, PortalBridge};
pub use client::PortalClient;
pub use config::{BridgeConfig, BridgeOptions};
pub use error::BridgeError;
pub use models::slot::{BookingRequest, PortalResponse, SlotCreationRequest};
pub use view::{
    BookingControl, ClickEvent, ControlId, PageHandles, PortalView, SlotField, SlotForm,
    SubmitEvent,
};
