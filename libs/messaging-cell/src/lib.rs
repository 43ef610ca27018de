// libs/messaging-cell/src/lib.rs
//! # Messaging Cell
//!
//! Outbound SMS for telehealth reminders: composes the secure video-call
//! invitation for a provider and delivers it through ClickSend.

pub mod error;
pub mod models;
pub mod services;
pub mod traits;

pub use error::MessagingError;
pub use models::SendResult;
pub use services::{format_phone, ClickSendClient, MeetingLinkBuilder};
pub use traits::SmsSender;

#[cfg(any(test, feature = "mocks"))]
pub use traits::MockSmsSender;
