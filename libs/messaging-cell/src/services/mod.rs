pub mod clicksend;
pub mod link;

pub use clicksend::{format_phone, ClickSendClient};
pub use link::MeetingLinkBuilder;
