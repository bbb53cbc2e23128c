//! Customer email adapters.

mod logging_sender;
mod resend_sender;
mod templates;

pub use logging_sender::LoggingNotificationSender;
pub use resend_sender::ResendNotificationSender;
pub use templates::format_rupiah;
