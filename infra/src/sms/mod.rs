//! SMS delivery implementations

pub mod mock_sms;
#[cfg(feature = "twilio-sms")]
pub mod twilio;

pub use mock_sms::MockSmsSender;
#[cfg(feature = "twilio-sms")]
pub use twilio::{TwilioConfig, TwilioSmsSender};
