pub mod notifier;

pub use notifier::{DigestEvent, NotificationResult, NotifierPlugin};
