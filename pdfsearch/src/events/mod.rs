//! Delivery channels for streaming search events.
//!
//! The orchestrator never talks to a transport directly. It emits
//! [`SearchEvent`](crate::core::SearchEvent)s into a [`DeliveryChannel`]
//! bound to the requesting session, which a socket layer, a CLI or a test
//! can implement.

mod channel;
mod session;

pub use channel::{CollectingChannel, DeliveryChannel, LoggingChannel, NoOpChannel};
pub use session::{SessionChannel, SessionReceiver};
