//! Chat adapters - Implementations of the ChatTransport port.

mod recording_transport;
mod zulip_client;

pub use recording_transport::{RecordingTransport, SentReply};
pub use zulip_client::{ZulipClient, ZulipConfig};
