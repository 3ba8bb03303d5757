//! Route-based message dispatch.
//!
//! Routes are checked in registration order and the first match wins. A route
//! matches on any combination of stream name, topic and message kind, compared
//! case-insensitively. The bot's own messages never match.

use std::sync::Arc;

use super::handlers::MessageHandler;
use crate::ports::{InboundMessage, MessageKind};

/// Conditions under which a handler receives a message.
#[derive(Clone)]
pub struct Route {
    stream: Option<String>,
    topic: Option<String>,
    kind: Option<MessageKind>,
    handler: Arc<dyn MessageHandler>,
}

impl Route {
    /// A route matching every message.
    pub fn new(handler: Arc<dyn MessageHandler>) -> Self {
        Self {
            stream: None,
            topic: None,
            kind: None,
            handler,
        }
    }

    /// Stream messages in the named stream.
    pub fn stream(mut self, name: impl AsRef<str>) -> Self {
        self.stream = Some(fold(name.as_ref()));
        self.kind = Some(MessageKind::Stream);
        self
    }

    pub fn topic(mut self, topic: impl AsRef<str>) -> Self {
        self.topic = Some(fold(topic.as_ref()));
        self
    }

    pub fn kind(mut self, kind: MessageKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn handler(&self) -> &Arc<dyn MessageHandler> {
        &self.handler
    }

    fn matches(&self, message: &InboundMessage) -> bool {
        if self.kind.is_some_and(|kind| kind != message.kind) {
            return false;
        }
        if self.kind == Some(MessageKind::Stream) && message.stream_id.is_none() {
            return false;
        }
        if let Some(stream) = &self.stream {
            if fold(&message.stream_name) != *stream {
                return false;
            }
        }
        if let Some(topic) = &self.topic {
            if fold(&message.topic) != *topic {
                return false;
            }
        }
        true
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("stream", &self.stream)
            .field("topic", &self.topic)
            .field("kind", &self.kind)
            .field("handler", &self.handler.name())
            .finish()
    }
}

/// Ordered route table.
#[derive(Debug, Clone)]
pub struct Router {
    bot_email: String,
    routes: Vec<Route>,
}

impl Router {
    pub fn new(bot_email: impl AsRef<str>) -> Self {
        Self {
            bot_email: fold(bot_email.as_ref()),
            routes: Vec::new(),
        }
    }

    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Handler of the first matching route, or `None` for unrouted messages
    /// and the bot's own.
    pub fn route(&self, message: &InboundMessage) -> Option<&Arc<dyn MessageHandler>> {
        if fold(&message.sender_email) == self.bot_email {
            return None;
        }
        self.routes
            .iter()
            .find(|route| route.matches(message))
            .map(Route::handler)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn fold(value: &str) -> String {
    value.trim().to_lowercase()
}
