use crate::event::InboundMessage;
use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, TryRecvError};

/// Source of new-message notifications.
pub trait InboundTransport {
    /// Returns the next pending notification without blocking.
    fn try_next(&mut self) -> Option<InboundMessage>;
}

impl InboundTransport for Receiver<InboundMessage> {
    fn try_next(&mut self) -> Option<InboundMessage> {
        match self.try_recv() {
            Ok(message) => Some(message),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::debug!("inbound channel disconnected");
                None
            }
        }
    }
}

/// Transport with nothing to deliver.
#[derive(Debug, Default)]
pub struct NoInbound;

impl InboundTransport for NoInbound {
    fn try_next(&mut self) -> Option<InboundMessage> {
        None
    }
}

impl InboundTransport for VecDeque<InboundMessage> {
    fn try_next(&mut self) -> Option<InboundMessage> {
        self.pop_front()
    }
}
