//! Callbacks for decoded inbound traffic.
//!
//! A [`Listener`] is driven by [`Connection::run`](crate::Connection::run).
//! Every callback runs on the connection's read task, one at a time, in the
//! order the frames arrived on the wire.
//!
//! # Deadlock hazard
//!
//! The read loop does not read the next frame until the current callback
//! returns. A listener that blocks waiting for a later message (for example,
//! awaiting the response to a command it just sent from inside `event`) will
//! never see that message. Hand such work off to another task instead.
//!
//! # Example
//!
//! ```
//! use v8debug_client::message::{Event, Response};
//! use v8debug_client::protocol::Headers;
//! use v8debug_client::Listener;
//!
//! #[derive(Default)]
//! struct Printer;
//!
//! impl Listener for Printer {
//!     fn header(&mut self, headers: &Headers) {
//!         println!("handshake: {:?}", headers);
//!     }
//!
//!     fn response(&mut self, response: Response) {
//!         println!("{} -> success={}", response.command, response.success);
//!     }
//!
//!     fn event(&mut self, event: Event) {
//!         println!("event {}", event.name);
//!     }
//! }
//! ```

use serde_json::Value;

use crate::error::DecodeError;
use crate::message::{Event, Response};
use crate::protocol::Headers;

/// Receiver of decoded inbound traffic.
pub trait Listener {
    /// The handshake block, delivered exactly once before any message.
    fn header(&mut self, headers: &Headers);

    /// A response to a previously sent request.
    fn response(&mut self, response: Response);

    /// An event notification.
    fn event(&mut self, event: Event);

    /// A well-formed message whose `type` is neither `response` nor `event`.
    fn unknown(&mut self, message: Value) {
        let _ = message;
    }

    /// A frame body that could not be decoded. The frame is skipped.
    fn decode_error(&mut self, error: &DecodeError) {
        let _ = error;
    }

    /// The read loop has stopped. Called once, whatever the reason.
    fn closed(&mut self) {}
}

impl<L: Listener + ?Sized> Listener for &mut L {
    fn header(&mut self, headers: &Headers) {
        (**self).header(headers)
    }

    fn response(&mut self, response: Response) {
        (**self).response(response)
    }

    fn event(&mut self, event: Event) {
        (**self).event(event)
    }

    fn unknown(&mut self, message: Value) {
        (**self).unknown(message)
    }

    fn decode_error(&mut self, error: &DecodeError) {
        (**self).decode_error(error)
    }

    fn closed(&mut self) {
        (**self).closed()
    }
}

impl<L: Listener + ?Sized> Listener for Box<L> {
    fn header(&mut self, headers: &Headers) {
        (**self).header(headers)
    }

    fn response(&mut self, response: Response) {
        (**self).response(response)
    }

    fn event(&mut self, event: Event) {
        (**self).event(event)
    }

    fn unknown(&mut self, message: Value) {
        (**self).unknown(message)
    }

    fn decode_error(&mut self, error: &DecodeError) {
        (**self).decode_error(error)
    }

    fn closed(&mut self) {
        (**self).closed()
    }
}
