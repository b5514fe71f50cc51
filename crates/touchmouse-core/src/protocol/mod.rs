//! Protocol module containing the text wire codec.

pub mod codec;

pub use codec::{encode_action, WireMessage, CLICK_MESSAGE, MOUSE_PREFIX};
