//! FCM adapter for the push sender port.

mod push_adapter;

pub use push_adapter::{FcmConfig, FcmPushSender};
