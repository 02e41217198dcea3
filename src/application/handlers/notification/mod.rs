//! Notification handlers - admin-gated push broadcast.

mod broadcast_notification;

pub use broadcast_notification::{
    BroadcastNotificationCommand, BroadcastNotificationHandler, BroadcastReceipt,
    DISPATCH_CHUNK_SIZE,
};
