//! BroadcastNotificationHandler - Command handler for admin push fan-out.

use std::sync::Arc;

use crate::domain::foundation::{require_admin, CallerIdentity};
use crate::domain::notification::{NotificationError, PushMessage, TargetSegment};
use crate::ports::{PushSender, UserDirectory};

/// Tokens per dispatch request. The push provider caps batch size; the
/// fan-out is chunked rather than issued as one unbounded call.
pub const DISPATCH_CHUNK_SIZE: usize = 500;

/// Command to broadcast a push message to a user segment.
#[derive(Debug, Clone)]
pub struct BroadcastNotificationCommand {
    /// Caller requesting the broadcast; must carry the admin capability.
    pub caller: Option<CallerIdentity>,
    /// Target segment, as sent by the client ("all" / "premium" / "free").
    pub segment: String,
    pub title: String,
    pub body: String,
}

/// Result of a broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastReceipt {
    /// Tokens submitted to the push provider. Delivery confirmation is
    /// the provider's concern, not this core's.
    pub sent_to: usize,
}

/// Handler for the admin notification broadcast.
///
/// Selects the segment, collects push tokens (users without one are
/// silently skipped), and dispatches in bounded chunks. A chunk that
/// fails at the transport level is logged and excluded from the count;
/// the operation only fails outright when every chunk fails.
pub struct BroadcastNotificationHandler {
    users: Arc<dyn UserDirectory>,
    push: Arc<dyn PushSender>,
}

impl BroadcastNotificationHandler {
    pub fn new(users: Arc<dyn UserDirectory>, push: Arc<dyn PushSender>) -> Self {
        Self { users, push }
    }

    pub async fn handle(
        &self,
        cmd: BroadcastNotificationCommand,
    ) -> Result<BroadcastReceipt, NotificationError> {
        // 1. Admission: admin capability required
        require_admin(cmd.caller.as_ref())?;

        // 2. Validate segment and message content
        let segment: TargetSegment = cmd
            .segment
            .parse()
            .map_err(|_| NotificationError::invalid_segment(&cmd.segment))?;
        let message = PushMessage::new(cmd.title, cmd.body)?;

        // 3. Collect delivery tokens; token-less users are skipped
        let users = self.users.users_in_segment(segment).await?;
        let tokens: Vec<String> = users.into_iter().filter_map(|u| u.push_token).collect();

        if tokens.is_empty() {
            tracing::info!(segment = %segment, "no delivery tokens in segment, nothing to send");
            return Ok(BroadcastReceipt { sent_to: 0 });
        }

        // 4. Chunked dispatch with per-chunk error aggregation
        let mut sent_to = 0;
        let mut last_failure = None;
        for chunk in tokens.chunks(DISPATCH_CHUNK_SIZE) {
            match self.push.send(chunk, &message).await {
                Ok(report) => {
                    sent_to += chunk.len();
                    if report.failed > 0 {
                        tracing::warn!(
                            segment = %segment,
                            failed = report.failed,
                            "push provider reported per-token delivery failures"
                        );
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        segment = %segment,
                        chunk_len = chunk.len(),
                        error = %err,
                        "push chunk dispatch failed"
                    );
                    last_failure = Some(err);
                }
            }
        }

        if sent_to == 0 {
            let reason = last_failure
                .map(|err| err.message)
                .unwrap_or_else(|| "all dispatch chunks failed".to_string());
            return Err(NotificationError::dispatch_failed(reason));
        }

        tracing::info!(segment = %segment, sent_to, "notification broadcast dispatched");
        Ok(BroadcastReceipt { sent_to })
    }
}
