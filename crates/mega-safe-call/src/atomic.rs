use tracing::trace;

use crate::{AtomicUnit, Diagnostics, SafeCallError, SafeCallEvent};

/// Runs `op` inside a fresh checkpoint of `host`.
///
/// On success the checkpoint is committed and the events raised by `op` are delivered to
/// `diagnostics` in order. On failure the checkpoint is reverted and the events are dropped.
pub(crate) fn atomically<H, D, T, F>(
    host: &mut H,
    diagnostics: &mut D,
    op: F,
) -> Result<T, SafeCallError>
where
    H: AtomicUnit + ?Sized,
    D: Diagnostics + ?Sized,
    F: FnOnce(&mut H, &mut Vec<SafeCallEvent>) -> Result<T, SafeCallError>,
{
    let checkpoint = host.checkpoint();
    let mut events = Vec::new();
    match op(host, &mut events) {
        Ok(value) => {
            host.checkpoint_commit(checkpoint);
            for event in events {
                diagnostics.emit(event);
            }
            Ok(value)
        }
        Err(error) => {
            host.checkpoint_revert(checkpoint);
            trace!(target: "mega_safe_call::atomic", discarded_events = events.len(), "reverted");
            Err(error)
        }
    }
}
