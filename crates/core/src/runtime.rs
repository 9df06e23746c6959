//! Running futures to completion from synchronous code.

use tokio::runtime::{Builder as RuntimeBuilder, Handle};

use crate::Error;

/// Drives `future` to completion on a freshly built current-thread
/// runtime that lives only for this call.
///
/// The calling thread must not already be inside a Tokio runtime
/// context (a runtime worker, a task, or a `spawn_blocking` closure).
/// In that case [`Error::NestedRuntime`] is returned and the future is
/// dropped without being polled.
pub fn block_on_dedicated<F: Future>(future: F) -> Result<F::Output, Error> {
    if Handle::try_current().is_ok() {
        warn!("refusing to start a runtime inside another runtime");
        return Err(Error::NestedRuntime);
    }

    let runtime = RuntimeBuilder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)?;
    trace!("driving a future on a dedicated runtime");
    Ok(runtime.block_on(future))
}
