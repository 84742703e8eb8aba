use tokio::sync::oneshot;

use crate::utils::error::{ConverterError, Result};

/// Owner side of a cancellable request. Dropping it cancels the request.
#[derive(Debug)]
pub struct CancelHandle {
    _tx: oneshot::Sender<()>,
}

#[derive(Debug)]
pub struct CancelSignal {
    rx: oneshot::Receiver<()>,
}

pub fn cancel_pair() -> (CancelHandle, CancelSignal) {
    let (tx, rx) = oneshot::channel();
    (CancelHandle { _tx: tx }, CancelSignal { rx })
}

impl CancelHandle {
    pub fn cancel(self) {
        drop(self);
    }
}

impl CancelSignal {
    async fn cancelled(self) {
        let _ = self.rx.await;
    }

    /// Run `work` unless the handle goes away first.
    pub async fn guard<F: std::future::Future>(self, work: F) -> Result<F::Output> {
        tokio::select! {
            output = work => Ok(output),
            _ = self.cancelled() => Err(ConverterError::Cancelled),
        }
    }
}
