use std::sync::{Arc, Mutex, PoisonError};

use windows::core::{Interface, RuntimeType};
use windows::Foundation::{
    AsyncOperationCompletedHandler, AsyncOperationWithProgressCompletedHandler, AsyncStatus,
    IAsyncInfo, IAsyncOperation, IAsyncOperationWithProgress,
};

use crate::tts::engine::{AsyncResult, Continuation};
use crate::{Error, Result};

/// A pending WinRT operation whose completion is reported through a [`Continuation`].
pub struct Operation<T: RuntimeType + 'static>(pub IAsyncOperation<T>);

/// A pending WinRT operation with progress, reported the same way as [`Operation`].
pub struct ProgressOperation<T: RuntimeType + 'static, P: RuntimeType + 'static>(
    pub IAsyncOperationWithProgress<T, P>,
);

type Slot<T> = Arc<Mutex<Option<Continuation<T>>>>;

fn complete<T>(slot: &Slot<T>, result: Result<T>) {
    let then = slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(then) = then {
        then(result);
    }
}

fn outcome<I: Interface, T>(
    op: Option<&I>,
    status: AsyncStatus,
    results: impl FnOnce(&I) -> windows::core::Result<T>,
) -> Result<T> {
    let op = op.ok_or(Error::MissingResult)?;
    match status {
        AsyncStatus::Completed => Ok(results(op)?),
        AsyncStatus::Canceled => Err(Error::Canceled),
        _ => {
            let code = op.cast::<IAsyncInfo>()?.ErrorCode()?;
            Err(windows::core::Error::from(code).into())
        }
    }
}

impl<T: RuntimeType + 'static> AsyncResult<T> for Operation<T> {
    fn on_complete(self, then: Continuation<T>) {
        let slot: Slot<T> = Arc::new(Mutex::new(Some(then)));
        let handler = {
            let slot = slot.clone();
            AsyncOperationCompletedHandler::<T>::new(move |op, status| {
                complete(&slot, outcome(op, status, |op| op.GetResults()));
                Ok(())
            })
        };
        if let Err(err) = self.0.SetCompleted(&handler) {
            complete(&slot, Err(err.into()));
        }
    }
}

impl<T: RuntimeType + 'static, P: RuntimeType + 'static> AsyncResult<T>
    for ProgressOperation<T, P>
{
    fn on_complete(self, then: Continuation<T>) {
        let slot: Slot<T> = Arc::new(Mutex::new(Some(then)));
        let handler = {
            let slot = slot.clone();
            AsyncOperationWithProgressCompletedHandler::<T, P>::new(move |op, status| {
                complete(&slot, outcome(op, status, |op| op.GetResults()));
                Ok(())
            })
        };
        if let Err(err) = self.0.SetCompleted(&handler) {
            complete(&slot, Err(err.into()));
        }
    }
}
