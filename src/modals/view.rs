//! Typed binding between one dialog and the controller.
//!
//! A dialog only knows its own record type. It asks whether it is visible,
//! reads its record to pre-fill fields, and submits the edited record back.
//! Several views share one controller without knowing about each other.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use super::payload::PayloadFor;
use super::{ModalController, ModalKind, ModalPayload, SubmitError};

/// View of the controller from the dialog that renders `T`
pub struct ModalView<T> {
    controller: ModalController,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for ModalView<T> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for ModalView<T>
where
    T: PayloadFor,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalView").field("kind", &T::KIND).finish()
    }
}

impl<T> ModalView<T>
where
    T: PayloadFor + Clone + Into<ModalPayload>,
{
    pub fn new(controller: &ModalController) -> Self {
        Self {
            controller: controller.clone(),
            _record: PhantomData,
        }
    }

    pub fn kind(&self) -> ModalKind {
        T::KIND
    }

    /// Whether this dialog should render
    pub fn is_open(&self) -> bool {
        self.controller.is_open(T::KIND)
    }

    /// Record to pre-fill the form with, `None` unless this dialog is active
    pub fn record(&self) -> Option<T> {
        self.controller.payload_as::<T>()
    }

    pub fn open(&self, record: T) {
        self.controller.open(record);
    }

    pub fn close(&self) {
        self.controller.close();
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    /// Submit the dialog's current record through `action`
    pub async fn submit<F, Fut, R, E>(&self, action: F) -> Result<R, SubmitError<E>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: fmt::Display,
    {
        let record = self.record().ok_or(SubmitError::NotOpen(T::KIND))?;
        self.controller.submit(move || action(record)).await
    }
}

impl ModalController {
    /// Typed view for the dialog rendering `T`
    pub fn view<T>(&self) -> ModalView<T>
    where
        T: PayloadFor + Clone + Into<ModalPayload>,
    {
        ModalView::new(self)
    }
}
