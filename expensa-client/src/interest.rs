use std::{cell::Cell, future::Future, rc::Rc};

/// "Still interested" flag owned by a view.
///
/// A screen creates one when it mounts and cancels it when it unmounts.
/// Results of calls wrapped with [`Interest::guard`] that resolve after the
/// cancellation are dropped instead of being applied to a dead view.
#[derive(Debug, Clone)]
pub struct Interest(Rc<Cell<bool>>);

impl Default for Interest {
    fn default() -> Self {
        Self::new()
    }
}

impl Interest {
    #[must_use]
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(true)))
    }

    pub fn cancel(&self) {
        self.0.set(false);
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.get()
    }

    /// Awaits `future` and returns its output only if the interest is still
    /// active once it resolves.
    pub async fn guard<F: Future>(&self, future: F) -> Option<F::Output> {
        let output = future.await;
        self.is_active().then_some(output)
    }
}

impl PartialEq for Interest {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::{channel::oneshot, executor::block_on, join};

    #[test]
    fn active_interest_yields_output() {
        let interest = Interest::new();
        assert_eq!(block_on(interest.guard(async { 7 })), Some(7));
    }

    #[test]
    fn cancellation_during_wait_drops_output() {
        let interest = Interest::new();
        let view = interest.clone();
        let (sender, receiver) = oneshot::channel::<u32>();

        let guarded = interest.guard(async { receiver.await.ok() });
        let teardown = async move {
            view.cancel();
            sender.send(3).ok();
        };

        let (late, ()) = block_on(async { join!(guarded, teardown) });
        assert_eq!(late, None);
        assert!(!interest.is_active());
    }

    #[test]
    fn clones_share_the_flag() {
        let interest = Interest::new();
        let other = interest.clone();
        other.cancel();
        assert!(!interest.is_active());
        assert_eq!(interest, other);
        assert_ne!(interest, Interest::new());
    }
}
