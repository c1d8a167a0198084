use event_listener::{Event, EventListener};
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cancellable<T> {
    Ready(T),
    Canceled,
}

/// CancellationSignal is a one-shot flag that can be triggered from
/// any thread. All clones share the same flag, so a single cancel is
/// broadcast to every observer.
#[derive(Debug, Clone)]
pub struct CancellationSignal {
    inner: Arc<Inner>,
}

impl Default for CancellationSignal {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationSignal {
    #[inline]
    pub fn new() -> Self {
        CancellationSignal {
            inner: Arc::new(Inner::new()),
        }
    }

    /// Cancel the signal.
    /// Returns true only for the call that performs the transition.
    #[inline]
    pub fn cancel(&self) -> bool {
        self.inner.cancel()
    }

    #[inline]
    pub fn is_canceled(&self) -> bool {
        self.inner.canceled()
    }

    /// Wait until the signal is canceled.
    pub async fn canceled(&self) {
        loop {
            if self.is_canceled() {
                return;
            }
            let listener = self.inner.event.listen();
            // check again to not miss a notification sent before listening.
            if self.is_canceled() {
                return;
            }
            listener.await;
        }
    }

    /// Race given future with the signal.
    /// If both are ready at the same poll, cancellation wins.
    #[inline]
    pub fn select_future<T, F>(&self, fut: F) -> CancellableFuture<F>
    where
        F: Future<Output = T>,
    {
        let listener = self.inner.event.listen();
        let canceled = self.inner.canceled();
        CancellableFuture {
            fut,
            listener,
            canceled,
        }
    }
}

#[derive(Debug)]
struct Inner {
    flag: AtomicBool,
    event: Event,
}

impl Inner {
    #[inline]
    const fn new() -> Self {
        Inner {
            flag: AtomicBool::new(false),
            event: Event::new(),
        }
    }

    #[inline]
    fn canceled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    #[inline]
    fn cancel(&self) -> bool {
        if self
            .flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            log::debug!("cancellation signal triggered");
            self.event.notify(usize::MAX);
            return true;
        }
        false
    }
}

pin_project! {
    pub struct CancellableFuture<F> {
        #[pin]
        fut: F,
        #[pin]
        listener: EventListener,
        canceled: bool,
    }
}

impl<T, F> Future for CancellableFuture<F>
where
    F: Future<Output = T>,
{
    type Output = Cancellable<T>;
    #[inline]
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        if *this.canceled {
            return Poll::Ready(Cancellable::Canceled);
        }
        if this.listener.poll(cx).is_ready() {
            *this.canceled = true;
            return Poll::Ready(Cancellable::Canceled);
        }
        this.fut.poll(cx).map(Cancellable::Ready)
    }
}
