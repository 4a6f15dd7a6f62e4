//! One-shot wait for the first identity notification.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;

use crate::identity::{Identity, IdentityService, SubscriptionId};

/// Resolves with the first identity snapshot delivered after subscribing.
///
/// Never fails. If the identity service drops the listener without ever
/// calling it, the future stays pending forever.
#[must_use = "futures do nothing unless awaited"]
pub struct AuthInit {
    rx: oneshot::Receiver<Identity>,
}

impl Future for AuthInit {
    type Output = Identity;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Identity> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(identity)) => Poll::Ready(identity),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Pending,
            Poll::Pending => Poll::Pending,
        }
    }
}

struct WaitState {
    sender: RefCell<Option<oneshot::Sender<Identity>>>,
    id: Cell<Option<SubscriptionId>>,
    fired: Cell<bool>,
}

/// Subscribe to `service`, take the first notification and unsubscribe.
///
/// The listener deregisters itself inside the notification that resolves the
/// wait. When the service notifies synchronously from `subscribe`, the id is
/// not known yet, so deregistration happens as soon as `subscribe` returns.
/// Every call opens its own subscription; nothing is cached.
pub fn wait_for_user_auth_init<S>(service: &Rc<S>) -> AuthInit
where
    S: IdentityService + ?Sized + 'static,
{
    let (tx, rx) = oneshot::channel();
    let state = Rc::new(WaitState {
        sender: RefCell::new(Some(tx)),
        id: Cell::new(None),
        fired: Cell::new(false),
    });

    let listener = {
        let state = state.clone();
        let service = Rc::downgrade(service);
        Box::new(move |identity: Identity| {
            if state.fired.replace(true) {
                return;
            }
            if let (Some(id), Some(service)) = (state.id.get(), service.upgrade()) {
                service.unsubscribe(id);
            }
            if let Some(tx) = state.sender.borrow_mut().take() {
                // Receiver gone means the caller lost interest; nothing to do.
                let _ = tx.send(identity);
            }
        })
    };

    let id = service.subscribe(listener);
    state.id.set(Some(id));
    if state.fired.get() {
        service.unsubscribe(id);
    }

    tracing::trace!("Waiting for first identity notification ({:?})", id);
    AuthInit { rx }
}
