//! Identity model and the seam to the external identity backend.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Signed-in principal, as reported by the identity backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Snapshot of the sign-in state. `None` means signed out.
pub type Identity = Option<User>;

/// Callback invoked with every identity transition.
pub type Listener = Box<dyn FnMut(Identity)>;

/// Handle returned by [`IdentityService::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Change-notification primitive exposed by an identity backend.
///
/// Implementations must call a freshly registered listener with the current
/// state (either during `subscribe` or shortly after it) and again on every
/// transition until the listener is unsubscribed.
pub trait IdentityService {
    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    /// Removing an id that is not registered is a no-op.
    fn unsubscribe(&self, id: SubscriptionId);
}

impl<S: IdentityService + ?Sized> IdentityService for Rc<S> {
    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        (**self).unsubscribe(id)
    }
}

struct Slot {
    id: SubscriptionId,
    // Taken out while the listener runs so it can re-enter the notifier.
    listener: Option<Listener>,
}

/// In-process identity notifier.
///
/// Keeps the current sign-in state and fans out every change to the
/// registered listeners. New listeners are told the current state right away.
/// A `set_user` made from inside a listener is queued and delivered once the
/// running round finishes, so every listener sees transitions in order.
#[derive(Default)]
pub struct AuthStateNotifier {
    current: RefCell<Identity>,
    slots: RefCell<Vec<Slot>>,
    next_id: Cell<u64>,
    pending: RefCell<VecDeque<Identity>>,
    delivering: Cell<bool>,
}

impl AuthStateNotifier {
    pub fn new(initial: Identity) -> Self {
        Self {
            current: RefCell::new(initial),
            ..Self::default()
        }
    }

    pub fn current(&self) -> Identity {
        self.current.borrow().clone()
    }

    pub fn listener_count(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Record a new sign-in state and notify every listener.
    pub fn set_user(&self, user: Identity) {
        *self.current.borrow_mut() = user.clone();
        self.pending.borrow_mut().push_back(user);

        // The outermost call drains the queue.
        if self.delivering.replace(true) {
            return;
        }

        loop {
            let Some(user) = self.pending.borrow_mut().pop_front() else {
                break;
            };

            let ids: Vec<SubscriptionId> = self.slots.borrow().iter().map(|s| s.id).collect();
            tracing::debug!(
                "Identity changed (signed_in={}), notifying {} listener(s)",
                user.is_some(),
                ids.len()
            );

            for id in ids {
                self.deliver(id, user.clone());
            }
        }

        self.delivering.set(false);
    }

    fn deliver(&self, id: SubscriptionId, user: Identity) {
        let listener = {
            let mut slots = self.slots.borrow_mut();
            match slots.iter_mut().find(|s| s.id == id) {
                Some(slot) => slot.listener.take(),
                None => None,
            }
        };

        let Some(mut listener) = listener else {
            return;
        };

        listener(user);

        // Put it back unless the listener unsubscribed itself.
        let mut slots = self.slots.borrow_mut();
        if let Some(slot) = slots.iter_mut().find(|s| s.id == id) {
            slot.listener = Some(listener);
        }
    }
}

impl IdentityService for AuthStateNotifier {
    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.slots.borrow_mut().push(Slot {
            id,
            listener: Some(listener),
        });

        let current = self.current();
        self.deliver(id, current);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.slots.borrow_mut().retain(|s| s.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brewer() -> User {
        User {
            uid: "uid-1".to_string(),
            email: Some("brewer@example.com".to_string()),
            display_name: None,
        }
    }

    fn recording(log: &Rc<RefCell<Vec<Identity>>>) -> Listener {
        let log = log.clone();
        Box::new(move |user| log.borrow_mut().push(user))
    }

    #[test]
    fn test_subscribe_delivers_current_state() {
        let notifier = AuthStateNotifier::new(Some(brewer()));
        let log = Rc::new(RefCell::new(Vec::new()));

        notifier.subscribe(recording(&log));

        assert_eq!(*log.borrow(), vec![Some(brewer())]);
    }

    #[test]
    fn test_set_user_notifies_until_unsubscribed() {
        let notifier = AuthStateNotifier::new(None);
        let log = Rc::new(RefCell::new(Vec::new()));

        let id = notifier.subscribe(recording(&log));
        notifier.set_user(Some(brewer()));
        notifier.unsubscribe(id);
        notifier.set_user(None);

        assert_eq!(*log.borrow(), vec![None, Some(brewer())]);
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn test_listener_can_unsubscribe_itself() {
        let notifier = Rc::new(AuthStateNotifier::new(None));
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let calls = Rc::new(Cell::new(0));

        let id = {
            let notifier = notifier.clone();
            let own_id = own_id.clone();
            let calls = calls.clone();
            notifier.clone().subscribe(Box::new(move |_| {
                calls.set(calls.get() + 1);
                if let Some(id) = own_id.get() {
                    notifier.unsubscribe(id);
                }
            }))
        };
        own_id.set(Some(id));

        notifier.set_user(Some(brewer()));
        notifier.set_user(None);

        assert_eq!(calls.get(), 2);
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn test_nested_set_user_delivered_in_order() {
        let notifier = Rc::new(AuthStateNotifier::new(None));
        let first_log = Rc::new(RefCell::new(Vec::new()));
        let second_log = Rc::new(RefCell::new(Vec::new()));

        let signed_in = brewer();
        let switched = User {
            uid: "uid-2".to_string(),
            email: None,
            display_name: None,
        };

        {
            let inner = notifier.clone();
            let log = first_log.clone();
            let trigger = signed_in.clone();
            let next = switched.clone();
            notifier.subscribe(Box::new(move |user: Identity| {
                log.borrow_mut().push(user.clone());
                if user.as_ref() == Some(&trigger) {
                    inner.set_user(Some(next.clone()));
                }
            }));
        }
        notifier.subscribe(recording(&second_log));

        notifier.set_user(Some(signed_in.clone()));

        assert_eq!(notifier.current(), Some(switched.clone()));
        assert_eq!(
            *first_log.borrow(),
            vec![None, Some(signed_in.clone()), Some(switched.clone())]
        );
        assert_eq!(
            *second_log.borrow(),
            vec![None, Some(signed_in), Some(switched)]
        );
    }

    #[test]
    fn test_unsubscribe_unknown_id_is_noop() {
        let notifier = AuthStateNotifier::new(None);
        notifier.unsubscribe(SubscriptionId(42));
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn test_user_from_backend_payload() {
        let json = r#"{"uid":"abc","email":"a@b.c","displayName":"Ale","emailVerified":true}"#;
        let user: User = serde_json::from_str(json).unwrap();

        assert_eq!(user.uid, "abc");
        assert_eq!(user.email.as_deref(), Some("a@b.c"));
        assert_eq!(user.display_name.as_deref(), Some("Ale"));
    }
}
