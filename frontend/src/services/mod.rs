pub mod firebase;
pub mod title;

use std::rc::Rc;

use firebase::FirebaseIdentity;

/// App-wide handles shared through a Yew context
#[derive(Clone)]
pub struct AppContext {
    pub identity: Rc<FirebaseIdentity>,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.identity, &other.identity)
    }
}
