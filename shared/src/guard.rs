//! Login gate run before every navigation.

use std::rc::Rc;

use crate::auth_wait::wait_for_user_auth_init;
use crate::identity::IdentityService;
use crate::routes::{resolve, ResolvedRoute, RouteDescriptor, LOGIN_PATH, ROOT_PATH};

/// Terminal decision for one navigation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    RedirectLogin,
    RedirectHome,
}

impl GuardOutcome {
    /// Where the attempt is sent instead, if anywhere.
    pub fn redirect_path(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectLogin => Some(LOGIN_PATH),
            Self::RedirectHome => Some(ROOT_PATH),
        }
    }
}

/// Progress of a single guard evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Pending,
    Resolved { signed_in: bool },
    Done(GuardOutcome),
}

/// One transition attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub to: ResolvedRoute,
    pub from: Option<ResolvedRoute>,
}

impl NavigationRequest {
    pub fn new(to: &str, from: Option<&str>) -> Self {
        Self {
            to: resolve(to),
            from: from.map(resolve),
        }
    }
}

/// Pure gate rule.
///
/// Protected routes need a signed-in user, except the login page itself.
/// A signed-in user asking for the login page is sent home.
pub fn decide(route: &RouteDescriptor, path: &str, signed_in: bool) -> GuardOutcome {
    if route.requires_auth && !signed_in && path != LOGIN_PATH {
        GuardOutcome::RedirectLogin
    } else if path == LOGIN_PATH && signed_in {
        GuardOutcome::RedirectHome
    } else {
        GuardOutcome::Allow
    }
}

/// Visible document title
pub trait TitleSink {
    fn set_title(&self, title: &str);
}

impl<T: TitleSink + ?Sized> TitleSink for Rc<T> {
    fn set_title(&self, title: &str) {
        (**self).set_title(title)
    }
}

pub struct NavigationGuard<S: ?Sized, T> {
    identity: Rc<S>,
    title: T,
}

impl<S, T> NavigationGuard<S, T>
where
    S: IdentityService + ?Sized + 'static,
    T: TitleSink,
{
    pub fn new(identity: Rc<S>, title: T) -> Self {
        Self { identity, title }
    }

    pub async fn before_each(&self, request: &NavigationRequest) -> GuardOutcome {
        self.before_each_with(request, |_| {}).await
    }

    /// Like [`before_each`](Self::before_each), reporting every state change
    /// to `observe`.
    pub async fn before_each_with<F>(
        &self,
        request: &NavigationRequest,
        mut observe: F,
    ) -> GuardOutcome
    where
        F: FnMut(GuardState),
    {
        let to = &request.to;

        // Applied even when the attempt ends up redirected.
        if let Some(name) = to.route.name {
            self.title.set_title(name);
        }

        tracing::debug!(
            "Navigation {} -> {} pending",
            request.from.as_ref().map(|f| f.path.as_str()).unwrap_or("<start>"),
            to.path
        );
        observe(GuardState::Pending);

        let identity = wait_for_user_auth_init(&self.identity).await;
        let signed_in = identity.is_some();
        observe(GuardState::Resolved { signed_in });

        let outcome = decide(to.route, &to.path, signed_in);
        match outcome.redirect_path() {
            Some(target) => tracing::info!(
                "Redirecting {} -> {} (signed_in={})",
                to.path,
                target,
                signed_in
            ),
            None => tracing::debug!("Navigation to {} allowed", to.path),
        }
        observe(GuardState::Done(outcome));

        outcome
    }
}
