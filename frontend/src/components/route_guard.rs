use std::rc::Rc;

use shared::{GuardOutcome, GuardState, NavigationGuard, NavigationRequest};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;
use crate::services::{title::DocumentTitle, AppContext};

#[derive(Properties, PartialEq)]
pub struct RouteGuardProps {
    pub children: Html,
}

/// Guard progress for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub path: String,
    pub state: GuardState,
}

impl Decision {
    fn pending(path: &str) -> Self {
        Self {
            path: path.to_string(),
            state: GuardState::Pending,
        }
    }

    /// Children render only once the guard allowed this exact location.
    ///
    /// The component instance is reused across routes, so the previous
    /// location's decision is still stored on the first render after a change.
    pub fn allows(&self, path: &str) -> bool {
        self.path == path && self.state == GuardState::Done(GuardOutcome::Allow)
    }
}

/// What to do with a finished guard evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum GuardAction {
    Render,
    Redirect(Route),
    /// A newer navigation started while this one waited.
    Discard,
}

pub fn settle(outcome: GuardOutcome, attempt: u64, latest: u64) -> GuardAction {
    if attempt != latest {
        return GuardAction::Discard;
    }
    match outcome.redirect_path() {
        Some(target) => GuardAction::Redirect(Route::from_path(target)),
        None => GuardAction::Render,
    }
}

/// Runs the login gate on every location change before showing `children`.
#[function_component(RouteGuard)]
pub fn route_guard(props: &RouteGuardProps) -> Html {
    let context = use_context::<AppContext>();
    let location = use_location();
    let navigator = use_navigator();

    let path = location
        .as_ref()
        .map(|l| l.path().to_string())
        .unwrap_or_else(|| shared::ROOT_PATH.to_string());

    let decision = {
        let path = path.clone();
        use_state(move || Decision::pending(&path))
    };
    let attempt = use_mut_ref(|| 0u64);
    let last_path = use_mut_ref(|| Option::<String>::None);

    {
        let decision = decision.clone();

        use_effect_with(path.clone(), move |path| {
            let this_attempt = {
                let mut attempt = attempt.borrow_mut();
                *attempt += 1;
                *attempt
            };
            let from = last_path.replace(Some(path.clone()));
            let request = NavigationRequest::new(path, from.as_deref());
            let path = path.clone();

            match context {
                Some(context) => {
                    decision.set(Decision::pending(&path));
                    let guard = NavigationGuard::new(Rc::clone(&context.identity), DocumentTitle);

                    wasm_bindgen_futures::spawn_local(async move {
                        let outcome = guard.before_each(&request).await;
                        let latest = *attempt.borrow();

                        match (settle(outcome, this_attempt, latest), navigator) {
                            (GuardAction::Discard, _) => {
                                tracing::debug!("Dropping stale guard result for {}", path);
                            }
                            (GuardAction::Render, _) => decision.set(Decision {
                                path,
                                state: GuardState::Done(outcome),
                            }),
                            (GuardAction::Redirect(route), Some(navigator)) => {
                                navigator.replace(&route);
                            }
                            (GuardAction::Redirect(route), None) => {
                                tracing::error!("No router available to redirect to {:?}", route);
                            }
                        }
                    });
                }
                None => {
                    tracing::error!("Identity service missing from context; blocking navigation");
                }
            }
            || ()
        });
    }

    if decision.allows(&path) {
        props.children.clone()
    } else {
        html! {
            <div class="loading">
                <div class="spinner"></div>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(path: &str) -> Decision {
        Decision {
            path: path.to_string(),
            state: GuardState::Done(GuardOutcome::Allow),
        }
    }

    #[test]
    fn test_previous_allow_does_not_cover_new_location() {
        // Signed out, back from /login to /live: /login's decision is still stored.
        let decision = allowed("/login");

        assert!(decision.allows("/login"));
        assert!(!decision.allows("/live"));
    }

    #[test]
    fn test_pending_shows_spinner() {
        let decision = Decision::pending("/history");
        assert!(!decision.allows("/history"));

        let resolved = Decision {
            path: "/history".to_string(),
            state: GuardState::Resolved { signed_in: true },
        };
        assert!(!resolved.allows("/history"));
    }

    #[test]
    fn test_current_attempt_allow_renders() {
        assert_eq!(settle(GuardOutcome::Allow, 3, 3), GuardAction::Render);
    }

    #[test]
    fn test_redirects_map_to_routes() {
        assert_eq!(
            settle(GuardOutcome::RedirectLogin, 1, 1),
            GuardAction::Redirect(Route::Login)
        );
        assert_eq!(
            settle(GuardOutcome::RedirectHome, 1, 1),
            GuardAction::Redirect(Route::Root)
        );
    }

    #[test]
    fn test_superseded_attempt_discarded() {
        for outcome in [
            GuardOutcome::Allow,
            GuardOutcome::RedirectLogin,
            GuardOutcome::RedirectHome,
        ] {
            assert_eq!(settle(outcome, 1, 2), GuardAction::Discard);
        }
    }
}
