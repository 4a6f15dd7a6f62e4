use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::route_guard::RouteGuard;
use crate::pages::{history::History, live::Live, login::Login, not_found::NotFound};

#[derive(Clone, Debug, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Root,
    #[at("/login")]
    Login,
    #[at("/live")]
    Live,
    #[at("/history")]
    History,
    #[not_found]
    #[at("/404")]
    NotFound,
}

impl Route {
    /// Map a guard redirect target back onto a route.
    pub fn from_path(path: &str) -> Route {
        Route::recognize(path).unwrap_or(Route::NotFound)
    }
}

pub fn switch(routes: Route) -> Html {
    match routes {
        Route::Root => html! { <Redirect<Route> to={Route::Live} /> },
        Route::Login => html! { <RouteGuard><Login /></RouteGuard> },
        Route::Live => html! { <RouteGuard><Live /></RouteGuard> },
        Route::History => html! { <RouteGuard><History /></RouteGuard> },
        Route::NotFound => html! { <RouteGuard><NotFound /></RouteGuard> },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_redirect_targets_are_routes() {
        assert_eq!(Route::from_path(shared::LOGIN_PATH), Route::Login);
        assert_eq!(Route::from_path(shared::ROOT_PATH), Route::Root);
    }

    #[test]
    fn test_router_paths_agree_with_route_table() {
        for route in [Route::Login, Route::Live, Route::History] {
            let resolved = shared::resolve(&route.to_path());
            assert!(!resolved.route.is_catch_all(), "{:?}", route);
            assert_eq!(resolved.path, route.to_path());
        }
    }
}
