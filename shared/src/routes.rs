//! Static route table for the dashboard.

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const CATCH_ALL_PATH: &str = "/:catchAll(.*)";

/// Opaque handle for a view. Rendering is done by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Login,
    Live,
    History,
    NotFound,
}

/// One declared path-to-view mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDescriptor {
    pub path: &'static str,
    /// Shown as the document title when navigating here
    pub name: Option<&'static str>,
    pub view: Option<ViewId>,
    pub requires_auth: bool,
    pub redirect: Option<&'static str>,
}

impl RouteDescriptor {
    pub fn is_catch_all(&self) -> bool {
        self.path == CATCH_ALL_PATH
    }
}

pub static ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor {
        path: ROOT_PATH,
        name: None,
        view: None,
        requires_auth: false,
        redirect: Some("/live"),
    },
    RouteDescriptor {
        path: LOGIN_PATH,
        name: Some("Login | Beerbrewing Thermometer"),
        view: Some(ViewId::Login),
        requires_auth: true,
        redirect: None,
    },
    RouteDescriptor {
        path: "/live",
        name: Some("Live | Beerbrewing Thermometer"),
        view: Some(ViewId::Live),
        requires_auth: true,
        redirect: None,
    },
    RouteDescriptor {
        path: "/history",
        name: Some("History | Beerbrewing Thermometer"),
        view: Some(ViewId::History),
        requires_auth: true,
        redirect: None,
    },
    RouteDescriptor {
        path: CATCH_ALL_PATH,
        name: Some("Not Found | Beerbrewing Thermometer"),
        view: Some(ViewId::NotFound),
        requires_auth: false,
        redirect: None,
    },
];

/// A route matched against a concrete location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Normalised path after following any redirect
    pub path: String,
    pub route: &'static RouteDescriptor,
    /// Set when the requested path was redirected before matching
    pub redirected_from: Option<String>,
}

/// Strip query string, fragment and a trailing slash.
pub fn normalize_path(raw: &str) -> String {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let path = raw[..end].trim();

    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    if path.len() > 1 && path.ends_with('/') {
        path[..path.len() - 1].to_string()
    } else {
        path
    }
}

fn lookup(path: &str) -> &'static RouteDescriptor {
    ROUTES
        .iter()
        .find(|r| !r.is_catch_all() && r.path == path)
        .or_else(|| ROUTES.iter().find(|r| r.is_catch_all()))
        .unwrap_or(&ROUTES[ROUTES.len() - 1])
}

/// Match a location against [`ROUTES`], following one declared redirect.
pub fn resolve(raw: &str) -> ResolvedRoute {
    let path = normalize_path(raw);
    let route = lookup(&path);

    match route.redirect {
        Some(target) => ResolvedRoute {
            path: target.to_string(),
            route: lookup(target),
            redirected_from: Some(path),
        },
        None => ResolvedRoute {
            path,
            route,
            redirected_from: None,
        },
    }
}

/// Find the declared route rendering `view`.
pub fn route_for_view(view: ViewId) -> Option<&'static RouteDescriptor> {
    ROUTES.iter().find(|r| r.view == Some(view))
}
