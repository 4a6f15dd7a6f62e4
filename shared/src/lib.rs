//! Routing and sign-in gating for the Beerbrewing Thermometer dashboard.
//!
//! Everything here is target independent; the Yew frontend binds it to the
//! browser.

pub mod auth_wait;
pub mod config;
pub mod guard;
pub mod identity;
pub mod routes;

pub use auth_wait::{wait_for_user_auth_init, AuthInit};
pub use config::{AppConfig, ConfigError, FirebaseConfig};
pub use guard::{decide, GuardOutcome, GuardState, NavigationGuard, NavigationRequest, TitleSink};
pub use identity::{AuthStateNotifier, Identity, IdentityService, Listener, SubscriptionId, User};
pub use routes::{resolve, ResolvedRoute, RouteDescriptor, ViewId, LOGIN_PATH, ROOT_PATH, ROUTES};
