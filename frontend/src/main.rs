mod components;
mod pages;
mod router;
mod services;

use std::rc::Rc;

use shared::AppConfig;
use yew::prelude::*;
use yew_router::BrowserRouter;

use crate::router::{switch, Route};
use crate::services::{firebase::FirebaseIdentity, AppContext};

/// Build-time settings; a wasm bundle has no process environment.
fn build_env(key: &str) -> Option<String> {
    let value = match key {
        "FIREBASE_API_KEY" => option_env!("FIREBASE_API_KEY"),
        "FIREBASE_AUTH_DOMAIN" => option_env!("FIREBASE_AUTH_DOMAIN"),
        "FIREBASE_PROJECT_ID" => option_env!("FIREBASE_PROJECT_ID"),
        "FIREBASE_APP_ID" => option_env!("FIREBASE_APP_ID"),
        _ => None,
    };
    value.map(str::to_string)
}

#[derive(Properties, PartialEq)]
struct AppProps {
    context: AppContext,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    html! {
        <ContextProvider<AppContext> context={props.context.clone()}>
            <BrowserRouter>
                <div id="app">
                    <components::header::Header />
                    <yew_router::Switch<Route> render={switch} />
                </div>
            </BrowserRouter>
        </ContextProvider<AppContext>>
    }
}

#[derive(Properties, PartialEq)]
struct StartupErrorProps {
    message: String,
}

#[function_component(StartupError)]
fn startup_error(props: &StartupErrorProps) -> Html {
    html! {
        <div class="container">
            <div class="empty-state">
                <h2>{ "Unable to start" }</h2>
                <p>{ &props.message }</p>
            </div>
        </div>
    }
}

fn start() -> Result<Rc<FirebaseIdentity>, String> {
    let config = AppConfig::from_lookup(build_env).map_err(|e| e.to_string())?;
    FirebaseIdentity::initialize(&config.firebase).map_err(|e| e.to_string())
}

fn main() {
    // Initialize tracing
    tracing_wasm::set_as_global_default();

    match start() {
        Ok(identity) => {
            yew::Renderer::<App>::with_props(AppProps {
                context: AppContext { identity },
            })
            .render();
        }
        Err(message) => {
            tracing::error!("Startup failed: {}", message);
            yew::Renderer::<StartupError>::with_props(StartupErrorProps { message }).render();
        }
    }
}
