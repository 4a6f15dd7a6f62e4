use std::rc::Rc;

use shared::{IdentityService, User};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;
use crate::services::AppContext;

#[function_component(Header)]
pub fn header() -> Html {
    let context = use_context::<AppContext>();
    let navigator = use_navigator();
    let user = use_state(|| Option::<User>::None);

    // Follow sign-in state for the whole lifetime of the header.
    {
        let user = user.clone();
        let context = context.clone();

        use_effect_with((), move |_| {
            let subscription = context.map(|context| {
                let identity = Rc::clone(&context.identity);
                let id = identity.subscribe(Box::new(move |identity| user.set(identity)));
                (identity, id)
            });

            move || {
                if let Some((identity, id)) = subscription {
                    identity.unsubscribe(id);
                }
            }
        });
    }

    let on_sign_out = {
        let context = context.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(context) = context.clone() else {
                return;
            };
            let navigator = navigator.clone();

            wasm_bindgen_futures::spawn_local(async move {
                match context.identity.sign_out().await {
                    Ok(()) => {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Login);
                        }
                    }
                    Err(e) => tracing::error!("{}", e),
                }
            });
        })
    };

    html! {
        <header class="header">
            <div class="container">
                <h1>{ "Beerbrewing Thermometer" }</h1>
                if let Some(current) = &*user {
                    <nav>
                        <Link<Route> to={Route::Live}>{ "Live" }</Link<Route>>
                        { " | " }
                        <Link<Route> to={Route::History}>{ "History" }</Link<Route>>
                    </nav>
                    <div class="user">
                        <span class="user-email">
                            { current.display_name.clone().or_else(|| current.email.clone()).unwrap_or_default() }
                        </span>
                        <button class="btn btn-secondary" onclick={on_sign_out}>{ "Sign out" }</button>
                    </div>
                }
            </div>
        </header>
    }
}
