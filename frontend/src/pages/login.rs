use web_sys::HtmlInputElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::router::Route;
use crate::services::AppContext;

#[function_component(Login)]
pub fn login() -> Html {
    let context = use_context::<AppContext>();
    let navigator = use_navigator();

    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| Option::<String>::None);
    let submitting = use_state(|| false);

    let on_email_input = {
        let email = email.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
        })
    };

    let on_password_input = {
        let password = password.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            password.set(input.value());
        })
    };

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let submitting = submitting.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(context) = context.clone() else {
                error.set(Some("Authentication is unavailable.".to_string()));
                return;
            };

            let email = (*email).trim().to_string();
            let password = (*password).clone();
            if email.is_empty() || password.is_empty() {
                error.set(Some("Please enter your email and password.".to_string()));
                return;
            }

            let error = error.clone();
            let submitting = submitting.clone();
            let navigator = navigator.clone();
            submitting.set(true);
            error.set(None);

            wasm_bindgen_futures::spawn_local(async move {
                match context.identity.sign_in(&email, &password).await {
                    Ok(()) => {
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Root);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("{}", e);
                        error.set(Some(e.user_message().to_string()));
                    }
                }
                submitting.set(false);
            });
        })
    };

    html! {
        <div class="container">
            <form class="login-form" onsubmit={on_submit}>
                <h2>{ "Sign in" }</h2>
                if let Some(message) = &*error {
                    <div class="error">{ message }</div>
                }
                <input
                    type="email"
                    placeholder="Email"
                    value={(*email).clone()}
                    oninput={on_email_input}
                />
                <input
                    type="password"
                    placeholder="Password"
                    value={(*password).clone()}
                    oninput={on_password_input}
                />
                <button class="btn btn-primary" type="submit" disabled={*submitting}>
                    { if *submitting { "Signing in..." } else { "Sign in" } }
                </button>
            </form>
        </div>
    }
}
