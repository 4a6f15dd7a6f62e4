//! Firebase Auth bindings.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use shared::{FirebaseConfig, Identity, IdentityService, Listener, SubscriptionId, User};
use thiserror::Error;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(inline_js = r#"
import { initializeApp } from "https://www.gstatic.com/firebasejs/10.12.2/firebase-app.js";
import {
    getAuth,
    onAuthStateChanged,
    signInWithEmailAndPassword,
    signOut,
} from "https://www.gstatic.com/firebasejs/10.12.2/firebase-auth.js";

let auth = null;
const unsubscribers = new Map();
let nextHandle = 0;

export function firebase_init(options) {
    try {
        auth = getAuth(initializeApp(options));
    } catch (e) {
        throw plainError(e);
    }
}

export function firebase_on_auth_state_changed(callback) {
    const handle = nextHandle++;
    const unsubscribe = onAuthStateChanged(auth, (user) => {
        callback(user ? {
            uid: user.uid,
            email: user.email,
            displayName: user.displayName,
        } : null);
    });
    unsubscribers.set(handle, unsubscribe);
    return handle;
}

export function firebase_unsubscribe(handle) {
    const unsubscribe = unsubscribers.get(handle);
    if (unsubscribe) {
        unsubscribers.delete(handle);
        unsubscribe();
    }
}

function plainError(e) {
    return { code: e && e.code ? String(e.code) : null, message: String(e && e.message ? e.message : e) };
}

export async function firebase_sign_in(email, password) {
    try {
        await signInWithEmailAndPassword(auth, email, password);
    } catch (e) {
        throw plainError(e);
    }
}

export async function firebase_sign_out() {
    try {
        await signOut(auth);
    } catch (e) {
        throw plainError(e);
    }
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn firebase_init(options: JsValue) -> Result<(), JsValue>;

    fn firebase_on_auth_state_changed(callback: &Closure<dyn FnMut(JsValue)>) -> u32;

    fn firebase_unsubscribe(handle: u32);

    #[wasm_bindgen(catch)]
    async fn firebase_sign_in(email: &str, password: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn firebase_sign_out() -> Result<JsValue, JsValue>;
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Firebase initialization failed: {0}")]
    Init(String),
    #[error("Sign-in failed ({code}): {message}")]
    SignIn { code: String, message: String },
    #[error("Sign-out failed: {0}")]
    SignOut(String),
}

impl AuthError {
    /// Short text for the login form.
    pub fn user_message(&self) -> &str {
        match self {
            Self::SignIn { code, .. } => match code.as_str() {
                "auth/invalid-credential" | "auth/wrong-password" | "auth/user-not-found" => {
                    "Invalid email or password."
                }
                "auth/invalid-email" => "Please enter a valid email address.",
                "auth/too-many-requests" => "Too many attempts. Please try again later.",
                "auth/network-request-failed" => "Network error. Check your connection.",
                _ => "Sign-in failed. Please try again.",
            },
            Self::Init(_) => "Authentication is unavailable.",
            Self::SignOut(_) => "Sign-out failed. Please try again.",
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsError {
    code: Option<String>,
    message: Option<String>,
}

impl JsError {
    fn from_js(value: JsValue) -> Self {
        serde_wasm_bindgen::from_value(value.clone()).unwrap_or_else(|_| Self {
            code: None,
            message: value.as_string().or_else(|| Some(format!("{:?}", value))),
        })
    }

    fn code(&self) -> String {
        self.code.clone().unwrap_or_else(|| "unknown".to_string())
    }

    fn message(&self) -> String {
        self.message.clone().unwrap_or_default()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FirebaseOptions<'a> {
    api_key: &'a str,
    auth_domain: &'a str,
    project_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_id: Option<&'a str>,
}

/// [`IdentityService`] backed by Firebase Auth's `onAuthStateChanged`.
pub struct FirebaseIdentity {
    callbacks: RefCell<HashMap<u64, (u32, Closure<dyn FnMut(JsValue)>)>>,
    next_id: Cell<u64>,
}

impl FirebaseIdentity {
    /// Initialize the Firebase app. Call once at startup.
    pub fn initialize(config: &FirebaseConfig) -> Result<Rc<Self>, AuthError> {
        let options = FirebaseOptions {
            api_key: &config.api_key,
            auth_domain: &config.auth_domain,
            project_id: &config.project_id,
            app_id: config.app_id.as_deref(),
        };
        let options =
            serde_wasm_bindgen::to_value(&options).map_err(|e| AuthError::Init(e.to_string()))?;

        firebase_init(options).map_err(|e| AuthError::Init(JsError::from_js(e).message()))?;
        tracing::info!("Firebase initialized for project {}", config.project_id);

        Ok(Rc::new(Self {
            callbacks: RefCell::new(HashMap::new()),
            next_id: Cell::new(0),
        }))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), AuthError> {
        firebase_sign_in(email, password).await.map_err(|e| {
            let err = JsError::from_js(e);
            AuthError::SignIn {
                code: err.code(),
                message: err.message(),
            }
        })?;
        tracing::info!("Signed in as {}", email);
        Ok(())
    }

    pub async fn sign_out(&self) -> Result<(), AuthError> {
        firebase_sign_out()
            .await
            .map_err(|e| AuthError::SignOut(JsError::from_js(e).message()))?;
        tracing::info!("Signed out");
        Ok(())
    }
}

fn decode_identity(value: JsValue) -> Identity {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    match serde_wasm_bindgen::from_value::<User>(value) {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::error!("Unreadable auth state payload, treating as signed out: {}", e);
            None
        }
    }
}

impl IdentityService for FirebaseIdentity {
    fn subscribe(&self, mut listener: Listener) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let callback = Closure::<dyn FnMut(JsValue)>::new(move |value: JsValue| {
            listener(decode_identity(value));
        });
        let handle = firebase_on_auth_state_changed(&callback);
        self.callbacks.borrow_mut().insert(id, (handle, callback));

        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let Some((handle, callback)) = self.callbacks.borrow_mut().remove(&id.0) else {
            return;
        };
        firebase_unsubscribe(handle);

        // May be running inside this very callback; release it afterwards.
        wasm_bindgen_futures::spawn_local(async move {
            drop(callback);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_in_error(code: &str) -> AuthError {
        AuthError::SignIn {
            code: code.to_string(),
            message: "Firebase: Error".to_string(),
        }
    }

    #[test]
    fn test_credential_errors_share_one_message() {
        for code in ["auth/invalid-credential", "auth/wrong-password", "auth/user-not-found"] {
            assert_eq!(sign_in_error(code).user_message(), "Invalid email or password.");
        }
    }

    #[test]
    fn test_unknown_code_gets_generic_message() {
        let err = sign_in_error("auth/internal-error");
        assert_eq!(err.user_message(), "Sign-in failed. Please try again.");
        assert_eq!(
            err.to_string(),
            "Sign-in failed (auth/internal-error): Firebase: Error"
        );
    }
}
