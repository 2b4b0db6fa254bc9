use crate::{
    components::{form::bind_input, toast::ToastHost},
    console,
    hooks::use_session_store,
    routes::Route,
};
use client::ApiError;
use shared::models::LoginRequest;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;

fn login_failure(err: &ApiError) -> String {
    if err.is_auth_failure() {
        "Invalid username or password".to_string()
    } else {
        err.user_message()
    }
}

/// Navigation to the dashboard follows from the session's sign-in event.
#[function_component(LoginPage)]
pub fn login_page() -> Html {
    let store = use_session_store();
    let username = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let onsubmit = {
        let username = username.clone();
        let password = password.clone();
        let error = error.clone();
        let loading = loading.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let request = LoginRequest {
                username: username.trim().to_string(),
                password: (*password).clone(),
            };
            loading.set(true);
            error.set(None);
            let store = store.clone();
            let error = error.clone();
            let loading = loading.clone();
            spawn_local(async move {
                if let Err(err) = store.sign_in(&request).await {
                    console::warn(&format!("sign-in failed: {err}"));
                    error.set(Some(login_failure(&err)));
                    loading.set(false);
                }
            });
        })
    };

    let is_busy = *loading;
    let disable_submit = username.trim().is_empty() || password.is_empty() || is_busy;

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" {onsubmit}>
                    <h2 class="card-title text-2xl">{"Sign in to Expensa"}</h2>
                    if let Some(message) = &*error {
                        <div class="alert alert-error">
                            <span>{message.clone()}</span>
                        </div>
                    }
                    <div class="form-control">
                        <label class="label" for="username">
                            <span class="label-text">{"Username"}</span>
                        </label>
                        <input
                            id="username"
                            class="input input-bordered"
                            autocomplete="username"
                            required=true
                            value={(*username).clone()}
                            oninput={bind_input(&username)}
                        />
                    </div>
                    <div class="form-control">
                        <label class="label" for="password">
                            <span class="label-text">{"Password"}</span>
                        </label>
                        <input
                            id="password"
                            class="input input-bordered"
                            type="password"
                            autocomplete="current-password"
                            required=true
                            value={(*password).clone()}
                            oninput={bind_input(&password)}
                        />
                    </div>
                    <div class="form-control mt-6">
                        <button class="btn btn-primary" type="submit" disabled={disable_submit}>
                            {if is_busy { "Signing in..." } else { "Sign in" }}
                        </button>
                    </div>
                    <div class="flex justify-between text-sm mt-2">
                        <Link<Route> to={Route::ForgotPassword} classes="link">{"Forgot password?"}</Link<Route>>
                        <Link<Route> to={Route::SignUp} classes="link">{"Create an account"}</Link<Route>>
                    </div>
                </form>
            </div>
            <ToastHost />
        </div>
    }
}
