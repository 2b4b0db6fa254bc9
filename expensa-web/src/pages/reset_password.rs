use crate::{
    components::{form::bind_input, toast::ToastHost},
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, ToastKind, report_error, show_toast},
    routes::Route,
};
use serde::Deserialize;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::{Link, use_location, use_navigator};
use yewdux::prelude::use_dispatch;

const MIN_PASSWORD_LEN: usize = 6;

/// `?token=…` from the emailed reset link.
#[derive(Debug, Default, Deserialize)]
struct ResetQuery {
    #[serde(default)]
    token: String,
}

fn check_passwords(password: &str, confirmation: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        Err("Password must be at least 6 characters")
    } else if password != confirmation {
        Err("Passwords do not match")
    } else {
        Ok(())
    }
}

#[function_component(ResetPasswordPage)]
pub fn reset_password_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let navigator = use_navigator();
    let interest = use_interest();
    let token = use_location()
        .and_then(|location| location.query::<ResetQuery>().ok())
        .unwrap_or_default()
        .token;

    let password = use_state(String::new);
    let confirmation = use_state(String::new);
    let problem = use_state(|| None::<&'static str>);
    let busy = use_state(|| false);

    if token.trim().is_empty() {
        return html! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="alert alert-warning max-w-md">
                    <span>{"This reset link is incomplete. Request a new one."}</span>
                    <Link<Route> to={Route::ForgotPassword} classes="btn btn-sm">{"Request link"}</Link<Route>>
                </div>
            </div>
        };
    }

    let onsubmit = {
        let password = password.clone();
        let confirmation = confirmation.clone();
        let problem = problem.clone();
        let busy = busy.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            if let Err(message) = check_passwords(&password, &confirmation) {
                problem.set(Some(message));
                return;
            }
            problem.set(None);
            busy.set(true);

            let new_password = (*password).clone();
            let token = token.clone();
            let store = store.clone();
            let dispatch = dispatch.clone();
            let navigator = navigator.clone();
            let interest = interest.clone();
            let busy = busy.clone();
            spawn_local(async move {
                let auth = store.api().auth();
                match interest.guard(auth.reset_password(&token, &new_password)).await {
                    Some(Ok(_)) => {
                        show_toast(&dispatch, ToastKind::Success, "Password updated. Sign in with your new password.");
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Login);
                        }
                    }
                    Some(Err(err)) => {
                        report_error(&dispatch, "resetting the password", &err);
                        busy.set(false);
                    }
                    None => {}
                }
            });
        })
    };

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" {onsubmit}>
                    <h2 class="card-title text-2xl">{"Choose a new password"}</h2>
                    if let Some(message) = *problem {
                        <div class="alert alert-error"><span>{ message }</span></div>
                    }
                    <input class="input input-bordered" type="password" placeholder="New password"
                        autocomplete="new-password"
                        value={(*password).clone()} oninput={bind_input(&password)} />
                    <input class="input input-bordered" type="password" placeholder="Repeat new password"
                        autocomplete="new-password"
                        value={(*confirmation).clone()} oninput={bind_input(&confirmation)} />
                    <button class="btn btn-primary mt-4" type="submit" disabled={*busy}>{"Reset password"}</button>
                </form>
            </div>
            <ToastHost />
        </div>
    }
}
