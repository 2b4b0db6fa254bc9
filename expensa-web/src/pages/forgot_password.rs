use crate::{
    components::{form::bind_input, toast::ToastHost},
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, report_error},
    routes::Route,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::Link;
use yewdux::prelude::use_dispatch;

#[function_component(ForgotPasswordPage)]
pub fn forgot_password_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();
    let email = use_state(String::new);
    let sent = use_state(|| None::<String>);
    let busy = use_state(|| false);

    let onsubmit = {
        let email = email.clone();
        let sent = sent.clone();
        let busy = busy.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            busy.set(true);
            let address = (*email).clone();
            let store = store.clone();
            let dispatch = dispatch.clone();
            let interest = interest.clone();
            let sent = sent.clone();
            let busy = busy.clone();
            spawn_local(async move {
                let auth = store.api().auth();
                match interest.guard(auth.forgot_password(&address)).await {
                    Some(Ok(response)) => {
                        let message = if response.message.is_empty() {
                            format!("If {address} belongs to an account, a reset link is on its way.")
                        } else {
                            response.message
                        };
                        sent.set(Some(message));
                    }
                    Some(Err(err)) => report_error(&dispatch, "requesting a password reset", &err),
                    None => return,
                }
                busy.set(false);
            });
        })
    };

    html! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-md shadow-lg bg-base-100">
                <form class="card-body" {onsubmit}>
                    <h2 class="card-title text-2xl">{"Forgot your password?"}</h2>
                    if let Some(message) = &*sent {
                        <div class="alert alert-success"><span>{ message.clone() }</span></div>
                    }
                    <p class="text-sm text-base-content/70">
                        {"Enter the email address of your account and we will send you a reset link."}
                    </p>
                    <input class="input input-bordered" type="email" placeholder="Email" required=true
                        value={(*email).clone()} oninput={bind_input(&email)} />
                    <button class="btn btn-primary mt-4" type="submit"
                        disabled={*busy || email.trim().is_empty()}>
                        {"Send reset link"}
                    </button>
                    <Link<Route> to={Route::Login} classes="link text-sm">{"Back to sign in"}</Link<Route>>
                </form>
            </div>
            <ToastHost />
        </div>
    }
}
