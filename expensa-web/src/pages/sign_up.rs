use crate::{
    components::{form::bind_input, toast::ToastHost},
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, ToastKind, report_error, show_toast},
    routes::Route,
};
use shared::models::SignUpRequest;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::{Link, use_navigator};
use yewdux::prelude::use_dispatch;

#[function_component(SignUpPage)]
pub fn sign_up_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let navigator = use_navigator();
    let interest = use_interest();

    let username = use_state(String::new);
    let full_name = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let problems = use_state(Vec::<String>::new);
    let busy = use_state(|| false);

    let onsubmit = {
        let (username, full_name, email, password) =
            (username.clone(), full_name.clone(), email.clone(), password.clone());
        let problems = problems.clone();
        let busy = busy.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let request = SignUpRequest {
                username: username.trim().to_string(),
                full_name: full_name.trim().to_string(),
                email: email.trim().to_string(),
                password: (*password).clone(),
            };
            if let Err(errors) = request.validate() {
                problems.set(errors);
                return;
            }
            problems.set(Vec::new());
            busy.set(true);

            let store = store.clone();
            let dispatch = dispatch.clone();
            let navigator = navigator.clone();
            let interest = interest.clone();
            let busy = busy.clone();
            spawn_local(async move {
                let auth = store.api().auth();
                match interest.guard(auth.sign_up(&request)).await {
                    Some(Ok(response)) => {
                        let message = if response.message.is_empty() {
                            "Account created. You can sign in now.".to_string()
                        } else {
                            response.message
                        };
                        show_toast(&dispatch, ToastKind::Success, message);
                        if let Some(navigator) = navigator {
                            navigator.push(&Route::Login);
                        }
                    }
                    Some(Err(err)) => {
                        report_error(&dispatch, "sign-up", &err);
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
                    <h2 class="card-title text-2xl">{"Create an account"}</h2>
                    if !problems.is_empty() {
                        <div class="alert alert-error">
                            <ul>{ for problems.iter().map(|problem| html! { <li>{ problem.clone() }</li> }) }</ul>
                        </div>
                    }
                    <input class="input input-bordered" placeholder="Username" autocomplete="username"
                        value={(*username).clone()} oninput={bind_input(&username)} />
                    <input class="input input-bordered" placeholder="Full name" autocomplete="name"
                        value={(*full_name).clone()} oninput={bind_input(&full_name)} />
                    <input class="input input-bordered" type="email" placeholder="Email" autocomplete="email"
                        value={(*email).clone()} oninput={bind_input(&email)} />
                    <input class="input input-bordered" type="password" placeholder="Password"
                        autocomplete="new-password"
                        value={(*password).clone()} oninput={bind_input(&password)} />
                    <button class="btn btn-primary mt-4" type="submit" disabled={*busy}>
                        { if *busy { "Creating..." } else { "Sign up" } }
                    </button>
                    <Link<Route> to={Route::Login} classes="link text-sm">{"Already registered? Sign in"}</Link<Route>>
                </form>
            </div>
            <ToastHost />
        </div>
    }
}
