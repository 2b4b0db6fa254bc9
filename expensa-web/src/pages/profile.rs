use crate::{
    components::form::{bind_input, optional},
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, ToastKind, report_error, show_toast},
};
use client::ProfileState;
use shared::models::UpdateProfileRequest;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::{use_dispatch, use_selector};

/// Profile page component
#[function_component(ProfilePage)]
pub fn profile_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();
    let session = use_selector(|state: &AppState| state.session.clone());

    let user = session.user.clone().unwrap_or_default();
    let full_name = use_state(|| user.full_name.clone());
    let email = use_state(|| user.email.clone());
    let password = use_state(String::new);
    let problems = use_state(Vec::<String>::new);
    let saving = use_state(|| false);

    // The header may load the profile after this page first rendered.
    {
        let (full_name, email) = (full_name.clone(), email.clone());
        use_effect_with(session.user.clone(), move |user| {
            if let Some(user) = user {
                if full_name.is_empty() {
                    full_name.set(user.full_name.clone());
                }
                if email.is_empty() {
                    email.set(user.email.clone());
                }
            }
            || ()
        });
    }

    let onsubmit = {
        let (full_name, email, password) = (full_name.clone(), email.clone(), password.clone());
        let problems = problems.clone();
        let saving = saving.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let request = UpdateProfileRequest {
                full_name: full_name.trim().to_string(),
                email: email.trim().to_string(),
                password: optional(&password),
            };
            if let Err(errors) = request.validate() {
                problems.set(errors);
                return;
            }
            problems.set(Vec::new());
            saving.set(true);

            let store = store.clone();
            let dispatch = dispatch.clone();
            let interest = interest.clone();
            let saving = saving.clone();
            let password = password.clone();
            spawn_local(async move {
                match interest.guard(store.save_profile(&request)).await {
                    Some(Ok(_)) => {
                        show_toast(&dispatch, ToastKind::Success, "Profile saved");
                        password.set(String::new());
                    }
                    Some(Err(err)) => report_error(&dispatch, "saving the profile", &err),
                    None => return,
                }
                saving.set(false);
            });
        })
    };

    let roles = user.roles.join(", ");

    html! {
        <div class="max-w-xl space-y-6">
            <h1 class="text-2xl font-bold">{"Profile"}</h1>
            if session.profile == ProfileState::Stale {
                <div class="alert alert-warning">
                    <span>{"Showing your last known profile; the server could not be reached."}</span>
                </div>
            }
            <div class="text-sm text-base-content/70">
                if !user.username.is_empty() {
                    <div>{ format!("Username: {}", user.username) }</div>
                }
                <div>{ format!("Roles: {roles}") }</div>
            </div>
            if !problems.is_empty() {
                <div class="alert alert-error">
                    <ul>{ for problems.iter().map(|problem| html! { <li>{ problem.clone() }</li> }) }</ul>
                </div>
            }
            <form class="flex flex-col gap-3" {onsubmit}>
                <label class="form-control">
                    <span class="label-text">{"Full name"}</span>
                    <input class="input input-bordered" autocomplete="name"
                        value={(*full_name).clone()} oninput={bind_input(&full_name)} />
                </label>
                <label class="form-control">
                    <span class="label-text">{"Email"}</span>
                    <input class="input input-bordered" type="email" autocomplete="email"
                        value={(*email).clone()} oninput={bind_input(&email)} />
                </label>
                <label class="form-control">
                    <span class="label-text">{"New password (leave blank to keep the current one)"}</span>
                    <input class="input input-bordered" type="password" autocomplete="new-password"
                        value={(*password).clone()} oninput={bind_input(&password)} />
                </label>
                <button class="btn btn-primary self-start" type="submit" disabled={*saving}>
                    { if *saving { "Saving..." } else { "Save" } }
                </button>
            </form>
        </div>
    }
}
