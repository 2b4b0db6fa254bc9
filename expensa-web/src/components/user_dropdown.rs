use crate::{
    console, hooks::use_session_store, models::app_state::AppState, routes::Route,
};
use yew::prelude::*;
use yew_icons::{Icon, IconId};
use yew_router::prelude::Link;
use yewdux::prelude::use_selector;

#[function_component(UserDropdown)]
pub fn user_dropdown() -> Html {
    let store = use_session_store();
    let session = use_selector(|state: &AppState| state.session.clone());
    let Some(user) = session.user.clone() else {
        return html! {};
    };

    // Navigation to the login page follows from the logout event.
    let on_logout = Callback::from(move |event: MouseEvent| {
        event.prevent_default();
        if let Err(err) = store.logout() {
            console::error(&format!("logout could not clear stored session: {err}"));
        }
    });

    let access = if session.is_admin() {
        "Admin"
    } else if session.is_manager() {
        "Manager"
    } else {
        "Employee"
    };

    html! {
        <div class="dropdown dropdown-end">
            <div tabindex="0" role="button" class="btn btn-ghost btn-circle">
                <Icon icon_id={IconId::HeroiconsOutlineUserCircle} class="w-6 h-6" />
            </div>
            <ul tabIndex={0} class="dropdown-content z-[1] menu p-2 shadow bg-base-200 rounded-box w-52">
                <li class="px-2 py-1 text-left">
                    <div class="text-sm font-semibold text-base-content">{ user.display_name().to_string() }</div>
                    if !user.email.is_empty() {
                        <div class="text-xs text-base-content/70">{ user.email.clone() }</div>
                    }
                    <div class="badge badge-outline badge-sm mt-1">{ access }</div>
                </li>
                <div class="divider my-0"></div>
                <li><Link<Route> to={Route::Profile}>{"Profile"}</Link<Route>></li>
                <li><Link<Route> to={Route::Notifications}>{"Notifications"}</Link<Route>></li>
                <div class="divider my-0"></div>
                <li><a onclick={on_logout}>{"Sign out"}</a></li>
            </ul>
        </div>
    }
}
