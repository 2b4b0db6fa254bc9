use crate::{
    components::{header_nav_item::HeaderNavItem, user_dropdown::UserDropdown},
    hooks::{use_interest, use_session_store},
    models::app_state::AppState,
    routes::Route,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_icons::{Icon, IconId};
use yew_router::prelude::Link;
use yewdux::prelude::{use_dispatch, use_selector};

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
    #[prop_or_default]
    pub current_route: Option<Route>,
}

#[function_component(Header)]
pub fn header(props: &HeaderProps) -> Html {
    let session = use_selector(|state: &AppState| state.session.clone());
    let unread = use_selector(|state: &AppState| state.unread);
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();

    // Refresh the badge whenever another page is opened.
    use_effect_with(props.current_route.clone(), move |_| {
        spawn_local(async move {
            let notifications = store.api().notifications();
            match interest.guard(notifications.unread_count()).await {
                Some(Ok(count)) => dispatch.reduce_mut(|state| state.unread = count),
                Some(Err(err)) => {
                    crate::console::warn(&format!("unread count unavailable: {err}"));
                }
                None => {}
            }
        });
        || ()
    });

    let routes = Route::navigation(&session);
    let render_routes = || -> Html {
        html! {
            { for routes.iter().map(|route| html! {
                <HeaderNavItem
                    current_route={props.current_route.clone()}
                    route={route.clone()}
                />
            }) }
        }
    };

    html! {
        <nav class="navbar justify-between bg-base-300">
            <Link<Route> to={Route::Home} classes="btn btn-ghost text-lg">
                {"Expensa"}
            </Link<Route>>
            <div class="dropdown dropdown-end sm:hidden">
                <button class="btn btn-soft">
                    <Icon icon_id={IconId::HeroiconsOutlineBars3} class="w-5 h-5" />
                </button>
                <ul
                    tabindex="0"
                    class="dropdown-content menu z-[1] bg-base-200 p-6 rounded-box shadow w-56 gap-2"
                >
                    { render_routes() }
                </ul>
            </div>
            <ul class="hidden menu sm:menu-horizontal">
                { render_routes() }
            </ul>
            <div class="flex items-center gap-2">
                <Link<Route> to={Route::Notifications} classes="btn btn-ghost btn-circle">
                    <div class="indicator">
                        <Icon icon_id={IconId::HeroiconsOutlineBell} class="w-5 h-5" />
                        if *unread > 0 {
                            <span class="badge badge-sm badge-primary indicator-item">{ *unread }</span>
                        }
                    </div>
                </Link<Route>>
                if let Some(name) = session.display_name() {
                    <span class="hidden sm:inline text-sm text-base-content/80">{ name.to_string() }</span>
                }
                <UserDropdown />
            </div>
        </nav>
    }
}
