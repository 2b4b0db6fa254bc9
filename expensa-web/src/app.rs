use std::rc::Rc;

use client::{ApiClient, LogoutReason, SessionEvent, SessionStore};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::{use_dispatch, use_selector};

use crate::{
    components::loading::Loading,
    config::WebConfig,
    console,
    hooks::use_session_store,
    models::app_state::{AppState, ToastKind, report_error, show_toast},
    routes::{Route, switch},
    storage::BrowserStorage,
};

/// Builds the session store once and provides it to the whole tree.
#[function_component(App)]
pub fn app() -> Html {
    let store = use_memo((), |_| {
        WebConfig::from_build_env().map(|config| {
            console::log(&format!("Using backend at {}", config.api_base_url));
            SessionStore::new(ApiClient::new(config.api_base_url, Rc::new(BrowserStorage)))
        })
    });

    match &*store {
        Ok(store) => html! {
            <ContextProvider<SessionStore> context={store.clone()}>
                <BrowserRouter>
                    <SessionBridge />
                </BrowserRouter>
            </ContextProvider<SessionStore>>
        },
        Err(err) => html! {
            <div class="alert alert-error m-6">
                <span>{ format!("Expensa is misconfigured: {err}") }</span>
            </div>
        },
    }
}

/// Mirrors session transitions into the yewdux store, follows their landing
/// views, and restores the persisted session on start.
#[function_component(SessionBridge)]
fn session_bridge() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let navigator = use_navigator();
    let ready = use_selector(|state: &AppState| state.ready);

    {
        let dispatch = dispatch.clone();
        use_effect_with(store, move |store| {
            let id = {
                let dispatch = dispatch.clone();
                store.subscribe(move |event, session| {
                    console::log(&format!("Session event: {event:?}"));
                    let session = session.clone();
                    dispatch.reduce_mut(move |state| {
                        state.session = session;
                        if matches!(event, SessionEvent::LoggedOut(_)) {
                            state.unread = 0;
                        }
                    });
                    if event == SessionEvent::LoggedOut(LogoutReason::Expired) {
                        show_toast(
                            &dispatch,
                            ToastKind::Info,
                            "Your session has expired. Please sign in again.",
                        );
                    }
                    if let (Some(view), Some(navigator)) = (event.landing(), navigator.as_ref()) {
                        navigator.push(&Route::from(view));
                    }
                })
            };

            let initializing = store.clone();
            spawn_local(async move {
                if let Err(err) = initializing.initialize().await {
                    report_error(&dispatch, "restoring the session", &err);
                }
                let session = initializing.snapshot();
                dispatch.reduce_mut(move |state| {
                    state.session = session;
                    state.ready = true;
                });
            });

            let store = store.clone();
            move || store.unsubscribe(id)
        });
    }

    if !*ready {
        return html! { <Loading /> };
    }

    html! { <Switch<Route> render={switch} /> }
}
