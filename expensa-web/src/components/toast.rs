use crate::models::app_state::AppState;
use yew::{Callback, Html, classes, function_component, html};
use yewdux::prelude::{use_dispatch, use_selector};

#[function_component(ToastHost)]
pub fn toast_host() -> Html {
    let toast = use_selector(|state: &AppState| state.toast.clone());
    let dispatch = use_dispatch::<AppState>();
    let Some(toast) = (*toast).clone() else {
        return html! {};
    };
    let dismiss = Callback::from(move |_| dispatch.reduce_mut(|state| state.toast = None));

    html! {
        <div class="toast toast-end z-50">
            <div class={classes!("alert", toast.kind.alert_class())} role="alert">
                <span>{ toast.message }</span>
                <button class="btn btn-ghost btn-xs" onclick={dismiss}>{"✕"}</button>
            </div>
        </div>
    }
}
