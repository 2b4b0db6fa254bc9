use crate::{
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, report_error},
};
use shared::models::Notification;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::use_dispatch;

fn unread(list: &[Notification]) -> u64 {
    list.iter().filter(|notification| !notification.read).count() as u64
}

#[function_component(NotificationsPage)]
pub fn notifications_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();
    let only_unread = use_state(|| false);
    let list = use_state(|| None::<Vec<Notification>>);

    // Keeps the header badge in step with what is shown here.
    let show = {
        let list = list.clone();
        let dispatch = dispatch.clone();
        move |notifications: Vec<Notification>| {
            let count = unread(&notifications);
            dispatch.reduce_mut(|state| state.unread = count);
            list.set(Some(notifications));
        }
    };

    {
        let store = store.clone();
        let dispatch = dispatch.clone();
        let interest = interest.clone();
        let show = show.clone();
        use_effect_with((), move |()| {
            spawn_local(async move {
                let service = store.api().notifications();
                match interest.guard(service.list()).await {
                    Some(Ok(notifications)) => show(notifications),
                    Some(Err(err)) => report_error(&dispatch, "loading notifications", &err),
                    None => {}
                }
            });
            || ()
        });
    }

    // `None` marks everything read.
    let mark = {
        let list = list.clone();
        Callback::from(move |target: Option<i64>| {
            let store = store.clone();
            let dispatch = dispatch.clone();
            let interest = interest.clone();
            let show = show.clone();
            let current = (*list).clone().unwrap_or_default();
            spawn_local(async move {
                let service = store.api().notifications();
                let result = match target {
                    Some(id) => interest.guard(service.mark_read(id)).await,
                    None => interest.guard(service.mark_all_read()).await,
                };
                match result {
                    Some(Ok(())) => show(
                        current
                            .into_iter()
                            .map(|mut notification| {
                                if target.is_none_or(|id| id == notification.id) {
                                    notification.read = true;
                                }
                                notification
                            })
                            .collect(),
                    ),
                    Some(Err(err)) => report_error(&dispatch, "updating notifications", &err),
                    None => {}
                }
            });
        })
    };

    let toggle_filter = {
        let only_unread = only_unread.clone();
        Callback::from(move |_: Event| only_unread.set(!*only_unread))
    };
    let mark_all = {
        let mark = mark.clone();
        Callback::from(move |_| mark.emit(None))
    };

    html! {
        <div class="space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-4">
                <h1 class="text-2xl font-bold">{"Notifications"}</h1>
                <div class="flex items-center gap-4">
                    <label class="label cursor-pointer gap-2">
                        <span class="label-text">{"Unread only"}</span>
                        <input type="checkbox" class="toggle toggle-sm" checked={*only_unread} onchange={toggle_filter} />
                    </label>
                    <button class="btn btn-sm" onclick={mark_all}>{"Mark all read"}</button>
                </div>
            </div>
            {
                match &*list {
                    None => html! { <span class="loading loading-spinner"></span> },
                    Some(notifications) => {
                        let visible: Vec<&Notification> = notifications
                            .iter()
                            .filter(|notification| !*only_unread || !notification.read)
                            .collect();
                        if visible.is_empty() {
                            html! { <p class="text-base-content/70">{"You are all caught up."}</p> }
                        } else {
                            html! {
                                <ul class="space-y-2">
                                    { for visible.into_iter().map(|notification| {
                                        let id = notification.id;
                                        let onclick = {
                                            let mark = mark.clone();
                                            Callback::from(move |_| mark.emit(Some(id)))
                                        };
                                        html! {
                                            <li key={id} class={classes!("card", "bg-base-200", notification.read.then_some("opacity-60"))}>
                                                <div class="card-body p-4 flex-row items-center justify-between">
                                                    <div>
                                                        <span class={classes!("badge", "mr-2", notification.kind.badge_class())}>
                                                            { format!("{:?}", notification.kind) }
                                                        </span>
                                                        { notification.message.clone() }
                                                        if let Some(created_at) = notification.created_at {
                                                            <div class="text-xs text-base-content/60">
                                                                { created_at.format("%Y-%m-%d %H:%M").to_string() }
                                                            </div>
                                                        }
                                                    </div>
                                                    if !notification.read {
                                                        <button class="btn btn-xs btn-ghost" {onclick}>{"Mark read"}</button>
                                                    }
                                                </div>
                                            </li>
                                        }
                                    }) }
                                </ul>
                            }
                        }
                    }
                }
            }
        </div>
    }
}
