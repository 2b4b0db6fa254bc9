use crate::{
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, ToastKind, report_error, show_toast},
};
use shared::models::{Role, UserProfile};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::{use_dispatch, use_selector};

/// Roles `user` ends up with after `role` is toggled.
fn toggled_roles(user: &UserProfile, role: Role) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|candidate| {
            if *candidate == role {
                !user.has_role(role)
            } else {
                user.has_role(*candidate)
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
enum Change {
    Toggle(Role),
    Enabled(bool),
}

#[function_component(UsersPage)]
pub fn users_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();
    let me = use_selector(|state: &AppState| state.session.user.as_ref().and_then(|user| user.id));
    let users = use_state(|| None::<Vec<UserProfile>>);

    {
        let store = store.clone();
        let dispatch = dispatch.clone();
        let interest = interest.clone();
        let users = users.clone();
        use_effect_with((), move |()| {
            spawn_local(async move {
                let service = store.api().users();
                match interest.guard(service.list()).await {
                    Some(Ok(list)) => users.set(Some(list)),
                    Some(Err(err)) => report_error(&dispatch, "loading users", &err),
                    None => {}
                }
            });
            || ()
        });
    }

    let apply = {
        let users = users.clone();
        let me = *me;
        Callback::from(move |(user, change): (UserProfile, Change)| {
            let Some(id) = user.id else {
                return;
            };
            if me == Some(id) && change == Change::Toggle(Role::Admin) && user.has_role(Role::Admin) {
                show_toast(&dispatch, ToastKind::Error, "You cannot remove your own admin role.");
                return;
            }
            let store = store.clone();
            let dispatch = dispatch.clone();
            let interest = interest.clone();
            let users = users.clone();
            spawn_local(async move {
                let service = store.api().users();
                let result = match &change {
                    Change::Toggle(role) => {
                        interest.guard(service.set_roles(id, &toggled_roles(&user, *role))).await
                    }
                    Change::Enabled(enabled) => interest.guard(service.set_enabled(id, *enabled)).await,
                };
                match result {
                    Some(Ok(updated)) => {
                        show_toast(
                            &dispatch,
                            ToastKind::Success,
                            format!("Updated {}", updated.display_name()),
                        );
                        let list = (*users)
                            .clone()
                            .unwrap_or_default()
                            .into_iter()
                            .map(|existing| if existing.id == updated.id { updated.clone() } else { existing })
                            .collect();
                        users.set(Some(list));
                    }
                    Some(Err(err)) => report_error(&dispatch, "updating the user", &err),
                    None => {}
                }
            });
        })
    };

    let render_user = |user: &UserProfile| -> Html {
        let toggles = Role::ALL.into_iter().map(|role| {
            let onchange = {
                let apply = apply.clone();
                let user = user.clone();
                Callback::from(move |_: Event| apply.emit((user.clone(), Change::Toggle(role))))
            };
            html! {
                <label class="label cursor-pointer gap-1">
                    <input type="checkbox" class="checkbox checkbox-xs"
                        checked={user.has_role(role)} {onchange} />
                    <span class="label-text text-xs">{ role.label() }</span>
                </label>
            }
        });
        let toggle_enabled = {
            let apply = apply.clone();
            let user = user.clone();
            Callback::from(move |_| apply.emit((user.clone(), Change::Enabled(!user.enabled))))
        };
        html! {
            <tr key={user.id.unwrap_or_default()}>
                <td>
                    <div class="font-semibold">{ user.display_name().to_string() }</div>
                    <div class="text-xs text-base-content/60">{ user.username.clone() }</div>
                </td>
                <td>{ user.email.clone() }</td>
                <td><div class="flex gap-2">{ for toggles }</div></td>
                <td>
                    if user.enabled {
                        <span class="badge badge-success">{"Active"}</span>
                    } else {
                        <span class="badge badge-ghost">{"Disabled"}</span>
                    }
                </td>
                <td>
                    <button class="btn btn-xs" onclick={toggle_enabled}>
                        { if user.enabled { "Disable" } else { "Enable" } }
                    </button>
                </td>
            </tr>
        }
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{"Users"}</h1>
            {
                match &*users {
                    None => html! { <span class="loading loading-spinner"></span> },
                    Some(list) => html! {
                        <div class="overflow-x-auto">
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>{"Name"}</th>
                                        <th>{"Email"}</th>
                                        <th>{"Roles"}</th>
                                        <th>{"Status"}</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>{ for list.iter().map(render_user) }</tbody>
                            </table>
                        </div>
                    },
                }
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_adds_or_removes_one_role() {
        let manager = UserProfile {
            roles: vec!["ROLE_USER".into(), "ROLE_MANAGER".into()],
            ..UserProfile::default()
        };
        assert_eq!(
            toggled_roles(&manager, Role::Admin),
            vec![Role::User, Role::Manager, Role::Admin]
        );
        assert_eq!(toggled_roles(&manager, Role::Manager), vec![Role::User]);
    }
}
