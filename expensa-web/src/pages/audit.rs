use crate::{
    components::{
        form::{bind_input, optional},
        pager::Pager,
    },
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, report_error},
};
use shared::models::{AuditEntry, AuditFilter, Page, PageQuery};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::use_dispatch;

const AUDIT_PAGE_SIZE: u32 = 20;

#[function_component(AuditPage)]
pub fn audit_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();

    let action = use_state(String::new);
    let actor = use_state(String::new);
    let filter = use_state(AuditFilter::default);
    let page_query = use_state(|| PageQuery::new(0, AUDIT_PAGE_SIZE));
    let page = use_state(|| None::<Page<AuditEntry>>);

    {
        let page = page.clone();
        use_effect_with(((*filter).clone(), *page_query), move |(filter, query)| {
            let (filter, query) = (filter.clone(), *query);
            spawn_local(async move {
                let audit = store.api().audit();
                match interest.guard(audit.list(&filter, query)).await {
                    Some(Ok(result)) => page.set(Some(result)),
                    Some(Err(err)) => report_error(&dispatch, "loading the audit log", &err),
                    None => {}
                }
            });
            || ()
        });
    }

    let onsubmit = {
        let (action, actor) = (action.clone(), actor.clone());
        let filter = filter.clone();
        let page_query = page_query.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            filter.set(AuditFilter {
                action: optional(&action),
                actor: optional(&actor),
            });
            page_query.set(PageQuery::new(0, AUDIT_PAGE_SIZE));
        })
    };
    let on_page = {
        let page_query = page_query.clone();
        Callback::from(move |query: PageQuery| page_query.set(query))
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{"Audit log"}</h1>
            <form class="flex flex-wrap gap-2 items-end" {onsubmit}>
                <input class="input input-bordered input-sm" placeholder="Action"
                    value={(*action).clone()} oninput={bind_input(&action)} />
                <input class="input input-bordered input-sm" placeholder="Actor"
                    value={(*actor).clone()} oninput={bind_input(&actor)} />
                <button class="btn btn-sm" type="submit">{"Filter"}</button>
            </form>
            {
                match &*page {
                    None => html! { <span class="loading loading-spinner"></span> },
                    Some(page) => html! {
                        <>
                            <div class="overflow-x-auto">
                                <table class="table table-sm">
                                    <thead>
                                        <tr>
                                            <th>{"When"}</th>
                                            <th>{"Actor"}</th>
                                            <th>{"Action"}</th>
                                            <th>{"Entity"}</th>
                                            <th>{"Details"}</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        { for page.content.iter().map(|entry| html! {
                                            <tr key={entry.id}>
                                                <td>{ entry.timestamp.format("%Y-%m-%d %H:%M").to_string() }</td>
                                                <td>{ entry.actor.clone() }</td>
                                                <td><code>{ entry.action.clone() }</code></td>
                                                <td>{ entry.entity_label().unwrap_or_default() }</td>
                                                <td>{ entry.details.clone().unwrap_or_default() }</td>
                                            </tr>
                                        }) }
                                    </tbody>
                                </table>
                            </div>
                            <Pager
                                query={*page_query}
                                total_pages={page.total_pages}
                                total_elements={page.total_elements}
                                on_change={on_page}
                            />
                        </>
                    },
                }
            }
        </div>
    }
}
