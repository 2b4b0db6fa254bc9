use std::collections::HashMap;

use crate::{
    components::pager::Pager,
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, ToastKind, report_error, show_toast},
};
use shared::models::{ApprovalDecision, ApprovalRequest, Page, PageQuery};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use yewdux::prelude::{use_dispatch, use_selector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Approve,
    Reject,
}

/// Pending approval requests. Buttons stay disabled on requests the
/// signed-in user may not decide, including their own.
#[function_component(ApprovalsPage)]
pub fn approvals_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();
    let user = use_selector(|state: &AppState| state.session.user.clone());

    let page_query = use_state(PageQuery::default);
    let page = use_state(|| None::<Page<ApprovalRequest>>);
    let comments = use_state(HashMap::<i64, String>::new);
    let reload = use_state(|| 0u32);

    {
        let store = store.clone();
        let dispatch = dispatch.clone();
        let interest = interest.clone();
        let page = page.clone();
        use_effect_with((*page_query, *reload), move |(query, _)| {
            let query = *query;
            spawn_local(async move {
                let approvals = store.api().approvals();
                match interest.guard(approvals.pending(query)).await {
                    Some(Ok(result)) => page.set(Some(result)),
                    Some(Err(err)) => report_error(&dispatch, "loading approvals", &err),
                    None => {}
                }
            });
            || ()
        });
    }

    let decide = {
        let comments = comments.clone();
        let reload = reload.clone();
        Callback::from(move |(request_id, verdict): (i64, Verdict)| {
            let decision = ApprovalDecision::with_comment(
                comments.get(&request_id).cloned().unwrap_or_default(),
            );
            let store = store.clone();
            let dispatch = dispatch.clone();
            let interest = interest.clone();
            let reload = reload.clone();
            spawn_local(async move {
                let approvals = store.api().approvals();
                let result = match verdict {
                    Verdict::Approve => interest.guard(approvals.approve(request_id, &decision)).await,
                    Verdict::Reject => interest.guard(approvals.reject(request_id, &decision)).await,
                };
                match result {
                    Some(Ok(updated)) => {
                        let done = if verdict == Verdict::Approve { "approved" } else { "rejected" };
                        show_toast(
                            &dispatch,
                            ToastKind::Success,
                            format!("\"{}\" {done}", updated.expense.title),
                        );
                        reload.set(reload.wrapping_add(1));
                    }
                    Some(Err(err)) => report_error(&dispatch, "recording the decision", &err),
                    None => {}
                }
            });
        })
    };

    let on_page = {
        let page_query = page_query.clone();
        Callback::from(move |query: PageQuery| page_query.set(query))
    };

    let render_request = |request: &ApprovalRequest| -> Html {
        let allowed = (*user)
            .as_ref()
            .is_some_and(|user| request.can_decide(user));
        let id = request.id;
        let on_comment = {
            let comments = comments.clone();
            Callback::from(move |event: InputEvent| {
                if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
                    let mut next = (*comments).clone();
                    next.insert(id, input.value());
                    comments.set(next);
                }
            })
        };
        let approve = {
            let decide = decide.clone();
            Callback::from(move |_| decide.emit((id, Verdict::Approve)))
        };
        let reject = {
            let decide = decide.clone();
            Callback::from(move |_| decide.emit((id, Verdict::Reject)))
        };
        html! {
            <tr key={id}>
                <td>
                    <div class="font-semibold">{ request.expense.title.clone() }</div>
                    <div class="text-xs text-base-content/60">{ request.expense.category.clone() }</div>
                </td>
                <td>{ request.requester.full_name.clone() }</td>
                <td class="text-right">{ request.expense.formatted_amount() }</td>
                <td><span class="badge badge-outline">{ request.level.label() }</span></td>
                <td>
                    <input class="input input-bordered input-xs" placeholder="Comment"
                        disabled={!allowed}
                        value={comments.get(&id).cloned().unwrap_or_default()}
                        oninput={on_comment} />
                </td>
                <td class="flex gap-1 justify-end">
                    <button class="btn btn-xs btn-success" disabled={!allowed} onclick={approve}>{"Approve"}</button>
                    <button class="btn btn-xs btn-error" disabled={!allowed} onclick={reject}>{"Reject"}</button>
                </td>
            </tr>
        }
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{"Approvals"}</h1>
            {
                match &*page {
                    None => html! { <span class="loading loading-spinner"></span> },
                    Some(page) if page.is_empty() => html! {
                        <p class="text-base-content/70">{"Nothing is waiting for a decision."}</p>
                    },
                    Some(page) => html! {
                        <>
                            <div class="overflow-x-auto">
                                <table class="table">
                                    <thead>
                                        <tr>
                                            <th>{"Expense"}</th>
                                            <th>{"Requested by"}</th>
                                            <th class="text-right">{"Amount"}</th>
                                            <th>{"Level"}</th>
                                            <th>{"Comment"}</th>
                                            <th></th>
                                        </tr>
                                    </thead>
                                    <tbody>{ for page.content.iter().map(render_request) }</tbody>
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
