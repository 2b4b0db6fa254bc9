use crate::{
    components::{
        expense_dialog::ExpenseDialog,
        form::{bind_input, bind_select, optional},
        pager::Pager,
    },
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, ToastKind, report_error, show_toast},
};
use chrono::NaiveDate;
use shared::models::{Expense, ExpenseFilter, ExpenseStatus, Page, PageQuery};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_icons::{Icon, IconId};
use yewdux::prelude::{use_dispatch, use_selector};

#[derive(Debug, Clone, PartialEq)]
enum Dialog {
    Closed,
    Create,
    Edit(Expense),
}

fn status_badge(status: ExpenseStatus) -> &'static str {
    match status {
        ExpenseStatus::Draft => "badge-ghost",
        ExpenseStatus::Pending => "badge-warning",
        ExpenseStatus::Approved => "badge-info",
        ExpenseStatus::Rejected => "badge-error",
        ExpenseStatus::Paid => "badge-success",
    }
}

/// Builds the list filter from the raw form fields. Unparsable dates are
/// ignored rather than sent.
fn filter_from_fields(status: &str, category: &str, search: &str, from: &str, to: &str) -> ExpenseFilter {
    ExpenseFilter {
        status: status.parse().ok(),
        category: optional(category),
        search: optional(search),
        from: NaiveDate::parse_from_str(from, "%Y-%m-%d").ok(),
        to: NaiveDate::parse_from_str(to, "%Y-%m-%d").ok(),
    }
}

/// Dashboard page component: the signed-in user's expenses.
#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();
    let greeting = use_selector(|state: &AppState| {
        state.session.display_name().map(str::to_string)
    });

    let status = use_state(String::new);
    let category = use_state(String::new);
    let search = use_state(String::new);
    let from = use_state(String::new);
    let to = use_state(String::new);
    let filter = use_state(ExpenseFilter::default);
    let page_query = use_state(PageQuery::default);
    let page = use_state(|| None::<Page<Expense>>);
    let reload = use_state(|| 0u32);
    let dialog = use_state(|| Dialog::Closed);

    {
        let store = store.clone();
        let dispatch = dispatch.clone();
        let interest = interest.clone();
        let page = page.clone();
        use_effect_with(
            ((*filter).clone(), *page_query, *reload),
            move |(filter, query, _)| {
                let filter = filter.clone();
                let query = *query;
                spawn_local(async move {
                    let expenses = store.api().expenses();
                    match interest.guard(expenses.list(&filter, query)).await {
                        Some(Ok(result)) => page.set(Some(result)),
                        Some(Err(err)) => report_error(&dispatch, "loading expenses", &err),
                        None => {}
                    }
                });
                || ()
            },
        );
    }

    let refresh = {
        let reload = reload.clone();
        Callback::from(move |()| reload.set(reload.wrapping_add(1)))
    };

    let apply_filter = {
        let (status, category, search, from, to) =
            (status.clone(), category.clone(), search.clone(), from.clone(), to.clone());
        let filter = filter.clone();
        let page_query = page_query.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            filter.set(filter_from_fields(&status, &category, &search, &from, &to));
            page_query.set(PageQuery::default());
        })
    };

    // Runs a row action, then reloads the list.
    let row_action = {
        let store = store.clone();
        let dispatch = dispatch.clone();
        let interest = interest.clone();
        let refresh = refresh.clone();
        Callback::from(move |(expense, submit): (Expense, bool)| {
            let store = store.clone();
            let dispatch = dispatch.clone();
            let interest = interest.clone();
            let refresh = refresh.clone();
            spawn_local(async move {
                let expenses = store.api().expenses();
                let (result, action, done) = if submit {
                    let result = interest.guard(expenses.submit(expense.id)).await.map(|r| r.map(|_| ()));
                    (result, "submitting the expense", "submitted for approval")
                } else {
                    (interest.guard(expenses.delete(expense.id)).await, "deleting the expense", "deleted")
                };
                match result {
                    Some(Ok(())) => {
                        show_toast(&dispatch, ToastKind::Success, format!("\"{}\" {done}", expense.title));
                        refresh.emit(());
                    }
                    Some(Err(err)) => report_error(&dispatch, action, &err),
                    None => {}
                }
            });
        })
    };

    let open_create = {
        let dialog = dialog.clone();
        Callback::from(move |_| dialog.set(Dialog::Create))
    };
    let close_dialog = {
        let dialog = dialog.clone();
        Callback::from(move |()| dialog.set(Dialog::Closed))
    };
    let on_saved = {
        let dialog = dialog.clone();
        let refresh = refresh.clone();
        Callback::from(move |_: Expense| {
            dialog.set(Dialog::Closed);
            refresh.emit(());
        })
    };
    let on_page = {
        let page_query = page_query.clone();
        Callback::from(move |query: PageQuery| page_query.set(query))
    };

    let rows = page.as_ref().map(|page| {
        page.content
            .iter()
            .map(|expense| {
                let editable = expense.status.is_editable();
                let edit = {
                    let dialog = dialog.clone();
                    let expense = expense.clone();
                    Callback::from(move |_| dialog.set(Dialog::Edit(expense.clone())))
                };
                let submit = {
                    let row_action = row_action.clone();
                    let expense = expense.clone();
                    Callback::from(move |_| row_action.emit((expense.clone(), true)))
                };
                let delete = {
                    let row_action = row_action.clone();
                    let expense = expense.clone();
                    Callback::from(move |_| row_action.emit((expense.clone(), false)))
                };
                html! {
                    <tr key={expense.id}>
                        <td>
                            <div class="font-semibold">{ expense.title.clone() }</div>
                            if let Some(description) = &expense.description {
                                <div class="text-xs text-base-content/60">{ description.clone() }</div>
                            }
                        </td>
                        <td>{ expense.expense_date.to_string() }</td>
                        <td>{ expense.category.clone() }</td>
                        <td class="text-right">{ expense.formatted_amount() }</td>
                        <td><span class={classes!("badge", status_badge(expense.status))}>{ expense.status.label() }</span></td>
                        <td class="flex gap-1 justify-end">
                            if editable {
                                <button class="btn btn-xs btn-ghost" title="Edit" onclick={edit}>
                                    <Icon icon_id={IconId::HeroiconsOutlinePencilSquare} class="w-4 h-4" />
                                </button>
                                <button class="btn btn-xs btn-primary" onclick={submit}>{"Submit"}</button>
                                <button class="btn btn-xs btn-ghost text-error" title="Delete" onclick={delete}>
                                    <Icon icon_id={IconId::HeroiconsOutlineTrash} class="w-4 h-4" />
                                </button>
                            }
                        </td>
                    </tr>
                }
            })
            .collect::<Html>()
    });

    html! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-2xl font-bold">
                    { (*greeting).as_deref().map_or_else(|| "Your expenses".to_string(), |name| format!("{name}'s expenses")) }
                </h1>
                <button class="btn btn-primary gap-2" onclick={open_create}>
                    <Icon icon_id={IconId::HeroiconsOutlinePlus} class="w-5 h-5" />
                    {"New expense"}
                </button>
            </div>

            <form class="flex flex-wrap gap-2 items-end" onsubmit={apply_filter}>
                <select class="select select-bordered select-sm" onchange={bind_select(&status)}>
                    <option value="" selected={status.is_empty()}>{"Any status"}</option>
                    { for ExpenseStatus::ALL.iter().map(|option| html! {
                        <option value={option.as_str()} selected={*status == option.as_str()}>{ option.label() }</option>
                    }) }
                </select>
                <input class="input input-bordered input-sm" placeholder="Category"
                    value={(*category).clone()} oninput={bind_input(&category)} />
                <input class="input input-bordered input-sm" placeholder="Search"
                    value={(*search).clone()} oninput={bind_input(&search)} />
                <input class="input input-bordered input-sm" type="date"
                    value={(*from).clone()} oninput={bind_input(&from)} />
                <input class="input input-bordered input-sm" type="date"
                    value={(*to).clone()} oninput={bind_input(&to)} />
                <button class="btn btn-sm" type="submit">{"Filter"}</button>
            </form>

            {
                match (&*page, rows) {
                    (Some(page), Some(rows)) if !page.is_empty() => html! {
                        <>
                            <div class="overflow-x-auto">
                                <table class="table table-zebra">
                                    <thead>
                                        <tr>
                                            <th>{"Title"}</th>
                                            <th>{"Date"}</th>
                                            <th>{"Category"}</th>
                                            <th class="text-right">{"Amount"}</th>
                                            <th>{"Status"}</th>
                                            <th></th>
                                        </tr>
                                    </thead>
                                    <tbody>{ rows }</tbody>
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
                    (Some(_), _) => html! { <p class="text-base-content/70">{"No expenses match."}</p> },
                    (None, _) => html! { <span class="loading loading-spinner"></span> },
                }
            }

            {
                match &*dialog {
                    Dialog::Closed => html! {},
                    Dialog::Create => html! {
                        <ExpenseDialog on_close={close_dialog} {on_saved} />
                    },
                    Dialog::Edit(expense) => html! {
                        <ExpenseDialog
                            key={expense.id}
                            expense={Some(expense.clone())}
                            on_close={close_dialog}
                            {on_saved}
                        />
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
    fn filter_fields_become_query_values() {
        let filter = filter_from_fields("PENDING", " ", "hotel", "2025-01-01", "31.01.2025");
        assert_eq!(filter.status, Some(ExpenseStatus::Pending));
        assert_eq!(filter.category, None);
        assert_eq!(filter.search.as_deref(), Some("hotel"));
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(filter.to, None);

        assert_eq!(filter_from_fields("", "", "", "", ""), ExpenseFilter::default());
    }
}
