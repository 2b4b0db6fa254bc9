use chrono::{Local, NaiveDate};
use shared::models::{Expense, ExpenseRequest};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::use_dispatch;

use crate::{
    components::form::{bind_input, bind_textarea, optional},
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, ToastKind, report_error, show_toast},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Properties, PartialEq)]
pub struct ExpenseDialogProps {
    /// The expense being edited; a new one is created when absent.
    #[prop_or_default]
    pub expense: Option<Expense>,
    pub on_close: Callback<()>,
    pub on_saved: Callback<Expense>,
}

/// Parses the dialog fields into a request, collecting every problem.
fn build_request(
    title: &str,
    description: &str,
    amount: &str,
    currency: &str,
    category: &str,
    date: &str,
) -> Result<ExpenseRequest, Vec<String>> {
    let mut errors = Vec::new();
    let amount = amount.trim().parse::<f64>().unwrap_or_else(|_| {
        errors.push("Amount must be a number".to_string());
        f64::NAN
    });
    let expense_date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT).unwrap_or_else(|_| {
        errors.push("Date must be in YYYY-MM-DD format".to_string());
        Local::now().date_naive()
    });
    let request = ExpenseRequest {
        title: title.trim().to_string(),
        description: optional(description),
        amount,
        currency: currency.trim().to_ascii_uppercase(),
        category: category.trim().to_string(),
        expense_date,
    };
    if let Err(problems) = request.validate() {
        errors.extend(
            problems
                .into_iter()
                .filter(|problem| !(amount.is_nan() && problem.starts_with("Amount"))),
        );
    }
    if errors.is_empty() { Ok(request) } else { Err(errors) }
}

#[function_component(ExpenseDialog)]
pub fn expense_dialog(props: &ExpenseDialogProps) -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();

    let initial = props.expense.as_ref();
    let title = use_state(|| initial.map(|e| e.title.clone()).unwrap_or_default());
    let description = use_state(|| {
        initial
            .and_then(|e| e.description.clone())
            .unwrap_or_default()
    });
    let amount = use_state(|| initial.map(|e| format!("{:.2}", e.amount)).unwrap_or_default());
    let currency = use_state(|| {
        initial
            .map(|e| e.currency.clone())
            .unwrap_or_else(|| "USD".to_string())
    });
    let category = use_state(|| initial.map(|e| e.category.clone()).unwrap_or_default());
    let date = use_state(|| {
        initial
            .map(|e| e.expense_date)
            .unwrap_or_else(|| Local::now().date_naive())
            .format(DATE_FORMAT)
            .to_string()
    });
    let errors = use_state(Vec::<String>::new);
    let saving = use_state(|| false);

    let editing_id = props.expense.as_ref().map(|expense| expense.id);

    let onsubmit = {
        let (title, description, amount, currency, category, date) = (
            title.clone(),
            description.clone(),
            amount.clone(),
            currency.clone(),
            category.clone(),
            date.clone(),
        );
        let errors = errors.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let request = match build_request(
                &title,
                &description,
                &amount,
                &currency,
                &category,
                &date,
            ) {
                Ok(request) => request,
                Err(problems) => {
                    errors.set(problems);
                    return;
                }
            };
            errors.set(Vec::new());
            saving.set(true);

            let store = store.clone();
            let dispatch = dispatch.clone();
            let interest = interest.clone();
            let saving = saving.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                let expenses = store.api().expenses();
                let result = match editing_id {
                    Some(id) => interest.guard(expenses.update(id, &request)).await,
                    None => interest.guard(expenses.create(&request)).await,
                };
                match result {
                    Some(Ok(expense)) => {
                        show_toast(&dispatch, ToastKind::Success, format!("Saved \"{}\"", expense.title));
                        on_saved.emit(expense);
                    }
                    Some(Err(err)) => {
                        report_error(&dispatch, "saving the expense", &err);
                        saving.set(false);
                    }
                    None => {}
                }
            });
        })
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_| on_close.emit(()))
    };

    let heading = if editing_id.is_some() { "Edit expense" } else { "New expense" };

    html! {
        <div class="modal modal-open">
            <div class="modal-box">
                <h3 class="font-bold text-lg">{ heading }</h3>
                if !errors.is_empty() {
                    <div class="alert alert-error mt-3">
                        <ul>
                            { for errors.iter().map(|problem| html! { <li>{ problem.clone() }</li> }) }
                        </ul>
                    </div>
                }
                <form class="flex flex-col gap-3 mt-4" {onsubmit}>
                    <input class="input input-bordered" placeholder="Title"
                        value={(*title).clone()} oninput={bind_input(&title)} />
                    <textarea class="textarea textarea-bordered" placeholder="Description"
                        value={(*description).clone()} oninput={bind_textarea(&description)} />
                    <div class="flex gap-3">
                        <input class="input input-bordered w-2/3" placeholder="Amount" inputmode="decimal"
                            value={(*amount).clone()} oninput={bind_input(&amount)} />
                        <input class="input input-bordered w-1/3" placeholder="USD" maxlength="3"
                            value={(*currency).clone()} oninput={bind_input(&currency)} />
                    </div>
                    <input class="input input-bordered" placeholder="Category"
                        value={(*category).clone()} oninput={bind_input(&category)} />
                    <input class="input input-bordered" type="date"
                        value={(*date).clone()} oninput={bind_input(&date)} />
                    <div class="modal-action">
                        <button type="button" class="btn btn-ghost" onclick={on_cancel}>{"Cancel"}</button>
                        <button type="submit" class="btn btn-primary" disabled={*saving}>
                            { if *saving { "Saving..." } else { "Save" } }
                        </button>
                    </div>
                </form>
            </div>
        </div>
    }
}
