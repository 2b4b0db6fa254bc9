use crate::{
    components::{form::bind_input, pager::Pager},
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, ToastKind, report_error, show_toast},
};
use js_sys::{Array, Uint8Array};
use shared::models::{Invoice, Page, PageQuery};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};
use yew::prelude::*;
use yewdux::prelude::use_dispatch;

/// Hands `bytes` to the browser as a file download named `file_name`.
fn save_pdf(bytes: &[u8], file_name: &str) -> Result<(), JsValue> {
    let parts = Array::new();
    parts.push(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type("application/pdf");
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);
    anchor.click();
    Url::revoke_object_url(&url)
}

#[function_component(InvoicesPage)]
pub fn invoices_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();

    let page_query = use_state(PageQuery::default);
    let page = use_state(|| None::<Page<Invoice>>);
    let reload = use_state(|| 0u32);
    let expense_id = use_state(String::new);

    {
        let store = store.clone();
        let dispatch = dispatch.clone();
        let interest = interest.clone();
        let page = page.clone();
        use_effect_with((*page_query, *reload), move |(query, _)| {
            let query = *query;
            spawn_local(async move {
                let invoices = store.api().invoices();
                match interest.guard(invoices.list(query)).await {
                    Some(Ok(result)) => page.set(Some(result)),
                    Some(Err(err)) => report_error(&dispatch, "loading invoices", &err),
                    None => {}
                }
            });
            || ()
        });
    }

    let generate = {
        let store = store.clone();
        let dispatch = dispatch.clone();
        let interest = interest.clone();
        let expense_id = expense_id.clone();
        let reload = reload.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Ok(id) = expense_id.trim().parse::<i64>() else {
                show_toast(&dispatch, ToastKind::Error, "Enter the numeric id of an approved expense.");
                return;
            };
            let store = store.clone();
            let dispatch = dispatch.clone();
            let interest = interest.clone();
            let expense_id = expense_id.clone();
            let reload = reload.clone();
            spawn_local(async move {
                let invoices = store.api().invoices();
                match interest.guard(invoices.generate(id)).await {
                    Some(Ok(invoice)) => {
                        show_toast(&dispatch, ToastKind::Success, format!("Invoice {} generated", invoice.number));
                        expense_id.set(String::new());
                        reload.set(reload.wrapping_add(1));
                    }
                    Some(Err(err)) => report_error(&dispatch, "generating the invoice", &err),
                    None => {}
                }
            });
        })
    };

    let download = Callback::from(move |invoice: Invoice| {
        let store = store.clone();
        let dispatch = dispatch.clone();
        let interest = interest.clone();
        spawn_local(async move {
            let invoices = store.api().invoices();
            match interest.guard(invoices.download(invoice.id)).await {
                Some(Ok(bytes)) => {
                    if let Err(err) = save_pdf(&bytes, &invoice.file_name()) {
                        crate::console::error(&format!("could not save invoice: {err:?}"));
                        show_toast(&dispatch, ToastKind::Error, "The browser refused to save the invoice.");
                    }
                }
                Some(Err(err)) => report_error(&dispatch, "downloading the invoice", &err),
                None => {}
            }
        });
    });

    let on_page = {
        let page_query = page_query.clone();
        Callback::from(move |query: PageQuery| page_query.set(query))
    };

    html! {
        <div class="space-y-6">
            <div class="flex flex-wrap items-center justify-between gap-4">
                <h1 class="text-2xl font-bold">{"Invoices"}</h1>
                <form class="join" onsubmit={generate}>
                    <input class="input input-bordered input-sm join-item" placeholder="Expense id"
                        inputmode="numeric"
                        value={(*expense_id).clone()} oninput={bind_input(&expense_id)} />
                    <button class="btn btn-sm btn-primary join-item" type="submit">{"Generate"}</button>
                </form>
            </div>
            {
                match &*page {
                    None => html! { <span class="loading loading-spinner"></span> },
                    Some(page) if page.is_empty() => html! {
                        <p class="text-base-content/70">{"No invoices yet."}</p>
                    },
                    Some(page) => html! {
                        <>
                            <table class="table">
                                <thead>
                                    <tr>
                                        <th>{"Number"}</th>
                                        <th>{"Expense"}</th>
                                        <th>{"Issued"}</th>
                                        <th class="text-right">{"Amount"}</th>
                                        <th>{"Status"}</th>
                                        <th></th>
                                    </tr>
                                </thead>
                                <tbody>
                                    { for page.content.iter().map(|invoice| {
                                        let onclick = {
                                            let download = download.clone();
                                            let invoice = invoice.clone();
                                            Callback::from(move |_| download.emit(invoice.clone()))
                                        };
                                        html! {
                                            <tr key={invoice.id}>
                                                <td>{ invoice.number.clone() }</td>
                                                <td>{ format!("#{}", invoice.expense_id) }</td>
                                                <td>{ invoice.issued_at.format("%Y-%m-%d").to_string() }</td>
                                                <td class="text-right">{ format!("{:.2} {}", invoice.amount, invoice.currency) }</td>
                                                <td>{ invoice.status.label() }</td>
                                                <td><button class="btn btn-xs" {onclick}>{"Download"}</button></td>
                                            </tr>
                                        }
                                    }) }
                                </tbody>
                            </table>
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
