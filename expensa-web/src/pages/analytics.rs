use crate::{
    components::form::bind_input,
    hooks::{use_interest, use_session_store},
    models::app_state::{AppState, report_error},
};
use chrono::NaiveDate;
use shared::models::{AnalyticsSummary, DateRange};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yewdux::prelude::use_dispatch;

/// Parses the two date fields. A window whose start is after its end is
/// rejected.
fn parse_range(from: &str, to: &str) -> Result<DateRange, &'static str> {
    let parse = |value: &str| {
        let value = value.trim();
        if value.is_empty() {
            Ok(None)
        } else {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| "Dates must be in YYYY-MM-DD format")
        }
    };
    let range = DateRange {
        from: parse(from)?,
        to: parse(to)?,
    };
    match (range.from, range.to) {
        (Some(from), Some(to)) if from > to => Err("The start date must not be after the end date"),
        _ => Ok(range),
    }
}

#[function_component(AnalyticsPage)]
pub fn analytics_page() -> Html {
    let store = use_session_store();
    let dispatch = use_dispatch::<AppState>();
    let interest = use_interest();

    let from = use_state(String::new);
    let to = use_state(String::new);
    let range = use_state(DateRange::default);
    let problem = use_state(|| None::<&'static str>);
    let summary = use_state(|| None::<AnalyticsSummary>);

    {
        let summary = summary.clone();
        use_effect_with(*range, move |range| {
            let range = *range;
            spawn_local(async move {
                let analytics = store.api().analytics();
                match interest.guard(analytics.summary(range)).await {
                    Some(Ok(result)) => summary.set(Some(result)),
                    Some(Err(err)) => report_error(&dispatch, "loading analytics", &err),
                    None => {}
                }
            });
            || ()
        });
    }

    let onsubmit = {
        let (from, to) = (from.clone(), to.clone());
        let range = range.clone();
        let problem = problem.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            match parse_range(&from, &to) {
                Ok(parsed) => {
                    problem.set(None);
                    range.set(parsed);
                }
                Err(message) => problem.set(Some(message)),
            }
        })
    };

    let body = match &*summary {
        None => html! { <span class="loading loading-spinner"></span> },
        Some(summary) => {
            let top = summary
                .top_category()
                .map_or_else(|| "n/a".to_string(), |category| category.category.clone());
            html! {
                <>
                    <div class="stats shadow w-full">
                        <div class="stat">
                            <div class="stat-title">{"Total spent"}</div>
                            <div class="stat-value">{ format!("{:.2}", summary.total_amount) }</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">{"Expenses"}</div>
                            <div class="stat-value">{ summary.expense_count }</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">{"Awaiting approval"}</div>
                            <div class="stat-value">{ summary.pending_count }</div>
                        </div>
                        <div class="stat">
                            <div class="stat-title">{"Top category"}</div>
                            <div class="stat-value text-lg">{ top }</div>
                        </div>
                    </div>
                    <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                        <div class="card bg-base-200">
                            <div class="card-body">
                                <h2 class="card-title">{"By category"}</h2>
                                { for summary.by_category.iter().map(|category| {
                                    let share = summary.category_share(category);
                                    html! {
                                        <div>
                                            <div class="flex justify-between text-sm">
                                                <span>{ category.category.clone() }</span>
                                                <span>{ format!("{:.2} ({share:.0}%)", category.total) }</span>
                                            </div>
                                            <progress class="progress progress-primary w-full" value={format!("{share:.0}")} max="100"></progress>
                                        </div>
                                    }
                                }) }
                            </div>
                        </div>
                        <div class="card bg-base-200">
                            <div class="card-body">
                                <h2 class="card-title">{"By status"}</h2>
                                <ul>
                                    { for summary.by_status.iter().map(|entry| html! {
                                        <li class="flex justify-between">
                                            <span>{ entry.status.label() }</span>
                                            <span>{ entry.count }</span>
                                        </li>
                                    }) }
                                </ul>
                            </div>
                        </div>
                        <div class="card bg-base-200">
                            <div class="card-body">
                                <h2 class="card-title">{"By month"}</h2>
                                <ul>
                                    { for summary.monthly.iter().map(|month| html! {
                                        <li class="flex justify-between">
                                            <span>{ month.month.clone() }</span>
                                            <span>{ format!("{:.2}", month.total) }</span>
                                        </li>
                                    }) }
                                </ul>
                            </div>
                        </div>
                    </div>
                </>
            }
        }
    };

    html! {
        <div class="space-y-6">
            <h1 class="text-2xl font-bold">{"Analytics"}</h1>
            <form class="flex flex-wrap gap-2 items-end" {onsubmit}>
                <input class="input input-bordered input-sm" type="date"
                    value={(*from).clone()} oninput={bind_input(&from)} />
                <input class="input input-bordered input-sm" type="date"
                    value={(*to).clone()} oninput={bind_input(&to)} />
                <button class="btn btn-sm" type="submit">{"Apply"}</button>
            </form>
            if let Some(message) = *problem {
                <div class="alert alert-warning"><span>{ message }</span></div>
            }
            { body }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_validated() {
        assert_eq!(parse_range("", "").unwrap(), DateRange::default());
        let range = parse_range("2025-01-01", "2025-03-31").unwrap();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert!(parse_range("2025-04-01", "2025-03-31").is_err());
        assert!(parse_range("April", "").is_err());
    }
}
