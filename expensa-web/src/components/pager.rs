use shared::models::PageQuery;
use yew::{Callback, Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct PagerProps {
    pub query: PageQuery,
    pub total_pages: u32,
    pub total_elements: u64,
    pub on_change: Callback<PageQuery>,
}

/// Previous/next controls for a paged listing.
#[function_component(Pager)]
pub fn pager(props: &PagerProps) -> Html {
    let query = props.query;
    let has_previous = query.page > 0;
    let has_next = query.page + 1 < props.total_pages;
    let previous = {
        let on_change = props.on_change.clone();
        Callback::from(move |_| on_change.emit(query.previous()))
    };
    let next = {
        let on_change = props.on_change.clone();
        Callback::from(move |_| on_change.emit(query.next()))
    };

    html! {
        <div class="flex items-center justify-between mt-4">
            <span class="text-sm text-base-content/70">
                { format!("Page {} of {} · {} total", query.page + 1, props.total_pages.max(1), props.total_elements) }
            </span>
            <div class="join">
                <button class="join-item btn btn-sm" disabled={!has_previous} onclick={previous}>{"«"}</button>
                <button class="join-item btn btn-sm" disabled={!has_next} onclick={next}>{"»"}</button>
            </div>
        </div>
    }
}
