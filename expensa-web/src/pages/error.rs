use crate::routes::Route;
use yew::{Html, function_component, html};
use yew_router::prelude::Link;

#[function_component(ErrorPage)]
pub fn error_page() -> Html {
    html! {
        <div class="hero min-h-[50vh]">
            <div class="hero-content text-center">
                <div>
                    <h1 class="text-5xl font-bold">{"404"}</h1>
                    <p class="py-6">{"This page does not exist."}</p>
                    <Link<Route> to={Route::Home} classes="btn btn-primary">{"Back to expenses"}</Link<Route>>
                </div>
            </div>
        </div>
    }
}
