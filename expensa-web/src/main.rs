mod app;
mod components;
mod config;
mod console;
mod containers;
mod hooks;
mod models;
mod pages;
mod routes;
mod storage;

use app::App;
use yew::{Html, Renderer, function_component, html};
use yewdux::YewduxRoot;

#[function_component(Root)]
fn root() -> Html {
    html! {
        <YewduxRoot>
            <App />
        </YewduxRoot>
    }
}

fn main() {
    // Disable truncation of panic payloads to debug any panics
    std::panic::set_hook(Box::new(|info| {
        if let Some(s) = info.payload().downcast_ref::<String>() {
            console::error(&format!("Panic: {s}"));
        } else if let Some(s) = info.payload().downcast_ref::<&str>() {
            console::error(&format!("Panic: {s}"));
        } else {
            console::error("Unknown panic");
        }
        if let Some(location) = info.location() {
            console::error(&format!(
                "  at {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            ));
        }
    }));

    console::log("Starting Expensa");

    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        console::error("no <body> element to mount the application on");
        return;
    };
    Renderer::<Root>::with_root(body.into()).render();
}
