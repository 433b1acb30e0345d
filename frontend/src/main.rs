use crate::app::App;

mod api;
mod app;
mod browser;
mod components;
mod tops_sheet;

fn main() {
    yew::Renderer::<App>::new().render();
}
