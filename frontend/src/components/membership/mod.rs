//! Membership form: root module wiring the Yew `Component` implementation
//! with submodules for state, messages, update logic, view rendering and
//! helpers.
//!
//! All form semantics live in `common::session::FormSession`; this component
//! only turns DOM events into session calls and runs the asynchronous halves
//! (render, save) through `api::HttpClient`.

use yew::prelude::*;

mod helpers;
mod messages;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::MembershipComponent;

impl Component for MembershipComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        MembershipComponent::new(crate::browser::today())
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
