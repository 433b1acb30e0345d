//! Admin dashboard: login gate, record statistics, the filtered record table
//! and the review sheet for a single application.
//!
//! The session token returned by `/api/admin/login` lives only in component
//! state; reloading the page asks for the credentials again.

use yew::prelude::*;

mod helpers;
mod messages;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use state::AdminComponent;

impl Component for AdminComponent {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        AdminComponent::default()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
