//! Root component: a two-route hash router. `#/admin` shows the review
//! dashboard, every other hash the public membership form.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::{html, Component, Context, Html};

use crate::browser;
use crate::components::admin::AdminComponent;
use crate::components::membership::MembershipComponent;

pub const ADMIN_ROUTE: &str = "#/admin";

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Route {
    Form,
    Admin,
}

impl Route {
    pub fn from_hash(hash: &str) -> Self {
        if hash == ADMIN_ROUTE {
            Route::Admin
        } else {
            Route::Form
        }
    }
}

pub enum Msg {
    HashChanged,
}

pub struct App {
    route: Route,
    _listener: Option<Closure<dyn Fn()>>,
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        let listener = Closure::<dyn Fn()>::new(move || link.send_message(Msg::HashChanged));
        let registered = web_sys::window()
            .map(|w| {
                w.add_event_listener_with_callback("hashchange", listener.as_ref().unchecked_ref())
                    .is_ok()
            })
            .unwrap_or(false);

        Self {
            route: Route::from_hash(&browser::current_hash()),
            _listener: registered.then_some(listener),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::HashChanged => {
                let route = Route::from_hash(&browser::current_hash());
                let changed = route != self.route;
                self.route = route;
                changed
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        match self.route {
            Route::Admin => html! { <AdminComponent /> },
            Route::Form => html! { <MembershipComponent /> },
        }
    }
}
