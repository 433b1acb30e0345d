//! Modal sheet laid over the page: the success popup of the membership form
//! and the review panel of the dashboard.

use yew::{classes, html, Callback, Component, Context, Html, MouseEvent, Properties};

pub struct YwMaterialTopSheet;

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub open: bool,
    /// Fired by a click on the backdrop.
    #[prop_or_default]
    pub on_close: Option<Callback<()>>,
    #[prop_or_default]
    pub wide: bool,
}

impl Component for YwMaterialTopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        Self
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        if !props.open {
            return html! {};
        }
        let on_backdrop = props.on_close.clone().map(|cb| Callback::from(move |_: MouseEvent| cb.emit(())));
        html! {
            <div class="top-sheet show" onclick={on_backdrop}>
                <div
                    class={classes!("top-sheet-panel", props.wide.then_some("wide"))}
                    onclick={Callback::from(|e: MouseEvent| e.stop_propagation())}
                >
                    { props.children.clone() }
                </div>
            </div>
        }
    }
}
