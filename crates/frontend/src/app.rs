use gnt_frontend_common::{ActivityMonitorProvider, use_logout};
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    html! {
        <ActivityMonitorProvider>
            <Toolbar />
        </ActivityMonitorProvider>
    }
}

#[function_component(Toolbar)]
fn toolbar() -> Html {
    let logout = use_logout();
    let onclick = Callback::from(move |_: MouseEvent| logout.emit(()));

    html! {
        <header class="toolbar">
            <button type="button" {onclick}>{ "Logout" }</button>
        </header>
    }
}
