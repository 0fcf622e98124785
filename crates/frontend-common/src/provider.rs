//! Yew provider mounting the activity monitor around the authenticated shell

use crate::activity::{BrowserActivity, BrowserCoordinator, LocalStorageStore, browser_coordinator};
use gnt_core::SignInReason;
use std::rc::Rc;
use yew::prelude::*;

/// Gives components access to the shared logout sequence
#[derive(Clone)]
pub struct LogoutContext {
    coordinator: Rc<BrowserCoordinator>,
}

impl LogoutContext {
    /// Sign out now. A second call, or a timer expiry racing this one, is a no-op.
    pub fn logout(&self) {
        self.coordinator.logout(SignInReason::Manual);
    }
}

impl PartialEq for LogoutContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.coordinator, &other.coordinator)
    }
}

/// Activity monitor provider props
#[derive(Properties, PartialEq)]
pub struct ActivityMonitorProviderProps {
    pub children: Children,
}

/// Mounts the monitor for as long as the shell is rendered
#[function_component(ActivityMonitorProvider)]
pub fn activity_monitor_provider(props: &ActivityMonitorProviderProps) -> Html {
    let store = use_memo((), |_| LocalStorageStore::open());
    let context = use_memo((), {
        let store = store.clone();
        move |_| LogoutContext {
            coordinator: Rc::new(browser_coordinator((*store).clone())),
        }
    });

    {
        let store = store.clone();
        let coordinator = context.coordinator.clone();
        use_effect_with((), move |_| {
            let activity = BrowserActivity::mount((*store).clone(), coordinator);
            tracing::debug!(state = ?activity.state(), "Activity monitor mounted");

            // Cleanup on unmount
            move || drop(activity)
        });
    }

    html! {
        <ContextProvider<LogoutContext> context={(*context).clone()}>
            {props.children.clone()}
        </ContextProvider<LogoutContext>>
    }
}

/// Callback performing a manual logout through the shared coordinator
#[hook]
pub fn use_logout() -> Callback<()> {
    let context = use_context::<LogoutContext>();
    Callback::from(move |()| match &context {
        Some(context) => context.logout(),
        None => tracing::error!("use_logout called outside ActivityMonitorProvider"),
    })
}
