//! Login Page

use financegpt::auth::{submit_login, AuthAction, AuthFormState, LoginForm};
use financegpt::present::{
    LOGIN_BUTTON, LOGIN_BUTTON_BUSY, LOGIN_SUBTITLE, LOGIN_TITLE, SIGNUP_PROMPT,
};
use financegpt::NavEvent;
use leptos::*;

use crate::api::{api_config, GlooAuthBackend};
use crate::state::global::use_global_state;
use crate::state::LocalStorageTokenStore;

#[component]
pub fn LoginPage() -> impl IntoView {
    let state = use_global_state();

    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let form_state = create_rw_signal(AuthFormState::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if form_state.with_untracked(AuthFormState::is_loading) {
            return;
        }
        form_state.update(AuthFormState::begin);

        let form = LoginForm::new(email.get_untracked(), password.get_untracked());
        spawn_local(async move {
            let backend = GlooAuthBackend::new(api_config());
            let result = submit_login(&backend, &LocalStorageTokenStore::new(), &form).await;
            // The page may be gone by now; try_update is a no-op then
            let name = form_state
                .try_update(|form_state| form_state.settle(result, AuthAction::Login))
                .flatten();
            if let Some(name) = name {
                state.navigate(NavEvent::AuthSucceeded(name));
            }
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center px-4">
            <div class="bg-white rounded-2xl shadow-xl border border-amber-100 p-8 w-full max-w-md">
                <h1 class="text-3xl font-bold text-gray-900">{LOGIN_TITLE}</h1>
                <p class="text-gray-500 mt-1 mb-6">{LOGIN_SUBTITLE}</p>

                <form on:submit=on_submit class="space-y-4">
                    <div>
                        <label class="block text-sm text-gray-600 mb-1">"Email"</label>
                        <input
                            type="email"
                            required
                            prop:value=move || email.get()
                            on:input=move |ev| set_email.set(event_target_value(&ev))
                            class="w-full rounded-lg px-4 py-3 border border-gray-300 \
                                   focus:border-amber-500 focus:outline-none"
                        />
                    </div>
                    <div>
                        <label class="block text-sm text-gray-600 mb-1">"Password"</label>
                        <input
                            type="password"
                            required
                            prop:value=move || password.get()
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                            class="w-full rounded-lg px-4 py-3 border border-gray-300 \
                                   focus:border-amber-500 focus:outline-none"
                        />
                    </div>

                    {move || form_state.with(|f| f.error().map(str::to_string)).map(|error| view! {
                        <p class="text-sm text-red-600">{error}</p>
                    })}

                    <button
                        type="submit"
                        disabled=move || form_state.with(AuthFormState::is_loading)
                        class="w-full bg-amber-500 hover:bg-amber-600 disabled:bg-gray-400 \
                               disabled:cursor-not-allowed text-white rounded-lg py-3 \
                               font-semibold transition-colors"
                    >
                        {move || if form_state.with(AuthFormState::is_loading) {
                            LOGIN_BUTTON_BUSY
                        } else {
                            LOGIN_BUTTON
                        }}
                    </button>
                </form>

                <p class="text-sm text-gray-600 text-center mt-6">
                    {SIGNUP_PROMPT} " "
                    <button
                        type="button"
                        on:click=move |_| state.navigate(NavEvent::SwitchToSignup)
                        class="text-amber-600 hover:text-amber-700 font-semibold"
                    >
                        "Sign up"
                    </button>
                </p>
            </div>
        </div>
    }
}
