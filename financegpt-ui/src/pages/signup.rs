//! Signup Page
//!
//! Account creation with the KYC profile fields the assistant uses to
//! tailor its answers.

use financegpt::auth::{
    submit_signup, AuthAction, AuthFormState, SignupForm, EMPLOYMENT_TYPES, RISK_APPETITES,
};
use financegpt::present::{
    LOGIN_PROMPT, SIGNUP_BUTTON, SIGNUP_BUTTON_BUSY, SIGNUP_SUBTITLE, SIGNUP_TITLE,
};
use financegpt::NavEvent;
use leptos::*;

use crate::api::{api_config, GlooAuthBackend};
use crate::state::global::use_global_state;
use crate::state::LocalStorageTokenStore;

const INPUT_CLASS: &str = "w-full rounded-lg px-4 py-3 border border-gray-300 \
                           focus:border-amber-500 focus:outline-none";

type Getter = fn(&SignupForm) -> &String;
type Setter = fn(&mut SignupForm, String);

/// Labelled text-like input bound to one form field
fn text_field(
    form: RwSignal<SignupForm>,
    label: &'static str,
    kind: &'static str,
    get: Getter,
    set: Setter,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-600 mb-1">{label}</label>
            <input
                type=kind
                required
                prop:value=move || form.with(|f| get(f).clone())
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
                class=INPUT_CLASS
            />
        </div>
    }
}

/// Labelled select with a disabled placeholder entry
fn select_field(
    form: RwSignal<SignupForm>,
    label: &'static str,
    choices: &'static [(&'static str, &'static str)],
    get: Getter,
    set: Setter,
) -> impl IntoView {
    view! {
        <div>
            <label class="block text-sm text-gray-600 mb-1">{label}</label>
            <select
                required
                prop:value=move || form.with(|f| get(f).clone())
                on:change=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
                class=INPUT_CLASS
            >
                <option value="" disabled selected>"Select..."</option>
                {choices.iter().map(|(value, text)| view! {
                    <option value=*value>{*text}</option>
                }).collect_view()}
            </select>
        </div>
    }
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let state = use_global_state();

    let form = create_rw_signal(SignupForm::default());
    let form_state = create_rw_signal(AuthFormState::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if form_state.with_untracked(AuthFormState::is_loading) {
            return;
        }
        form_state.update(AuthFormState::begin);

        let snapshot = form.get_untracked();
        spawn_local(async move {
            let backend = GlooAuthBackend::new(api_config());
            let result = submit_signup(&backend, &LocalStorageTokenStore::new(), &snapshot).await;
            let name = form_state
                .try_update(|form_state| form_state.settle(result, AuthAction::Signup))
                .flatten();
            if let Some(name) = name {
                state.navigate(NavEvent::AuthSucceeded(name));
            }
        });
    };

    view! {
        <div class="min-h-screen flex items-center justify-center px-4 py-10">
            <div class="bg-white rounded-2xl shadow-xl border border-amber-100 p-8 w-full max-w-2xl">
                <h1 class="text-3xl font-bold text-gray-900">{SIGNUP_TITLE}</h1>
                <p class="text-gray-500 mt-1 mb-6">{SIGNUP_SUBTITLE}</p>

                <form on:submit=on_submit class="space-y-4">
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        {text_field(form, "Email", "email", |f| &f.email, |f, v| f.email = v)}
                        {text_field(form, "Password", "password", |f| &f.password, |f, v| f.password = v)}
                        {text_field(form, "Full Name", "text", |f| &f.name, |f, v| f.name = v)}
                        {text_field(form, "Age", "number", |f| &f.age, |f, v| f.age = v)}
                        {text_field(form, "Annual Income", "number", |f| &f.income, |f, v| f.income = v)}
                        {text_field(form, "Credit Score", "number", |f| &f.credit_score, |f, v| f.credit_score = v)}
                        {select_field(
                            form,
                            "Employment Type",
                            &EMPLOYMENT_TYPES,
                            |f| &f.employment_type,
                            |f, v| f.employment_type = v,
                        )}
                        {select_field(
                            form,
                            "Risk Appetite",
                            &RISK_APPETITES,
                            |f| &f.risk_appetite,
                            |f, v| f.risk_appetite = v,
                        )}
                    </div>

                    <div>
                        <label class="block text-sm text-gray-600 mb-1">"Financial Goals"</label>
                        <textarea
                            required
                            rows="3"
                            prop:value=move || form.with(|f| f.financial_goals.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                form.update(|f| f.financial_goals = value);
                            }
                            class=INPUT_CLASS
                        />
                    </div>

                    <div>
                        <label class="block text-sm text-gray-600 mb-1">"KYC Verified"</label>
                        <select
                            prop:value=move || form.with(|f| f.kyc_verified.to_string())
                            on:change=move |ev| {
                                let verified = event_target_value(&ev) == "true";
                                form.update(|f| f.kyc_verified = verified);
                            }
                            class=INPUT_CLASS
                        >
                            <option value="false">"No"</option>
                            <option value="true">"Yes"</option>
                        </select>
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
                            SIGNUP_BUTTON_BUSY
                        } else {
                            SIGNUP_BUTTON
                        }}
                    </button>
                </form>

                <p class="text-sm text-gray-600 text-center mt-6">
                    {LOGIN_PROMPT} " "
                    <button
                        type="button"
                        on:click=move |_| state.navigate(NavEvent::SwitchToLogin)
                        class="text-amber-600 hover:text-amber-700 font-semibold"
                    >
                        "Sign in"
                    </button>
                </p>
            </div>
        </div>
    }
}
