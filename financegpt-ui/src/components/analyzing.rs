//! Analyzing indicator shown while an answer is pending

use financegpt::present::ANALYZING_TEXT;
use leptos::*;

#[component]
pub fn AnalyzingAnimation() -> impl IntoView {
    view! {
        <div class="flex justify-start">
            <div class="bg-white border border-amber-100 rounded-2xl px-4 py-3 shadow-sm">
                <div class="flex items-center space-x-3">
                    <div class="flex space-x-1">
                        <span class="w-2 h-2 bg-amber-500 rounded-full animate-bounce" />
                        <span class="w-2 h-2 bg-amber-500 rounded-full animate-bounce [animation-delay:150ms]" />
                        <span class="w-2 h-2 bg-amber-500 rounded-full animate-bounce [animation-delay:300ms]" />
                    </div>
                    <span class="text-sm text-gray-600">{ANALYZING_TEXT}</span>
                </div>
            </div>
        </div>
    }
}
