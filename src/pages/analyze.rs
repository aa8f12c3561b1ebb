use leptos::prelude::*;
use log::warn;
use wasm_bindgen_futures::spawn_local;

use crate::api::{AnalysisResult, AnalyzeRequest, use_api};
use crate::components::navbar::Navbar;
use crate::components::toast::use_toast;
use crate::risk::RiskTier;
use crate::session::{AuditAction, use_session};

/// Submit a phone number and/or message for scoring.
#[component]
pub fn Analyze() -> impl IntoView {
	let api = use_api();
	let toast = use_toast();
	let session = use_session();

	let phone = RwSignal::new(String::new());
	let message = RwSignal::new(String::new());
	let result = RwSignal::new(None::<AnalysisResult>);
	let loading = RwSignal::new(false);

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let req = AnalyzeRequest {
			phone_number: phone.get(),
			message_content: message.get(),
		};
		if req.phone_number.is_empty() && req.message_content.is_empty() {
			toast.error("Enter a phone number or a message to analyze");
			return;
		}

		loading.set(true);
		result.set(None);
		spawn_local(async move {
			match api.client().analyze(&req).await {
				Ok(verdict) => {
					loading.set(false);
					toast.success("Analysis completed");
					let subject = if req.phone_number.is_empty() {
						"message".to_string()
					} else {
						req.phone_number.clone()
					};
					session.add_audit_log(
						AuditAction::Analyze,
						&format!("Analyzed {subject} - Risk: {}", verdict.risk_level),
					);
					result.set(Some(verdict));
				}
				Err(err) => {
					loading.set(false);
					let msg = err.to_string();
					toast.error(msg.clone());
					session.add_audit_log(AuditAction::AnalyzeFailed, &msg);
				}
			}
		});
	};

	view! {
		<div class="page">
			<Navbar />
			<div class="page-body">
				<div class="page-header">
					<h1>"Analyze Message"</h1>
					<p>"Check phone numbers and messages for fraud indicators"</p>
				</div>

				<div class="analyze-layout">
					<form on:submit=on_submit class="analyze-form">
						<label class="form-label">"Phone Number"</label>
						<input
							type="text"
							class="form-input"
							placeholder="+1234567890"
							prop:value=phone
							prop:disabled=loading
							on:input=move |ev| phone.set(event_target_value(&ev))
						/>
						<label class="form-label">"Message Content"</label>
						<textarea
							class="form-textarea"
							rows="8"
							placeholder="Enter the message to analyze..."
							prop:value=message
							prop:disabled=loading
							on:input=move |ev| message.set(event_target_value(&ev))
						></textarea>
						<button type="submit" class="submit-button" prop:disabled=loading>
							{move || if loading.get() { "Analyzing..." } else { "Analyze Message" }}
						</button>
					</form>

					<div class="analyze-result">
						{move || match result.get() {
							Some(verdict) => view! { <ResultPanel verdict=verdict /> }.into_any(),
							None => view! {
								<div class="result-placeholder">
									<h3>"No Analysis Yet"</h3>
									<p>"Enter a phone number or message and click Analyze to see results"</p>
								</div>
							}
							.into_any(),
						}}
					</div>
				</div>
			</div>
		</div>
	}
}

#[component]
fn ResultPanel(verdict: AnalysisResult) -> impl IntoView {
	// The risk level vocabulary is closed; a label outside it means the
	// backend and console disagree and is surfaced, not color-defaulted.
	let tier = RiskTier::from_label(&verdict.risk_level);
	let badge = match tier {
		Ok(tier) => view! {
			<span class="risk-badge" style=format!("background: {}", tier.color())>
				{tier.to_string()}
			</span>
		}
		.into_any(),
		Err(err) => {
			warn!("{err}");
			view! { <span class="risk-badge risk-badge-unknown">{format!("{err}")}</span> }
				.into_any()
		}
	};

	view! {
		<div class="result-panel">
			<div class="result-score">
				{badge}
				<span class="score-value">{format!("{:.0} / 100", verdict.risk_score)}</span>
				<span class="score-confidence">
					{format!("confidence {:.0}%", verdict.confidence * 100.0)}
				</span>
			</div>
			{verdict
				.threat_category
				.map(|cat| view! { <p class="result-line"><b>"Category: "</b>{cat}</p> })}
			{verdict
				.primary_reason
				.map(|reason| view! { <p class="result-line"><b>"Reason: "</b>{reason}</p> })}
			{(!verdict.contributing_factors.is_empty())
				.then(|| view! {
					<ul class="factor-list">
						{verdict
							.contributing_factors
							.into_iter()
							.map(|factor| view! { <li>{factor}</li> })
							.collect_view()}
					</ul>
				})}
			{verdict
				.recommendation
				.map(|rec| view! { <p class="result-line"><b>"Recommendation: "</b>{rec}</p> })}
			{verdict
				.explanation
				.map(|text| view! { <p class="result-explanation">{text}</p> })}
		</div>
	}
}
