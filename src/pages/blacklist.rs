use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::api::{BlacklistEntry, use_api};
use crate::components::navbar::Navbar;
use crate::components::toast::use_toast;
use crate::session::{AuditAction, use_session};

/// Manage blocked phone numbers.
#[component]
pub fn Blacklist() -> impl IntoView {
	let api = use_api();
	let toast = use_toast();
	let session = use_session();

	let entries = RwSignal::new(Vec::<BlacklistEntry>::new());
	let phone = RwSignal::new(String::new());
	let reason = RwSignal::new(String::new());
	let loading = RwSignal::new(true);

	// Disposed with the component; guards in-flight responses against
	// touching dead signals.
	let alive: StoredValue<(), LocalStorage> = StoredValue::new_local(());

	let refresh = move || {
		loading.set(true);
		spawn_local(async move {
			let fetched = api.client().blacklist().await;
			if alive.try_get_value().is_none() {
				return;
			}
			loading.set(false);
			match fetched {
				Ok(list) => entries.set(list),
				Err(err) => toast.error(err.to_string()),
			}
		});
	};

	Effect::new(move |prev: Option<()>| {
		if prev.is_none() {
			refresh();
		}
	});

	let on_add = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let (number, why) = (phone.get(), reason.get());
		if number.is_empty() || why.is_empty() {
			toast.error("Phone number and reason are both required");
			return;
		}
		spawn_local(async move {
			match api.client().blacklist_add(&number, &why).await {
				Ok(()) => {
					toast.success("Phone number added to blacklist");
					session.add_audit_log(
						AuditAction::BlacklistAdd,
						&format!("Added {number} to blacklist"),
					);
					if alive.try_get_value().is_some() {
						phone.set(String::new());
						reason.set(String::new());
						refresh();
					}
				}
				Err(err) => toast.error(err.to_string()),
			}
		});
	};

	let remove = move |id: i64, number: String| {
		spawn_local(async move {
			match api.client().blacklist_remove(id).await {
				Ok(()) => {
					toast.success("Phone number removed from blacklist");
					session.add_audit_log(
						AuditAction::BlacklistRemove,
						&format!("Removed {number} from blacklist"),
					);
					if alive.try_get_value().is_some() {
						refresh();
					}
				}
				Err(err) => toast.error(err.to_string()),
			}
		});
	};

	view! {
		<div class="page">
			<Navbar />
			<div class="page-body">
				<div class="page-header">
					<h1>"Blacklist"</h1>
					<p>"Manage blocked phone numbers and suspicious contacts"</p>
				</div>

				<form on:submit=on_add class="blacklist-form">
					<input
						type="text"
						class="form-input"
						placeholder="Phone number"
						prop:value=phone
						on:input=move |ev| phone.set(event_target_value(&ev))
					/>
					<input
						type="text"
						class="form-input"
						placeholder="Reason"
						prop:value=reason
						on:input=move |ev| reason.set(event_target_value(&ev))
					/>
					<button type="submit" class="submit-button">
						"Add"
					</button>
				</form>

				{move || {
					if loading.get() {
						return view! { <div class="table-loading">"Loading blacklist..."</div> }
							.into_any();
					}
					let list = entries.get();
					if list.is_empty() {
						return view! { <p class="table-empty">"The blacklist is empty."</p> }
							.into_any();
					}
					view! {
						<table class="data-table">
							<thead>
								<tr>
									<th>"Phone Number"</th>
									<th>"Reason"</th>
									<th>"Added"</th>
									<th></th>
								</tr>
							</thead>
							<tbody>
								{list
									.into_iter()
									.map(|entry| {
										let number = entry.phone_number.clone();
										view! {
											<tr>
												<td>{entry.phone_number.clone()}</td>
												<td>{entry.reason.clone()}</td>
												<td>{entry.added_at.clone().unwrap_or_default()}</td>
												<td>
													<button
														class="remove-button"
														on:click=move |_| remove(
															entry.id,
															number.clone(),
														)
													>
														"Remove"
													</button>
												</td>
											</tr>
										}
									})
									.collect_view()}
							</tbody>
						</table>
					}
					.into_any()
				}}
			</div>
		</div>
	}
}
