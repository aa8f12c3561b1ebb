use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use leptos::prelude::*;

use crate::components::navbar::Navbar;
use crate::session::{AuditAction, use_session};

/// Admin panel: the session audit trail for this tab, newest first.
#[component]
pub fn Admin() -> impl IntoView {
	let session = use_session();
	let logs = session.audit_logs();

	// Snapshot serialized at render time; the EXPORT entry recorded on click
	// lands in the trail, not in the file being downloaded.
	let export_href = serde_json::to_string_pretty(&logs)
		.map(|json| format!("data:application/json;base64,{}", STANDARD.encode(json)))
		.unwrap_or_default();
	let export_count = logs.len();
	let on_export = move |_| {
		session.add_audit_log(
			AuditAction::Export,
			&format!("Exported {export_count} audit entries"),
		);
	};

	view! {
		<div class="page">
			<Navbar />
			<div class="page-body">
				<div class="page-header">
					<h1>"Admin Panel"</h1>
					<p>"Session audit trail (last 50 actions, this tab only)"</p>
					<a
						class="refresh-button"
						href=export_href
						download="audit-log.json"
						on:click=on_export
					>
						"Export"
					</a>
				</div>

				{if logs.is_empty() {
					view! { <p class="table-empty">"No audit entries recorded yet."</p> }
						.into_any()
				} else {
					view! {
						<table class="data-table">
							<thead>
								<tr>
									<th>"Time"</th>
									<th>"Action"</th>
									<th>"User"</th>
									<th>"Role"</th>
									<th>"Details"</th>
								</tr>
							</thead>
							<tbody>
								{logs
									.into_iter()
									.map(|entry| {
										view! {
											<tr>
												<td>{entry.timestamp}</td>
												<td>{entry.action.as_str()}</td>
												<td>{entry.username.unwrap_or_default()}</td>
												<td>{entry.role.unwrap_or_default()}</td>
												<td>{entry.details}</td>
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
