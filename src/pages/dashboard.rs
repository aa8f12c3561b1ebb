use leptos::prelude::*;
use log::warn;
use wasm_bindgen_futures::spawn_local;

use crate::api::{Distribution, Summary, TrendPoint, use_api};
use crate::components::force_graph::{GraphSnapshot, GraphView};
use crate::components::navbar::Navbar;
use crate::components::toast::use_toast;
use crate::risk::RiskTier;

const GRAPH_LIMIT: u32 = 100;
const TREND_DAYS: u32 = 30;

/// Landing page: aggregate counters, tier distribution, daily trends, and
/// the relationship graph.
#[component]
pub fn Dashboard() -> impl IntoView {
	let api = use_api();
	let toast = use_toast();

	let summary = RwSignal::new(None::<Summary>);
	let distribution = RwSignal::new(None::<Distribution>);
	let trends = RwSignal::new(Vec::<TrendPoint>::new());
	let graph = RwSignal::new(None::<GraphSnapshot>);
	let loading = RwSignal::new(true);
	let error = RwSignal::new(None::<String>);

	// The fetch outlives the page if the user navigates away mid-flight;
	// a stale response must not touch disposed signals. The marker is
	// disposed with the component, so `try_get_value` returning `None`
	// means the page is gone.
	let alive: StoredValue<(), LocalStorage> = StoredValue::new_local(());

	let fetch = move || {
		loading.set(true);
		error.set(None);
		spawn_local(async move {
			let client = api.client();
			let summary_res = client.summary().await;
			let distribution_res = client.distribution().await;
			let trends_res = client.trends(TREND_DAYS).await;
			let graph_res = client.graph(GRAPH_LIMIT).await;
			if alive.try_get_value().is_none() {
				return;
			}
			loading.set(false);

			let mut failed = false;
			match summary_res {
				Ok(s) => summary.set(Some(s)),
				Err(err) => {
					warn!("summary fetch failed: {err}");
					failed = true;
				}
			}
			match distribution_res {
				Ok(d) => distribution.set(Some(d)),
				Err(err) => {
					warn!("distribution fetch failed: {err}");
					failed = true;
				}
			}
			match trends_res {
				Ok(t) => trends.set(t),
				Err(err) => {
					warn!("trends fetch failed: {err}");
					failed = true;
				}
			}
			match graph_res {
				Ok(g) => graph.set(Some(g.snapshot)),
				Err(err) => {
					warn!("graph fetch failed: {err}");
					failed = true;
				}
			}

			// Partial data stays on screen; one toast covers the failure.
			if failed {
				let msg = "Failed to load dashboard data. Please check if the backend is running.";
				error.set(Some(msg.to_string()));
				toast.error(msg);
			}
		});
	};

	Effect::new(move |prev: Option<()>| {
		if prev.is_none() {
			fetch();
		}
	});

	view! {
		<div class="page">
			<Navbar />
			<div class="page-body">
				<div class="page-header">
					<h1>"Dashboard"</h1>
					<button class="refresh-button" on:click=move |_| fetch()>
						"Refresh"
					</button>
				</div>

				{move || {
					error.get().map(|msg| view! { <div class="error-banner">{msg}</div> })
				}}

				<SummaryCards summary=summary loading=loading />

				<div class="chart-row">
					<DistributionPanel distribution=distribution />
					<TrendPanel trends=trends />
				</div>

				<GraphView snapshot=graph loading=loading />
			</div>
		</div>
	}
}

#[component]
fn SummaryCards(
	summary: RwSignal<Option<Summary>>,
	loading: RwSignal<bool>,
) -> impl IntoView {
	let cards = move || {
		let s = summary.get().unwrap_or_default();
		[
			("Total Scans", s.total_scans, "#6366f1"),
			("High Risk", s.high_risk, "#ef4444"),
			("Medium Risk", s.medium_risk, "#f59e0b"),
			("Low Risk", s.low_risk, "#10b981"),
		]
	};

	view! {
		<div class="summary-cards">
			{move || {
				if loading.get() && summary.get().is_none() {
					return view! { <div class="summary-loading">"Loading..."</div> }.into_any();
				}
				cards()
					.into_iter()
					.map(|(title, value, color)| {
						view! {
							<div class="summary-card" style=format!("border-top-color: {color}")>
								<span class="summary-value">{value}</span>
								<span class="summary-title">{title}</span>
							</div>
						}
					})
					.collect_view()
					.into_any()
			}}
		</div>
	}
}

/// Scan counts per risk tier as horizontal bars.
#[component]
fn DistributionPanel(distribution: RwSignal<Option<Distribution>>) -> impl IntoView {
	view! {
		<div class="chart-card">
			<h3 class="chart-title">"Risk Distribution"</h3>
			{move || {
				let d = distribution.get().unwrap_or_default();
				let rows = [
					(RiskTier::Low, d.low),
					(RiskTier::Medium, d.medium),
					(RiskTier::High, d.high),
					(RiskTier::Critical, d.critical),
				];
				let max = rows.iter().map(|&(_, v)| v).max().unwrap_or(0).max(1);
				rows.into_iter()
					.map(|(tier, value)| {
						let pct = value as f64 / max as f64 * 100.0;
						view! {
							<div class="bar-row">
								<span class="bar-label">{tier.to_string()}</span>
								<div class="bar-track">
									<div
										class="bar-fill"
										style=format!(
											"width: {pct:.0}%; background: {}",
											tier.color(),
										)
									></div>
								</div>
								<span class="bar-value">{value}</span>
							</div>
						}
					})
					.collect_view()
			}}
		</div>
	}
}

/// Daily scan counts as vertical bars, oldest to newest.
#[component]
fn TrendPanel(trends: RwSignal<Vec<TrendPoint>>) -> impl IntoView {
	view! {
		<div class="chart-card">
			<h3 class="chart-title">{format!("Detection Trends (Last {TREND_DAYS} Days)")}</h3>
			{move || {
				let points = trends.get();
				if points.is_empty() {
					return view! { <p class="table-empty">"No trend data yet."</p> }.into_any();
				}
				let max = points.iter().map(|p| p.count).max().unwrap_or(0).max(1);
				view! {
					<div class="trend-bars">
						{points
							.into_iter()
							.map(|point| {
								let pct = point.count as f64 / max as f64 * 100.0;
								let title = format!("{}: {} scans", point.date, point.count);
								view! {
									<div
										class="trend-bar"
										style=format!("height: {pct:.0}%")
										title=title
									></div>
								}
							})
							.collect_view()}
					</div>
				}
				.into_any()
			}}
		</div>
	}
}
