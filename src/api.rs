//! Typed client for the fraud-detection backend.
//!
//! Thin fetch wrapper: every request carries the static service API key, and
//! authenticated requests additionally attach the bearer token the session
//! manager hands out. Scoring, persistence and token issuance all live on
//! the backend; nothing here is smarter than a request/response mapping.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_net::http::{Request, RequestBuilder, Response};
use leptos::prelude::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::force_graph::GraphSnapshot;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_API_KEY: &str = "public123";

#[derive(Debug, Error)]
pub enum ApiError {
	/// The backend answered with a non-success status. `detail` is the
	/// human-readable message from its error body, when present.
	#[error("{detail}")]
	Rejected { status: u16, detail: String },
	#[error("network error: {0}")]
	Network(String),
	#[error("malformed response: {0}")]
	Decode(String),
}

impl ApiError {
	/// User-facing message for a failed login attempt.
	pub fn login_message(&self) -> String {
		match self {
			ApiError::Rejected { detail, .. } if !detail.is_empty() => detail.clone(),
			_ => "Invalid credentials".to_string(),
		}
	}
}

impl From<gloo_net::Error> for ApiError {
	fn from(err: gloo_net::Error) -> Self {
		match err {
			gloo_net::Error::SerdeError(e) => ApiError::Decode(e.to_string()),
			other => ApiError::Network(other.to_string()),
		}
	}
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
	username: &'a str,
	password: &'a str,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
	pub access_token: String,
	pub role: String,
	pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
	pub username: String,
	pub email: String,
	pub password: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RegisterResponse {
	#[serde(default)]
	pub message: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct AnalyzeRequest {
	pub phone_number: String,
	pub message_content: String,
}

/// Scored verdict for one submitted message, as produced by the backend.
#[derive(Clone, Debug, Deserialize)]
pub struct AnalysisResult {
	pub risk_score: f64,
	pub risk_level: String,
	pub confidence: f64,
	#[serde(default)]
	pub threat_category: Option<String>,
	#[serde(default)]
	pub primary_reason: Option<String>,
	#[serde(default)]
	pub contributing_factors: Vec<String>,
	#[serde(default)]
	pub recommendation: Option<String>,
	#[serde(default)]
	pub explanation: Option<String>,
}

/// Aggregate counters for the dashboard summary cards.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Summary {
	#[serde(default)]
	pub total_scans: u64,
	#[serde(default)]
	pub high_risk: u64,
	#[serde(default)]
	pub medium_risk: u64,
	#[serde(default)]
	pub low_risk: u64,
}

/// Scan counts per risk tier.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Distribution {
	#[serde(default)]
	pub low: u64,
	#[serde(default)]
	pub medium: u64,
	#[serde(default)]
	pub high: u64,
	#[serde(default)]
	pub critical: u64,
}

/// Daily scan count for the trends panel.
#[derive(Clone, Debug, Deserialize)]
pub struct TrendPoint {
	pub date: String,
	#[serde(default)]
	pub count: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GraphResponse {
	#[serde(flatten)]
	pub snapshot: GraphSnapshot,
	#[serde(default)]
	pub statistics: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BlacklistEntry {
	pub id: i64,
	pub phone_number: String,
	#[serde(default)]
	pub reason: String,
	#[serde(default)]
	pub added_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlacklistPage {
	#[serde(default)]
	blacklist: Vec<BlacklistEntry>,
}

#[derive(Debug, Serialize)]
struct BlacklistAdd<'a> {
	phone_number: &'a str,
	reason: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
	#[serde(default)]
	detail: String,
}

pub struct ApiClient {
	base_url: String,
	api_key: String,
	token: RefCell<Option<String>>,
}

impl ApiClient {
	/// Base URL and API key are baked in at build time, with the local
	/// development defaults as fallback.
	pub fn from_env() -> Self {
		Self::new(
			option_env!("FRAUDGUARD_API_URL").unwrap_or(DEFAULT_API_URL),
			option_env!("FRAUDGUARD_API_KEY").unwrap_or(DEFAULT_API_KEY),
		)
	}

	pub fn new(base_url: &str, api_key: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			api_key: api_key.to_string(),
			token: RefCell::new(None),
		}
	}

	/// Attach the bearer token to subsequent requests.
	pub fn set_token(&self, token: Option<&str>) {
		*self.token.borrow_mut() = token.map(str::to_string);
	}

	fn headers(&self, builder: RequestBuilder) -> RequestBuilder {
		let builder = builder.header("X-API-KEY", &self.api_key);
		match self.token.borrow().as_deref() {
			Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
			None => builder,
		}
	}

	fn get(&self, path: &str) -> RequestBuilder {
		self.headers(Request::get(&format!("{}{path}", self.base_url)))
	}

	fn post(&self, path: &str) -> RequestBuilder {
		self.headers(Request::post(&format!("{}{path}", self.base_url)))
	}

	fn delete(&self, path: &str) -> RequestBuilder {
		self.headers(Request::delete(&format!("{}{path}", self.base_url)))
	}

	pub async fn login(
		&self,
		username: &str,
		password: &str,
	) -> Result<LoginResponse, ApiError> {
		let resp = self
			.post("/login")
			.json(&LoginRequest { username, password })?
			.send()
			.await?;
		expect_json(resp).await
	}

	pub async fn register(
		&self,
		req: &RegisterRequest,
	) -> Result<RegisterResponse, ApiError> {
		let resp = self.post("/register").json(req)?.send().await?;
		expect_json(resp).await
	}

	pub async fn analyze(&self, req: &AnalyzeRequest) -> Result<AnalysisResult, ApiError> {
		let resp = self.post("/analyze").json(req)?.send().await?;
		expect_json(resp).await
	}

	pub async fn summary(&self) -> Result<Summary, ApiError> {
		let resp = self.get("/analytics/summary").send().await?;
		expect_json(resp).await
	}

	pub async fn distribution(&self) -> Result<Distribution, ApiError> {
		let resp = self.get("/analytics/distribution").send().await?;
		expect_json(resp).await
	}

	pub async fn trends(&self, days: u32) -> Result<Vec<TrendPoint>, ApiError> {
		let resp = self
			.get(&format!("/analytics/trends?days={days}"))
			.send()
			.await?;
		expect_json(resp).await
	}

	pub async fn graph(&self, limit: u32) -> Result<GraphResponse, ApiError> {
		let resp = self.get(&format!("/graph?limit={limit}")).send().await?;
		expect_json(resp).await
	}

	pub async fn blacklist(&self) -> Result<Vec<BlacklistEntry>, ApiError> {
		let resp = self.get("/blacklist").send().await?;
		let page: BlacklistPage = expect_json(resp).await?;
		Ok(page.blacklist)
	}

	pub async fn blacklist_add(&self, phone_number: &str, reason: &str) -> Result<(), ApiError> {
		let resp = self
			.post("/blacklist")
			.json(&BlacklistAdd {
				phone_number,
				reason,
			})?
			.send()
			.await?;
		expect_ok(resp).await
	}

	pub async fn blacklist_remove(&self, id: i64) -> Result<(), ApiError> {
		let resp = self.delete(&format!("/blacklist/{id}")).send().await?;
		expect_ok(resp).await
	}
}

async fn expect_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
	if resp.ok() {
		resp.json::<T>().await.map_err(ApiError::from)
	} else {
		Err(rejected(resp).await)
	}
}

async fn expect_ok(resp: Response) -> Result<(), ApiError> {
	if resp.ok() {
		Ok(())
	} else {
		Err(rejected(resp).await)
	}
}

/// Copyable handle to the shared client, suitable for capturing in view
/// closures. The client itself is tab-local and single-threaded.
#[derive(Clone, Copy)]
pub struct ApiContext(StoredValue<Rc<ApiClient>, LocalStorage>);

impl ApiContext {
	/// Install the client as Leptos context at the app root.
	pub fn provide(client: ApiClient) -> Self {
		let ctx = Self(StoredValue::new_local(Rc::new(client)));
		provide_context(ctx);
		ctx
	}

	pub fn client(&self) -> Rc<ApiClient> {
		self.0.get_value()
	}
}

/// Fetch the shared client handle from Leptos context.
pub fn use_api() -> ApiContext {
	expect_context::<ApiContext>()
}

async fn rejected(resp: Response) -> ApiError {
	let status = resp.status();
	let detail = resp
		.json::<ErrorBody>()
		.await
		.map(|body| body.detail)
		.unwrap_or_default();
	ApiError::Rejected { status, detail }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn login_message_prefers_backend_detail() {
		let err = ApiError::Rejected {
			status: 401,
			detail: "Invalid credentials".into(),
		};
		assert_eq!(err.login_message(), "Invalid credentials");

		let err = ApiError::Rejected {
			status: 423,
			detail: "Account locked".into(),
		};
		assert_eq!(err.login_message(), "Account locked");
	}

	#[test]
	fn login_message_falls_back_when_detail_missing() {
		let err = ApiError::Rejected {
			status: 500,
			detail: String::new(),
		};
		assert_eq!(err.login_message(), "Invalid credentials");
		let err = ApiError::Network("connection refused".into());
		assert_eq!(err.login_message(), "Invalid credentials");
	}

	#[test]
	fn base_url_trailing_slash_is_normalized() {
		let client = ApiClient::new("http://localhost:8000/", "key");
		assert_eq!(client.base_url, "http://localhost:8000");
	}
}
