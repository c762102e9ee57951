//! Cookie-backed session and the ASP.NET login/navigation protocol of the portal

use color_eyre::{
	Result,
	eyre::{WrapErr, eyre},
};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::{Credentials, config::ErpConfig, error::FlowError};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A fetched page: where we ended up after redirects, and what it said
#[derive(Clone, Debug)]
pub struct Page {
	pub url: String,
	pub body: String,
}

/// HTTP client whose cookie jar carries the login across requests.
///
/// Owned by a single run and used strictly one request at a time.
pub struct Session {
	client: Client,
}

impl Session {
	pub fn new() -> Result<Self> {
		let client = Client::builder()
			.user_agent(USER_AGENT)
			.cookie_store(true)
			.build()
			.wrap_err("Failed to build HTTP client")?;
		Ok(Self { client })
	}

	pub async fn get(&self, url: &str) -> Result<Page> {
		debug!("GET {url}");
		let response = self.client.get(url).send().await.wrap_err_with(|| format!("GET {url} failed"))?;
		Self::into_page(response).await
	}

	/// POST an url-encoded form. Field order is preserved.
	pub async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Page> {
		debug!("POST {url} ({} fields)", form.len());
		let response = self.client.post(url).form(form).send().await.wrap_err_with(|| format!("POST {url} failed"))?;
		Self::into_page(response).await
	}

	async fn into_page(response: reqwest::Response) -> Result<Page> {
		let url = response.url().to_string();
		debug!("<- {} {url}", response.status());
		let body = response.text().await.wrap_err_with(|| format!("Failed to read body of {url}"))?;
		Ok(Page { url, body })
	}
}

/// The hidden form state ASP.NET expects echoed back on every post.
///
/// Always taken from the most recent response; stale values break the server-side state machine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AspState {
	pub view_state: String,
	pub view_state_generator: String,
	pub event_validation: String,
}

impl AspState {
	pub const VIEW_STATE: &'static str = "__VIEWSTATE";
	pub const VIEW_STATE_GENERATOR: &'static str = "__VIEWSTATEGENERATOR";
	pub const EVENT_VALIDATION: &'static str = "__EVENTVALIDATION";

	/// Fails if any of the three inputs (or its `value`) is missing.
	pub fn from_html(body: &str) -> Result<Self> {
		let document = Html::parse_document(body);
		Ok(Self {
			view_state: hidden_input(&document, Self::VIEW_STATE)?,
			view_state_generator: hidden_input(&document, Self::VIEW_STATE_GENERATOR)?,
			event_validation: hidden_input(&document, Self::EVENT_VALIDATION)?,
		})
	}

	pub fn form_fields(&self) -> [(&'static str, &str); 3] {
		[
			(Self::VIEW_STATE, self.view_state.as_str()),
			(Self::VIEW_STATE_GENERATOR, self.view_state_generator.as_str()),
			(Self::EVENT_VALIDATION, self.event_validation.as_str()),
		]
	}

	/// Hidden state followed by `extra`, ready for [`Session::post_form`]
	pub fn with<'a>(&'a self, extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
		let mut form: Vec<(&str, &str)> = self.form_fields().to_vec();
		form.extend_from_slice(extra);
		form
	}
}

fn hidden_input(document: &Html, name: &str) -> Result<String> {
	let selector = Selector::parse(&format!(r#"input[name="{name}"]"#)).map_err(|e| eyre!("Invalid selector for {name}: {e}"))?;
	let input = document.select(&selector).next().ok_or_else(|| eyre!("Hidden field {name} not found on page"))?;
	let value = input.value().attr("value").ok_or_else(|| eyre!("Hidden field {name} has no value"))?;
	Ok(value.to_owned())
}

/// Log in and navigate to the page that renders the attendance and timetable widgets.
///
/// Returns that page's HTML.
pub async fn login_and_navigate(session: &Session, config: &ErpConfig, credentials: &Credentials) -> Result<String, FlowError> {
	// Step 1: bootstrap the session and its first hidden state
	info!("Opening login page");
	let login_page = session.get(&config.login_url).await?;
	let state = AspState::from_html(&login_page.body)?;

	// Step 2: username
	info!("Submitting username");
	let form = state.with(&[
		(config.username_field.as_str(), credentials.roll_no.as_str()),
		(config.next_button.0.as_str(), config.next_button.1.as_str()),
	]);
	let username_page = session.post_form(&config.login_url, &form).await?;
	if !username_page.body.contains(&config.password_marker) {
		return Err(FlowError::UsernameRejected);
	}

	// Step 3: password. Success is only known once the dashboard loads.
	info!("Submitting password");
	let state = AspState::from_html(&username_page.body)?;
	let form = state.with(&[
		(config.password_field.as_str(), credentials.password.as_str()),
		(config.login_button.0.as_str(), config.login_button.1.as_str()),
	]);
	session.post_form(&config.login_url, &form).await?;

	// Step 4: dashboard
	info!("Loading dashboard");
	let dashboard = session.get(&config.dashboard_url).await?;
	if !dashboard.url.contains(&config.dashboard_marker) {
		return Err(FlowError::DashboardRedirect { redirected_to: dashboard.url });
	}

	// Step 5: postback on the "student main" link, which is what actually renders the tables
	info!("Posting back to {}", config.postback_target);
	let state = AspState::from_html(&dashboard.body)?;
	let form = state.with(&[("__EVENTTARGET", config.postback_target.as_str()), ("__EVENTARGUMENT", "")]);
	let student_main = session.post_form(&config.dashboard_url, &form).await?;

	Ok(student_main.body)
}
