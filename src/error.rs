use color_eyre::Report;
use thiserror::Error;

/// Why a run produced no data.
///
/// The first three variants are the checks the flow performs on purpose; anything
/// else (network, missing hidden fields, bad selectors) ends up in [`FlowError::Unexpected`].
#[derive(Debug, Error)]
pub enum FlowError {
	/// The username post did not come back with the password form.
	#[error("Username step failed")]
	UsernameRejected,
	/// Requesting the dashboard landed somewhere else, usually back on the login page.
	#[error("Failed to load dashboard")]
	DashboardRedirect { redirected_to: String },
	#[error("Couldn't find the attendance table")]
	AttendanceTableMissing,
	#[error("{0:#}")]
	Unexpected(#[from] Report),
}

impl FlowError {
	/// Text for the `error` field of the printed envelope
	pub fn message(&self) -> String {
		self.to_string()
	}

	pub fn redirected_to(&self) -> Option<&str> {
		match self {
			FlowError::DashboardRedirect { redirected_to } => Some(redirected_to),
			_ => None,
		}
	}
}
