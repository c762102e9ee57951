use std::fmt;

use derive_new::new;
use serde::Serialize;

pub mod config;
pub mod error;
pub mod extract;
pub mod login;
pub mod planner;
pub mod runner;

use error::FlowError;
use planner::SubjectPlan;

/// One class slot of today's timetable
#[derive(Clone, Debug, Eq, PartialEq, Serialize, new)]
pub struct TimetablePeriod {
	/// Period label as printed in the header row (e.g. "9:40-10:40")
	pub period: String,
	/// Subject scheduled in the slot, "Free" when the cell is empty
	pub subject: String,
}

/// One course row of the attendance table
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AttendanceRecord {
	pub subject: String,
	pub faculty: String,
	/// Classes held so far, verbatim from the page
	pub held: String,
	/// Classes attended so far, verbatim from the page
	pub attended: String,
	/// Percentage as rendered by the portal, not validated
	pub percentage: String,
}

/// What the caller asked for on the command line
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
	/// Attendance table plus today's timetable
	#[default]
	Attendance,
	/// Today's timetable only; attendance is reported as an empty list
	Timetable,
	/// Attendance, timetable and the per-subject threshold plan
	Plan,
}

impl Mode {
	/// Any value other than the recognised ones falls back to attendance.
	pub fn from_arg(arg: Option<&str>) -> Self {
		match arg {
			Some("timetable") => Mode::Timetable,
			Some("plan") => Mode::Plan,
			_ => Mode::Attendance,
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Mode::Attendance => write!(f, "attendance"),
			Mode::Timetable => write!(f, "timetable"),
			Mode::Plan => write!(f, "plan"),
		}
	}
}

/// Login credentials, passed positionally on the command line
#[derive(Clone, new)]
pub struct Credentials {
	pub roll_no: String,
	pub password: String,
}

impl fmt::Debug for Credentials {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Credentials").field("roll_no", &self.roll_no).field("password", &"***").finish()
	}
}

/// Successful result of a run
#[derive(Clone, Debug, Default, Serialize)]
pub struct Report {
	pub attendance: Vec<AttendanceRecord>,
	pub today_timetable: Vec<TimetablePeriod>,
	/// Only present in [`Mode::Plan`]
	#[serde(skip_serializing_if = "Option::is_none")]
	pub plan: Option<Vec<SubjectPlan>>,
}

/// Failed run, as printed to stdout
#[derive(Clone, Debug, Serialize)]
pub struct ErrorReport {
	pub error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub redirected_to: Option<String>,
}

/// The single JSON object a run prints. Exactly one shape is ever emitted.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Envelope {
	Success(Report),
	Failure(ErrorReport),
}

impl Envelope {
	/// Any failure message, without further context.
	pub fn error(message: impl Into<String>) -> Self {
		Envelope::Failure(ErrorReport {
			error: message.into(),
			redirected_to: None,
		})
	}

	pub fn exit_code(&self) -> i32 {
		match self {
			Envelope::Success(_) => 0,
			Envelope::Failure(_) => 1,
		}
	}

	/// Single-line JSON rendering
	pub fn to_json_line(&self) -> String {
		match serde_json::to_string(self) {
			Ok(s) => s,
			// Only reachable if serialization itself breaks; the fallback is still valid JSON.
			Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
		}
	}
}

impl From<Result<Report, FlowError>> for Envelope {
	fn from(result: Result<Report, FlowError>) -> Self {
		match result {
			Ok(report) => Envelope::Success(report),
			Err(e) => Envelope::Failure(ErrorReport {
				error: e.message(),
				redirected_to: e.redirected_to().map(str::to_owned),
			}),
		}
	}
}
