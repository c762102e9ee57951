use serde::{Deserialize, Serialize};

/// Every external constant of the portal: URLs, form field names, element ids and column offsets.
///
/// The portal gives no stability guarantee for any of these, so markup changes should only ever touch this file.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ErpConfig {
	#[serde(default = "default_login_url")]
	pub login_url: String,
	#[serde(default = "default_dashboard_url")]
	pub dashboard_url: String,
	/// Substring of the final dashboard URL that proves the login went through
	#[serde(default = "default_dashboard_marker")]
	pub dashboard_marker: String,

	#[serde(default = "default_username_field")]
	pub username_field: String,
	#[serde(default = "default_next_button")]
	pub next_button: (String, String),
	#[serde(default = "default_password_field")]
	pub password_field: String,
	#[serde(default = "default_login_button")]
	pub login_button: (String, String),
	/// Must appear in the username response, otherwise the username step is considered failed
	#[serde(default = "default_password_marker")]
	pub password_marker: String,

	/// `__EVENTTARGET` of the "student main" link on the dashboard
	#[serde(default = "default_postback_target")]
	pub postback_target: String,

	#[serde(default = "default_timetable_table_id")]
	pub timetable_table_id: String,
	#[serde(default = "default_attendance_table_id")]
	pub attendance_table_id: String,
	#[serde(default)]
	pub attendance_columns: AttendanceColumns,
	/// Subject reported for an empty timetable cell
	#[serde(default = "default_free_label")]
	pub free_label: String,
}

/// Positional offsets of the attendance table. Column 0 is a serial number.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct AttendanceColumns {
	pub subject: usize,
	pub faculty: usize,
	pub held: usize,
	pub attended: usize,
	pub percentage: usize,
	/// Rows with fewer cells are summary or malformed rows and get skipped
	pub min_cells: usize,
}

impl Default for AttendanceColumns {
	fn default() -> Self {
		Self {
			subject: 1,
			faculty: 2,
			held: 3,
			attended: 4,
			percentage: 5,
			min_cells: 6,
		}
	}
}

fn default_login_url() -> String {
	"https://erp.cbit.org.in/Login.aspx".to_owned()
}

fn default_dashboard_url() -> String {
	"https://erp.cbit.org.in/StudentLogin/StudLoginDashboard.aspx".to_owned()
}

fn default_dashboard_marker() -> String {
	"StudLoginDashboard".to_owned()
}

fn default_username_field() -> String {
	"txtUserName".to_owned()
}

fn default_next_button() -> (String, String) {
	("btnNext".to_owned(), "Next".to_owned())
}

fn default_password_field() -> String {
	"txtPassword".to_owned()
}

fn default_login_button() -> (String, String) {
	("btnLogin".to_owned(), "Login".to_owned())
}

fn default_password_marker() -> String {
	"txtPassword".to_owned()
}

fn default_postback_target() -> String {
	"ctl00$cpStud$lnkStudentMain".to_owned()
}

fn default_timetable_table_id() -> String {
	"ctl00_cpStud_grdTimetable".to_owned()
}

fn default_attendance_table_id() -> String {
	"ctl00_cpStud_grdSubject".to_owned()
}

fn default_free_label() -> String {
	"Free".to_owned()
}

impl Default for ErpConfig {
	fn default() -> Self {
		Self {
			login_url: default_login_url(),
			dashboard_url: default_dashboard_url(),
			dashboard_marker: default_dashboard_marker(),
			username_field: default_username_field(),
			next_button: default_next_button(),
			password_field: default_password_field(),
			login_button: default_login_button(),
			password_marker: default_password_marker(),
			postback_target: default_postback_target(),
			timetable_table_id: default_timetable_table_id(),
			attendance_table_id: default_attendance_table_id(),
			attendance_columns: AttendanceColumns::default(),
			free_label: default_free_label(),
		}
	}
}

impl ErpConfig {
	/// Same constants, but every URL rebased onto `base` (scheme + host + optional port, no trailing slash).
	pub fn with_base_url(base: &str) -> Self {
		Self {
			login_url: format!("{base}/Login.aspx"),
			dashboard_url: format!("{base}/StudentLogin/StudLoginDashboard.aspx"),
			..Self::default()
		}
	}
}
