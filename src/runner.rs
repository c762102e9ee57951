//! One run: log in, extract what the mode asks for, hand back a [`Report`]

use chrono::{Datelike, Local, Weekday};
use scraper::Html;
use tracing::info;

use crate::{
	Credentials, Mode, Report,
	config::ErpConfig,
	error::FlowError,
	extract::Extractor,
	login::{Session, login_and_navigate},
	planner,
};

/// Full flow against the portal described by `config`.
pub async fn run(config: &ErpConfig, credentials: &Credentials, mode: Mode) -> Result<Report, FlowError> {
	info!("Running in {mode} mode");
	let session = Session::new()?;
	let page = login_and_navigate(&session, config, credentials).await?;
	extract_report(config, &page, mode, Local::now().weekday())
}

/// Everything after navigation: pure over the final page's HTML.
pub fn extract_report(config: &ErpConfig, page: &str, mode: Mode, today: Weekday) -> Result<Report, FlowError> {
	let document = Html::parse_document(page);
	let extractor = Extractor::new(config)?;

	if mode == Mode::Timetable {
		let today_timetable = extractor.todays_timetable(&document, today);
		info!("Extracted {} periods", today_timetable.len());
		return Ok(Report {
			attendance: Vec::new(),
			today_timetable,
			plan: None,
		});
	}

	let attendance = extractor.attendance(&document).ok_or(FlowError::AttendanceTableMissing)?;
	info!("Extracted {} attendance records", attendance.len());
	let today_timetable = extractor.todays_timetable(&document, today);
	info!("Extracted {} periods", today_timetable.len());

	let plan = (mode == Mode::Plan).then(|| planner::plan(&attendance));
	Ok(Report {
		attendance,
		today_timetable,
		plan,
	})
}
