//! Table extraction from the rendered "student main" page

use chrono::Weekday;
use color_eyre::{Result, eyre::eyre};
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::{AttendanceRecord, TimetablePeriod, config::ErpConfig};

/// Row label the timetable uses for `day`.
///
/// Currently the identity on the three-letter English abbreviation.
pub fn day_code(day: Weekday) -> &'static str {
	match day {
		Weekday::Mon => "MON",
		Weekday::Tue => "TUE",
		Weekday::Wed => "WED",
		Weekday::Thu => "THU",
		Weekday::Fri => "FRI",
		Weekday::Sat => "SAT",
		Weekday::Sun => "SUN",
	}
}

/// Text of an element with every text fragment trimmed and the rest glued together
pub fn cell_text(element: ElementRef<'_>) -> String {
	element.text().map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// Selectors compiled once from the configured element ids
pub struct Extractor<'c> {
	config: &'c ErpConfig,
	timetable_table: Selector,
	attendance_table: Selector,
	row: Selector,
	cell: Selector,
	header_cell: Selector,
}

impl<'c> Extractor<'c> {
	pub fn new(config: &'c ErpConfig) -> Result<Self> {
		Ok(Self {
			config,
			timetable_table: table_selector(&config.timetable_table_id)?,
			attendance_table: table_selector(&config.attendance_table_id)?,
			row: parse_selector("tr")?,
			cell: parse_selector("td")?,
			header_cell: parse_selector("th, td")?,
		})
	}

	/// Today's periods in header order.
	///
	/// Empty whenever there is nothing to report (no table, no data rows, no row for today), which is
	/// how weekends and holidays look.
	pub fn todays_timetable(&self, document: &Html, today: Weekday) -> Vec<TimetablePeriod> {
		let Some(table) = document.select(&self.timetable_table).next() else {
			debug!("No timetable table on page");
			return Vec::new();
		};
		let rows: Vec<ElementRef> = table.select(&self.row).collect();
		if rows.len() < 2 {
			return Vec::new();
		}

		// first header column labels the days
		let periods: Vec<String> = rows[0].select(&self.header_cell).skip(1).map(cell_text).collect();

		let code = day_code(today);
		let today_cells = rows[1..].iter().find_map(|row| {
			let cells: Vec<ElementRef> = row.select(&self.cell).collect();
			let label = cell_text(*cells.first()?).to_uppercase();
			(label == code).then_some(cells)
		});
		let Some(cells) = today_cells else {
			debug!("No timetable row for {code}");
			return Vec::new();
		};

		periods
			.into_iter()
			.zip(cells.into_iter().skip(1))
			.map(|(period, cell)| {
				let subject = cell_text(cell);
				let subject = if subject.is_empty() { self.config.free_label.clone() } else { subject };
				TimetablePeriod::new(period, subject)
			})
			.collect()
	}

	/// `None` when the attendance table is not on the page at all.
	pub fn attendance(&self, document: &Html) -> Option<Vec<AttendanceRecord>> {
		let table = document.select(&self.attendance_table).next()?;
		let columns = self.config.attendance_columns;

		let records = table
			.select(&self.row)
			.skip(1)
			.filter_map(|row| {
				let cells: Vec<String> = row.select(&self.cell).map(cell_text).collect();
				if cells.len() < columns.min_cells {
					return None;
				}
				Some(AttendanceRecord {
					subject: cells.get(columns.subject)?.clone(),
					faculty: cells.get(columns.faculty)?.clone(),
					held: cells.get(columns.held)?.clone(),
					attended: cells.get(columns.attended)?.clone(),
					percentage: cells.get(columns.percentage)?.clone(),
				})
			})
			.collect();
		Some(records)
	}
}

fn parse_selector(css: &str) -> Result<Selector> {
	Selector::parse(css).map_err(|e| eyre!("Invalid selector {css:?}: {e}"))
}

fn table_selector(id: &str) -> Result<Selector> {
	parse_selector(&format!(r#"table[id="{id}"]"#))
}
