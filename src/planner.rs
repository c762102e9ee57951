//! How many classes can be skipped, or must be attended, to sit at common attendance thresholds

use derive_new::new;
use serde::Serialize;
use tracing::warn;

use crate::AttendanceRecord;

/// Thresholds (in percent) a plan is computed for, strictest first
pub const THRESHOLDS: [u32; 6] = [90, 85, 80, 75, 70, 65];

/// Upper bound on the search for classes to attend
const MAX_ATTEND_SEARCH: u32 = 1000;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, new)]
pub struct ThresholdPlan {
	pub threshold: u32,
	/// Further classes that may be missed while staying at or above the threshold
	pub can_skip: u32,
	/// Consecutive classes to attend to reach the threshold, 0 if already there
	pub must_attend: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubjectPlan {
	pub subject: String,
	pub held: u32,
	pub attended: u32,
	/// Recomputed from `held`/`attended`, two decimals
	pub percentage: String,
	pub thresholds: Vec<ThresholdPlan>,
}

/// Plan every record whose counts parse; the others are logged and left out.
pub fn plan(records: &[AttendanceRecord]) -> Vec<SubjectPlan> {
	records
		.iter()
		.filter_map(|record| {
			let (Ok(held), Ok(attended)) = (record.held.parse::<u32>(), record.attended.parse::<u32>()) else {
				warn!("Skipping {:?} in plan: held={:?} attended={:?}", record.subject, record.held, record.attended);
				return None;
			};
			Some(plan_subject(&record.subject, held, attended))
		})
		.collect()
}

pub fn plan_subject(subject: &str, held: u32, attended: u32) -> SubjectPlan {
	let percentage = if held == 0 { 100.0 } else { f64::from(attended) * 100.0 / f64::from(held) };
	SubjectPlan {
		subject: subject.to_owned(),
		held,
		attended,
		percentage: format!("{percentage:.2}"),
		thresholds: THRESHOLDS.iter().map(|&t| ThresholdPlan::new(t, can_skip(held, attended, t), must_attend(held, attended, t))).collect(),
	}
}

/// Largest `b` with `attended / (held + b) >= threshold%`, or 0 when already below
pub fn can_skip(held: u32, attended: u32, threshold: u32) -> u32 {
	let (held, attended, threshold) = (u64::from(held), u64::from(attended), u64::from(threshold));
	let have = attended * 100;
	let need = threshold * held;
	if threshold == 0 || have < need {
		return 0;
	}
	u32::try_from((have - need) / threshold).unwrap_or(u32::MAX)
}

/// Smallest `a` with `(attended + a) / (held + a) >= threshold%`.
///
/// A subject with nothing held yet needs at least one class. Gives up past [`MAX_ATTEND_SEARCH`].
pub fn must_attend(held: u32, attended: u32, threshold: u32) -> u32 {
	(0..=MAX_ATTEND_SEARCH)
		.find(|&a| {
			let total = u64::from(held) + u64::from(a);
			total > 0 && (u64::from(attended) + u64::from(a)) * 100 >= u64::from(threshold) * total
		})
		.unwrap_or(MAX_ATTEND_SEARCH + 1)
}
