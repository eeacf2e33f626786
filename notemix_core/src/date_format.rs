//! Date formatting with moment.js format strings.
//!
//! File name templates use the format strings notes apps have always used
//! (`YYYY.MM.DD HH.mm.ss`, `MM-DD-YYYY`, ...), so the formatter follows the
//! moment.js token set with its English locale. Anything that is not a
//! recognized token is copied to the output unchanged, which means a pattern
//! without tokens formats to itself.

use chrono::DateTime;
use chrono::Datelike;
use chrono::FixedOffset;
use chrono::Local;
use chrono::NaiveDate;
use chrono::Timelike;

/// Source of "the current moment".
pub trait Clock {
	fn now(&self) -> DateTime<FixedOffset>;
}

/// Reads the local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<FixedOffset> {
		Local::now().fixed_offset()
	}
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
	fn now(&self) -> DateTime<FixedOffset> {
		self.0
	}
}

const MONTHS: [&str; 12] = [
	"January",
	"February",
	"March",
	"April",
	"May",
	"June",
	"July",
	"August",
	"September",
	"October",
	"November",
	"December",
];

const WEEKDAYS: [&str; 7] = [
	"Sunday",
	"Monday",
	"Tuesday",
	"Wednesday",
	"Thursday",
	"Friday",
	"Saturday",
];

/// Locale week rules for English: weeks start on Sunday and the week that
/// contains January 1st is the first week of the year.
const LOCALE_DOW: i64 = 0;
const LOCALE_DOY: i64 = 6;

/// Longest alternatives first so that `starts_with` picks the same token as
/// moment's tokenizer.
const TOKENS: &[&str] = &[
	"YYYYYY", "YYYYY", "YYYY", "YY", "Y", "Qo", "Q", "MMMM", "MMM", "MM", "Mo", "M", "DDDD",
	"DDDo", "DDD", "DD", "Do", "D", "dddd", "ddd", "dd", "do", "d", "wo", "ww", "w", "Wo", "WW",
	"W", "ggggg", "gggg", "gg", "GGGGG", "GGGG", "GG", "e", "E", "a", "A", "hh", "h", "HH", "H",
	"kk", "k", "mm", "m", "ss", "s", "X", "x", "ZZ", "Z", "zz", "z", "NNNNN", "NNNN", "NNN", "NN",
	"N", "yyyy", "yyy", "yy", "yo", "y",
];

/// Format `instant` with a moment.js format string.
///
/// `[text]` is emitted without the brackets and a backslash emits the token
/// that follows it literally.
pub fn format_moment(instant: &DateTime<FixedOffset>, pattern: &str) -> String {
	let mut output = String::with_capacity(pattern.len() + 8);
	let mut rest = pattern;

	while let Some(ch) = rest.chars().next() {
		if ch == '[' {
			if let Some((literal, consumed)) = bracketed_literal(rest) {
				output.push_str(literal);
				rest = &rest[consumed..];
				continue;
			}
		}

		if ch == '\\' {
			let escaped = &rest[1..];
			let len = next_token_len(escaped);
			output.push_str(&escaped[..len]);
			rest = &escaped[len..];
			continue;
		}

		if ch == 'S' {
			let run = fraction_run(rest);
			output.push_str(&fraction(instant, run));
			rest = &rest[run..];
			continue;
		}

		if let Some(token) = TOKENS.iter().find(|token| rest.starts_with(**token)) {
			output.push_str(&render_token(instant, token));
			rest = &rest[token.len()..];
			continue;
		}

		output.push(ch);
		rest = &rest[ch.len_utf8()..];
	}

	output
}

/// `[...]` up to the last `]` before the next `[`.
fn bracketed_literal(rest: &str) -> Option<(&str, usize)> {
	let inner = &rest[1..];
	let region = inner.find('[').map_or(inner, |index| &inner[..index]);
	let close = region.rfind(']')?;
	Some((&region[..close], close + 2))
}

/// Length in bytes of the token (or single character) at the start of `text`.
fn next_token_len(text: &str) -> usize {
	if text.starts_with('S') {
		return fraction_run(text);
	}

	if let Some(token) = TOKENS.iter().find(|token| text.starts_with(**token)) {
		return token.len();
	}

	text.chars().next().map_or(0, char::len_utf8)
}

fn fraction_run(text: &str) -> usize {
	text.bytes().take_while(|b| *b == b'S').take(9).count()
}

fn fraction(instant: &DateTime<FixedOffset>, digits: usize) -> String {
	let millis = i64::from((instant.nanosecond() / 1_000_000) % 1000);
	match digits {
		1 => (millis / 100).to_string(),
		2 => zero_fill(millis / 10, 2, false),
		_ => format!("{}{}", zero_fill(millis, 3, false), "0".repeat(digits - 3)),
	}
}

fn render_token(instant: &DateTime<FixedOffset>, token: &str) -> String {
	let year = i64::from(instant.year());
	let month = i64::from(instant.month());
	let day = i64::from(instant.day());
	let weekday = i64::from(instant.weekday().num_days_from_sunday());
	let hour = i64::from(instant.hour());

	match token {
		"Y" if year <= 9999 => zero_fill(year, 4, false),
		"Y" => format!("+{year}"),
		"YY" => zero_fill(year.rem_euclid(100), 2, false),
		"YYYY" => zero_fill(year, 4, false),
		"YYYYY" => zero_fill(year, 5, false),
		"YYYYYY" => zero_fill(year, 6, true),
		"Q" => quarter(month).to_string(),
		"Qo" => ordinal(quarter(month)),
		"M" => month.to_string(),
		"Mo" => ordinal(month),
		"MM" => zero_fill(month, 2, false),
		"MMM" => MONTHS[(month - 1) as usize][..3].to_string(),
		"MMMM" => MONTHS[(month - 1) as usize].to_string(),
		"D" => day.to_string(),
		"Do" => ordinal(day),
		"DD" => zero_fill(day, 2, false),
		"DDD" => instant.ordinal().to_string(),
		"DDDo" => ordinal(i64::from(instant.ordinal())),
		"DDDD" => zero_fill(i64::from(instant.ordinal()), 3, false),
		"d" | "e" => weekday.to_string(),
		"do" => ordinal(weekday),
		"dd" => WEEKDAYS[weekday as usize][..2].to_string(),
		"ddd" => WEEKDAYS[weekday as usize][..3].to_string(),
		"dddd" => WEEKDAYS[weekday as usize].to_string(),
		"E" => instant.weekday().number_from_monday().to_string(),
		"w" => locale_week(instant.date_naive()).1.to_string(),
		"wo" => ordinal(locale_week(instant.date_naive()).1),
		"ww" => zero_fill(locale_week(instant.date_naive()).1, 2, false),
		"W" => instant.iso_week().week().to_string(),
		"Wo" => ordinal(i64::from(instant.iso_week().week())),
		"WW" => zero_fill(i64::from(instant.iso_week().week()), 2, false),
		"gg" => zero_fill(locale_week(instant.date_naive()).0.rem_euclid(100), 2, false),
		"gggg" => zero_fill(locale_week(instant.date_naive()).0, 4, false),
		"ggggg" => zero_fill(locale_week(instant.date_naive()).0, 5, false),
		"GG" => zero_fill(i64::from(instant.iso_week().year()).rem_euclid(100), 2, false),
		"GGGG" => zero_fill(i64::from(instant.iso_week().year()), 4, false),
		"GGGGG" => zero_fill(i64::from(instant.iso_week().year()), 5, false),
		"a" => String::from(if hour < 12 { "am" } else { "pm" }),
		"A" => String::from(if hour < 12 { "AM" } else { "PM" }),
		"H" => hour.to_string(),
		"HH" => zero_fill(hour, 2, false),
		"h" => twelve_hour(hour).to_string(),
		"hh" => zero_fill(twelve_hour(hour), 2, false),
		"k" => twenty_four_hour(hour).to_string(),
		"kk" => zero_fill(twenty_four_hour(hour), 2, false),
		"m" => instant.minute().to_string(),
		"mm" => zero_fill(i64::from(instant.minute()), 2, false),
		"s" => instant.second().to_string(),
		"ss" => zero_fill(i64::from(instant.second()), 2, false),
		"X" => instant.timestamp().to_string(),
		"x" => instant.timestamp_millis().to_string(),
		"Z" => utc_offset(instant, ":"),
		"ZZ" => utc_offset(instant, ""),
		// Instants carry an offset but no zone name.
		"z" | "zz" => String::new(),
		"N" | "NN" | "NNN" | "NNNNN" => String::from(if year > 0 { "AD" } else { "BC" }),
		"NNNN" => String::from(if year > 0 { "Anno Domini" } else { "Before Christ" }),
		"y" => era_year(year).to_string(),
		"yo" => ordinal(era_year(year)),
		"yy" => zero_fill(era_year(year), 2, false),
		"yyy" => zero_fill(era_year(year), 3, false),
		"yyyy" => zero_fill(era_year(year), 4, false),
		other => other.to_string(),
	}
}

/// Year counted within its era. Year 0 is 1 BC.
fn era_year(year: i64) -> i64 {
	if year > 0 { year } else { 1 - year }
}

fn quarter(month: i64) -> i64 {
	(month - 1) / 3 + 1
}

fn twelve_hour(hour: i64) -> i64 {
	match hour % 12 {
		0 => 12,
		other => other,
	}
}

fn twenty_four_hour(hour: i64) -> i64 {
	if hour == 0 { 24 } else { hour }
}

fn zero_fill(value: i64, width: usize, force_sign: bool) -> String {
	let sign = if value < 0 {
		"-"
	} else if force_sign {
		"+"
	} else {
		""
	};
	format!("{sign}{:0width$}", value.unsigned_abs())
}

fn ordinal(value: i64) -> String {
	let suffix = if (value % 100) / 10 == 1 {
		"th"
	} else {
		match value % 10 {
			1 => "st",
			2 => "nd",
			3 => "rd",
			_ => "th",
		}
	};
	format!("{value}{suffix}")
}

fn utc_offset(instant: &DateTime<FixedOffset>, separator: &str) -> String {
	let seconds = instant.offset().local_minus_utc();
	let sign = if seconds < 0 { '-' } else { '+' };
	let minutes = seconds.unsigned_abs() / 60;
	format!("{sign}{:02}{separator}{:02}", minutes / 60, minutes % 60)
}

/// Week-year and week number under the English locale week rules.
fn locale_week(date: NaiveDate) -> (i64, i64) {
	let year = i64::from(date.year());
	let offset = first_week_offset(year);
	let week = (i64::from(date.ordinal()) - offset - 1).div_euclid(7) + 1;

	if week < 1 {
		(year - 1, week + weeks_in_year(year - 1))
	} else if week > weeks_in_year(year) {
		(year + 1, week - weeks_in_year(year))
	} else {
		(year, week)
	}
}

fn first_week_offset(year: i64) -> i64 {
	let first_week_day = 7 + LOCALE_DOW - LOCALE_DOY;
	let weekday = i32::try_from(year)
		.ok()
		.and_then(|year| NaiveDate::from_ymd_opt(year, 1, first_week_day as u32))
		.map_or(0, |date| i64::from(date.weekday().num_days_from_sunday()));
	let first_week_day_local = (7 + weekday - LOCALE_DOW) % 7;

	-first_week_day_local + first_week_day - 1
}

fn weeks_in_year(year: i64) -> i64 {
	let days = i32::try_from(year)
		.ok()
		.and_then(|year| NaiveDate::from_ymd_opt(year, 12, 31))
		.map_or(365, |date| i64::from(date.ordinal()));

	(days - first_week_offset(year) + first_week_offset(year + 1)) / 7
}
