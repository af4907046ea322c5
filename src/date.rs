use serde::Serializer;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::Date;

const YMD: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar date of an ISO-8601 timestamp: everything before the `T`
/// (or the whole string when there is no time part), parsed as `YYYY-MM-DD`.
pub fn post_day(timestamp: &str) -> Option<Date> {
    let day = timestamp.split('T').next()?.trim();
    Date::parse(day, YMD).ok()
}

pub fn format_day(d: Date) -> String {
    d.format(YMD).unwrap_or_else(|_| d.to_string())
}

/// `serialize_with` helper: dates render as `"YYYY-MM-DD"`.
pub fn serialize_day<S: Serializer>(d: &Date, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format_day(*d))
}
