use chrono::{DateTime, SecondsFormat, Utc};
use clap::Args;
use std::path::Path;

use jrnl_core::{open_journal, Config, DayBoundary, Entry, GetOptions};
use tracing::info;

use crate::timespec::{self, TimeParseError};

#[derive(Args)]
pub struct GetArgs {
    /// Day to show, e.g. "yesterday", "last monday", "2024-05-17"
    #[arg(value_name = "WHEN", conflicts_with_all = ["after", "before"])]
    when: Vec<String>,
    /// Only entries created at or after this time (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_name = "TIME")]
    after: Option<String>,
    /// Only entries created before this time (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_name = "TIME")]
    before: Option<String>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(db_path: &Path, config: &Config, args: GetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = options_for(&args, Utc::now(), config.day_boundary)?;
    info!(?options, "querying journal");

    let journal = open_journal(db_path)?;
    let entries = journal.get(&options)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        for entry in &entries {
            println!("{}", render(entry));
        }
    }
    Ok(())
}

fn options_for(
    args: &GetArgs,
    now: DateTime<Utc>,
    boundary: DayBoundary,
) -> Result<GetOptions, TimeParseError> {
    let expr = args.when.join(" ");
    if !expr.trim().is_empty() {
        let day = timespec::resolve_day(&expr, now, boundary)?;
        return Ok(GetOptions::between(day.after, day.before));
    }

    let mut options = GetOptions::all();
    if let Some(after) = &args.after {
        options = options.after(timespec::parse_instant(after, boundary)?);
    }
    if let Some(before) = &args.before {
        options = options.before(timespec::parse_instant(before, boundary)?);
    }
    Ok(options)
}

fn render(entry: &Entry) -> String {
    format!(
        "{}  {}",
        entry.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        entry.contents.trim_end_matches(['\r', '\n'])
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args(when: &[&str], after: Option<&str>, before: Option<&str>) -> GetArgs {
        GetArgs {
            when: when.iter().map(|s| s.to_string()).collect(),
            after: after.map(String::from),
            before: before.map(String::from),
            json: false,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 15, 0, 0).unwrap()
    }

    #[test]
    fn no_arguments_means_everything() {
        let options = options_for(&args(&[], None, None), now(), DayBoundary::Utc).unwrap();
        assert_eq!(options, GetOptions::all());
    }

    #[test]
    fn words_are_joined_into_one_expression() {
        let options = options_for(&args(&["last", "monday"], None, None), now(), DayBoundary::Utc).unwrap();
        assert_eq!(
            options,
            GetOptions::between(
                Utc.with_ymd_and_hms(2024, 5, 13, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2024, 5, 14, 0, 0, 0).unwrap(),
            )
        );
    }

    #[test]
    fn explicit_bounds_keep_sub_day_precision() {
        let options = options_for(
            &args(&[], Some("2024-05-17T09:15:00Z"), Some("2024-05-17T09:45:00+00:00")),
            now(),
            DayBoundary::Utc,
        )
        .unwrap();
        assert_eq!(options.after, Some(Utc.with_ymd_and_hms(2024, 5, 17, 9, 15, 0).unwrap()));
        assert_eq!(options.before, Some(Utc.with_ymd_and_hms(2024, 5, 17, 9, 45, 0).unwrap()));
    }

    #[test]
    fn unparseable_expression_is_reported() {
        let err = options_for(&args(&["someday"], None, None), now(), DayBoundary::Utc).unwrap_err();
        assert_eq!(err.to_string(), "failed to parse time from \"someday\"");
    }

    #[test]
    fn render_trims_trailing_newlines_only() {
        let entry = Entry {
            id: jrnl_core::EntryId::generate(),
            created_at: now(),
            contents: "line one\nline two\n".into(),
        };
        assert_eq!(render(&entry), "2024-05-17T15:00:00Z  line one\nline two");
    }
}
