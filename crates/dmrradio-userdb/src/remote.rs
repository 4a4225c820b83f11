//! Remote user sets
//!
//! Downloads are plain blocking HTTP GETs. A source without an `http://` or
//! `https://` scheme is read from the local filesystem instead, which lets
//! the same pipeline run against saved exports.
//!
//! Two export formats are understood, told apart by content:
//!
//! - CSV with a header row naming `RADIO_ID`, `CALLSIGN`, `FIRST_NAME`,
//!   `LAST_NAME`, `CITY`, `STATE` and `COUNTRY` columns;
//! - JSON shaped as `{"users": [{"radio_id": .., "callsign": .., "fname": ..,
//!   "surname": .., "city": .., "state": .., "country": ..}]}`.

use std::collections::BTreeMap;
use std::io::Read;
use std::time::Duration;

use dmrradio_core::progress::{scaled_tick, Progress, MAX_PROGRESS};
use dmrradio_core::users::UserRecord;
use serde::Deserialize;

use crate::error::{Result, UserDbError};

const TIMEOUT: Duration = Duration::from_secs(120);
const READ_CHUNK: usize = 64 * 1024;

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Download every source and parse it
///
/// All downloads share one progress phase; each source gets an equal band
/// of the tick scale.
pub(crate) fn download_all(
    sources: &[String],
    progress: &mut dyn Progress,
) -> Result<Vec<Vec<UserRecord>>> {
    progress.report(0)?;

    let client = match sources.iter().find(|s| is_remote(s)) {
        Some(url) => Some(
            reqwest::blocking::Client::builder()
                .timeout(TIMEOUT)
                .build()
                .map_err(|e| UserDbError::Http {
                    url: url.clone(),
                    source: e,
                })?,
        ),
        None => None,
    };

    let mut last_tick = 0;
    let count = sources.len();
    let mut sets = Vec::with_capacity(count);

    for (index, source) in sources.iter().enumerate() {
        let mut band = |done: usize, total: Option<u64>| -> Result<()> {
            let within = match total {
                Some(total) => scaled_tick(done, total as usize),
                None => 0,
            };
            let tick = ((index as u64 * u64::from(MAX_PROGRESS) + u64::from(within))
                / count as u64) as u32;
            // Zero would start a new phase
            if tick > last_tick {
                last_tick = tick;
                progress.report(tick)?;
            }
            Ok(())
        };

        let data = match &client {
            Some(client) if is_remote(source) => fetch(client, source, &mut band)?,
            _ => {
                let data = std::fs::read(source).map_err(|e| UserDbError::Read {
                    path: source.clone(),
                    source: e,
                })?;
                band(data.len(), Some(data.len() as u64))?;
                data
            }
        };

        let users = parse(source, &data)?;
        log::info!("{}: {} users", source, users.len());
        sets.push(users);
    }

    if last_tick < MAX_PROGRESS {
        progress.report(MAX_PROGRESS)?;
    }
    Ok(sets)
}

fn fetch(
    client: &reqwest::blocking::Client,
    url: &str,
    on_progress: &mut dyn FnMut(usize, Option<u64>) -> Result<()>,
) -> Result<Vec<u8>> {
    log::debug!("GET {}", url);
    let http = |e| UserDbError::Http {
        url: url.to_string(),
        source: e,
    };
    let mut response = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(http)?;
    let total = response.content_length();

    let mut body = Vec::new();
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = response.read(&mut buf).map_err(|e| UserDbError::Read {
            path: url.to_string(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
        on_progress(body.len(), total)?;
    }
    Ok(body)
}

/// Parse a downloaded user export
pub(crate) fn parse(source: &str, data: &[u8]) -> Result<Vec<UserRecord>> {
    let format_error = |detail: String| UserDbError::Format {
        url: source.to_string(),
        detail,
    };

    let first = data.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'{') {
        return parse_json(data).map_err(format_error);
    }
    let text = std::str::from_utf8(data).map_err(|e| format_error(e.to_string()))?;
    parse_csv(text).map_err(format_error)
}

/// Split one CSV line, honoring double quotes
fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

fn full_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}

fn nickname(first: &str) -> String {
    first.split_whitespace().next().unwrap_or("").to_string()
}

fn parse_csv(text: &str) -> std::result::Result<Vec<UserRecord>, String> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().ok_or("empty file")?;
    let header: Vec<String> = split_csv_line(header)
        .into_iter()
        .map(|h| h.trim().to_ascii_uppercase())
        .collect();
    let column = |name: &str| header.iter().position(|h| h == name);

    let id_col = column("RADIO_ID").ok_or("no RADIO_ID column")?;
    let callsign_col = column("CALLSIGN");
    let first_col = column("FIRST_NAME");
    let last_col = column("LAST_NAME");
    let city_col = column("CITY");
    let state_col = column("STATE");
    let country_col = column("COUNTRY");

    let mut users = Vec::new();
    let mut skipped = 0;
    for line in lines {
        let fields = split_csv_line(line);
        let get = |col: Option<usize>| {
            col.and_then(|c| fields.get(c))
                .map(|s| s.trim())
                .unwrap_or("")
        };

        let Ok(id) = get(Some(id_col)).parse() else {
            skipped += 1;
            continue;
        };
        let first = get(first_col);
        users.push(UserRecord {
            id,
            callsign: get(callsign_col).to_string(),
            name: full_name(first, get(last_col)),
            city: get(city_col).to_string(),
            state: get(state_col).to_string(),
            nick: nickname(first),
            country: get(country_col).to_string(),
        });
    }
    if skipped > 0 {
        log::debug!("skipped {} rows without a valid radio id", skipped);
    }
    Ok(users)
}

#[derive(Debug, Deserialize)]
struct JsonUsers {
    users: Vec<JsonUser>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct JsonUser {
    radio_id: serde_json::Value,
    callsign: Option<String>,
    fname: Option<String>,
    surname: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
}

fn json_id(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_json(data: &[u8]) -> std::result::Result<Vec<UserRecord>, String> {
    let doc: JsonUsers = serde_json::from_slice(data).map_err(|e| e.to_string())?;

    let mut users = Vec::with_capacity(doc.users.len());
    for user in doc.users {
        let Some(id) = json_id(&user.radio_id) else {
            continue;
        };
        let text = |s: Option<String>| s.unwrap_or_default().trim().to_string();
        let first = text(user.fname);
        let last = text(user.surname);
        users.push(UserRecord {
            id,
            callsign: text(user.callsign),
            name: full_name(&first, &last),
            nick: nickname(&first),
            city: text(user.city),
            state: text(user.state),
            country: text(user.country),
        });
    }
    Ok(users)
}

/// Merge user sets by radio id
///
/// The first set to mention an id wins; fields it leaves blank are filled
/// from later sets. The result is sorted by id.
pub(crate) fn merge(sets: Vec<Vec<UserRecord>>) -> Vec<UserRecord> {
    let mut merged: BTreeMap<u32, UserRecord> = BTreeMap::new();
    for set in sets {
        for user in set {
            match merged.get_mut(&user.id) {
                None => {
                    merged.insert(user.id, user);
                }
                Some(existing) => {
                    let fill = |dst: &mut String, src: String| {
                        if dst.is_empty() {
                            *dst = src;
                        }
                    };
                    fill(&mut existing.callsign, user.callsign);
                    fill(&mut existing.name, user.name);
                    fill(&mut existing.city, user.city);
                    fill(&mut existing.state, user.state);
                    fill(&mut existing.nick, user.nick);
                    fill(&mut existing.country, user.country);
                }
            }
        }
    }
    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dmrradio_core::progress::ProgressError;

    const CSV: &str = "\
RADIO_ID,CALLSIGN,FIRST_NAME,LAST_NAME,CITY,STATE,COUNTRY
1023001,VE3THW,Wayne ,Holmes,Toronto,Ontario,Canada
3100002,N0CALL,\"Mary Ann\",\"O\"\"Neil\",Springfield,Illinois,United States
bogus,X,,,,,
";

    const JSON: &str = r#"{"users": [
        {"radio_id": 3100002, "callsign": "N0CALL", "fname": "Mary", "surname": "O'Neil",
         "city": "", "state": "Illinois", "country": "United States"},
        {"radio_id": "2340001", "callsign": "G0ABC", "fname": "Ian", "surname": null,
         "city": "Leeds", "state": null, "country": "United Kingdom"},
        {"radio_id": null, "callsign": "NOID"}
    ]}"#;

    #[derive(Default)]
    struct Recorder(Vec<u32>);

    impl Progress for Recorder {
        fn report(&mut self, tick: u32) -> std::result::Result<(), ProgressError> {
            self.0.push(tick);
            Ok(())
        }
    }

    #[test]
    fn test_split_csv_line() {
        assert_eq!(split_csv_line("a,\"b,c\",\"d\"\"e\","), vec!["a", "b,c", "d\"e", ""]);
    }

    #[test]
    fn test_parse_csv() {
        let users = parse("user.csv", CSV.as_bytes()).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].id, 1023001);
        assert_eq!(users[0].name, "Wayne Holmes");
        assert_eq!(users[0].nick, "Wayne");
        assert_eq!(users[1].name, "Mary Ann O\"Neil");
        assert_eq!(users[1].nick, "Mary");
        assert_eq!(users[1].country, "United States");
    }

    #[test]
    fn test_parse_json() {
        let users = parse("users.json", JSON.as_bytes()).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].id, 2340001);
        assert_eq!(users[1].name, "Ian");
        assert_eq!(users[1].state, "");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse("x.csv", b"ID,CALL\n1,A\n"),
            Err(UserDbError::Format { .. })
        ));
        assert!(matches!(
            parse("x.json", b"{\"people\": []}"),
            Err(UserDbError::Format { .. })
        ));
    }

    #[test]
    fn test_merge_first_wins_and_fills_blanks() {
        let csv = parse("user.csv", CSV.as_bytes()).unwrap();
        let json = parse("users.json", JSON.as_bytes()).unwrap();
        let merged = merge(vec![json, csv]);

        assert_eq!(
            merged.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![1023001, 2340001, 3100002]
        );
        let mary = &merged[2];
        assert_eq!(mary.name, "Mary O'Neil");
        assert_eq!(mary.city, "Springfield");
    }

    #[test]
    fn test_download_local_sources_progress() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("user.csv");
        let json = dir.path().join("users.json");
        std::fs::write(&csv, CSV).unwrap();
        std::fs::write(&json, JSON).unwrap();
        let sources = vec![
            csv.to_string_lossy().into_owned(),
            json.to_string_lossy().into_owned(),
        ];

        let mut rec = Recorder::default();
        let sets = download_all(&sources, &mut rec).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(rec.0, vec![0, MAX_PROGRESS / 2, MAX_PROGRESS]);
    }

    #[test]
    fn test_missing_local_source() {
        let mut rec = Recorder::default();
        let err = download_all(&["/nonexistent/user.csv".to_string()], &mut rec).unwrap_err();
        assert!(matches!(err, UserDbError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/user.csv"));
    }
}
