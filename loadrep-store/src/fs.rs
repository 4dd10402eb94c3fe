use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::UNIX_EPOCH;

use crate::error::{Error, Result};
use crate::types::{
    BladeDescriptor, BladeKind, DateFilter, EventSample, FieldValue, RunDescriptor,
};
use crate::EventStore;

const BLADES_FILE: &str = "blades.csv";
const SEPARATOR: char = ';';

/// [`EventStore`] over a results directory written by the harness:
///
/// ```text
/// <root>/<run-name>/blades.csv                one blade per line
/// <root>/<run-name>/<blade-id>/<event>.csv    header line = field labels
/// ```
///
/// The run date comes from a `<plan>_<YYYY-MM-DD>_<HHhMMmSS>` name
/// suffix (interpreted as UTC), falling back to the directory mtime.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn run_dir(&self, run: &str) -> Result<PathBuf> {
        let dir = self.root.join(run);
        if !dir.join(BLADES_FILE).is_file() {
            return Err(Error::MissingRun(run.to_string()));
        }
        Ok(dir)
    }

    fn blade_dir(&self, run: &str, blade: &str) -> Result<PathBuf> {
        let dir = self.run_dir(run)?.join(blade);
        if !dir.is_dir() {
            return Err(Error::MissingBlade {
                run: run.to_string(),
                blade: blade.to_string(),
            });
        }
        Ok(dir)
    }

    fn event_file(&self, run: &str, blade: &str, event: &str) -> Result<PathBuf> {
        let file = self.blade_dir(run, blade)?.join(format!("{event}.csv"));
        if !file.is_file() {
            return Err(Error::MissingEventType {
                blade: blade.to_string(),
                event: event.to_string(),
            });
        }
        Ok(file)
    }

    fn run_date(&self, run: &str) -> Result<i64> {
        if let Some(date) = parse_run_date(run) {
            return Ok(date);
        }
        let meta = fs::metadata(self.root.join(run))?;
        let modified = meta.modified()?;
        Ok(modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0))
    }

    fn event_type_labels(&self, blade_dir: &Path) -> Result<Vec<String>> {
        let mut labels = Vec::new();
        for entry in fs::read_dir(blade_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|e| e == "csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    labels.push(stem.to_string());
                }
            }
        }
        labels.sort();
        Ok(labels)
    }
}

impl EventStore for FileStore {
    fn list_runs(&self) -> Result<Vec<RunDescriptor>> {
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.path().join(BLADES_FILE).is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let date = self.run_date(&name)?;
            runs.push(RunDescriptor { name, date });
        }
        runs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(runs)
    }

    fn blades(&self, run: &str) -> Result<Vec<BladeDescriptor>> {
        let dir = self.run_dir(run)?;
        let path = dir.join(BLADES_FILE);
        let text = fs::read_to_string(&path)?;

        let mut blades = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split(SEPARATOR).collect();
            let &[id, server, class_name, argument, comment, kind] = fields.as_slice() else {
                return Err(Error::MalformedDescriptor {
                    path: path.display().to_string(),
                    line: idx + 1,
                    reason: format!("expected 6 fields, got {}", fields.len()),
                });
            };
            let kind = BladeKind::from_str(kind).map_err(|_| Error::MalformedDescriptor {
                path: path.display().to_string(),
                line: idx + 1,
                reason: format!("unknown blade kind '{kind}'"),
            })?;
            let blade_dir = dir.join(id);
            let event_type_labels = if blade_dir.is_dir() {
                self.event_type_labels(&blade_dir)?
            } else {
                Vec::new()
            };
            blades.push(BladeDescriptor {
                id: id.to_string(),
                server: server.to_string(),
                class_name: class_name.to_string(),
                argument: argument.to_string(),
                comment: comment.to_string(),
                kind,
                event_type_labels,
            });
        }
        Ok(blades)
    }

    fn event_field_labels(&self, run: &str, blade: &str, event: &str) -> Result<Vec<String>> {
        let path = self.event_file(run, blade, event)?;
        let text = fs::read_to_string(&path)?;
        let Some(header) = text.lines().next() else {
            return Err(Error::MalformedEvent {
                path: path.display().to_string(),
                line: 1,
                reason: "missing header line".to_string(),
            });
        };
        Ok(header.split(SEPARATOR).map(str::to_string).collect())
    }

    fn events(
        &self,
        run: &str,
        blade: &str,
        event: &str,
        filter: &DateFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<EventSample>> {
        let path = self.event_file(run, blade, event)?;
        let text = fs::read_to_string(&path)?;
        let mut lines = text.lines().enumerate();
        let Some((_, header)) = lines.next() else {
            return Err(Error::MalformedEvent {
                path: path.display().to_string(),
                line: 1,
                reason: "missing header line".to_string(),
            });
        };
        let labels: Vec<&str> = header.split(SEPARATOR).collect();

        let mut samples = Vec::new();
        for (idx, line) in lines {
            if line.trim().is_empty() {
                continue;
            }
            let mut values = Vec::with_capacity(labels.len());
            for (i, raw) in line.split(SEPARATOR).enumerate() {
                let label = labels.get(i).copied().unwrap_or("");
                let value = parse_field(label, raw);
                // The timestamp field is structural; a record without
                // one cannot be placed on any series.
                if i == 0 && value.as_i64().is_none() {
                    return Err(Error::MalformedEvent {
                        path: path.display().to_string(),
                        line: idx + 1,
                        reason: format!("unparseable date '{raw}'"),
                    });
                }
                values.push(value);
            }
            let sample = EventSample::new(values);
            if filter.contains(sample.date()) {
                samples.push(sample);
            }
        }

        Ok(samples.into_iter().skip(offset).take(limit).collect())
    }
}

fn parse_field(label: &str, raw: &str) -> FieldValue {
    match label {
        "date" | "duration" | "severity" => match raw.parse::<i64>() {
            Ok(v) => FieldValue::I64(v),
            Err(_) => FieldValue::Null,
        },
        "success" => match raw.to_ascii_lowercase().as_str() {
            "true" => FieldValue::Bool(true),
            "false" => FieldValue::Bool(false),
            _ => FieldValue::Null,
        },
        _ => FieldValue::Str(raw.to_string()),
    }
}

/// Extracts the epoch-ms start date from a run name of the form
/// `<plan>_<YYYY-MM-DD>_<HHhMMmSS>`.
fn parse_run_date(name: &str) -> Option<i64> {
    let mut parts = name.rsplitn(3, '_');
    let time = parts.next()?;
    let date = parts.next()?;
    parts.next()?;

    let mut ymd = date.splitn(3, '-');
    let year: i64 = ymd.next()?.parse().ok()?;
    let month: i64 = ymd.next()?.parse().ok()?;
    let day: i64 = ymd.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    let rest = time.strip_suffix('s').unwrap_or(time);
    let (hour, rest) = rest.split_once('h')?;
    let (minute, second) = rest.split_once('m')?;
    let hour: i64 = hour.parse().ok()?;
    let minute: i64 = minute.parse().ok()?;
    let second: i64 = second.parse().ok()?;
    if hour > 23 || minute > 59 || second > 59 {
        return None;
    }

    let secs = days_from_civil(year, month, day) * 86_400 + hour * 3_600 + minute * 60 + second;
    Some(secs * 1_000)
}

// Civil-from-days inverse (Hinnant's algorithm); proleptic Gregorian.
fn days_from_civil(y: i64, m: i64, d: i64) -> i64 {
    let y = if m <= 2 { y - 1 } else { y };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + d - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                panic!("create_dir_all failed: {err}");
            }
        }
        let mut file = match fs::File::create(path) {
            Ok(f) => f,
            Err(err) => panic!("create failed: {err}"),
        };
        if let Err(err) = file.write_all(content.as_bytes()) {
            panic!("write failed: {err}");
        }
    }

    fn fixture() -> (tempfile::TempDir, FileStore) {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(err) => panic!("tempdir failed: {err}"),
        };
        let run = dir.path().join("plan_1970-01-02_01h00m00");
        write_file(
            &run.join("blades.csv"),
            "inj.0;host-a;org.ow2.clif.IsacRunner;scenario.xis;main load;injector\n\
             probe.0;host-a;org.ow2.clif.probe.cpu.Insert;;cpu watch;probe\n",
        );
        write_file(
            &run.join("inj.0/request.csv"),
            "date;duration;success;result;actionType;comment\n\
             10;100;true;HTTP 200;get;home\n\
             20;250;false;HTTP 500;get;home\n\
             30;150;true;HTTP 200;post;login\n",
        );
        write_file(&run.join("probe.0/cpu.csv"), "date;load\n10;0.5\n20;0.75\n");
        let store = FileStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn run_date_parses_from_name_suffix() {
        // 1 day + 1 hour past the epoch.
        assert_eq!(parse_run_date("plan_1970-01-02_01h00m00"), Some(90_000_000));
        assert_eq!(parse_run_date("plan_1970-01-01_00h00m00"), Some(0));
        assert_eq!(parse_run_date("no-suffix"), None);
        assert_eq!(parse_run_date("plan_1970-13-01_00h00m00"), None);
    }

    #[test]
    fn lists_runs_with_dates() {
        let (_dir, store) = fixture();
        let runs = match store.list_runs() {
            Ok(r) => r,
            Err(err) => panic!("list_runs failed: {err}"),
        };
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].name, "plan_1970-01-02_01h00m00");
        assert_eq!(runs[0].date, 90_000_000);
    }

    #[test]
    fn undated_run_name_falls_back_to_mtime() {
        let (_dir, store) = {
            let dir = match tempfile::tempdir() {
                Ok(d) => d,
                Err(err) => panic!("tempdir failed: {err}"),
            };
            write_file(&dir.path().join("myrun/blades.csv"), "");
            let store = FileStore::new(dir.path());
            (dir, store)
        };
        let runs = match store.list_runs() {
            Ok(r) => r,
            Err(err) => panic!("list_runs failed: {err}"),
        };
        assert_eq!(runs.len(), 1);
        assert!(runs[0].date > 0);
    }

    #[test]
    fn blades_parse_with_event_type_labels() {
        let (_dir, store) = fixture();
        let blades = match store.blades("plan_1970-01-02_01h00m00") {
            Ok(b) => b,
            Err(err) => panic!("blades failed: {err}"),
        };
        assert_eq!(blades.len(), 2);
        assert_eq!(blades[0].id, "inj.0");
        assert_eq!(blades[0].kind, BladeKind::Injector);
        assert_eq!(blades[0].event_type_labels, vec!["request".to_string()]);
        assert_eq!(blades[1].kind, BladeKind::Probe);
        assert_eq!(blades[1].event_type_labels, vec!["cpu".to_string()]);
    }

    #[test]
    fn events_are_typed_by_label() {
        let (_dir, store) = fixture();
        let labels = match store.event_field_labels("plan_1970-01-02_01h00m00", "inj.0", "request")
        {
            Ok(l) => l,
            Err(err) => panic!("labels failed: {err}"),
        };
        assert_eq!(labels[0], "date");

        let events = match store.events(
            "plan_1970-01-02_01h00m00",
            "inj.0",
            "request",
            &DateFilter::default(),
            0,
            usize::MAX,
        ) {
            Ok(e) => e,
            Err(err) => panic!("events failed: {err}"),
        };
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].date(), 10);
        assert_eq!(events[0].field(1), &FieldValue::I64(100));
        assert_eq!(events[1].field(2), &FieldValue::Bool(false));
        assert_eq!(events[2].field(3), &FieldValue::Str("HTTP 200".into()));
    }

    #[test]
    fn events_respect_filter_and_paging() {
        let (_dir, store) = fixture();
        let filter = DateFilter {
            from: Some(20),
            to: Some(30),
        };
        let events = match store.events(
            "plan_1970-01-02_01h00m00",
            "inj.0",
            "request",
            &filter,
            1,
            usize::MAX,
        ) {
            Ok(e) => e,
            Err(err) => panic!("events failed: {err}"),
        };
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].date(), 30);
    }

    #[test]
    fn missing_pieces_map_to_distinct_errors() {
        let (_dir, store) = fixture();
        assert!(matches!(store.blades("nope"), Err(Error::MissingRun(_))));
        assert!(matches!(
            store.event_field_labels("plan_1970-01-02_01h00m00", "nope", "request"),
            Err(Error::MissingBlade { .. })
        ));
        assert!(matches!(
            store.event_field_labels("plan_1970-01-02_01h00m00", "inj.0", "monitor"),
            Err(Error::MissingEventType { .. })
        ));
    }

    #[test]
    fn malformed_blade_line_is_rejected() {
        let dir = match tempfile::tempdir() {
            Ok(d) => d,
            Err(err) => panic!("tempdir failed: {err}"),
        };
        write_file(&dir.path().join("r/blades.csv"), "only;three;fields\n");
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.blades("r"),
            Err(Error::MalformedDescriptor { .. })
        ));
    }
}
