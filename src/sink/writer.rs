use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::Result;
use crate::RuprobeError;
use crate::probe::Outcome;
use crate::sink::model::DiscoveredRecord;

const SINK_DIR: &str = ".ruprobe";
const JSON_FILE: &str = "discovered.jsonl";
const TEXT_FILE: &str = "discovered.txt";

/// File-based output for discovered data.
///
/// Two artifacts per run directory: a JSONL file (one structured record per
/// outcome, appended across runs) and a plain-text file (one name per line,
/// successes only, rewritten each run). The probe core knows nothing about
/// either format.
pub struct DiscoveredSink {
    dir: PathBuf,
}

impl Default for DiscoveredSink {
    fn default() -> Self {
        let dir = std::env::var("RUPROBE_SINK_DIR").unwrap_or_else(|_| SINK_DIR.to_string());
        Self { dir: PathBuf::from(dir) }
    }
}

impl DiscoveredSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join(JSON_FILE)
    }

    pub fn text_path(&self) -> PathBuf {
        self.dir.join(TEXT_FILE)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).map_err(RuprobeError::IoError)?;
        }
        Ok(())
    }

    /// Append one record to the JSONL file.
    ///
    /// # Concurrency Strategy
    /// Uses `fs2::lock_exclusive` so concurrent processes never interleave
    /// partial lines. The lock is held only for the duration of the write.
    pub fn append(&self, record: &DiscoveredRecord) -> Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string(record)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.json_path())
            .map_err(RuprobeError::IoError)?;

        file.lock_exclusive().map_err(RuprobeError::IoError)?;
        writeln!(file, "{}", json).map_err(RuprobeError::IoError)?;
        // Unlock happens when the handle is dropped
        drop(file);

        Ok(())
    }

    /// Rewrite the plain-text name list from this run's records.
    /// Only successful probes count as discovered items.
    pub fn write_names(&self, records: &[DiscoveredRecord]) -> Result<()> {
        self.ensure_dir()?;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(self.text_path())
            .map_err(RuprobeError::IoError)?;

        file.lock_exclusive().map_err(RuprobeError::IoError)?;
        for record in records {
            if record.classification.is_success() {
                writeln!(file, "{}", record.name).map_err(RuprobeError::IoError)?;
            }
        }
        drop(file);

        Ok(())
    }

    /// Read all JSONL records back. Lines that fail to parse are skipped.
    pub fn list(&self) -> Result<Vec<DiscoveredRecord>> {
        let path = self.json_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path).map_err(RuprobeError::IoError)?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect())
    }
}

/// 把一次运行的结果写入 sink
///
/// Best-effort 操作：写入失败打警告，不向上抛错，
/// 落盘问题不应该掩盖探测本身的结论
pub fn record_discovered(sink: &DiscoveredSink, outcomes: &[Outcome]) {
    let records: Vec<DiscoveredRecord> = outcomes.iter().map(DiscoveredRecord::from_outcome).collect();

    for record in &records {
        if let Err(e) = sink.append(record) {
            warn!("Failed to append discovered record: {}", e);
            break;
        }
    }

    if let Err(e) = sink.write_names(&records) {
        warn!("Failed to write discovered name list: {}", e);
    }
}
