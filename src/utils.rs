// Session logging for the binary. The terminal itself is the chat surface,
// so log output always goes to a file. Debug chatter from the HTTP stack is
// kept out of the session log entirely.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::Result;
use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};

/// Crates whose debug/trace output would swamp a chat session log.
const NOISY_TARGETS: &[&str] = &["hyper", "reqwest", "want", "mio"];

/// File-backed logger for one chat session. Each line carries the wall-clock
/// time plus the seconds elapsed since the session opened, so delivery
/// acknowledgement timing can be read straight off the log.
pub struct SessionLogger {
    sink: Mutex<BufWriter<File>>,
    started: Instant,
}

impl SessionLogger {
    pub fn create(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(SessionLogger {
            sink: Mutex::new(BufWriter::new(file)),
            started: Instant::now(),
        })
    }

    /// Below warn level, the HTTP stack's wire chatter stays out of the log.
    fn is_noise(record: &Record) -> bool {
        record.level() > Level::Info
            && NOISY_TARGETS
                .iter()
                .any(|prefix| record.target().starts_with(prefix))
    }

    fn write_record(&self, record: &Record) {
        let line = format!(
            "{} +{:>7.1}s {:<5} {}: {}\n",
            Local::now().format("%H:%M:%S"),
            self.started.elapsed().as_secs_f32(),
            record.level(),
            record.target(),
            record.args()
        );

        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.write_all(line.as_bytes());
            // Flushed per line so the log is readable mid-session.
            let _ = sink.flush();
        }
    }
}

impl log::Log for SessionLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) && !Self::is_noise(record) {
            self.write_record(record);
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            let _ = sink.flush();
        }
    }
}

pub fn setup_logging(path: &Path, level: LevelFilter) -> Result<()> {
    let logger = SessionLogger::create(path)?;
    log::set_boxed_logger(Box::new(logger)).map(|()| log::set_max_level(level))?;

    log::info!(
        "{} {} session log opened",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}
