use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;
use crate::error::AppError;

/// Line-buffered log file shared between the subscriber and the guard.
#[derive(Clone)]
pub struct FileSink(Arc<Mutex<LineWriter<File>>>);

impl FileSink {
    /// Opens `path` for appending, creating missing parent directories.
    pub fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config(format!("cannot create log directory {}: {e}", parent.display()))
            })?;
        }
        let handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| AppError::config(format!("cannot open log file {}: {e}", path.display())))?;
        Ok(Self(Arc::new(Mutex::new(LineWriter::new(handle)))))
    }

    fn lock(&self) -> MutexGuard<'_, LineWriter<File>> {
        // A panic mid-write leaves at worst a torn line
        match self.0.lock() {
            Ok(writer) => writer,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn flush(&self) {
        let _ = self.lock().flush();
    }
}

pub struct FileSinkWriter<'a>(MutexGuard<'a, LineWriter<File>>);

impl Write for FileSinkWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl<'a> MakeWriter<'a> for FileSink {
    type Writer = FileSinkWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileSinkWriter(self.lock())
    }
}

/// Keeps the optional log file alive; flushes it when shut down or dropped.
pub struct TelemetryGuard {
    file: Option<FileSink>,
}

impl TelemetryGuard {
    pub fn shutdown(self) {
        tracing::info!("telemetry shutting down");
        drop(self);
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            file.flush();
        }
    }
}

/// Install the global JSON subscriber: stdout always, plus `LOG_FILE` when
/// configured. A log file that cannot be opened is a startup error.
pub fn init_tracing(config: &LogConfig) -> Result<TelemetryGuard, AppError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,actix_web=info,sqlx=warn,sea_orm=warn"));

    let file = config.file.as_deref().map(FileSink::open).transpose()?;

    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .json();

    let file_layer = file.clone().map(|sink| {
        fmt::layer()
            .with_target(true)
            .with_ansi(false)
            .json()
            .with_writer(sink)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::config(format!("tracing already initialised: {e}")))?;

    Ok(TelemetryGuard { file })
}
