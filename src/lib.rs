//! # ZipRoller
//!
//! ZipRoller keeps a single, continuously appended log stream on disk. Once the
//! active file has grown past a size threshold it is sealed into a
//! `<name>-<epoch-millis>.zip` archive next to it, a fresh active file is
//! started, and the oldest archives are swept away so that only a bounded
//! number of them are retained.
//!
//! Everything happens synchronously on the writing thread: there is no
//! background compaction, so a write that triggers a rotation returns only
//! after the archive is finalized and the retention sweep is done.
//!
//! ## Example
//!
//! ```no_run
//! use ziproller::{FileRotatorBuilder, RotationSize};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut rotator = FileRotatorBuilder::new("./logs", "app.log")
//!         .rotation_size(RotationSize::MB(10))
//!         .keep_files(7)
//!         .build()?;
//!
//!     rotator.write_line(b"service started")?;
//!     rotator.write_line(b"listening on 0.0.0.0:8080")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! `FileRotator` also implements [`std::io::Write`], so it can sit behind
//! `tracing_appender::non_blocking` as the sink of a `tracing` subscriber.
use {
    chrono::Utc,
    std::{
        ffi::OsStr,
        fmt,
        fs::{self, File},
        io::{self, Read, Write as _},
        ops::Range,
        path::{Path, PathBuf},
    },
    tracing::{debug, info, warn},
    zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter},
};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};

/// Rotation threshold used when none is configured (10 MiB).
pub const DEFAULT_ROTATE_EVERY_BYTES: u64 = 10 * 1024 * 1024;

/// Number of retained files used when none is configured.
pub const DEFAULT_KEEP_FILES: usize = 7;

/// Exclusive upper bound for the number of retained files.
pub const MAX_KEEP_FILES: usize = 1024;

/// Suffix shared by every archive, and by every file the retention sweep
/// considers.
pub const ARCHIVE_SUFFIX: &str = ".zip";

/// Size of the buffer used to stream the sealed file into its archive.
const ARCHIVE_CHUNK_SIZE: usize = 512 * 1024;

/// Millisecond timestamps with exactly 13 digits (2001-09-09 to 2286-11-20).
/// Archive names only sort in creation order while timestamps stay inside it.
const ARCHIVE_TIMESTAMP_RANGE: Range<i64> = 1_000_000_000_000..10_000_000_000_000;

/// Entries at or above this size need the ZIP64 extension.
const ZIP64_THRESHOLD: u64 = u32::MAX as u64;

#[cfg(unix)]
const DIRECTORY_MODE: u32 = 0o755;

/// Defines size thresholds for rotating the active file in various units.
///
/// * `Bytes` - Direct byte count (e.g., 1048576 bytes)
/// * `KB` - Kilobytes (1 KB = 1024 bytes)
/// * `MB` - Megabytes (1 MB = 1024 KB)
/// * `GB` - Gigabytes (1 GB = 1024 MB)
///
/// # Examples
/// ```no_run
/// use ziproller::{FileRotatorBuilder, RotationSize};
///
/// // Rotate once the active file reaches 100 MB
/// let rotator = FileRotatorBuilder::new("./logs", "large.log")
///     .rotation_size(RotationSize::MB(100))
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationSize {
    /// Raw byte count
    Bytes(u64),
    /// Kilobytes (1 KB = 1024 bytes)
    KB(u64),
    /// Megabytes (1 MB = 1024 KB = 1,048,576 bytes)
    MB(u64),
    /// Gigabytes (1 GB = 1024 MB = 1,073,741,824 bytes)
    GB(u64),
}

impl RotationSize {
    /// Get the threshold in bytes, saturating at `u64::MAX`.
    pub fn bytes(&self) -> u64 {
        match *self {
            RotationSize::Bytes(b) => b,
            RotationSize::KB(kb) => kb.saturating_mul(1024),
            RotationSize::MB(mb) => mb.saturating_mul(1024 * 1024),
            RotationSize::GB(gb) => gb.saturating_mul(1024 * 1024 * 1024),
        }
    }
}

/// Settings for a [`FileRotator`].
///
/// Unset numeric options are filled in by [`RotatorConfig::validate`]:
/// `rotate_every_bytes` defaults to [`DEFAULT_ROTATE_EVERY_BYTES`] and
/// `keep_files` to [`DEFAULT_KEEP_FILES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotatorConfig {
    /// The directory holding the active file and its archives. Created
    /// (including parents) if it does not exist.
    pub directory: PathBuf,
    /// The name of the active file. Archives are named after it, and it is
    /// also the name of the single entry inside each archive.
    pub name: String,
    /// Size in bytes at which the active file is rotated.
    pub rotate_every_bytes: Option<u64>,
    /// Number of files to keep. The sweep after each rotation deletes the
    /// oldest archives until fewer than this many remain, so together with
    /// the active file this is the number of files of the stream on disk.
    pub keep_files: Option<usize>,
    /// The file permissions to set on the active file and on archives
    /// (Unix-like systems only), in octal notation (e.g., 0o640). On
    /// non-Unix systems this setting is ignored with a warning.
    pub file_mode: Option<u32>,
}

impl RotatorConfig {
    /// Create a configuration with every optional setting unset.
    pub fn new<P: AsRef<Path>>(directory: P, name: impl Into<String>) -> Self {
        RotatorConfig {
            directory: directory.as_ref().to_path_buf(),
            name: name.into(),
            rotate_every_bytes: None,
            keep_files: None,
            file_mode: None,
        }
    }

    /// Check the configuration and fill unset options with their defaults.
    ///
    /// Validating an already validated configuration returns it unchanged.
    ///
    /// # Errors
    /// [`RotatorError::InvalidConfig`] when the name is empty or is not a
    /// plain file name, when `keep_files` lies outside `[2, 1024)`, or when
    /// `rotate_every_bytes` is zero.
    pub fn validate(mut self) -> Result<Self, RotatorError> {
        if self.name.is_empty() {
            return Err(RotatorError::InvalidConfig(
                "file logging requires a name for the file names".to_string(),
            ));
        }
        let is_plain_file_name = Path::new(&self.name)
            .file_name()
            .is_some_and(|file_name| file_name == OsStr::new(&self.name));
        if !is_plain_file_name {
            return Err(RotatorError::InvalidConfig(format!(
                "file name '{}' must not contain path components",
                self.name
            )));
        }

        let keep_files = *self.keep_files.get_or_insert(DEFAULT_KEEP_FILES);
        let rotate_every_bytes = *self.rotate_every_bytes.get_or_insert(DEFAULT_ROTATE_EVERY_BYTES);

        if !(2..MAX_KEEP_FILES).contains(&keep_files) {
            return Err(RotatorError::InvalidConfig(format!(
                "the number of files to keep should be between 2 and {}, got {keep_files}",
                MAX_KEEP_FILES - 1
            )));
        }
        if rotate_every_bytes == 0 {
            return Err(RotatorError::InvalidConfig(
                "the rotation size must be greater than zero".to_string(),
            ));
        }

        Ok(self)
    }
}

/// Make sure `path` is a usable directory, creating it and its parents if
/// it is missing.
///
/// # Errors
/// * [`RotatorError::NotADirectory`] - `path` exists but is something else
/// * [`RotatorError::CreateDirectoryFailed`] - `path` could not be inspected
///   or created
pub fn ensure_directory(path: &Path) -> Result<(), RotatorError> {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Ok(()),
        Ok(_) => Err(RotatorError::NotADirectory(path.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut builder = fs::DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            builder.mode(DIRECTORY_MODE);
            builder
                .create(path)
                .map_err(|err| RotatorError::CreateDirectoryFailed(path.to_path_buf(), err.to_string()))
        }
        Err(err) => Err(RotatorError::CreateDirectoryFailed(path.to_path_buf(), err.to_string())),
    }
}

/// The step of a rotation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStage {
    /// Opening the active file for the first time.
    Opening,
    /// Flushing and closing the active file before it is archived.
    Closing,
    /// Creating the archive file and its single entry.
    CreatingArchive,
    /// Streaming the closed file into the archive entry.
    Compressing,
    /// Writing the archive's central directory and syncing it to disk.
    Finalizing,
    /// Creating the fresh active file after archival.
    Reopening,
}

impl fmt::Display for RotationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RotationStage::Opening => "opening the active file",
            RotationStage::Closing => "closing the active file",
            RotationStage::CreatingArchive => "creating the archive",
            RotationStage::Compressing => "compressing the active file",
            RotationStage::Finalizing => "finalizing the archive",
            RotationStage::Reopening => "reopening the active file",
        })
    }
}

/// Errors that can occur when using the rotator.
#[derive(Debug, thiserror::Error)]
pub enum RotatorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("'{0}' exists but it is not a directory")]
    NotADirectory(PathBuf),
    #[error("Failed to create directory '{0}': {1}")]
    CreateDirectoryFailed(PathBuf, String),
    #[error("Failed to write to '{path}': {error}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
    #[error("Failed to rotate '{path}' while {stage}: {error}")]
    RotationFailed {
        path: PathBuf,
        stage: RotationStage,
        error: String,
    },
    #[error("Log stream '{0}' is unusable after a failed rotation")]
    Unusable(PathBuf),
}

/// An archive the retention sweep failed to inspect or delete.
///
/// These are never returned as errors; they are collected in a
/// [`RetentionReport`] so that cleanup problems cannot block writes.
#[derive(Debug, thiserror::Error)]
#[error("Failed to remove old archive '{path}': {error}")]
pub struct RetentionError {
    pub path: PathBuf,
    #[source]
    pub error: io::Error,
}

/// What a retention sweep did.
#[derive(Debug, Default)]
pub struct RetentionReport {
    /// Archives that were deleted, oldest first.
    pub removed: Vec<PathBuf>,
    /// Failures that were swallowed. When non-empty, the retained-count
    /// bound may not hold.
    pub failures: Vec<RetentionError>,
}

impl RetentionReport {
    /// Whether the sweep ran without swallowing any failure.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What a rotation did.
#[derive(Debug, Default)]
pub struct RotationOutcome {
    /// The archive the previous active file was sealed into. `None` for the
    /// first rotation, which only opens the active file.
    pub archive: Option<PathBuf>,
    /// The sweep that ran after archival.
    pub retention: RetentionReport,
}

/// The open active file and the bytes written to it since it was created.
#[derive(Debug)]
struct ActiveFile {
    file: File,
    written_bytes: u64,
}

/// A size-triggered rotator for a single log stream.
///
/// The rotator exclusively owns the active file; every mutating operation
/// takes `&mut self`, so sharing it across threads requires an external
/// lock or a single writer thread.
#[derive(Debug)]
pub struct FileRotator {
    config: RotatorConfig,
    rotate_every_bytes: u64,
    keep_files: usize,
    active: Option<ActiveFile>,
    unusable: bool,
    last_rotation: Option<RotationOutcome>,
    remove_archive: fn(PathBuf) -> io::Result<()>,
}

impl FileRotator {
    /// Validate `config` and prepare its directory.
    ///
    /// The active file is not opened here; the first write (or an explicit
    /// [`FileRotator::rotate`]) creates it.
    pub fn new(config: RotatorConfig) -> Result<Self, RotatorError> {
        let config = config.validate()?;
        ensure_directory(&config.directory)?;

        Ok(FileRotator {
            rotate_every_bytes: config.rotate_every_bytes.unwrap_or(DEFAULT_ROTATE_EVERY_BYTES),
            keep_files: config.keep_files.unwrap_or(DEFAULT_KEEP_FILES),
            config,
            active: None,
            unusable: false,
            last_rotation: None,
            remove_archive: fs::remove_file::<PathBuf>,
        })
    }

    /// The validated configuration, with defaults filled in.
    pub fn config(&self) -> &RotatorConfig {
        &self.config
    }

    /// Bytes written to the active file since it was created.
    pub fn written_bytes(&self) -> u64 {
        self.active.as_ref().map_or(0, |active| active.written_bytes)
    }

    /// Whether an active file is currently open.
    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// The outcome of the most recent rotation triggered by a write.
    pub fn last_rotation(&self) -> Option<&RotationOutcome> {
        self.last_rotation.as_ref()
    }

    /// Get the path of a file of the stream.
    ///
    /// Index 0 is the active file, `<directory>/<name>`. Any other index
    /// resolves to the legacy numbered archive name `<directory>/<name>.<n>.zip`;
    /// rotation never produces those names, they are only probed for by
    /// [`FileRotator::file_exists`].
    pub fn file_path(&self, index: usize) -> PathBuf {
        if index == 0 {
            return self.config.directory.join(&self.config.name);
        }
        self.config
            .directory
            .join(format!("{}.{index}{ARCHIVE_SUFFIX}", self.config.name))
    }

    /// Whether the file at `index` (see [`FileRotator::file_path`]) exists.
    pub fn file_exists(&self, index: usize) -> bool {
        self.file_path(index).exists()
    }

    /// Get the path of the archive created at `timestamp_millis`,
    /// `<directory>/<name>-<timestamp_millis>.zip`.
    pub fn archive_path(&self, timestamp_millis: i64) -> PathBuf {
        self.config
            .directory
            .join(format!("{}-{timestamp_millis}{ARCHIVE_SUFFIX}", self.config.name))
    }

    /// Append `line` and a terminating newline to the active file.
    ///
    /// If no active file is open yet, or the active file has reached the
    /// rotation size, the rotation happens before the line is written, so
    /// the line always lands in the fresh file.
    ///
    /// A failed write is not retried: the line is lost unless the caller
    /// writes it again.
    pub fn write_line(&mut self, line: &[u8]) -> Result<(), RotatorError> {
        let mut record = Vec::with_capacity(line.len() + 1);
        record.extend_from_slice(line);
        record.push(b'\n');
        self.write_record(&record)
    }

    /// Write `record` verbatim, rotating first if needed.
    fn write_record(&mut self, record: &[u8]) -> Result<(), RotatorError> {
        if self.should_rotate() {
            let outcome = self.rotate()?;
            self.last_rotation = Some(outcome);
        }

        let Some(active) = self.active.as_mut() else {
            return Err(RotatorError::Unusable(self.config.directory.join(&self.config.name)));
        };
        active
            .file
            .write_all(record)
            .map_err(|error| RotatorError::WriteFailed {
                path: self.config.directory.join(&self.config.name),
                error,
            })?;
        active.written_bytes += record.len() as u64;
        Ok(())
    }

    /// Check if the active file should be rotated before the next write.
    fn should_rotate(&self) -> bool {
        match &self.active {
            None => true,
            Some(active) => active.written_bytes >= self.rotate_every_bytes,
        }
    }

    /// Seal the active file into an archive and start a fresh one.
    ///
    /// When no active file is open this only creates it, truncating whatever
    /// a previous run left at that path; no archive is produced. Otherwise
    /// the active file is closed, streamed into a new
    /// `<name>-<epoch-millis>.zip` archive, recreated empty, and the
    /// retention sweep runs.
    ///
    /// # Errors
    /// [`RotatorError::RotationFailed`] names the step that failed. A failure
    /// after the active file was closed leaves the rotator unusable: every
    /// later call returns [`RotatorError::Unusable`], and the caller has to
    /// build a new rotator once the underlying problem is fixed.
    #[tracing::instrument(skip_all, fields(name = %self.config.name))]
    pub fn rotate(&mut self) -> Result<RotationOutcome, RotatorError> {
        if self.unusable {
            return Err(RotatorError::Unusable(self.file_path(0)));
        }

        let Some(previous) = self.active.take() else {
            self.active = Some(self.open_active(RotationStage::Opening)?);
            debug!(path = %self.file_path(0).display(), "opened active file");
            return Ok(RotationOutcome::default());
        };

        let sealed = self
            .archive_active(previous)
            .and_then(|archive| Ok((archive, self.open_active(RotationStage::Reopening)?)));
        let (archive, active) = match sealed {
            Ok(sealed) => sealed,
            Err(err) => {
                self.unusable = true;
                return Err(err);
            }
        };
        self.active = Some(active);

        let retention = self.sweep();
        Ok(RotationOutcome {
            archive: Some(archive),
            retention,
        })
    }

    /// Close `previous` and compress the file it was writing into a new
    /// single-entry archive.
    /// # Returns
    /// The path of the archive.
    fn archive_active(&self, previous: ActiveFile) -> Result<PathBuf, RotatorError> {
        let ActiveFile { mut file, .. } = previous;
        file.flush()
            .and_then(|()| file.sync_all())
            .map_err(|err| self.rotation_error(RotationStage::Closing, err))?;
        drop(file);

        let timestamp = Utc::now().timestamp_millis();
        if !ARCHIVE_TIMESTAMP_RANGE.contains(&timestamp) {
            warn!(
                timestamp,
                "archive timestamp is not 13 digits wide, archive names no longer sort by age"
            );
        }
        let archive_path = self.archive_path(timestamp);
        let active_path = self.file_path(0);

        let source = File::open(&active_path).map_err(|err| self.rotation_error(RotationStage::Compressing, err))?;
        let source_len = source
            .metadata()
            .map_err(|err| self.rotation_error(RotationStage::Compressing, err))?
            .len();

        let archive_file =
            File::create(&archive_path).map_err(|err| self.rotation_error(RotationStage::CreatingArchive, err))?;
        let copied = match self.write_archive(archive_file, &archive_path, source, source_len) {
            Ok(copied) => copied,
            Err(err) => {
                if let Err(error) = fs::remove_file(&archive_path) {
                    warn!(archive = %archive_path.display(), %error, "failed to remove incomplete archive");
                }
                return Err(err);
            }
        };

        info!(
            source = %active_path.display(),
            archive = %archive_path.display(),
            bytes = copied,
            "archived active file"
        );
        Ok(archive_path)
    }

    /// Fill `archive_file` with a single entry holding everything `source`
    /// yields, then finalize it and sync it to disk.
    fn write_archive(
        &self,
        archive_file: File,
        archive_path: &Path,
        source: File,
        source_len: u64,
    ) -> Result<u64, RotatorError> {
        self.apply_file_mode(archive_path)
            .map_err(|err| self.rotation_error(RotationStage::CreatingArchive, err))?;

        let mut options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .large_file(source_len >= ZIP64_THRESHOLD);
        if let Some(mode) = self.config.file_mode {
            options = options.unix_permissions(mode);
        }
        let mut archive = ZipWriter::new(io::BufWriter::new(archive_file));
        archive
            .start_file(self.config.name.as_str(), options)
            .map_err(|err| self.rotation_error(RotationStage::CreatingArchive, err))?;

        let copied =
            copy_in_chunks(source, &mut archive).map_err(|err| self.rotation_error(RotationStage::Compressing, err))?;

        let mut writer = archive
            .finish()
            .map_err(|err| self.rotation_error(RotationStage::Finalizing, err))?;
        writer
            .flush()
            .and_then(|()| writer.get_ref().sync_all())
            .map_err(|err| self.rotation_error(RotationStage::Finalizing, err))?;
        Ok(copied)
    }

    /// Create the active file empty.
    fn open_active(&self, stage: RotationStage) -> Result<ActiveFile, RotatorError> {
        let path = self.file_path(0);
        let file = File::create(&path).map_err(|err| self.rotation_error(stage, err))?;
        self.apply_file_mode(&path).map_err(|err| self.rotation_error(stage, err))?;
        Ok(ActiveFile { file, written_bytes: 0 })
    }

    fn rotation_error(&self, stage: RotationStage, error: impl ToString) -> RotatorError {
        RotatorError::RotationFailed {
            path: self.file_path(0),
            stage,
            error: error.to_string(),
        }
    }

    /// Set the permissions for a file based on the configured file mode.
    ///
    /// This only has an effect when a file mode has been configured and the
    /// platform is Unix-like; elsewhere a warning is logged instead.
    fn apply_file_mode(&self, path: &Path) -> io::Result<()> {
        if let Some(mode) = self.config.file_mode {
            #[cfg(unix)]
            fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
            #[cfg(not(unix))]
            warn!(
                mode,
                path = %path.display(),
                "setting file permissions is not supported on non-Unix platforms"
            );
        }
        Ok(())
    }

    /// List every regular file directly inside the directory whose name ends
    /// with [`ARCHIVE_SUFFIX`], sorted by file name.
    ///
    /// Files from other sources are included as long as they carry the
    /// suffix. The active file is never listed, even when its name carries
    /// the suffix too.
    pub fn archives(&self) -> io::Result<Vec<PathBuf>> {
        let mut failures = Vec::new();
        let archives = self.select_archives(read_entries(&self.config.directory)?, &mut failures);
        match failures.into_iter().next() {
            Some(failure) => Err(failure.error),
            None => Ok(archives),
        }
    }

    /// Keep the archive candidates among `entries` (path, is regular file),
    /// sorted by file name. Unreadable entries end up in `failures`.
    fn select_archives<I>(&self, entries: I, failures: &mut Vec<RetentionError>) -> Vec<PathBuf>
    where
        I: IntoIterator<Item = io::Result<(PathBuf, bool)>>,
    {
        let active_name = OsStr::new(&self.config.name);
        let mut archives = Vec::new();
        for entry in entries {
            let (path, is_file) = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(
                        directory = %self.config.directory.display(),
                        %error,
                        "failed to read directory entry"
                    );
                    failures.push(RetentionError {
                        path: self.config.directory.clone(),
                        error,
                    });
                    continue;
                }
            };
            let Some(file_name) = path.file_name() else {
                continue;
            };
            if !is_file || file_name == active_name {
                continue;
            }
            if file_name.to_str().is_some_and(|name| name.ends_with(ARCHIVE_SUFFIX)) {
                archives.push(path);
            }
        }

        archives.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        archives
    }

    /// Delete the oldest archives until fewer than `keep_files` remain.
    ///
    /// Age is taken from the file name: archives written by this rotator
    /// share the `<name>-` prefix and a 13-digit millisecond timestamp, so
    /// lexicographic order is creation order. That holds until the year
    /// 2286 and is not true for foreign `.zip` files in the directory, which
    /// are still counted and evicted by name.
    ///
    /// Failures are logged and collected in the report rather than returned,
    /// and a file that could not be deleted is not retried, so the bound is
    /// best effort.
    pub fn sweep(&self) -> RetentionReport {
        let mut report = RetentionReport::default();
        let entries = match read_entries(&self.config.directory) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    directory = %self.config.directory.display(),
                    %error,
                    "failed to list archives for retention"
                );
                report.failures.push(RetentionError {
                    path: self.config.directory.clone(),
                    error,
                });
                return report;
            }
        };
        let archives = self.select_archives(entries, &mut report.failures);

        let excess = (archives.len() + 1).saturating_sub(self.keep_files);
        for path in archives.into_iter().take(excess) {
            match (self.remove_archive)(path.clone()) {
                Ok(()) => {
                    info!(archive = %path.display(), "removed old archive");
                    report.removed.push(path);
                }
                Err(error) => {
                    warn!(archive = %path.display(), %error, "failed to remove old archive");
                    report.failures.push(RetentionError { path, error });
                }
            }
        }
        report
    }
}

/// Iterate over the entries of `directory` as (path, is regular file).
fn read_entries(directory: &Path) -> io::Result<impl Iterator<Item = io::Result<(PathBuf, bool)>>> {
    Ok(fs::read_dir(directory)?.map(|entry| {
        entry.map(|entry| {
            let is_file = entry.file_type().is_ok_and(|file_type| file_type.is_file());
            (entry.path(), is_file)
        })
    }))
}

/// Copy everything `reader` yields into `writer`, one fixed-size chunk at a
/// time.
/// # Returns
/// The number of bytes copied.
fn copy_in_chunks<R: Read, W: io::Write>(mut reader: R, writer: &mut W) -> io::Result<u64> {
    let mut chunk = vec![0u8; ARCHIVE_CHUNK_SIZE];
    let mut copied = 0u64;
    loop {
        let read = match reader.read(&mut chunk) {
            Ok(0) => return Ok(copied),
            Ok(read) => read,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        };
        writer.write_all(&chunk[..read])?;
        copied += read as u64;
    }
}

/// Provides a fluent interface for configuring FileRotator instances.
///
/// # Default Configuration
///
/// If not explicitly configured, the rotator uses these defaults:
/// * Rotate once the active file reaches 10 MiB
/// * Keep 7 files (the active file and 6 archives)
/// * Standard file permissions
///
/// # Examples
///
/// ```no_run
/// use ziproller::{FileRotatorBuilder, RotationSize};
///
/// let rotator = FileRotatorBuilder::new("./logs", "app.log")
///     .rotation_size(RotationSize::KB(256))
///     .keep_files(3)
///     .file_mode(0o640)
///     .build()
///     .unwrap();
/// ```
pub struct FileRotatorBuilder {
    config: RotatorConfig,
}

impl FileRotatorBuilder {
    /// Create a new rotator builder.
    /// # Arguments
    /// * `directory` - The directory where the active file and archives are stored.
    /// * `name` - The name of the active file.
    pub fn new<P: AsRef<Path>>(directory: P, name: &str) -> Self {
        FileRotatorBuilder {
            config: RotatorConfig::new(directory, name),
        }
    }

    /// Set the size at which the active file is rotated.
    pub fn rotation_size(self, size: RotationSize) -> Self {
        Self {
            config: RotatorConfig {
                rotate_every_bytes: Some(size.bytes()),
                ..self.config
            },
        }
    }

    /// Set the number of files to keep.
    pub fn keep_files(self, keep_files: usize) -> Self {
        Self {
            config: RotatorConfig {
                keep_files: Some(keep_files),
                ..self.config
            },
        }
    }

    /// Set the file permissions for the active file and archives (Unix-like
    /// systems only), e.g. 0o644 for rw-r--r--.
    pub fn file_mode(self, mode: u32) -> Self {
        Self {
            config: RotatorConfig {
                file_mode: Some(mode),
                ..self.config
            },
        }
    }

    /// Build the rotator.
    pub fn build(self) -> Result<FileRotator, RotatorError> {
        FileRotator::new(self.config)
    }
}

#[allow(clippy::io_other_error)]
impl io::Write for FileRotator {
    /// Write `buf` as-is, without appending a newline; callers such as a
    /// `tracing` formatter already terminate their records.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_record(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.active.as_mut() {
            Some(active) => active.file.flush(),
            None => Ok(()),
        }
    }
}
