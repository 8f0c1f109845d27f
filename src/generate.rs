//! Generation run: source image → `AppIcon.appiconset.zip`.
//!
//! A run is strictly sequential:
//!
//! ```text
//! validate input → resolve targets → decode once
//!     → for each target: render (through the cache), record manifest entry
//!     → Contents.json → optional solid image stack → archive
//! ```
//!
//! ## Failure handling
//!
//! | Condition | Outcome |
//! |---|---|
//! | Another run in progress | [`GenerateError::RunInProgress`], nothing touched |
//! | Nothing selected | [`GenerateError::NothingSelected`] before any decode |
//! | Source can't be decoded | [`GenerateError::Unreadable`] before any render |
//! | Archive write fails | [`GenerateError::Archive`]; rendered buffers are dropped |
//! | Solid image stack fails | [`Advisory::StackFailed`]; the run still succeeds |
//!
//! Every outcome is followed by a fire-and-forget [`Telemetry`] notification
//! whose own failures are logged and swallowed.
//!
//! ## Events
//!
//! Progress is streamed through an optional `mpsc::Sender<RunEvent>` so the
//! CLI can print while the run proceeds. The run never blocks on the receiver.

use crate::archive::{ArchiveError, ArchiveFolder, ArchiveLayout, ArchiveWriter, ZipArchiver};
use crate::cache::{CacheStats, PreviewRegistry, RenderCache};
use crate::catalog::{ICON_DEFINITIONS, Idiom};
use crate::config::AppConfig;
use crate::imaging::{
    BackendError, DecodeStrategy, Dimensions, FitMode, RasterBackend, RustBackend, rasterize_size,
};
use crate::input::{InputError, SourceInput};
use crate::manifest::{Contents, MANIFEST_FILENAME};
use crate::stack::{StackConfig, StackContents, generate_stack};
use crate::targets::{PixelSize, Platform, PlatformSelection, resolve_targets};
use log::{debug, info, warn};
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use thiserror::Error;

pub const ICONSET_FOLDER: &str = "AppIcon.appiconset";
pub const DEFAULT_ARCHIVE_NAME: &str = "AppIcon.appiconset.zip";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("A generation run is already in progress.")]
    RunInProgress,
    #[error("No platforms selected.")]
    NothingSelected,
    #[error("Could not read the image. Try a different file. ({0})")]
    Unreadable(#[source] BackendError),
    #[error("Rendering {filename} failed: {source}")]
    Render {
        filename: String,
        #[source]
        source: BackendError,
    },
    #[error("JSON error: {0}")]
    Manifest(#[from] serde_json::Error),
    #[error("Failed to create ZIP: {0}")]
    Archive(#[from] ArchiveError),
}

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    pub selection: PlatformSelection,
    pub fit: FitMode,
    /// Also emit `AppIcon.solidimagestack`. Only honored when vision is selected.
    pub vision_stack: bool,
    pub stack: StackConfig,
}

impl GenerateOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            selection: config.platforms,
            fit: config.fit,
            vision_stack: config.vision_stack.enabled,
            stack: StackConfig::default(),
        }
    }

    fn wants_stack(&self) -> bool {
        self.vision_stack && self.selection.vision
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Non-fatal notes surfaced alongside a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    AnimatedFirstFrame,
    /// The source was smaller than at least one target.
    Upscaled {
        source: Dimensions,
        largest: PixelSize,
    },
    StackFailed(String),
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::AnimatedFirstFrame => {
                f.write_str("Animated GIF detected — only the first frame will be used.")
            }
            Advisory::Upscaled { source, largest } => write!(
                f,
                "Note: some images are being upscaled (source {}×{}, largest target {}). Results may be blurry.",
                source.width, source.height, largest
            ),
            Advisory::StackFailed(reason) => write!(
                f,
                "Failed to generate solid image stack (optional): {reason}"
            ),
        }
    }
}

/// Progress notifications, in run order.
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    Started {
        targets: usize,
    },
    Decoded {
        width: u32,
        height: u32,
        strategy: DecodeStrategy,
    },
    Rendered {
        idiom: Idiom,
        filename: String,
        size: PixelSize,
        preview: String,
        reused: bool,
    },
    Advisory(Advisory),
    StackIncluded {
        files: usize,
    },
    Archiving,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct GenerateOutput {
    /// Archive blob, ready to write to disk.
    pub archive: Vec<u8>,
    pub manifest: Contents,
    /// `folder/file` paths inside the archive.
    pub files: Vec<String>,
    pub stats: CacheStats,
    pub stack: Option<StackContents>,
    pub advisories: Vec<Advisory>,
}

// =============================================================================
// Telemetry
// =============================================================================

#[derive(Error, Debug)]
#[error("telemetry unavailable: {0}")]
pub struct TelemetryError(pub String);

/// What a run was asked to do; sent with every telemetry notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub platforms: Vec<Platform>,
    pub vision_stack: bool,
    pub fit: FitMode,
}

impl RunSummary {
    fn from_options(options: &GenerateOptions) -> Self {
        Self {
            platforms: options.selection.enabled(),
            vision_stack: options.vision_stack,
            fit: options.fit,
        }
    }

    fn platform_names(&self) -> String {
        self.platforms
            .iter()
            .map(|p| p.os_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Side channel notified after every run. Must not be relied on.
pub trait Telemetry {
    fn success(&self, summary: &RunSummary) -> Result<(), TelemetryError>;
    fn failure(&self, summary: &RunSummary) -> Result<(), TelemetryError>;
}

/// Telemetry that only writes log records.
#[derive(Debug, Default)]
pub struct LogTelemetry;

impl Telemetry for LogTelemetry {
    fn success(&self, summary: &RunSummary) -> Result<(), TelemetryError> {
        info!(
            "generate_zip platforms={} vision_stack={} crop_mode={}",
            summary.platform_names(),
            summary.vision_stack,
            summary.fit
        );
        Ok(())
    }

    fn failure(&self, summary: &RunSummary) -> Result<(), TelemetryError> {
        info!(
            "generate_zip_failed vision_stack={} crop_mode={}",
            summary.vision_stack, summary.fit
        );
        Ok(())
    }
}

/// Run a telemetry call, absorbing errors and panics.
fn notify(call: impl FnOnce() -> Result<(), TelemetryError>) {
    match catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => debug!("telemetry event dropped: {e}"),
        Err(_) => debug!("telemetry event dropped: sink panicked"),
    }
}

// =============================================================================
// Generator
// =============================================================================

/// Held for the duration of a run; releases the run flag on drop.
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunGuard(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn emit(events: &Option<Sender<RunEvent>>, event: RunEvent) {
    if let Some(tx) = events {
        // A closed receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

/// Runs generations with a given backend, archive writer and telemetry sink.
pub struct Generator<B, A, T> {
    backend: B,
    archiver: A,
    telemetry: T,
    previews: PreviewRegistry,
    running: AtomicBool,
}

impl Generator<RustBackend, ZipArchiver, LogTelemetry> {
    /// Production wiring: `image` crate backend, zip archive, log telemetry.
    pub fn standard() -> Self {
        Self::new(RustBackend::new(), ZipArchiver::new(), LogTelemetry)
    }
}

impl<B, A, T> Generator<B, A, T>
where
    B: RasterBackend,
    A: ArchiveWriter,
    T: Telemetry,
{
    pub fn new(backend: B, archiver: A, telemetry: T) -> Self {
        Self {
            backend,
            archiver,
            telemetry,
            previews: PreviewRegistry::new(),
            running: AtomicBool::new(false),
        }
    }

    /// Registry that issued this generator's preview handles.
    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Execute one run. Rejected with [`GenerateError::RunInProgress`] if
    /// another run on this generator has not finished.
    pub fn run(
        &self,
        input: &SourceInput,
        options: &GenerateOptions,
        events: Option<Sender<RunEvent>>,
    ) -> Result<GenerateOutput, GenerateError> {
        let _guard = RunGuard::acquire(&self.running).ok_or(GenerateError::RunInProgress)?;
        let summary = RunSummary::from_options(options);

        let result = self.run_pipeline(input, options, &events);
        match &result {
            Ok(output) => {
                info!(
                    "generated {} files from {} ({})",
                    output.files.len(),
                    input.name,
                    output.stats
                );
                notify(|| self.telemetry.success(&summary));
            }
            Err(e) => {
                warn!("generation from {} failed: {e}", input.name);
                notify(|| self.telemetry.failure(&summary));
            }
        }
        result
    }

    fn run_pipeline(
        &self,
        input: &SourceInput,
        options: &GenerateOptions,
        events: &Option<Sender<RunEvent>>,
    ) -> Result<GenerateOutput, GenerateError> {
        let mut advisories = Vec::new();
        if input.may_be_animated() {
            advisories.push(Advisory::AnimatedFirstFrame);
            emit(events, RunEvent::Advisory(Advisory::AnimatedFirstFrame));
        }

        let targets = resolve_targets(ICON_DEFINITIONS, &options.selection);
        if targets.is_empty() {
            return Err(GenerateError::NothingSelected);
        }
        emit(
            events,
            RunEvent::Started {
                targets: targets.len(),
            },
        );

        let source = self
            .backend
            .decode(&input.bytes, input.format_hint())
            .map_err(GenerateError::Unreadable)?;
        let source_dims = source.dimensions();
        debug!(
            "decoded {} as {}x{} ({})",
            input.name, source_dims.width, source_dims.height, source.strategy
        );
        emit(
            events,
            RunEvent::Decoded {
                width: source_dims.width,
                height: source_dims.height,
                strategy: source.strategy,
            },
        );

        let mut cache = RenderCache::new(self.previews.clone());
        let mut contents = Contents::new();
        let mut iconset = ArchiveFolder::new(ICONSET_FOLDER);
        let mut largest_upscale: Option<PixelSize> = None;

        for target in &targets {
            let size = target.pixel_size();
            let filename = target.filename();

            let (asset, reused) = cache
                .get_or_render(size, || {
                    let out = rasterize_size(&self.backend, &source, size, options.fit)?;
                    if out.upscaled {
                        largest_upscale = largest_upscale.max(Some(out.size));
                    }
                    Ok::<_, BackendError>(out.png)
                })
                .map_err(|err| GenerateError::Render {
                    filename: filename.clone(),
                    source: err,
                })?;

            // Idioms sharing a slot name (e.g. iphone and ipad 20x20@2x) also
            // share pixel size, so the first copy serves both entries.
            iconset.add(filename.clone(), asset.png.clone());
            contents.push(target);

            emit(
                events,
                RunEvent::Rendered {
                    idiom: target.idiom,
                    filename,
                    size,
                    preview: asset.preview.uri(),
                    reused,
                },
            );
        }

        if let Some(largest) = largest_upscale {
            let advisory = Advisory::Upscaled {
                source: source_dims,
                largest,
            };
            emit(events, RunEvent::Advisory(advisory.clone()));
            advisories.push(advisory);
        }

        iconset.add(MANIFEST_FILENAME, contents.to_json_bytes()?);
        let mut layout = ArchiveLayout {
            folders: vec![iconset],
        };

        let mut stack_contents = None;
        if options.wants_stack() {
            match generate_stack(&self.backend, &source, options.stack) {
                Ok(stack) => {
                    emit(
                        events,
                        RunEvent::StackIncluded {
                            files: stack.folder.files.len(),
                        },
                    );
                    layout.folders.push(stack.folder);
                    stack_contents = Some(stack.contents);
                }
                Err(e) => {
                    warn!("solid image stack skipped: {e}");
                    let advisory = Advisory::StackFailed(e.to_string());
                    emit(events, RunEvent::Advisory(advisory.clone()));
                    advisories.push(advisory);
                }
            }
        } else if options.vision_stack {
            debug!("solid image stack requested without visionOS selected; skipping");
        }

        emit(events, RunEvent::Archiving);
        let archive = self.archiver.write(&layout)?;

        Ok(GenerateOutput {
            archive,
            manifest: contents,
            files: layout.paths(),
            stats: cache.stats(),
            stack: stack_contents,
            advisories,
        })
    }
}
