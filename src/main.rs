use assetic::catalog::ICON_DEFINITIONS;
use assetic::config::{self, AppConfig};
use assetic::generate::{GenerateOptions, Generator};
use assetic::imaging::FitMode;
use assetic::input::SourceInput;
use assetic::output;
use assetic::targets::{Platform, PlatformSelection, resolve_targets};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Shared flags for commands that resolve targets.
#[derive(clap::Args, Clone)]
struct SelectionArgs {
    /// Platform to include (repeatable); replaces [platforms] from the config
    #[arg(long = "platform", value_enum)]
    platforms: Vec<Platform>,

    /// Config file [default: ./assetic.toml]
    #[arg(long)]
    config: Option<PathBuf>,
}

impl SelectionArgs {
    fn load_config(&self) -> Result<AppConfig, config::ConfigError> {
        match &self.config {
            Some(path) => config::load_config_file(path),
            None => config::load_config(Path::new(".")),
        }
    }

    fn apply(&self, selection: &mut PlatformSelection) {
        if !self.platforms.is_empty() {
            *selection = PlatformSelection::only(&self.platforms);
        }
    }
}

fn version_string() -> &'static str {
    let on_tag = env!("ASSETIC_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("ASSETIC_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "assetic")]
#[command(about = "Generate an app-icon asset catalog from a single image")]
#[command(long_about = "\
Generate an app-icon asset catalog from a single image

One source picture in, one AppIcon.appiconset.zip out. Every icon slot the
selected platforms need is rendered, named and listed in Contents.json,
ready to drop into an asset catalog.

Archive layout:

  AppIcon.appiconset/
  ├── AppIcon-20x20@2x.png
  ├── AppIcon-83.5x83.5@2x.png
  ├── ...
  └── Contents.json
  AppIcon.solidimagestack/         # --vision-stack with --platform vision
  ├── layer-1@1x.png
  ├── ...
  └── Contents.json

Fit modes:
  cover    scale to fill each icon, cropping the overflow (centered)
  contain  scale to fit each icon, leaving transparent margins

Set RUST_LOG=debug for diagnostics.
Run 'assetic gen-config' to generate a documented assetic.toml.")]
#[command(version = version_string())]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render all icons and write the archive
    Generate {
        /// Source image (PNG, JPEG, GIF, WebP, TIFF, BMP, TGA)
        source: PathBuf,

        /// Archive path [default: from config, else AppIcon.appiconset.zip]
        #[arg(long)]
        output: Option<PathBuf>,

        /// How the source is fitted into each icon
        #[arg(long, value_enum)]
        fit: Option<FitMode>,

        /// Also build the visionOS solid image stack
        #[arg(long)]
        vision_stack: bool,

        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// List the icons that would be generated, without decoding anything
    Targets {
        #[command(flatten)]
        selection: SelectionArgs,
    },
    /// Print a stock assetic.toml with all options documented
    GenConfig,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Generate {
            source,
            output: output_path,
            fit,
            vision_stack,
            selection,
        } => {
            let app_config = selection.load_config()?;
            let mut options = GenerateOptions::from_config(&app_config);
            selection.apply(&mut options.selection);
            if let Some(fit) = fit {
                options.fit = fit;
            }
            options.vision_stack |= vision_stack;
            let archive_path = output_path.unwrap_or_else(|| PathBuf::from(&app_config.output));

            let input = SourceInput::from_path(&source)?;
            let generator = Generator::standard();

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_run_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = generator.run(&input, &options, Some(tx));
            printer
                .join()
                .map_err(|_| "output printer thread panicked")?;
            let generated = result?;

            if let Some(parent) = archive_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&archive_path, &generated.archive)?;
            output::print_generate_summary(&generated, &archive_path);
        }
        Command::Targets { selection } => {
            let app_config = selection.load_config()?;
            let mut platforms = app_config.platforms;
            selection.apply(&mut platforms);
            let targets = resolve_targets(ICON_DEFINITIONS, &platforms);
            output::print_targets(&targets);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
