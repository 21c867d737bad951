mod app;
mod config;
mod input;
mod scene;
mod screening;

use anyhow::{bail, Context, Result};
use app::App;
use chroma_core::{TestType, TrialRecord};
use chroma_diagnosis::HttpDiagnosisClient;
use chroma_plate::{
    encode_png, render_plate, AssetSource, DirectoryAssets, NoAssets, PlateGenerator,
    StimulusResolver,
};
use chroma_session::{
    default_plates, lantern_sequence, load_plates_from_path, select_plates, SessionOutcome,
    TestSession,
};
use chroma_timing::HighPrecisionTimer;
use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use screening::{DiagnosisLink, Screening};
use serde::Deserialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "chromascreen")]
#[command(about = "Ishihara plate and lantern color-vision screening")]
struct Cli {
    /// JSON settings file (session, generator and diagnosis sections)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON plate set replacing the built-in plates
    #[arg(long, global = true)]
    plates: Option<PathBuf>,

    /// Directory that plate image references resolve against
    #[arg(long, global = true)]
    assets: Option<PathBuf>,

    /// Remote diagnosis endpoint for Ishihara sessions
    #[arg(long, global = true, env = "CHROMASCREEN_DIAGNOSIS_URL")]
    diagnosis_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a screening session in a fullscreen window
    Run {
        #[arg(short, long, value_enum, default_value = "ishihara")]
        test: TestArg,

        /// Where the session outcome is written as JSON
        #[arg(short, long, default_value = "chromascreen-results.json")]
        output: PathBuf,
    },
    /// Render a synthetic plate to a PNG file
    Plate {
        /// Digits hidden in the plate
        digits: String,

        #[arg(short, long)]
        output: PathBuf,

        /// Output image side in pixels
        #[arg(short, long, default_value_t = 600)]
        size: u32,

        /// Selects the hue scheme
        #[arg(short, long, default_value_t = 0)]
        index: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
    /// Reclassify a saved outcome or trial log
    Classify {
        input: PathBuf,

        /// Test type of a bare trial log
        #[arg(short, long, value_enum)]
        test: Option<TestArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TestArg {
    Ishihara,
    Lantern,
}

impl From<TestArg> for TestType {
    fn from(arg: TestArg) -> Self {
        match arg {
            TestArg::Ishihara => TestType::Ishihara,
            TestArg::Lantern => TestType::Lantern,
        }
    }
}

/// Files accepted by `classify`.
#[derive(Deserialize)]
#[serde(untagged)]
enum SavedLog {
    Outcome(SessionOutcome),
    Log(Vec<TrialRecord>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chromascreen=info,chroma_session=info,chroma_diagnosis=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load(cli.config.as_deref())?.with_diagnosis_url(cli.diagnosis_url);

    match cli.command {
        Commands::Run { test, output } => {
            run_session(config, test.into(), cli.plates.as_deref(), cli.assets, output)
        }
        Commands::Plate {
            digits,
            output,
            size,
            index,
            seed,
        } => run_plate_command(&config, &digits, &output, size, index, seed),
        Commands::Classify { input, test } => run_classify_command(&input, test.map(Into::into)),
    }
}

fn run_session(
    config: AppConfig,
    test_type: TestType,
    plates_path: Option<&Path>,
    assets_dir: Option<PathBuf>,
    output: PathBuf,
) -> Result<()> {
    let mut rng = rand::rng();

    let session = match test_type {
        TestType::Ishihara => {
            let plates = match plates_path {
                Some(path) => load_plates_from_path(path)?,
                None => default_plates(),
            };
            let picked = select_plates(&plates, config.session.plate_count, &mut rng);
            TestSession::ishihara(picked, &config.session)
        }
        TestType::Lantern => TestSession::lantern(lantern_sequence()),
    };

    let assets: Box<dyn AssetSource> = match assets_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "Using plate images");
            Box::new(DirectoryAssets::new(dir))
        }
        None => Box::new(NoAssets),
    };
    let resolver = StimulusResolver::new(
        assets,
        PlateGenerator::new(config.generator.clone()),
        config.session.plate_area_diameter,
    );

    // lantern verdicts are never sent out
    let runtime = if test_type == TestType::Ishihara && config.diagnosis.is_enabled() {
        Some(
            tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .context("Failed to start diagnosis runtime")?,
        )
    } else {
        None
    };
    let diagnosis = match (&runtime, &config.diagnosis.url) {
        (Some(runtime), Some(url)) => {
            tracing::info!(url = %url, "Remote diagnosis enabled");
            Some(DiagnosisLink {
                handle: runtime.handle().clone(),
                service: Arc::new(HttpDiagnosisClient::new(url.trim())),
                timeout: config.diagnosis.timeout(),
            })
        }
        _ => None,
    };

    let screening = Screening::new(session, HighPrecisionTimer::new(), resolver, rng, diagnosis);
    App::new(screening, output).run()
}

fn run_plate_command(
    config: &AppConfig,
    digits: &str,
    output: &Path,
    size: u32,
    index: usize,
    seed: Option<u64>,
) -> Result<()> {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        tracing::warn!(digits, "Non-digit characters are drawn as rings");
    }
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let generator = PlateGenerator::new(config.generator.clone());
    let plate = generator.generate(digits, size as f32, index, &mut rng);
    let pixmap = render_plate(&plate, size)?;
    let png = encode_png(&pixmap)?;
    std::fs::write(output, png)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    tracing::info!(
        output = %output.display(),
        dots = plate.dot_count(),
        foreground = plate.foreground.len(),
        "Plate written"
    );
    Ok(())
}

fn run_classify_command(input: &Path, test: Option<TestType>) -> Result<()> {
    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let saved: SavedLog = serde_json::from_str(&text)
        .with_context(|| format!("{} is neither an outcome nor a trial log", input.display()))?;

    let (test_type, log) = match saved {
        SavedLog::Outcome(outcome) => (test.unwrap_or(outcome.test_type), outcome.trial_log),
        SavedLog::Log(log) => match test {
            Some(test_type) => (test_type, log),
            None => bail!("--test is required for a bare trial log"),
        },
    };

    let result = chroma_scoring::classify(&log, test_type);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

pub(crate) fn write_outcome(outcome: &SessionOutcome, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), outcome)?;
    tracing::info!(path = %path.display(), "Outcome written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chroma_core::ClassificationSource;

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "chromascreen",
            "run",
            "--test",
            "lantern",
            "--assets",
            "plates",
        ])
        .unwrap();
        assert_eq!(cli.assets, Some(PathBuf::from("plates")));
        assert!(matches!(
            cli.command,
            Commands::Run {
                test: TestArg::Lantern,
                ..
            }
        ));
    }

    #[test]
    fn plate_command_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plate.png");
        run_plate_command(&AppConfig::default(), "29", &out, 128, 2, Some(7)).unwrap();
        let pixmap = tiny_skia::Pixmap::load_png(&out).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (128, 128));
    }

    #[test]
    fn outcome_file_can_be_reclassified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let log = vec![TrialRecord {
            item_id: 1,
            user_response: Some("12".into()),
            correct_response: "12".into(),
            is_correct: true,
            response_time_ms: 1200.0,
        }];
        let outcome = SessionOutcome::local(TestType::Ishihara, log);
        assert_eq!(outcome.source, ClassificationSource::Local);
        write_outcome(&outcome, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let saved: SavedLog = serde_json::from_str(&text).unwrap();
        assert!(matches!(saved, SavedLog::Outcome(o) if o == outcome));
        run_classify_command(&path, None).unwrap();
    }

    #[test]
    fn bare_log_needs_test_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(run_classify_command(&path, None).is_err());
        run_classify_command(&path, Some(TestType::Lantern)).unwrap();
    }
}
