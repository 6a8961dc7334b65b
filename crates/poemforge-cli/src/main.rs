use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use poemforge_core::config_file::{self, ConfigFile};
use poemforge_core::{OpenAiGenerator, compose_poem};
use poemforge_parsing::{ParsingConfigBuilder, Segmenter};
use poemforge_training::{ProgressEvent, TrainingOptions};

mod output;

use output::ColorMode;

/// poemforge - Rebuild poems from scanned-book text and build fine-tuning data
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse form-feed delimited extracted text into a JSON list of poems
    Parse {
        /// Extracted text file (pages separated by form feeds)
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep the closing date of each poem as a `date` field
        #[arg(long)]
        include_dates: bool,

        /// Headers with more words than this are treated as verse
        #[arg(long)]
        header_word_threshold: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Generate prompt variants for each poem and write train/validation JSONL
    BuildTraining {
        /// JSON array of {title, content} records
        poems: PathBuf,

        /// Training JSONL output path
        #[arg(long)]
        training_file: Option<PathBuf>,

        /// Validation JSONL output path
        #[arg(long)]
        validation_file: Option<PathBuf>,

        /// Prompt variants generated per poem
        #[arg(long)]
        prompts_per_poem: Option<usize>,

        /// Fraction of examples held out for validation
        #[arg(long)]
        validation_ratio: Option<f64>,

        /// Seed for temperature choice, prompt choice and shuffling
        #[arg(long)]
        seed: Option<u64>,

        /// Pause between generation requests, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Model used to synthesize prompts
        #[arg(long)]
        model: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Generate a single poem from a prompt with the fine-tuned model
    Generate {
        /// What the poem should be about
        prompt: String,

        /// Model id (defaults to MODEL_ID)
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_level = match cli.command {
        Command::Parse { .. } => "warn",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = config_file::load_config();

    match cli.command {
        Command::Parse {
            input,
            output,
            include_dates,
            header_word_threshold,
            no_color,
        } => parse(
            &config,
            &input,
            output,
            include_dates,
            header_word_threshold,
            no_color,
        ),
        Command::BuildTraining {
            poems,
            training_file,
            validation_file,
            prompts_per_poem,
            validation_ratio,
            seed,
            delay_ms,
            model,
            no_color,
        } => {
            let training = config.training();
            let options = TrainingOptions {
                prompts_per_poem: prompts_per_poem
                    .or(training.prompts_per_poem)
                    .unwrap_or(poemforge_training::DEFAULT_PROMPTS_PER_POEM),
                validation_ratio: validation_ratio
                    .or(training.validation_ratio)
                    .unwrap_or(poemforge_training::DEFAULT_VALIDATION_RATIO),
                delay: Duration::from_millis(delay_ms.or(training.delay_ms).unwrap_or(1000)),
            };
            let training_file = training_file
                .or_else(|| training.training_file.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("training_data.jsonl"));
            let validation_file = validation_file
                .or_else(|| training.validation_file.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("validation_data.jsonl"));
            let model = model
                .or_else(|| config.openai_model().map(String::from))
                .unwrap_or_else(|| poemforge_training::DEFAULT_PROMPT_MODEL.to_string());

            build_training(
                &config,
                &poems,
                &training_file,
                &validation_file,
                options,
                seed,
                model,
                no_color,
            )
            .await
        }
        Command::Generate { prompt, model } => {
            let model = model
                .or_else(|| std::env::var("MODEL_ID").ok())
                .or_else(|| config.fine_tuned_model().map(String::from))
                .ok_or_else(|| anyhow::anyhow!("No model given: pass --model or set MODEL_ID"))?;
            let generator = OpenAiGenerator::from_env_or_config(&config, model)?;
            let poem = compose_poem(&generator, &prompt).await?;
            println!("{}", poem);
            Ok(())
        }
    }
}

fn parse(
    config: &ConfigFile,
    input: &Path,
    output: Option<PathBuf>,
    include_dates: bool,
    header_word_threshold: Option<usize>,
    no_color: bool,
) -> anyhow::Result<()> {
    if !input.exists() {
        anyhow::bail!("File not found: {}", input.display());
    }

    let threshold = header_word_threshold.or(config.header_word_threshold());
    let mut builder = ParsingConfigBuilder::new();
    if let Some(n) = threshold {
        builder = builder.header_word_threshold(n);
    }
    let segmenter = Segmenter::with_config(builder.build()?);

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let outcome = segmenter.parse(&text);
    tracing::info!(
        input = %input.display(),
        poems = outcome.poems.len(),
        pages = outcome.pages,
        "parsed extracted text"
    );

    let json = poemforge_parsing::poems_to_json(&outcome.poems, include_dates)?;
    match output {
        Some(ref path) => std::fs::write(path, &json)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }

    let source = input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| input.display().to_string());
    let color = ColorMode(!no_color);
    let mut stderr = std::io::stderr();
    output::print_parse_summary(&mut stderr, &source, &outcome, color)?;
    if let Some(path) = output {
        writeln!(stderr, "Parsed poems have been saved to '{}'.", path.display())?;
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn build_training(
    config: &ConfigFile,
    poems_path: &Path,
    training_file: &Path,
    validation_file: &Path,
    options: TrainingOptions,
    seed: Option<u64>,
    model: String,
    no_color: bool,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let poems = poemforge_training::load_poems(poems_path)
        .with_context(|| format!("Failed to load poems from {}", poems_path.display()))?;
    if poems.is_empty() {
        anyhow::bail!("No poems found in {}", poems_path.display());
    }

    let generator = OpenAiGenerator::from_env_or_config(config, model)?;
    tracing::info!(model = generator.model(), poems = poems.len(), "building training data");
    let mut rng = match seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };

    let bar = ProgressBar::new((poems.len() * options.prompts_per_poem) as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len} (eta {eta})",
        )?
        .progress_chars("=> "),
    );
    bar.enable_steady_tick(Duration::from_millis(120));

    let progress = |event: ProgressEvent| match event {
        ProgressEvent::PromptGenerated {
            title,
            variant,
            variants,
        } => {
            bar.set_message(format!("{} ({}/{})", title, variant, variants));
            bar.inc(1);
        }
        ProgressEvent::PoemDone { index, total, title } => {
            bar.println(format!("Processed poem {}/{}: {}", index, total, title));
        }
    };

    let result =
        poemforge_training::build_dataset(&generator, &poems, &options, &mut rng, &progress).await;
    bar.finish_and_clear();
    let dataset = result?;

    poemforge_training::write_jsonl(training_file, &dataset.training)?;
    poemforge_training::write_jsonl(validation_file, &dataset.validation)?;
    tracing::info!(
        training = dataset.training.len(),
        validation = dataset.validation.len(),
        "wrote fine-tuning files"
    );

    let mut stdout = std::io::stdout();
    output::print_dataset_summary(
        &mut stdout,
        &dataset,
        training_file,
        validation_file,
        ColorMode(!no_color),
    )?;
    Ok(())
}
