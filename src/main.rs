use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use transcript_enrich::cli::{Cli, Commands, ConfigAction};
use transcript_enrich::config::{Config, parse_language_list};
use transcript_enrich::{
    Dictionary, Document, EchoEnrichmentClient, EnrichmentClient, HttpEnrichmentClient,
    MediaSource, OutputMode, Pipeline, load_transcript, logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    tracing::debug!(version = %transcript_enrich::version_string(), "starting");

    match &cli.command {
        Commands::Annotate {
            transcript,
            media,
            media_type,
            output,
        } => {
            let pipeline = build_pipeline(&cli)?;
            let mode = OutputMode::Annotated {
                media: MediaSource::new(media, media_type),
            };
            let document = run(&pipeline, transcript, &mode).await?;
            if let Document::Annotated(html) = document {
                match output {
                    Some(path) => write_file(path, &html)?,
                    None => print!("{}", html),
                }
            }
        }
        Commands::Captions {
            transcript,
            languages,
            output_dir,
        } => {
            let pipeline = build_pipeline(&cli)?;
            let target_languages = match languages {
                Some(list) => parse_language_list(list),
                None => pipeline.config().captions.target_languages.clone(),
            };
            let mode = OutputMode::Captions { target_languages };
            let document = run(&pipeline, transcript, &mode).await?;

            let dir = match output_dir {
                Some(dir) => dir.clone(),
                None => transcript
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_default(),
            };
            let stem = transcript
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "transcript".to_string());
            for (name, contents) in document.files(&stem) {
                write_file(&dir.join(name), contents)?;
            }
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "transcript-enrich",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

/// Load configuration from the given path or the default location.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // Load from custom path
        Config::load(path).with_context(|| format!("loading config {}", path.display()))?
    } else {
        // Try default path, fall back to defaults
        let default_path = Config::default_path();
        Config::load_or_default(&default_path)?
    };

    // Apply environment variable overrides
    Ok(config.with_env_overrides())
}

/// Resolve config, dictionary and enrichment client from the command line.
fn build_pipeline(cli: &Cli) -> Result<Pipeline> {
    let mut config = load_config(cli.config.as_deref())?;
    if let Some(endpoint) = &cli.endpoint {
        config.service.endpoint = Some(endpoint.clone());
    }
    if let Some(concurrency) = cli.concurrency {
        config.dispatch.entity_concurrency = concurrency;
        config.dispatch.translation_concurrency = concurrency;
    }
    if let Some(timeout) = cli.timeout {
        config.dispatch.call_timeout_ms = timeout;
    }
    config.validate()?;

    let dictionary = match &cli.dictionary {
        Some(path) => Dictionary::from_file(path)?,
        None => Dictionary::new(),
    };

    let client: Arc<dyn EnrichmentClient> = if cli.offline {
        Arc::new(EchoEnrichmentClient)
    } else {
        match &config.service.endpoint {
            Some(endpoint) => Arc::new(HttpEnrichmentClient::new(endpoint)),
            None => bail!(
                "No enrichment endpoint configured. Pass --endpoint, set TRANSCRIPT_ENRICH_ENDPOINT, or use --offline"
            ),
        }
    };
    tracing::debug!(
        client = client.name(),
        dictionary_entries = dictionary.len(),
        "pipeline ready"
    );

    Ok(Pipeline::new(config, dictionary, client))
}

async fn run(pipeline: &Pipeline, transcript: &Path, mode: &OutputMode) -> Result<Document> {
    let transcript = load_transcript(transcript)?;
    let output = pipeline.run(&transcript, mode).await?;
    if output.summary.dispatch.failed > 0 {
        tracing::warn!(
            failed = output.summary.dispatch.failed,
            "some enrichment calls failed; output is partial"
        );
    }
    Ok(output.document)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote output");
    Ok(())
}

/// Handle config subcommands.
fn handle_config_command(action: &ConfigAction, config_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path: PathBuf = config_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_path);
            println!("{}", path.display());
        }
    }
    Ok(())
}
