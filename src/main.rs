use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;

use peticao::llm::DEFAULT_MODEL;
use peticao::models::{format_brl, parse_brl};
use peticao::{
    compose, create_router, describe_failure, normalize, plan, read_intake_file, write_petition,
    AppState, ComposerConfig, GeminiClient, GeminiConfig, NormalizeConfig, PetitionPipeline,
    PipelineConfig, ResponseBody, ResponseConfig, ValidationPolicy,
};

#[derive(Parser)]
#[command(name = "peticao")]
#[command(author, version, about = "Petition generation for consumer disputes with electric utilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the generate-petition HTTP API
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value = "10000")]
        port: u16,

        #[command(flatten)]
        pipeline: PipelineArgs,

        #[command(flatten)]
        provider: ProviderArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the prompt that would be sent to the provider (no API call)
    Compose {
        /// Intake form file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        pipeline: PipelineArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate a petition from an intake form file
    Generate {
        /// Intake form file (JSON)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file for the petition text (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        pipeline: PipelineArgs,

        #[command(flatten)]
        provider: ProviderArgs,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// How much of the form must be filled: lenient, non-empty or strict
    #[arg(long, env = "VALIDATION_POLICY", default_value = "non-empty")]
    validation_policy: ValidationPolicy,

    /// Moral damage amount assumed in the claim value when left to the judge
    #[arg(long, env = "ARBITRATION_CEILING", default_value = "R$ 10.000,00", value_parser = parse_amount)]
    arbitration_ceiling: Decimal,

    /// Include upstream provider messages in error responses
    #[arg(long, env = "EXPOSE_PROVIDER_DETAILS", default_value_t = true, action = clap::ArgAction::Set)]
    expose_provider_details: bool,
}

#[derive(Args)]
struct ProviderArgs {
    /// Generative provider API key
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long, env = "MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// Sampling temperature (provider default if omitted)
    #[arg(long)]
    temperature: Option<f64>,

    /// Maximum tokens in the generated petition
    #[arg(long)]
    max_output_tokens: Option<u32>,

    /// Provider request timeout in seconds
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value = "120")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            pipeline,
            provider,
            verbose,
        } => {
            setup_logging(verbose);
            serve(port, pipeline, provider).await
        }
        Commands::Compose {
            input,
            pipeline,
            verbose,
        } => {
            setup_logging(verbose);
            compose_prompt(input, pipeline)
        }
        Commands::Generate {
            input,
            output,
            pipeline,
            provider,
            verbose,
        } => {
            setup_logging(verbose);
            generate_petition(input, output, pipeline, provider).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("peticao={},tower_http={}", level, level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn parse_amount(s: &str) -> Result<Decimal, String> {
    parse_brl(s).ok_or_else(|| format!("invalid amount '{}'", s))
}

fn pipeline_config(args: &PipelineArgs) -> PipelineConfig {
    PipelineConfig {
        normalize: NormalizeConfig {
            policy: args.validation_policy,
        },
        composer: ComposerConfig {
            arbitration_ceiling: args.arbitration_ceiling,
        },
        response: ResponseConfig {
            expose_provider_details: args.expose_provider_details,
        },
    }
}

fn build_client(args: ProviderArgs) -> Result<GeminiClient> {
    let config = GeminiConfig {
        api_key: args.api_key.filter(|key| !key.trim().is_empty()),
        model: args.model,
        temperature: args.temperature,
        max_output_tokens: args.max_output_tokens,
        timeout: Duration::from_secs(args.timeout_secs),
        ..Default::default()
    };
    info!("Provider model: {}", config.model);
    GeminiClient::new(config).context("Failed to initialize provider client")
}

async fn serve(port: u16, pipeline: PipelineArgs, provider: ProviderArgs) -> Result<()> {
    let config = pipeline_config(&pipeline);
    info!(
        "Validation policy {:?}, arbitration ceiling {}",
        config.normalize.policy,
        format_brl(config.composer.arbitration_ceiling)
    );

    let client = build_client(provider)?;
    let pipeline = PetitionPipeline::new(Arc::new(client), config);
    let app = create_router(AppState {
        pipeline: Arc::new(pipeline),
    });

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn compose_prompt(input: PathBuf, pipeline: PipelineArgs) -> Result<()> {
    info!("Loading intake form from {:?}", input);
    let raw = read_intake_file(&input).context("Failed to read intake form")?;
    let config = pipeline_config(&pipeline);

    let case = normalize(raw.as_ref(), &config.normalize)?;
    let plan = plan(&case);
    debug!("Normalized case: {}", serde_json::to_string_pretty(&case)?);
    info!(
        "Problem type: {}, planned sections: {}",
        case.problem_label,
        serde_json::to_string(&plan)?
    );

    let prompt = compose(&case, &plan, &config.composer);
    write_petition(prompt.as_str(), None)
}

async fn generate_petition(
    input: PathBuf,
    output: Option<PathBuf>,
    pipeline: PipelineArgs,
    provider: ProviderArgs,
) -> Result<()> {
    info!("Loading intake form from {:?}", input);
    let raw = read_intake_file(&input).context("Failed to read intake form")?;

    let client = build_client(provider)?;
    let pipeline = PetitionPipeline::new(Arc::new(client), pipeline_config(&pipeline));

    let result = pipeline.handle(raw.as_ref()).await;
    if let Some(failure) = describe_failure(&result) {
        error!("{}", failure);
        anyhow::bail!("Petition generation failed");
    }

    if let ResponseBody::Success { text } = &result.body {
        write_petition(text, output.as_deref())?;
        if let Some(path) = output {
            info!("Petition written to {:?}", path);
        }
    }

    Ok(())
}
