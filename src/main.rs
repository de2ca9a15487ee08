use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use product_api_harness::generators::{
    CreateOptions, ProductFactory, generate_for_create, generate_invalid, generate_product,
};
use product_api_harness::{
    CliArgs, HarnessConfig, LoggingConfig, TestDataCatalog, http_products_api, init_logging,
    run_smoke,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};

#[derive(Parser, Debug)]
#[command(name = "product-harness", about = "Product API test harness", version)]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print generated test data as JSON
    Generate {
        #[arg(value_enum)]
        kind: GenerateKind,

        #[arg(long, default_value_t = 1, help = "Number of items to generate")]
        count: usize,

        #[arg(long, help = "Seed for reproducible output")]
        seed: Option<u64>,

        #[arg(long, help = "Category slug for `create` bodies")]
        category: Option<String>,
    },
    /// Run the smoke checks against the configured service
    Smoke,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum GenerateKind {
    /// Full synthetic product records
    Product,
    /// Valid create bodies
    Create,
    /// Create bodies with one documented corruption
    Invalid,
    /// Post datasets, regression data and factory bundles
    Suite,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logging_config = LoggingConfig::from_env();
    let _guard = init_logging(logging_config)?;

    let cli = Cli::parse();
    let config = HarnessConfig::from_args(cli.args)?;
    config.validate()?;

    match cli.command {
        Command::Generate {
            kind,
            count,
            seed,
            category,
        } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let catalog = TestDataCatalog::new(config.max_known_id);
            let output = generate(kind, count, category, &catalog, &mut rng)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Smoke => {
            let api = http_products_api(&config)?;
            let report = run_smoke(&api, &config.base_url).await;
            println!("{}", serde_json::to_string_pretty(&report)?);
            anyhow::ensure!(
                report.is_success(),
                "{} of {} smoke checks failed",
                report.failed(),
                report.checks.len()
            );
        }
    }
    Ok(())
}

fn generate(
    kind: GenerateKind,
    count: usize,
    category: Option<String>,
    catalog: &TestDataCatalog,
    rng: &mut StdRng,
) -> anyhow::Result<Value> {
    let value = match kind {
        GenerateKind::Product => {
            let products: Vec<_> = (0..count).map(|_| generate_product(rng)).collect();
            serde_json::to_value(products)?
        }
        GenerateKind::Create => {
            let mut options = CreateOptions::new();
            if let Some(category) = category {
                options = options.category(category);
            }
            let bodies = (0..count)
                .map(|_| generate_for_create(rng, &options))
                .collect::<Result<Vec<_>, _>>()
                .context("failed to generate create bodies")?;
            serde_json::to_value(bodies)?
        }
        GenerateKind::Invalid => {
            let bodies: Vec<Value> = (0..count)
                .map(|_| {
                    let invalid = generate_invalid(rng);
                    json!({
                        "variant": invalid.variant.to_string(),
                        "field": invalid.variant.field(),
                        "payload": invalid.payload.to_value(),
                    })
                })
                .collect();
            Value::Array(bodies)
        }
        GenerateKind::Suite => json!({
            "postDatasets": catalog.post_datasets(rng)?,
            "regressionData": catalog.regression_data(rng),
            "smokeData": catalog.smoke_data(),
            "regressionProducts": ProductFactory::new().regression_bundle(rng),
        }),
    };
    Ok(value)
}
