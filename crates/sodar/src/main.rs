mod tool;

use clap::Parser;
use sodar_engine::Strategy;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Resolve a datos.gov.co dataset to its Socrata API endpoint and fetch records"
)]
struct Args {
    /// Free-text search term, e.g. "educacion"
    query: String,

    /// Show the browser window instead of running headless
    #[arg(long)]
    visible: bool,

    /// Maximum dataset candidates tried from the search listing
    #[arg(long, default_value_t = 5)]
    candidates: usize,

    /// Record limit for the final data request ($limit)
    #[arg(long, default_value_t = 5)]
    records: u32,

    /// Extraction strategy on each candidate page
    #[arg(long, value_enum, default_value = "export-flow")]
    strategy: StrategyArg,

    /// Extra fixed delay after each navigation, in milliseconds
    #[arg(long, default_value_t = 0)]
    settle_ms: u64,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum StrategyArg {
    /// Drive the export panel UI and read the generated endpoint field
    ExportFlow,
    /// Infer the resource id from the dataset page URL
    UrlPattern,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::ExportFlow => Strategy::ExportFlow,
            StrategyArg::UrlPattern => Strategy::UrlPattern,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let options = tool::ToolOptions::from_env(
        args.visible,
        args.candidates,
        args.records,
        args.strategy.into(),
        args.settle_ms,
    );

    let output = tool::fetch_data(&args.query, &options).await;
    println!("{output}");
    Ok(())
}
