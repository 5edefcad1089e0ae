use anyhow::Context;
use clap::Parser;
use iris_serve::core::dataset::IrisDataset;
use iris_serve::utils::logger;
use iris_serve::{LocalStorage, Trainer, TrainingConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "train_models")]
#[command(about = "Fit the Iris logistic-regression and k-means pipelines and save them")]
struct Args {
    /// Directory the model artifacts are written to
    #[arg(short, long, default_value = "models")]
    output_dir: PathBuf,

    /// Fraction of each class held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of k-means restarts
    #[arg(long, default_value_t = 10)]
    n_init: usize,

    /// Solver iterations for the logistic regression
    #[arg(long, default_value_t = 1000)]
    max_iter: usize,

    /// Optional CSV with the same columns as the bundled dataset
    #[arg(long)]
    data: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);

    let dataset = match &args.data {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("cannot open dataset {}", path.display()))?;
            IrisDataset::from_reader(file)?
        }
        None => IrisDataset::load()?,
    };
    tracing::info!("📊 Loaded {} samples", dataset.len());

    let config = TrainingConfig {
        test_size: args.test_size,
        seed: args.seed,
        n_init: args.n_init,
        max_iter: args.max_iter,
        ..TrainingConfig::default()
    };

    let storage = LocalStorage::new(args.output_dir.clone());
    let report = Trainer::new(&storage, config)
        .run(&dataset)
        .await
        .context("training failed")?;

    println!(
        "LogReg accuracy train={:.3} test={:.3}",
        report.logreg_train_accuracy, report.logreg_test_accuracy
    );
    println!("Cluster→Class mapping: {:?}", report.mapping);
    println!("KMeans(mapped) accuracy test={:.3}", report.kmeans_test_accuracy);
    println!("📁 Saved {} and {}", report.logistic_path, report.kmeans_path);

    Ok(())
}
