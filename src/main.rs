use clap::Parser;
use safecity::utils::error::ErrorSeverity;
use safecity::utils::{logger, validation::Validate};
use safecity::web::probe::wait_until_ready;
use safecity::{
    load_dashboard_data, AppConfig, Cli, Command, CrimePipeline, EtlEngine, ExportPipeline,
    LocalStorage, SafeCityError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_logger(cli.verbose, config.log_json);
    tracing::info!("Starting safecity {}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Resolved config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let result = match &cli.command {
        Command::Serve(_) => serve(&config).await,
        Command::Export(args) => export(&config, &args.output_path).await,
        Command::Summary(_) => summary(&config).await,
        Command::Probe(args) => {
            let url = args.url.clone().unwrap_or_else(|| config.health_url());
            wait_until_ready(&url, config.probe_attempts, config.probe_interval())
                .await
                .map(|_| ())
        }
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn serve(config: &AppConfig) -> Result<(), SafeCityError> {
    let data = load_dashboard_data(config).await?;
    safecity::web::serve(config, data).await
}

async fn export(config: &AppConfig, output_path: &str) -> Result<(), SafeCityError> {
    let source = CrimePipeline::new(LocalStorage::new(&config.data_dir), config.clone());
    let pipeline = ExportPipeline::new(source, LocalStorage::new(output_path));
    let output = EtlEngine::new_with_monitoring(pipeline, config.monitor)
        .run()
        .await?;

    tracing::info!("✅ Export completed");
    println!("✅ Export completed");
    println!("📁 Output saved to: {}", output);
    Ok(())
}

async fn summary(config: &AppConfig) -> Result<(), SafeCityError> {
    let data = load_dashboard_data(config).await?;
    let crimes = data.crimes.ok_or_else(|| SafeCityError::CrimeDataRequired {
        path: config.crime_path().display().to_string(),
    })?;

    let totals = crimes.borough_totals();
    let width = totals.iter().map(|(b, _)| b.len()).max().unwrap_or(0);
    for (borough, total) in &totals {
        println!("{:<width$}  {:>8}", borough, total, width = width);
    }
    let grand: u64 = totals.iter().map(|(_, t)| t).sum();
    println!("{:<width$}  {:>8}", "Total", grand, width = width);
    Ok(())
}
