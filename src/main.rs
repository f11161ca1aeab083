use clap::Parser;
use crypt_plots::core::bundle;
use crypt_plots::domain::model::JobStatus;
use crypt_plots::domain::ports::{Pipeline, Renderer, Storage};
use crypt_plots::utils::error::{ErrorSeverity, FormatterError};
use crypt_plots::utils::{logger, validation::Validate};
use crypt_plots::{
    CliConfig, FormatterConfig, FormatterEngine, GnuplotRenderer, LocalStorage,
    PublicationPipeline,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting crypt-plots");
    if args.verbose {
        tracing::debug!("CLI config: {:?}", args);
    }

    // 驗證命令列參數
    if let Err(e) = args.validate() {
        exit_with_config_error(&e);
    }

    // 載入並驗證圖組設定
    let config = match args.load_formatter_config() {
        Ok(config) => config,
        Err(e) => exit_with_config_error(&e),
    };
    if let Err(e) = config.validate() {
        exit_with_config_error(&e);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let storage = LocalStorage::new(args.work_dir());
    let renderer = GnuplotRenderer::new(config.renderer.command.clone());
    let pipeline =
        PublicationPipeline::new(storage, renderer, config)?.with_render(!args.skip_render);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        perform_dry_run(&pipeline, &args)?;
        return Ok(());
    }

    let engine = FormatterEngine::new(pipeline).with_policy(args.error_policy());

    let report = match engine.run().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(
                "❌ Formatting aborted: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            // 依錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low | ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    };

    let storage = engine.pipeline().storage();

    if let Some(report_name) = &args.report {
        storage
            .write_file(report_name, report.to_json()?.as_bytes())
            .await?;
        tracing::info!("📁 Run report saved to: {}", report_name);
    }

    if let Some(bundle_name) = &args.bundle {
        let count = bundle::write_bundle(storage, &report, bundle_name).await?;
        tracing::info!("📦 Bundled {} files into {}", count, bundle_name);
        println!("📦 Bundle saved to: {}", bundle_name);
    }

    for failure in report.failures() {
        if let JobStatus::Failed { stage, message } = &failure.status {
            eprintln!(
                "❌ {}-{} failed during {:?}: {}",
                failure.model, failure.plot, stage, message
            );
        }
    }

    if !report.is_success() {
        eprintln!(
            "❌ {} of {} plots failed",
            report.failed_count(),
            report.jobs.len()
        );
        std::process::exit(1);
    }

    println!(
        "✅ {} plots ready in {}",
        report.jobs.len(),
        report.work_dir
    );

    Ok(())
}

fn exit_with_config_error(e: &FormatterError) -> ! {
    tracing::error!("❌ Configuration validation failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(1);
}

fn display_config_summary(config: &FormatterConfig, args: &CliConfig) {
    println!("📋 Configuration Summary:");
    println!("  Variant: {}", config.name());
    if let Some(description) = &config.variant.description {
        println!("  Description: {}", description);
    }
    println!("  Working directory: {}", args.work_dir().display());
    println!("  Source layout: {:?}", config.layout());
    println!(
        "  Models: {}",
        config
            .models
            .iter()
            .map(|m| m.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Plots: {}",
        config
            .plots
            .iter()
            .map(|p| p.key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Series ({}): {}",
        config.series.key_title,
        config.series.labels.join(", ")
    );
    println!("  Renderer: {}", config.renderer.command);
    println!("  Error policy: {:?}", args.error_policy());

    if args.skip_render {
        println!("  ⏭️ Rendering disabled");
    }
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run<S: Storage, R: Renderer>(
    pipeline: &PublicationPipeline<S, R>,
    args: &CliConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = pipeline.plan()?;

    println!("🔍 Dry Run Analysis ({} plots):", jobs.len());

    for job in &jobs {
        println!();
        println!("📊 {}", job.label());
        println!("  Title: {}", job.record.title);
        println!("  Y label: {}", job.record.ylabel);
        for copy in &job.copies {
            println!("  📄 {} -> {}", copy.from, copy.to);
        }
        println!("  📝 Script: {}", job.script);
        if args.skip_render {
            println!("  ⏭️ Render skipped");
        } else {
            println!("  🎨 {} {} -> {}", pipeline.config().renderer.command, job.script, job.output_file());
        }

        if args.verbose {
            println!("  --- script ---");
            for line in pipeline.script_for(job)?.lines() {
                println!("  {}", line);
            }
        }
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose to print each generated script.");

    Ok(())
}
