use canvas_pulse::domain::ports::Presenter;
use canvas_pulse::utils::error::{ErrorSeverity, PulseError};
use canvas_pulse::utils::logger;
use canvas_pulse::{
    run_command, AppConfig, CanvasHttpClient, Cli, ConsolePresenter, CourseService,
    JsonPresenter, OutputFormat,
};
use chrono::Utc;
use clap::Parser;

fn report_failure(context: &str, e: &PulseError) {
    tracing::error!(
        "❌ {}: {} (Category: {:?}, Severity: {:?})",
        context,
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting canvas-pulse");

    // 設定錯誤在進入核心流程前直接結束
    let config = match AppConfig::load(cli.config.as_deref(), &cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            report_failure("Configuration failed", &e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Config: {:?}", config);

    let client = match CanvasHttpClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            report_failure("Could not create the HTTP client", &e);
            std::process::exit(1);
        }
    };

    let service = CourseService::new(client, config.exclusions());
    let mut presenter: Box<dyn Presenter> = match cli.format {
        OutputFormat::Table => Box::new(ConsolePresenter::stdout(config.presenter_config())),
        OutputFormat::Json => Box::new(JsonPresenter::stdout()),
    };

    let request = cli.command.into_request(&config);
    let command_name = request.name();

    // 整個流程共用同一個 now
    let now = Utc::now();
    if let Err(e) = run_command(request, &service, presenter.as_mut(), now).await {
        report_failure(&format!("{} failed", command_name), &e);
        let code = exit_code(e.severity());
        if code > 0 {
            std::process::exit(code);
        }
    }

    tracing::info!("✅ {} finished", command_name);
    Ok(())
}
