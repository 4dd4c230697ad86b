use clap::Parser;
use order_tracking::config::{CliArgs, Command, OutputFormat};
use order_tracking::core::render;
use order_tracking::utils::error::ErrorSeverity;
use order_tracking::utils::{logger, validation::Validate};
use order_tracking::{
    AppConfig, Caller, Dispatcher, JsonFileOrderStore, OrderId, TrackingCollectionManager,
    TrackingError, TrackingService,
};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => match AppConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => AppConfig::default(),
    };

    // 命令列覆蓋設定
    if let Some(store) = &args.store {
        config.store.path = store.clone();
    }

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(args.verbose, &config.logging.level);
    } else {
        logger::init_cli_logger(args.verbose, &config.logging.level);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    tracing::debug!("Effective config: {:?}", config);

    if let Err(e) = run(&args, &config).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 1,      // 輸入被拒
            ErrorSeverity::Medium => 2,   // 權限不足
            ErrorSeverity::High => 3,     // 配置錯誤
            ErrorSeverity::Critical => 4, // 儲存失敗
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn run(args: &CliArgs, config: &AppConfig) -> order_tracking::Result<()> {
    let store = Arc::new(JsonFileOrderStore::new(&config.store.path));
    let gate = Arc::new(config.role_gate());
    let manager = TrackingCollectionManager::new(config.carrier_profile());
    let service = TrackingService::new(manager, store, gate);

    let caller = Caller {
        id: args.caller.clone(),
        roles: args.roles.clone(),
    };

    match &args.command {
        Command::Add { order, number } => {
            let order_id = OrderId::parse(order)?;
            let stored = service.add_one(&caller, &order_id, number).await?;
            println!("✅ Added {} to order {}", stored, order_id);
        }
        Command::BulkAdd { order, input, file } => {
            let order_id = OrderId::parse(order)?;
            let raw = read_bulk_input(input.as_deref(), file.as_deref()).await?;
            let result = service.add_bulk(&caller, &order_id, &raw).await?;
            println!(
                "Added: {}, Skipped: {}, Invalid: {}",
                result.added, result.skipped, result.invalid
            );
            for line in &result.errors {
                println!("  - {}", line);
            }
        }
        Command::Delete { order, index } => {
            let order_id = OrderId::parse(order)?;
            service.delete_at(&caller, &order_id, *index).await?;
            println!("🗑️ Deleted index {} from order {}", index, order_id);
        }
        Command::List { order, format } => {
            let order_id = OrderId::parse(order)?;
            let views = service.list(&caller, &order_id).await?;
            let output = match format {
                OutputFormat::Table => render::render_table(&views),
                OutputFormat::Json => render::render_json(&views)? + "\n",
                OutputFormat::Csv => render::render_csv(&views)?,
            };
            print!("{}", output);
        }
        Command::Serve => {
            let dispatcher = Dispatcher::with_default_actions(service);
            tracing::info!("🚀 Serving actions: {}", dispatcher.actions().join(", "));
            dispatcher
                .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await?;
        }
    }

    Ok(())
}

async fn read_bulk_input(
    input: Option<&str>,
    file: Option<&std::path::Path>,
) -> order_tracking::Result<String> {
    if let Some(text) = input {
        return Ok(text.to_string());
    }
    if let Some(path) = file {
        return Ok(tokio::fs::read_to_string(path).await?);
    }

    let mut buffer = String::new();
    tokio::io::stdin().read_to_string(&mut buffer).await?;
    if buffer.is_empty() {
        return Err(TrackingError::EmptyInput);
    }
    Ok(buffer)
}
