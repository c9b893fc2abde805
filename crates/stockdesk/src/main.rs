use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use stockdesk::agents::{is_exit_command, today_label};
use stockdesk::models::{DatabaseBackend, StockdeskConfig};
use stockdesk::report::{DeliveryReport, Mailer, ReportCompiler, SmtpMailer};
use stockdesk::{format_inventory, load_config, test_email, Runtime, DEFAULT_CONFIG_PATH};
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "stockdesk",
    about = "Daily trading briefing - seven specialist agents, one email"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Replace the built-in email template
    #[arg(long)]
    template: Option<PathBuf>,

    /// Run the briefing and print the HTML instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Check database connectivity and list tables with row counts
    #[arg(long, conflicts_with_all = ["test_email", "ask", "chat"])]
    test_sql: bool,

    /// Send a test message through the configured relay
    #[arg(long, conflicts_with_all = ["ask", "chat"])]
    test_email: bool,

    /// Answer one question about the data and exit
    #[arg(long, value_name = "QUESTION", conflicts_with = "chat")]
    ask: Option<String>,

    /// Interactive question loop
    #[arg(long)]
    chat: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    stockdesk::init_tracing(config.agents.verbose);

    let outcome = if cli.test_sql {
        test_sql(config).await
    } else if cli.test_email {
        send_test_email(config).await
    } else if let Some(question) = &cli.ask {
        ask(config, question).await
    } else if cli.chat {
        chat(config).await
    } else {
        run_briefing(config, cli.template.as_deref(), cli.dry_run).await
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Run failed");
            eprintln!("\nERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

async fn test_sql(config: StockdeskConfig) -> Result<bool> {
    banner("TESTING DATABASE CONNECTION");
    let executor = match stockdesk::build_executor(&config.database) {
        Ok(executor) => executor,
        Err(e) => {
            println!("\nDatabase connection FAILED: {e:#}");
            return Ok(false);
        }
    };
    println!("Backend: {}", executor.backend());
    match config.database.backend {
        DatabaseBackend::Mssql => {
            println!("Driver: {}", config.database.driver);
            println!(
                "Connection string: {}",
                config.database.redacted_connection_string()
            );
        }
        DatabaseBackend::Sqlite => {
            println!("Database file: {}", config.database.sqlite_path);
        }
    }

    match executor.table_inventory().await {
        Ok(tables) => {
            println!("\n{}", format_inventory(&tables));
            println!("\nDatabase connection: OK");
            Ok(true)
        }
        Err(e) => {
            println!("\nDatabase connection FAILED: {e}");
            Ok(false)
        }
    }
}

async fn send_test_email(config: StockdeskConfig) -> Result<bool> {
    banner("TESTING EMAIL CONFIGURATION");
    let smtp = &config.smtp;
    println!("SMTP Server: {}:{}", smtp.server, smtp.port);
    println!("From: {}", smtp.from);
    println!("To: {}", smtp.to);

    if smtp.username.is_empty() {
        println!("\nWARNING: SMTP_USERNAME is not set");
        return Ok(false);
    }

    let (subject, body) = test_email(chrono::Local::now().naive_local());
    let report = SmtpMailer::new(config.smtp.clone()).send(&subject, &body).await;
    println!("\nResult: {}", report.message);
    Ok(report.success)
}

async fn run_briefing(
    config: StockdeskConfig,
    template: Option<&std::path::Path>,
    dry_run: bool,
) -> Result<bool> {
    let report_date = today_label();
    banner(&format!("DAILY TRADING BRIEFING - {report_date}"));
    if dry_run {
        println!("\n[DRY RUN] The briefing will be printed, not sent.\n");
    }

    let compiler = match template {
        Some(path) => ReportCompiler::from_path(path),
        None => ReportCompiler::embedded(),
    }
    .context("Failed to load report template")?;

    let mailer = SmtpMailer::new(config.smtp.clone());
    let runtime = Runtime::new(config)?;
    let pipeline = runtime.pipeline();
    println!(
        "Running {} agents sequentially with {}s pauses between each.\n",
        pipeline.steps().len(),
        pipeline.cooldown().as_secs()
    );

    let delivery: Option<&dyn Mailer> = if dry_run { None } else { Some(&mailer) };
    let run = pipeline.run(&report_date, &compiler, delivery).await?;

    println!("{}", "-".repeat(60));
    if dry_run {
        println!("{}", run.html);
    }
    if let Some(DeliveryReport { message, .. }) = &run.delivery {
        println!("\n{message}");
    }
    println!("\nDAILY BRIEFING COMPLETE ({})", run.final_state());
    Ok(run.succeeded())
}

async fn ask(config: StockdeskConfig, question: &str) -> Result<bool> {
    let assistant = Runtime::new(config)?.chat_assistant();
    match assistant.ask(question).await {
        Ok(answer) => {
            println!("{answer}");
            Ok(true)
        }
        Err(e) => {
            println!("Error: {e}");
            Ok(false)
        }
    }
}

async fn chat(config: StockdeskConfig) -> Result<bool> {
    let assistant = Runtime::new(config)?.chat_assistant();
    banner("STOCK DATA AI ASSISTANT");
    println!("Ask anything about your data. Type 'quit' to exit.\n");

    let stdin = std::io::stdin();
    loop {
        print!("You: ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read stdin")? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if is_exit_command(question) {
            break;
        }

        match assistant.ask(question).await {
            Ok(answer) => println!("\nAssistant: {answer}\n"),
            Err(e) => println!("\nError: {e}\n"),
        }
    }
    println!("Goodbye!");
    Ok(true)
}
