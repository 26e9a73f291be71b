use anyhow::Result;
use clap::{Parser, ValueEnum};

use hivedash_cli::api_client::ApiClient;
use hivedash_cli::{format_increase, init_tracing};
use hivedash_core::models::DashboardAnalytics;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "dashboard_stats")]
#[command(about = "Print the admin dashboard analytics")]
struct Args {
    /// Trend window in days (server default when omitted)
    #[arg(long)]
    days: Option<u32>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let client = ApiClient::from_env()?;
    tracing::debug!(base_url = %client.base_url(), days = ?args.days, "Fetching dashboard");

    let dashboard = client.get_dashboard(args.days).await?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
        OutputFormat::Table => print_dashboard_table(&dashboard),
    }

    Ok(())
}

fn print_dashboard_table(dashboard: &DashboardAnalytics) {
    println!("\n=== Upload Statistics ===\n");
    match &dashboard.upload_stats {
        Some(uploads) => {
            println!(
                "Total uploads: {:>8}  ({} {})",
                uploads.total,
                format_increase(uploads.increase),
                uploads.timeframe.to_lowercase()
            );
            println!("Voice notes:   {:>8}", uploads.voice_notes);
            println!("\n--- By Content ---");
            println!("Images:    {:>6}", uploads.breakdown.images);
            println!("Documents: {:>6}", uploads.breakdown.documents);
            println!("Others:    {:>6}", uploads.breakdown.others);
            println!("\n--- Sentiment ---");
            let sentiment = &uploads.sentiment_analysis;
            println!("Positive:  {:>6}", sentiment.positive);
            println!("Neutral:   {:>6}", sentiment.neutral);
            println!("Negative:  {:>6}", sentiment.negative);
            println!("Custom:    {:>6}", sentiment.custom);
        }
        None => println!("(unavailable)"),
    }

    println!("\n=== User Statistics ===\n");
    match &dashboard.user_stats {
        Some(users) => {
            println!(
                "Users:        {:>8}  ({} new {})",
                users.users.total,
                format_increase(users.users.increase),
                users.timeframe.to_lowercase()
            );
            println!(
                "Active users: {:>8}  ({})",
                users.active_users.total,
                format_increase(users.active_users.increase)
            );
        }
        None => println!("(unavailable)"),
    }

    if !dashboard.recent_upload_trends.is_empty() || !dashboard.recent_user_trends.is_empty() {
        println!("\n=== Daily Trend ===\n");
        println!("{:<12} {:>8} {:>10} {:>8}", "Date", "Uploads", "New users", "Active");
        let days = dashboard
            .recent_upload_trends
            .len()
            .max(dashboard.recent_user_trends.len());
        for i in 0..days {
            let upload = dashboard.recent_upload_trends.get(i);
            let user = dashboard.recent_user_trends.get(i);
            let date = upload
                .map(|p| p.date)
                .or_else(|| user.map(|p| p.date))
                .map(|d| d.to_string())
                .unwrap_or_default();
            println!(
                "{:<12} {:>8} {:>10} {:>8}",
                date,
                cell(upload.map(|p| p.uploads.total)),
                cell(user.map(|p| p.users.total)),
                cell(user.map(|p| p.active_users.total)),
            );
        }
    }

    if !dashboard.unavailable.is_empty() {
        println!("\n--- Unavailable ---");
        for metric in &dashboard.unavailable {
            println!("{}: {}", metric.metric, metric.reason);
        }
    }
    println!();
}

fn cell(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
