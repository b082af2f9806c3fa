use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client_core::{AttendanceClient, HttpDataSource, MutationOutcome};
use shared::domain::{AttendanceDraft, AttendanceId, AttendanceRecord, AttendanceStatus};

mod config;

use config::{load_settings, validate_base_url};

#[derive(Parser, Debug)]
#[command(name = "attendance", about = "Attendance list client")]
struct Cli {
    /// Overrides the configured server base url.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prints one page of the attendance list.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Records a new attendance entry.
    Create {
        name: String,
        /// Attendance date, YYYY-MM-DD.
        date: NaiveDate,
        /// HADIR, IZIN, SAKIT or "TIDAK HADIR".
        status: AttendanceStatus,
    },
    /// Rewrites an existing entry.
    Update {
        id: i64,
        name: String,
        date: NaiveDate,
        status: AttendanceStatus,
    },
    /// Deletes an entry. Without --yes the entry is only shown.
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    let base_url = validate_base_url(&settings.base_url)?;
    let source = Arc::new(HttpDataSource::new(base_url));

    match cli.command {
        Command::List { page, size } => {
            let client = AttendanceClient::with_page_size(source, size);
            client.refresh().await?;
            if page > 1 {
                client.request_page(page).await?;
            }
            let meta = client.page_meta().await;
            if meta.page != page {
                println!("page {page} is out of range; showing page {}", meta.page);
            }
            for record in client.records().await {
                print_record(&record);
            }
            println!(
                "page {}/{} ({} records total)",
                meta.page, meta.total_pages, meta.total_items
            );
        }
        Command::Create { name, date, status } => {
            let client = AttendanceClient::new(source);
            let draft = AttendanceDraft {
                employee_name: name,
                date,
                status,
            };
            match client.create(&draft).await? {
                MutationOutcome::Applied => {
                    println!("created attendance for {}", draft.employee_name)
                }
                MutationOutcome::Ignored => println!("create already in flight; nothing sent"),
            }
        }
        Command::Update {
            id,
            name,
            date,
            status,
        } => {
            let client = AttendanceClient::new(source);
            let id = AttendanceId(id);
            if locate_record(&client, id).await?.is_none() {
                bail!("attendance {} not found", id.0);
            }
            client.open_edit(id).await;
            client
                .set_edit_draft(AttendanceDraft {
                    employee_name: name,
                    date,
                    status,
                })
                .await;
            match client.save_edit().await? {
                MutationOutcome::Applied => println!("updated attendance {}", id.0),
                MutationOutcome::Ignored => {
                    println!("update for {} already in flight; nothing sent", id.0)
                }
            }
        }
        Command::Delete { id, yes } => {
            let client = AttendanceClient::new(source);
            let id = AttendanceId(id);
            let Some(record) = locate_record(&client, id).await? else {
                bail!("attendance {} not found", id.0);
            };
            if !client.request_delete(id).await {
                bail!("attendance {} is no longer listed", id.0);
            }
            if yes {
                match client.confirm_delete(id).await? {
                    MutationOutcome::Applied => println!("deleted attendance {}", id.0),
                    MutationOutcome::Ignored => {
                        println!("delete for {} already in flight; nothing sent", id.0)
                    }
                }
            } else {
                client.cancel_delete(id).await;
                println!("would delete:");
                print_record(&record);
                println!("re-run with --yes to confirm");
            }
        }
    }

    Ok(())
}

/// Pages forward until the record shows up or the list runs out.
async fn locate_record(
    client: &AttendanceClient,
    id: AttendanceId,
) -> Result<Option<AttendanceRecord>> {
    client.refresh().await?;
    loop {
        if let Some(record) = client.records().await.into_iter().find(|r| r.id == id) {
            return Ok(Some(record));
        }
        let before = client.page_meta().await.page;
        client.request_next().await?;
        if client.page_meta().await.page == before {
            return Ok(None);
        }
    }
}

fn print_record(record: &AttendanceRecord) {
    println!(
        "{:>4}  {}  {:<12}  {}",
        record.id.0,
        record.date,
        record.status.as_str(),
        record.employee_name
    );
}
