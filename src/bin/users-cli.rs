//! CLI tool to list, create, update and delete users in the hosted table.
//!
//! Usage:
//!   users-cli list
//!   users-cli create --name Ann --age 30 --contactno 555 --email a@x.com
//!   users-cli update 7 --email ann@x.com
//!   users-cli delete 7
//!
//! Connection settings come from flags or SUPABASE_URL / SUPABASE_ANON_KEY.

use clap::{Args, Parser, Subcommand};
use std::process;
use std::time::Duration;
use users_rs::{Field, HttpStore, Record, RecordId, RecordManager, StoreConfig};

/// Manage records in a hosted users table.
///
/// Every command loads the table first, runs one operation, then prints the
/// outcome and the re-fetched table.
#[derive(Parser)]
#[command(name = "users-cli")]
struct Cli {
    /// Project URL of the store
    #[arg(long, env = "SUPABASE_URL")]
    url: String,

    /// Anonymous API key
    #[arg(long, env = "SUPABASE_ANON_KEY", hide_env_values = true)]
    key: String,

    /// Table holding the records
    #[arg(long, env = "USERS_TABLE", default_value = "users")]
    table: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "STORE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every record
    List,
    /// Insert a new record
    Create(CreateArgs),
    /// Overwrite fields of an existing record
    Update(UpdateArgs),
    /// Delete a record by id
    Delete { id: RecordId },
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    age: String,
    #[arg(long)]
    contactno: String,
    #[arg(long)]
    email: String,
}

#[derive(Args)]
struct UpdateArgs {
    id: RecordId,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    age: Option<String>,
    #[arg(long)]
    contactno: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl UpdateArgs {
    fn changes(&self) -> Vec<(Field, &str)> {
        [
            (Field::Name, &self.name),
            (Field::Age, &self.age),
            (Field::ContactNo, &self.contactno),
            (Field::Email, &self.email),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

fn render_table(records: &[Record]) -> String {
    let headers = ["ID", "Name", "Age", "Contact Number", "Email"];
    let rows: Vec<[String; 5]> = records
        .iter()
        .map(|r| {
            [
                r.id.to_string(),
                r.fields.name.clone(),
                r.fields.age.clone(),
                r.fields.contactno.clone(),
                r.fields.email.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };
    let mut out = vec![
        line(headers.to_vec()),
        widths.map(|w| "-".repeat(w)).join("-+-"),
    ];
    for row in &rows {
        out.push(line(row.iter().map(String::as_str).collect()));
    }
    if rows.is_empty() {
        out.push("(no records)".to_string());
    }
    out.join("\n")
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match StoreConfig::new(&cli.url, &cli.key) {
        Ok(config) => config
            .with_table(&cli.table)
            .with_timeout(Duration::from_secs(cli.timeout_secs)),
        Err(e) => {
            eprintln!("Configuration error: {e}");
            process::exit(1);
        }
    };

    let store = match HttpStore::new(config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error creating store client: {e}");
            process::exit(1);
        }
    };
    let manager = RecordManager::new(store);

    if let Err(e) = manager.refresh().await {
        eprintln!("Error loading users: {e}");
        process::exit(1);
    }

    let outcome = match &cli.command {
        Command::List => Ok(()),
        Command::Create(args) => {
            manager.start_create(Field::Name, &args.name);
            manager.start_create(Field::Age, &args.age);
            manager.start_create(Field::ContactNo, &args.contactno);
            manager.start_create(Field::Email, &args.email);
            manager.submit_create().await.map(|_| ())
        }
        Command::Update(args) => {
            if !manager.select_for_edit(args.id) {
                eprintln!("No user with id {}", args.id);
                process::exit(1);
            }
            for (field, value) in args.changes() {
                manager.start_update(field, value);
            }
            manager.submit_update().await.map(|_| ())
        }
        Command::Delete { id } => manager.remove_record(*id).await,
    };

    if let Some(status) = manager.status() {
        eprintln!("[{}] {}", status.kind.as_str(), status.message);
    }
    println!("{}", render_table(&manager.records()));

    if let Err(e) = outcome {
        eprintln!("Details: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use users_rs::RecordFields;

    fn parse(args: &[&str]) -> Cli {
        let base = ["users-cli", "--url", "http://localhost:54321", "--key", "anon"];
        Cli::try_parse_from(base.iter().chain(args)).unwrap()
    }

    #[test]
    fn test_update_changes_only_given_fields() {
        let cli = parse(&["update", "7", "--email", "ann@x.com", "--age", "31"]);
        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.id, RecordId(7));
        assert_eq!(
            args.changes(),
            vec![(Field::Age, "31"), (Field::Email, "ann@x.com")]
        );
    }

    #[test]
    fn test_update_without_fields_changes_nothing() {
        let cli = parse(&["update", "3"]);
        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert!(args.changes().is_empty());
    }

    #[test]
    fn test_create_requires_every_field() {
        let base = ["users-cli", "--url", "http://localhost:54321", "--key", "anon"];
        let args = base.iter().chain(&["create", "--name", "Ann"]);
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn test_render_table_pads_columns() {
        let records = [Record {
            id: RecordId(12),
            fields: RecordFields::new("Ann", "30", "555", "a@x.com"),
        }];
        let table = render_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "ID | Name | Age | Contact Number | Email");
        assert_eq!(lines[1], "---+------+-----+----------------+--------");
        assert_eq!(lines[2], "12 | Ann  | 30  | 555            | a@x.com");
    }

    #[test]
    fn test_render_table_empty() {
        let table = render_table(&[]);
        assert!(table.ends_with("(no records)"));
    }
}
