use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supplier_directory::{
    Contact, DEFAULT_FILE_NAME, Directory, DirectoryHandle, GatewayBuilder, Supplier,
};

#[derive(Parser)]
#[command(name = "supplier-directory")]
#[command(about = "Manage categories, suppliers and their contacts")]
struct Cli {
    /// Path to the directory JSON document
    #[arg(long, env = "SUPPLIER_DIRECTORY_DB", global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the whole directory
    Read,
    /// Add an empty category
    AddCategory { name: String },
    /// Remove a category with all its suppliers and contacts
    RemoveCategory { name: String },
    /// Add a supplier to a category
    AddSupplier {
        category: String,
        name: String,
        /// Comma-separated email addresses
        #[arg(long, default_value = "")]
        emails: String,
        /// Comma-separated phone numbers
        #[arg(long, default_value = "")]
        phones: String,
    },
    /// Remove a supplier with its contacts
    RemoveSupplier { category: String, name: String },
    /// Replace a supplier's name, emails and phones
    UpdateSupplier {
        category: String,
        old_name: String,
        new_name: String,
        /// Comma-separated email addresses; pass "" to clear
        #[arg(long)]
        emails: String,
        /// Comma-separated phone numbers; pass "" to clear
        #[arg(long)]
        phones: String,
    },
    /// Add a contact person to a supplier
    AddContact {
        category: String,
        supplier: String,
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Remove a contact person
    RemoveContact {
        category: String,
        supplier: String,
        name: String,
    },
    /// Replace a contact's name, email and phone
    UpdateContact {
        category: String,
        supplier: String,
        old_name: String,
        new_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
    /// Read JSON command requests from stdin, one per line, and answer each
    /// on stdout
    Serve,
}

/// Logs go to stderr so stdout carries only snapshots and responses.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "supplier_directory=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "supplier-directory")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join(DEFAULT_FILE_NAME))
}

/// Split a comma-separated list, dropping blank items.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

async fn run(handle: &DirectoryHandle, command: Commands) -> anyhow::Result<()> {
    let directory: Directory = match command {
        Commands::Serve => return serve(handle).await,
        Commands::Read => handle.read_db_file().await?,
        Commands::AddCategory { name } => handle.add_category(name).await?,
        Commands::RemoveCategory { name } => handle.remove_category(name).await?,
        Commands::AddSupplier {
            category,
            name,
            emails,
            phones,
        } => {
            let supplier = Supplier::new(name)
                .with_emails(split_list(&emails))
                .with_phones(split_list(&phones));
            handle.add_supplier(category, supplier).await?
        }
        Commands::RemoveSupplier { category, name } => {
            handle.remove_supplier(category, name).await?
        }
        Commands::UpdateSupplier {
            category,
            old_name,
            new_name,
            emails,
            phones,
        } => {
            handle
                .update_supplier(
                    category,
                    old_name,
                    new_name,
                    split_list(&emails),
                    split_list(&phones),
                )
                .await?
        }
        Commands::AddContact {
            category,
            supplier,
            name,
            email,
            phone,
        } => {
            let contact = Contact::new(name, email.trim(), phone.trim());
            handle.add_contact(category, supplier, contact).await?
        }
        Commands::RemoveContact {
            category,
            supplier,
            name,
        } => handle.remove_contact(category, supplier, name).await?,
        Commands::UpdateContact {
            category,
            supplier,
            old_name,
            new_name,
            email,
            phone,
        } => {
            handle
                .update_contact(category, supplier, old_name, new_name, email, phone)
                .await?
        }
    };
    println!("{}", serde_json::to_string_pretty(&directory)?);
    Ok(())
}

async fn serve(handle: &DirectoryHandle) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle.dispatch_json(&line).await;
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    tracing::debug!(path = %path.display(), "using directory document");

    let handle = GatewayBuilder::new(&path)
        .open()
        .with_context(|| format!("failed to open {}", path.display()))?;

    run(&handle, cli.command).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_blanks() {
        assert_eq!(
            split_list(" a@x.com, ,b@x.com ,"),
            vec!["a@x.com".to_owned(), "b@x.com".to_owned()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn cli_parses_update_supplier() {
        let cli = Cli::try_parse_from([
            "supplier-directory",
            "--db",
            "/tmp/db.json",
            "update-supplier",
            "A",
            "Acme",
            "Acme Ltd",
            "--emails",
            "x@acme.example,y@acme.example",
            "--phones",
            "",
        ])
        .expect("arguments should parse");

        assert_eq!(cli.db, Some(PathBuf::from("/tmp/db.json")));
        let Commands::UpdateSupplier {
            new_name, emails, ..
        } = cli.command
        else {
            panic!("expected update-supplier");
        };
        assert_eq!(new_name, "Acme Ltd");
        assert_eq!(split_list(&emails).len(), 2);
    }

    #[test]
    fn update_commands_require_every_field() {
        let result = Cli::try_parse_from([
            "supplier-directory",
            "update-supplier",
            "A",
            "Acme",
            "Acme Ltd",
            "--emails",
            "x@acme.example",
        ]);
        assert!(result.is_err(), "missing --phones must not parse");

        let result = Cli::try_parse_from([
            "supplier-directory",
            "update-contact",
            "A",
            "Acme",
            "Bob",
            "Robert",
            "--phone",
            "555",
        ]);
        assert!(result.is_err(), "missing --email must not parse");
    }
}
