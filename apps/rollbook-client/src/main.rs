//! # Rollbook Client
//!
//! Command-line access to a running Rollbook server.
//!
//! Reads configuration from flags or environment variables:
//! - `ROLLBOOK_URL`: server URL (default: `http://localhost:5000`)
//! - `ROLLBOOK_API_KEY`: optional Bearer token for authentication

use clap::{Parser, Subcommand};
use rollbook_client::{ClientError, DEFAULT_URL, NewStudent, RollbookClient, StudentUpdate, render};

/// Rollbook client
#[derive(Parser, Debug)]
#[command(name = "rollbook-client")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Server URL
    #[arg(short, long, env = "ROLLBOOK_URL", default_value = DEFAULT_URL)]
    url: String,

    /// API key sent as a Bearer token
    #[arg(short = 'k', long, env = "ROLLBOOK_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List students in insertion order
    List,
    /// List students ranked by percentage
    Sorted,
    /// Count students
    Count,
    /// Show one student
    Show { roll: u64 },
    /// Add a student
    Add {
        #[arg(short, long)]
        roll: u64,
        #[arg(short, long, default_value = "")]
        name: String,
        #[arg(short, long, default_value_t = 0)]
        age: u32,
        #[arg(short, long, default_value = "")]
        branch: String,
        /// Five comma-separated marks, e.g. 90,85,77,60,92
        #[arg(short, long)]
        marks: Option<String>,
    },
    /// Edit a student; omitted fields keep their values
    Edit {
        roll: u64,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        age: Option<u32>,
        #[arg(short, long)]
        branch: Option<String>,
        /// Five comma-separated marks; leave a slot empty to keep it
        #[arg(short, long)]
        marks: Option<String>,
    },
    /// Delete a student
    Delete { roll: u64 },
    /// Load the sample students
    Seed,
}

#[tokio::main]
async fn main() {
    // Logging to stderr only; stdout carries command output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rollbook_client=warn".into()),
        )
        .init();

    let cli = Cli::parse();
    tracing::debug!("Rollbook client targeting {}", cli.url);

    let client = RollbookClient::new(cli.url, cli.api_key);
    if let Err(e) = run(&client, cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(client: &RollbookClient, command: Command) -> Result<(), ClientError> {
    match command {
        Command::List => print!("{}", render::table(&client.list().await?, false)),
        Command::Sorted => print!("{}", render::table(&client.sorted().await?, true)),
        Command::Count => println!("{}", client.count().await?),
        Command::Show { roll } => print!("{}", render::detail(&client.get(roll).await?)),
        Command::Add {
            roll,
            name,
            age,
            branch,
            marks,
        } => {
            let [mark1, mark2, mark3, mark4, mark5] =
                parse_marks(marks.as_deref())?.map(|m| m.unwrap_or(0));
            let student = NewStudent {
                roll,
                name,
                age,
                branch,
                mark1,
                mark2,
                mark3,
                mark4,
                mark5,
            };
            let created = client.create(&student).await?;
            print!("{}", render::detail(&created));
        }
        Command::Edit {
            roll,
            name,
            age,
            branch,
            marks,
        } => {
            let update = StudentUpdate {
                name,
                age,
                branch,
                ..StudentUpdate::default()
            }
            .with_marks(parse_marks(marks.as_deref())?);
            let updated = client.update(roll, &update).await?;
            print!("{}", render::detail(&updated));
        }
        Command::Delete { roll } => println!("{}", client.delete(roll).await?),
        Command::Seed => println!("{}", client.seed().await?.message),
    }
    Ok(())
}

/// Parse `a,b,c,d,e`; empty slots are `None`. No input means no marks.
fn parse_marks(raw: Option<&str>) -> Result<[Option<i64>; 5], ClientError> {
    let mut marks = [None; 5];
    let Some(raw) = raw else {
        return Ok(marks);
    };

    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != marks.len() {
        return Err(ClientError::ParseError(format!(
            "expected 5 comma-separated marks, got {}",
            parts.len()
        )));
    }
    for (slot, part) in marks.iter_mut().zip(parts) {
        if !part.is_empty() {
            *slot = Some(part.parse().map_err(|_| {
                ClientError::ParseError(format!("mark '{part}' is not an integer"))
            })?);
        }
    }
    Ok(marks)
}
