use accounts::config::db::DbKind;
use accounts::infra::db::connect_db;
use clap::{Parser, ValueEnum};
use migration::{migrate, MigrationCommand};
use tracing::{error, info};

#[derive(Clone, Copy, ValueEnum)]
enum Command {
    Up,
    Down,
    Fresh,
    Reset,
    Refresh,
    Status,
}

impl From<Command> for MigrationCommand {
    fn from(command: Command) -> Self {
        match command {
            Command::Up => MigrationCommand::Up,
            Command::Down => MigrationCommand::Down,
            Command::Fresh => MigrationCommand::Fresh,
            Command::Reset => MigrationCommand::Reset,
            Command::Refresh => MigrationCommand::Refresh,
            Command::Status => MigrationCommand::Status,
        }
    }
}

/// Runs against the Postgres database the backend is configured for:
/// `DATABASE_URL`, or `POSTGRES_HOST`/`POSTGRES_PORT`/`POSTGRES_DB`/
/// `POSTGRES_USER`/`POSTGRES_PASSWORD`.
#[derive(Parser)]
#[command(name = "migration-cli")]
#[command(about = "Accounts database migration tool")]
struct Args {
    /// Migration command to run
    #[arg(value_enum)]
    command: Command,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stdout)
        .without_time()
        .with_target(false)
        .with_env_filter("migration=info,migration_cli=info,accounts=info,sqlx=warn")
        .init();

    let args = Args::parse();
    let command = MigrationCommand::from(args.command);

    // In-memory SQLite is pointless here: it would vanish with the process
    let db = match connect_db(DbKind::Postgres).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Could not connect to database");
            std::process::exit(1);
        }
    };

    if let Err(e) = migrate(&db, command).await {
        error!(error = %e, "Migration failed");
        std::process::exit(1);
    }
    info!("Migration finished");
}
