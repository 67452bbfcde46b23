use chess_rules::config::AppConfig;
use chess_rules::terminal::{self, Session};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Logs go to stderr so they never interleave with the board on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_rules=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        ai_enabled = config.ai_enabled,
        ai_color = %config.ai_color,
        strategy = ?config.ai_strategy,
        "chess-rules starting"
    );

    let mut session = Session::new(&config);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    println!("Type 'help' for commands.");
    terminal::run(&mut session, stdin, &mut stdout, config.unicode).await?;

    tracing::info!(
        id = %session.id(),
        plies = session.game().history().len(),
        outcome = %session.game().outcome(),
        "session finished"
    );
    Ok(())
}
