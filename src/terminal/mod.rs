//! Terminal front end: command parsing, rendering, sessions and the
//! read-eval-print loop that ties them together.

pub mod command;
pub mod render;
pub mod session;
pub mod view;

pub use command::{Command, CommandError};
pub use session::{Session, SessionError};
pub use view::GameView;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::engine::types::{MoveKind, Square};

/// Drive `session` from line-oriented `input` until `quit` or end of input.
pub async fn run<R, W>(
    session: &mut Session,
    input: R,
    output: &mut W,
    unicode: bool,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    write_line(output, &render::render(session.game(), unicode)).await?;
    computer_turn(session, output, unicode).await?;
    prompt(output).await?;

    while let Some(line) = lines.next_line().await? {
        let cmd = match command::parse(&line) {
            Ok(cmd) => cmd,
            Err(CommandError::Empty) => {
                prompt(output).await?;
                continue;
            }
            Err(e) => {
                write_line(output, &e.to_string()).await?;
                prompt(output).await?;
                continue;
            }
        };

        match cmd {
            Command::Quit => break,
            Command::Help => write_line(output, command::HELP).await?,
            Command::Board => write_line(output, &render::render(session.game(), unicode)).await?,
            Command::State => match session.view().to_json() {
                Ok(json) => write_line(output, &json).await?,
                Err(e) => {
                    warn!(error = %e, "state serialization failed");
                    write_line(output, &format!("could not serialize state: {e}")).await?;
                }
            },
            Command::Moves(sq) => write_line(output, &describe_moves(session, sq)).await?,
            Command::Hint => match session.hint() {
                Ok(hint) => write_line(output, &format!("Hint: {}", hint.notation())).await?,
                Err(e) => write_line(output, &e.to_string()).await?,
            },
            Command::Undo => match session.undo() {
                Ok(_) => {
                    write_line(output, &render::render(session.game(), unicode)).await?;
                    computer_turn(session, output, unicode).await?;
                }
                Err(e) => write_line(output, &e.to_string()).await?,
            },
            Command::Reset => {
                session.reset();
                write_line(output, &render::render(session.game(), unicode)).await?;
                computer_turn(session, output, unicode).await?;
            }
            Command::Move {
                from,
                to,
                promotion,
            } => match session.play(from, to, promotion) {
                Ok(_) => {
                    write_line(output, &render::render(session.game(), unicode)).await?;
                    computer_turn(session, output, unicode).await?;
                }
                Err(e) => write_line(output, &e.to_string()).await?,
            },
        }
        prompt(output).await?;
    }

    Ok(())
}

/// Let the computer move if it is its turn, then redraw.
async fn computer_turn<W>(session: &mut Session, output: &mut W, unicode: bool) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    match session.ai_reply().await {
        Ok(Some(record)) => {
            write_line(output, &format!("Computer plays {}", record.notation)).await?;
            write_line(output, &render::render(session.game(), unicode)).await?;
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "computer could not move"),
    }
    Ok(())
}

fn describe_moves(session: &Session, sq: Square) -> String {
    let moves = session.game().legal_moves(sq);
    if moves.is_empty() {
        return format!("No legal moves from {sq}");
    }
    let list: Vec<String> = moves
        .iter()
        .map(|mv| match mv.kind {
            MoveKind::Normal | MoveKind::Capture => mv.to.to_string(),
            kind => format!("{} ({kind})", mv.to),
        })
        .collect();
    format!("Legal moves from {sq}: {}", list.join(", "))
}

async fn write_line<W>(output: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}

async fn prompt<W>(output: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(b"> ").await?;
    output.flush().await
}
