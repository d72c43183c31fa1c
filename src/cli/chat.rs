use super::ui;
use crate::bot;
use crate::core::RateResolver;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;

/// Answers chat commands read line by line until end of input.
pub async fn run_session<R, W>(resolver: &RateResolver, reader: R, writer: &mut W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let reply = bot::handle(resolver, text).await;
        writer
            .write_all(format!("{reply}\n\n").as_bytes())
            .await
            .context("Failed to write reply")?;
        writer.flush().await?;
        handled += 1;
    }

    debug!(handled, "Chat session finished");
    Ok(handled)
}

pub async fn run(resolver: &RateResolver) -> Result<()> {
    eprintln!(
        "{}",
        ui::style_text(
            "xrate chat: type /start for help, Ctrl-D to quit",
            ui::StyleType::Subtle
        )
    );
    let reader = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    run_session(resolver, reader, &mut stdout).await?;
    Ok(())
}
