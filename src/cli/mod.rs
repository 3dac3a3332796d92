//! Interactive prompt loop.
//!
//! Reads one line at a time and fully settles the prior turn before
//! re-prompting; there is exactly one in-flight turn per process.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};

use crate::agent::Agent;

const BANNER: &str =
    "🧭 Kaji Agent 起動。何でも話しかけてください（例: 「15時に買い物リマインド…は無理なので代わりにTODO登録して」）";

/// Run the REPL until `exit` or EOF.
pub async fn run(mut agent: Agent) -> std::io::Result<()> {
    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut stdout = tokio::io::stdout();
    let mut line = String::new();

    stdout.write_all(BANNER.as_bytes()).await?;
    stdout.write_all(b"\n").await?;

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            info!("EOF received, shutting down");
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            break;
        }

        match agent.step(input).await {
            Ok(answer) => {
                stdout.write_all(answer.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Err(e) => {
                // Turn abandoned; history appended so far is retained.
                error!(error = %e, "Turn failed");
                eprintln!("Error: {}", e);
            }
        }
    }

    Ok(())
}
