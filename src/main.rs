/*!
 * Buddy System - Main Entry Point
 *
 * Interactive shell over a buddy allocator:
 * - Pool geometry from BUDDY_MAX_SIZE / BUDDY_MIN_SIZE
 * - One command per line on stdin, replies on stdout
 * - Logs on stderr
 */

use buddy_system::{init_tracing, BuddyAllocator, BuddyConfig, Reply, Session};
use miette::IntoDiagnostic;
use std::io::{self, BufRead, Write};
use tracing::{info, warn};

fn main() -> miette::Result<()> {
    init_tracing();

    let config = BuddyConfig::from_env()?;
    info!(
        max_size = config.max_size,
        min_size = config.min_size,
        max_depth = config.max_depth(),
        "Buddy system starting"
    );

    let allocator = BuddyAllocator::from_config(&config)?;
    let mut session = Session::new(allocator);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(
        stdout,
        "buddy system ready: {} units, min block {} (type 'help')",
        config.max_size, config.min_size
    )
    .into_diagnostic()?;

    for line in stdin.lock().lines() {
        let line = line.into_diagnostic()?;
        if line.trim().is_empty() {
            continue;
        }

        match session.run_line(&line) {
            Ok(Reply::Text(text)) => writeln!(stdout, "{text}").into_diagnostic()?,
            Ok(Reply::Quit) => break,
            Err(e) => {
                warn!(error = %e, "Command failed");
                writeln!(stdout, "error: {e}").into_diagnostic()?;
            }
        }
        stdout.flush().into_diagnostic()?;
    }

    info!(
        used = session.allocator().used_memory(),
        "Buddy system shutting down"
    );
    Ok(())
}
