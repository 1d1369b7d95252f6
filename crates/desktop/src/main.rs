//! Console entry point.

use std::io::{self, BufRead, Write};

use anyhow::Context;

use stockroom_desktop::console::{self, Outcome};
use stockroom_desktop::{DesktopConfig, Session};
use stockroom_inventory::Inventory;

fn main() -> anyhow::Result<()> {
    let config = DesktopConfig::from_env().context("invalid configuration")?;
    stockroom_observability::tracing::init(&config.log);

    let inventory = if config.seed_sample_data {
        Inventory::with_sample_data()
    } else {
        Inventory::new()
    };
    let mut session = Session::new(inventory);

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    writeln!(stdout, "Inventory Management System (type `help` for commands)")?;

    loop {
        write!(stdout, "{}", config.prompt)?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("failed to read command")? == 0 {
            break;
        }

        match console::execute(&mut session, &line) {
            Ok(Outcome::Print(text)) if text.is_empty() => {}
            Ok(Outcome::Print(text)) => writeln!(stdout, "{text}")?,
            Ok(Outcome::Quit) => break,
            Err(err) => writeln!(stdout, "error: {err}")?,
        }
    }

    tracing::info!("session ended");
    Ok(())
}
