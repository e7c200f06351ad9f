//! rnrelease - interactive version bump and platform sync for React
//! Native projects

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rnrelease")]
#[command(about = "Bump your project version and sync it into the platform files")]
#[command(version)]
pub struct Args {
    /// Project root holding package.json (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C outside raw mode gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    let root = match args.directory {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let result = release_core::tui::run(&root).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result?;

    println!("\n   {}\n", "✦ Done!".truecolor(0xD1, 0x9A, 0x66));
    Ok(())
}
