use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const LOGO: &str = r"
████████╗███████╗ █████╗     ██████╗  ██████╗ ████████╗
╚══██╔══╝██╔════╝██╔══██╗    ██╔══██╗██╔═══██╗╚══██╔══╝
   ██║   █████╗  ███████║    ██████╔╝██║   ██║   ██║
   ██║   ██╔══╝  ██╔══██║    ██╔══██╗██║   ██║   ██║
   ██║   ███████╗██║  ██║    ██████╔╝╚██████╔╝   ██║
   ╚═╝   ╚══════╝╚═╝  ╚═╝    ╚═════╝  ╚═════╝    ╚═╝
";

const TITLE: &str = "🤖 TEA SEPOLIA AUTO TRANSFER BOT v1.0";

pub async fn show() {
    println!("{LOGO}");
    print_boxed(TITLE);
    println!("{}\n", "=".repeat(70));

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message("Initializing TEA BOT...");
    tokio::time::sleep(Duration::from_millis(1500)).await;
    spinner.finish_with_message("✅ TEA BOT Ready!");
}

fn print_boxed(text: &str) {
    let width = text.chars().count() + 4;
    println!("╔{}╗", "═".repeat(width));
    println!("║  {text}  ║");
    println!("╚{}╝", "═".repeat(width));
}
