// src/main.rs

use watchhook::{cli, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();
    match run(args).await {
        Ok(Some(report)) if !report.is_clean() => std::process::exit(1),
        Ok(_) => {}
        Err(err) => {
            eprintln!("watchhook error: {err:#}");
            std::process::exit(1);
        }
    }
}
