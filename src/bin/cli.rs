//! Gemini Relay - send one prompt through the candidate model chain.
//!
//! Run with: cargo run --bin gemini-relay -- "your prompt here"

use gemini_relay::GeminiClient;
use std::env;
use std::io::{self, BufRead};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let api_key = env::var("GEMINI_API_KEY").unwrap_or_default();

    // Prompt from arguments, or from stdin when none are given
    let args: Vec<String> = env::args().skip(1).collect();
    let prompt = if args.is_empty() {
        let stdin = io::stdin();
        let mut lines = Vec::new();
        for line in stdin.lock().lines() {
            lines.push(line?);
        }
        lines.join("\n")
    } else {
        args.join(" ")
    };

    if prompt.trim().is_empty() {
        anyhow::bail!("no prompt given; pass it as arguments or on stdin");
    }

    let client = GeminiClient::from_env();
    let reply = client.invoke(&prompt, &api_key).await?;

    println!("{reply}");
    Ok(())
}
