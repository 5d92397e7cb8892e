mod config;
mod fallback;
mod llm;
mod pitch;
mod prompt;
mod server;
mod service;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Settings;
use crate::pitch::RenderedSection;

#[derive(Parser)]
#[command(name = "pitchgen", about = "Four-section sales pitch generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        /// Address to bind (default: PITCH_BIND or 127.0.0.1:3000)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Generate one pitch for a company
    Generate {
        company: String,
        /// Print the full JSON response
        #[arg(long)]
        json: bool,
    },
    /// Extract the four sections from raw model output (file or stdin)
    Extract { file: Option<PathBuf> },
    /// Extract, then show flat HTML and chunks for each section
    Render { file: Option<PathBuf> },
    /// Show the configuration check
    Env,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hyper=warn,reqwest=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.bind.clone());
            let generator = llm::generator_from_settings(&settings)?;
            if generator.is_none() {
                tracing::warn!("GOOGLE_API_KEY not configured, every request gets fallback content");
            }
            let state = Arc::new(server::AppState { settings, generator });
            server::serve(state, &bind).await
        }
        Commands::Generate { company, json } => {
            let generator = llm::generator_from_settings(&settings)?;

            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}")?);
            pb.set_message(format!("Generating pitch for {}...", company));
            pb.enable_steady_tick(Duration::from_millis(100));
            let response = service::generate_pitch(generator.as_deref(), &company).await;
            pb.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_sections(&response.sections);
                println!("Source: {:?}", response.source);
            }
            println!("\nDone in {}", format_duration(t0.elapsed()));
            Ok(())
        }
        Commands::Extract { file } => {
            let raw = read_input(file)?;
            let sections = pitch::extract::extract(&raw)?;
            println!("{}", serde_json::to_string_pretty(&sections)?);
            Ok(())
        }
        Commands::Render { file } => {
            let raw = read_input(file)?;
            let rendered = pitch::process_response(&raw)?;
            print_sections(&rendered);
            for s in &rendered {
                println!("== {} ==", s.display_title);
                for chunk in pitch::chunks::split_into_chunks(&s.content) {
                    println!("{}\n", chunk);
                }
            }
            Ok(())
        }
        Commands::Env => {
            let report = settings.report();
            println!("API key set:     {}", report.has_api_key);
            println!("Placeholder key: {}", report.is_placeholder_key);
            println!("Key length:      {}", report.key_length);
            println!("Model:           {}", report.model);
            println!("Timeout:         {}s", report.timeout_secs);
            Ok(())
        }
    }
}

fn read_input(file: Option<PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn print_sections(sections: &[RenderedSection]) {
    for (i, s) in sections.iter().enumerate() {
        println!("{}. {}", i + 1, s.display_title);
        println!("{}", "-".repeat(60));
        println!("{}", s.html);
        println!(
            "[{} chunks: {}]\n",
            s.chunks.len(),
            s.chunks
                .iter()
                .map(|c| format!("{:?}", c.kind).to_lowercase())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
