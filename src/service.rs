use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};

use crate::fallback;
use crate::llm::{LlmError, TextGenerator};
use crate::pitch::extract::ExtractError;
use crate::pitch::{self, RenderedSection};
use crate::prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchSource {
    Llm,
    Fallback,
    ErrorFallback,
}

/// Milliseconds spent per stage.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Timing {
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsing: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PitchResponse {
    pub sections: Vec<RenderedSection>,
    pub source: PitchSource,
    pub timing: Timing,
}

#[derive(Debug, thiserror::Error)]
pub enum PitchError {
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

fn millis(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

impl PitchResponse {
    /// Fixed content for when nothing else can be produced.
    pub fn emergency(company: &str, started: Instant) -> Self {
        PitchResponse {
            sections: pitch::render_sections(&fallback::emergency_sections(company)),
            source: PitchSource::ErrorFallback,
            timing: Timing {
                total: millis(started),
                ..Timing::default()
            },
        }
    }

    fn fallback(company: &str, started: Instant) -> Self {
        match fallback::fallback_sections(company) {
            Ok(sections) => PitchResponse {
                sections: pitch::render_sections(&sections),
                source: PitchSource::Fallback,
                timing: Timing {
                    total: millis(started),
                    ..Timing::default()
                },
            },
            Err(e) => {
                warn!(error = %e, "fallback content failed extraction");
                Self::emergency(company, started)
            }
        }
    }
}

async fn from_model(
    generator: &dyn TextGenerator,
    company: &str,
    started: Instant,
) -> Result<PitchResponse, PitchError> {
    let prompt = prompt::build_prompt(company);

    let api_start = Instant::now();
    let raw = generator.generate(&prompt).await?;
    let api = millis(api_start);
    info!(chars = raw.len(), api_ms = api, "model response received");

    let parse_start = Instant::now();
    let sections = pitch::process_response(&raw)?;
    let parsing = millis(parse_start);

    Ok(PitchResponse {
        sections,
        source: PitchSource::Llm,
        timing: Timing {
            total: millis(started),
            api: Some(api),
            parsing: Some(parsing),
        },
    })
}

/// One pitch for `company`. Always yields four sections.
pub async fn generate_pitch(generator: Option<&dyn TextGenerator>, company: &str) -> PitchResponse {
    let started = Instant::now();
    info!(company, "generating pitch");

    let response = match generator {
        None => {
            info!("no API key configured, using fallback content");
            PitchResponse::fallback(company, started)
        }
        Some(generator) => match from_model(generator, company, started).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "model path failed, using fallback content");
                PitchResponse::fallback(company, started)
            }
        },
    };

    info!(
        source = ?response.source,
        total_ms = response.timing.total,
        "pitch ready"
    );
    response
}

// ── Tests ──
