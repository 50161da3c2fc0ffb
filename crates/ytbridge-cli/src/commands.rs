//! CLI command implementations

use crate::{output::emit, replay::Replay};
use serde::Serialize;
use tracing::debug;
use ytbridge_core::{
    extract_media_id, PlaybackQuality, PlaybackState, PlayerVars, SourceDescriptor, TechOptions,
    WidgetConfig, YoutubeTech,
};

#[derive(Serialize)]
struct IdReport {
    url: String,
    media_id: Option<String>,
}

/// Extract media ids
pub fn id(urls: &[String], format: &str) -> anyhow::Result<()> {
    let reports: Vec<IdReport> = urls
        .iter()
        .map(|url| IdReport {
            url: url.clone(),
            media_id: extract_media_id(url),
        })
        .collect();

    emit(&reports, format, |reports| {
        for report in reports {
            println!("{}\t{}", report.media_id.as_deref().unwrap_or("-"), report.url);
        }
    })
}

#[derive(Serialize)]
struct ProbeReport {
    can_play_source: bool,
    media_id: Option<String>,
    problem: Option<String>,
    widget: Option<WidgetConfig>,
}

/// Probe a source
pub fn probe(
    url: &str,
    mime_type: &str,
    native_controls: bool,
    autoplay: bool,
    loop_playback: bool,
    format: &str,
) -> anyhow::Result<()> {
    let options = TechOptions {
        native_controls,
        autoplay,
        loop_playback,
        source: SourceDescriptor::new(url, mime_type),
    };
    debug!(?options, "Probing source");

    let media_id = options.source.media_id();
    let validation = options.validate();
    let problem = match (&validation, &media_id) {
        (Err(err), _) | (Ok(_), Err(err)) => Some(err.to_string()),
        _ => None,
    };

    let element_id = "probe_youtube_api";
    let widget = media_id.as_ref().ok().map(|media_id| WidgetConfig {
        element_id: element_id.to_string(),
        video_id: media_id.clone(),
        player_vars: PlayerVars::from_options(&options, element_id),
    });

    let report = ProbeReport {
        can_play_source: YoutubeTech::can_play_source(&options.source),
        media_id: media_id.ok(),
        problem,
        widget,
    };

    emit(&report, format, |report| {
        println!("Source: {}", url);
        println!("  Type: {}", mime_type);
        println!("  Can play: {}", report.can_play_source);
        println!("  Media id: {}", report.media_id.as_deref().unwrap_or("-"));
        if let Some(problem) = &report.problem {
            println!("  Problem: {}", problem);
        }
        if let Some(widget) = &report.widget {
            println!("\nWidget config:");
            println!("{}", serde_json::to_string_pretty(widget).unwrap_or_default());
        }
    })
}

#[derive(Serialize)]
struct StepReport {
    code: i32,
    state: String,
    events: Vec<&'static str>,
    paused: bool,
}

/// Replay state codes through a headless tech
pub fn events(codes: &[i32], native_controls: bool, format: &str) -> anyhow::Result<()> {
    let (replay, startup) = Replay::start(native_controls)?;
    debug!(startup = ?startup, "Replay ready");

    let steps: Vec<StepReport> = codes
        .iter()
        .map(|&code| {
            let events = replay.step(code);
            StepReport {
                code,
                state: PlaybackState::from_code(code).to_string(),
                events: events.iter().map(|e| e.name()).collect(),
                paused: replay.tech().paused(),
            }
        })
        .collect();

    emit(&steps, format, |steps| {
        let names: Vec<_> = startup.iter().map(|e| e.name()).collect();
        println!("ready: {}", names.join(", "));
        for step in steps {
            let events = if step.events.is_empty() {
                "(suppressed)".to_string()
            } else {
                step.events.join(", ")
            };
            println!("{:>3} {:<10} -> {}", step.code, step.state, events);
        }
        for (affordance, visible) in replay.chrome() {
            println!("chrome: {:?} {}", affordance, if visible { "shown" } else { "hidden" });
        }
    })
}

#[derive(Serialize)]
struct QualityRow {
    quality: String,
    width: u32,
    height: u32,
}

/// Print the quality table
pub fn qualities(format: &str) -> anyhow::Result<()> {
    let rows: Vec<QualityRow> = PlaybackQuality::known()
        .iter()
        .map(|quality| {
            let resolution = quality.dimensions();
            QualityRow {
                quality: quality.label().to_string(),
                width: resolution.width,
                height: resolution.height,
            }
        })
        .collect();

    emit(&rows, format, |rows| {
        for row in rows {
            println!("{:<8} {}x{}", row.quality, row.width, row.height);
        }
    })
}
