//! Headless subcommands.

use ad_core::config::models::AppConfig;
use ad_core::render::{align_table, render_section, split_tables};
use ad_core::session::SessionState;
use ad_core::workflow::choreography::{is_choreography_trigger, total_duration};
use ad_core::DashboardService;
use ad_protocol::{
    AgentStatus, AnalysisSummary, ContentPart, Event, FinishReason, ReportDocument, ReportKind,
};
use color_eyre::eyre::{eyre, Result};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::Instant;

/// Slack after the last choreography step before giving up on it.
const SETTLE_MARGIN: Duration = Duration::from_secs(1);

fn build_service(
    config: &AppConfig,
    session: Arc<SessionState>,
) -> Result<(DashboardService, UnboundedReceiver<Event>)> {
    let (event_tx, event_rx) = unbounded_channel();
    let service = DashboardService::from_config(config, session, event_tx).map_err(|e| eyre!(e))?;
    Ok((service, event_rx))
}

/// `dashboard run`: start a run and follow it until the agents settle.
pub async fn run(config: &AppConfig, report: Option<ReportKind>) -> Result<()> {
    let session = Arc::new(SessionState::open(&config.state_dir));
    let (service, mut events) = build_service(config, session)?;
    let all_completed = |service: &DashboardService| {
        service
            .controller()
            .snapshot()
            .agents
            .iter()
            .all(|status| *status == AgentStatus::Completed)
    };

    service.controller().start();

    let mut choreography_origin: Option<Instant> = None;
    let mut settle_by: Option<Instant> = None;
    loop {
        let next = tokio::select! {
            event = async {
                match settle_by {
                    Some(deadline) => tokio::time::timeout_at(deadline, events.recv()).await.ok().flatten(),
                    None => events.recv().await,
                }
            } => event,
            _ = tokio::signal::ctrl_c() => {
                service.controller().reset();
                return Err(eyre!("interrupted"));
            }
        };
        let Some(event) = next else {
            break;
        };

        print_run_event(&event);
        match event {
            Event::ProgressReceived { event, .. }
                if choreography_origin.is_none() && is_choreography_trigger(&event) =>
            {
                choreography_origin = Some(Instant::now());
            }
            Event::AgentStatusChanged { .. } if settle_by.is_some() && all_completed(&service) => {
                break;
            }
            Event::RunFinished { .. } => match choreography_origin {
                Some(origin) if !all_completed(&service) => {
                    settle_by = Some(origin + total_duration() + SETTLE_MARGIN);
                }
                _ => break,
            },
            Event::RunFailed { error, .. } => return Err(eyre!("run failed: {error}")),
            _ => {}
        }
    }

    if let Some(kind) = report {
        let document = service.load_report(kind).await?;
        println!();
        print_document(&document);
    }
    Ok(())
}

fn print_run_event(event: &Event) {
    match event {
        Event::RunStarted { generation } => {
            println!("{} run #{generation} started", "▶".green().bold());
        }
        Event::RunTriggered { analysis_id, .. } => {
            println!("  analysis {}", analysis_id.bold());
        }
        Event::ProgressReceived { event, .. } => println!("  {}", event.log_line().dimmed()),
        Event::AgentStatusChanged { agent, status, .. } => {
            let status = match status {
                AgentStatus::Pending => status.to_string().normal(),
                AgentStatus::Processing => status.to_string().yellow(),
                AgentStatus::Completed => status.to_string().green(),
            };
            println!("{} {agent}: {status}", "●".cyan());
        }
        Event::RunFinished { reason, .. } => {
            let reason = match reason {
                FinishReason::Completed => "analysis complete",
                FinishReason::StreamClosed => "stream closed",
            };
            println!("{} {reason}", "■".green().bold());
        }
        Event::RunFailed { error, .. } => println!("{} {error}", "✗".red().bold()),
        _ => {}
    }
}

/// `dashboard fetch <file>`: the loader chain, without the report gate.
pub async fn fetch(config: &AppConfig, file: &str) -> Result<()> {
    let (service, _events) = build_service(config, Arc::new(SessionState::in_memory()))?;
    let value = service.loader().load_json(file).await?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// `dashboard render <path>`.
pub async fn render(path: &Path, json: bool) -> Result<()> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| eyre!("cannot read {}: {e}", path.display()))?;
    let parts = split_tables(&text);

    if json {
        println!("{}", serde_json::to_string_pretty(&parts)?);
    } else {
        print_parts(&parts);
    }
    Ok(())
}

/// `dashboard history`.
pub async fn history(config: &AppConfig) -> Result<()> {
    let (service, _events) = build_service(config, Arc::new(SessionState::in_memory()))?;
    let analyses = service.load_history().await?;

    if analyses.is_empty() {
        println!("No analyses found.");
        return Ok(());
    }

    let headers: Vec<String> = ["Created", "Company", "Ticker", "Status", "Workflow"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows: Vec<Vec<String>> = analyses.iter().map(history_row).collect();
    for (i, line) in align_table(&headers, &rows).into_iter().enumerate() {
        if i == 0 {
            println!("{}", line.bold());
        } else {
            println!("{line}");
        }
    }
    Ok(())
}

fn history_row(analysis: &AnalysisSummary) -> Vec<String> {
    let created = match analysis.created_at_time() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => analysis.created_at.clone().unwrap_or_default(),
    };
    vec![
        created,
        analysis.company_name.clone().unwrap_or_default(),
        analysis.ticker.clone().unwrap_or_default(),
        analysis.status.clone().unwrap_or_else(|| "unknown".to_string()),
        analysis
            .workflow_id
            .clone()
            .unwrap_or_else(|| analysis.id.clone()),
    ]
}

/// `dashboard health`. Fails unless the backend reports `healthy`.
pub async fn health(config: &AppConfig) -> Result<()> {
    let (service, _events) = build_service(config, Arc::new(SessionState::in_memory()))?;
    let health = service.health().await?;

    let mut line = format!("status: {}", health.status);
    if let Some(version) = &health.version {
        line.push_str(&format!(", version {version}"));
    }
    if let Some(sessions) = health.active_sessions {
        line.push_str(&format!(", {sessions} active sessions"));
    }

    if health.is_healthy() {
        println!("{}", line.green());
        Ok(())
    } else {
        Err(eyre!("backend unhealthy ({line})"))
    }
}

fn print_document(document: &ReportDocument) {
    println!("{}", document.title.bold().underline());
    for error in &document.errors {
        println!("{}", format!("! {error}").red());
    }

    for section in &document.sections {
        println!();
        println!("{}", section.title.cyan().bold());
        if let Some(path) = section.image_path() {
            println!("{}", format!("[chart: {path}]").dimmed());
        }
        print_parts(&render_section(section));
        for point in &section.points {
            println!("  • {point}");
        }
    }
}

fn print_parts(parts: &[ContentPart]) {
    for part in parts {
        match part {
            ContentPart::Text { content } => println!("{}", content.trim_end()),
            ContentPart::Table { headers, rows } => {
                for line in align_table(headers, rows) {
                    println!("  {line}");
                }
            }
        }
    }
}
