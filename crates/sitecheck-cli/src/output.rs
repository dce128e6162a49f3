//! Output formatting module

use chrono::Local;
use serde::Serialize;

use sitecheck_app::app::{AttachReport, ClientDashboard, ImportOutcome, ManagerOverview};
use sitecheck_types::{Inspection, Metrics, OutputFormat, Result};

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn local_date(inspection: &Inspection) -> String {
    inspection
        .date
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

pub fn output_import(output_format: OutputFormat, outcome: &ImportOutcome) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(outcome.areas());
    }

    match outcome {
        ImportOutcome::Imported { file, areas } => {
            println!("Imported {} areas from {}", areas.len(), file);
            println!();
            for (idx, area) in areas.iter().enumerate() {
                println!("{:>3}. {}", idx + 1, area.name);
            }
        }
        ImportOutcome::NoAreasFound { file } => {
            println!("No areas found in {}", file);
        }
    }
    Ok(())
}

pub fn output_metrics(output_format: OutputFormat, metrics: &Metrics) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(metrics);
    }

    println!("Total inspections: {}", metrics.total);
    println!("Average score:     {}%", metrics.avg_score);
    println!("Pass rate:         {}%", metrics.pass_rate);
    println!("Last 7 days:       {}", metrics.last_7_days);
    Ok(())
}

fn print_inspection_rows<'a>(rows: impl Iterator<Item = (&'a Inspection, &'a str, usize)>) {
    println!(
        "{:<15} {:<17} {:<20} {:<20} {:<16} {:>5} {:<16} {:>6}",
        "ID", "Date", "Client", "Site", "Inspector", "Score", "Status", "Photos"
    );
    println!("{}", "-".repeat(122));

    for (inspection, client, photos) in rows {
        println!(
            "{:<15} {:<17} {:<20} {:<20} {:<16} {:>4}% {:<16} {:>6}",
            inspection.id,
            local_date(inspection),
            truncate(client, 20),
            truncate(&inspection.site, 20),
            truncate(&inspection.inspector, 16),
            inspection.score,
            inspection.status.label(),
            photos
        );
    }
}

pub fn output_inspections(output_format: OutputFormat, inspections: &[Inspection]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(inspections);
    }

    if inspections.is_empty() {
        println!("No inspections yet.");
        return Ok(());
    }

    print_inspection_rows(
        inspections
            .iter()
            .map(|i| (i, i.client_id.as_str(), i.photo_count())),
    );
    Ok(())
}

pub fn output_inspection(output_format: OutputFormat, inspection: &Inspection) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(inspection);
    }

    println!("\nInspection {}", inspection.id);
    println!("=================");
    println!("Date:      {}", local_date(inspection));
    println!("Client:    {}", inspection.client_id);
    println!("Site:      {}", inspection.site);
    println!("Inspector: {}", inspection.inspector);
    println!("Score:     {}% ({})", inspection.score, inspection.status.label());
    println!();

    println!("{:<32} {:>5} {:>6}  Notes", "Area", "Score", "Photos");
    println!("{}", "-".repeat(70));
    for area in &inspection.areas {
        println!(
            "{:<32} {:>4}% {:>6}  {}",
            truncate(&area.name, 32),
            area.score,
            area.stored_photos().len(),
            area.notes
        );
    }
    Ok(())
}

pub fn output_dashboard(
    output_format: OutputFormat,
    client_name: &str,
    dashboard: &ClientDashboard,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(dashboard);
    }

    println!("\n{}", client_name);
    println!("{}", "=".repeat(client_name.chars().count()));
    output_metrics(output_format, &dashboard.metrics)?;
    println!("Active sites:      {}", dashboard.active_sites);
    println!();

    if dashboard.recent.is_empty() {
        println!("No inspections yet.");
    } else {
        println!("Recent inspections:");
        output_inspections(output_format, &dashboard.recent)?;
    }
    Ok(())
}

pub fn output_overview(
    output_format: OutputFormat,
    manager_name: &str,
    overview: &ManagerOverview,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(overview);
    }

    println!("\nManager overview ({})", manager_name);
    println!("================");
    output_metrics(output_format, &overview.metrics)?;
    println!();

    if overview.rows.is_empty() {
        println!("No inspections yet.");
    } else {
        print_inspection_rows(
            overview
                .rows
                .iter()
                .map(|r| (&r.inspection, r.client_name.as_str(), r.photo_count)),
        );
    }
    Ok(())
}

/// Per-area photo attachment summary, printed to stderr
pub fn report_attach(area: &str, report: &AttachReport) {
    if report.rejected.is_empty() {
        return;
    }
    eprintln!(
        "{}: attached {} photo(s), skipped {}",
        area,
        report.attached,
        report.rejected.len()
    );
    for rejected in &report.rejected {
        eprintln!("  {}: {}", rejected.path.display(), rejected.reason);
    }
}
