//! Command handlers

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use sitecheck_app::app::{
    self, attach_photo_files_with_progress, import_checklist, InspectionDraft, QueryServiceError,
    SubmissionError,
};
use sitecheck_app::auth::{login_client, login_manager, Session};
use sitecheck_app::config::Config;
use sitecheck_app::repository::open_inspection_repo;
use sitecheck_app::roster::ClientRoster;
use sitecheck_app::scanner::scan_directory;
use sitecheck_domain::repository::InspectionRepository;
use sitecheck_domain::service::metrics;
use sitecheck_infra::photo::{compress_batch_with_progress, decode_data_url, CompressOptions, PhotoInput};
use sitecheck_types::{Error, OutputFormat, Result, StoreError};

use crate::cli::{Cli, Commands, LoginRole};
use crate::output::{
    output_dashboard, output_import, output_inspection, output_inspections, output_metrics,
    output_overview, report_attach,
};

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref store_dir) = cli.store_dir {
        config.store_dir = Some(store_dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);
    tracing::debug!(store_dir = ?config.store_dir, format = %output_format, "configuration loaded");

    match &cli.command {
        Commands::Import { file } => cmd_import(file, output_format),

        Commands::Compress {
            images,
            output,
            max_width,
            quality,
            jobs,
        } => {
            let options = CompressOptions::new(
                max_width.unwrap_or(config.max_photo_width),
                quality.unwrap_or(config.photo_quality),
            );
            let jobs = jobs.unwrap_or(config.photo_jobs);
            cmd_compress(images, output.as_deref(), &options, jobs, output_format)
        }

        Commands::Submit {
            client,
            site,
            inspector,
            checklist,
            areas,
            scores,
            notes,
            photos,
            photo_dirs,
            jobs,
        } => {
            let draft = InspectionDraft::new(client.as_str(), site.as_str(), inspector.as_str());
            let edits = DraftEdits {
                checklist: checklist.as_deref(),
                areas,
                scores,
                notes,
                photos,
                photo_dirs,
            };
            let jobs = jobs.unwrap_or(config.photo_jobs);
            cmd_submit(&config, draft, edits, jobs, output_format)
        }

        Commands::List { client, limit } => {
            cmd_list(&config, client.as_deref(), *limit, output_format)
        }

        Commands::Show { id, client } => cmd_show(&config, id, client.as_deref(), output_format),

        Commands::Metrics { client } => cmd_metrics(&config, client.as_deref(), output_format),

        Commands::Login { role } => cmd_login(&config, role, output_format),

        Commands::ExportPhoto {
            id,
            area,
            number,
            output,
        } => cmd_export_photo(&config, id, area, *number, output),

        Commands::Config {
            show,
            set_store_dir,
            set_store_key,
            set_roster,
            set_manager_password,
            set_max_width,
            set_quality,
            set_jobs,
            set_output,
            reset,
        } => cmd_config(
            *show,
            ConfigUpdates {
                store_dir: set_store_dir.clone(),
                store_key: set_store_key.clone(),
                roster: set_roster.clone(),
                manager_password: set_manager_password.clone(),
                max_width: *set_max_width,
                quality: *set_quality,
                jobs: *set_jobs,
                output: *set_output,
            },
            *reset,
        ),
    }
}

fn submission_error(err: SubmissionError) -> Error {
    match err {
        SubmissionError::NoAreas => Error::NoAreas,
        SubmissionError::NotFound(msg) => Error::NotFound(msg),
        SubmissionError::Checklist(e) => Error::Checklist(e),
        SubmissionError::Photo(e) => Error::Photo(e),
        SubmissionError::StoreError(msg) => Error::Store(StoreError::IoError(msg)),
        SubmissionError::Incomplete(msg) => Error::Validation(msg),
    }
}

fn query_error(err: QueryServiceError) -> Error {
    match err {
        QueryServiceError::NotFound(msg) => Error::NotFound(msg),
        QueryServiceError::StoreError(msg) => Error::Store(StoreError::IoError(msg)),
    }
}

fn photo_progress(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn cmd_import(file: &Path, output_format: OutputFormat) -> Result<()> {
    let outcome = import_checklist(file).map_err(submission_error)?;
    output_import(output_format, &outcome)
}

fn cmd_compress(
    images: &[PathBuf],
    output: Option<&Path>,
    options: &CompressOptions,
    jobs: usize,
    output_format: OutputFormat,
) -> Result<()> {
    options.validate()?;

    let mut inputs = Vec::with_capacity(images.len());
    for image in images {
        match PhotoInput::from_file(image) {
            Ok(input) => inputs.push(input),
            Err(e) => eprintln!("{}: {}", image.display(), e),
        }
    }

    let pb = photo_progress(inputs.len() as u64);
    pb.set_message("compressing");
    let results = compress_batch_with_progress(&inputs, options, jobs, &|| pb.inc(1));
    pb.finish_and_clear();

    if let Some(dir) = output {
        fs::create_dir_all(dir)?;
    }

    let mut summary = Vec::new();
    let mut failed = 0;
    for (input, result) in inputs.iter().zip(results) {
        let url = match result {
            Ok(url) => url,
            Err(e) => {
                eprintln!("{}", e);
                failed += 1;
                continue;
            }
        };
        let jpeg = decode_data_url(&url)?;

        let mut written = None;
        if let Some(dir) = output {
            let stem = Path::new(&input.name)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "photo".to_string());
            let path = dir.join(format!("{}.jpg", stem));
            fs::write(&path, &jpeg)?;
            written = Some(path.display().to_string());
        }

        if output_format == OutputFormat::Table {
            println!(
                "{:<40} {:>9} -> {:>9} bytes{}",
                input.name,
                input.bytes.len(),
                jpeg.len(),
                written.as_deref().map(|p| format!("  ({})", p)).unwrap_or_default()
            );
        }
        summary.push(serde_json::json!({
            "file": input.name,
            "originalBytes": input.bytes.len(),
            "compressedBytes": jpeg.len(),
            "output": written,
        }));
    }

    if output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    if failed > 0 {
        eprintln!("{} of {} photo(s) could not be compressed", failed, images.len());
    }
    Ok(())
}

/// Draft edits collected from `submit` arguments, applied in this order
struct DraftEdits<'a> {
    checklist: Option<&'a Path>,
    areas: &'a [String],
    scores: &'a [String],
    notes: &'a [String],
    photos: &'a [String],
    photo_dirs: &'a [String],
}

/// Split an `AREA=VALUE` argument
fn parse_assignment<'a>(arg: &'a str, flag: &str) -> Result<(&'a str, &'a str)> {
    arg.split_once('=')
        .map(|(area, value)| (area.trim(), value.trim()))
        .filter(|(area, _)| !area.is_empty())
        .ok_or_else(|| Error::Validation(format!("--{} expects AREA=VALUE, got '{}'", flag, arg)))
}

fn area_index(draft: &InspectionDraft, name: &str) -> Result<usize> {
    draft
        .find_area(name)
        .ok_or_else(|| Error::NotFound(format!("area '{}'", name)))
}

fn cmd_submit(
    config: &Config,
    mut draft: InspectionDraft,
    edits: DraftEdits<'_>,
    jobs: usize,
    output_format: OutputFormat,
) -> Result<()> {
    if let Some(path) = edits.checklist {
        let outcome = import_checklist(path).map_err(submission_error)?;
        if let app::ImportOutcome::NoAreasFound { ref file } = outcome {
            eprintln!("No areas found in {}", file);
        }
        draft.replace_areas(outcome.into_areas());
    }
    for name in edits.areas {
        draft.add_area(name.trim());
    }

    for arg in edits.scores {
        let (area, value) = parse_assignment(arg, "score")?;
        let score: i64 = value
            .parse()
            .map_err(|_| Error::Validation(format!("score for '{}' is not a number: {}", area, value)))?;
        let idx = area_index(&draft, area)?;
        draft.set_score(idx, score)?;
    }
    for arg in edits.notes {
        let (area, value) = parse_assignment(arg, "notes")?;
        let idx = area_index(&draft, area)?;
        draft.set_notes(idx, value)?;
    }

    // Group photos per area, keeping argument order
    let mut groups: Vec<(usize, Vec<PathBuf>)> = Vec::new();
    for arg in edits.photos {
        let (area, path) = parse_assignment(arg, "photo")?;
        groups.push((area_index(&draft, area)?, vec![PathBuf::from(path)]));
    }
    for arg in edits.photo_dirs {
        let (area, dir) = parse_assignment(arg, "photo-dir")?;
        let idx = area_index(&draft, area)?;
        groups.push((idx, scan_directory(Path::new(dir))?));
    }

    if !groups.is_empty() {
        let options = config.compress_options();
        let total: usize = groups.iter().map(|(_, paths)| paths.len()).sum();
        let pb = photo_progress(total as u64);

        let mut reports = Vec::with_capacity(groups.len());
        for (idx, paths) in &groups {
            let area = draft.areas[*idx].name.clone();
            pb.set_message(area.clone());
            let report =
                attach_photo_files_with_progress(&mut draft, *idx, paths, &options, jobs, &|| pb.inc(1))
                    .map_err(submission_error)?;
            reports.push((area, report));
        }
        pb.finish_and_clear();

        for (area, report) in &reports {
            report_attach(area, report);
        }
    }

    let repo = open_inspection_repo(config)?;
    let inspection = app::submit(&draft, &repo, Utc::now()).map_err(submission_error)?;

    if output_format == OutputFormat::Table {
        println!(
            "Submitted inspection {} ({}%, {})",
            inspection.id,
            inspection.score,
            inspection.status.label()
        );
    }
    output_inspection(output_format, &inspection)
}

fn cmd_list(
    config: &Config,
    client: Option<&str>,
    limit: usize,
    output_format: OutputFormat,
) -> Result<()> {
    let repo = open_inspection_repo(config)?;
    let mut inspections = match client {
        Some(client_id) => app::client_inspections(&repo, client_id).map_err(query_error)?,
        None => repo.find_all()?,
    };

    let total = inspections.len();
    inspections.truncate(limit);
    output_inspections(output_format, &inspections)?;

    if output_format == OutputFormat::Table && total > limit {
        println!();
        println!("... and {} more inspections", total - limit);
    }
    Ok(())
}

fn cmd_show(
    config: &Config,
    id: &str,
    client: Option<&str>,
    output_format: OutputFormat,
) -> Result<()> {
    let repo = open_inspection_repo(config)?;
    let inspection = app::find_inspection(&repo, id, client).map_err(query_error)?;
    output_inspection(output_format, &inspection)
}

fn cmd_metrics(config: &Config, client: Option<&str>, output_format: OutputFormat) -> Result<()> {
    let repo = open_inspection_repo(config)?;
    let inspections = match client {
        Some(client_id) => app::client_inspections(&repo, client_id).map_err(query_error)?,
        None => repo.find_all()?,
    };
    output_metrics(output_format, &metrics(&inspections))
}

fn cmd_login(config: &Config, role: &LoginRole, output_format: OutputFormat) -> Result<()> {
    let roster = ClientRoster::from_config(config)?;
    let session = match role {
        LoginRole::Client { id, password } => login_client(&roster, id, password)?,
        LoginRole::Manager { name, password } => login_manager(config, name, password)?,
    };

    let repo = open_inspection_repo(config)?;
    let now = Utc::now();
    match session {
        Session::Client { ref client } => {
            let dashboard = app::client_dashboard(&repo, &roster, &client.id, now).map_err(query_error)?;
            output_dashboard(output_format, session.display_name(), &dashboard)
        }
        Session::Manager { ref name } => {
            let overview = app::manager_overview(&repo, &roster, now).map_err(query_error)?;
            output_overview(output_format, name, &overview)
        }
    }
}

fn cmd_export_photo(
    config: &Config,
    id: &str,
    area_name: &str,
    number: usize,
    output: &Path,
) -> Result<()> {
    let repo = open_inspection_repo(config)?;
    let inspection = app::find_inspection(&repo, id, None).map_err(query_error)?;

    let area = inspection
        .areas
        .iter()
        .find(|a| a.name == area_name)
        .ok_or_else(|| Error::NotFound(format!("area '{}' in inspection {}", area_name, id)))?;
    let photos = area.stored_photos();
    let photo = number
        .checked_sub(1)
        .and_then(|idx| photos.get(idx).copied())
        .ok_or_else(|| {
            Error::NotFound(format!(
                "photo #{} of area '{}' ({} stored)",
                number,
                area_name,
                photos.len()
            ))
        })?;

    let jpeg = decode_data_url(photo)?;
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, &jpeg)?;

    println!("Wrote {} ({} bytes)", output.display(), jpeg.len());
    Ok(())
}

/// `config --set-*` values
struct ConfigUpdates {
    store_dir: Option<PathBuf>,
    store_key: Option<String>,
    roster: Option<PathBuf>,
    manager_password: Option<String>,
    max_width: Option<u32>,
    quality: Option<f32>,
    jobs: Option<usize>,
    output: Option<OutputFormat>,
}

fn cmd_config(show: bool, updates: ConfigUpdates, reset: bool) -> Result<()> {
    if reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(store_dir) = updates.store_dir {
        config.store_dir = Some(store_dir);
        modified = true;
    }

    if let Some(store_key) = updates.store_key {
        config.store_key = store_key;
        modified = true;
    }

    if let Some(roster) = updates.roster {
        // Fail early on a roster that would break every login
        ClientRoster::load_from_file(&roster)?;
        config.roster_path = Some(roster);
        modified = true;
    }

    if let Some(password) = updates.manager_password {
        config.manager_password = password;
        modified = true;
    }

    if let Some(max_width) = updates.max_width {
        config.max_photo_width = max_width;
        modified = true;
    }

    if let Some(quality) = updates.quality {
        config.photo_quality = quality;
        modified = true;
    }

    if let Some(jobs) = updates.jobs {
        config.photo_jobs = jobs;
        modified = true;
    }

    if let Some(output_format) = updates.output {
        config.output_format = output_format;
        modified = true;
    }

    if modified {
        config.compress_options().validate()?;
        config.save()?;
        println!("Configuration updated");
    }

    if show || !modified {
        println!("{}", config);
    }

    Ok(())
}
