//! Submission Service - checklist import, photo attachment and submission
//!
//! Submitting runs in this order:
//! 1. Check the draft against the submission gate
//! 2. Score the areas
//! 3. Pick an id that is not already stored
//! 4. Prepend the inspection to the stored collection

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use sitecheck_domain::repository::InspectionRepository;
use sitecheck_domain::service::score_inspection;
use sitecheck_infra::checklist;
use sitecheck_infra::photo::{compress_batch_with_progress, CompressOptions, PhotoInput};
use sitecheck_types::{Area, ChecklistError, Error, Inspection, PhotoError};

use super::draft::InspectionDraft;

/// Errors specific to the submission service
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Please add at least one area")]
    NoAreas,

    #[error("Draft is incomplete: {0}")]
    Incomplete(String),

    #[error("Checklist import failed: {0}")]
    Checklist(ChecklistError),

    #[error("Photo attachment failed: {0}")]
    Photo(PhotoError),

    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<Error> for SubmissionError {
    fn from(err: Error) -> Self {
        match err {
            Error::NoAreas => SubmissionError::NoAreas,
            Error::Validation(msg) => SubmissionError::Incomplete(msg),
            Error::NotFound(msg) => SubmissionError::NotFound(msg),
            Error::Checklist(e) => SubmissionError::Checklist(e),
            Error::Photo(e) => SubmissionError::Photo(e),
            _ => SubmissionError::StoreError(err.to_string()),
        }
    }
}

/// Result of importing a checklist file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported { file: String, areas: Vec<Area> },
    /// The file parsed but yielded no area names
    NoAreasFound { file: String },
}

impl ImportOutcome {
    pub fn areas(&self) -> &[Area] {
        match self {
            ImportOutcome::Imported { areas, .. } => areas,
            ImportOutcome::NoAreasFound { .. } => &[],
        }
    }

    pub fn into_areas(self) -> Vec<Area> {
        match self {
            ImportOutcome::Imported { areas, .. } => areas,
            ImportOutcome::NoAreasFound { .. } => Vec::new(),
        }
    }
}

/// Read a checklist file into unscored areas
pub fn import_checklist(path: &Path) -> std::result::Result<ImportOutcome, SubmissionError> {
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let areas = checklist::parse_file(path).map_err(Error::from)?;

    if areas.is_empty() {
        tracing::warn!(file = %file, "no areas found in checklist");
        return Ok(ImportOutcome::NoAreasFound { file });
    }

    tracing::info!(file = %file, areas = areas.len(), "imported checklist");
    Ok(ImportOutcome::Imported { file, areas })
}

/// File that could not be attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPhoto {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of attaching a batch of photo files to one area
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttachReport {
    pub attached: usize,
    pub rejected: Vec<RejectedPhoto>,
}

/// Compress `paths` and append the results to area `area_idx`
///
/// Successful photos and rejections both keep selection order; every
/// unreadable or undecodable file is reported on its own and does not stop
/// the others.
pub fn attach_photo_files(
    draft: &mut InspectionDraft,
    area_idx: usize,
    paths: &[PathBuf],
    options: &CompressOptions,
    jobs: usize,
) -> std::result::Result<AttachReport, SubmissionError> {
    attach_photo_files_with_progress(draft, area_idx, paths, options, jobs, &|| {})
}

/// Like [`attach_photo_files`], calling `on_done` once per path as it is handled
pub fn attach_photo_files_with_progress(
    draft: &mut InspectionDraft,
    area_idx: usize,
    paths: &[PathBuf],
    options: &CompressOptions,
    jobs: usize,
    on_done: &(dyn Fn() + Sync),
) -> std::result::Result<AttachReport, SubmissionError> {
    if area_idx >= draft.areas.len() {
        return Err(SubmissionError::NotFound(format!("area #{}", area_idx + 1)));
    }
    options.validate().map_err(Error::from)?;

    // One slot per path; read failures are filled in before compression runs
    let mut outcomes: Vec<Option<std::result::Result<String, String>>> = vec![None; paths.len()];
    let mut inputs = Vec::with_capacity(paths.len());
    let mut input_slots = Vec::with_capacity(paths.len());
    for (slot, path) in paths.iter().enumerate() {
        match PhotoInput::from_file(path) {
            Ok(input) => {
                inputs.push(input);
                input_slots.push(slot);
            }
            Err(e) => {
                outcomes[slot] = Some(Err(e.to_string()));
                on_done();
            }
        }
    }

    for (result, slot) in compress_batch_with_progress(&inputs, options, jobs, on_done)
        .into_iter()
        .zip(input_slots)
    {
        outcomes[slot] = Some(result.map_err(|e| e.to_string()));
    }

    let mut report = AttachReport::default();
    let mut encoded = Vec::with_capacity(inputs.len());
    for (path, outcome) in paths.iter().zip(outcomes) {
        match outcome {
            Some(Ok(url)) => encoded.push(url),
            Some(Err(reason)) => {
                tracing::warn!(photo = %path.display(), error = %reason, "photo rejected");
                report.rejected.push(RejectedPhoto {
                    path: path.clone(),
                    reason,
                });
            }
            None => report.rejected.push(RejectedPhoto {
                path: path.clone(),
                reason: "compression did not complete".to_string(),
            }),
        }
    }

    report.attached = encoded.len();
    draft.attach_photos(area_idx, encoded)?;

    tracing::debug!(
        area = %draft.areas[area_idx].name,
        attached = report.attached,
        rejected = report.rejected.len(),
        "attached photos"
    );
    Ok(report)
}

/// Millisecond timestamp id, bumped past any id already taken
fn unique_id(now: DateTime<Utc>, taken: &HashSet<String>) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let candidate = millis.to_string();
        if !taken.contains(&candidate) {
            return candidate;
        }
        millis += 1;
    }
}

/// Score the draft and store it as a new inspection dated `now`
pub fn submit<R: InspectionRepository>(
    draft: &InspectionDraft,
    repo: &R,
    now: DateTime<Utc>,
) -> std::result::Result<Inspection, SubmissionError> {
    // Step 1: Gate
    draft.validate()?;

    // Step 2: Score
    let scored = score_inspection(&draft.areas)?;

    // Step 3: Id
    let taken: HashSet<String> = repo.find_all()?.into_iter().map(|i| i.id).collect();
    let id = unique_id(now, &taken);

    // Step 4: Store
    let inspection = Inspection {
        id,
        client_id: draft.client_id.trim().to_string(),
        site: draft.site.trim().to_string(),
        inspector: draft.inspector.trim().to_string(),
        date: now,
        areas: draft.areas.clone(),
        score: scored.score,
        status: scored.status,
    };
    repo.save(&inspection)?;

    tracing::info!(
        id = %inspection.id,
        score = inspection.score,
        status = %inspection.status,
        "inspection submitted"
    );
    Ok(inspection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use image::{ImageBuffer, Rgb};
    use sitecheck_infra::persistence::KvInspectionRepository;
    use sitecheck_store::MemoryKeyValueStore;
    use sitecheck_types::InspectionStatus;
    use std::fs;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap()
    }

    fn scored_draft() -> InspectionDraft {
        let mut draft = InspectionDraft::new("bcs-office", "Main Office", "Dana");
        draft.replace_areas(vec![
            Area::new("Lobby").with_score(90),
            Area::new("Restrooms").with_score(70),
            Area::new("Kitchen").with_score(85),
        ]);
        draft
    }

    #[test]
    fn test_import_checklist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        fs::write(&path, "Task,Notes\nLobby,daily\nRestrooms,\n").unwrap();

        let outcome = import_checklist(&path).unwrap();
        let names: Vec<_> = outcome.areas().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Lobby", "Restrooms"]);
        assert!(outcome.areas().iter().all(|a| a.score == 100));
    }

    #[test]
    fn test_import_checklist_with_no_areas() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "Daily Checklist\n\n").unwrap();

        assert_eq!(
            import_checklist(&path).unwrap(),
            ImportOutcome::NoAreasFound {
                file: "empty.txt".to_string()
            }
        );
    }

    #[test]
    fn test_import_checklist_rejects_unknown_kind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.xlsx");
        fs::write(&path, "x").unwrap();
        assert!(matches!(
            import_checklist(&path),
            Err(SubmissionError::Checklist(_))
        ));
    }

    #[test]
    fn test_attach_photo_files_reports_bad_file() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        ImageBuffer::from_pixel(40, 20, Rgb([10u8, 200, 30]))
            .save(&good)
            .unwrap();
        let bad = dir.path().join("bad.jpg");
        fs::write(&bad, b"not an image").unwrap();
        let missing = dir.path().join("missing.jpg");

        let mut draft = scored_draft();
        let report = attach_photo_files(
            &mut draft,
            0,
            &[good.clone(), bad.clone(), missing.clone(), good],
            &CompressOptions::default(),
            2,
        )
        .unwrap();

        assert_eq!(report.attached, 2);
        let rejected: Vec<_> = report.rejected.iter().map(|r| r.path.clone()).collect();
        assert_eq!(rejected, vec![bad, missing]);
        assert_eq!(draft.areas[0].photos.len(), 2);
        assert!(draft.areas[0].photos[0].starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_attach_rejections_follow_selection_order() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.png");
        ImageBuffer::from_pixel(16, 16, Rgb([200u8, 10, 10]))
            .save(&good)
            .unwrap();
        let missing = dir.path().join("gone.jpg");
        let corrupt = dir.path().join("corrupt.png");
        fs::write(&corrupt, b"\x89PNG truncated").unwrap();
        let also_missing = dir.path().join("gone-too.jpg");

        let mut draft = scored_draft();
        let finished = std::sync::atomic::AtomicUsize::new(0);
        let report = attach_photo_files_with_progress(
            &mut draft,
            1,
            &[corrupt.clone(), missing.clone(), good, also_missing.clone()],
            &CompressOptions::default(),
            3,
            &|| {
                finished.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            },
        )
        .unwrap();

        assert_eq!(report.attached, 1);
        let rejected: Vec<_> = report.rejected.iter().map(|r| r.path.clone()).collect();
        assert_eq!(rejected, vec![corrupt, missing, also_missing]);
        assert_eq!(finished.load(std::sync::atomic::Ordering::SeqCst), 4);
        assert_eq!(draft.areas[1].photos.len(), 1);
    }

    #[test]
    fn test_photo_errors_keep_their_kind() {
        let err = SubmissionError::from(Error::from(PhotoError::Decode {
            photo: "door.jpg".to_string(),
            reason: "bad marker".to_string(),
        }));
        assert!(matches!(err, SubmissionError::Photo(PhotoError::Decode { .. })));

        let err = SubmissionError::from(Error::from(PhotoError::InvalidOptions("q".to_string())));
        assert!(matches!(err, SubmissionError::Photo(PhotoError::InvalidOptions(_))));
    }

    #[test]
    fn test_attach_to_missing_area() {
        let mut draft = scored_draft();
        assert!(matches!(
            attach_photo_files(&mut draft, 9, &[], &CompressOptions::default(), 1),
            Err(SubmissionError::NotFound(_))
        ));
    }

    #[test]
    fn test_submit_scores_and_prepends() {
        let repo = KvInspectionRepository::new(MemoryKeyValueStore::new());

        let first = submit(&scored_draft(), &repo, now()).unwrap();
        assert_eq!(first.score, 82);
        assert_eq!(first.status, InspectionStatus::Passed);
        assert_eq!(first.id, now().timestamp_millis().to_string());

        let mut failing = scored_draft();
        failing.set_score(0, 10).unwrap();
        let second = submit(&failing, &repo, now()).unwrap();
        assert_eq!(second.status, InspectionStatus::NeedsAttention);
        assert_eq!(second.id, (now().timestamp_millis() + 1).to_string());

        let stored = repo.find_all().unwrap();
        assert_eq!(stored[0].id, second.id);
        assert_eq!(stored[1].id, first.id);
    }

    #[test]
    fn test_submit_rejects_incomplete_draft() {
        let repo = KvInspectionRepository::new(MemoryKeyValueStore::new());

        let mut draft = scored_draft();
        draft.replace_areas(Vec::new());
        assert!(matches!(
            submit(&draft, &repo, now()),
            Err(SubmissionError::NoAreas)
        ));

        let mut draft = scored_draft();
        draft.inspector.clear();
        assert!(matches!(
            submit(&draft, &repo, now()),
            Err(SubmissionError::Incomplete(_))
        ));
        assert!(repo.find_all().unwrap().is_empty());
    }
}
