//! Use cases

pub mod draft;
pub mod query_service;
pub mod submission_service;

pub use draft::InspectionDraft;
pub use query_service::{
    client_dashboard, client_inspections, find_inspection, manager_overview, ClientDashboard,
    ManagerOverview, OverviewRow, QueryServiceError,
};
pub use submission_service::{
    attach_photo_files, attach_photo_files_with_progress, import_checklist, submit, AttachReport,
    ImportOutcome, SubmissionError,
};
