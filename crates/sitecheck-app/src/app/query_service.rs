//! Query Service - read-only views over stored inspections
//!
//! - Client history and dashboard (own inspections only)
//! - Manager overview across every client

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use sitecheck_domain::repository::InspectionRepository;
use sitecheck_domain::service::compute_metrics;
use sitecheck_types::{Error, Inspection, Metrics};

use crate::roster::ClientRoster;

/// Number of inspections shown on a client dashboard
pub const DASHBOARD_RECENT_LIMIT: usize = 10;

/// Errors specific to the query service
#[derive(Debug, Error)]
pub enum QueryServiceError {
    #[error("Store not accessible: {0}")]
    StoreError(String),

    #[error("Entry not found: {0}")]
    NotFound(String),
}

impl From<Error> for QueryServiceError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => QueryServiceError::NotFound(msg),
            _ => QueryServiceError::StoreError(err.to_string()),
        }
    }
}

type QueryResult<T> = std::result::Result<T, QueryServiceError>;

/// Client-facing summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDashboard {
    pub metrics: Metrics,
    /// Sites on the client's roster entry, 0 for a client not on the roster
    pub active_sites: usize,
    /// Newest first, at most `DASHBOARD_RECENT_LIMIT`
    pub recent: Vec<Inspection>,
}

/// One line of the manager's inspection table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewRow {
    pub inspection: Inspection,
    pub client_name: String,
    pub photo_count: usize,
}

/// Manager-facing summary over all clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerOverview {
    pub metrics: Metrics,
    pub rows: Vec<OverviewRow>,
}

/// Inspections of one client, newest first
pub fn client_inspections<R: InspectionRepository>(
    repo: &R,
    client_id: &str,
) -> QueryResult<Vec<Inspection>> {
    Ok(repo.find_by_client(client_id)?)
}

pub fn client_dashboard<R: InspectionRepository>(
    repo: &R,
    roster: &ClientRoster,
    client_id: &str,
    now: DateTime<Utc>,
) -> QueryResult<ClientDashboard> {
    let mut inspections = client_inspections(repo, client_id)?;
    let metrics = compute_metrics(&inspections, now);
    inspections.truncate(DASHBOARD_RECENT_LIMIT);

    Ok(ClientDashboard {
        metrics,
        active_sites: roster.find(client_id).map(|c| c.sites.len()).unwrap_or(0),
        recent: inspections,
    })
}

pub fn manager_overview<R: InspectionRepository>(
    repo: &R,
    roster: &ClientRoster,
    now: DateTime<Utc>,
) -> QueryResult<ManagerOverview> {
    let inspections = repo.find_all()?;
    let metrics = compute_metrics(&inspections, now);

    let rows = inspections
        .into_iter()
        .map(|inspection| OverviewRow {
            client_name: roster.display_name(&inspection.client_id).to_string(),
            photo_count: inspection.photo_count(),
            inspection,
        })
        .collect();

    Ok(ManagerOverview { metrics, rows })
}

/// Look up one inspection, optionally restricted to a client
pub fn find_inspection<R: InspectionRepository>(
    repo: &R,
    id: &str,
    client_scope: Option<&str>,
) -> QueryResult<Inspection> {
    repo.find_by_id(id)?
        .filter(|i| client_scope.map(|c| i.client_id == c).unwrap_or(true))
        .ok_or_else(|| QueryServiceError::NotFound(format!("inspection {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use sitecheck_infra::persistence::KvInspectionRepository;
    use sitecheck_store::MemoryKeyValueStore;
    use sitecheck_types::{Area, InspectionStatus};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    fn inspection(id: &str, client_id: &str, score: u8, days_ago: i64) -> Inspection {
        let mut area = Area::new("Lobby").with_score(score as i64);
        area.photos = vec!["data:image/jpeg;base64,AA==".to_string(); 2];
        Inspection {
            id: id.to_string(),
            client_id: client_id.to_string(),
            site: "Main Office".to_string(),
            inspector: "Dana".to_string(),
            date: now() - Duration::days(days_ago),
            areas: vec![area],
            score,
            status: InspectionStatus::from_score(score),
        }
    }

    fn seeded() -> KvInspectionRepository<MemoryKeyValueStore> {
        let repo = KvInspectionRepository::new(MemoryKeyValueStore::new());
        // save prepends, so the last saved is newest
        for (i, days_ago) in (0..12).rev().enumerate() {
            let score = if i % 2 == 0 { 90 } else { 60 };
            repo.save(&inspection(&format!("b{}", i), "bcs-office", score, days_ago))
                .unwrap();
        }
        repo.save(&inspection("x1", "unknown-co", 100, 1)).unwrap();
        repo
    }

    #[test]
    fn test_client_dashboard() {
        let repo = seeded();
        let dashboard = client_dashboard(&repo, &ClientRoster::demo(), "bcs-office", now()).unwrap();

        assert_eq!(dashboard.metrics.total, 12);
        assert_eq!(dashboard.metrics.avg_score, 75);
        assert_eq!(dashboard.metrics.pass_rate, 50);
        assert_eq!(dashboard.metrics.last_7_days, 8);
        assert_eq!(dashboard.active_sites, 2);
        assert_eq!(dashboard.recent.len(), 10);
        assert_eq!(dashboard.recent[0].id, "b11");
        assert!(dashboard.recent.iter().all(|i| i.client_id == "bcs-office"));
    }

    #[test]
    fn test_dashboard_for_client_without_inspections() {
        let repo = seeded();
        let dashboard = client_dashboard(&repo, &ClientRoster::demo(), "nobody", now()).unwrap();
        assert_eq!(dashboard.metrics, Metrics::default());
        assert_eq!(dashboard.active_sites, 0);
        assert!(dashboard.recent.is_empty());
    }

    #[test]
    fn test_dashboard_counts_roster_sites() {
        let roster = ClientRoster::load_from_str(
            r#"
[[clients]]
id = "acme"
name = "Acme Towers"
password = "pw"
sites = ["Tower A", "Tower B", "Garage"]
"#,
        )
        .unwrap();
        let dashboard = client_dashboard(&seeded(), &roster, "acme", now()).unwrap();
        assert_eq!(dashboard.active_sites, 3);
        assert!(dashboard.recent.is_empty());

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["activeSites"], 3);
    }

    #[test]
    fn test_manager_overview() {
        let repo = seeded();
        let overview = manager_overview(&repo, &ClientRoster::demo(), now()).unwrap();

        assert_eq!(overview.metrics.total, 13);
        assert_eq!(overview.rows.len(), 13);
        assert_eq!(overview.rows[0].client_name, "unknown-co");
        assert_eq!(overview.rows[1].client_name, "BCS Headquarters");
        assert_eq!(overview.rows[1].photo_count, 2);
    }

    #[test]
    fn test_find_inspection_respects_scope() {
        let repo = seeded();
        assert_eq!(find_inspection(&repo, "x1", None).unwrap().client_id, "unknown-co");
        assert!(find_inspection(&repo, "x1", Some("unknown-co")).is_ok());
        assert!(matches!(
            find_inspection(&repo, "x1", Some("bcs-office")),
            Err(QueryServiceError::NotFound(_))
        ));
        assert!(matches!(
            find_inspection(&repo, "nope", None),
            Err(QueryServiceError::NotFound(_))
        ));
    }
}
