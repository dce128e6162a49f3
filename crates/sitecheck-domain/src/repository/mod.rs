//! Repository trait definitions for data persistence

use sitecheck_types::{Error, Inspection};

/// Repository for submitted inspections
///
/// Collections are returned newest first.
pub trait InspectionRepository {
    /// Prepend a newly submitted inspection
    fn save(&self, inspection: &Inspection) -> Result<(), Error>;

    /// Find an inspection by its id
    fn find_by_id(&self, id: &str) -> Result<Option<Inspection>, Error>;

    /// Find all inspections
    fn find_all(&self) -> Result<Vec<Inspection>, Error>;

    /// Find inspections belonging to one client
    fn find_by_client(&self, client_id: &str) -> Result<Vec<Inspection>, Error> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|i| i.client_id == client_id)
            .collect())
    }
}
