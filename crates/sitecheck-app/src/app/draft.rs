//! Inspection being prepared for submission

use sitecheck_types::{Area, Error, Result};

/// Mutable pre-submission state
///
/// Areas come from a checklist import or are added by hand; scores, notes
/// and photos are edited in place until the draft passes `validate`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionDraft {
    pub client_id: String,
    pub site: String,
    pub inspector: String,
    pub areas: Vec<Area>,
}

impl InspectionDraft {
    pub fn new(
        client_id: impl Into<String>,
        site: impl Into<String>,
        inspector: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            site: site.into(),
            inspector: inspector.into(),
            areas: Vec::new(),
        }
    }

    /// Replace the area list wholesale (checklist import)
    pub fn replace_areas(&mut self, areas: Vec<Area>) {
        self.areas = areas;
    }

    /// Append an unscored area, returning its index
    pub fn add_area(&mut self, name: impl Into<String>) -> usize {
        self.areas.push(Area::new(name));
        self.areas.len() - 1
    }

    pub fn remove_area(&mut self, idx: usize) -> Result<Area> {
        self.check_area(idx)?;
        Ok(self.areas.remove(idx))
    }

    pub fn rename_area(&mut self, idx: usize, name: impl Into<String>) -> Result<()> {
        self.area_mut(idx)?.name = name.into();
        Ok(())
    }

    /// Set an area's score, clamped to [0, 100]
    pub fn set_score(&mut self, idx: usize, score: i64) -> Result<()> {
        self.area_mut(idx)?.set_score(score);
        Ok(())
    }

    pub fn set_notes(&mut self, idx: usize, notes: impl Into<String>) -> Result<()> {
        self.area_mut(idx)?.notes = notes.into();
        Ok(())
    }

    /// Append encoded photos to an area, keeping their order
    pub fn attach_photos(&mut self, idx: usize, encoded: Vec<String>) -> Result<()> {
        self.area_mut(idx)?.photos.extend(encoded);
        Ok(())
    }

    pub fn remove_photo(&mut self, idx: usize, photo_idx: usize) -> Result<String> {
        let area = self.area_mut(idx)?;
        if photo_idx >= area.photos.len() {
            return Err(Error::NotFound(format!(
                "photo #{} of area '{}'",
                photo_idx + 1,
                area.name
            )));
        }
        Ok(area.photos.remove(photo_idx))
    }

    pub fn clear_photos(&mut self, idx: usize) -> Result<()> {
        self.area_mut(idx)?.photos.clear();
        Ok(())
    }

    /// Index of the first area with this exact name
    pub fn find_area(&self, name: &str) -> Option<usize> {
        self.areas.iter().position(|a| a.name == name)
    }

    pub fn photo_count(&self) -> usize {
        self.areas.iter().map(|a| a.photos.len()).sum()
    }

    /// Submission gate
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(Error::Validation("client is required".to_string()));
        }
        if self.site.trim().is_empty() {
            return Err(Error::Validation("site is required".to_string()));
        }
        if self.inspector.trim().is_empty() {
            return Err(Error::Validation("inspector is required".to_string()));
        }
        if self.areas.is_empty() {
            return Err(Error::NoAreas);
        }
        if let Some(pos) = self.areas.iter().position(|a| a.name.trim().is_empty()) {
            return Err(Error::Validation(format!("area #{} has no name", pos + 1)));
        }
        Ok(())
    }

    fn check_area(&self, idx: usize) -> Result<()> {
        if idx >= self.areas.len() {
            return Err(Error::NotFound(format!("area #{}", idx + 1)));
        }
        Ok(())
    }

    fn area_mut(&mut self, idx: usize) -> Result<&mut Area> {
        self.check_area(idx)?;
        Ok(&mut self.areas[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> InspectionDraft {
        let mut draft = InspectionDraft::new("bcs-office", "Main Office", "Dana");
        draft.replace_areas(vec![Area::new("Lobby"), Area::new("Restrooms")]);
        draft
    }

    #[test]
    fn test_add_and_edit_area() {
        let mut draft = draft();
        let idx = draft.add_area("Kitchen");
        assert_eq!(idx, 2);
        assert_eq!(draft.areas[idx].score, 100);

        draft.set_score(idx, 140).unwrap();
        assert_eq!(draft.areas[idx].score, 100);
        draft.set_score(idx, -3).unwrap();
        assert_eq!(draft.areas[idx].score, 0);

        draft.rename_area(idx, "Break Room").unwrap();
        draft.set_notes(idx, "sink stained").unwrap();
        assert_eq!(draft.find_area("Break Room"), Some(2));
        assert_eq!(draft.areas[2].notes, "sink stained");

        let removed = draft.remove_area(0).unwrap();
        assert_eq!(removed.name, "Lobby");
        assert_eq!(draft.areas.len(), 2);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut draft = draft();
        assert!(matches!(draft.set_score(5, 50), Err(Error::NotFound(_))));
        assert!(matches!(draft.remove_area(2), Err(Error::NotFound(_))));
        assert!(matches!(draft.remove_photo(0, 0), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_photos_keep_order() {
        let mut draft = draft();
        draft
            .attach_photos(1, vec!["a".to_string(), "b".to_string()])
            .unwrap();
        draft.attach_photos(1, vec!["c".to_string()]).unwrap();
        assert_eq!(draft.areas[1].photos, vec!["a", "b", "c"]);
        assert_eq!(draft.photo_count(), 3);

        assert_eq!(draft.remove_photo(1, 1).unwrap(), "b");
        assert_eq!(draft.areas[1].photos, vec!["a", "c"]);

        draft.clear_photos(1).unwrap();
        assert_eq!(draft.photo_count(), 0);
    }

    #[test]
    fn test_validate() {
        assert!(draft().validate().is_ok());

        let mut empty = draft();
        empty.replace_areas(Vec::new());
        assert!(matches!(empty.validate(), Err(Error::NoAreas)));

        let mut no_site = draft();
        no_site.site = "  ".to_string();
        assert!(matches!(no_site.validate(), Err(Error::Validation(_))));

        let mut blank_area = draft();
        blank_area.rename_area(0, " ").unwrap();
        assert!(matches!(blank_area.validate(), Err(Error::Validation(_))));
    }
}
