//! Résumé form model — a multi-section editor over one document.
//!
//! DESIGN
//! ======
//! The form holds a draft `Resume` and exposes typed array operations
//! (add/remove/update per section) instead of a stringly field path API.
//! Saving writes the draft verbatim with a bumped version and a fresh
//! last-updated timestamp; merge/array semantics never panic on
//! out-of-range indices (they are no-ops).

#[cfg(test)]
#[path = "resume_test.rs"]
mod tests;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::net::documents::{DocumentStore, RESUMES_COLLECTION, StoreError};
use crate::net::types::{CertificationEntry, EducationEntry, ExperienceEntry, ProjectEntry, Resume};

/// Editable résumé draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResumeForm {
    draft: Resume,
}

impl ResumeForm {
    /// Blank form: empty scalars plus one blank entry per section, matching
    /// what the editor presents for a brand-new résumé.
    #[must_use]
    pub fn new() -> Self {
        Self {
            draft: Resume {
                experience: vec![ExperienceEntry::template()],
                education: vec![EducationEntry::default()],
                projects: vec![ProjectEntry::default()],
                certifications: vec![CertificationEntry::default()],
                ..Resume::default()
            },
        }
    }

    /// Load an existing document into the form. Populated sections replace
    /// the blanks wholesale; empty sections keep one blank entry so the
    /// editor always has a row to type into.
    #[must_use]
    pub fn from_initial(initial: Resume) -> Self {
        let mut draft = initial;
        if draft.experience.is_empty() {
            draft.experience = vec![ExperienceEntry::template()];
        }
        if draft.education.is_empty() {
            draft.education = vec![EducationEntry::default()];
        }
        if draft.projects.is_empty() {
            draft.projects = vec![ProjectEntry::default()];
        }
        if draft.certifications.is_empty() {
            draft.certifications = vec![CertificationEntry::default()];
        }
        Self { draft }
    }

    #[must_use]
    pub fn draft(&self) -> &Resume {
        &self.draft
    }

    pub fn set_name(&mut self, name: &str) {
        self.draft.name = name.to_owned();
    }

    pub fn set_summary(&mut self, summary: &str) {
        self.draft.summary = summary.to_owned();
    }

    pub fn contact_mut(&mut self) -> &mut crate::net::types::ResumeContact {
        &mut self.draft.contact
    }

    // -------------------------------------------------------------------------
    // Skills
    // -------------------------------------------------------------------------

    pub fn add_skill(&mut self) {
        self.draft.skills.push(String::new());
    }

    /// Update a skill in place; out-of-range indices are ignored.
    pub fn set_skill(&mut self, index: usize, value: &str) {
        if let Some(slot) = self.draft.skills.get_mut(index) {
            *slot = value.to_owned();
        }
    }

    pub fn remove_skill(&mut self, index: usize) {
        if index < self.draft.skills.len() {
            self.draft.skills.remove(index);
        }
    }

    // -------------------------------------------------------------------------
    // Sectioned entries
    // -------------------------------------------------------------------------

    pub fn add_experience(&mut self) {
        self.draft.experience.push(ExperienceEntry::template());
    }

    pub fn remove_experience(&mut self, index: usize) {
        if index < self.draft.experience.len() {
            self.draft.experience.remove(index);
        }
    }

    /// Edit one experience entry in place; out-of-range indices are ignored.
    pub fn update_experience(&mut self, index: usize, edit: impl FnOnce(&mut ExperienceEntry)) {
        if let Some(entry) = self.draft.experience.get_mut(index) {
            edit(entry);
        }
    }

    pub fn add_education(&mut self) {
        self.draft.education.push(EducationEntry::default());
    }

    pub fn remove_education(&mut self, index: usize) {
        if index < self.draft.education.len() {
            self.draft.education.remove(index);
        }
    }

    pub fn update_education(&mut self, index: usize, edit: impl FnOnce(&mut EducationEntry)) {
        if let Some(entry) = self.draft.education.get_mut(index) {
            edit(entry);
        }
    }

    pub fn add_project(&mut self) {
        self.draft.projects.push(ProjectEntry::default());
    }

    pub fn remove_project(&mut self, index: usize) {
        if index < self.draft.projects.len() {
            self.draft.projects.remove(index);
        }
    }

    pub fn update_project(&mut self, index: usize, edit: impl FnOnce(&mut ProjectEntry)) {
        if let Some(entry) = self.draft.projects.get_mut(index) {
            edit(entry);
        }
    }

    pub fn add_certification(&mut self) {
        self.draft.certifications.push(CertificationEntry::default());
    }

    pub fn remove_certification(&mut self, index: usize) {
        if index < self.draft.certifications.len() {
            self.draft.certifications.remove(index);
        }
    }

    pub fn update_certification(&mut self, index: usize, edit: impl FnOnce(&mut CertificationEntry)) {
        if let Some(entry) = self.draft.certifications.get_mut(index) {
            edit(entry);
        }
    }

    // -------------------------------------------------------------------------
    // Persistence
    // -------------------------------------------------------------------------

    /// Document to persist: draft contents verbatim, version bumped, and
    /// `last_updated` stamped with `now`.
    #[must_use]
    pub fn into_document(self, now: OffsetDateTime) -> Resume {
        let mut doc = self.draft;
        doc.version += 1;
        doc.last_updated = now.format(&Rfc3339).ok();
        doc
    }

    /// Write the draft to the user's résumé slot. Returns the persisted
    /// document so callers can refresh their view without re-reading.
    ///
    /// # Errors
    ///
    /// Propagates store failures; the draft itself is left intact on the
    /// caller's side (`&self`).
    pub async fn save(
        &self,
        store: &dyn DocumentStore,
        user_id: &str,
        now: OffsetDateTime,
    ) -> Result<Resume, StoreError> {
        let doc = self.clone().into_document(now);
        let value = serde_json::to_value(&doc).map_err(|e| StoreError::Malformed(e.to_string()))?;
        store.set_document(RESUMES_COLLECTION, user_id, value).await?;
        Ok(doc)
    }
}

impl Default for ResumeForm {
    fn default() -> Self {
        Self::new()
    }
}
