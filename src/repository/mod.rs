//! The technology list and every operation that changes it.
//!
//! [`TechnologyRepository`] owns the only copy of the list for a session.
//! Each mutating operation changes the in-memory list first and then writes
//! the whole list back through [`LocalStorage`] in a single save. Storage
//! failures are absorbed there, so the in-memory list stays authoritative for
//! the rest of the session and the next successful save catches the store up.
//!
//! Operations that name an unknown id are silent no-ops rather than errors.

pub mod validation;

use std::collections::HashSet;

use chrono::{DateTime, Days, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::DEFAULT_STORAGE_KEY;
use crate::error::ValidationError;
use crate::export::ExportDocument;
use crate::models::*;
use crate::store::{KeyValueStore, LocalStorage};

pub struct TechnologyRepository<S> {
    storage: LocalStorage<S>,
    key: String,
    technologies: Vec<Technology>,
}

impl<S: KeyValueStore> TechnologyRepository<S> {
    /// Loads the list stored under the default key, falling back to the
    /// built-in seed list.
    pub fn open(storage: LocalStorage<S>) -> Self {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn open_with_key(storage: LocalStorage<S>, key: impl Into<String>) -> Self {
        let key = key.into();
        let loaded: Option<Vec<Technology>> = storage.load(&key, None);
        let technologies = match loaded {
            Some(list) => dedupe_ids(list),
            None => {
                tracing::info!(key = %key, "Using built-in technology list");
                default_technologies()
            }
        };

        tracing::debug!(count = technologies.len(), "Technology list ready");
        Self {
            storage,
            key,
            technologies,
        }
    }

    pub fn technologies(&self) -> &[Technology] {
        &self.technologies
    }

    pub fn get(&self, id: &TechnologyId) -> Option<&Technology> {
        self.technologies.iter().find(|t| &t.id == id)
    }

    /// Maps an id typed by a user onto a stored one.
    ///
    /// An exact match wins. Otherwise the first record whose id reads the same
    /// as text is used, so `2` finds a legacy `"2"`. Unknown ids come back as is.
    pub fn resolve_id(&self, typed: TechnologyId) -> TechnologyId {
        if self.get(&typed).is_some() {
            return typed;
        }
        self.technologies
            .iter()
            .find(|t| t.id.same_text(&typed))
            .map(|t| t.id.clone())
            .unwrap_or(typed)
    }

    pub fn storage(&self) -> &LocalStorage<S> {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    // ============================================================
    // Creation and editing
    // ============================================================

    /// Validates and appends a new technology.
    ///
    /// The record starts `NotStarted` with progress 0, a fresh id and
    /// `createdAt == updatedAt == now`.
    pub fn add_technology(&mut self, input: NewTechnology) -> Result<Technology, ValidationError> {
        let now = Utc::now();
        validation::validate_new(&input, now.date_naive())?;

        let technology = Technology {
            id: self.next_id(),
            title: input.title.trim().to_string(),
            description: input.description.trim().to_string(),
            status: Status::NotStarted,
            notes: input.notes.map(|n| n.trim().to_string()).unwrap_or_default(),
            category: input.category.unwrap_or_default(),
            priority: input.priority.unwrap_or_default(),
            difficulty: input.difficulty.unwrap_or_default(),
            deadline: input.deadline,
            estimated_hours: input.estimated_hours.and_then(|h| u32::try_from(h).ok()),
            created_at: now,
            updated_at: now,
            progress: None,
            extra: serde_json::Map::new(),
        };

        self.technologies.push(technology.clone());
        self.persist();
        tracing::info!(id = %technology.id, title = %technology.title, "Added technology");
        Ok(technology)
    }

    /// Applies a partial edit. Returns `None` when the id is unknown, in which
    /// case nothing is written.
    pub fn update_technology(
        &mut self,
        id: &TechnologyId,
        input: TechnologyUpdate,
    ) -> Result<Option<Technology>, ValidationError> {
        validation::validate_update(&input)?;

        let Some(tech) = self.technologies.iter_mut().find(|t| &t.id == id) else {
            return Ok(None);
        };

        if let Some(title) = input.title {
            tech.title = title.trim().to_string();
        }
        if let Some(description) = input.description {
            tech.description = description.trim().to_string();
        }
        if let Some(category) = input.category {
            tech.category = category;
        }
        if let Some(priority) = input.priority {
            tech.priority = priority;
        }
        if let Some(difficulty) = input.difficulty {
            tech.difficulty = difficulty;
        }
        if let Some(hours) = input.estimated_hours {
            tech.estimated_hours = u32::try_from(hours).ok();
        }
        tech.touch(Utc::now());

        let updated = tech.clone();
        self.persist();
        Ok(Some(updated))
    }

    pub fn delete_technology(&mut self, id: &TechnologyId) -> bool {
        let before = self.technologies.len();
        self.technologies.retain(|t| &t.id != id);
        let removed = self.technologies.len() < before;
        self.persist();
        if removed {
            tracing::info!(id = %id, "Deleted technology");
        }
        removed
    }

    // ============================================================
    // Status
    // ============================================================

    /// Sets the status of one record. Any status may be assigned directly.
    pub fn update_status(&mut self, id: &TechnologyId, status: Status) {
        let now = Utc::now();
        if let Some(tech) = self.technologies.iter_mut().find(|t| &t.id == id) {
            tech.set_status(status, now);
        }
        self.persist();
    }

    /// Moves a record one step along the status cycle and returns its new status.
    pub fn advance_status(&mut self, id: &TechnologyId) -> Option<Status> {
        let now = Utc::now();
        let next = self
            .technologies
            .iter_mut()
            .find(|t| &t.id == id)
            .map(|tech| {
                let next = tech.status.advance();
                tech.set_status(next, now);
                next
            });
        self.persist();
        next
    }

    /// Sets `status` on every listed record with a single write.
    ///
    /// Returns how many records matched. Unknown ids are skipped.
    pub fn bulk_update_status(
        &mut self,
        ids: &[TechnologyId],
        status: Status,
    ) -> Result<usize, ValidationError> {
        if ids.is_empty() {
            return Err(ValidationError::single(
                "selected",
                "select at least one technology",
            ));
        }

        let selected: HashSet<&TechnologyId> = ids.iter().collect();
        let now = Utc::now();
        let mut matched = 0;
        for tech in self.technologies.iter_mut().filter(|t| selected.contains(&t.id)) {
            tech.set_status(status, now);
            matched += 1;
        }

        self.persist();
        tracing::info!(matched, status = %status, "Bulk status update");
        Ok(matched)
    }

    pub fn mark_all_completed(&mut self) {
        self.set_all_statuses(Status::Completed);
    }

    pub fn reset_all(&mut self) {
        self.set_all_statuses(Status::NotStarted);
    }

    fn set_all_statuses(&mut self, status: Status) {
        let now = Utc::now();
        for tech in &mut self.technologies {
            tech.set_status(status, now);
        }
        self.persist();
    }

    /// Picks a `NotStarted` record uniformly at random and starts it.
    pub fn pick_random_not_started(&mut self) -> Option<Technology> {
        self.pick_random_not_started_with(&mut rand::thread_rng())
    }

    /// Like [`Self::pick_random_not_started`] with a caller-supplied generator.
    ///
    /// When nothing is eligible the list is left untouched and not written.
    pub fn pick_random_not_started_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Option<Technology> {
        let eligible: Vec<usize> = self
            .technologies
            .iter()
            .enumerate()
            .filter(|(_, t)| t.status == Status::NotStarted)
            .map(|(i, _)| i)
            .collect();

        let &index = eligible.choose(rng)?;
        let tech = &mut self.technologies[index];
        tech.set_status(Status::InProgress, Utc::now());
        let picked = tech.clone();

        self.persist();
        tracing::info!(id = %picked.id, title = %picked.title, "Picked technology to start");
        Some(picked)
    }

    // ============================================================
    // Notes and progress
    // ============================================================

    /// Replaces the notes of one record. Length limits are the caller's concern.
    pub fn update_notes(&mut self, id: &TechnologyId, notes: impl Into<String>) {
        let notes = notes.into();
        if let Some(tech) = self.technologies.iter_mut().find(|t| &t.id == id) {
            tech.notes = notes;
            tech.touch(Utc::now());
        }
        self.persist();
    }

    pub fn clear_all_notes(&mut self) {
        let now = Utc::now();
        for tech in &mut self.technologies {
            tech.notes.clear();
            tech.touch(now);
        }
        self.persist();
    }

    /// Records an explicit progress value (clamped to 100) that overrides the
    /// status-derived one until the status changes again.
    pub fn set_progress(&mut self, id: &TechnologyId, progress: u8) {
        if let Some(tech) = self.technologies.iter_mut().find(|t| &t.id == id) {
            tech.progress = Some(progress.min(100));
            tech.touch(Utc::now());
        }
        self.persist();
    }

    // ============================================================
    // Deadlines
    // ============================================================

    /// Sets or clears the deadline of one record.
    pub fn set_deadline(
        &mut self,
        id: &TechnologyId,
        deadline: Option<NaiveDate>,
    ) -> Result<(), ValidationError> {
        let now = Utc::now();
        if let Some(date) = deadline {
            validation::check_deadline(date, now.date_naive())
                .map_err(|message| ValidationError::single("deadline", message))?;
        }

        if let Some(tech) = self.technologies.iter_mut().find(|t| &t.id == id) {
            tech.deadline = deadline;
            tech.touch(now);
        }
        self.persist();
        Ok(())
    }

    /// Sets several deadlines with one write.
    ///
    /// All dates are checked before anything changes; errors are keyed by id.
    /// Returns how many records matched.
    pub fn set_deadlines(
        &mut self,
        deadlines: &[(TechnologyId, NaiveDate)],
    ) -> Result<usize, ValidationError> {
        let now = Utc::now();
        let today = now.date_naive();

        let mut errors = ValidationError::new();
        for (id, date) in deadlines {
            if let Err(message) = validation::check_deadline(*date, today) {
                errors.add(id.to_string(), message);
            }
        }
        errors.into_result()?;

        let mut matched = 0;
        for (id, date) in deadlines {
            if let Some(tech) = self.technologies.iter_mut().find(|t| &t.id == id) {
                tech.deadline = Some(*date);
                tech.touch(now);
                matched += 1;
            }
        }

        self.persist();
        tracing::info!(matched, "Deadlines updated");
        Ok(matched)
    }

    /// Proposes one deadline per record, a week apart, in list order.
    pub fn suggest_deadlines(&self, today: NaiveDate) -> Vec<(TechnologyId, NaiveDate)> {
        self.technologies
            .iter()
            .enumerate()
            .filter_map(|(i, tech)| {
                let weeks = (i as u64 + 1) * 7;
                today
                    .checked_add_days(Days::new(weeks))
                    .map(|date| (tech.id.clone(), date))
            })
            .collect()
    }

    // ============================================================
    // Export
    // ============================================================

    pub fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument::new(self.technologies.clone(), now)
    }

    /// One past the largest numeric id, or the smallest free one when that
    /// would overflow.
    fn next_id(&self) -> TechnologyId {
        let taken: HashSet<u64> = self
            .technologies
            .iter()
            .filter_map(|t| t.id.as_number())
            .collect();
        let max = taken.iter().copied().max().unwrap_or(0);
        let next = match max.checked_add(1) {
            Some(next) => next,
            None => (1..).find(|n| !taken.contains(n)).unwrap_or(0),
        };
        TechnologyId::Numeric(next)
    }

    fn persist(&self) -> bool {
        self.storage.save(&self.key, &self.technologies)
    }
}

/// Drops records whose id was already seen, keeping the first. `1` and `"1"`
/// are different ids and both survive.
fn dedupe_ids(list: Vec<Technology>) -> Vec<Technology> {
    let mut seen = HashSet::new();
    let before = list.len();
    let unique: Vec<Technology> = list
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect();
    if unique.len() < before {
        tracing::warn!(
            dropped = before - unique.len(),
            "Stored list contained duplicate ids"
        );
    }
    unique
}
