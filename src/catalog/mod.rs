//! Tour Catalog
//!
//! Owns the tour definitions the analytics engine reads. Tours live in memory
//! and, when the catalog is opened on a file, are persisted to a JSONL file
//! (one tour per line) rewritten atomically on every change.

mod validation;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::types::{NewTour, TourDefinition};
use crate::utils::{atomic_write_with, cleanup_temp_files};

pub use validation::{validate_new_tour, ValidTour};

/// Tour definitions keyed by id, in creation order
pub struct TourCatalog {
    file_path: Option<PathBuf>,
    tours: RwLock<Vec<TourDefinition>>,
}

impl TourCatalog {
    /// Create an empty catalog that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            file_path: None,
            tours: RwLock::new(Vec::new()),
        }
    }

    /// Open a file-backed catalog, loading any tours already saved
    pub fn open<P: AsRef<Path>>(file_path: P) -> AnalyticsResult<Self> {
        let file_path = file_path.as_ref().to_path_buf();

        if let Some(parent) = file_path.parent() {
            let cleaned = cleanup_temp_files(parent)?;
            if cleaned > 0 {
                tracing::warn!(
                    cleaned,
                    "Removed leftover temp files from interrupted catalog writes"
                );
            }
        }

        let tours = Self::load_from_file(&file_path)?;
        tracing::info!(path = %file_path.display(), tours = tours.len(), "Tour catalog loaded");

        Ok(Self {
            file_path: Some(file_path),
            tours: RwLock::new(tours),
        })
    }

    fn load_from_file(file_path: &Path) -> AnalyticsResult<Vec<TourDefinition>> {
        if !file_path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(file_path)?;
        let mut tours = Vec::new();

        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let tour: TourDefinition = serde_json::from_str(line).map_err(|e| {
                AnalyticsError::Storage(format!(
                    "Corrupt tour catalog {} at line {}: {}",
                    file_path.display(),
                    line_num + 1,
                    e
                ))
            })?;
            tours.push(tour);
        }

        Ok(tours)
    }

    /// Persist the full catalog (caller holds the write lock)
    fn persist(&self, tours: &[TourDefinition]) -> AnalyticsResult<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };

        let mut lines = Vec::with_capacity(tours.len());
        for tour in tours {
            lines.push(serde_json::to_string(tour)?);
        }

        atomic_write_with(path, |file| {
            for line in &lines {
                writeln!(file, "{}", line)?;
            }
            Ok(())
        })?;
        Ok(())
    }

    /// Validate and add a tour under a freshly generated id
    ///
    /// Ids are never taken from the client: a reused id would inherit the
    /// events a deleted tour left in the log.
    pub fn create(&self, request: NewTour) -> AnalyticsResult<TourDefinition> {
        let valid = validate_new_tour(request)?;

        let mut tours = self.tours.write();
        let id = Uuid::new_v4().to_string();

        let tour = TourDefinition {
            id,
            name: valid.name,
            description: valid.description,
            steps: valid.steps,
            created_at: Utc::now(),
        };

        let mut updated = tours.clone();
        updated.push(tour.clone());
        self.persist(&updated)?;
        *tours = updated;

        tracing::info!(tour_id = %tour.id, steps = tour.step_count(), "Tour created");
        Ok(tour)
    }

    /// Remove a tour; its recorded events stay in the event log
    pub fn delete(&self, tour_id: &str) -> AnalyticsResult<TourDefinition> {
        let mut tours = self.tours.write();
        let Some(index) = tours.iter().position(|t| t.id == tour_id) else {
            return Err(AnalyticsError::tour_not_found(tour_id));
        };

        let mut updated = tours.clone();
        let removed = updated.remove(index);
        self.persist(&updated)?;
        *tours = updated;

        tracing::info!(tour_id, "Tour deleted");
        Ok(removed)
    }

    pub fn get(&self, tour_id: &str) -> Option<TourDefinition> {
        self.tours.read().iter().find(|t| t.id == tour_id).cloned()
    }

    /// Like [`get`](Self::get) but unknown ids are a `NotFound` error
    pub fn require(&self, tour_id: &str) -> AnalyticsResult<TourDefinition> {
        self.get(tour_id)
            .ok_or_else(|| AnalyticsError::tour_not_found(tour_id))
    }

    pub fn list(&self) -> Vec<TourDefinition> {
        self.tours.read().clone()
    }

    /// Number of tours, reported as `totalToursCreated`
    pub fn count(&self) -> usize {
        self.tours.read().len()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }
}

impl Default for TourCatalog {
    fn default() -> Self {
        Self::in_memory()
    }
}
