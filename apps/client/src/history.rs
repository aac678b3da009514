//! Locally held document lists and the dashboard built from them.

use crate::types::{CoverLetter, Document, GapAnalysis, ResumeSummary};

/// Documents newest first. A freshly created document is pushed to the front so
/// it shows up without reloading the list.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHistory<T> {
    items: Vec<T>,
}

impl<T> Default for DocumentHistory<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Document> DocumentHistory<T> {
    /// Wraps a list fetched from the API, re-sorting it newest first.
    pub fn from_fetched(mut items: Vec<T>) -> Self {
        items.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Self { items }
    }

    /// Records a document returned by a create call. A repeat id replaces the
    /// stored copy.
    pub fn push_created(&mut self, item: T) {
        self.items.retain(|existing| existing.id() != item.id());
        self.items.insert(0, item);
    }

    pub fn get(&self, id: i32) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn recent(&self, n: usize) -> &[T] {
        &self.items[..n.min(self.items.len())]
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub resumes: usize,
    pub cover_letters: usize,
    pub gap_analyses: usize,
    pub average_ats_score: Option<i32>,
    pub best_ats_score: Option<i32>,
}

/// Everything the dashboard shows: counts plus the most recent documents.
#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub resumes: DocumentHistory<ResumeSummary>,
    pub cover_letters: DocumentHistory<CoverLetter>,
    pub gap_analyses: DocumentHistory<GapAnalysis>,
}

impl Dashboard {
    pub fn stats(&self) -> DashboardStats {
        let scores: Vec<i32> = self.resumes.items().iter().map(|r| r.ats_score).collect();
        let average_ats_score = (!scores.is_empty()).then(|| {
            let total: i64 = scores.iter().map(|&s| i64::from(s)).sum();
            (total as f64 / scores.len() as f64).round() as i32
        });

        DashboardStats {
            resumes: self.resumes.len(),
            cover_letters: self.cover_letters.len(),
            gap_analyses: self.gap_analyses.len(),
            average_ats_score,
            best_ats_score: scores.iter().copied().max(),
        }
    }
}
