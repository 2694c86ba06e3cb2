use crate::core::RawRecord;
use crate::domain::model::{Term, TermSummary};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Distinct terms embedded in a course listing, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct TermCatalog {
    terms: Vec<Term>,
    counts: HashMap<i64, usize>,
}

impl TermCatalog {
    pub fn from_course_records(records: &[RawRecord]) -> Self {
        let mut catalog = Self::default();

        for term in records.iter().filter_map(Term::from_course_record) {
            let count = catalog.counts.entry(term.id).or_insert(0);
            if *count == 0 {
                catalog.terms.push(term);
            }
            *count += 1;
        }

        catalog
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// 推斷目前學期
    ///
    /// 1. 進行中的學期（`start_at <= now`，且有 `end_at` 時 `now <= end_at`）取 `start_at` 最晚者
    /// 2. 沒有進行中的學期時，取被最多課程引用者
    /// 3. 完全沒有學期資料時回傳 None
    ///
    /// Ties go to the last candidate in first-seen order.
    pub fn current_term_id(&self, now: DateTime<Utc>) -> Option<i64> {
        let active = self
            .terms
            .iter()
            .filter(|term| term.is_active_at(now))
            .max_by_key(|term| term.start_at);

        if let Some(term) = active {
            tracing::debug!("📅 Active term {} starts {:?}", term.id, term.start_at);
            return Some(term.id);
        }

        let most_used = self
            .terms
            .iter()
            .max_by_key(|term| self.course_count(term.id))
            .map(|term| term.id);

        if let Some(id) = most_used {
            tracing::debug!(
                "📅 No active term window, falling back to most used term {} ({} courses)",
                id,
                self.course_count(id)
            );
        }
        most_used
    }

    pub fn course_count(&self, term_id: i64) -> usize {
        self.counts.get(&term_id).copied().unwrap_or(0)
    }

    pub fn summaries(&self, now: DateTime<Utc>) -> Vec<TermSummary> {
        let current = self.current_term_id(now);
        self.terms
            .iter()
            .map(|term| TermSummary {
                term: term.clone(),
                course_count: self.course_count(term.id),
                current: Some(term.id) == current,
            })
            .collect()
    }
}

pub fn resolve_current_term(records: &[RawRecord], now: DateTime<Utc>) -> Option<i64> {
    TermCatalog::from_course_records(records).current_term_id(now)
}
