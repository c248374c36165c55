//! Age, capacity and vaccine filtering of centers.

use crate::models::{Center, Session};

/// Which sessions count as bookable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFilter {
    /// Age of the person booking. A session is eligible when its own
    /// minimum age limit does not exceed this.
    pub min_age_limit: u32,
    /// Restrict to one vaccine, compared case-insensitively.
    pub vaccine: Option<String>,
}

impl SlotFilter {
    pub fn new(min_age_limit: u32) -> Self {
        Self {
            min_age_limit,
            vaccine: None,
        }
    }

    pub fn with_vaccine(mut self, vaccine: Option<String>) -> Self {
        self.vaccine = vaccine.filter(|v| !v.trim().is_empty());
        self
    }

    /// Whether a single session is open to this filter.
    pub fn accepts(&self, session: &Session) -> bool {
        if session.min_age_limit > self.min_age_limit || session.available_capacity == 0 {
            return false;
        }
        match &self.vaccine {
            Some(wanted) => session.vaccine.trim().eq_ignore_ascii_case(wanted.trim()),
            None => true,
        }
    }

    /// Keep centers with at least one accepted session, trimmed down to
    /// those sessions. Center and session order is preserved.
    pub fn apply(&self, centers: Vec<Center>) -> Vec<Center> {
        let received = centers.len();

        let eligible: Vec<Center> = centers
            .into_iter()
            .filter_map(|mut center| {
                center.sessions.retain(|s| self.accepts(s));
                if center.sessions.is_empty() {
                    return None;
                }
                for session in &center.sessions {
                    tracing::debug!(
                        center = %center.name,
                        date = %session.date,
                        capacity = session.available_capacity,
                        "Eligible session"
                    );
                }
                Some(center)
            })
            .collect();

        tracing::info!(
            "After filtering found {} eligible and available centers (of {})",
            eligible.len(),
            received
        );
        eligible
    }
}
