//! Contributors to a title and the eligibility filter applied to them.
//!
//! Everyone in the cast counts. From the crew only a fixed set of jobs
//! counts: Director, Writer, Director of Photography, and any job whose name
//! contains "Composer" ("Original Music Composer", "Composer", ...).

use serde::{Deserialize, Serialize};

use super::media::PersonId;

/// Crew jobs that count as contributors (exact match).
pub const ELIGIBLE_CREW_JOBS: [&str; 3] = ["Director", "Writer", "Director of Photography"];

/// Crew jobs containing this fragment also count.
pub const COMPOSER_FRAGMENT: &str = "Composer";

/// How a person contributed to a title.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "department", content = "job", rename_all = "lowercase")]
pub enum Role {
    Cast,
    Crew(String),
}

impl Role {
    /// Whether this role makes the person part of the credit pool.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        match self {
            Role::Cast => true,
            Role::Crew(job) => is_eligible_crew_job(job),
        }
    }
}

/// Check a crew job against the allow-list.
#[must_use]
pub fn is_eligible_crew_job(job: &str) -> bool {
    ELIGIBLE_CREW_JOBS.contains(&job) || job.contains(COMPOSER_FRAGMENT)
}

/// One credit on a title, as reported by the metadata provider.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Contributor {
    pub id: PersonId,
    pub name: String,
    pub role: Role,
}

impl Contributor {
    /// Cast credit.
    #[must_use]
    pub fn cast(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: PersonId(id),
            name: name.into(),
            role: Role::Cast,
        }
    }

    /// Crew credit with a job title.
    #[must_use]
    pub fn crew(id: u64, name: impl Into<String>, job: impl Into<String>) -> Self {
        Self {
            id: PersonId(id),
            name: name.into(),
            role: Role::Crew(job.into()),
        }
    }

    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.role.is_eligible()
    }
}

/// Contributors that count toward links and the credit pool, in input order.
pub fn eligible(contributors: &[Contributor]) -> impl Iterator<Item = &Contributor> {
    contributors.iter().filter(|c| c.is_eligible())
}
