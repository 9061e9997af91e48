use std::fmt;

use crate::state::Binder;
use crate::state::PartyRole;

/// Failures at the load boundary. Everything past this point is the
/// reducer's total-function territory; malformed snapshots stop here.
#[derive(Debug)]
pub enum SnapshotError {
    Malformed(serde_json::Error),
    /// A binder must arrive with exactly one OWNER party; the reducer
    /// assumes it and never re-validates.
    OwnerCount(usize),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed binder snapshot: {err}"),
            Self::OwnerCount(count) => {
                write!(f, "binder snapshot has {count} OWNER parties, expected 1")
            }
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::OwnerCount(_) => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err)
    }
}

/// Parse a full binder snapshot as fetched from the external service. The
/// result is what `ReplaceBinder` ingests; no partial sync exists.
pub fn parse_binder(json: &str) -> Result<Binder, SnapshotError> {
    let binder: Binder = serde_json::from_str(json)?;
    let owners = binder
        .parties
        .iter()
        .filter(|party| party.has_role(PartyRole::Owner))
        .count();
    if owners != 1 {
        return Err(SnapshotError::OwnerCount(owners));
    }
    Ok(binder)
}

/// Serialize the current state for collaborators that PATCH it upstream.
/// Transient UI flags are skipped by the entity derives.
pub fn to_snapshot_json(binder: &Binder) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(binder)?)
}
