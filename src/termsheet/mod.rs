//! Termsheet snapshots.
//!
//! A snapshot is an immutable picture of everything the operator entered,
//! built once per generate or preview action. The substitution engine
//! only ever sees the [`crate::jeton::PlaceholderMap`] a snapshot
//! produces; it knows nothing about forms or widgets.

pub mod cii;
pub mod clauses;
pub mod gfa;

pub use cii::{Caution, TermsheetCii};
pub use clauses::{
    AgrementBailleur, Clauses, CommercialisationLots, ConditionsNonSpeculatives,
    ConditionsSpeculatives, ContratReservation,
};
pub use gfa::TermsheetGfa;

use std::fmt;

/// Honorific used in the letter salutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Civilite {
    #[default]
    Monsieur,
    Madame,
    Messieurs,
}

impl Civilite {
    pub const fn as_str(self) -> &'static str {
        match self {
            Civilite::Monsieur => "Monsieur",
            Civilite::Madame => "Madame",
            Civilite::Messieurs => "Messieurs",
        }
    }
}

impl fmt::Display for Civilite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved promoter-profile values.
///
/// The profile store itself (a spreadsheet managed outside this crate)
/// is not consulted here; callers hand over whatever the operator
/// selected or typed.
#[derive(Debug, Clone, Default)]
pub struct Profil {
    pub nom_promoteur: String,
    pub nom_contact: String,
    pub adresse_promoteur: String,
    pub civilite: Civilite,
}

/// A percentage rate, rendered with two decimals and a decimal comma
/// ("2,25").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Taux(pub f64);

impl fmt::Display for Taux {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = format!("{:.2}", self.0).replace('.', ",");
        f.write_str(&rendered)
    }
}
