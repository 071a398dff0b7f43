//! Libelle - termsheet generation core
//!
//! This library is the shared core of two banker-facing termsheet
//! generators: it resolves loan parameters into a placeholder map and
//! substitutes the map into a Word (.docx) template whose substitution
//! points are literal bracketed tokens such as `[montant_credit]`.
//!
//! # Features
//!
//! - **French number spelling**: amounts rendered in words
//!   ("un million cinq cent mille")
//! - **Amount normalization**: grouped-digit figures ("1.500.000")
//! - **Closed token vocabulary**: every placeholder is an enum variant,
//!   not a dictionary key
//! - **Docx substitution engine**: matches tokens split across runs,
//!   rewrites body, table-cell, header and footer paragraphs, keeps
//!   everything else byte-identical
//!
//! # Example - Filling a GFA termsheet template
//!
//! ```no_run
//! use libelle::montant::Montant;
//! use libelle::termsheet::TermsheetGfa;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let termsheet = TermsheetGfa {
//!     nom_sccv: "SCCV DES LILAS".to_string(),
//!     montant_gfa: Montant::new("1500000"),
//!     ..TermsheetGfa::default()
//! };
//!
//! libelle::generer("template_ts.docx", &termsheet.placeholders(), "termsheet.docx")?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Low-level substitution
//!
//! ```no_run
//! use libelle::docx::Package;
//! use libelle::jeton::{Jeton, PlaceholderMap};
//! use libelle::substitute::Substitutions;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut map = PlaceholderMap::new();
//! map.insert(Jeton::Date, "2 juin 2025");
//! map.insert(Jeton::VilleRcs, "Nanterre");
//!
//! let mut pkg = Package::open("template_ts.docx")?;
//! let rewritten = pkg.substitute(&Substitutions::compile(&map)?)?;
//! println!("{rewritten} paragraphs rewritten");
//! pkg.save_to("termsheet.docx")?;
//! # Ok(())
//! # }
//! ```

pub mod docx;
pub mod error;
pub mod jeton;
pub mod lettres;
pub mod montant;
pub mod output;
pub mod substitute;
pub mod termsheet;

pub use error::{Error, Result};
pub use jeton::{Jeton, PlaceholderMap};
pub use montant::Montant;
pub use output::{Variante, output_name, resolve_destination};
pub use substitute::Substitutions;
pub use termsheet::{TermsheetCii, TermsheetGfa};

use std::path::Path;

/// Fill a template with a placeholder map and save the result.
///
/// Convenience wrapper over open → substitute → save. The template is
/// never modified in place.
pub fn generer<P: AsRef<Path>, Q: AsRef<Path>>(
    template: P,
    map: &PlaceholderMap,
    destination: Q,
) -> Result<()> {
    let subs = Substitutions::compile(map)?;
    let mut package = docx::Package::open(template)?;
    package.substitute(&subs)?;
    package.save_to(destination)
}
