//! Output path resolution.
//!
//! Generated files are named after the template with a variant infix and
//! a second-resolution timestamp, so successive generations never clash.
//! Where the file goes is the operator's choice; when the destination
//! picker is cancelled the file lands in the current working directory.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// Which of the two termsheet families is being generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variante {
    /// Promoter-credit termsheet.
    Gfa,
    /// Caution d'Indemnité d'Immobilisation termsheet.
    Cii,
}

impl Variante {
    const fn infix(self) -> &'static str {
        match self {
            Variante::Gfa => "_genere_",
            Variante::Cii => "_CII_genere_",
        }
    }
}

/// Build the generated file name for a template.
///
/// `template_ts.docx` generated at 2025-06-02 14:30:05 becomes
/// `template_ts_genere_20250602_143005.docx` (or
/// `template_cii_CII_genere_…` for the CII variant).
pub fn output_name(template: &Path, variante: Variante, at: DateTime<Local>) -> String {
    let stem = template
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("termsheet");
    format!("{stem}{}{}.docx", variante.infix(), at.format("%Y%m%d_%H%M%S"))
}

/// Resolve the destination path.
///
/// `chosen` is whatever the operator picked; `None` (picker cancelled)
/// falls back to the generated name in the current working directory.
pub fn resolve_destination(
    chosen: Option<PathBuf>,
    template: &Path,
    variante: Variante,
    at: DateTime<Local>,
) -> PathBuf {
    chosen.unwrap_or_else(|| PathBuf::from(output_name(template, variante, at)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 2, 14, 30, 5).unwrap()
    }

    #[test]
    fn gfa_name_carries_stem_and_timestamp() {
        let name = output_name(Path::new("/mnt/templates/template_ts.docx"), Variante::Gfa, at());
        assert_eq!(name, "template_ts_genere_20250602_143005.docx");
    }

    #[test]
    fn cii_name_carries_the_cii_infix() {
        let name = output_name(Path::new("template_cii.docx"), Variante::Cii, at());
        assert_eq!(name, "template_cii_CII_genere_20250602_143005.docx");
    }

    #[test]
    fn cancelled_picker_falls_back_to_working_directory() {
        let dest = resolve_destination(None, Path::new("template_ts.docx"), Variante::Gfa, at());
        assert_eq!(dest, PathBuf::from("template_ts_genere_20250602_143005.docx"));

        let chosen = PathBuf::from("/mnt/sorties/dossier_42.docx");
        let dest = resolve_destination(
            Some(chosen.clone()),
            Path::new("template_ts.docx"),
            Variante::Gfa,
            at(),
        );
        assert_eq!(dest, chosen);
    }
}
