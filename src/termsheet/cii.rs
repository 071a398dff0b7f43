//! CII (Caution d'Indemnité d'Immobilisation) termsheet snapshot.
//!
//! The CII variant carries an ordered list of cautions rendered into a
//! single placeholder value as lettered sub-paragraphs. Entries missing
//! a beneficiary, an amount or a due date are dropped silently so a
//! half-filled row never blocks generation.

use std::fmt::Write as FmtWrite;

use super::{Profil, Taux};
use crate::jeton::{Jeton, PlaceholderMap};
use crate::montant::Montant;

/// One caution of the repeated section.
#[derive(Debug, Clone, Default)]
pub struct Caution {
    /// "Madame Marie DUPONT et Monsieur Pierre MARTIN"
    pub beneficiaires: String,
    /// Transferor the beneficiaries succeed ("venant au droit de …").
    pub venant_au_droit: Option<String>,
    pub montant: Montant,
    pub date_echeance: String,
}

impl Caution {
    fn is_complete(&self) -> bool {
        !self.beneficiaires.trim().is_empty()
            && !self.montant.is_empty()
            && !self.date_echeance.trim().is_empty()
    }

    fn render(&self) -> String {
        let mut out = String::from("Caution d'indemnité d'immobilisation (CII) :\n\n");

        let _ = write!(
            out,
            "a. Caution d'indemnité d'immobilisation (CII), émise en faveur de {}",
            self.beneficiaires.trim()
        );
        if let Some(transferor) = self.venant_au_droit.as_deref()
            && !transferor.trim().is_empty()
        {
            let _ = write!(out, ", venant au droit de {}", transferor.trim());
        }
        out.push_str(".\n\n");

        let _ = write!(out, "b. Montant : {} €", self.montant.grouped());
        if let Some(lettres) = self.montant.en_lettres() {
            let _ = write!(out, " ({lettres} euros)");
        }
        out.push_str(".\n\n");

        let _ = write!(out, "c. Date d'échéance : {}.\n\n", self.date_echeance.trim());

        out
    }
}

/// Everything a CII termsheet interpolates.
#[derive(Debug, Clone)]
pub struct TermsheetCii {
    pub profil: Profil,
    pub date: String,
    pub reference_dossier: String,
    pub nom_sccv: String,
    pub numero_siren: String,
    pub ville_rcs: String,
    pub objet: String,
    /// Repeated section, rendered in input order.
    pub cautions: Vec<Caution>,
    pub commission_forfaitaire: Montant,
    pub taux_commission_risque: Taux,
    pub frais_acte: Montant,
    pub commission_retainer: Montant,
    pub date_validite_accord: String,
}

impl Default for TermsheetCii {
    fn default() -> Self {
        Self {
            profil: Profil::default(),
            date: String::new(),
            reference_dossier: String::new(),
            nom_sccv: String::new(),
            numero_siren: String::new(),
            ville_rcs: String::new(),
            objet: String::new(),
            cautions: Vec::new(),
            commission_forfaitaire: Montant::default(),
            taux_commission_risque: Taux(0.50),
            frais_acte: Montant::new("290"),
            commission_retainer: Montant::default(),
            date_validite_accord: String::new(),
        }
    }
}

impl TermsheetCii {
    /// Render the complete CII section: one lettered block per complete
    /// caution, concatenated in input order.
    pub fn section_cii(&self) -> String {
        let sections: Vec<String> = self
            .cautions
            .iter()
            .filter(|caution| caution.is_complete())
            .map(Caution::render)
            .collect();
        sections.join("\n")
    }

    /// Resolve every token of the CII vocabulary.
    pub fn placeholders(&self) -> PlaceholderMap {
        let mut map = PlaceholderMap::new();

        map.insert(Jeton::NomPromoteur, &self.profil.nom_promoteur);
        map.insert(Jeton::NomContact, &self.profil.nom_contact);
        map.insert(Jeton::AdressePromoteur, &self.profil.adresse_promoteur);
        map.insert(Jeton::Civilite, self.profil.civilite.as_str());
        map.insert(Jeton::Date, &self.date);
        // The CII template spells its reference token without the accent.
        map.insert(Jeton::ReferenceDossierCii, &self.reference_dossier);
        map.insert(Jeton::NomSccv, &self.nom_sccv);
        map.insert(Jeton::NumeroSiren, &self.numero_siren);
        map.insert(Jeton::VilleRcs, &self.ville_rcs);
        map.insert(Jeton::Objet, &self.objet);

        map.insert(Jeton::SectionCompleteCii, self.section_cii());

        let montants = [
            (
                Jeton::NombreCommissionForfaitaire,
                Jeton::NombreCommissionForfaitaireLettres,
                &self.commission_forfaitaire,
            ),
            (Jeton::NombreFraisActe, Jeton::NombreFraisActeLettres, &self.frais_acte),
            (
                Jeton::NombreCommissionRetainer,
                Jeton::NombreCommissionRetainerLettres,
                &self.commission_retainer,
            ),
        ];
        for (figures, lettres, montant) in montants {
            map.insert(figures, montant.grouped());
            map.insert(lettres, montant.en_lettres().unwrap_or_default());
        }

        map.insert(Jeton::TauxCommissionRisque, self.taux_commission_risque.to_string());
        map.insert(Jeton::DateValiditeAccord, &self.date_validite_accord);

        map
    }

    /// Plain-text summary of the resolved values.
    pub fn preview(&self) -> String {
        let mut out = String::from("=== APERÇU DES VALEURS CII ===\n\n");

        out.push_str("INFORMATIONS GÉNÉRALES:\n");
        let champs = [
            ("Nom du promoteur", self.profil.nom_promoteur.as_str()),
            ("Nom du contact", self.profil.nom_contact.as_str()),
            ("Adresse du promoteur", self.profil.adresse_promoteur.as_str()),
            ("Civilité", self.profil.civilite.as_str()),
            ("Date", self.date.as_str()),
            ("Référence dossier", self.reference_dossier.as_str()),
            ("Emprunteur (SCCV)", self.nom_sccv.as_str()),
            ("SIREN", self.numero_siren.as_str()),
            ("Ville RCS", self.ville_rcs.as_str()),
        ];
        for (label, value) in champs {
            if !value.is_empty() {
                let _ = writeln!(out, "{label} = {value}");
            }
        }
        if !self.objet.is_empty() {
            let _ = writeln!(out, "\nOBJET:\n{}", self.objet);
        }

        out.push_str("\nCAUTIONS D'INDEMNITÉ D'IMMOBILISATION:\n");
        let _ = writeln!(out, "Nombre de CII: {}", self.cautions.len());
        for (index, caution) in self.cautions.iter().enumerate() {
            let _ = writeln!(out, "\nCII #{}:", index + 1);
            if !caution.beneficiaires.is_empty() {
                let _ = writeln!(out, "  - Bénéficiaires: {}", caution.beneficiaires);
            }
            if let Some(transferor) = caution.venant_au_droit.as_deref()
                && !transferor.is_empty()
            {
                let _ = writeln!(out, "  - Venant au droit de: {transferor}");
            }
            if !caution.montant.is_empty() {
                match caution.montant.en_lettres() {
                    Some(lettres) => {
                        let _ = writeln!(
                            out,
                            "  - Montant: {} € ({lettres} euros)",
                            caution.montant.grouped()
                        );
                    },
                    None => {
                        let _ = writeln!(out, "  - Montant: {} €", caution.montant.grouped());
                    },
                }
            }
            if !caution.date_echeance.is_empty() {
                let _ = writeln!(out, "  - Date d'échéance: {}", caution.date_echeance);
            }
        }

        out.push_str("\nCONDITIONS DE RÉMUNÉRATION:\n");
        if !self.commission_forfaitaire.is_empty() {
            let _ = writeln!(
                out,
                "Commission forfaitaire: {} € ({})",
                self.commission_forfaitaire.grouped(),
                self.commission_forfaitaire.en_lettres().unwrap_or_default()
            );
        }
        let _ = writeln!(out, "Taux commission de risque: {}%", self.taux_commission_risque);
        if !self.frais_acte.is_empty() {
            let _ = writeln!(
                out,
                "Frais d'acte: {} € ({})",
                self.frais_acte.grouped(),
                self.frais_acte.en_lettres().unwrap_or_default()
            );
        }

        out.push_str("\nMODALITÉS:\n");
        if !self.commission_retainer.is_empty() {
            let _ = writeln!(
                out,
                "Commission de retainer: {} € ({})",
                self.commission_retainer.grouped(),
                self.commission_retainer.en_lettres().unwrap_or_default()
            );
        }
        if !self.date_validite_accord.is_empty() {
            let _ = writeln!(out, "Date de validité: {}", self.date_validite_accord);
        }

        out
    }
}
