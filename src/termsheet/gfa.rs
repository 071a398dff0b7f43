//! GFA (promoter credit) termsheet snapshot.

use std::fmt::Write as FmtWrite;

use super::clauses::{
    ACCORD_FINANCEMENT, Clauses, ConditionsNonSpeculatives, ConditionsSpeculatives,
    ENGAGEMENT_PC, GARANTIE_ACTIF_PASSIF,
};
use super::{Profil, Taux};
use crate::jeton::{Jeton, PlaceholderMap};
use crate::montant::Montant;

/// Everything a promoter-credit termsheet interpolates, captured once
/// per generate or preview action.
#[derive(Debug, Clone)]
pub struct TermsheetGfa {
    pub profil: Profil,
    pub date: String,
    pub reference_dossier: String,
    /// Borrower entity (SCCV) name.
    pub nom_sccv: String,
    pub numero_siren: String,
    pub ville_rcs: String,
    /// Programme description ("Réalisation à …, d'un immeuble neuf …").
    pub objet: String,
    pub montant_credit: Montant,
    /// GFA price, € excl. tax.
    pub montant_gfa: Montant,
    pub frais_dossier: Montant,
    pub montant_apports: Montant,
    pub date_echeance_gfa: String,
    pub conditions_speculatives: Option<ConditionsSpeculatives>,
    pub conditions_non_speculatives: Option<ConditionsNonSpeculatives>,
    pub taux_commission_forfaitaire: Taux,
    /// Global marketing level, in percent.
    pub niveau_commercialisation: u8,
    /// Append "(en y ajoutant les apports)," after the marketing level.
    pub inclure_apports: bool,
    pub clauses: Clauses,
}

impl Default for TermsheetGfa {
    fn default() -> Self {
        Self {
            profil: Profil::default(),
            date: String::new(),
            reference_dossier: String::new(),
            nom_sccv: String::new(),
            numero_siren: String::new(),
            ville_rcs: String::new(),
            objet: String::new(),
            montant_credit: Montant::default(),
            montant_gfa: Montant::default(),
            frais_dossier: Montant::default(),
            montant_apports: Montant::default(),
            date_echeance_gfa: String::new(),
            conditions_speculatives: Some(ConditionsSpeculatives::default()),
            conditions_non_speculatives: Some(ConditionsNonSpeculatives::default()),
            taux_commission_forfaitaire: Taux(0.55),
            niveau_commercialisation: 50,
            inclure_apports: true,
            clauses: Clauses::default(),
        }
    }
}

impl TermsheetGfa {
    /// Resolve every token of the GFA vocabulary.
    ///
    /// Disabled rate blocks and clauses map to the empty string, so their
    /// tokens vanish from the generated document instead of lingering as
    /// bracket text.
    pub fn placeholders(&self) -> PlaceholderMap {
        let mut map = PlaceholderMap::new();

        map.insert(Jeton::NomPromoteur, &self.profil.nom_promoteur);
        map.insert(Jeton::NomContact, &self.profil.nom_contact);
        map.insert(Jeton::AdressePromoteur, &self.profil.adresse_promoteur);
        map.insert(Jeton::Civilite, self.profil.civilite.as_str());
        map.insert(Jeton::Date, &self.date);
        map.insert(Jeton::ReferenceDossier, &self.reference_dossier);
        map.insert(Jeton::NomSccv, &self.nom_sccv);
        map.insert(Jeton::NomSccvLong, &self.nom_sccv);
        map.insert(Jeton::NumeroSiren, &self.numero_siren);
        map.insert(Jeton::VilleRcs, &self.ville_rcs);
        map.insert(Jeton::Objet, &self.objet);

        // Amounts, in figures then in words. A malformed entry keeps its
        // raw text in figures and yields no word form at all.
        let montants = [
            (Jeton::NombreCredit, Jeton::NombreCreditLettres, &self.montant_credit),
            (Jeton::MontantCredit, Jeton::MontantCreditLettres, &self.montant_credit),
            (Jeton::NombreGfa, Jeton::NombreGfaLettres, &self.montant_gfa),
            (Jeton::MontantGfa, Jeton::MontantGfaLettres, &self.montant_gfa),
            (Jeton::NombreApport, Jeton::NombreApportLettres, &self.montant_apports),
            (Jeton::NombreFraisDossier, Jeton::NombreFraisDossierLettres, &self.frais_dossier),
        ];
        for (figures, lettres, montant) in montants {
            map.insert(figures, montant.grouped());
            map.insert(lettres, montant.en_lettres().unwrap_or_default());
        }

        map.insert(Jeton::DateEcheanceGfa, &self.date_echeance_gfa);
        map.insert(
            Jeton::TauxCommissionForfaitaire,
            self.taux_commission_forfaitaire.to_string(),
        );

        map.insert(
            Jeton::NiveauCommercialisation,
            self.niveau_commercialisation.to_string(),
        );
        map.insert(
            Jeton::MentionApports,
            if self.inclure_apports { "(en y ajoutant les apports)," } else { "" },
        );

        match &self.conditions_speculatives {
            Some(conditions) => {
                map.insert(Jeton::TauxSpeculatif, conditions.taux.to_string());
                map.insert(
                    Jeton::TauxCommissionEngagementSpeculatif,
                    conditions.taux_commission_engagement.to_string(),
                );
                map.insert(Jeton::InteretsSpeculatifs, conditions.interets());
                map.insert(Jeton::CommissionSpeculative, conditions.commission());
            },
            None => {
                map.insert(Jeton::TauxSpeculatif, "");
                map.insert(Jeton::TauxCommissionEngagementSpeculatif, "");
                map.insert(Jeton::InteretsSpeculatifs, "");
                map.insert(Jeton::CommissionSpeculative, "");
            },
        }

        match &self.conditions_non_speculatives {
            Some(conditions) => {
                map.insert(Jeton::TauxNonSpeculatif, conditions.taux.to_string());
                map.insert(
                    Jeton::TauxCommissionEngagementNonSpeculatif,
                    conditions.taux_commission_engagement.to_string(),
                );
                map.insert(Jeton::InteretsNonSpeculatifs, conditions.interets());
                map.insert(Jeton::CommissionNonSpeculative, conditions.commission());
            },
            None => {
                map.insert(Jeton::TauxNonSpeculatif, "");
                map.insert(Jeton::TauxCommissionEngagementNonSpeculatif, "");
                map.insert(Jeton::InteretsNonSpeculatifs, "");
                map.insert(Jeton::CommissionNonSpeculative, "");
            },
        }

        map.insert(
            Jeton::ClauseGarantieActifPassif,
            if self.clauses.garantie_actif_passif { GARANTIE_ACTIF_PASSIF } else { "" },
        );
        map.insert(
            Jeton::ClauseNiveauCommercialisationLots,
            self.clauses
                .commercialisation_lots
                .as_ref()
                .map(|lots| lots.sentence())
                .unwrap_or_default(),
        );
        map.insert(Jeton::NombreT3, lot_count(&self.clauses, |lots| lots.t3));
        map.insert(Jeton::NombreT4, lot_count(&self.clauses, |lots| lots.t4));
        map.insert(Jeton::NombreT5, lot_count(&self.clauses, |lots| lots.t5));
        map.insert(
            Jeton::ClauseAccordFinancement,
            if self.clauses.accord_financement { ACCORD_FINANCEMENT } else { "" },
        );
        map.insert(
            Jeton::ClauseAgrementBailleur,
            self.clauses
                .agrement_bailleur
                .as_ref()
                .map(|agrement| agrement.sentence())
                .unwrap_or_default(),
        );
        let bailleur_agrement = self
            .clauses
            .agrement_bailleur
            .as_ref()
            .map(|agrement| agrement.bailleur.as_str())
            .unwrap_or_default();
        map.insert(Jeton::LeBailleur, bailleur_agrement);
        map.insert(Jeton::NomBailleurAgrement, bailleur_agrement);
        map.insert(
            Jeton::TypeBloc,
            self.clauses
                .agrement_bailleur
                .as_ref()
                .map(|agrement| agrement.type_bloc.as_str())
                .unwrap_or_default(),
        );
        map.insert(
            Jeton::ClauseEngagementPc,
            if self.clauses.engagement_pc { ENGAGEMENT_PC } else { "" },
        );
        map.insert(
            Jeton::ClauseContratReservation,
            self.clauses
                .contrat_reservation
                .as_ref()
                .map(|contrat| contrat.sentence())
                .unwrap_or_default(),
        );
        let bailleur_reservation = self
            .clauses
            .contrat_reservation
            .as_ref()
            .map(|contrat| contrat.bailleur.as_str())
            .unwrap_or_default();
        map.insert(Jeton::NomDuBailleur, bailleur_reservation);
        map.insert(Jeton::NomBailleurReservation, bailleur_reservation);
        map.insert(
            Jeton::TypeBlocReservation,
            self.clauses
                .contrat_reservation
                .as_ref()
                .map(|contrat| contrat.type_bloc.as_str())
                .unwrap_or_default(),
        );
        map.insert(
            Jeton::ClauseNiveauCommercialisationLibre,
            self.clauses.commercialisation_libre_sentence(),
        );
        map.insert(
            Jeton::NiveauCommercialisationLibre,
            self.clauses
                .commercialisation_libre
                .map(|niveau| niveau.to_string())
                .unwrap_or_default(),
        );

        map
    }

    /// Plain-text summary of the resolved values, for the operator to
    /// check before generating.
    pub fn preview(&self) -> String {
        let mut out = String::from("=== APERÇU DES VALEURS ===\n\n");

        out.push_str("CHAMPS PRINCIPAUX:\n");
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
            ("Date d'échéance GFA", self.date_echeance_gfa.as_str()),
        ];
        for (label, value) in champs {
            if !value.is_empty() {
                let _ = writeln!(out, "{label} = {value}");
            }
        }
        for (label, montant) in [
            ("Montant du crédit", &self.montant_credit),
            ("Prix GFA", &self.montant_gfa),
            ("Frais de dossier", &self.frais_dossier),
            ("Apports", &self.montant_apports),
        ] {
            if !montant.is_empty() {
                match montant.en_lettres() {
                    Some(lettres) => {
                        let _ = writeln!(out, "{label} = {} € ({lettres} euros)", montant.grouped());
                    },
                    None => {
                        let _ = writeln!(out, "{label} = {} €", montant.grouped());
                    },
                }
            }
        }
        if !self.objet.is_empty() {
            let _ = writeln!(out, "\nOBJET:\n{}", self.objet);
        }

        out.push_str("\nOPTIONS:\n");
        let _ = writeln!(
            out,
            "Niveau de commercialisation : {}%{}",
            self.niveau_commercialisation,
            if self.inclure_apports { " (en y ajoutant les apports)" } else { "" }
        );
        if let Some(conditions) = &self.conditions_speculatives {
            let _ = writeln!(
                out,
                "✓ Conditions spéculatives : {}% / commission {}%",
                conditions.taux, conditions.taux_commission_engagement
            );
        }
        if let Some(conditions) = &self.conditions_non_speculatives {
            let _ = writeln!(
                out,
                "✓ Conditions non spéculatives : {}% / commission {}%",
                conditions.taux, conditions.taux_commission_engagement
            );
        }
        let _ = writeln!(
            out,
            "Taux commission forfaitaire : {}%",
            self.taux_commission_forfaitaire
        );

        out.push_str("\nCLAUSES OPTIONNELLES:\n");
        let cases = [
            ("Garantie d'actif/passif", self.clauses.garantie_actif_passif),
            (
                "Niveau de commercialisation (lots T3/T4/T5)",
                self.clauses.commercialisation_lots.is_some(),
            ),
            ("Accord de financement des réservataires", self.clauses.accord_financement),
            ("Agrément bailleur social", self.clauses.agrement_bailleur.is_some()),
            ("Engagement d'information modification PC", self.clauses.engagement_pc),
            ("Contrat de réservation bailleur", self.clauses.contrat_reservation.is_some()),
            (
                "Niveau de commercialisation libre",
                self.clauses.commercialisation_libre.is_some(),
            ),
        ];
        for (label, enabled) in cases {
            let _ = writeln!(out, "{} {label}", if enabled { "✓" } else { "✗" });
        }

        out
    }
}

fn lot_count(clauses: &Clauses, pick: impl Fn(&super::CommercialisationLots) -> u16) -> String {
    clauses
        .commercialisation_lots
        .as_ref()
        .map(|lots| pick(lots).to_string())
        .unwrap_or_default()
}
