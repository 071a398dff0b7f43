//! Optional clauses and rate condition blocks of the GFA termsheet.
//!
//! Each clause is either a plain flag (fixed sentence) or an
//! `Option<Fields>` (sentence interpolated from its fields). A disabled
//! clause resolves its placeholder to the empty string; the sentence
//! templates are fixed French text lifted from the bank's termsheet
//! wording and must not be reflowed.

use super::Taux;

/// Speculative-phase financing conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionsSpeculatives {
    /// EURIBOR margin, % per year.
    pub taux: Taux,
    /// Commitment commission, % per year.
    pub taux_commission_engagement: Taux,
}

impl Default for ConditionsSpeculatives {
    fn default() -> Self {
        Self { taux: Taux(2.25), taux_commission_engagement: Taux(0.75) }
    }
}

impl ConditionsSpeculatives {
    pub fn interets(&self) -> String {
        format!(
            "Intérêts portant sur les sommes utilisées calculés sur l'EURIBOR de la durée \
             du tirage (minimum un mois -- maximum 12 mois) majoré de {}% l'an, perçus \
             d'avance le jour de la mise à disposition des fonds ;",
            self.taux
        )
    }

    pub fn commission(&self) -> String {
        format!(
            "{}% l'an, calculée sur le montant total du crédit autorisé et perçue \
             trimestriellement et d'avance ;",
            self.taux_commission_engagement
        )
    }
}

/// Conditions applying once 40% of the revision price is covered by
/// notarized VEFA sales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionsNonSpeculatives {
    pub taux: Taux,
    pub taux_commission_engagement: Taux,
}

impl Default for ConditionsNonSpeculatives {
    fn default() -> Self {
        Self { taux: Taux(1.50), taux_commission_engagement: Taux(0.50) }
    }
}

impl ConditionsNonSpeculatives {
    pub fn interets(&self) -> String {
        format!(
            "Lorsque le montant du CA TTC des VEFA actées atteindra 40% et plus du Prix \
             de Revient TTC, les intérêts portant sur les sommes utilisées calculés sur \
             l'EURIBOR de la durée du tirage (minimum un mois -- maximum 12 mois) seront \
             ramenés à {}% l'an, perçus d'avance le jour de la mise à disposition des fonds.",
            self.taux
        )
    }

    pub fn commission(&self) -> String {
        format!(
            "Lorsque le montant du CA TTC des VEFA actées atteindra 40% et plus du Prix \
             de Revient TTC, {}% l'an, calculée sur le montant total du crédit autorisé \
             et perçue trimestriellement et d'avance.",
            self.taux_commission_engagement
        )
    }
}

/// Marketing level required over T3/T4/T5 lot types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommercialisationLots {
    pub t3: u16,
    pub t4: u16,
    pub t5: u16,
}

impl CommercialisationLots {
    pub fn sentence(&self) -> String {
        format!(
            "Justification d'un niveau de commercialisation incluant au moins {} lots de \
             type T3 ainsi qu'au moins {} lots de type T4 et {} lots de type T5 \
             (attestation du Notaire indiquant le niveau de pré commercialisation) ;",
            self.t3, self.t4, self.t5
        )
    }
}

/// Social-landlord approval for part of the programme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgrementBailleur {
    pub bailleur: String,
    /// "bloc social", "LLS", "LLI", "ULS"…
    pub type_bloc: String,
}

impl AgrementBailleur {
    pub fn sentence(&self) -> String {
        format!(
            "Justification de l'obtention de l'agrément par {} pour la partie « {} » ;",
            self.bailleur, self.type_bloc
        )
    }
}

/// Signed reservation contract from a landlord.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContratReservation {
    pub bailleur: String,
    pub type_bloc: String,
}

impl ContratReservation {
    pub fn sentence(&self) -> String {
        format!(
            "Justification d'un contrat de réservation signé de {} pour la partie « {} » \
             comprenant nom, adresse, prix de vente TTC et échéancier des versements ;",
            self.bailleur, self.type_bloc
        )
    }
}

/// Fixed sentence for the garantie d'actif/passif clause (share buyouts).
pub const GARANTIE_ACTIF_PASSIF: &str = "Le cas échéant, production de la garantie \
     d'actif/passif fournie par les vendeurs et examen favorable de LCL ; {cas rachat \
     de parts de société}";

/// Fixed sentence for the reservataires' financing-agreement clause.
pub const ACCORD_FINANCEMENT: &str = "Justification de l'obtention d'un accord de \
     principe de financement par la majorité des réservataires ;";

/// Fixed sentence for the PC-modification information undertaking.
pub const ENGAGEMENT_PC: &str = "Engagement de l'emprunteur d'informer la banque de \
     toute demande de PC modificatif et ce jusqu'au remboursement complet des concours \
     accordés ;";

/// The optional clauses of a GFA termsheet.
#[derive(Debug, Clone, Default)]
pub struct Clauses {
    /// Garantie d'actif/passif (share-buyout dossiers).
    pub garantie_actif_passif: bool,
    /// Minimum marketing level over T3/T4/T5 lots.
    pub commercialisation_lots: Option<CommercialisationLots>,
    /// Financing agreement from the majority of reservataires.
    pub accord_financement: bool,
    /// Social-landlord approval.
    pub agrement_bailleur: Option<AgrementBailleur>,
    /// Undertaking to report PC modification requests.
    pub engagement_pc: bool,
    /// Landlord reservation contract.
    pub contrat_reservation: Option<ContratReservation>,
    /// Free-market marketing level threshold, in percent.
    pub commercialisation_libre: Option<u8>,
}

impl Clauses {
    pub fn commercialisation_libre_sentence(&self) -> String {
        match self.commercialisation_libre {
            Some(niveau) => format!(
                "Justification d'un niveau de commercialisation du CATTC « libre » \
                 dépassant {niveau}% du CATTC « libre » (attestation notariée indiquant \
                 le niveau de pré commercialisation) ;"
            ),
            None => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speculative_sentences_carry_rates() {
        let conditions = ConditionsSpeculatives::default();
        assert!(conditions.interets().contains("majoré de 2,25% l'an"));
        assert!(conditions.commission().starts_with("0,75% l'an"));
    }

    #[test]
    fn non_speculative_sentences_mention_the_vefa_threshold() {
        let conditions = ConditionsNonSpeculatives::default();
        assert!(conditions.interets().contains("seront ramenés à 1,50% l'an"));
        assert!(conditions.commission().contains("atteindra 40% et plus"));
        assert!(conditions.commission().contains("0,50% l'an"));
    }

    #[test]
    fn lots_sentence_interpolates_counts() {
        let lots = CommercialisationLots { t3: 4, t4: 2, t5: 1 };
        let sentence = lots.sentence();
        assert!(sentence.contains("au moins 4 lots de type T3"));
        assert!(sentence.contains("2 lots de type T4 et 1 lots de type T5"));
    }

    #[test]
    fn bailleur_sentences() {
        let agrement = AgrementBailleur { bailleur: "CDC Habitat".into(), type_bloc: "LLS".into() };
        assert!(agrement.sentence().contains("l'agrément par CDC Habitat"));
        assert!(agrement.sentence().contains("« LLS »"));

        let contrat =
            ContratReservation { bailleur: "In'li".into(), type_bloc: "LLI".into() };
        assert!(contrat.sentence().contains("signé de In'li"));
        assert!(contrat.sentence().contains("échéancier des versements"));
    }

    #[test]
    fn commercialisation_libre_disabled_renders_empty() {
        let clauses = Clauses::default();
        assert_eq!(clauses.commercialisation_libre_sentence(), "");

        let clauses = Clauses { commercialisation_libre: Some(60), ..Clauses::default() };
        assert!(clauses.commercialisation_libre_sentence().contains("dépassant 60% du CATTC"));
    }
}
