//! Placeholder token vocabulary.
//!
//! Every substitution point of the two template families is a literal
//! bracketed string ("jeton") enumerated here as a closed sum type, so a
//! placeholder map can only ever be built over known tokens — a missing
//! or misspelled key is unrepresentable instead of silently resolving to
//! an empty string.
//!
//! Several literals reproduce quirks of the template files themselves
//! (the `comission` spelling, the accent missing from the CII variant's
//! `[réference dossier]`); they must match the templates byte for byte.

/// A placeholder token literal from one of the two template families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jeton {
    // Shared letterhead fields
    NomPromoteur,
    NomContact,
    AdressePromoteur,
    Date,
    ReferenceDossier,
    ReferenceDossierCii,
    Civilite,
    NomSccv,
    NomSccvLong,
    NumeroSiren,
    VilleRcs,
    Objet,

    // GFA amounts, in figures and in words
    NombreCredit,
    NombreCreditLettres,
    MontantCredit,
    MontantCreditLettres,
    NombreGfa,
    NombreGfaLettres,
    MontantGfa,
    MontantGfaLettres,
    NombreApport,
    NombreApportLettres,
    NombreFraisDossier,
    NombreFraisDossierLettres,

    // GFA rates and marketing levels
    TauxSpeculatif,
    TauxNonSpeculatif,
    TauxCommissionEngagementSpeculatif,
    TauxCommissionEngagementNonSpeculatif,
    TauxCommissionForfaitaire,
    NiveauCommercialisation,
    MentionApports,
    NiveauCommercialisationLibre,

    // GFA rate condition blocks
    InteretsSpeculatifs,
    CommissionSpeculative,
    InteretsNonSpeculatifs,
    CommissionNonSpeculative,

    // GFA clause fields
    LeBailleur,
    NomBailleurAgrement,
    TypeBloc,
    NomDuBailleur,
    NomBailleurReservation,
    TypeBlocReservation,
    NombreT3,
    NombreT4,
    NombreT5,
    DateEcheanceGfa,

    // GFA optional clauses
    ClauseGarantieActifPassif,
    ClauseNiveauCommercialisationLots,
    ClauseAccordFinancement,
    ClauseAgrementBailleur,
    ClauseEngagementPc,
    ClauseContratReservation,
    ClauseNiveauCommercialisationLibre,

    // CII variant
    SectionCompleteCii,
    NombreCommissionForfaitaire,
    NombreCommissionForfaitaireLettres,
    TauxCommissionRisque,
    NombreFraisActe,
    NombreFraisActeLettres,
    NombreCommissionRetainer,
    NombreCommissionRetainerLettres,
    DateValiditeAccord,
}

impl Jeton {
    /// The literal bracketed text as it appears in the template.
    pub const fn literal(self) -> &'static str {
        match self {
            Jeton::NomPromoteur => "[Nom du promoteur]",
            Jeton::NomContact => "[nom]",
            Jeton::AdressePromoteur => "[Adresse du promoteur]",
            Jeton::Date => "[date]",
            Jeton::ReferenceDossier => "[référence dossier]",
            Jeton::ReferenceDossierCii => "[réference dossier]",
            Jeton::Civilite => "[Monsieur/Madame/Messieurs]",
            Jeton::NomSccv => "[NOM]",
            Jeton::NomSccvLong => "[nom de la SCCV]",
            Jeton::NumeroSiren => "[n° siren]",
            Jeton::VilleRcs => "[Ville]",
            Jeton::Objet => "[objet]",

            Jeton::NombreCredit => "[nombre_credit]",
            Jeton::NombreCreditLettres => "[nombre_credit_lettres]",
            Jeton::MontantCredit => "[montant_credit]",
            Jeton::MontantCreditLettres => "[montant_credit_lettres]",
            Jeton::NombreGfa => "[nombre_gfa]",
            Jeton::NombreGfaLettres => "[nombre_gfa_lettres]",
            Jeton::MontantGfa => "[montant_gfa]",
            Jeton::MontantGfaLettres => "[montant_gfa_lettres]",
            Jeton::NombreApport => "[nombre_apport]",
            Jeton::NombreApportLettres => "[nombre_apport_lettres]",
            Jeton::NombreFraisDossier => "[nombre_frais_dossier]",
            Jeton::NombreFraisDossierLettres => "[nombre_frais_dossier_lettres]",

            Jeton::TauxSpeculatif => "[taux_speculatif]",
            Jeton::TauxNonSpeculatif => "[taux_non_speculatif]",
            Jeton::TauxCommissionEngagementSpeculatif => "[taux_comission_engagement_speculatif]",
            Jeton::TauxCommissionEngagementNonSpeculatif => {
                "[taux_comission_engagement_non_speculatif]"
            },
            Jeton::TauxCommissionForfaitaire => "[taux_comission_forfaitaire]",
            Jeton::NiveauCommercialisation => "[niveau_commercialisation]",
            Jeton::MentionApports => "[mention_apports]",
            Jeton::NiveauCommercialisationLibre => "[niveau_commercialisation_libre]",

            Jeton::InteretsSpeculatifs => "[interets_speculatifs]",
            Jeton::CommissionSpeculative => "[commission_speculative]",
            Jeton::InteretsNonSpeculatifs => "[interets_non_speculatifs]",
            Jeton::CommissionNonSpeculative => "[commission_non_speculative]",

            Jeton::LeBailleur => "[le bailleur]",
            Jeton::NomBailleurAgrement => "[nom_bailleur_agrement]",
            Jeton::TypeBloc => "[type_bloc]",
            Jeton::NomDuBailleur => "[nom du bailleur]",
            Jeton::NomBailleurReservation => "[nom_bailleur_reservation]",
            Jeton::TypeBlocReservation => "[type_bloc_reservation]",
            Jeton::NombreT3 => "[nombre_t3]",
            Jeton::NombreT4 => "[nombre_t4]",
            Jeton::NombreT5 => "[nombre_t5]",
            Jeton::DateEcheanceGfa => "[date_echeance_gfa]",

            Jeton::ClauseGarantieActifPassif => "[clause_garantie_actif_passif]",
            Jeton::ClauseNiveauCommercialisationLots => "[clause_niveau_commercialisation_lots]",
            Jeton::ClauseAccordFinancement => "[clause_accord_financement]",
            Jeton::ClauseAgrementBailleur => "[clause_agrement_bailleur]",
            Jeton::ClauseEngagementPc => "[clause_engagement_pc]",
            Jeton::ClauseContratReservation => "[clause_contrat_reservation]",
            Jeton::ClauseNiveauCommercialisationLibre => {
                "[clause_niveau_commercialisation_libre]"
            },

            Jeton::SectionCompleteCii => "[section_complete_cii]",
            Jeton::NombreCommissionForfaitaire => "[nombre_comission_forfaitaire]",
            Jeton::NombreCommissionForfaitaireLettres => {
                "[nombre_comission_forfaitaire_lettres]"
            },
            Jeton::TauxCommissionRisque => "[taux_commission_risque]",
            Jeton::NombreFraisActe => "[nombre_frais_acte]",
            Jeton::NombreFraisActeLettres => "[nombre_frais_acte_lettres]",
            Jeton::NombreCommissionRetainer => "[nombre_commission_retainer]",
            Jeton::NombreCommissionRetainerLettres => "[nombre_commission_retainer_lettres]",
            Jeton::DateValiditeAccord => "[date_validite_accord]",
        }
    }
}

/// Mapping from tokens to replacement strings.
///
/// Built by the snapshot structs in [`crate::termsheet`]; an entry per
/// token of the variant's vocabulary, with disabled clauses mapped to
/// the empty string. Insertion order is preserved but insignificant —
/// the compiled automaton matches tokens, not positions.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderMap {
    entries: Vec<(Jeton, String)>,
}

impl PlaceholderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for a token.
    pub fn insert(&mut self, jeton: Jeton, valeur: impl Into<String>) {
        let valeur = valeur.into();
        if let Some(entry) = self.entries.iter_mut().find(|(j, _)| *j == jeton) {
            entry.1 = valeur;
        } else {
            self.entries.push((jeton, valeur));
        }
    }

    pub fn get(&self, jeton: Jeton) -> Option<&str> {
        self.entries
            .iter()
            .find(|(j, _)| *j == jeton)
            .map(|(_, v)| v.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (Jeton, &str)> {
        self.entries.iter().map(|(j, v)| (*j, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
