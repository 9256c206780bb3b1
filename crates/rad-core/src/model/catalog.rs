//! Instantánea congelada del proyecto.
//!
//! Reemplaza al contexto mutable de tablas compartidas del sistema original:
//! se construye una vez al comienzo de la pasada y después sólo se lee. Todo
//! el emparejamiento de una corrida ve el mismo estado del mundo aunque el
//! archivo cambie por debajo.

use rad_domain::{Assessor, ProcStatus, Scan};
use rad_domain::status::xsi;
use serde::{Deserialize, Serialize};

/// Descompone un full_path del archivo en (sesión, id del artefacto).
///
/// Forma esperada: `/projects/P/subjects/S/experiments/E/{scans|assessors}/ID`.
pub fn split_artefact_path(path: &str) -> Option<(&str, &str)> {
    let parts: Vec<&str> = path.split('/').collect();
    if parts.len() == 9 && parts[1] == "projects" && parts[5] == "experiments" {
        Some((parts[6], parts[8]))
    } else {
        None
    }
}

/// Vista de sólo lectura de las tablas de scans y assessors de un proyecto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCatalog {
    name: String,
    scans: Vec<Scan>,
    assessors: Vec<Assessor>,
}

impl ProjectCatalog {
    pub fn new(name: &str, scans: Vec<Scan>, assessors: Vec<Assessor>) -> Self {
        Self { name: name.to_string(),
               scans,
               assessors }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn scans(&self) -> &[Scan] { &self.scans }
    pub fn assessors(&self) -> &[Assessor] { &self.assessors }

    /// Sesiones presentes en la tabla de scans, ordenadas y sin repetir.
    /// El orden fija el recorrido determinista de la pasada.
    pub fn sessions(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.scans.iter().map(|s| s.session().to_string()).collect();
        labels.sort();
        labels.dedup();
        labels
    }

    pub fn scans_for_session(&self, session: &str) -> Vec<&Scan> {
        self.scans.iter().filter(|s| s.session() == session).collect()
    }

    pub fn assessors_for_session(&self, session: &str) -> Vec<&Assessor> {
        self.assessors.iter().filter(|a| a.session() == session).collect()
    }

    /// Sujeto dueño de la sesión; primero por la tabla de scans, si no por
    /// la de assessors. `None` es un "no encontrado" esperado.
    pub fn subject_of_session(&self, session: &str) -> Option<&str> {
        self.scans
            .iter()
            .find(|s| s.session() == session)
            .map(|s| s.subject())
            .or_else(|| {
                self.assessors
                    .iter()
                    .find(|a| a.session() == session)
                    .map(|a| a.subject())
            })
    }

    /// Calidad del scan identificado por (sesión, id), si existe.
    pub fn scan_quality(&self, session: &str, scan_id: &str) -> Option<&str> {
        self.scans
            .iter()
            .find(|s| s.session() == session && s.scan_id() == scan_id)
            .map(|s| s.quality())
    }

    /// Estado (procesamiento, QC) del assessor identificado por
    /// (sesión, etiqueta), si existe.
    pub fn assessor_status(&self, session: &str, label: &str) -> Option<(ProcStatus, &str)> {
        self.assessors
            .iter()
            .find(|a| a.session() == session && a.label() == label)
            .map(|a| (a.procstatus(), a.qcstatus()))
    }

    /// Scans PET de todas las sesiones del sujeto dueño de `session`.
    pub fn pet_scans_for_session_subject(&self, session: &str) -> Vec<&Scan> {
        let Some(subject) = self.subject_of_session(session) else {
            return Vec::new();
        };
        self.scans
            .iter()
            .filter(|s| s.subject() == subject && s.xsi_type() == xsi::PET_SESSION)
            .collect()
    }

    /// ¿Es `session` la primera sesión MR del sujeto? Orden cronológico por
    /// fecha; empates de fecha exacta se resuelven por orden de catálogo
    /// (el sort es estable). Sin sesiones MR registradas vale `true`.
    pub fn is_first_mr_session(&self, session: &str) -> bool {
        let Some(subject) = self.subject_of_session(session) else {
            return true;
        };
        let mut mr_rows: Vec<&Scan> = self.scans
                                          .iter()
                                          .filter(|s| s.subject() == subject && s.xsi_type() == xsi::MR_SESSION)
                                          .collect();
        mr_rows.sort_by_key(|s| s.date());
        match mr_rows.first() {
            Some(first) => first.session() == session,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn scan(subject: &str, session: &str, id: &str, xsi_type: &str, date: &str) -> Scan {
        Scan::new("P1", subject, session, id, "T1w", "usable", xsi_type,
                  NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(), None).unwrap()
    }

    #[test]
    fn split_path_extracts_session_and_id() {
        let p = "/projects/P1/subjects/S1/experiments/S1_MR1/scans/301";
        assert_eq!(split_artefact_path(p), Some(("S1_MR1", "301")));
        assert_eq!(split_artefact_path("/bad/path"), None);
    }

    #[test]
    fn sessions_are_sorted_and_unique() {
        let cat = ProjectCatalog::new("P1",
                                      vec![scan("S1", "S1_MR2", "1", xsi::MR_SESSION, "2024-02-01"),
                                           scan("S1", "S1_MR1", "1", xsi::MR_SESSION, "2024-01-01"),
                                           scan("S1", "S1_MR1", "2", xsi::MR_SESSION, "2024-01-01")],
                                      vec![]);
        assert_eq!(cat.sessions(), vec!["S1_MR1", "S1_MR2"]);
    }

    #[test]
    fn first_mr_session_is_chronological() {
        let cat = ProjectCatalog::new("P1",
                                      vec![scan("S1", "S1_MR2", "1", xsi::MR_SESSION, "2024-02-01"),
                                           scan("S1", "S1_MR1", "1", xsi::MR_SESSION, "2024-01-01")],
                                      vec![]);
        assert!(cat.is_first_mr_session("S1_MR1"));
        assert!(!cat.is_first_mr_session("S1_MR2"));
    }

    #[test]
    fn first_mr_session_tie_breaks_by_catalog_order() {
        let cat = ProjectCatalog::new("P1",
                                      vec![scan("S1", "S1_MRa", "1", xsi::MR_SESSION, "2024-01-01"),
                                           scan("S1", "S1_MRb", "1", xsi::MR_SESSION, "2024-01-01")],
                                      vec![]);
        assert!(cat.is_first_mr_session("S1_MRa"));
        assert!(!cat.is_first_mr_session("S1_MRb"));
    }

    #[test]
    fn pet_scans_come_from_all_subject_sessions() {
        let cat = ProjectCatalog::new("P1",
                                      vec![scan("S1", "S1_MR1", "1", xsi::MR_SESSION, "2024-01-01"),
                                           scan("S1", "S1_PET1", "1", xsi::PET_SESSION, "2024-03-01"),
                                           scan("S2", "S2_PET1", "1", xsi::PET_SESSION, "2024-03-01")],
                                      vec![]);
        let pets = cat.pet_scans_for_session_subject("S1_MR1");
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].session(), "S1_PET1");
    }
}
