//! services/portal/src/cli/render.rs
//!
//! Turns core state into console text. Nothing here talks to the backend.

use chrono::{DateTime, Utc};
use clinic_portal_core::domain::{DoctorNote, HealthRecord, PatientProfile};
use clinic_portal_core::panel::PatientRecords;
use clinic_portal_core::{DoctorChoices, Listing, View};
use std::fmt::Write;

fn date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// The line printed whenever the current view changes.
pub fn header(view: View, display_name: Option<&str>) -> String {
    match (view, display_name) {
        (View::PatientDashboard | View::DoctorDashboard, Some(name)) if !name.is_empty() => {
            format!("== {} == Welcome, {}", view, name)
        }
        _ => format!("== {} ==", view),
    }
}

pub fn records(listing: &Listing<HealthRecord>) -> String {
    match listing {
        Listing::NotLoaded => "Records not loaded yet. Type 'records' to load them.".to_string(),
        Listing::Empty => "No health records found.".to_string(),
        Listing::Items(items) => record_lines(items),
    }
}

fn record_lines(items: &[HealthRecord]) -> String {
    let mut out = String::new();
    for record in items {
        let _ = writeln!(
            out,
            "[{}] {} ({})",
            record.id,
            record.title,
            date(record.date)
        );
        let _ = writeln!(out, "    {}", record.description);
        if !record.doctor_notes.is_empty() {
            let _ = writeln!(out, "    {} doctor note(s)", record.doctor_notes.len());
        }
    }
    out.trim_end().to_string()
}

/// One record in full, including the notes attached to it.
pub fn record_detail(record: &HealthRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Record #{}: {}", record.id, record.title);
    let _ = writeln!(out, "Date: {}", date(record.date));
    let _ = writeln!(out, "{}", record.description);
    let _ = writeln!(out, "Doctor notes:");
    out.push_str(&note_lines(&record.doctor_notes));
    out
}

pub fn notes(listing: &Listing<DoctorNote>) -> String {
    note_lines(listing.items())
}

fn note_lines(items: &[DoctorNote]) -> String {
    if items.is_empty() {
        return "No notes available.".to_string();
    }
    items
        .iter()
        .map(|note| match note.doctor_name.as_deref() {
            Some(doctor) => format!("- {} (Dr. {}, {})", note.note, doctor, date(note.date)),
            None => format!("- {} ({})", note.note, date(note.date)),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn patients(listing: &Listing<PatientProfile>) -> String {
    match listing {
        Listing::NotLoaded => "Patients not loaded yet. Type 'patients' to load them.".to_string(),
        Listing::Empty => "No patients found.".to_string(),
        Listing::Items(items) => items
            .iter()
            .map(|p| {
                let mut line = format!("[{}] {} <{}>", p.id, p.display_name(), p.email);
                if let Some(born) = p.date_of_birth {
                    let _ = write!(line, " born {}", born.format("%Y-%m-%d"));
                }
                line
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn patient_records(selected: &PatientRecords) -> String {
    let body = match &selected.records {
        Listing::Items(items) => record_lines(items),
        _ => "This patient has no health records yet.".to_string(),
    };
    format!("Records for patient #{}:\n{}", selected.patient_id, body)
}

pub fn doctor_choices(choices: &DoctorChoices) -> String {
    if let Some(placeholder) = choices.placeholder {
        return placeholder.to_string();
    }
    match &choices.doctors {
        Listing::Items(items) => {
            let mut out = String::from("Select a doctor:");
            for doctor in items {
                let _ = write!(
                    out,
                    "\n  [{}] Dr. {} ({})",
                    doctor.id, doctor.username, doctor.email
                );
            }
            out
        }
        _ => "No doctors available".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clinic_portal_core::domain::AvailableDoctor;

    fn record(id: i64, title: &str) -> HealthRecord {
        HealthRecord {
            id,
            title: title.to_string(),
            description: "Routine visit".to_string(),
            date: Some(Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap()),
            patient: Some(1),
            doctor_notes: Vec::new(),
        }
    }

    #[test]
    fn empty_record_list_has_its_own_text() {
        assert_eq!(records(&Listing::Empty), "No health records found.");
    }

    #[test]
    fn records_show_id_title_and_date() {
        let text = records(&Listing::Items(vec![record(4, "Checkup")]));
        assert!(text.starts_with("[4] Checkup (2024-03-09)"));
        assert!(text.contains("Routine visit"));
    }

    #[test]
    fn record_without_notes_says_so() {
        let text = record_detail(&record(4, "Checkup"));
        assert!(text.ends_with("No notes available."));
    }

    #[test]
    fn patient_without_records_gets_empty_message() {
        let selected = PatientRecords {
            patient_id: 3,
            records: Listing::Empty,
        };
        assert!(patient_records(&selected).ends_with("This patient has no health records yet."));
    }

    #[test]
    fn doctor_placeholder_wins_over_options() {
        let choices = DoctorChoices {
            doctors: Listing::Empty,
            placeholder: Some("No doctors available"),
            notice: Some("There are no registered doctors in the system.".to_string()),
        };
        assert_eq!(doctor_choices(&choices), "No doctors available");
    }

    #[test]
    fn doctor_options_list_ids() {
        let choices = DoctorChoices {
            doctors: Listing::Items(vec![AvailableDoctor {
                id: 7,
                username: "house".to_string(),
                email: "house@clinic.org".to_string(),
            }]),
            placeholder: None,
            notice: None,
        };
        assert!(doctor_choices(&choices).contains("[7] Dr. house (house@clinic.org)"));
    }

    #[test]
    fn dashboard_header_greets_user() {
        assert!(header(View::DoctorDashboard, Some("Dr. house")).ends_with("Welcome, Dr. house"));
        assert!(!header(View::Login, None).contains("Welcome"));
    }
}
