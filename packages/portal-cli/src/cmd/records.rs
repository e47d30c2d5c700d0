//! Dashboard record commands

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::Subcommand;
use console::style;
use medichain_client::{NewAppointment, NewPrescription, Prescription, Role};
use uuid::Uuid;

use crate::cmd::checked_session;
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum AppointmentsCommand {
    /// List appointments for the logged-in account
    List,

    /// Book an appointment with a doctor (patient only)
    Book {
        /// Doctor to book with
        #[arg(long)]
        doctor: Uuid,

        /// Date and time, e.g. 2025-03-01T09:30
        #[arg(long)]
        date: String,

        /// Reason for the visit
        #[arg(long)]
        reason: Option<String>,

        /// Additional notes for the doctor
        #[arg(long)]
        notes: Option<String>,
    },
}

pub async fn appointments(ctx: &AppContext, cmd: AppointmentsCommand) -> Result<()> {
    match cmd {
        AppointmentsCommand::List => list_appointments(ctx).await,
        AppointmentsCommand::Book {
            doctor,
            date,
            reason,
            notes,
        } => book_appointment(ctx, doctor, &date, reason, notes).await,
    }
}

#[derive(Subcommand)]
pub enum PrescriptionsCommand {
    /// List prescriptions for the logged-in account
    List,

    /// Write a prescription for a patient (doctor only)
    Write {
        /// Patient the prescription is for
        #[arg(long)]
        patient: Uuid,

        /// Medication name; repeat for multi-drug prescriptions
        #[arg(long = "medication", required = true)]
        medications: Vec<String>,

        /// Dosage, e.g. "10mg twice daily"
        #[arg(long)]
        dosage: String,

        /// Additional instructions
        #[arg(long)]
        instructions: Option<String>,
    },
}

pub async fn prescriptions(ctx: &AppContext, cmd: PrescriptionsCommand) -> Result<()> {
    match cmd {
        PrescriptionsCommand::List => list_prescriptions(ctx).await,
        PrescriptionsCommand::Write {
            patient,
            medications,
            dosage,
            instructions,
        } => write_prescription(ctx, patient, medications, dosage, instructions).await,
    }
}

/// Lab reports uploaded for the logged-in patient.
pub async fn history(ctx: &AppContext) -> Result<()> {
    if ctx.role != Role::Patient {
        bail!("medical history is a patient view; rerun with --role patient");
    }
    checked_session(ctx)?;
    let reports = ctx.portal().medical_history(ctx.role).await?;

    ctx.print_header(&format!("Lab reports ({})", reports.len()));
    if reports.is_empty() {
        ctx.print_info("No lab reports yet.");
        return Ok(());
    }
    for report in &reports {
        println!(
            "  {}  {:<20} {}",
            report.uploaded_at.format("%Y-%m-%d"),
            report.report_type,
            style(&report.file_url).dim()
        );
    }
    Ok(())
}

/// Audit trail entries recorded for the logged-in account.
pub async fn audit(ctx: &AppContext) -> Result<()> {
    checked_session(ctx)?;
    let entries = ctx.portal().audit_logs(ctx.role).await?;

    ctx.print_header(&format!("Audit trail ({})", entries.len()));
    if entries.is_empty() {
        ctx.print_info("No audit entries yet.");
        return Ok(());
    }
    for entry in &entries {
        let target = match entry.target_id {
            Some(id) => format!("{} {}", entry.target_type, id),
            None => entry.target_type.clone(),
        };
        println!(
            "  {}  {:<24} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.action,
            style(target).dim()
        );
    }
    Ok(())
}

/// Care assignments linking the logged-in account to the other role.
pub async fn care_team(ctx: &AppContext) -> Result<()> {
    checked_session(ctx)?;
    let links = ctx.portal().care_team(ctx.role).await?;

    ctx.print_header(&format!("Care team ({})", links.len()));
    if links.is_empty() {
        ctx.print_info("No care assignments yet.");
        return Ok(());
    }
    let counterpart = counterpart_label(ctx.role);
    for link in &links {
        let other = match ctx.role {
            Role::Patient => link.doctor_id,
            Role::Doctor => link.patient_id,
        };
        let active = if link.is_active {
            style("active").green()
        } else {
            style("inactive").red()
        };
        println!(
            "  {}  {:<16} {}  {} {}",
            link.assigned_at.format("%Y-%m-%d"),
            link.relationship_type,
            active,
            counterpart,
            other
        );
    }
    Ok(())
}

async fn list_appointments(ctx: &AppContext) -> Result<()> {
    checked_session(ctx)?;
    let appointments = ctx.portal().appointments(ctx.role).await?;

    ctx.print_header(&format!("Appointments ({})", appointments.len()));
    if appointments.is_empty() {
        ctx.print_info("No appointments yet.");
        return Ok(());
    }

    let counterpart = counterpart_label(ctx.role);
    for appointment in &appointments {
        let other = match ctx.role {
            Role::Patient => appointment.doctor_id,
            Role::Doctor => appointment.patient_id,
        };
        println!(
            "  {}  {}  {} {}",
            appointment.appointment_date.format("%Y-%m-%d %H:%M"),
            status_style(&appointment.status),
            counterpart,
            other
        );
        if let Some(reason) = &appointment.reason {
            println!("      {}", style(reason).dim());
        }
    }
    Ok(())
}

async fn book_appointment(
    ctx: &AppContext,
    doctor: Uuid,
    date: &str,
    reason: Option<String>,
    notes: Option<String>,
) -> Result<()> {
    if ctx.role != Role::Patient {
        bail!("booking is a patient operation; rerun with --role patient");
    }
    let session = checked_session(ctx)?;
    let patient_id: Uuid = session
        .profile
        .id
        .parse()
        .context("stored profile id is not a valid UUID")?;

    let appointment = ctx
        .portal()
        .book_appointment(
            ctx.role,
            &NewAppointment {
                patient_id,
                doctor_id: doctor,
                appointment_date: parse_datetime(date)?,
                reason,
                notes,
            },
        )
        .await?;

    ctx.print_success("Appointment booked successfully!");
    ctx.print_info(&format!(
        "Scheduled for {}",
        appointment.appointment_date.format("%Y-%m-%d %H:%M")
    ));
    Ok(())
}

async fn list_prescriptions(ctx: &AppContext) -> Result<()> {
    checked_session(ctx)?;
    let prescriptions = ctx.portal().prescriptions(ctx.role).await?;

    ctx.print_header(&format!("Prescriptions ({})", prescriptions.len()));
    if prescriptions.is_empty() {
        ctx.print_info("No prescriptions yet.");
        return Ok(());
    }
    for prescription in &prescriptions {
        println!(
            "  {}  {}  {}",
            prescription.created_at.format("%Y-%m-%d"),
            medication_list(prescription),
            style(&prescription.dosage).dim()
        );
        if let Some(instructions) = &prescription.instructions {
            println!("      {}", style(instructions).dim());
        }
    }
    Ok(())
}

async fn write_prescription(
    ctx: &AppContext,
    patient: Uuid,
    medications: Vec<String>,
    dosage: String,
    instructions: Option<String>,
) -> Result<()> {
    if ctx.role != Role::Doctor {
        bail!("writing prescriptions is a doctor operation; rerun with --role doctor");
    }
    let session = checked_session(ctx)?;
    let doctor_id: Uuid = session
        .profile
        .id
        .parse()
        .context("stored profile id is not a valid UUID")?;

    ctx.portal()
        .write_prescription(
            ctx.role,
            &NewPrescription {
                patient_id: patient,
                doctor_id,
                medication: serde_json::to_string(&medications)?,
                dosage,
                instructions,
            },
        )
        .await?;

    ctx.print_success("Prescription created successfully!");
    Ok(())
}

fn counterpart_label(role: Role) -> &'static str {
    match role {
        Role::Patient => "doctor",
        Role::Doctor => "patient",
    }
}

fn status_style(status: &str) -> console::StyledObject<&str> {
    match status {
        "completed" => style(status).green(),
        "cancelled" => style(status).red(),
        _ => style(status).yellow(),
    }
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime> {
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(parsed);
        }
    }
    bail!("invalid date '{}', expected YYYY-MM-DDTHH:MM", raw)
}

/// The wire format stores a prescription's drugs as a JSON-encoded list;
/// fall back to the raw string for free-text entries.
fn medication_list(prescription: &Prescription) -> String {
    serde_json::from_str::<Vec<String>>(&prescription.medication)
        .map(|drugs| drugs.join(", "))
        .unwrap_or_else(|_| prescription.medication.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_accepts_common_forms() {
        assert!(parse_datetime("2025-03-01T09:30").is_ok());
        assert!(parse_datetime("2025-03-01 09:30").is_ok());
        assert!(parse_datetime("2025-03-01T09:30:00").is_ok());
        assert!(parse_datetime("tomorrow").is_err());
    }

    #[test]
    fn test_medication_list_joins_encoded_drugs() {
        let prescription: Prescription = serde_json::from_value(serde_json::json!({
            "id": "0e2a1c62-4b57-4f3e-9d0a-6a4f4f0b9f55",
            "patient_id": "0e2a1c62-4b57-4f3e-9d0a-6a4f4f0b9f56",
            "doctor_id": "0e2a1c62-4b57-4f3e-9d0a-6a4f4f0b9f57",
            "medication": "[\"Aspirin\",\"Lisinopril\"]",
            "dosage": "10mg daily",
            "created_at": "2025-02-20T18:00:00"
        }))
        .unwrap();
        assert_eq!(medication_list(&prescription), "Aspirin, Lisinopril");

        let plain = Prescription {
            medication: "Aspirin".into(),
            ..prescription
        };
        assert_eq!(medication_list(&plain), "Aspirin");
    }
}
