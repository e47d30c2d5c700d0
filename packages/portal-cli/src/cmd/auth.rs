//! Account and session commands

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use medichain_client::{DoctorRegistration, PatientRegistration, Registration, Role};
use portal::{AccessDecision, DenyReason, Session};

use crate::cmd::checked_session;
use crate::context::AppContext;

/// Create an account for the selected role, prompting for the signup form.
pub async fn register(ctx: &AppContext) -> Result<()> {
    if ctx.quiet {
        bail!("registration is interactive; rerun without --quiet");
    }
    ctx.print_header(&format!("Register a {} account", ctx.role));

    let theme = ctx.theme();
    let registration = match ctx.role {
        Role::Patient => patient_registration(&theme)?,
        Role::Doctor => doctor_registration(&theme)?,
    };

    let session = ctx.portal().signup(&registration).await?;
    ctx.print_success("Registration successful!");
    ctx.print_info(&format!(
        "Logged in as {} ({})",
        display_name(&session),
        ctx.role
    ));
    Ok(())
}

/// Log in and store the session for later commands.
pub async fn login(ctx: &AppContext, email: Option<String>) -> Result<()> {
    if ctx.quiet {
        bail!("login prompts for a password; rerun without --quiet");
    }
    ctx.print_header(&format!("Log in as {}", ctx.role));

    let theme = ctx.theme();
    let email = match email {
        Some(email) => email,
        None => prompt_text(&theme, "Email")?,
    };
    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;

    let session = ctx.portal().login(ctx.role, &email, &password).await?;
    ctx.print_success("Login successful!");
    ctx.print_info(&format!("Welcome back, {}", display_name(&session)));
    Ok(())
}

/// Drop the stored session for the selected role.
pub fn logout(ctx: &AppContext) -> Result<()> {
    ctx.portal().logout(ctx.role)?;
    ctx.print_success("Logged out successfully");
    Ok(())
}

/// Show whether a usable session is stored, and the profile it carries.
pub fn status(ctx: &AppContext) -> Result<()> {
    match ctx.portal().authorize(ctx.role)? {
        AccessDecision::Allow(session) => {
            ctx.print_header(&format!("Active {} session", ctx.role));
            println!("  {:<16} {}", "id", session.profile.id);
            for (field, value) in &session.profile.rest {
                if let Some(text) = value.as_str() {
                    println!("  {:<16} {}", field, text);
                }
            }
        }
        AccessDecision::Deny(DenyReason::NotAuthenticated) => {
            ctx.print_warning(&format!(
                "No {} session. Run `medichain --role {} login` to sign in.",
                ctx.role, ctx.role
            ));
        }
        AccessDecision::Deny(DenyReason::InvalidSession) => {
            ctx.print_warning("Session invalid. Please log in again.");
        }
    }
    Ok(())
}

/// Exchange the stored refresh token for a fresh access token.
pub async fn refresh(ctx: &AppContext) -> Result<()> {
    checked_session(ctx)?;
    ctx.portal().refresh(ctx.role).await?;
    ctx.print_success("Access token refreshed");
    Ok(())
}

fn patient_registration(theme: &ColorfulTheme) -> Result<Registration> {
    let full_name = prompt_text(theme, "Full name")?;
    let email = prompt_text(theme, "Email")?;
    let phone = prompt_text(theme, "Phone")?;
    let (password, confirm) = prompt_password(theme)?;
    let date_of_birth = prompt_text(theme, "Date of birth (YYYY-MM-DD, optional)")?;
    let gender = prompt_gender(theme)?;
    let address = prompt_text(theme, "Address (optional)")?;

    if password != confirm {
        bail!("Passwords don't match");
    }
    if full_name.is_empty() || email.is_empty() || phone.is_empty() || password.is_empty() {
        bail!("Please fill in all required fields");
    }

    Ok(Registration::Patient(PatientRegistration {
        full_name,
        email,
        password,
        date_of_birth: parse_birth_date(&date_of_birth)?,
        gender,
        address: non_empty(address),
        phone: Some(phone),
    }))
}

fn doctor_registration(theme: &ColorfulTheme) -> Result<Registration> {
    let full_name = prompt_text(theme, "Full name")?;
    let email = prompt_text(theme, "Email")?;
    let phone = prompt_text(theme, "Phone")?;
    let specialization = prompt_text(theme, "Specialization")?;
    let hospital_name = prompt_text(theme, "Hospital (optional)")?;
    let (password, confirm) = prompt_password(theme)?;

    if password != confirm {
        bail!("Passwords don't match");
    }
    if full_name.is_empty()
        || email.is_empty()
        || phone.is_empty()
        || specialization.is_empty()
        || password.is_empty()
    {
        bail!("Please fill in all fields");
    }

    Ok(Registration::Doctor(DoctorRegistration {
        full_name,
        email,
        password,
        specialization,
        hospital_name,
        phone: Some(phone),
    }))
}

fn prompt_text(theme: &ColorfulTheme, prompt: &str) -> Result<String> {
    Ok(Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}

fn prompt_password(theme: &ColorfulTheme) -> Result<(String, String)> {
    let password = Password::with_theme(theme)
        .with_prompt("Password")
        .allow_empty_password(true)
        .interact()?;
    let confirm = Password::with_theme(theme)
        .with_prompt("Confirm password")
        .allow_empty_password(true)
        .interact()?;
    Ok((password, confirm))
}

fn prompt_gender(theme: &ColorfulTheme) -> Result<Option<String>> {
    let options = ["skip", "female", "male", "other"];
    let choice = Select::with_theme(theme)
        .with_prompt("Gender (optional)")
        .items(&options)
        .default(0)
        .interact()?;
    Ok(match choice {
        0 => None,
        picked => Some(options[picked].to_string()),
    })
}

fn parse_birth_date(raw: &str) -> Result<Option<NaiveDateTime>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date of birth '{}', expected YYYY-MM-DD", raw))?;
    Ok(Some(date.and_time(NaiveTime::MIN)))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn display_name(session: &Session) -> &str {
    session
        .profile
        .field("full_name")
        .unwrap_or(&session.profile.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_birth_date() {
        assert!(parse_birth_date("").unwrap().is_none());
        assert_eq!(
            parse_birth_date("1990-06-15").unwrap().unwrap().to_string(),
            "1990-06-15 00:00:00"
        );
        assert!(parse_birth_date("June 15").is_err());
    }
}
