//! Contact form and newsletter commands.
//!
//! Neither sends anything: input is validated and the submission logged.

use stagefront_site::error::SiteError;
use stagefront_site::services::{ContactForm, subscribe_newsletter};

use super::CommandError;

/// Validate and submit the contact form.
///
/// # Errors
///
/// Returns the field validation errors.
#[allow(clippy::print_stdout)]
pub fn submit(
    name: String,
    email: String,
    subject: String,
    message: String,
) -> Result<(), CommandError> {
    let mut form = ContactForm {
        name,
        email,
        subject,
        message,
    };
    let receipt = form.submit().map_err(SiteError::from)?;
    println!("Thanks! We'll reply to {}.", receipt.reply_to);
    Ok(())
}

/// Sign up for the newsletter.
///
/// # Errors
///
/// Returns an error if the email is missing or malformed.
#[allow(clippy::print_stdout)]
pub fn subscribe(email: &str) -> Result<(), CommandError> {
    let receipt = subscribe_newsletter(email).map_err(SiteError::from)?;
    println!("Subscribed {}", receipt.email);
    Ok(())
}
