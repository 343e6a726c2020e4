//! Notification email sent to the site owner for each accepted submission

use crate::common::{escape_html, escape_html_multiline};
use crate::kernel::OutgoingEmail;

use super::validation::ValidatedContact;

pub fn subject_for(contact: &ValidatedContact) -> String {
    format!("New Contact Form Submission from {}", contact.name)
}

pub fn render_html(contact: &ValidatedContact) -> String {
    format!(
        r#"<h1>New Contact Form Submission</h1>
<p><strong>Name:</strong> {name}</p>
<p><strong>Email:</strong> {email}</p>
<p><strong>Message:</strong></p>
<p>{message}</p>
<hr>
<p style="color: #666; font-size: 12px;">This message was sent from your portfolio contact form.</p>
"#,
        name = escape_html(&contact.name),
        email = escape_html(&contact.email),
        message = escape_html_multiline(&contact.message),
    )
}

/// Build the owner notification, replying straight to the submitter
pub fn build_notification(contact: &ValidatedContact, owner_email: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: owner_email.to_string(),
        reply_to: contact.email.clone(),
        subject: subject_for(contact),
        html: render_html(contact),
    }
}
