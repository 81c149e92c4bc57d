use std::fmt;

use nevado_shared::{CustomerContact, Masked};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Phone,
    Document,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Document => "document",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Missing required fields: {}", join_fields(.0))]
    Missing(Vec<FormField>),

    #[error("Invalid email address")]
    InvalidEmail,
}

fn join_fields(fields: &[FormField]) -> String {
    fields.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Traveler contact details as typed into the booking form
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub document: String,
}

impl fmt::Debug for BookingForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &Masked(&self.phone))
            .field("document", &Masked(&self.document))
            .finish()
    }
}

impl BookingForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        document: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            document: document.into(),
        }
    }

    /// Fields that are empty after trimming, in form order
    pub fn missing_fields(&self) -> Vec<FormField> {
        [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Phone, &self.phone),
            (FormField::Document, &self.document),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Trimmed contact ready for the booking API
    pub fn validate(&self) -> Result<CustomerContact, FormError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(FormError::Missing(missing));
        }

        let email = self.email.trim();
        if !looks_like_email(email) {
            return Err(FormError::InvalidEmail);
        }

        Ok(CustomerContact {
            name: self.name.trim().to_string(),
            email: email.to_string(),
            phone: Masked(self.phone.trim().to_string()),
            document: Masked(self.document.trim().to_string()),
        })
    }
}

/// `local@domain.tld`, nothing more
fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
