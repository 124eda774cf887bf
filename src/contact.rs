use crate::form::{FieldLens, FormController, FormCopy, FormModel, FormOptions, FormResult};
use crate::rules::{self, FieldError, RuleResult};

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Message,
}

impl ContactField {
    pub const ALL: [ContactField; 4] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Phone,
        ContactField::Message,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub const fn key(self) -> &'static str {
        match self {
            ContactField::Name => "name",
            ContactField::Email => "email",
            ContactField::Phone => "phone",
            ContactField::Message => "message",
        }
    }

    pub fn validate(self, raw: &str) -> RuleResult {
        match self {
            ContactField::Name => {
                rules::required(raw, "Name is required")?;
                rules::min_chars(raw, 2, "Enter at least 2 characters")
            }
            ContactField::Email => {
                rules::required(raw, "Email is required")?;
                rules::email_shape(raw, "Enter a valid email")
            }
            ContactField::Phone => {
                rules::required(raw, "Phone is required")?;
                rules::phone_shape(raw, "Enter a valid phone number")
            }
            ContactField::Message => {
                rules::required(raw, "Message is required")?;
                rules::min_chars(raw, 10, "Message must be at least 10 characters")
            }
        }
    }
}

/// Validates a contact field by name. Unknown names are always valid.
pub fn validate_contact_field(field: &str, raw: &str) -> RuleResult {
    ContactField::from_key(field).map_or(Ok(()), |field| field.validate(raw))
}

pub const CONTACT_COPY: FormCopy = FormCopy {
    submit_label: "Send Message",
    submitting_label: "Sending...",
    success_message: "Message sent successfully.",
    failure_message: Some("Please fix the errors and try again."),
};

pub type ContactController = FormController<ContactForm, FieldError>;

impl ContactForm {
    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.name,
            ContactField::Email => &self.email,
            ContactField::Phone => &self.phone,
            ContactField::Message => &self.message,
        }
    }

    /// Every failing field with its message, in field order.
    pub fn errors(&self) -> Vec<(ContactField, FieldError)> {
        ContactField::ALL
            .into_iter()
            .filter_map(|field| field.validate(self.value(field)).err().map(|e| (field, e)))
            .collect()
    }

    /// Builds an empty contact form with every rule wired in.
    pub fn controller() -> FormResult<ContactController> {
        let controller = ContactController::new(ContactForm::default(), FormOptions::default());
        let fields = ContactForm::fields();
        wire(&controller, fields.name(), ContactField::Name)?;
        wire(&controller, fields.email(), ContactField::Email)?;
        wire(&controller, fields.phone(), ContactField::Phone)?;
        wire(&controller, fields.message(), ContactField::Message)?;
        Ok(controller)
    }
}

fn wire<L>(controller: &ContactController, lens: L, field: ContactField) -> FormResult<()>
where
    L: FieldLens<ContactForm, Value = String>,
{
    controller.register_required_field(lens)?;
    controller.register_field_validator(lens, move |_: &ContactForm, value: &String| {
        field.validate(value)
    })
}

impl std::fmt::Display for ContactField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
