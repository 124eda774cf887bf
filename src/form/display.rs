use super::controller::{FieldKey, FormController, FormResult, SubmitState, read_lock};
use super::validation::{FieldLens, ValidationError};

/// Texts a form shows around its submit control.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormCopy {
    pub submit_label: &'static str,
    pub submitting_label: &'static str,
    pub success_message: &'static str,
    pub failure_message: Option<&'static str>,
}

impl Default for FormCopy {
    fn default() -> Self {
        Self {
            submit_label: "Submit",
            submitting_label: "Sending...",
            success_message: "Submitted successfully.",
            failure_message: Some("Please fix the errors and try again."),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldView<V> {
    pub key: FieldKey,
    pub value: V,
    pub error: Option<String>,
    pub required: bool,
    pub description: Option<String>,
}

impl<V> FieldView<V> {
    pub fn is_invalid(&self) -> bool {
        self.error.is_some()
    }

    /// Id of the element carrying the inline error, for `aria-describedby`.
    pub fn error_id(&self) -> Option<String> {
        self.error.as_ref().map(|_| format!("{}-error", self.key))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SubmitControl {
    pub label: &'static str,
    pub disabled: bool,
    pub busy: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StatusBanner {
    Success(&'static str),
    Failure(&'static str),
}

impl StatusBanner {
    pub fn message(self) -> &'static str {
        match self {
            StatusBanner::Success(message) | StatusBanner::Failure(message) => message,
        }
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn field_error_for_display<L>(&self, lens: L) -> FormResult<Option<String>>
    where
        L: FieldLens<T>,
    {
        self.display_error_message(lens.key())
    }

    pub fn field_view<L>(&self, lens: L) -> FormResult<FieldView<L::Value>>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        Ok(FieldView {
            key,
            value: self.value(lens)?,
            error: self.display_error_message(key)?,
            required: self.is_required(lens)?,
            description: self.field_description(lens)?,
        })
    }

    pub fn submit_control(&self, copy: &FormCopy) -> FormResult<SubmitControl> {
        let busy = self.is_submitting()?;
        Ok(SubmitControl {
            label: if busy {
                copy.submitting_label
            } else {
                copy.submit_label
            },
            disabled: busy || !self.is_valid()?,
            busy,
        })
    }

    pub fn status_banner(&self, copy: &FormCopy) -> FormResult<Option<StatusBanner>> {
        Ok(match self.submit_state()? {
            SubmitState::Succeeded => Some(StatusBanner::Success(copy.success_message)),
            SubmitState::Failed => copy.failure_message.map(StatusBanner::Failure),
            SubmitState::Idle | SubmitState::Submitting => None,
        })
    }

    fn display_error_message(&self, key: FieldKey) -> FormResult<Option<String>> {
        let state = read_lock(&self.state, "reading display error message")?;
        Ok(state
            .field_meta
            .get(&key)
            .and_then(|meta| meta.error.as_ref())
            .map(|error| error.message().to_string()))
    }
}
