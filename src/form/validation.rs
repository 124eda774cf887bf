use std::collections::BTreeMap;
use std::sync::Arc;

use super::controller::{
    FieldKey, FormController, FormResult, SubmitState, SyncFieldValidatorFn, read_lock,
    transition_submit_state, write_lock,
};

pub trait ValidationError: Clone + Send + Sync + 'static {
    fn message(&self) -> &str;
}

pub trait FieldLens<T>: Copy + Send + Sync + 'static {
    type Value: Clone + PartialEq + Send + Sync + 'static;

    fn key(self) -> FieldKey;
    fn get<'a>(self, model: &'a T) -> &'a Self::Value;
    fn set(self, model: &mut T, value: Self::Value);
}

pub trait FormModel: Clone + Send + Sync + 'static {
    type Fields;

    fn fields() -> Self::Fields;

    /// Every field key of the model, in declaration order.
    fn field_keys() -> &'static [FieldKey];
}

/// Values that can be checked for "nothing entered".
pub trait FieldValue {
    fn is_blank(&self) -> bool;
}

impl FieldValue for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl FieldValue for &'static str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl<V: FieldValue> FieldValue for Option<V> {
    fn is_blank(&self) -> bool {
        self.as_ref().is_none_or(FieldValue::is_blank)
    }
}

pub trait FieldValidator<T, L, E>: Send + Sync
where
    L: FieldLens<T>,
    E: ValidationError,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E>;
}

impl<T, L, E, F> FieldValidator<T, L, E> for F
where
    L: FieldLens<T>,
    E: ValidationError,
    F: for<'a> Fn(&'a T, &'a L::Value) -> Result<(), E> + Send + Sync,
{
    fn validate(&self, model: &T, value: &L::Value) -> Result<(), E> {
        (self)(model, value)
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    /// Validators of one field run in registration order; the first failure
    /// becomes the field's error.
    pub fn register_field_validator<L, V>(&self, lens: L, validator: V) -> FormResult<()>
    where
        L: FieldLens<T>,
        V: FieldValidator<T, L, E> + 'static,
    {
        let key = lens.key();
        let validator = Arc::new(validator);
        let wrapped: SyncFieldValidatorFn<T, E> =
            Arc::new(move |model: &T| validator.validate(model, lens.get(model)));
        let mut validators =
            write_lock(&self.sync_field_validators, "registering field validator")?;
        validators.entry(key).or_default().push(wrapped);
        drop(validators);
        self.invalidate_validity()
    }

    pub fn set<L>(&self, lens: L, value: L::Value) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "writing form model")?;
            lens.set(&mut state.model, value);
            let is_dirty = lens.get(&state.model) != lens.get(&state.initial_model);
            if is_dirty {
                state.dirty_fields.insert(key);
            } else {
                state.dirty_fields.remove(&key);
            }
            state.ensure_meta(key).dirty = is_dirty;
            if matches!(
                state.submit_state,
                SubmitState::Succeeded | SubmitState::Failed
            ) {
                transition_submit_state(&mut state, SubmitState::Idle)?;
            }
            state.bump();
        }

        self.validate_field_by_key(key)?;
        self.notify()
    }

    /// Blur handler: marks the field touched and re-derives its error from
    /// the value currently held, even if the value was written without
    /// going through [`FormController::set`].
    pub fn touch<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "touching field")?;
            state.ensure_meta(key).touched = true;
            state.bump();
        }

        if self.options.validate_on_touch {
            self.validate_field_by_key(key)?;
        }
        self.notify()
    }

    pub fn validate_field<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        let valid = self.validate_field_by_key(lens.key())?;
        self.notify()?;
        Ok(valid)
    }

    /// Validates every field with registered validators and stores the full
    /// error set. Returns overall validity.
    pub fn validate_form(&self) -> FormResult<bool> {
        self.apply_form_validation()?;
        self.notify()?;
        self.is_valid()
    }

    pub(super) fn apply_form_validation(&self) -> FormResult<BTreeMap<FieldKey, E>> {
        let model = {
            read_lock(&self.state, "reading model for form validation")?
                .model
                .clone()
        };
        let field_validators = read_lock(
            &self.sync_field_validators,
            "reading field validators for form validation",
        )?
        .clone();

        let mut errors = BTreeMap::new();
        let mut state = write_lock(&self.state, "applying form validation result")?;
        for (key, validators) in field_validators {
            let error = first_failure(&validators, &model);
            let meta = state.ensure_meta(key);
            meta.validated = true;
            meta.error = error.clone();
            if let Some(error) = error {
                errors.insert(key, error);
            }
        }
        state.bump();
        tracing::debug!(errors = errors.len(), "form validated");
        Ok(errors)
    }

    /// Runs every registered validator against `model` without touching
    /// stored state.
    pub(super) fn validate_model(&self, model: &T) -> FormResult<Vec<(FieldKey, E)>> {
        let validators = read_lock(
            &self.sync_field_validators,
            "reading field validators for model validation",
        )?;
        Ok(validators
            .iter()
            .filter_map(|(key, validators)| first_failure(validators, model).map(|e| (*key, e)))
            .collect())
    }

    pub(super) fn validate_field_by_key(&self, key: FieldKey) -> FormResult<bool> {
        let model = {
            read_lock(&self.state, "reading model for field validation")?
                .model
                .clone()
        };
        let validators = {
            read_lock(
                &self.sync_field_validators,
                "reading field validators for key validation",
            )?
            .get(&key)
            .cloned()
            .unwrap_or_default()
        };

        let error = first_failure(&validators, &model);
        let valid = error.is_none();
        if let Some(error) = &error {
            tracing::debug!(field = %key, message = error.message(), "field invalid");
        }

        let mut state = write_lock(&self.state, "writing field validation result")?;
        let meta = state.ensure_meta(key);
        meta.validated = true;
        meta.error = error;
        state.bump();
        Ok(valid)
    }
}

fn first_failure<T, E>(validators: &[SyncFieldValidatorFn<T, E>], model: &T) -> Option<E> {
    validators
        .iter()
        .find_map(|validator| validator(model).err())
}
