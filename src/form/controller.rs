use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::validation::{FieldLens, FieldValue, ValidationError};

static FORM_ID_ALLOCATOR: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FormId(pub u64);

impl FormId {
    pub fn next() -> Self {
        Self(FORM_ID_ALLOCATOR.fetch_add(1, Ordering::SeqCst))
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Where a form sits in its submit cycle.
///
/// `Idle -> Submitting -> {Succeeded, Failed} -> Idle`. A submit attempt that
/// is blocked by validation goes straight to `Failed`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormOptions {
    /// Re-run a field's validators when it loses focus.
    pub validate_on_touch: bool,
    /// Restore the initial model after the transport reports success.
    pub reset_on_success: bool,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            validate_on_touch: true,
            reset_on_success: true,
        }
    }
}

/// Per-field state. A field only gets an entry once it has been validated,
/// touched or edited; a missing entry means no error has been computed yet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldMeta<E> {
    pub dirty: bool,
    pub touched: bool,
    pub validated: bool,
    pub error: Option<E>,
}

impl<E> Default for FieldMeta<E> {
    fn default() -> Self {
        Self {
            dirty: false,
            touched: false,
            validated: false,
            error: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T, E> {
    pub model: T,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub is_dirty: bool,
    pub is_valid: bool,
    pub field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
}

impl<T, E> FormSnapshot<T, E> {
    pub fn error(&self, key: FieldKey) -> Option<&E> {
        self.field_meta.get(&key).and_then(|meta| meta.error.as_ref())
    }

    pub fn error_count(&self) -> usize {
        self.field_meta
            .values()
            .filter(|meta| meta.error.is_some())
            .count()
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormError {
    StatePoisoned(&'static str),
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    AlreadySubmitting,
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::StatePoisoned(context) => {
                write!(f, "form state lock poisoned while {context}")
            }
            FormError::InvalidStateTransition { from, to } => {
                write!(f, "invalid submit state transition: {from:?} -> {to:?}")
            }
            FormError::AlreadySubmitting => f.write_str("form submit is already in progress"),
        }
    }
}

impl std::error::Error for FormError {}

pub type FormResult<T> = Result<T, FormError>;

pub(super) type SyncFieldValidatorFn<T, E> = Arc<dyn Fn(&T) -> Result<(), E> + Send + Sync>;
pub(super) type BlankCheckFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
pub(super) type ListenerFn<T, E> = Arc<dyn Fn(&FormSnapshot<T, E>) + Send + Sync>;

pub(super) struct FormState<T, E> {
    pub(super) id: FormId,
    pub(super) initial_model: T,
    pub(super) model: T,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) dirty_fields: BTreeSet<FieldKey>,
    pub(super) field_meta: BTreeMap<FieldKey, FieldMeta<E>>,
    pub(super) revision: u64,
    pub(super) validity_cache: Option<(u64, bool)>,
}

impl<T, E> FormState<T, E> {
    pub(super) fn ensure_meta(&mut self, key: FieldKey) -> &mut FieldMeta<E> {
        self.field_meta.entry(key).or_default()
    }

    pub(super) fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Observable state holder for one form instance.
///
/// Clones share the same state, so a host can move a clone into every input
/// callback. Listeners registered with [`FormController::subscribe`] are
/// called synchronously after every mutation.
#[derive(Clone)]
pub struct FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub(super) options: FormOptions,
    pub(super) state: Arc<RwLock<FormState<T, E>>>,
    pub(super) sync_field_validators:
        Arc<RwLock<BTreeMap<FieldKey, Vec<SyncFieldValidatorFn<T, E>>>>>,
    pub(super) required_fields: Arc<RwLock<BTreeMap<FieldKey, BlankCheckFn<T>>>>,
    pub(super) field_descriptions: Arc<RwLock<BTreeMap<FieldKey, String>>>,
    pub(super) listeners: Arc<RwLock<BTreeMap<u64, ListenerFn<T, E>>>>,
    pub(super) next_listener: Arc<AtomicU64>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(u64);

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    pub fn new(initial: T, options: FormOptions) -> Self {
        Self {
            options,
            state: Arc::new(RwLock::new(FormState {
                id: FormId::next(),
                initial_model: initial.clone(),
                model: initial,
                submit_state: SubmitState::Idle,
                submit_count: 0,
                dirty_fields: BTreeSet::new(),
                field_meta: BTreeMap::new(),
                revision: 0,
                validity_cache: None,
            })),
            sync_field_validators: Arc::new(RwLock::new(BTreeMap::new())),
            required_fields: Arc::new(RwLock::new(BTreeMap::new())),
            field_descriptions: Arc::new(RwLock::new(BTreeMap::new())),
            listeners: Arc::new(RwLock::new(BTreeMap::new())),
            next_listener: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn form_id(&self) -> FormResult<FormId> {
        Ok(read_lock(&self.state, "reading form id")?.id)
    }

    pub fn options(&self) -> FormOptions {
        self.options
    }

    /// Marks a field as required: the form is never valid while its value is
    /// blank.
    pub fn register_required_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
        L::Value: FieldValue,
    {
        let check: BlankCheckFn<T> = Arc::new(move |model: &T| lens.get(model).is_blank());
        let mut required = write_lock(&self.required_fields, "registering required field")?;
        required.insert(lens.key(), check);
        drop(required);
        self.invalidate_validity()
    }

    pub fn unregister_required_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let mut required = write_lock(&self.required_fields, "unregistering required field")?;
        required.remove(&lens.key());
        drop(required);
        self.invalidate_validity()
    }

    pub fn register_field_description<L>(
        &self,
        lens: L,
        description: impl Into<String>,
    ) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let mut descriptions =
            write_lock(&self.field_descriptions, "registering field description")?;
        descriptions.insert(lens.key(), description.into());
        Ok(())
    }

    pub fn clear_field_description<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let mut descriptions = write_lock(&self.field_descriptions, "clearing field description")?;
        descriptions.remove(&lens.key());
        Ok(())
    }

    pub fn subscribe(
        &self,
        listener: impl Fn(&FormSnapshot<T, E>) + Send + Sync + 'static,
    ) -> FormResult<SubscriptionId> {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        let mut listeners = write_lock(&self.listeners, "registering listener")?;
        listeners.insert(id, Arc::new(listener));
        Ok(SubscriptionId(id))
    }

    pub fn unsubscribe(&self, subscription: SubscriptionId) -> FormResult<bool> {
        let mut listeners = write_lock(&self.listeners, "removing listener")?;
        Ok(listeners.remove(&subscription.0).is_some())
    }

    /// Restores the initial model, clears every error and returns to `Idle`.
    pub fn reset(&self) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "resetting form")?;
            reset_state(&mut state);
        }
        tracing::debug!("form reset to initial values");
        self.notify()
    }

    pub fn reset_field<L>(&self, lens: L) -> FormResult<()>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        {
            let mut state = write_lock(&self.state, "resetting field")?;
            let initial_value = lens.get(&state.initial_model).clone();
            lens.set(&mut state.model, initial_value);
            state.dirty_fields.remove(&key);
            state.field_meta.remove(&key);
            state.bump();
        }
        self.notify()
    }

    /// Forgets every computed error, returning all fields to "not yet
    /// validated". Values and the form's dirty set are kept.
    pub fn clear_errors(&self) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "clearing all field errors")?;
            state.field_meta.clear();
            state.bump();
        }
        self.notify()
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T, E>> {
        let is_valid = self.is_valid()?;
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            is_dirty: !state.dirty_fields.is_empty(),
            is_valid,
            field_meta: state.field_meta.clone(),
        })
    }

    pub fn model(&self) -> FormResult<T> {
        Ok(read_lock(&self.state, "reading form model")?.model.clone())
    }

    pub fn value<L>(&self, lens: L) -> FormResult<L::Value>
    where
        L: FieldLens<T>,
    {
        Ok(lens
            .get(&read_lock(&self.state, "reading field value")?.model)
            .clone())
    }

    pub fn submit_state(&self) -> FormResult<SubmitState> {
        Ok(read_lock(&self.state, "reading submit state")?.submit_state)
    }

    pub fn field_meta<L>(&self, lens: L) -> FormResult<Option<FieldMeta<E>>>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.state, "reading field meta")?
            .field_meta
            .get(&lens.key())
            .cloned())
    }

    pub fn field_error<L>(&self, lens: L) -> FormResult<Option<E>>
    where
        L: FieldLens<T>,
    {
        Ok(self.field_meta(lens)?.and_then(|meta| meta.error))
    }

    pub fn field_description<L>(&self, lens: L) -> FormResult<Option<String>>
    where
        L: FieldLens<T>,
    {
        Ok(
            read_lock(&self.field_descriptions, "reading field description")?
                .get(&lens.key())
                .cloned(),
        )
    }

    pub fn is_required<L>(&self, lens: L) -> FormResult<bool>
    where
        L: FieldLens<T>,
    {
        Ok(read_lock(&self.required_fields, "reading required fields")?.contains_key(&lens.key()))
    }

    /// Overall validity: no required field is blank, no stored error is set
    /// and every registered validator passes on the current model.
    ///
    /// The result is cached against the state revision, so repeated calls
    /// between mutations do not re-run validators.
    pub fn is_valid(&self) -> FormResult<bool> {
        let (revision, model, any_stored_error) = {
            let state = read_lock(&self.state, "reading cached validity")?;
            if let Some((cached_at, valid)) = state.validity_cache
                && cached_at == state.revision
            {
                return Ok(valid);
            }
            let any_stored_error = state.field_meta.values().any(|meta| meta.error.is_some());
            (state.revision, state.model.clone(), any_stored_error)
        };

        let valid = !any_stored_error
            && !self.any_required_blank(&model)?
            && self.validate_model(&model)?.is_empty();

        let mut state = write_lock(&self.state, "storing cached validity")?;
        if state.revision == revision {
            state.validity_cache = Some((revision, valid));
        }
        Ok(valid)
    }

    pub(super) fn any_required_blank(&self, model: &T) -> FormResult<bool> {
        Ok(read_lock(&self.required_fields, "checking required fields")?
            .values()
            .any(|is_blank| is_blank(model)))
    }

    pub(super) fn invalidate_validity(&self) -> FormResult<()> {
        let mut state = write_lock(&self.state, "invalidating cached validity")?;
        state.bump();
        Ok(())
    }

    pub(super) fn notify(&self) -> FormResult<()> {
        let listeners = read_lock(&self.listeners, "reading listeners")?
            .values()
            .cloned()
            .collect::<Vec<_>>();
        if listeners.is_empty() {
            return Ok(());
        }
        let snapshot = self.snapshot()?;
        for listener in listeners {
            listener(&snapshot);
        }
        Ok(())
    }
}

pub(super) fn reset_state<T: Clone, E>(state: &mut FormState<T, E>) {
    state.model = state.initial_model.clone();
    state.submit_state = SubmitState::Idle;
    state.dirty_fields.clear();
    state.field_meta.clear();
    state.bump();
}

pub(super) fn transition_submit_state<T, E>(
    state: &mut FormState<T, E>,
    next: SubmitState,
) -> FormResult<()> {
    let current = state.submit_state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Submitting)
            | (SubmitState::Idle, SubmitState::Failed)
            | (SubmitState::Submitting, SubmitState::Succeeded)
            | (SubmitState::Submitting, SubmitState::Failed)
            | (SubmitState::Succeeded, SubmitState::Submitting)
            | (SubmitState::Succeeded, SubmitState::Failed)
            | (SubmitState::Failed, SubmitState::Submitting)
            | (SubmitState::Succeeded, SubmitState::Idle)
            | (SubmitState::Failed, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    tracing::debug!(from = ?current, to = ?next, "submit state transition");
    state.submit_state = next;
    state.bump();
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
