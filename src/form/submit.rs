use std::collections::BTreeMap;
use std::fmt::{Debug, Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_timer::Delay;

use super::controller::{
    FieldKey, FormController, FormError, FormResult, SubmitState, read_lock, reset_state,
    transition_submit_state, write_lock,
};
use super::validation::ValidationError;

/// Failure reported by a [`SubmissionTransport`]. Every failure is treated
/// as recoverable: the form keeps its values and can be submitted again.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransportError(String);

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "submission failed: {}", self.0)
    }
}

impl std::error::Error for TransportError {}

pub type BoxedSubmitFuture = Pin<Box<dyn Future<Output = Result<(), TransportError>> + Send>>;

/// Delivers a validated model somewhere. Invoked at most once per submit
/// attempt and always awaited to completion.
pub trait SubmissionTransport<T>: Send + Sync {
    type Fut: Future<Output = Result<(), TransportError>> + Send;

    fn send(&self, model: T) -> Self::Fut;
}

impl<T, F, Fut> SubmissionTransport<T> for F
where
    F: Fn(T) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), TransportError>> + Send,
{
    type Fut = Fut;

    fn send(&self, model: T) -> Self::Fut {
        (self)(model)
    }
}

/// Stand-in transport that waits for a fixed delay, logs the payload and
/// reports success.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SimulatedTransport {
    delay: Duration,
}

impl SimulatedTransport {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config() -> Self {
        Self::new(crate::config::SiteConfig::global().submit_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::from_config()
    }
}

impl<T> SubmissionTransport<T> for SimulatedTransport
where
    T: Debug + Send + 'static,
{
    type Fut = BoxedSubmitFuture;

    fn send(&self, model: T) -> Self::Fut {
        let delay = self.delay;
        Box::pin(async move {
            if !delay.is_zero() {
                Delay::new(delay).await;
            }
            tracing::info!(payload = ?model, "form submitted");
            Ok(())
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome<E> {
    /// The transport accepted the model.
    Sent,
    /// Validation failed; the transport was not called.
    Blocked(BTreeMap<FieldKey, E>),
    /// The transport reported a failure; values are preserved.
    TransportFailed(TransportError),
}

impl<E> SubmitOutcome<E> {
    pub fn is_sent(&self) -> bool {
        matches!(self, SubmitOutcome::Sent)
    }
}

impl<T, E> FormController<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: ValidationError,
{
    /// Validates the whole form and, if it passes, hands the model to
    /// `transport`.
    ///
    /// Returns [`FormError::AlreadySubmitting`] without calling the transport
    /// while a previous submit is still awaiting its transport.
    pub async fn submit<S>(&self, transport: &S) -> FormResult<SubmitOutcome<E>>
    where
        S: SubmissionTransport<T>,
    {
        {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if state.submit_state == SubmitState::Submitting {
                tracing::warn!("submit ignored, previous submit still in flight");
                return Err(FormError::AlreadySubmitting);
            }
            state.submit_count = state.submit_count.saturating_add(1);
        }

        let errors = self.apply_form_validation()?;
        let model = read_lock(&self.state, "reading model for submit")?
            .model
            .clone();
        if !errors.is_empty() || self.any_required_blank(&model)? {
            {
                let mut state = write_lock(&self.state, "handling submit validation failure")?;
                transition_submit_state(&mut state, SubmitState::Failed)?;
            }
            tracing::warn!(errors = errors.len(), "submit blocked by validation");
            self.notify()?;
            return Ok(SubmitOutcome::Blocked(errors));
        }

        let model = {
            let mut state = write_lock(&self.state, "moving submit state to submitting")?;
            if state.submit_state == SubmitState::Submitting {
                return Err(FormError::AlreadySubmitting);
            }
            transition_submit_state(&mut state, SubmitState::Submitting)?;
            state.model.clone()
        };
        tracing::info!("submitting form");
        self.notify()?;

        let result = transport.send(model).await;

        let outcome = {
            let mut state = write_lock(&self.state, "completing submit")?;
            match result {
                Ok(()) => {
                    transition_submit_state(&mut state, SubmitState::Succeeded)?;
                    if self.options.reset_on_success {
                        reset_state(&mut state);
                        state.submit_state = SubmitState::Succeeded;
                    }
                    tracing::info!("form submit succeeded");
                    SubmitOutcome::Sent
                }
                Err(error) => {
                    transition_submit_state(&mut state, SubmitState::Failed)?;
                    tracing::warn!(%error, "form submit failed");
                    SubmitOutcome::TransportFailed(error)
                }
            }
        };
        self.notify()?;
        Ok(outcome)
    }

    pub fn is_submitting(&self) -> FormResult<bool> {
        Ok(self.submit_state()? == SubmitState::Submitting)
    }

    /// Whether the submit control should accept a click.
    pub fn can_submit(&self) -> FormResult<bool> {
        Ok(!self.is_submitting()? && self.is_valid()?)
    }
}
