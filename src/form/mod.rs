mod controller;
mod display;
mod submit;
mod validation;


pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    SubmitState, SubscriptionId,
};
pub use display::{FieldView, FormCopy, StatusBanner, SubmitControl};
pub use submit::{
    BoxedSubmitFuture, SimulatedTransport, SubmissionTransport, SubmitOutcome, TransportError,
};
pub use titan_form_derive::FormModel;
pub use validation::{FieldLens, FieldValidator, FieldValue, FormModel, ValidationError};
