use std::time::Duration;

use futures::executor::block_on;
use titan_strength::ContactForm;
use titan_strength::contact::CONTACT_COPY;
use titan_strength::form::{FormModel, SimulatedTransport, StatusBanner, SubmitOutcome, SubmitState};

#[test]
fn visitor_fixes_errors_then_sends_message() {
    let controller = ContactForm::controller().expect("controller");
    let fields = ContactForm::fields();
    let transport = SimulatedTransport::new(Duration::from_millis(1));

    controller.set(fields.name(), "J".into()).expect("name");
    controller.touch(fields.name()).expect("blur name");
    assert_eq!(
        controller
            .field_view(fields.name())
            .expect("view")
            .error
            .as_deref(),
        Some("Enter at least 2 characters")
    );

    let outcome = block_on(controller.submit(&transport)).expect("submit");
    assert!(matches!(outcome, SubmitOutcome::Blocked(_)));
    assert_eq!(
        controller.status_banner(&CONTACT_COPY).expect("banner"),
        Some(StatusBanner::Failure("Please fix the errors and try again."))
    );

    controller.set(fields.name(), "Jane Doe".into()).expect("name");
    controller
        .set(fields.email(), "jane@example.com".into())
        .expect("email");
    controller
        .set(fields.phone(), "+98765 43210".into())
        .expect("phone");
    controller
        .set(fields.message(), "Loved the facility, will return!".into())
        .expect("message");
    assert!(controller.can_submit().expect("can submit"));

    let outcome = block_on(controller.submit(&transport)).expect("submit");
    assert_eq!(outcome, SubmitOutcome::Sent);
    assert_eq!(
        controller.submit_state().expect("state"),
        SubmitState::Succeeded
    );
    assert_eq!(controller.model().expect("model"), ContactForm::default());
    assert!(!controller.can_submit().expect("can submit"));
}
