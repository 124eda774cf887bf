use titan_strength::form::{FieldLens, FormModel};

#[derive(Clone, titan_strength::form::FormModel)]
struct TrialForm {
    #[form(key = "full-name")]
    full_name: String,
    goal: String,
}

fn main() {
    let fields = TrialForm::fields();
    let mut model = TrialForm {
        full_name: "Jane".to_string(),
        goal: String::new(),
    };
    fields.goal().set(&mut model, "strength".to_string());
    assert_eq!(fields.full_name().key().as_str(), "full-name");
    assert_eq!(fields.goal().get(&model), "strength");
    assert_eq!(TrialForm::field_keys().len(), 2);
}
