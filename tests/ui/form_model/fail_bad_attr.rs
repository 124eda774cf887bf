use titan_strength::form::FormModel;

#[allow(dead_code)]
#[derive(FormModel)]
struct Profile {
    #[form(rename = "display-name")]
    name: String,
}

fn main() {}
