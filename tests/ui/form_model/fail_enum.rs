use titan_strength::form::FormModel;

#[allow(dead_code)]
#[derive(FormModel)]
enum Mode {
    Quick,
    Full,
}

fn main() {}
