use crate::config::{RatingOption, SiteConfig};
use crate::form::{FieldLens, FormController, FormCopy, FormModel, FormOptions, FormResult};
use crate::rules::{self, FieldError, RuleResult};

/// The five fixed choices of the rating selector, bound to `"1"`..`"5"`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rating {
    Poor = 1,
    Fair = 2,
    Good = 3,
    VeryGood = 4,
    Excellent = 5,
}

impl Rating {
    /// Selector order, best first.
    pub const OPTIONS: [Rating; 5] = [
        Rating::Excellent,
        Rating::VeryGood,
        Rating::Good,
        Rating::Fair,
        Rating::Poor,
    ];

    pub const PLACEHOLDER: &'static str = "Select Rating";

    pub const fn value(self) -> &'static str {
        match self {
            Rating::Poor => "1",
            Rating::Fair => "2",
            Rating::Good => "3",
            Rating::VeryGood => "4",
            Rating::Excellent => "5",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Rating::Poor => "Poor",
            Rating::Fair => "Fair",
            Rating::Good => "Good",
            Rating::VeryGood => "Very Good",
            Rating::Excellent => "Excellent",
        }
    }

    pub const fn stars(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::OPTIONS
            .into_iter()
            .find(|rating| rating.value() == value)
    }

    /// Entries of the selector as configured for the site, best first.
    pub fn configured_options() -> &'static [RatingOption] {
        &SiteConfig::global().ratings
    }

    /// Button text for the current selector value.
    pub fn display_label(value: &str) -> &'static str {
        Self::from_value(value).map_or(Self::PLACEHOLDER, Rating::label)
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct FeedbackForm {
    pub name: String,
    pub rating: String,
    pub comments: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FeedbackField {
    Name,
    Rating,
    Comments,
}

impl FeedbackField {
    pub const ALL: [FeedbackField; 3] = [
        FeedbackField::Name,
        FeedbackField::Rating,
        FeedbackField::Comments,
    ];

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    pub const fn key(self) -> &'static str {
        match self {
            FeedbackField::Name => "name",
            FeedbackField::Rating => "rating",
            FeedbackField::Comments => "comments",
        }
    }

    pub fn validate(self, raw: &str) -> RuleResult {
        match self {
            FeedbackField::Name => rules::required(raw, "Name is required."),
            FeedbackField::Rating => match Rating::from_value(raw.trim()) {
                Some(_) => Ok(()),
                None => Err(FieldError::new("Please select a rating.")),
            },
            FeedbackField::Comments => {
                rules::required(raw, "Comment cannot be empty.")?;
                rules::min_chars(raw, 10, "Please enter at least 10 characters.")
            }
        }
    }
}

pub fn validate_feedback_field(field: &str, raw: &str) -> RuleResult {
    FeedbackField::from_key(field).map_or(Ok(()), |field| field.validate(raw))
}

pub const FEEDBACK_COPY: FormCopy = FormCopy {
    submit_label: "Submit Feedback",
    submitting_label: "Sending...",
    success_message: "Thank you for your feedback!",
    failure_message: None,
};

pub type FeedbackController = FormController<FeedbackForm, FieldError>;

impl FeedbackForm {
    pub fn value(&self, field: FeedbackField) -> &str {
        match field {
            FeedbackField::Name => &self.name,
            FeedbackField::Rating => &self.rating,
            FeedbackField::Comments => &self.comments,
        }
    }

    pub fn selected_rating(&self) -> Option<Rating> {
        Rating::from_value(&self.rating)
    }

    pub fn errors(&self) -> Vec<(FeedbackField, FieldError)> {
        FeedbackField::ALL
            .into_iter()
            .filter_map(|field| field.validate(self.value(field)).err().map(|e| (field, e)))
            .collect()
    }

    pub fn controller() -> FormResult<FeedbackController> {
        let controller = FeedbackController::new(FeedbackForm::default(), FormOptions::default());
        let fields = FeedbackForm::fields();
        wire(&controller, fields.name(), FeedbackField::Name)?;
        wire(&controller, fields.rating(), FeedbackField::Rating)?;
        wire(&controller, fields.comments(), FeedbackField::Comments)?;
        Ok(controller)
    }
}

fn wire<L>(controller: &FeedbackController, lens: L, field: FeedbackField) -> FormResult<()>
where
    L: FieldLens<FeedbackForm, Value = String>,
{
    controller.register_required_field(lens)?;
    controller.register_field_validator(lens, move |_: &FeedbackForm, value: &String| {
        field.validate(value)
    })
}

impl FeedbackController {
    /// Selector callback: stores the numeric value of `rating`.
    pub fn select_rating(&self, rating: Rating) -> FormResult<()> {
        self.set(FeedbackForm::fields().rating(), rating.value().to_string())
    }

    pub fn rating_label(&self) -> FormResult<&'static str> {
        Ok(Rating::display_label(
            &self.value(FeedbackForm::fields().rating())?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::ValidationError;

    #[test]
    fn rating_options_cover_one_to_five() {
        let values = Rating::OPTIONS
            .iter()
            .map(|rating| rating.value())
            .collect::<Vec<_>>();
        assert_eq!(values, ["5", "4", "3", "2", "1"]);
        assert_eq!(Rating::from_value("4"), Some(Rating::VeryGood));
        assert_eq!(Rating::from_value("6"), None);
        assert_eq!(Rating::Good.stars(), 3);
    }

    #[test]
    fn configured_options_follow_the_fixed_ratings() {
        let configured = Rating::configured_options()
            .iter()
            .map(|option| (option.value.as_str(), option.label.as_str()))
            .collect::<Vec<_>>();
        let fixed = Rating::OPTIONS
            .iter()
            .map(|rating| (rating.value(), rating.label()))
            .collect::<Vec<_>>();
        assert_eq!(configured, fixed);
    }

    #[test]
    fn display_label_falls_back_to_placeholder() {
        assert_eq!(Rating::display_label(""), "Select Rating");
        assert_eq!(Rating::display_label("1"), "Poor");
        assert_eq!(Rating::display_label("5"), "Excellent");
    }

    #[test]
    fn unselected_rating_is_rejected() {
        assert_eq!(
            FeedbackField::Rating.validate(""),
            Err(FieldError::new("Please select a rating."))
        );
        assert_eq!(
            FeedbackField::Rating.validate("0"),
            Err(FieldError::new("Please select a rating."))
        );
        assert!(FeedbackField::Rating.validate("3").is_ok());
    }

    #[test]
    fn name_only_needs_content() {
        assert!(FeedbackField::Name.validate("J").is_ok());
        assert_eq!(
            FeedbackField::Name.validate("   ").unwrap_err().message(),
            "Name is required."
        );
    }

    #[test]
    fn comments_boundary() {
        assert!(FeedbackField::Comments.validate("0123456789").is_ok());
        assert_eq!(
            FeedbackField::Comments.validate("012345678").unwrap_err().message(),
            "Please enter at least 10 characters."
        );
        assert_eq!(
            FeedbackField::Comments.validate(" ").unwrap_err().message(),
            "Comment cannot be empty."
        );
        assert!(validate_feedback_field("comments", "x").is_err());
        assert!(validate_feedback_field("unknown", "").is_ok());
    }

    #[test]
    fn selecting_a_rating_updates_the_label() {
        let controller = FeedbackForm::controller().expect("controller");
        assert_eq!(controller.rating_label().expect("label"), "Select Rating");
        controller.select_rating(Rating::Fair).expect("select");
        assert_eq!(controller.rating_label().expect("label"), "Fair");
        assert!(
            controller
                .field_error(FeedbackForm::fields().rating())
                .expect("error")
                .is_none()
        );
    }
}
