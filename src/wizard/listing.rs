//! The six-step "Airbnb your home" flow used to create and edit listings.

use crate::domain::{Category, Listing, ListingDraft, Location};

use super::{FieldError, FieldKind, FieldMap, FieldSpec, FieldValue, StepWizard, WizardStep};

pub const CATEGORY: &str = "category";
pub const LOCATION: &str = "location";
pub const GUEST_COUNT: &str = "guest_count";
pub const ROOM_COUNT: &str = "room_count";
pub const BATHROOM_COUNT: &str = "bathroom_count";
pub const IMAGE_SRC: &str = "image_src";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const PRICE: &str = "price";

const CATEGORY_FIELDS: &[FieldSpec] =
    &[FieldSpec::new(CATEGORY, "Category", FieldKind::Category)];
const LOCATION_FIELDS: &[FieldSpec] = &[FieldSpec::new(LOCATION, "Country", FieldKind::Location)
    .with_help("Country name or two-letter code")];
const INFO_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(GUEST_COUNT, "Guests", FieldKind::Count)
        .with_help("How many guests do you allow?"),
    FieldSpec::new(ROOM_COUNT, "Rooms", FieldKind::Count)
        .with_help("How many rooms do you have?"),
    FieldSpec::new(BATHROOM_COUNT, "Bathrooms", FieldKind::Count)
        .with_help("How many bathrooms do you have?"),
];
const IMAGE_FIELDS: &[FieldSpec] = &[FieldSpec::new(IMAGE_SRC, "Image URL", FieldKind::Text)];
const DESCRIPTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(TITLE, "Title", FieldKind::Text),
    FieldSpec::new(DESCRIPTION, "Description", FieldKind::Text),
];
const PRICE_FIELDS: &[FieldSpec] = &[FieldSpec::new(PRICE, "Price", FieldKind::Price)
    .with_help("Whole amount per night")];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStep {
    Category,
    Location,
    Info,
    Images,
    Description,
    Price,
}

impl WizardStep for ListingStep {
    const SEQUENCE: &'static [Self] = &[
        ListingStep::Category,
        ListingStep::Location,
        ListingStep::Info,
        ListingStep::Images,
        ListingStep::Description,
        ListingStep::Price,
    ];

    fn label(self) -> &'static str {
        match self {
            ListingStep::Category => "Category",
            ListingStep::Location => "Location",
            ListingStep::Info => "Info",
            ListingStep::Images => "Images",
            ListingStep::Description => "Description",
            ListingStep::Price => "Price",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            ListingStep::Category => "Which of these best describes your place?",
            ListingStep::Location => "Where is your place located?",
            ListingStep::Info => "Share some basics about your place",
            ListingStep::Images => "Add a photo of your place",
            ListingStep::Description => "How would you describe your place?",
            ListingStep::Price => "Now, set your price",
        }
    }

    fn subtitle(self) -> Option<&'static str> {
        Some(match self {
            ListingStep::Category => "Pick a category",
            ListingStep::Location => "Help guests find you!",
            ListingStep::Info => "What amenities do you have?",
            ListingStep::Images => "Show guests what your place looks like!",
            ListingStep::Description => "Short and sweet works best!",
            ListingStep::Price => "How much do you charge per night?",
        })
    }

    fn fields(self) -> &'static [FieldSpec] {
        match self {
            ListingStep::Category => CATEGORY_FIELDS,
            ListingStep::Location => LOCATION_FIELDS,
            ListingStep::Info => INFO_FIELDS,
            ListingStep::Images => IMAGE_FIELDS,
            ListingStep::Description => DESCRIPTION_FIELDS,
            ListingStep::Price => PRICE_FIELDS,
        }
    }

    fn is_satisfied(self, fields: &FieldMap) -> bool {
        let positive = |key: &str| fields.count(key).map_or(false, |count| count > 0);
        match self {
            ListingStep::Category => fields
                .text(CATEGORY)
                .map_or(false, |label| Category::find(label).is_some()),
            ListingStep::Location => fields.location(LOCATION).is_some(),
            ListingStep::Info => {
                positive(GUEST_COUNT) && positive(ROOM_COUNT) && positive(BATHROOM_COUNT)
            }
            ListingStep::Images => fields.has_text(IMAGE_SRC),
            ListingStep::Description => fields.has_text(TITLE) && fields.has_text(DESCRIPTION),
            ListingStep::Price => fields.price(PRICE).map_or(false, |price| price > 0),
        }
    }

    fn defaults() -> FieldMap {
        FieldMap::new()
            .with(GUEST_COUNT, FieldValue::Count(1))
            .with(ROOM_COUNT, FieldValue::Count(1))
            .with(BATHROOM_COUNT, FieldValue::Count(1))
    }

    fn back_label(previous: Self) -> String {
        format!("Back to {}", previous.label())
    }
}

pub type ListingWizard = StepWizard<ListingStep>;

impl StepWizard<ListingStep> {
    /// Edit mode: every field pre-populated from `listing`.
    pub fn for_listing(listing: &Listing) -> Self {
        Self::with_fields(Some(listing.id), listing_fields(listing))
    }
}

/// The field map a wizard editing `listing` starts from.
pub fn listing_fields(listing: &Listing) -> FieldMap {
    let mut fields = FieldMap::new()
        .with(CATEGORY, FieldValue::Text(listing.category.clone()))
        .with(GUEST_COUNT, FieldValue::Count(listing.guest_count))
        .with(ROOM_COUNT, FieldValue::Count(listing.room_count))
        .with(BATHROOM_COUNT, FieldValue::Count(listing.bathroom_count))
        .with(IMAGE_SRC, FieldValue::Text(listing.image_src.clone()))
        .with(TITLE, FieldValue::Text(listing.title.clone()))
        .with(DESCRIPTION, FieldValue::Text(listing.description.clone()))
        .with(PRICE, FieldValue::Price(listing.price));
    if let Some(location) = listing.location() {
        fields.set(LOCATION, FieldValue::Location(location));
    }
    fields
}

impl TryFrom<&FieldMap> for ListingDraft {
    type Error = FieldError;

    fn try_from(fields: &FieldMap) -> Result<Self, Self::Error> {
        let category = fields.require_text(CATEGORY)?;
        let category = Category::find(&category)
            .ok_or_else(|| FieldError::invalid(CATEGORY, format!("unknown category `{}`", category)))?;
        let location: Location = fields.require_location(LOCATION)?;
        Ok(ListingDraft {
            category: category.label.to_string(),
            location_value: location.value,
            guest_count: fields.require_count(GUEST_COUNT)?,
            room_count: fields.require_count(ROOM_COUNT)?,
            bathroom_count: fields.require_count(BATHROOM_COUNT)?,
            image_src: fields.require_text(IMAGE_SRC)?,
            title: fields.require_text(TITLE)?,
            description: fields.require_text(DESCRIPTION)?,
            price: fields.require_price(PRICE)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::RecordingHost;
    use crate::wizard::{SubmitOutcome, Transition};
    use uuid::Uuid;

    fn complete(wizard: &mut ListingWizard) {
        wizard.set_field(CATEGORY, FieldValue::Text("Beach".into()));
        wizard.set_field(
            LOCATION,
            FieldValue::Location(Location::lookup("PT").unwrap()),
        );
        wizard.set_field(GUEST_COUNT, FieldValue::Count(4));
        wizard.set_field(ROOM_COUNT, FieldValue::Count(2));
        wizard.set_field(IMAGE_SRC, FieldValue::Text("https://img.example/a.jpg".into()));
        wizard.set_field(TITLE, FieldValue::Text("Cozy".into()));
        wizard.set_field(DESCRIPTION, FieldValue::Text("Near the sea".into()));
        wizard.set_field(PRICE, FieldValue::Price(120));
    }

    #[test]
    fn category_step_gates_on_a_known_category() {
        let mut host = RecordingHost::new();
        let mut wizard = ListingWizard::new();
        assert_eq!(wizard.advance(&mut host), Transition::Blocked);
        assert_eq!(wizard.current_step(), ListingStep::Category);

        wizard.set_field(CATEGORY, FieldValue::Text("Beach".into()));
        assert_eq!(wizard.advance(&mut host), Transition::Moved(1));
        assert_eq!(wizard.current_step(), ListingStep::Location);
        assert_eq!(wizard.secondary_label().as_deref(), Some("Back to Category"));
    }

    #[test]
    fn info_step_passes_with_default_counts() {
        let wizard = ListingWizard::new();
        assert!(ListingStep::Info.is_satisfied(wizard.fields()));
    }

    #[test]
    fn price_step_submits_the_complete_map() {
        let mut host = RecordingHost::new();
        let mut wizard = ListingWizard::new();
        complete(&mut wizard);
        for expected in 1..6 {
            assert_eq!(wizard.advance(&mut host), Transition::Moved(expected));
        }
        assert_eq!(wizard.action_label(), "Create");
        let outcome = wizard.advance(&mut host);
        assert!(matches!(outcome, Transition::Submitted(SubmitOutcome::Completed(_))));

        let (entity_id, fields) = &host.persisted[0];
        assert_eq!(*entity_id, None);
        let draft = ListingDraft::try_from(fields).unwrap();
        assert_eq!(draft.location_value, "PT");
        assert_eq!(draft.bathroom_count, 1);
        assert_eq!(draft.price, 120);
        assert_eq!(wizard.current_step(), ListingStep::Category);
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn edit_mode_round_trips_the_listing() {
        let draft = ListingDraft {
            category: "Lake".into(),
            location_value: "CH".into(),
            guest_count: 3,
            room_count: 2,
            bathroom_count: 1,
            image_src: "https://img.example/lake.jpg".into(),
            title: "Lakehouse".into(),
            description: "Quiet".into(),
            price: 90,
        };
        let listing = Listing::new(Uuid::new_v4(), draft.clone());
        let wizard = ListingWizard::for_listing(&listing);
        assert_eq!(wizard.entity_id(), Some(listing.id));
        assert!(ListingStep::SEQUENCE
            .iter()
            .all(|step| step.is_satisfied(wizard.fields())));
        assert_eq!(ListingDraft::try_from(wizard.fields()).unwrap(), draft);
    }

    #[test]
    fn edit_submit_persists_the_stored_fields_unchanged() {
        let listing = Listing::new(
            Uuid::new_v4(),
            ListingDraft {
                category: "Castle".into(),
                location_value: "FR".into(),
                guest_count: 6,
                room_count: 4,
                bathroom_count: 2,
                image_src: "https://img.example/keep.jpg".into(),
                title: "Keep".into(),
                description: "Moat included".into(),
                price: 300,
            },
        );
        let mut wizard = ListingWizard::for_listing(&listing);
        let mut host = RecordingHost::new();
        assert!(matches!(wizard.submit(&mut host), SubmitOutcome::Completed(_)));
        assert_eq!(
            host.persisted,
            vec![(Some(listing.id), listing_fields(&listing))]
        );
    }

    #[test]
    fn incomplete_map_fails_schema_check() {
        let fields = ListingStep::defaults().with(CATEGORY, FieldValue::Text("Beach".into()));
        let err = ListingDraft::try_from(&fields).unwrap_err();
        assert_eq!(err.key, LOCATION);
    }
}
