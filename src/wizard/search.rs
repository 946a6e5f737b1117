//! Three-step search flow: where, when and how many.

use crate::domain::{DateRange, ListingQuery, Location};

use super::{FieldError, FieldKind, FieldMap, FieldSpec, FieldValue, StepWizard, WizardStep};

pub const LOCATION: &str = "location";
pub const DATES: &str = "dates";
pub const GUEST_COUNT: &str = "guest_count";
pub const ROOM_COUNT: &str = "room_count";
pub const BATHROOM_COUNT: &str = "bathroom_count";

const LOCATION_FIELDS: &[FieldSpec] = &[FieldSpec::new(LOCATION, "Country", FieldKind::Location)
    .with_help("Country name or two-letter code")];
const DATE_FIELDS: &[FieldSpec] = &[FieldSpec::new(DATES, "Dates", FieldKind::Dates)
    .with_help("Check-in and check-out, e.g. 2025-07-01..2025-07-05")];
const INFO_FIELDS: &[FieldSpec] = &[
    FieldSpec::new(GUEST_COUNT, "Guests", FieldKind::Count)
        .with_help("How many guests are coming?"),
    FieldSpec::new(ROOM_COUNT, "Rooms", FieldKind::Count)
        .with_help("How many rooms do you need?"),
    FieldSpec::new(BATHROOM_COUNT, "Bathrooms", FieldKind::Count)
        .with_help("How many bathrooms do you need?"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    Location,
    Date,
    Info,
}

impl WizardStep for SearchStep {
    const SEQUENCE: &'static [Self] = &[SearchStep::Location, SearchStep::Date, SearchStep::Info];

    fn label(self) -> &'static str {
        match self {
            SearchStep::Location => "Location",
            SearchStep::Date => "Date",
            SearchStep::Info => "Info",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            SearchStep::Location => "Where do you wanna go?",
            SearchStep::Date => "When do you plan to go?",
            SearchStep::Info => "More information",
        }
    }

    fn subtitle(self) -> Option<&'static str> {
        Some(match self {
            SearchStep::Location => "Find the perfect location!",
            SearchStep::Date => "Make sure everyone is free!",
            SearchStep::Info => "Find your perfect place!",
        })
    }

    fn fields(self) -> &'static [FieldSpec] {
        match self {
            SearchStep::Location => LOCATION_FIELDS,
            SearchStep::Date => DATE_FIELDS,
            SearchStep::Info => INFO_FIELDS,
        }
    }

    fn is_satisfied(self, fields: &FieldMap) -> bool {
        match self {
            SearchStep::Location => fields.location(LOCATION).is_some(),
            // dates are optional, but a picked range must cover a night
            SearchStep::Date => fields.dates(DATES).map_or(true, |range| range.nights() > 0),
            SearchStep::Info => true,
        }
    }

    fn defaults() -> FieldMap {
        FieldMap::new()
            .with(GUEST_COUNT, FieldValue::Count(1))
            .with(ROOM_COUNT, FieldValue::Count(1))
            .with(BATHROOM_COUNT, FieldValue::Count(1))
    }

    fn submit_label(_editing: bool) -> &'static str {
        "Search"
    }
}

pub type SearchWizard = StepWizard<SearchStep>;

impl StepWizard<SearchStep> {
    /// Opens pre-populated from the filters already in effect.
    pub fn from_query(query: &ListingQuery) -> Self {
        let mut fields = SearchStep::defaults();
        if let Some(location) = query.location_value.as_deref().and_then(Location::lookup) {
            fields.set(LOCATION, FieldValue::Location(location));
        }
        if let Some(range) = query.date_range() {
            fields.set(DATES, FieldValue::Dates(range));
        }
        let counts = [
            (GUEST_COUNT, query.guest_count),
            (ROOM_COUNT, query.room_count),
            (BATHROOM_COUNT, query.bathroom_count),
        ];
        for (key, count) in counts {
            if let Some(count) = count {
                fields.set(key, FieldValue::Count(count));
            }
        }
        Self::with_fields(None, fields)
    }
}

/// Typed result of a completed search wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub location_value: String,
    pub dates: Option<DateRange>,
    pub guest_count: u32,
    pub room_count: u32,
    pub bathroom_count: u32,
}

impl SearchQuery {
    /// Overlays the collected filters on `base`; category and user filters survive.
    pub fn merge_into(&self, base: &ListingQuery) -> ListingQuery {
        let mut query = base.clone();
        query.location_value = Some(self.location_value.clone());
        query.guest_count = Some(self.guest_count);
        query.room_count = Some(self.room_count);
        query.bathroom_count = Some(self.bathroom_count);
        query.start_date = self.dates.map(|range| range.start);
        query.end_date = self.dates.map(|range| range.end);
        query
    }
}

impl TryFrom<&FieldMap> for SearchQuery {
    type Error = FieldError;

    fn try_from(fields: &FieldMap) -> Result<Self, Self::Error> {
        let location = fields.require_location(LOCATION)?;
        Ok(SearchQuery {
            location_value: location.value,
            dates: fields.dates(DATES),
            guest_count: fields.require_count(GUEST_COUNT)?,
            room_count: fields.require_count(ROOM_COUNT)?,
            bathroom_count: fields.require_count(BATHROOM_COUNT)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::testing::RecordingHost;
    use crate::wizard::{SubmitOutcome, Transition};

    fn range(raw: &str) -> DateRange {
        DateRange::parse(raw).unwrap()
    }

    #[test]
    fn location_gates_and_dates_need_a_night() {
        let mut host = RecordingHost::new();
        let mut wizard = SearchWizard::new();
        assert_eq!(wizard.advance(&mut host), Transition::Blocked);
        wizard.set_field(LOCATION, FieldValue::Location(Location::lookup("FR").unwrap()));
        assert_eq!(wizard.advance(&mut host), Transition::Moved(1));
        assert_eq!(wizard.secondary_label().as_deref(), Some("Back"));

        wizard.set_field(DATES, FieldValue::Dates(range("2025-07-01..2025-07-01")));
        assert_eq!(wizard.advance(&mut host), Transition::Blocked);
        wizard.set_field(DATES, FieldValue::Dates(range("2025-07-01..2025-07-04")));
        assert_eq!(wizard.advance(&mut host), Transition::Moved(2));
        assert_eq!(wizard.action_label(), "Search");

        let outcome = wizard.advance(&mut host);
        assert!(matches!(outcome, Transition::Submitted(SubmitOutcome::Completed(_))));
    }

    #[test]
    fn merge_keeps_category_and_builds_canonical_query() {
        let fields = SearchStep::defaults()
            .with(LOCATION, FieldValue::Location(Location::lookup("Portugal").unwrap()))
            .with(DATES, FieldValue::Dates(range("2025-07-01..2025-07-04")))
            .with(GUEST_COUNT, FieldValue::Count(3));
        let search = SearchQuery::try_from(&fields).unwrap();

        let base = ListingQuery {
            category: Some("Beach".into()),
            ..ListingQuery::default()
        };
        let query = search.merge_into(&base);
        assert_eq!(query.category.as_deref(), Some("Beach"));
        assert_eq!(
            query.to_query_string(),
            "/?bathroomCount=1&category=Beach&endDate=2025-07-04&guestCount=3\
             &locationValue=PT&roomCount=1&startDate=2025-07-01"
        );
    }

    #[test]
    fn reopening_prefills_current_filters() {
        let query = ListingQuery::from_args(&["location=CH", "guests=2", "start=2025-01-01", "end=2025-01-03"])
            .unwrap();
        let wizard = SearchWizard::from_query(&query);
        assert_eq!(wizard.fields().count(GUEST_COUNT), Some(2));
        assert_eq!(wizard.fields().count(ROOM_COUNT), Some(1));
        assert_eq!(wizard.fields().location(LOCATION).map(|l| l.value.as_str()), Some("CH"));
        assert_eq!(wizard.fields().dates(DATES).map(|r| r.nights()), Some(2));
        assert!(wizard.can_advance());
    }
}
