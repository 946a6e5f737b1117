use uuid::Uuid;

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> Uuid;

    /// First eight hex digits of the id, as shown in listings and accepted by
    /// commands in place of the full id.
    fn short_id(&self) -> String {
        short_id(self.id())
    }
}

/// Provides access to a human-friendly entity name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

pub fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

/// Resolves a full or abbreviated id against a set of entities.
///
/// Returns `None` when nothing matches or when a prefix is ambiguous.
pub fn resolve_id<'a, T, I>(items: I, needle: &str) -> Option<Uuid>
where
    T: Identifiable + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let needle = needle.trim().to_ascii_lowercase().replace('-', "");
    if needle.is_empty() {
        return None;
    }
    let mut found = None;
    for item in items {
        let id = item.id();
        if id.simple().to_string().starts_with(&needle) {
            if found.is_some() {
                return None;
            }
            found = Some(id);
        }
    }
    found
}
