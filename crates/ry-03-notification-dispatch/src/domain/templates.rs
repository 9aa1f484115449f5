//! Notification texts.

use shared_types::Tag;

/// Message sent to subscribers of `tag`.
pub fn template(tag: Tag) -> &'static str {
    match tag {
        Tag::Nature => "A new nature photo has been uploaded to Real You!",
        Tag::Food => "A delicious new food photo is waiting for you on Real You!",
        Tag::Travel => "Explore a new destination on Real You - a travel photo just dropped!",
        Tag::Sports => "Catch the latest sports action on Real You - new photo alert!",
        Tag::People => "A captivating portrait has been added to Real You!",
        Tag::Pets => "Adorable alert! A new pet photo is live on Real You!",
        Tag::ArtAndFashion => "Get inspired by the latest art & fashion photo on Real You!",
    }
}

/// Message for a raw label. Labels outside the enumeration get the generic text.
pub fn message_for(label: &str) -> String {
    match Tag::from_label(label) {
        Some(tag) => template(tag).to_string(),
        None => format!("A new photo tagged with {} has been uploaded to Real You!", label),
    }
}
