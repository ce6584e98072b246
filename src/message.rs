use crate::models::EventRecord;

/// Renders the five-line push body for one event. Missing fields get their fallback text.
pub fn generate_message(event: &EventRecord) -> String {
    let lines = [
        format!("🎭 {}", event.display_name()),
        format!("🕒 Date and time: {}", event.when()),
        format!("📍 Venue: {}", event.venue_name()),
        format!("📚 Genre: {}", event.genre()),
        format!("🔗 More info: {}", event.link()),
    ];
    lines.join("\n")
}
