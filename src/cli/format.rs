//! Output formatting for CLI display.

use jiff::tz::TimeZone;

use crate::device::split_data_uri;
use crate::model::Entry;

/// First eight characters of an ID, or the whole ID if shorter.
pub(super) fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Format one entry as a timeline block.
///
/// ```text
/// Nov 14 • 22:13  Lisbon  ☀️ 22°C Clear
///   [text] Sunset over the bay
///   “Golden hour by the water.”
///   id 3fa8c1d2
/// ```
pub(super) fn format_entry(entry: &Entry, tz: &TimeZone) -> String {
    let when = entry.created_at().map_or_else(
        || "unknown time".to_string(),
        |at| at.to_zoned(tz.clone()).strftime("%b %-d • %H:%M").to_string(),
    );

    let mut header = when;
    if let Some(location) = &entry.location {
        header.push_str("  ");
        header.push_str(location);
    }
    if let Some(weather) = &entry.weather {
        header.push_str(&format!(
            "  {} {} {}",
            weather.icon, weather.temp, weather.condition
        ));
    }

    let mut lines = vec![header, format!("  [{}] {}", entry.kind.label(), entry.text)];
    if let Some(image) = &entry.image_url {
        lines.push(format!("  {}", describe_image(image)));
    }
    if let Some(caption) = &entry.ai_enhancement {
        lines.push(format!("  “{caption}”"));
    }
    lines.push(format!("  id {}", short_id(&entry.id)));
    lines.join("\n")
}

fn describe_image(image: &str) -> String {
    match split_data_uri(image) {
        Some((mime_type, data)) => {
            let kib = (data.len() * 3 / 4).div_ceil(1024);
            format!("photo ({mime_type}, {kib} KiB)")
        }
        None => "photo".to_string(),
    }
}
