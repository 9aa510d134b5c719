//! Degraded reply used whenever the dialogue service cannot be reached

/// A crisis line listed in the degraded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotline {
    pub flag: &'static str,
    pub region: &'static str,
    pub name: Option<&'static str>,
    pub contact: &'static str,
}

pub const CRISIS_HOTLINES: &[Hotline] = &[
    Hotline {
        flag: "🇮🇳",
        region: "India",
        name: Some("AASRA"),
        contact: "+91-9152987821",
    },
    Hotline {
        flag: "🇺🇸",
        region: "USA",
        name: None,
        contact: "988",
    },
    Hotline {
        flag: "🇬🇧",
        region: "UK",
        name: None,
        contact: "116 123",
    },
];

const APOLOGY: &str = "I'm having trouble connecting right now. If you're in crisis, please contact:";

/// Static safety-net text
pub fn degraded_message() -> String {
    let lines: Vec<String> = CRISIS_HOTLINES
        .iter()
        .map(|hotline| match hotline.name {
            Some(name) => format!(
                "• {} {}: {} {}",
                hotline.flag, hotline.region, name, hotline.contact
            ),
            None => format!("• {} {}: {}", hotline.flag, hotline.region, hotline.contact),
        })
        .collect();

    format!("{APOLOGY}\n\n{}", lines.join("\n"))
}
