use once_cell::sync::Lazy;
use regex::Regex;

use antar_core::domain::booking::BookingCode;
use antar_core::domain::service::{Route, ServiceType, VehicleType};
use antar_core::flows::prompts::{format_rupiah, NOT_UNDERSTOOD};
use antar_core::pricing::{PriceRequest, TariffTable};

static BOOKING_REQUEST_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(reguler|charter drop|charter harian|charter dropp|regulerr|charter hariann)\s*(malang-juanda|juanda-malang|malang-surabaya|surabaya-malang|malang-juandaa|juanda-malangg)",
    )
    .expect("valid booking request pattern")
});

const BOOKING_KEYWORDS: &[&str] = &["pesan", "booking", "reservasi"];
const CHECK_KEYWORDS: &[&str] = &["cek", "cari", "status"];
const PRICE_KEYWORDS: &[&str] = &["harga", "price"];
const RECOMMENDATION_KEYWORDS: &[&str] = &["rekomendasi", "recommend", "saran", "suggest"];
const GRATITUDE_KEYWORDS: &[&str] = &["terima kasih", "makasih", "thanks"];
const GREETING_KEYWORDS: &[&str] = &["halo", "hai", "selamat"];
const HELP_KEYWORDS: &[&str] = &["bantuan", "help"];

pub const GRATITUDE_REPLY: &str = "Terima kasih! Silakan ketik \"bantuan\" jika perlu bantuan lagi.";
pub const GREETING_REPLY: &str = "Halo! Silakan ketik \"Pesan Reguler Malang-Juanda\" untuk memesan atau \"bantuan\" untuk informasi lebih lanjut.";
pub const HELP_REPLY: &str = "Halo! Silakan ketik:\n\"Pesan Reguler Malang-Juanda\" untuk memesan.\n\"Rekomendasi layanan Malang-Juanda\" untuk saran.\n\"Cek status KR-ABC123\" untuk cek status.";

/// What an idle user is asking for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Booking { service: ServiceType, route: Route },
    CheckReservation { code: Option<BookingCode> },
    PriceInquiry,
    Recommendation,
    Gratitude,
    Greeting,
    Help,
    Unknown,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booking { .. } => "booking",
            Self::CheckReservation { .. } => "check_reservation",
            Self::PriceInquiry => "price_inquiry",
            Self::Recommendation => "recommendation",
            Self::Gratitude => "gratitude",
            Self::Greeting => "greeting",
            Self::Help => "help",
            Self::Unknown => "unknown",
        }
    }
}

/// Keyword classifier for messages that arrive while no dialogue is active.
/// The first keyword family that matches wins.
#[derive(Clone, Debug, Default)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, message: &str) -> Intent {
        let normalized = normalize_text(message);

        if contains_any(&normalized, BOOKING_KEYWORDS) {
            return extract_booking_request(&normalized)
                .map_or(Intent::Unknown, |(service, route)| Intent::Booking { service, route });
        }
        if contains_any(&normalized, CHECK_KEYWORDS) {
            return Intent::CheckReservation { code: BookingCode::find_in(message) };
        }
        if contains_any(&normalized, PRICE_KEYWORDS) {
            return Intent::PriceInquiry;
        }
        if contains_any(&normalized, RECOMMENDATION_KEYWORDS) {
            return Intent::Recommendation;
        }
        if contains_any(&normalized, GRATITUDE_KEYWORDS) {
            return Intent::Gratitude;
        }
        if contains_any(&normalized, GREETING_KEYWORDS) {
            return Intent::Greeting;
        }
        if contains_any(&normalized, HELP_KEYWORDS) {
            return Intent::Help;
        }
        Intent::Unknown
    }
}

/// Fixed reply for intents that need no dialogue or store access.
pub fn canned_reply(intent: &Intent, tariffs: &TariffTable) -> String {
    match intent {
        Intent::PriceInquiry => price_inquiry_reply(tariffs),
        Intent::Recommendation => recommendation_reply(tariffs),
        Intent::Gratitude => GRATITUDE_REPLY.to_string(),
        Intent::Greeting => GREETING_REPLY.to_string(),
        Intent::Help => HELP_REPLY.to_string(),
        Intent::Booking { .. } | Intent::CheckReservation { .. } | Intent::Unknown => {
            NOT_UNDERSTOOD.to_string()
        }
    }
}

pub fn recommendation_reply(tariffs: &TariffTable) -> String {
    let per_person = tariffs.standard.base + tariffs.standard.per_extra_passenger;
    format!(
        "Untuk rute Malang-Juanda, kami sarankan layanan Reguler ({}/orang) atau Charter Drop (mulai {}). Ketik \"Pesan Reguler Malang-Juanda\" untuk mulai.",
        format_rupiah(per_person),
        format_rupiah(tariffs.charter_drop.avanza)
    )
}

pub fn price_inquiry_reply(tariffs: &TariffTable) -> String {
    let cost = tariffs.cost(&PriceRequest::new(ServiceType::Standard, Route::MalangJuanda, 1));
    let daily_rate = tariffs.charter_daily.hourly_rate(VehicleType::Avanza, tariffs.default_region);
    format!(
        "Harga Reguler Malang-Juanda untuk 1 penumpang:\nHarga Dasar: {}\nBiaya Layanan: {}\nTotal: {}\nCharter Drop mulai {}, Charter Harian mulai {}/jam.\nKetik \"Pesan Reguler Malang-Juanda\" untuk mulai.",
        format_rupiah(cost.base_price),
        format_rupiah(cost.service_fee),
        format_rupiah(cost.total_price),
        format_rupiah(tariffs.charter_drop.avanza),
        format_rupiah(daily_rate)
    )
}

fn extract_booking_request(normalized_text: &str) -> Option<(ServiceType, Route)> {
    let captures = BOOKING_REQUEST_PATTERN.captures(normalized_text)?;
    let service = ServiceType::from_label(captures.get(1)?.as_str())?;
    let route = Route::from_label(captures.get(2)?.as_str())?;
    Some((service, route))
}

fn contains_any(normalized_text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| normalized_text.contains(keyword))
}

fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}
