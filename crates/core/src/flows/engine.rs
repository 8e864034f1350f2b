use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::booking::{Booking, BookingCode, TripDetails};
use crate::domain::service::{Route, ServiceType, VehicleType};
use crate::domain::session::{BookingSlots, Session};
use crate::flows::prompts;
use crate::flows::states::{first_step, next_step, DialogueStep, ErrorPolicy};
use crate::normalize::{normalize_passengers, normalize_phone};
use crate::pricing::{PriceRequest, TariffTable};

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]{3,50}").expect("valid name pattern"));
static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid time pattern"));
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));
static RENTAL_HOURS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\s*(jam)?$").expect("valid rental hours pattern"));

const MAX_PASSENGERS: u32 = 10;
const MAX_RENTAL_HOURS: u32 = 24;
const MIN_PICKUP_ADDRESS_CHARS: usize = 6;

/// What the caller must do after a turn. `Reply` and `Abandoned` are final;
/// the other two ask for store I/O whose result is fed back through
/// [`DialogueEngine::booking_persisted`] or [`DialogueEngine::lookup_completed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Reply(String),
    /// The step's error budget ran out and the session went idle.
    Abandoned { step: DialogueStep, reply: String },
    PersistBooking(TripDetails),
    LookupBooking(BookingCode),
}

/// The price shown on the summary and stored at confirmation. Only service,
/// route and passenger count take part; vehicle, rental hours and pickup time
/// are left at their defaults.
pub fn summary_price_request(
    service: ServiceType,
    route: Route,
    passengers: u32,
) -> PriceRequest<'static> {
    PriceRequest::new(service, route, passengers)
}

#[derive(Clone, Debug, Default)]
pub struct DialogueEngine {
    tariffs: TariffTable,
    errors: ErrorPolicy,
}

impl DialogueEngine {
    pub fn new(tariffs: TariffTable, errors: ErrorPolicy) -> Self {
        Self { tariffs, errors }
    }

    pub fn tariffs(&self) -> &TariffTable {
        &self.tariffs
    }

    pub fn error_policy(&self) -> &ErrorPolicy {
        &self.errors
    }

    pub fn start_booking(
        &self,
        session: &mut Session,
        service: ServiceType,
        route: Route,
    ) -> String {
        let step = first_step(service);
        session.slots = BookingSlots::for_service(service, route);
        session.error_count = 0;
        session.step = Some(step);
        step.definition().render_prompt(Some(service))
    }

    pub fn start_lookup(&self, session: &mut Session) -> String {
        session.step = Some(DialogueStep::CheckReservation);
        session.error_count = 0;
        prompts::ASK_BOOKING_CODE.to_string()
    }

    pub fn advance(&self, session: &mut Session, message: &str) -> StepOutcome {
        let message = message.trim();
        let Some(step) = session.step else {
            return StepOutcome::Reply(prompts::NOT_UNDERSTOOD.to_string());
        };

        match step {
            DialogueStep::Summary => self.on_summary(session, message),
            DialogueStep::NextAction => self.on_next_action(session, message),
            DialogueStep::CheckReservation => self.on_check_reservation(session, message),
            slot_step => self.on_slot(session, slot_step, message),
        }
    }

    pub fn booking_persisted(&self, session: &mut Session, code: &BookingCode) -> String {
        let name = session.slots.name.clone().unwrap_or_default();
        session.step = Some(DialogueStep::NextAction);
        session.error_count = 0;
        prompts::booking_confirmed(&name, code)
    }

    /// A miss parks the session on the code prompt so another code can be tried.
    pub fn lookup_completed(&self, session: &mut Session, booking: Option<&Booking>) -> String {
        match booking {
            Some(booking) => {
                session.step = Some(DialogueStep::NextAction);
                session.error_count = 0;
                prompts::booking_details(booking)
            }
            None => {
                session.step = Some(DialogueStep::CheckReservation);
                prompts::BOOKING_NOT_FOUND.to_string()
            }
        }
    }

    /// The session is left where it was so the same command can be retried.
    pub fn store_unavailable(&self, _session: &mut Session) -> String {
        prompts::STORE_UNAVAILABLE.to_string()
    }

    pub fn summary_price(&self, slots: &BookingSlots) -> i64 {
        match (slots.service, slots.route, slots.passengers) {
            (Some(service), Some(route), Some(passengers)) => {
                self.tariffs.price(&summary_price_request(service, route, passengers))
            }
            _ => 0,
        }
    }

    fn on_slot(&self, session: &mut Session, step: DialogueStep, message: &str) -> StepOutcome {
        if !fill_slot(&mut session.slots, step, message) {
            return self.reject(session, step, step.definition().invalid_prompt);
        }

        session.error_count = 0;
        let service = session.slots.service.unwrap_or(ServiceType::Standard);
        let next = next_step(step, service).unwrap_or(DialogueStep::Summary);
        session.step = Some(next);
        StepOutcome::Reply(match next {
            DialogueStep::Summary => {
                prompts::booking_summary(&session.slots, self.summary_price(&session.slots))
            }
            _ => next.definition().render_prompt(session.slots.service),
        })
    }

    /// Counts an unusable answer against the step's budget. An exhausted
    /// budget resets the session and tells the user how to start over.
    fn reject(&self, session: &mut Session, step: DialogueStep, retry: &str) -> StepOutcome {
        session.error_count += 1;
        if self.errors.budget_for(step).is_exhausted(session.error_count) {
            let reply = prompts::restart_instruction(session.slots.service, session.slots.route);
            session.reset();
            return StepOutcome::Abandoned { step, reply };
        }
        StepOutcome::Reply(retry.to_string())
    }

    fn on_summary(&self, session: &mut Session, message: &str) -> StepOutcome {
        match message.to_lowercase().as_str() {
            "konfirmasi" | "confirm" | "confirmed" => {
                let total_cost = self.summary_price(&session.slots);
                match session.slots.to_trip(total_cost) {
                    Some(trip) => StepOutcome::PersistBooking(trip),
                    None => {
                        session.reset();
                        StepOutcome::Reply(prompts::BOOKING_CANCELLED.to_string())
                    }
                }
            }
            "ulang" => StepOutcome::Reply(restart_slots(session)),
            "batal" => {
                session.reset();
                StepOutcome::Reply(prompts::BOOKING_CANCELLED.to_string())
            }
            _ => self.reject(session, DialogueStep::Summary, prompts::SUMMARY_COMMANDS),
        }
    }

    fn on_next_action(&self, session: &mut Session, message: &str) -> StepOutcome {
        match message.to_lowercase().as_str() {
            "selesai" => {
                session.reset();
                StepOutcome::Reply(prompts::FAREWELL.to_string())
            }
            "buatkan reservasi lagi" => StepOutcome::Reply(restart_slots(session)),
            "cari pesanan" => StepOutcome::Reply(self.start_lookup(session)),
            _ => self.reject(session, DialogueStep::NextAction, prompts::NEXT_ACTION_COMMANDS),
        }
    }

    fn on_check_reservation(&self, session: &mut Session, message: &str) -> StepOutcome {
        if let Some(code) = BookingCode::parse_exact(message) {
            session.error_count = 0;
            return StepOutcome::LookupBooking(code);
        }
        match message.to_lowercase().as_str() {
            "batal" | "tidak ada" | "ga ada" => {
                session.reset();
                StepOutcome::Reply(prompts::LOOKUP_CANCELLED.to_string())
            }
            _ => self.reject(
                session,
                DialogueStep::CheckReservation,
                prompts::INVALID_BOOKING_CODE,
            ),
        }
    }
}

/// Clears the answers, keeps service/route/vehicle, and asks for the name again.
fn restart_slots(session: &mut Session) -> String {
    session.slots.restart();
    session.error_count = 0;
    session.step = Some(DialogueStep::Name);
    prompts::ASK_NAME.to_string()
}

/// Validates `message` for `step` and stores it. Returns `false` when rejected.
fn fill_slot(slots: &mut BookingSlots, step: DialogueStep, message: &str) -> bool {
    match step {
        DialogueStep::VehicleType => store(&mut slots.vehicle, VehicleType::from_label(message)),
        DialogueStep::Name => {
            store(&mut slots.name, NAME_PATTERN.is_match(message).then(|| message.to_string()))
        }
        DialogueStep::Passengers => store(
            &mut slots.passengers,
            normalize_passengers(message).filter(|count| (1..=MAX_PASSENGERS).contains(count)),
        ),
        DialogueStep::Phone => store(&mut slots.phone, normalize_phone(message)),
        DialogueStep::AddressPickup => store(
            &mut slots.address_pickup,
            (message.chars().count() >= MIN_PICKUP_ADDRESS_CHARS).then(|| message.to_string()),
        ),
        DialogueStep::RentalHours => store(&mut slots.rental_hours, parse_rental_hours(message)),
        DialogueStep::AddressDropoff => {
            slots.address_dropoff = optional_text(message);
            true
        }
        DialogueStep::Flight => {
            slots.flight = optional_text(message);
            true
        }
        DialogueStep::Airline => {
            slots.airline = optional_text(message);
            true
        }
        DialogueStep::PickupTime => store(
            &mut slots.pickup_time,
            TIME_PATTERN.is_match(message).then(|| message.to_string()),
        ),
        DialogueStep::PickupDate => store(
            &mut slots.pickup_date,
            DATE_PATTERN.is_match(message).then(|| message.to_string()),
        ),
        DialogueStep::Summary | DialogueStep::NextAction | DialogueStep::CheckReservation => false,
    }
}

fn store<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

fn optional_text(message: &str) -> Option<String> {
    if message.is_empty() || message.eq_ignore_ascii_case("tidak ada") {
        None
    } else {
        Some(message.to_string())
    }
}

fn parse_rental_hours(message: &str) -> Option<u32> {
    let lowered = message.to_lowercase();
    let hours: u32 = RENTAL_HOURS_PATTERN.captures(&lowered)?.get(1)?.as_str().parse().ok()?;
    (1..=MAX_RENTAL_HOURS).contains(&hours).then_some(hours)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{summary_price_request, DialogueEngine, StepOutcome};
    use crate::domain::booking::{Booking, BookingCode};
    use crate::domain::service::{Route, ServiceType, VehicleType};
    use crate::domain::session::Session;
    use crate::flows::states::{DialogueStep, ErrorBudget, ErrorPolicy};
    use crate::pricing::TariffTable;

    fn session() -> Session {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("timestamp");
        Session::new("user-1", now)
    }

    fn reply(outcome: StepOutcome) -> String {
        match outcome {
            StepOutcome::Reply(text) | StepOutcome::Abandoned { reply: text, .. } => text,
            other => panic!("expected a reply, got {other:?}"),
        }
    }

    fn say(engine: &DialogueEngine, session: &mut Session, message: &str) -> String {
        reply(engine.advance(session, message))
    }

    fn fill_standard_until_summary(engine: &DialogueEngine, session: &mut Session) -> String {
        engine.start_booking(session, ServiceType::Standard, Route::MalangJuanda);
        for answer in [
            "Budi Santoso",
            "2 penumpang",
            "08123456789",
            "Jl. Kawi No. 10",
            "tidak ada",
            "GA123",
            "Garuda Indonesia",
            "07:00",
        ] {
            say(engine, session, answer);
        }
        say(engine, session, "2025-06-20")
    }

    #[test]
    fn standard_booking_collects_slots_in_order() {
        let engine = DialogueEngine::default();
        let mut session = session();

        let prompt = engine.start_booking(&mut session, ServiceType::Standard, Route::MalangJuanda);
        assert_eq!(prompt, "Silakan masukkan nama pemesan (misal, Budi Santoso).");
        assert_eq!(session.step, Some(DialogueStep::Name));

        let prompt = say(&engine, &mut session, "Budi Santoso");
        assert!(prompt.starts_with("Berapa jumlah penumpang?"));
        assert_eq!(session.slots.name.as_deref(), Some("Budi Santoso"));
        assert_eq!(session.step, Some(DialogueStep::Passengers));

        say(&engine, &mut session, "3 penumpang");
        assert_eq!(session.slots.passengers, Some(3));
        assert_eq!(session.step, Some(DialogueStep::Phone));

        say(&engine, &mut session, "08123456789");
        assert_eq!(session.slots.phone.as_deref(), Some("+628123456789"));
        assert_eq!(session.step, Some(DialogueStep::AddressPickup));
    }

    #[test]
    fn summary_renders_reguler_price_from_passengers_only() {
        let engine = DialogueEngine::default();
        let mut session = session();

        let summary = fill_standard_until_summary(&engine, &mut session);

        assert_eq!(session.step, Some(DialogueStep::Summary));
        assert!(summary.contains("Nama: Budi Santoso"));
        assert!(summary.contains("Layanan: Reguler"));
        assert!(summary.contains("Rute: Malang-Juanda"));
        assert!(summary.contains("Alamat Antar: Tidak ada"));
        assert!(summary.contains("Penerbangan: GA123"));
        assert!(summary.contains("Total Harga: Rp205,000"));
        assert!(summary.ends_with("atau 'batal' untuk membatalkan."));
    }

    #[test]
    fn third_consecutive_failure_abandons_the_session() {
        let engine = DialogueEngine::default();
        let mut session = session();
        engine.start_booking(&mut session, ServiceType::Standard, Route::MalangJuanda);
        say(&engine, &mut session, "Budi Santoso");

        let first = say(&engine, &mut session, "banyak sekali");
        assert!(first.starts_with("Jumlah penumpang tidak valid."));
        assert_eq!(session.error_count, 1);

        say(&engine, &mut session, "0");
        assert_eq!(session.step, Some(DialogueStep::Passengers));
        assert_eq!(session.error_count, 2);

        let abandoned = say(&engine, &mut session, "sebelas");
        assert_eq!(
            abandoned,
            "Maaf, terlalu banyak kesalahan. Silakan mulai lagi dengan \"Pesan Reguler Malang-Juanda\"."
        );
        assert!(session.is_idle());
        assert_eq!(session.slots.name, None);
        assert_eq!(session.error_count, 0);
    }

    #[test]
    fn valid_answer_resets_error_counter() {
        let engine = DialogueEngine::default();
        let mut session = session();
        engine.start_booking(&mut session, ServiceType::CharterDrop, Route::JuandaMalang);

        say(&engine, &mut session, "sedan");
        say(&engine, &mut session, "truk");
        assert_eq!(session.error_count, 2);

        say(&engine, &mut session, "Hiace");
        assert_eq!(session.error_count, 0);
        assert_eq!(session.slots.vehicle, Some(VehicleType::Hiace));
        assert_eq!(session.step, Some(DialogueStep::Name));
    }

    #[test]
    fn configured_threshold_changes_when_abandonment_happens() {
        let engine = DialogueEngine::new(TariffTable::default(), ErrorPolicy::new(0));
        let mut session = session();
        engine.start_booking(&mut session, ServiceType::CharterDrop, Route::JuandaMalang);

        let reply = say(&engine, &mut session, "sedan");

        assert!(reply.contains("\"Pesan Charter Drop Juanda-Malang\""));
        assert!(session.is_idle());
    }

    #[test]
    fn charter_daily_asks_rental_hours_and_skips_flight() {
        let engine = DialogueEngine::default();
        let mut session = session();

        let prompt =
            engine.start_booking(&mut session, ServiceType::CharterDaily, Route::MalangSurabaya);
        assert!(prompt.contains("Charter Harian"));

        for answer in ["innova", "Siti Aminah", "empat orang", "+628123456789"] {
            say(&engine, &mut session, answer);
        }
        let prompt = say(&engine, &mut session, "Jl. Ijen No. 22");
        assert!(prompt.starts_with("Masukkan jumlah jam sewa"));
        assert_eq!(session.step, Some(DialogueStep::RentalHours));

        let invalid = say(&engine, &mut session, "30 jam");
        assert!(invalid.starts_with("Jumlah jam sewa tidak valid."));

        let prompt = say(&engine, &mut session, "10 jam");
        assert_eq!(prompt, "Masukkan jam jemput (misal, 07:00).");
        assert_eq!(session.slots.rental_hours, Some(10));
        assert_eq!(session.slots.flight, None);

        say(&engine, &mut session, "19:00");
        let summary = say(&engine, &mut session, "2025-07-01");
        assert!(summary.contains("Kendaraan: Innova"));
        assert!(summary.contains("Lama Sewa: 10 jam"));
        // Summary pricing ignores vehicle and rental hours: 0 billable hours.
        assert!(summary.contains("Total Harga: Rp0"));
    }

    #[test]
    fn free_text_slots_accept_tidak_ada_as_empty() {
        let engine = DialogueEngine::default();
        let mut session = session();
        session.step = Some(DialogueStep::AddressDropoff);
        session.slots.service = Some(ServiceType::Standard);

        say(&engine, &mut session, "Tidak Ada");
        assert_eq!(session.slots.address_dropoff, None);
        assert_eq!(session.step, Some(DialogueStep::Flight));

        say(&engine, &mut session, "");
        assert_eq!(session.slots.flight, None);
        assert_eq!(session.step, Some(DialogueStep::Airline));
    }

    #[test]
    fn name_and_pickup_checks_follow_patterns() {
        let engine = DialogueEngine::default();
        let mut session = session();
        engine.start_booking(&mut session, ServiceType::Standard, Route::SurabayaMalang);

        say(&engine, &mut session, "Al");
        assert_eq!(session.step, Some(DialogueStep::Name));
        say(&engine, &mut session, "Ani 2");
        assert_eq!(session.slots.name.as_deref(), Some("Ani 2"));

        session.step = Some(DialogueStep::AddressPickup);
        say(&engine, &mut session, "Jl. A");
        assert_eq!(session.step, Some(DialogueStep::AddressPickup));
        say(&engine, &mut session, "Jl. AB");
        assert_eq!(session.step, Some(DialogueStep::AddressDropoff));

        session.step = Some(DialogueStep::PickupTime);
        say(&engine, &mut session, "7:00");
        assert_eq!(session.step, Some(DialogueStep::PickupTime));
        say(&engine, &mut session, "07:00");
        say(&engine, &mut session, "20-06-2025");
        assert_eq!(session.step, Some(DialogueStep::PickupDate));
    }

    #[test]
    fn confirmation_requests_persistence_with_summary_price() {
        let engine = DialogueEngine::default();
        let mut session = session();
        fill_standard_until_summary(&engine, &mut session);

        let trip = match engine.advance(&mut session, "Konfirmasi") {
            StepOutcome::PersistBooking(trip) => trip,
            other => panic!("expected persistence request, got {other:?}"),
        };
        let request = summary_price_request(trip.service, trip.route, trip.passengers);
        let rederived = engine.tariffs().price(&request);
        assert_eq!(trip.total_cost, 205_000);
        assert_eq!(trip.total_cost, rederived);
        assert_eq!(trip.airline.as_deref(), Some("Garuda Indonesia"));
        assert_eq!(session.step, Some(DialogueStep::Summary));

        let code = BookingCode("KR-1A2B3C".to_string());
        let reply = engine.booking_persisted(&mut session, &code);
        assert!(reply.starts_with("Pemesanan dikonfirmasi untuk Budi Santoso:\n"));
        assert!(reply.contains("Kode Booking: KR-1A2B3C"));
        assert_eq!(session.step, Some(DialogueStep::NextAction));
    }

    #[test]
    fn summary_restart_keeps_trip_choice_and_cancel_goes_idle() {
        let engine = DialogueEngine::default();
        let mut session = session();
        fill_standard_until_summary(&engine, &mut session);

        let unknown = say(&engine, &mut session, "mungkin");
        assert!(unknown.starts_with("Silakan ketik 'konfirmasi'"));
        assert_eq!(session.step, Some(DialogueStep::Summary));

        let prompt = say(&engine, &mut session, "ulang");
        assert_eq!(prompt, "Silakan masukkan nama pemesan (misal, Budi Santoso).");
        assert_eq!(session.step, Some(DialogueStep::Name));
        assert_eq!(session.slots.service, Some(ServiceType::Standard));
        assert_eq!(session.slots.phone, None);

        fill_standard_until_summary(&engine, &mut session);
        let cancelled = say(&engine, &mut session, "batal");
        assert!(cancelled.starts_with("Pemesanan dibatalkan."));
        assert!(session.is_idle());
        assert_eq!(session.slots.service, None);
    }

    #[test]
    fn next_action_commands_route_to_new_booking_lookup_or_idle() {
        let engine = DialogueEngine::default();
        let mut session = session();
        engine.start_booking(&mut session, ServiceType::CharterDrop, Route::MalangJuanda);
        session.slots.vehicle = Some(VehicleType::Avanza);
        session.step = Some(DialogueStep::NextAction);

        assert!(say(&engine, &mut session, "apa?").starts_with("Apa yang ingin dilakukan"));

        say(&engine, &mut session, "buatkan reservasi lagi");
        assert_eq!(session.step, Some(DialogueStep::Name));
        assert_eq!(session.slots.service, Some(ServiceType::CharterDrop));
        assert_eq!(session.slots.vehicle, Some(VehicleType::Avanza));

        session.step = Some(DialogueStep::NextAction);
        let prompt = say(&engine, &mut session, "cari pesanan");
        assert!(prompt.starts_with("Silakan masukkan kode booking"));
        assert_eq!(session.step, Some(DialogueStep::CheckReservation));

        session.step = Some(DialogueStep::NextAction);
        assert!(say(&engine, &mut session, "Selesai").starts_with("Terima kasih!"));
        assert!(session.is_idle());
    }

    #[test]
    fn check_reservation_retries_forever_and_keeps_state_when_not_found() {
        let engine = DialogueEngine::default();
        let mut session = session();
        engine.start_lookup(&mut session);

        for _ in 0..10 {
            let reply = say(&engine, &mut session, "kode saya lupa");
            assert!(reply.starts_with("Kode booking tidak valid."));
        }
        assert_eq!(session.step, Some(DialogueStep::CheckReservation));

        let outcome = engine.advance(&mut session, "kr-abc123");
        assert_eq!(outcome, StepOutcome::LookupBooking(BookingCode("KR-ABC123".to_string())));

        let reply = engine.lookup_completed(&mut session, None);
        assert!(reply.starts_with("Kode booking tidak ditemukan."));
        assert_eq!(session.step, Some(DialogueStep::CheckReservation));

        let reply = say(&engine, &mut session, "ga ada");
        assert!(reply.starts_with("Pengecekan dibatalkan."));
        assert!(session.is_idle());
    }

    #[test]
    fn bounded_lookup_budget_abandons_after_repeated_bad_codes() {
        let errors = ErrorPolicy::default()
            .with_budget(DialogueStep::CheckReservation, ErrorBudget::Bounded(1));
        let engine = DialogueEngine::new(TariffTable::default(), errors);
        let mut session = session();
        engine.start_lookup(&mut session);

        let first = say(&engine, &mut session, "kode saya lupa");
        assert!(first.starts_with("Kode booking tidak valid."));
        assert_eq!(session.error_count, 1);

        let outcome = engine.advance(&mut session, "masih lupa");
        match outcome {
            StepOutcome::Abandoned { step, reply } => {
                assert_eq!(step, DialogueStep::CheckReservation);
                assert!(reply.starts_with("Maaf, terlalu banyak kesalahan."));
            }
            other => panic!("expected abandonment, got {other:?}"),
        }
        assert!(session.is_idle());
    }

    #[test]
    fn bounded_summary_budget_applies_to_unknown_commands() {
        let errors =
            ErrorPolicy::default().with_budget(DialogueStep::Summary, ErrorBudget::Bounded(0));
        let engine = DialogueEngine::new(TariffTable::default(), errors);
        let mut session = session();
        fill_standard_until_summary(&engine, &mut session);

        let outcome = engine.advance(&mut session, "mungkin");

        assert!(matches!(outcome, StepOutcome::Abandoned { step: DialogueStep::Summary, .. }));
        assert!(session.is_idle());
    }

    #[test]
    fn slot_abandonment_names_the_step() {
        let engine = DialogueEngine::default();
        let mut session = session();
        engine.start_booking(&mut session, ServiceType::Standard, Route::MalangJuanda);
        session.step = Some(DialogueStep::Phone);

        say(&engine, &mut session, "123");
        say(&engine, &mut session, "456");
        let outcome = engine.advance(&mut session, "789");

        assert!(matches!(outcome, StepOutcome::Abandoned { step: DialogueStep::Phone, .. }));
    }

    #[test]
    fn found_booking_is_described_and_offers_next_action() {
        let engine = DialogueEngine::default();
        let mut session = session();
        fill_standard_until_summary(&engine, &mut session);
        let trip = match engine.advance(&mut session, "confirm") {
            StepOutcome::PersistBooking(trip) => trip,
            other => panic!("expected persistence request, got {other:?}"),
        };
        let code = BookingCode("KR-00FF11".to_string());
        let booking = Booking::pending(code, trip, session.created_at);

        session.step = Some(DialogueStep::CheckReservation);
        let reply = engine.lookup_completed(&mut session, Some(&booking));

        assert!(reply.contains("Kode Booking: KR-00FF11"));
        assert!(reply.contains("Layanan: Reguler"));
        assert!(reply.contains("Status: Pending"));
        assert_eq!(session.step, Some(DialogueStep::NextAction));
    }

    #[test]
    fn idle_session_accepts_no_slots() {
        let engine = DialogueEngine::default();
        let mut session = session();

        let reply = say(&engine, &mut session, "Budi Santoso");

        assert!(reply.starts_with("Maaf, saya kurang paham."));
        assert!(session.is_idle());
        assert_eq!(session.slots.name, None);
    }

    #[test]
    fn store_failure_leaves_summary_in_place_for_retry() {
        let engine = DialogueEngine::default();
        let mut session = session();
        fill_standard_until_summary(&engine, &mut session);
        let _ = engine.advance(&mut session, "konfirmasi");

        let reply = engine.store_unavailable(&mut session);

        assert!(reply.starts_with("Maaf, sistem pemesanan sedang tidak tersedia."));
        assert_eq!(session.step, Some(DialogueStep::Summary));
        assert!(session.slots.name.is_some());
    }
}
