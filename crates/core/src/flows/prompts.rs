//! Customer-facing dialogue texts (Indonesian).

use crate::domain::booking::{Booking, BookingCode};
use crate::domain::service::{Route, ServiceType};
use crate::domain::session::BookingSlots;

pub const ASK_VEHICLE: &str = "Silakan pilih tipe kendaraan untuk {service} (Avanza, Innova, Hiace).";
pub const INVALID_VEHICLE: &str =
    "Tipe kendaraan tidak valid. Silakan pilih Avanza, Innova, atau Hiace.";

pub const ASK_NAME: &str = "Silakan masukkan nama pemesan (misal, Budi Santoso).";
pub const INVALID_NAME: &str =
    "Nama tidak valid. Silakan masukkan nama lengkap (misal, Budi Santoso).";

pub const ASK_PASSENGERS: &str =
    "Berapa jumlah penumpang? (misal, 3 penumpang atau dua orang)";
pub const INVALID_PASSENGERS: &str = "Jumlah penumpang tidak valid. Silakan masukkan seperti \"3 penumpang\" atau \"dua orang\".";

pub const ASK_PHONE: &str = "Masukkan nomor telepon (misal, +628123456789 atau 08123456789).";
pub const INVALID_PHONE: &str = "Nomor telepon tidak valid. Silakan masukkan seperti \"+628123456789\" atau \"08123456789\".";

pub const ASK_ADDRESS_PICKUP: &str = "Masukkan alamat jemput (misal, Jl. Kawi No. 10).";
pub const INVALID_ADDRESS_PICKUP: &str =
    "Alamat jemput tidak valid. Silakan masukkan alamat lengkap (misal, Jl. Kawi No. 10).";

pub const ASK_RENTAL_HOURS: &str = "Masukkan jumlah jam sewa untuk Charter Harian (misal, 5).";
pub const INVALID_RENTAL_HOURS: &str =
    "Jumlah jam sewa tidak valid. Silakan masukkan angka 1 sampai 24 (misal, 5 atau 5 jam).";

pub const ASK_ADDRESS_DROPOFF: &str = "Masukkan alamat antar (misal, Jl. Sudirman No. 5). Ketik \"tidak ada\" jika tidak ada.";
pub const ASK_FLIGHT: &str =
    "Masukkan kode penerbangan (misal, GA123). Ketik \"tidak ada\" jika tidak ada.";
pub const ASK_AIRLINE: &str = "Masukkan nama maskapai (misal, Garuda Indonesia). Ketik \"tidak ada\" jika tidak ada.";

pub const ASK_PICKUP_TIME: &str = "Masukkan jam jemput (misal, 07:00).";
pub const INVALID_PICKUP_TIME: &str = "Jam jemput tidak valid. Silakan masukkan seperti \"07:00\".";

pub const ASK_PICKUP_DATE: &str = "Masukkan tanggal jemput (misal, 2025-06-20).";
pub const INVALID_PICKUP_DATE: &str =
    "Tanggal jemput tidak valid. Silakan masukkan seperti \"2025-06-20\".";

pub const SUMMARY_COMMANDS: &str = "Silakan ketik 'konfirmasi' untuk melanjutkan, 'ulang' untuk mengisi ulang, atau 'batal' untuk membatalkan.";
pub const NEXT_ACTION_COMMANDS: &str = "Apa yang ingin dilakukan selanjutnya? Ketik: 'selesai', 'buatkan reservasi lagi', atau 'cari pesanan'.";

pub const ASK_BOOKING_CODE: &str =
    "Silakan masukkan kode booking (misalnya, KIR-0001 atau KR-ABC123).";
pub const INVALID_BOOKING_CODE: &str = "Kode booking tidak valid. Silakan masukkan kode seperti \"KR-ABC123\" atau ketik \"batal\".";
pub const BOOKING_NOT_FOUND: &str =
    "Kode booking tidak ditemukan. Silakan masukkan kode lain atau ketik \"batal\".";

pub const BOOKING_CANCELLED: &str = "Pemesanan dibatalkan. Silakan mulai lagi dengan \"Pesan Reguler Malang-Juanda\" atau ketik \"bantuan\".";
pub const LOOKUP_CANCELLED: &str = "Pengecekan dibatalkan. Silakan mulai lagi dengan \"Pesan Reguler Malang-Juanda\" atau ketik \"bantuan\".";
pub const FAREWELL: &str =
    "Terima kasih! Silakan ketik \"Pesan Reguler Malang-Juanda\" untuk memesan lagi.";
pub const STORE_UNAVAILABLE: &str =
    "Maaf, sistem pemesanan sedang tidak tersedia. Silakan coba lagi beberapa saat lagi.";
pub const NOT_UNDERSTOOD: &str = "Maaf, saya kurang paham. Silakan ketik \"Pesan Reguler Malang-Juanda\" atau \"bantuan\".";

const NOT_PROVIDED: &str = "Tidak ada";

/// `Rp` followed by the amount with `,` thousands separators.
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}Rp{grouped}")
}

pub fn restart_instruction(service: Option<ServiceType>, route: Option<Route>) -> String {
    let service = service.unwrap_or(ServiceType::Standard);
    let route = route.unwrap_or(Route::MalangJuanda);
    format!(
        "Maaf, terlalu banyak kesalahan. Silakan mulai lagi dengan \"Pesan {} {}\".",
        service.display_name(),
        route.display_name()
    )
}

pub fn booking_summary(slots: &BookingSlots, total_price: i64) -> String {
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_PROVIDED.to_string());

    let mut lines = vec![
        "Rincian Pemesanan:".to_string(),
        format!("Nama: {}", text(&slots.name)),
        format!("Layanan: {}", slots.service.map_or(NOT_PROVIDED, |s| s.display_name())),
        format!("Rute: {}", slots.route.map_or(NOT_PROVIDED, |r| r.display_name())),
    ];
    if let Some(vehicle) = slots.vehicle {
        lines.push(format!("Kendaraan: {}", vehicle.display_name()));
    }
    lines.push(format!(
        "Penumpang: {}",
        slots.passengers.map_or_else(|| NOT_PROVIDED.to_string(), |count| count.to_string())
    ));
    lines.push(format!("Telepon: {}", text(&slots.phone)));
    lines.push(format!("Alamat Jemput: {}", text(&slots.address_pickup)));
    if let Some(hours) = slots.rental_hours {
        lines.push(format!("Lama Sewa: {hours} jam"));
    } else {
        lines.push(format!("Alamat Antar: {}", text(&slots.address_dropoff)));
        lines.push(format!("Penerbangan: {}", text(&slots.flight)));
        lines.push(format!("Maskapai: {}", text(&slots.airline)));
    }
    lines.push(format!("Jam Jemput: {}", text(&slots.pickup_time)));
    lines.push(format!("Tanggal Jemput: {}", text(&slots.pickup_date)));
    lines.push(format!("Total Harga: {}", format_rupiah(total_price)));
    lines.push(SUMMARY_COMMANDS.to_string());
    lines.join("\n")
}

pub fn booking_confirmed(name: &str, code: &BookingCode) -> String {
    format!("Pemesanan dikonfirmasi untuk {name}:\nKode Booking: {code}\n{NEXT_ACTION_COMMANDS}")
}

pub fn booking_details(booking: &Booking) -> String {
    let trip = &booking.trip;
    format!(
        "Detail pesanan:\nKode Booking: {}\nNama: {}\nLayanan: {}\nRute: {}\nTanggal Jemput: {} {}\nStatus: {}\n{}",
        booking.code,
        trip.name,
        trip.service.display_name(),
        trip.route.display_name(),
        trip.pickup_date,
        trip.pickup_time,
        booking.status.display_name(),
        NEXT_ACTION_COMMANDS
    )
}

#[cfg(test)]
mod tests {
    use super::{booking_summary, format_rupiah, restart_instruction};
    use crate::domain::service::{Route, ServiceType, VehicleType};
    use crate::domain::session::BookingSlots;

    #[test]
    fn rupiah_groups_thousands() {
        assert_eq!(format_rupiah(0), "Rp0");
        assert_eq!(format_rupiah(999), "Rp999");
        assert_eq!(format_rupiah(180_000), "Rp180,000");
        assert_eq!(format_rupiah(1_900_000), "Rp1,900,000");
        assert_eq!(format_rupiah(-650_000), "-Rp650,000");
    }

    #[test]
    fn restart_instruction_names_service_and_route() {
        assert_eq!(
            restart_instruction(Some(ServiceType::CharterDrop), Some(Route::JuandaMalang)),
            "Maaf, terlalu banyak kesalahan. Silakan mulai lagi dengan \"Pesan Charter Drop Juanda-Malang\"."
        );
        assert!(restart_instruction(None, None).contains("Pesan Reguler Malang-Juanda"));
    }

    #[test]
    fn daily_charter_summary_shows_rental_hours_instead_of_flight() {
        let mut slots = BookingSlots::for_service(ServiceType::CharterDaily, Route::MalangSurabaya);
        slots.vehicle = Some(VehicleType::Innova);
        slots.rental_hours = Some(6);

        let summary = booking_summary(&slots, 6_000_000);

        assert!(summary.contains("Kendaraan: Innova"));
        assert!(summary.contains("Lama Sewa: 6 jam"));
        assert!(!summary.contains("Penerbangan"));
        assert!(summary.contains("Nama: Tidak ada"));
        assert!(summary.contains("Total Harga: Rp6,000,000"));
    }
}
