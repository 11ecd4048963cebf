//! Shared constants: list limits, retry policy, attachment caps, and the
//! compiled fallback reference data (cities, default category map).

/// Server-side result cap for report listings. The backend applies this
/// itself; the client sends it explicitly and never second-guesses it.
pub const DEFAULT_RESULT_LIMIT: u32 = 500;

/// Fixed page size for client-side pagination of catalogue views.
pub const CATALOG_PAGE_SIZE: usize = 20;

/// Transient read failures are retried this many times before surfacing.
pub const FETCH_RETRY_LIMIT: u32 = 2;

/// Fixed delay between read retries, in milliseconds.
pub const FETCH_RETRY_DELAY_MS: u64 = 1000;

/// Maximum attachment size: 4 GiB.
pub const MAX_ATTACHMENT_BYTES: u64 = 4 * 1024 * 1024 * 1024;

/// Embedded image limit for scaffold components.
pub const MAX_COMPONENT_IMAGES: usize = 3;

/// Compiled fallback city list (code, name). The authoritative list comes
/// from `GET /sehirler`; this subset covers offline use and tests. Codes
/// appear in server-assigned report numbers (PK2025-ANK001).
pub const CITIES: &[(&str, &str)] = &[
    ("ADA", "Adana"),
    ("ANK", "Ankara"),
    ("ANT", "Antalya"),
    ("BUR", "Bursa"),
    ("DEN", "Denizli"),
    ("DIY", "Diyarbakır"),
    ("ERZ", "Erzurum"),
    ("ESK", "Eskişehir"),
    ("GAZ", "Gaziantep"),
    ("HAT", "Hatay"),
    ("IST", "İstanbul"),
    ("IZM", "İzmir"),
    ("KAY", "Kayseri"),
    ("KOC", "Kocaeli"),
    ("KON", "Konya"),
    ("MAL", "Malatya"),
    ("MAN", "Manisa"),
    ("MER", "Mersin"),
    ("SAK", "Sakarya"),
    ("SAM", "Samsun"),
    ("TRA", "Trabzon"),
    ("SAN", "Şanlıurfa"),
];

/// Default category → sub-category seed map. The backend seeds its category
/// collection from the same vocabulary; kept here for the legacy mapping
/// endpoint fallback and for tests.
pub const CATEGORY_SUB_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Asansör",
        &["Yolcu Asansörü", "Yük Asansörü", "Servis Asansörü"],
    ),
    ("Vinç", &["Kule Vinç", "Mobil Vinç", "Köprü Vinç", "Caraskal"]),
    (
        "İskele",
        &["Cephe İskelesi", "Kalıp İskelesi", "Mobil İskele"],
    ),
    (
        "Kaldırma Araçları",
        &["Forklift", "Transpalet", "Makaslı Platform"],
    ),
    (
        "Basınçlı Kaplar",
        &["Kompresör", "Hava Tankı", "Buhar Kazanı"],
    ),
    (
        "Elektrik Tesisatı",
        &["Topraklama", "Paratoner", "Elektrik Panosu"],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_codes_are_unique() {
        let mut codes: Vec<&str> = CITIES.iter().map(|(kod, _)| *kod).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), CITIES.len());
    }

    #[test]
    fn every_default_category_has_sub_categories() {
        for (name, subs) in CATEGORY_SUB_CATEGORIES {
            assert!(!name.is_empty());
            assert!(!subs.is_empty());
        }
    }
}
