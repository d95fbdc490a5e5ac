//! Country table for the location question and the calling-code picker.

use serde::Serialize;

use crate::locale::Lang;

/// One selectable country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Country {
    pub name_en: &'static str,
    pub name_ar: &'static str,
    pub dial_code: &'static str,
}

impl Country {
    pub fn name(&self, lang: Lang) -> &'static str {
        match lang {
            Lang::En => self.name_en,
            Lang::Ar => self.name_ar,
        }
    }
}

const fn c(name_en: &'static str, name_ar: &'static str, dial_code: &'static str) -> Country {
    Country {
        name_en,
        name_ar,
        dial_code,
    }
}

/// Countries offered in the picker, Middle East and North Africa first.
pub static COUNTRIES: &[Country] = &[
    c("Egypt", "مصر", "+20"),
    c("Saudi Arabia", "السعودية", "+966"),
    c("United Arab Emirates", "الإمارات", "+971"),
    c("Kuwait", "الكويت", "+965"),
    c("Qatar", "قطر", "+974"),
    c("Bahrain", "البحرين", "+973"),
    c("Oman", "عمان", "+968"),
    c("Jordan", "الأردن", "+962"),
    c("Lebanon", "لبنان", "+961"),
    c("Iraq", "العراق", "+964"),
    c("Syria", "سوريا", "+963"),
    c("Palestine", "فلسطين", "+970"),
    c("Yemen", "اليمن", "+967"),
    c("Libya", "ليبيا", "+218"),
    c("Tunisia", "تونس", "+216"),
    c("Algeria", "الجزائر", "+213"),
    c("Morocco", "المغرب", "+212"),
    c("Sudan", "السودان", "+249"),
    c("Turkey", "تركيا", "+90"),
    c("Iran", "إيران", "+98"),
    c("United States", "الولايات المتحدة", "+1"),
    c("Canada", "كندا", "+1"),
    c("Mexico", "المكسيك", "+52"),
    c("Brazil", "البرازيل", "+55"),
    c("Argentina", "الأرجنتين", "+54"),
    c("United Kingdom", "المملكة المتحدة", "+44"),
    c("Ireland", "أيرلندا", "+353"),
    c("France", "فرنسا", "+33"),
    c("Germany", "ألمانيا", "+49"),
    c("Italy", "إيطاليا", "+39"),
    c("Spain", "إسبانيا", "+34"),
    c("Portugal", "البرتغال", "+351"),
    c("Netherlands", "هولندا", "+31"),
    c("Belgium", "بلجيكا", "+32"),
    c("Switzerland", "سويسرا", "+41"),
    c("Austria", "النمسا", "+43"),
    c("Sweden", "السويد", "+46"),
    c("Norway", "النرويج", "+47"),
    c("Denmark", "الدنمارك", "+45"),
    c("Finland", "فنلندا", "+358"),
    c("Poland", "بولندا", "+48"),
    c("Greece", "اليونان", "+30"),
    c("Russia", "روسيا", "+7"),
    c("Ukraine", "أوكرانيا", "+380"),
    c("Nigeria", "نيجيريا", "+234"),
    c("Kenya", "كينيا", "+254"),
    c("Ethiopia", "إثيوبيا", "+251"),
    c("South Africa", "جنوب أفريقيا", "+27"),
    c("Ghana", "غانا", "+233"),
    c("India", "الهند", "+91"),
    c("Pakistan", "باكستان", "+92"),
    c("Bangladesh", "بنغلاديش", "+880"),
    c("China", "الصين", "+86"),
    c("Japan", "اليابان", "+81"),
    c("South Korea", "كوريا الجنوبية", "+82"),
    c("Indonesia", "إندونيسيا", "+62"),
    c("Malaysia", "ماليزيا", "+60"),
    c("Singapore", "سنغافورة", "+65"),
    c("Vietnam", "فيتنام", "+84"),
    c("Australia", "أستراليا", "+61"),
];

/// Exact-name lookup in either language.
pub fn find_by_name(name: &str) -> Option<&'static Country> {
    COUNTRIES
        .iter()
        .find(|country| country.name_en == name || country.name_ar == name)
}

/// Case-insensitive search for any country name mentioned in `text`.
///
/// English names match on whole words only ("woman" is not Oman). Arabic
/// names match as substrings since prepositions attach to the word. Longer
/// names are tried first.
pub fn find_mentioned(text: &str) -> Option<&'static Country> {
    let words: String = text
        .to_lowercase()
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch } else { ' ' })
        .collect();
    let padded = format!(" {} ", words.split_whitespace().collect::<Vec<_>>().join(" "));

    let mut candidates: Vec<&'static Country> = COUNTRIES.iter().collect();
    candidates.sort_by_key(|country| std::cmp::Reverse(country.name_en.len()));
    candidates.into_iter().find(|country| {
        padded.contains(&format!(" {} ", country.name_en.to_lowercase()))
            || text.contains(country.name_ar)
    })
}

/// Whether `code` is one of the table's calling codes.
pub fn is_known_dial_code(code: &str) -> bool {
    COUNTRIES.iter().any(|country| country.dial_code == code)
}
