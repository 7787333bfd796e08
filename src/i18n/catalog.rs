//! Standard language and country tables.
//!
//! Order matters: prefix matching walks `LANGUAGES` top to bottom and stops at
//! the first hit.

use crate::i18n::language::LanguageSpec;
use crate::i18n::registry::LanguageRegistryBuilder;

/// Builder pre-loaded with the standard tables and "en" as default.
pub fn standard_builder() -> LanguageRegistryBuilder {
    LanguageRegistryBuilder::new()
        .languages(LANGUAGES.iter().copied())
        .countries(COUNTRIES.iter().copied())
}

const fn lang(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    variants: &'static [&'static str],
    flag_country: Option<&'static str>,
) -> LanguageSpec {
    LanguageSpec {
        code,
        name,
        native_name: Some(native_name),
        variants,
        rtl: false,
        flag_country,
    }
}

const fn rtl(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
    variants: &'static [&'static str],
    flag_country: Option<&'static str>,
) -> LanguageSpec {
    LanguageSpec {
        code,
        name,
        native_name: Some(native_name),
        variants,
        rtl: true,
        flag_country,
    }
}

pub const LANGUAGES: &[LanguageSpec] = &[
    // ==================== Europe ====================
    lang(
        "en",
        "English",
        "English",
        &["en-us", "en-gb", "en-au", "en-ca", "en-nz", "en-ie", "en-za", "en-in", "en-sg"],
        Some("GB"),
    ),
    lang("sk", "Slovak", "Slovenčina", &["sk-sk"], Some("SK")),
    lang("cs", "Czech", "Čeština", &["cs-cz"], Some("CZ")),
    lang(
        "de",
        "German",
        "Deutsch",
        &["de-de", "de-at", "de-ch", "de-li", "de-lu"],
        Some("DE"),
    ),
    lang(
        "fr",
        "French",
        "Français",
        &["fr-fr", "fr-be", "fr-ca", "fr-ch", "fr-lu"],
        Some("FR"),
    ),
    lang(
        "es",
        "Spanish",
        "Español",
        &["es-es", "es-mx", "es-ar", "es-co", "es-cl", "es-pe", "es-ve", "es-us"],
        Some("ES"),
    ),
    lang("it", "Italian", "Italiano", &["it-it", "it-ch"], Some("IT")),
    lang(
        "pt",
        "Portuguese",
        "Português",
        &["pt-pt", "pt-br", "pt-ao", "pt-mz"],
        Some("PT"),
    ),
    lang("nl", "Dutch", "Nederlands", &["nl-nl", "nl-be"], Some("NL")),
    lang("pl", "Polish", "Polski", &["pl-pl"], Some("PL")),
    lang("hu", "Hungarian", "Magyar", &["hu-hu"], Some("HU")),
    lang("ro", "Romanian", "Română", &["ro-ro", "ro-md"], Some("RO")),
    lang("bg", "Bulgarian", "Български", &["bg-bg"], Some("BG")),
    lang("hr", "Croatian", "Hrvatski", &["hr-hr", "hr-ba"], Some("HR")),
    lang(
        "sr",
        "Serbian",
        "Српски",
        &["sr-rs", "sr-me", "sr-latn", "sr-cyrl"],
        Some("RS"),
    ),
    lang("bs", "Bosnian", "Bosanski", &["bs-ba"], Some("BA")),
    lang("sl", "Slovenian", "Slovenščina", &["sl-si"], Some("SI")),
    lang("mk", "Macedonian", "Македонски", &["mk-mk"], Some("MK")),
    lang("sq", "Albanian", "Shqip", &["sq-al", "sq-xk"], Some("AL")),
    lang("el", "Greek", "Ελληνικά", &["el-gr", "el-cy"], Some("GR")),
    lang("tr", "Turkish", "Türkçe", &["tr-tr", "tr-cy"], Some("TR")),
    lang("ru", "Russian", "Русский", &["ru-ru", "ru-by", "ru-kz"], Some("RU")),
    lang("uk", "Ukrainian", "Українська", &["uk-ua"], Some("UA")),
    lang("be", "Belarusian", "Беларуская", &["be-by"], Some("BY")),
    lang("lt", "Lithuanian", "Lietuvių", &["lt-lt"], Some("LT")),
    lang("lv", "Latvian", "Latviešu", &["lv-lv"], Some("LV")),
    lang("et", "Estonian", "Eesti", &["et-ee"], Some("EE")),
    lang("fi", "Finnish", "Suomi", &["fi-fi"], Some("FI")),
    lang("sv", "Swedish", "Svenska", &["sv-se", "sv-fi"], Some("SE")),
    lang(
        "no",
        "Norwegian",
        "Norsk",
        &["no-no", "nb", "nb-no", "nn", "nn-no"],
        Some("NO"),
    ),
    lang("da", "Danish", "Dansk", &["da-dk"], Some("DK")),
    lang("is", "Icelandic", "Íslenska", &["is-is"], Some("IS")),
    lang("ga", "Irish", "Gaeilge", &["ga-ie"], Some("IE")),
    lang("cy", "Welsh", "Cymraeg", &["cy-gb"], Some("GB")),
    lang("mt", "Maltese", "Malti", &["mt-mt"], Some("MT")),
    lang("eu", "Basque", "Euskara", &["eu-es"], Some("ES")),
    lang("ca", "Catalan", "Català", &["ca-es", "ca-ad"], Some("AD")),
    lang("gl", "Galician", "Galego", &["gl-es"], Some("ES")),
    lang("lb", "Luxembourgish", "Lëtzebuergesch", &["lb-lu"], Some("LU")),
    // ==================== Caucasus & Central Asia ====================
    lang("ka", "Georgian", "ქართული", &["ka-ge"], Some("GE")),
    lang("hy", "Armenian", "Հայերեն", &["hy-am"], Some("AM")),
    lang("az", "Azerbaijani", "Azərbaycan", &["az-az"], Some("AZ")),
    lang("kk", "Kazakh", "Қазақ", &["kk-kz"], Some("KZ")),
    lang("uz", "Uzbek", "Oʻzbek", &["uz-uz"], Some("UZ")),
    lang("ky", "Kyrgyz", "Кыргызча", &["ky-kg"], Some("KG")),
    lang("tg", "Tajik", "Тоҷикӣ", &["tg-tj"], Some("TJ")),
    lang("tk", "Turkmen", "Türkmen", &["tk-tm"], Some("TM")),
    lang("mn", "Mongolian", "Монгол", &["mn-mn"], Some("MN")),
    // ==================== Middle East ====================
    rtl(
        "ar",
        "Arabic",
        "العربية",
        &[
            "ar-sa", "ar-eg", "ar-ae", "ar-ma", "ar-dz", "ar-iq", "ar-jo", "ar-kw", "ar-lb",
            "ar-ly", "ar-om", "ar-qa", "ar-sy", "ar-tn", "ar-ye", "ar-bh",
        ],
        Some("SA"),
    ),
    rtl("he", "Hebrew", "עברית", &["he-il", "iw"], Some("IL")),
    rtl("fa", "Persian", "فارسی", &["fa-ir", "fa-af"], Some("IR")),
    rtl("ur", "Urdu", "اردو", &["ur-pk", "ur-in"], Some("PK")),
    rtl("ps", "Pashto", "پښتو", &["ps-af"], Some("AF")),
    rtl("yi", "Yiddish", "ייִדיש", &["ji"], None),
    lang("ku", "Kurdish", "Kurdî", &["ku-tr"], None),
    // ==================== South Asia ====================
    lang("hi", "Hindi", "हिन्दी", &["hi-in"], Some("IN")),
    lang("bn", "Bengali", "বাংলা", &["bn-bd", "bn-in"], Some("BD")),
    lang("pa", "Punjabi", "ਪੰਜਾਬੀ", &["pa-in", "pa-pk"], Some("IN")),
    lang("gu", "Gujarati", "ગુજરાતી", &["gu-in"], Some("IN")),
    lang("mr", "Marathi", "मराठी", &["mr-in"], Some("IN")),
    lang("ta", "Tamil", "தமிழ்", &["ta-in", "ta-lk", "ta-sg"], Some("IN")),
    lang("te", "Telugu", "తెలుగు", &["te-in"], Some("IN")),
    lang("kn", "Kannada", "ಕನ್ನಡ", &["kn-in"], Some("IN")),
    lang("ml", "Malayalam", "മലയാളം", &["ml-in"], Some("IN")),
    lang("si", "Sinhala", "සිංහල", &["si-lk"], Some("LK")),
    lang("ne", "Nepali", "नेपाली", &["ne-np"], Some("NP")),
    // ==================== East & Southeast Asia ====================
    lang(
        "zh",
        "Chinese",
        "中文",
        &["zh-cn", "zh-tw", "zh-hk", "zh-sg", "zh-mo", "zh-hans", "zh-hant"],
        Some("CN"),
    ),
    lang("ja", "Japanese", "日本語", &["ja-jp"], Some("JP")),
    lang("ko", "Korean", "한국어", &["ko-kr", "ko-kp"], Some("KR")),
    lang("vi", "Vietnamese", "Tiếng Việt", &["vi-vn"], Some("VN")),
    lang("th", "Thai", "ไทย", &["th-th"], Some("TH")),
    lang("lo", "Lao", "ລາວ", &["lo-la"], Some("LA")),
    lang("km", "Khmer", "ខ្មែរ", &["km-kh"], Some("KH")),
    lang("my", "Burmese", "မြန်မာ", &["my-mm"], Some("MM")),
    lang("id", "Indonesian", "Bahasa Indonesia", &["id-id", "in"], Some("ID")),
    lang("ms", "Malay", "Bahasa Melayu", &["ms-my", "ms-sg", "ms-bn"], Some("MY")),
    lang("tl", "Filipino", "Filipino", &["tl-ph", "fil", "fil-ph"], Some("PH")),
    // ==================== Africa ====================
    lang("sw", "Swahili", "Kiswahili", &["sw-ke", "sw-tz"], Some("KE")),
    lang("am", "Amharic", "አማርኛ", &["am-et"], Some("ET")),
    lang("so", "Somali", "Soomaali", &["so-so"], Some("SO")),
    lang("ha", "Hausa", "Hausa", &["ha-ng"], Some("NG")),
    lang("yo", "Yoruba", "Yorùbá", &["yo-ng"], Some("NG")),
    lang("ig", "Igbo", "Igbo", &["ig-ng"], Some("NG")),
    lang("zu", "Zulu", "isiZulu", &["zu-za"], Some("ZA")),
    lang("xh", "Xhosa", "isiXhosa", &["xh-za"], Some("ZA")),
    lang("af", "Afrikaans", "Afrikaans", &["af-za"], Some("ZA")),
    lang("nso", "Northern Sotho", "Sesotho sa Leboa", &["nso-za"], Some("ZA")),
    lang("st", "Southern Sotho", "Sesotho", &["st-za", "st-ls"], Some("LS")),
    lang("tn", "Tswana", "Setswana", &["tn-za", "tn-bw"], Some("BW")),
    lang("mg", "Malagasy", "Malagasy", &["mg-mg"], Some("MG")),
    lang("rw", "Kinyarwanda", "Kinyarwanda", &["rw-rw"], Some("RW")),
    // ==================== Constructed & classical ====================
    lang("eo", "Esperanto", "Esperanto", &[], None),
    lang("la", "Latin", "Latina", &[], Some("VA")),
];

/// Country → language used for the geolocation fallback.
pub const COUNTRIES: &[(&str, &str)] = &[
    // Europe
    ("SK", "sk"),
    ("CZ", "cs"),
    ("DE", "de"),
    ("AT", "de"),
    ("CH", "de"),
    ("LI", "de"),
    ("FR", "fr"),
    ("MC", "fr"),
    ("BE", "nl"),
    ("LU", "lb"),
    ("GB", "en"),
    ("IE", "en"),
    ("ES", "es"),
    ("AD", "ca"),
    ("IT", "it"),
    ("SM", "it"),
    ("VA", "it"),
    ("PT", "pt"),
    ("NL", "nl"),
    ("PL", "pl"),
    ("HU", "hu"),
    ("RO", "ro"),
    ("MD", "ro"),
    ("BG", "bg"),
    ("HR", "hr"),
    ("RS", "sr"),
    ("ME", "sr"),
    ("BA", "bs"),
    ("SI", "sl"),
    ("MK", "mk"),
    ("AL", "sq"),
    ("XK", "sq"),
    ("GR", "el"),
    ("CY", "el"),
    ("TR", "tr"),
    ("RU", "ru"),
    ("UA", "uk"),
    ("BY", "be"),
    ("LT", "lt"),
    ("LV", "lv"),
    ("EE", "et"),
    ("FI", "fi"),
    ("SE", "sv"),
    ("NO", "no"),
    ("DK", "da"),
    ("IS", "is"),
    ("MT", "mt"),
    // Caucasus & Central Asia
    ("GE", "ka"),
    ("AM", "hy"),
    ("AZ", "az"),
    ("KZ", "kk"),
    ("UZ", "uz"),
    ("KG", "ky"),
    ("TJ", "tg"),
    ("TM", "tk"),
    ("MN", "mn"),
    // Middle East & North Africa
    ("SA", "ar"),
    ("AE", "ar"),
    ("EG", "ar"),
    ("MA", "ar"),
    ("DZ", "ar"),
    ("TN", "ar"),
    ("LY", "ar"),
    ("IQ", "ar"),
    ("JO", "ar"),
    ("LB", "ar"),
    ("SY", "ar"),
    ("KW", "ar"),
    ("QA", "ar"),
    ("BH", "ar"),
    ("OM", "ar"),
    ("YE", "ar"),
    ("IL", "he"),
    ("IR", "fa"),
    ("AF", "ps"),
    ("PK", "ur"),
    // South Asia
    ("IN", "hi"),
    ("BD", "bn"),
    ("LK", "si"),
    ("NP", "ne"),
    // East & Southeast Asia
    ("CN", "zh"),
    ("TW", "zh"),
    ("HK", "zh"),
    ("MO", "zh"),
    ("SG", "en"),
    ("JP", "ja"),
    ("KR", "ko"),
    ("VN", "vi"),
    ("TH", "th"),
    ("LA", "lo"),
    ("KH", "km"),
    ("MM", "my"),
    ("ID", "id"),
    ("MY", "ms"),
    ("BN", "ms"),
    ("PH", "tl"),
    // Americas
    ("US", "en"),
    ("CA", "en"),
    ("MX", "es"),
    ("AR", "es"),
    ("CO", "es"),
    ("CL", "es"),
    ("PE", "es"),
    ("VE", "es"),
    ("EC", "es"),
    ("BO", "es"),
    ("UY", "es"),
    ("PY", "es"),
    ("CR", "es"),
    ("PA", "es"),
    ("GT", "es"),
    ("HN", "es"),
    ("SV", "es"),
    ("NI", "es"),
    ("DO", "es"),
    ("CU", "es"),
    ("BR", "pt"),
    // Africa
    ("AO", "pt"),
    ("MZ", "pt"),
    ("KE", "sw"),
    ("TZ", "sw"),
    ("ET", "am"),
    ("SO", "so"),
    ("NG", "en"),
    ("ZA", "en"),
    ("BW", "tn"),
    ("LS", "st"),
    ("MG", "mg"),
    ("RW", "rw"),
    // Oceania
    ("AU", "en"),
    ("NZ", "en"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{CountryCode, LanguageRegistry};
    use std::collections::HashSet;

    fn registry() -> &'static LanguageRegistry {
        LanguageRegistry::standard().expect("standard catalog must be valid")
    }

    #[test]
    fn test_catalog_size() {
        assert!(registry().len() >= 85, "got {}", registry().len());
        assert_eq!(registry().len(), LANGUAGES.len());
        assert_eq!(registry().countries().len(), COUNTRIES.len());
    }

    #[test]
    fn test_default_is_english() {
        assert_eq!(registry().default_code(), "en");
    }

    #[test]
    fn test_every_code_resolves_to_itself() {
        for code in registry().all_codes() {
            assert!(registry().is_supported(code.as_str()));
            assert_eq!(registry().resolve_variant(code.as_str()), Some(code));
        }
    }

    #[test]
    fn test_every_variant_resolves_to_its_owner() {
        let mut seen = HashSet::new();
        for entry in registry().entries() {
            for variant in entry.variants() {
                assert!(seen.insert(variant.clone()), "variant {variant} is shared");
                assert_eq!(registry().resolve_variant(variant), Some(entry.code()));
            }
        }
    }

    #[test]
    fn test_rtl_set() {
        let rtl: Vec<_> = registry()
            .entries()
            .iter()
            .filter(|e| e.is_rtl())
            .map(|e| e.code().as_str())
            .collect();
        assert_eq!(rtl, vec!["ar", "he", "fa", "ur", "ps", "yi"]);

        assert!(registry().is_rtl("ar"));
        assert_eq!(registry().direction("ar").as_str(), "rtl");
        assert!(!registry().is_rtl("en"));
        assert_eq!(registry().direction("en").as_str(), "ltr");
    }

    #[test]
    fn test_names() {
        let sk = registry().entry_for("sk").expect("sk");
        assert_eq!(sk.name(), "Slovak");
        assert_eq!(sk.native_name(), Some("Slovenčina"));

        let nso = registry().entry_for("nso").expect("nso");
        assert_eq!(nso.name(), "Northern Sotho");
    }

    #[test]
    fn test_country_map_samples() {
        assert_eq!(registry().language_for_country("SK").map(|c| c.as_str()), Some("sk"));
        assert_eq!(registry().language_for_country("br").map(|c| c.as_str()), Some("pt"));
        assert_eq!(registry().language_for_country("AT").map(|c| c.as_str()), Some("de"));
        assert_eq!(registry().language_for_country("AQ"), None);
    }

    #[test]
    fn test_every_country_maps_to_a_registered_code() {
        let mut previous = "";
        for (country, code) in registry().countries().iter() {
            assert!(country > previous, "countries out of order at {country}");
            assert!(CountryCode::parse(country).is_some(), "bad country {country}");
            assert_eq!(registry().code(code.as_str()), Some(code));
            previous = country;
        }
        assert_eq!(registry().countries().iter().count(), COUNTRIES.len());
    }

    #[test]
    fn test_flag_countries_are_well_formed() {
        for entry in registry().entries() {
            if let Some(country) = entry.flag_country() {
                assert!(entry.flag().is_some(), "bad flag country {country}");
            }
        }
    }
}
