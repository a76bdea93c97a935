const RTL_LANGUAGES: [&str; 8] = ["ar", "he", "fa", "ur", "ku", "ps", "sd", "yi"];

const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Reads the runtime's reported user language and decides text direction.
/// Checked once at startup.
pub fn detect_rtl() -> bool {
    LOCALE_VARS
        .iter()
        .filter_map(std::env::var_os)
        .map(|value| value.to_string_lossy().to_string())
        .find(|value| !value.trim().is_empty())
        .is_some_and(|locale| is_rtl(&locale))
}

pub fn is_rtl(locale: &str) -> bool {
    let code = language_code(locale);
    RTL_LANGUAGES.contains(&code.as_str())
}

fn language_code(locale: &str) -> String {
    locale
        .split(['-', '_', '.'])
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::is_rtl;

    #[test]
    fn bare_rtl_codes_are_detected() {
        assert!(is_rtl("ar"));
        assert!(is_rtl("he"));
        assert!(is_rtl("fa"));
    }

    #[test]
    fn region_and_encoding_suffixes_are_ignored() {
        assert!(is_rtl("ar_SA.UTF-8"));
        assert!(is_rtl("he-IL"));
        assert!(is_rtl("UR_PK"));
    }

    #[test]
    fn ltr_locales_are_not_detected() {
        assert!(!is_rtl("en-US"));
        assert!(!is_rtl("fr_FR.UTF-8"));
        assert!(!is_rtl(""));
    }
}
