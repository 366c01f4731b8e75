/// Check whether a locale key can be used as a file name component.
///
/// Locale keys are used verbatim (`de_DE` stays `de_DE`), so the only
/// rejected keys are the ones that would resolve outside the locale directory:
/// - empty or whitespace-only keys
/// - keys containing `/`, `\` or NUL
/// - `.` and `..`
pub fn is_path_safe(locale: &str) -> bool {
    if locale.trim().is_empty() {
        return false;
    }
    if locale == "." || locale == ".." {
        return false;
    }
    !locale.contains(['/', '\\', '\0'])
}
