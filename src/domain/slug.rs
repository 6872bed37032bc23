/// Turns a task title into a URL-safe, lowercase ASCII token. Non-ASCII text is transliterated,
/// and every run of other characters (apostrophes included) becomes a single `-`.
pub fn slugify(title: &str) -> String {
    ::slug::slugify(title)
}
