//! Slug derivation
//!
//! Produces the URL-safe identifiers stored on authors (from their full
//! name) and used as blob file base names for books (from the title).
//! Output contains only lowercase ASCII letters, digits, and single
//! hyphens, with no leading or trailing hyphen.

/// Derive a slug from a display name or title.
///
/// Alphanumeric characters are lowercased; every other run of characters
/// collapses to a single hyphen. Non-ASCII alphanumerics are kept as-is
/// after lowercasing, which matches how the stored slugs are compared for
/// uniqueness.
///
/// ```rust
/// use folio_common::slug::slugify;
///
/// assert_eq!(slugify("The Great Gatsby"), "the-great-gatsby");
/// assert_eq!(slugify("  J. R. R.  Tolkien "), "j-r-r-tolkien");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_hyphen = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Whether `slug` is already in canonical form.
pub fn is_canonical(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}
