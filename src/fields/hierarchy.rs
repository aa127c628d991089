//! Dotted field-name hierarchy.
//!
//! Forms name fields like `Section1.FirstName`. The split is one level only:
//! everything before the last dot is the parent, the rest is the child.
//! `A.B.C` has parent `A.B`; `A.B` is not itself resolved to `A`.

/// Parent name used for fields without a dot.
pub const ROOT_PARENT: &str = "root";

/// Split a field name on its last `.` into `(parent, child)`.
///
/// # Examples
///
/// ```
/// use pdf_formkit::fields::parse_field_hierarchy;
///
/// assert_eq!(
///     parse_field_hierarchy("Section1.Sub.Name"),
///     ("Section1.Sub".to_string(), "Name".to_string())
/// );
/// assert_eq!(parse_field_hierarchy("Name"), ("root".to_string(), "Name".to_string()));
/// ```
pub fn parse_field_hierarchy(field_name: &str) -> (String, String) {
    match field_name.rsplit_once('.') {
        Some((parent, child)) => (parent.to_string(), child.to_string()),
        None => (ROOT_PARENT.to_string(), field_name.to_string()),
    }
}
