/// Derive a stable programmatic key from a submitted title.
///
/// Alphanumerics are kept as-is; any run of other characters collapses to a
/// single underscore, with leading and trailing separators trimmed:
/// `"Customer  Region"` becomes `"Customer_Region"`.
pub fn derive_key(title: &str) -> String {
  let mut key = String::with_capacity(title.len());
  let mut pending_separator = false;

  for c in title.chars() {
    if c.is_alphanumeric() {
      if pending_separator && !key.is_empty() {
        key.push('_');
      }
      key.push(c);
      pending_separator = false;
    } else {
      pending_separator = true;
    }
  }

  key
}
