/// Formats every T as `...`
///
/// Used to keep connection strings, which may carry credentials, out of logs.
pub fn mask_fmt<T>(_: &T, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.write_str("...")
}
