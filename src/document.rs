//! Text rendering for generated documents.

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Serializes `value` as JSON indented with four spaces, the layout used for
/// definitions opened in the editor and for exported templates.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(serde::ser::Error::custom)
}
