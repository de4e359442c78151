//! String parsing helpers and the stock persistence transformers.
//!
//! Every transformer here exposes `String`, so it can back a persistent
//! property. Parse failures fall back to the declared default.

use std::fmt::Display;
use std::str::FromStr;

use super::Transformer;

/// Reads a persisted boolean. Besides `true`/`false`, hand-edited stores
/// may spell it `yes`/`no`, `on`/`off` or `1`/`0`, in any case.
pub fn parse_bool(raw: &str) -> Option<bool> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"true" | "yes" | "on" | "1" => Some(true),
		"false" | "no" | "off" | "0" => Some(false),
		_ => None,
	}
}

/// Reads a persisted decimal integer, ignoring surrounding whitespace.
pub fn parse_int(raw: &str) -> Option<i64> {
	raw.trim().parse().ok()
}

/// Persists a `bool` as `"true"`/`"false"`.
pub fn bool_string(fallback: bool) -> Transformer<bool, String> {
	Transformer::new(
		|raw: &String| parse_bool(raw),
		|value: &Option<bool>| value.map(|b| b.to_string()).unwrap_or_default(),
	)
	.write_fallback(fallback)
}

/// Persists an `i64` in decimal.
pub fn int_string(fallback: i64) -> Transformer<i64, String> {
	Transformer::new(
		|raw: &String| parse_int(raw),
		|value: &Option<i64>| value.map(|n| n.to_string()).unwrap_or_default(),
	)
	.write_fallback(fallback)
}

/// Persists a `String` as-is.
pub fn string_identity() -> Transformer<String, String> {
	Transformer::identity()
}

/// Persists any `FromStr + Display` value through its string forms.
pub fn display_string<T>(fallback: T) -> Transformer<T, String>
where
	T: FromStr + Display + Clone + 'static,
{
	Transformer::new(
		|raw: &String| raw.parse::<T>().ok(),
		|value: &Option<T>| value.as_ref().map(T::to_string).unwrap_or_default(),
	)
	.write_fallback(fallback)
}
