use std::any::Any;

/// Extracts a human-readable message from a panic payload.
///
/// Returns `None` for payloads that are neither `&str` nor `String`.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
	if let Some(s) = payload.downcast_ref::<&'static str>() {
		return Some((*s).to_string());
	}
	payload.downcast_ref::<String>().cloned()
}
