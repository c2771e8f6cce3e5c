pub trait ResultExt<T, E> {
	/// Logs the error, if any, and discards it.
	fn ok_or_log(self) -> Option<T>
	where
		E: std::fmt::Display;

	/// Logs the error, if any, as a warning with some context, keeping the result intact.
	fn warn_err(self, context: &str) -> Self
	where
		E: std::fmt::Display;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
	fn ok_or_log(self) -> Option<T>
	where
		E: std::fmt::Display,
	{
		self.inspect_err(|err| tracing::error!("{}", err)).ok()
	}

	fn warn_err(self, context: &str) -> Self
	where
		E: std::fmt::Display,
	{
		self.inspect_err(|err| tracing::warn!(%err, "{context}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ok_or_log_keeps_values() {
		assert_eq!(Ok::<_, String>(3).ok_or_log(), Some(3));
		assert_eq!(Err::<u8, _>("boom".to_owned()).ok_or_log(), None);
	}

	#[test]
	fn warn_err_passes_through() {
		assert_eq!(Err::<u8, _>("boom").warn_err("while testing"), Err("boom"));
	}
}
