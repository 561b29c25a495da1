use minijinja::Value;
use minijinja::value::ValueKind;

use crate::SnippetError;
use crate::SnippetResult;

/// Arguments of a macro call bound to its parameter list.
///
/// Each parameter can be passed positionally, in declaration order, or as a
/// keyword argument. `none` counts as not passed.
#[derive(Debug)]
pub(crate) struct MacroArgs {
	name: &'static str,
	params: &'static [&'static str],
	slots: Vec<Option<Value>>,
}

impl MacroArgs {
	pub(crate) fn bind(
		name: &'static str,
		params: &'static [&'static str],
		args: &[Value],
	) -> SnippetResult<Self> {
		let (positional, kwargs) = match args.split_last() {
			Some((last, rest)) if last.is_kwargs() => (rest, Some(last)),
			_ => (args, None),
		};

		if positional.len() > params.len() {
			return Err(invalid(
				name,
				format!(
					"takes at most {} positional argument(s) but {} were given",
					params.len(),
					positional.len()
				),
			));
		}

		let mut slots: Vec<Option<Value>> = positional.iter().cloned().map(Some).collect();
		slots.resize(params.len(), None);

		if let Some(kwargs) = kwargs {
			let keys = kwargs
				.try_iter()
				.map_err(|e| invalid(name, e.to_string()))?;
			for key in keys {
				let Some(key) = key.as_str() else {
					return Err(invalid(name, format!("invalid keyword `{key}`")));
				};
				let Some(index) = params.iter().position(|param| *param == key) else {
					return Err(invalid(name, format!("unexpected keyword argument `{key}`")));
				};
				if slots[index].is_some() {
					return Err(invalid(name, format!("got multiple values for `{key}`")));
				}
				let value = kwargs
					.get_attr(key)
					.map_err(|e| invalid(name, e.to_string()))?;
				slots[index] = Some(value);
			}
		}

		Ok(Self {
			name,
			params,
			slots,
		})
	}

	fn value(&self, param: &str) -> Option<&Value> {
		let index = self.params.iter().position(|p| *p == param)?;
		self.slots[index]
			.as_ref()
			.filter(|value| !value.is_undefined() && !value.is_none())
	}

	pub(crate) fn required_str(&self, param: &str) -> SnippetResult<String> {
		self.optional_str(param)?
			.ok_or_else(|| invalid(self.name, format!("missing required argument `{param}`")))
	}

	pub(crate) fn optional_str(&self, param: &str) -> SnippetResult<Option<String>> {
		let Some(value) = self.value(param) else {
			return Ok(None);
		};

		value
			.as_str()
			.map(|s| Some(s.to_string()))
			.ok_or_else(|| invalid(self.name, format!("`{param}` must be a string")))
	}

	pub(crate) fn str_or(&self, param: &str, default: &str) -> SnippetResult<String> {
		Ok(self
			.optional_str(param)?
			.unwrap_or_else(|| default.to_string()))
	}

	/// A line number style argument, `0` when not passed.
	pub(crate) fn number(&self, param: &str) -> SnippetResult<usize> {
		let Some(value) = self.value(param) else {
			return Ok(0);
		};

		i64::try_from(value.clone())
			.ok()
			.and_then(|n| usize::try_from(n).ok())
			.ok_or_else(|| {
				invalid(
					self.name,
					format!("`{param}` must be a non-negative integer"),
				)
			})
	}

	pub(crate) fn required_number(&self, param: &str) -> SnippetResult<usize> {
		if self.value(param).is_none() {
			return Err(invalid(
				self.name,
				format!("missing required argument `{param}`"),
			));
		}

		self.number(param)
	}

	pub(crate) fn flag(&self, param: &str, default: bool) -> SnippetResult<bool> {
		Ok(self.value(param).map_or(default, Value::is_true))
	}

	pub(crate) fn str_list(&self, param: &str) -> SnippetResult<Vec<String>> {
		let Some(value) = self.value(param) else {
			return Err(invalid(
				self.name,
				format!("missing required argument `{param}`"),
			));
		};

		if value.kind() != ValueKind::Seq {
			return Err(invalid(self.name, format!("`{param}` must be a list")));
		}

		let items = value
			.try_iter()
			.map_err(|_| invalid(self.name, format!("`{param}` must be a list")))?;
		items
			.map(|item| {
				item.as_str().map(ToString::to_string).ok_or_else(|| {
					invalid(self.name, format!("`{param}` must only contain strings"))
				})
			})
			.collect()
	}
}

fn invalid(name: &str, reason: String) -> SnippetError {
	SnippetError::InvalidArguments {
		name: name.to_string(),
		reason,
	}
}
