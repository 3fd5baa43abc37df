/// Supplies a presentation-ready label for listings and logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// True when the value has at least one non-whitespace character.
pub(crate) fn is_filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Same as [`is_filled`] for optional text.
pub(crate) fn is_filled_opt(value: Option<&str>) -> bool {
    value.map(is_filled).unwrap_or(false)
}
