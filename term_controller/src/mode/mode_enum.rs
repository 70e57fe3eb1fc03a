// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// What the reader thread does with terminal input.
///
/// | Mode     | Terminal                                  | Reader                         |
/// | :------- | :---------------------------------------- | :----------------------------- |
/// | `Cooked` | raw line discipline, reporting on         | decode, resolve, enqueue       |
/// | `Raw`    | raw line discipline, reporting on         | forward bytes verbatim         |
/// | `Paused` | original attributes, reporting off        | leaves input unread            |
///
/// `Cooked` names the controller's own processing (bytes are "cooked" into commands),
/// not the tty's canonical mode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    #[default]
    Cooked,
    Raw,
    Paused,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_display_and_parse() {
        let names: Vec<_> = Mode::iter().map(|it| it.to_string()).collect();
        assert_eq!(names, vec!["cooked", "raw", "paused"]);
        assert_eq!(Mode::from_str("raw").unwrap(), Mode::Raw);
    }
}
