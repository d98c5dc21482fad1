use netbot_core::BOLD_MARKER;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// `**bold**`: Google rich cards and Spark markdown.
    Double,
    /// `*bold*`: Facebook and Slack.
    Single,
}

impl Emphasis {
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Double => "**",
            Self::Single => "*",
        }
    }
}

/// Swaps every bold placeholder for the channel's own emphasis marker.
pub fn emphasize(text: &str, emphasis: Emphasis) -> String {
    text.replace(BOLD_MARKER, emphasis.marker())
}

#[cfg(test)]
mod tests {
    use super::{emphasize, Emphasis};

    #[test]
    fn placeholder_becomes_channel_marker_and_nothing_else_changes() {
        let text = "Your network, <bold>Sandbox 3<bold>, has:\n1. a*b";

        assert_eq!(emphasize(text, Emphasis::Double), "Your network, **Sandbox 3**, has:\n1. a*b");
        assert_eq!(emphasize(text, Emphasis::Single), "Your network, *Sandbox 3*, has:\n1. a*b");
        assert_eq!(emphasize("plain text", Emphasis::Double), "plain text");
    }
}
