//! Script Filter feedback: the JSON document Alfred reads from stdout.
//!
//! ```json
//! {"items": [{"title": "...", "subtitle": "...", "arg": "...", "valid": true,
//!             "mods": {"cmd": {"arg": "...", "subtitle": "...", "valid": true}}}]}
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// Icon Alfred shows for warning items
const WARNING_ICON: &str =
    "/System/Library/CoreServices/CoreTypes.bundle/Contents/Resources/AlertCautionIcon.icns";

/// Icon Alfred shows for error items
const ERROR_ICON: &str =
    "/System/Library/CoreServices/CoreTypes.bundle/Contents/Resources/AlertStopIcon.icns";

/// Keyboard modifiers an alternate action can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModKey {
    Cmd,
    Alt,
    Ctrl,
    Shift,
    Fn,
}

/// Item icon, a path relative to the workflow directory or absolute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Icon {
    pub path: String,
}

impl Icon {
    pub fn path(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn warning() -> Self {
        Self::path(WARNING_ICON)
    }

    pub fn error() -> Self {
        Self::path(ERROR_ICON)
    }
}

/// Alternate action shown while a modifier key is held
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Modifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    pub valid: bool,
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }
}

/// Text used by Alfred's copy (⌘C) and large type (⌘L) actions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub largetype: Option<String>,
}

/// A single result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub title: String,

    pub subtitle: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,

    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub mods: BTreeMap<ModKey, Modifier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<ItemText>,
}

impl Item {
    /// A new invalid item with the given title and no subtitle
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: String::new(),
            arg: None,
            autocomplete: None,
            valid: false,
            icon: None,
            mods: BTreeMap::new(),
            text: None,
        }
    }

    /// An invalid item with the warning icon
    pub fn warning(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self::new(title).subtitle(subtitle).icon(Icon::warning())
    }

    /// An invalid item with the error icon
    pub fn error(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self::new(title).subtitle(subtitle).icon(Icon::error())
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    pub fn autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.autocomplete = Some(autocomplete.into());
        self
    }

    pub fn valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    /// Bind an alternate action to `key`, replacing any previous one
    pub fn modifier(mut self, key: ModKey, modifier: Modifier) -> Self {
        self.mods.insert(key, modifier);
        self
    }

    /// Text copied with ⌘C
    pub fn copy_text(mut self, copy: impl Into<String>) -> Self {
        let copy = copy.into();
        self.text = Some(ItemText {
            largetype: Some(copy.clone()),
            copy: Some(copy),
        });
        self
    }
}

/// The list of items sent back to Alfred for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedback {
    items: Vec<Item>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feedback holding a single error item, shown in place of results
    pub fn fatal(message: impl std::fmt::Display) -> Self {
        let mut feedback = Self::new();
        feedback.push(Item::error("Error", message.to_string()));
        feedback
    }

    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = Item>) {
        self.items.extend(items);
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a warning item if nothing else was added
    pub fn warn_empty(&mut self, title: &str, subtitle: &str) {
        if self.items.is_empty() {
            self.push(Item::warning(title, subtitle));
        }
    }

    /// Write the feedback to `writer`. Consumes the feedback so it goes out once.
    pub fn send<W: Write>(self, mut writer: W) -> std::io::Result<()> {
        tracing::debug!("Sending {} items", self.items.len());
        serde_json::to_writer(&mut writer, &self)?;
        writer.flush()
    }
}

/// Report an error that ends the invocation.
///
/// With `text_errors` the message is written as a plain line, for runs whose
/// output is not parsed as a Script Filter. Otherwise it goes out as a
/// [`Feedback::fatal`] item.
pub fn send_fatal<W: Write>(
    mut writer: W,
    message: &str,
    text_errors: bool,
) -> std::io::Result<()> {
    if text_errors {
        writeln!(writer, "{}", message)?;
        return writer.flush();
    }
    Feedback::fatal(message).send(writer)
}
