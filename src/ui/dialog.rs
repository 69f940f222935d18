//! Generic two-field configuration dialog rendered on a terminal

use std::io::{BufRead, Write};
use tracing::debug;

use crate::core::errors::Result;

/// Answer that empties a field instead of keeping its current value
pub const CLEAR_SENTINEL: &str = "-";

/// Labels and values shown by a [`ConfigDialog`]
#[derive(Debug, Clone)]
pub struct ConfigPanel {
    /// Label of the first field
    pub value_label1: String,
    /// Value of the first field
    pub value_field1: String,
    /// Label of the second field
    pub value_label2: String,
    /// Value of the second field
    pub value_field2: String,
    /// Whether the second field is prompted
    field2_visible: bool,
}

impl Default for ConfigPanel {
    fn default() -> Self {
        Self {
            value_label1: "Value 1".to_string(),
            value_field1: String::new(),
            value_label2: "Value 2".to_string(),
            value_field2: String::new(),
            field2_visible: true,
        }
    }
}

impl ConfigPanel {
    /// Show or hide the second field; the first is always prompted
    pub fn set_field2_visible(&mut self, visible: bool) {
        self.field2_visible = visible;
    }
}

/// Modal dialog: prompt for each visible field, then ask for confirmation.
/// `on_confirm` runs only when the user accepts.
pub struct ConfigDialog<F>
where
    F: FnMut(&ConfigPanel) -> Result<()>,
{
    /// Heading printed above the prompts
    pub title: String,
    /// Fields being edited
    pub panel: ConfigPanel,
    /// Runs with the edited panel once the user confirms
    on_confirm: F,
}

impl<F> ConfigDialog<F>
where
    F: FnMut(&ConfigPanel) -> Result<()>,
{
    /// Dialog with default labels and empty values
    pub fn new(title: impl Into<String>, on_confirm: F) -> Self {
        Self {
            title: title.into(),
            panel: ConfigPanel::default(),
            on_confirm,
        }
    }

    /// Run the dialog. Returns `true` when the values were confirmed.
    pub fn show<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<bool>
    where
        R: BufRead + ?Sized,
        W: Write + ?Sized,
    {
        writeln!(output, "== {} ==", self.title)?;

        match prompt(input, output, &self.panel.value_label1, &self.panel.value_field1)? {
            Some(value) => self.panel.value_field1 = value,
            None => return Ok(false),
        }

        if self.panel.field2_visible {
            match prompt(input, output, &self.panel.value_label2, &self.panel.value_field2)? {
                Some(value) => self.panel.value_field2 = value,
                None => return Ok(false),
            }
        }

        write!(output, "Save? [Y/n]: ")?;
        output.flush()?;
        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            debug!("Dialog cancelled at confirmation");
            return Ok(false);
        }

        let answer = answer.trim().to_lowercase();
        if answer.is_empty() || answer == "y" || answer == "yes" {
            (self.on_confirm)(&self.panel)?;
            Ok(true)
        } else {
            debug!("Dialog declined");
            Ok(false)
        }
    }
}

/// Ask for one value; an empty answer keeps `current`, [`CLEAR_SENTINEL`] empties it, EOF cancels
fn prompt<R, W>(input: &mut R, output: &mut W, label: &str, current: &str) -> Result<Option<String>>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    write!(output, "{} [{}] ('{}' to clear): ", label, current, CLEAR_SENTINEL)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    match line.trim() {
        "" => Ok(Some(current.to_string())),
        CLEAR_SENTINEL => Ok(Some(String::new())),
        value => Ok(Some(value.to_string())),
    }
}
