//! The registry access port.
//!
//! [`RegistryPort`] is the command-style capability the discovery engine
//! depends on. Its methods return the tool's raw text; [`RegistryExt`]
//! layers the parsed, absence-aware reads on top of any port.

use crate::error::Result;
use crate::registry::parser::{parse_default_data, parse_subkey_paths, parse_value_data};
use std::fmt;

/// Which registry hierarchy a query sees on hosts that expose both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RegistryView {
    /// Whatever view the querying process gets by default.
    #[default]
    Native,
    /// The 32-bit (WOW64 emulated) hierarchy.
    Bits32,
    /// The 64-bit hierarchy.
    Bits64,
}

impl RegistryView {
    /// The `reg.exe` switch selecting this view, if any.
    pub fn as_switch(&self) -> Option<&'static str> {
        match self {
            RegistryView::Native => None,
            RegistryView::Bits32 => Some("/reg:32"),
            RegistryView::Bits64 => Some("/reg:64"),
        }
    }

    /// Parse `32` / `64` as used on the command line.
    pub fn from_bits(bits: &str) -> Option<Self> {
        match bits.trim() {
            "32" => Some(RegistryView::Bits32),
            "64" => Some(RegistryView::Bits64),
            "" | "native" => Some(RegistryView::Native),
            _ => None,
        }
    }
}

impl fmt::Display for RegistryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryView::Native => write!(f, "native"),
            RegistryView::Bits32 => write!(f, "32-bit"),
            RegistryView::Bits64 => write!(f, "64-bit"),
        }
    }
}

/// Outcome of an existence probe that completed.
///
/// A probe that could not complete (timeout, access denied) is an `Err`,
/// never `Absent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

impl Presence {
    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present)
    }
}

/// Raw access to a hierarchical key-value store.
///
/// Every method is a blocking call. Reads of a missing key or value fail
/// with an error for which
/// [`ScoutError::is_value_absent`](crate::error::ScoutError::is_value_absent)
/// is true.
pub trait RegistryPort {
    /// List the values and immediate child keys of `key` (no recursion).
    fn query_key(&self, key: &str, view: RegistryView) -> Result<String>;

    /// Query one named value under `key`.
    fn query_value(&self, key: &str, name: &str, view: RegistryView) -> Result<String>;

    /// Query the unnamed default value of `key`.
    fn query_default(&self, key: &str, view: RegistryView) -> Result<String>;

    /// Create `key` (and missing parents) if it does not exist.
    fn add_key(&self, key: &str) -> Result<()>;

    /// Write the default value of `key` as a string.
    fn set_default(&self, key: &str, data: &str) -> Result<()>;

    /// Write a string value.
    fn set_string(&self, key: &str, name: &str, data: &str) -> Result<()>;

    /// Write a 32-bit integer value.
    fn set_dword(&self, key: &str, name: &str, data: u32) -> Result<()>;

    /// Delete a named value.
    fn delete_value(&self, key: &str, name: &str) -> Result<()>;
}

/// Parsed reads available on every [`RegistryPort`].
///
/// Absence becomes `Ok(None)` / `Ok(Presence::Absent)`; any other failure
/// propagates unchanged.
pub trait RegistryExt {
    /// Immediate child key paths of `key`, in the store's own order.
    fn list_subkeys(&self, key: &str, view: RegistryView) -> Result<Vec<String>>;

    /// Data of value `name` under `key`.
    fn read_value(&self, key: &str, name: &str, view: RegistryView) -> Result<Option<String>>;

    /// Data of the default value of `key`.
    fn read_default(&self, key: &str, view: RegistryView) -> Result<Option<String>>;

    /// Whether `key` exists.
    fn key_presence(&self, key: &str, view: RegistryView) -> Result<Presence>;

    /// Whether value `name` exists under `key`.
    fn value_presence(&self, key: &str, name: &str, view: RegistryView) -> Result<Presence>;
}

fn absent_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_value_absent() => Ok(None),
        Err(e) => Err(e),
    }
}

impl<P: RegistryPort + ?Sized> RegistryExt for P {
    fn list_subkeys(&self, key: &str, view: RegistryView) -> Result<Vec<String>> {
        Ok(absent_as_none(self.query_key(key, view))?
            .map(|output| parse_subkey_paths(&output, key))
            .unwrap_or_default())
    }

    fn read_value(&self, key: &str, name: &str, view: RegistryView) -> Result<Option<String>> {
        Ok(absent_as_none(self.query_value(key, name, view))?
            .and_then(|output| parse_value_data(&output, key, name)))
    }

    fn read_default(&self, key: &str, view: RegistryView) -> Result<Option<String>> {
        Ok(absent_as_none(self.query_default(key, view))?
            .and_then(|output| parse_default_data(&output, key)))
    }

    fn key_presence(&self, key: &str, view: RegistryView) -> Result<Presence> {
        Ok(match absent_as_none(self.query_key(key, view))? {
            Some(_) => Presence::Present,
            None => Presence::Absent,
        })
    }

    fn value_presence(&self, key: &str, name: &str, view: RegistryView) -> Result<Presence> {
        Ok(match absent_as_none(self.query_value(key, name, view))? {
            Some(_) => Presence::Present,
            None => Presence::Absent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_switches() {
        assert_eq!(RegistryView::Native.as_switch(), None);
        assert_eq!(RegistryView::Bits32.as_switch(), Some("/reg:32"));
        assert_eq!(RegistryView::Bits64.as_switch(), Some("/reg:64"));
    }

    #[test]
    fn view_from_bits() {
        assert_eq!(RegistryView::from_bits("32"), Some(RegistryView::Bits32));
        assert_eq!(RegistryView::from_bits(" 64 "), Some(RegistryView::Bits64));
        assert_eq!(RegistryView::from_bits(""), Some(RegistryView::Native));
        assert_eq!(RegistryView::from_bits("16"), None);
    }

    #[test]
    fn presence_is_present() {
        assert!(Presence::Present.is_present());
        assert!(!Presence::Absent.is_present());
    }
}
